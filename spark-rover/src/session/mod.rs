pub mod context;
pub mod pilot;

use crate::config::ConfigUpdate;
use crate::control::command::CommandKind;
use thiserror::Error;
use tokio::sync::mpsc;

pub use context::SessionSettings;
pub use pilot::PilotSession;

pub(crate) const EVENT_QUEUE_DEPTH: usize = 64;

/// Everything that can happen to the session, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StartCamera,
    /// Also stops detection.
    StopCamera,
    StartDetection,
    StopDetection,
    ToggleDetection,
    Connect,
    Disconnect,
    /// The transport reported that the peer of link number `link` is gone.
    LinkLost { link: u64 },
    Manual(CommandKind),
    UpdateConfig(ConfigUpdate),
    ClearLog,
    /// A stop-sign pause elapsed. Stale generations are ignored.
    Resume { generation: u64 },
    Shutdown,
}

#[derive(Debug, Error)]
#[error("pilot session has stopped")]
pub struct SessionClosed;

/// Cloneable sender side of the session's event queue.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    events: mpsc::Sender<SessionEvent>,
}

impl SessionHandle {
    pub(crate) fn new(events: mpsc::Sender<SessionEvent>) -> Self {
        SessionHandle { events }
    }

    pub async fn send(&self, event: SessionEvent) -> Result<(), SessionClosed> {
        self.events.send(event).await.map_err(|_| SessionClosed)
    }
}
