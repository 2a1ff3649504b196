pub mod board;

use crate::detect::analysis::decision::{AlertKind, DisplayState};
use crate::detect::overlay::Overlay;
use crate::session::context::SessionSettings;
use serde::Serialize;
use std::fmt::{Display, Formatter};

pub use board::{StatusBoard, StatusSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKey {
    Camera,
    Link,
    Detection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusState {
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Success => write!(f, "SUCCESS"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// One-way notifications from the core to whatever shows the vehicle's state.
/// Nothing is ever read back through this trait.
pub trait StatusSink: Send + Sync + 'static {
    fn set_status(&self, key: StatusKey, text: &str, state: StatusState);

    fn append_log(&self, text: &str, severity: Severity);

    /// `active == false` removes the alert of that kind.
    fn set_alert(&self, kind: AlertKind, message: &str, active: bool);

    fn clear_alerts(&self);

    fn set_overlay(&self, overlay: Overlay);

    fn set_display(&self, display: &DisplayState);

    fn set_command_count(&self, count: u64);

    fn set_settings(&self, settings: &SessionSettings);

    fn clear_log(&self);
}
