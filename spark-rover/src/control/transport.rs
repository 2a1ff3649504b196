use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_LINK_ADDRESS: &str = "192.168.4.1:4210";
pub const DEFAULT_SERVICE_ID: &str = "4fafc201-1fb5-459e-8fcc-c5c9c331914b";
pub const DEFAULT_CHARACTERISTIC_ID: &str = "beb5483e-36e1-4688-b7f5-ea07361b26a8";

/// Where the motor controller lives and which characteristic takes commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkTarget {
    pub address: String,
    pub service_id: String,
    pub characteristic_id: String,
}

impl Default for LinkTarget {
    fn default() -> Self {
        LinkTarget {
            address: DEFAULT_LINK_ADDRESS.to_string(),
            service_id: DEFAULT_SERVICE_ID.to_string(),
            characteristic_id: DEFAULT_CHARACTERISTIC_ID.to_string(),
        }
    }
}

impl Display for LinkTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (service {}, characteristic {})", self.address, self.service_id, self.characteristic_id)
    }
}

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("link i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// The peer went away; the session must be dropped.
    #[error("link closed by peer")]
    Closed,
    #[error("no route to {0}")]
    Unreachable(String),
}

/// Given to every opened link so it can report a peer that vanished between writes.
#[derive(Clone)]
pub struct LinkWatch {
    on_lost: Arc<dyn Fn() + Send + Sync>,
}

impl LinkWatch {
    pub fn new(on_lost: impl Fn() + Send + Sync + 'static) -> Self {
        LinkWatch {
            on_lost: Arc::new(on_lost),
        }
    }

    pub fn peer_lost(&self) {
        (self.on_lost)()
    }
}

impl Debug for LinkWatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("LinkWatch")
    }
}

/// An open session to the motor controller. One `write` is one characteristic write.
pub trait Transport: Send + 'static {
    fn write(&mut self, payload: Bytes) -> impl Future<Output = Result<(), LinkError>> + Send;

    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

/// Opens transports. The user-driven device chooser of a browser collapses to a fixed target.
pub trait Connector: Send + Sync + 'static {
    type Link: Transport;

    /// `watch` fires at most once, when the peer disappears without a write noticing.
    fn connect(
        &self,
        target: &LinkTarget,
        watch: LinkWatch,
    ) -> impl Future<Output = Result<Self::Link, LinkError>> + Send;
}
