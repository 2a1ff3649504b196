pub mod command;
pub mod dispatcher;
pub mod transport;
pub mod udp;

pub use command::{CommandKind, MotionCommand};
pub use dispatcher::{CommandDispatcher, DispatchError};
pub use transport::{Connector, LinkError, LinkTarget, LinkWatch, Transport};
pub use udp::{UdpConnector, UdpLink};
