use crate::control::command::MotionCommand;
use crate::control::transport::{LinkError, Transport};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("not connected to the motor controller")]
    NotConnected,
    #[error("failed to send command: {0}")]
    Write(#[source] LinkError),
}

/// Sends motion commands over the current link, one write per command, no retry.
/// Outcomes are returned, never logged.
#[derive(Debug)]
pub struct CommandDispatcher<T> {
    link: Option<T>,
    sent: u64,
}

impl<T> Default for CommandDispatcher<T> {
    fn default() -> Self {
        CommandDispatcher { link: None, sent: 0 }
    }
}

impl<T: Transport> CommandDispatcher<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current link. The previous one, if any, is returned to the caller.
    pub fn attach(&mut self, link: T) -> Option<T> {
        self.link.replace(link)
    }

    pub fn detach(&mut self) -> Option<T> {
        self.link.take()
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    /// Commands successfully handed to the transport since start-up.
    pub fn command_count(&self) -> u64 {
        self.sent
    }

    pub async fn dispatch(&mut self, command: MotionCommand) -> Result<(), DispatchError> {
        let Some(link) = self.link.as_mut() else {
            return Err(DispatchError::NotConnected);
        };

        match link.write(command.encode()).await {
            Ok(()) => {
                self.sent += 1;
                Ok(())
            }
            Err(LinkError::Closed) => {
                self.link = None;
                Err(DispatchError::Write(LinkError::Closed))
            }
            Err(e) => Err(DispatchError::Write(e)),
        }
    }
}
