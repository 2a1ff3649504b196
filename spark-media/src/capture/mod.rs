mod queue;
mod sequence;

pub use queue::FrameQueue;
pub use sequence::ImageSequence;

use crate::Image;
use anyhow::Result;

/// A camera-like producer of frames.
///
/// `start` may adjust the requested size; the returned dimensions are the ones every
/// grabbed frame will have for the rest of the session.
pub trait FrameSource: Send {
    fn start(&mut self, width: u32, height: u32) -> Result<(u32, u32)>;

    fn stop(&mut self);

    fn is_active(&self) -> bool;

    /// `Ok(None)` means the surface has no frame ready yet.
    fn grab(&mut self) -> Result<Option<Image>>;
}
