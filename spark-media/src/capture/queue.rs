use crate::capture::FrameSource;
use crate::Image;
use anyhow::{bail, Result};
use std::collections::VecDeque;

/// Hands out pre-recorded frames in order, then reports "not ready".
#[derive(Debug, Default)]
pub struct FrameQueue {
    frames: VecDeque<Image>,
    active: bool,
    fail_start: bool,
}

impl FrameQueue {
    pub fn new(frames: impl IntoIterator<Item = Image>) -> Self {
        FrameQueue {
            frames: frames.into_iter().collect(),
            active: false,
            fail_start: false,
        }
    }

    /// A source whose `start` always fails, standing in for a missing camera.
    pub fn unavailable() -> Self {
        FrameQueue {
            fail_start: true,
            ..Default::default()
        }
    }
}

impl FrameSource for FrameQueue {
    fn start(&mut self, width: u32, height: u32) -> Result<(u32, u32)> {
        if self.fail_start {
            bail!("No capture device available");
        }
        self.active = true;
        Ok(self
            .frames
            .front()
            .map(|frame| frame.get_size())
            .unwrap_or((width, height)))
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn grab(&mut self) -> Result<Option<Image>> {
        if !self.active {
            return Ok(None);
        }
        Ok(self.frames.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RGB;

    #[test]
    fn yields_in_order_only_while_active() -> Result<()> {
        let mut queue = FrameQueue::new([
            Image::filled(4, 2, RGB::BLACK),
            Image::filled(4, 2, RGB::WHITE),
        ]);
        assert!(queue.grab()?.is_none());

        assert_eq!(queue.start(640, 480)?, (4, 2));
        assert_eq!(queue.grab()?.map(|f| f.pixel(0, 0)), Some(RGB::BLACK));
        assert_eq!(queue.grab()?.map(|f| f.pixel(0, 0)), Some(RGB::WHITE));
        assert!(queue.grab()?.is_none());
        Ok(())
    }

    #[test]
    fn unavailable_source_fails_to_start() {
        let mut queue = FrameQueue::unavailable();
        assert!(queue.start(640, 480).is_err());
        assert!(!queue.is_active());
    }
}
