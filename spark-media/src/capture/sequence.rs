use crate::capture::FrameSource;
use crate::image::decoder::size::ResizeImage;
use crate::Image;
use anyhow::{bail, Result};
use log::{info, warn};
use std::path::PathBuf;
use walkdir::WalkDir;

const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Replays the still images of a directory as a looping camera feed.
#[derive(Debug)]
pub struct ImageSequence {
    dir: PathBuf,
    files: Vec<PathBuf>,
    cursor: usize,
    size: Option<(u32, u32)>,
}

impl ImageSequence {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ImageSequence {
            dir: dir.into(),
            files: Vec::new(),
            cursor: 0,
            size: None,
        }
    }

    fn scan(&self) -> Vec<PathBuf> {
        let mut files = WalkDir::new(&self.dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect::<Vec<_>>();
        files.sort();
        files
    }
}

impl FrameSource for ImageSequence {
    fn start(&mut self, width: u32, height: u32) -> Result<(u32, u32)> {
        if !self.dir.is_dir() {
            bail!("Frame directory {} does not exist", self.dir.display());
        }
        let files = self.scan();
        if files.is_empty() {
            bail!("No frames found in {}", self.dir.display());
        }

        info!("Replaying {} frame(s) from {}", files.len(), self.dir.display());
        self.files = files;
        self.cursor = 0;
        self.size = Some((width, height));
        Ok((width, height))
    }

    fn stop(&mut self) {
        self.size = None;
        self.files.clear();
    }

    fn is_active(&self) -> bool {
        self.size.is_some()
    }

    fn grab(&mut self) -> Result<Option<Image>> {
        let Some(size) = self.size else {
            return Ok(None);
        };
        if self.files.is_empty() {
            return Ok(None);
        }

        let path = &self.files[self.cursor];
        self.cursor = (self.cursor + 1) % self.files.len();

        let mut frame = match Image::open_file(path) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Skipping unreadable frame {}: {}", path.display(), e);
                return Ok(None);
            }
        };
        frame.resize_to(size)?;

        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RGB;

    #[test]
    fn loops_over_directory_and_resizes() -> Result<()> {
        let dir = tempfile::tempdir()?;
        Image::filled(8, 8, RGB(255, 0, 0)).save(dir.path().join("a.png"))?;
        Image::filled(8, 8, RGB(0, 0, 255)).save(dir.path().join("b.png"))?;
        std::fs::write(dir.path().join("notes.txt"), "ignored")?;

        let mut sequence = ImageSequence::new(dir.path());
        assert!(sequence.grab()?.is_none());
        assert_eq!(sequence.start(4, 2)?, (4, 2));

        let colors = (0..3)
            .map(|_| sequence.grab().map(|f| f.map(|f| (f.get_size(), f.pixel(0, 0)))))
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(
            colors,
            vec![
                Some(((4, 2), RGB(255, 0, 0))),
                Some(((4, 2), RGB(0, 0, 255))),
                Some(((4, 2), RGB(255, 0, 0))),
            ]
        );

        sequence.stop();
        assert!(!sequence.is_active());
        Ok(())
    }

    #[test]
    fn missing_directory_fails_to_start() {
        let mut sequence = ImageSequence::new("/definitely/not/here");
        assert!(sequence.start(640, 480).is_err());
    }
}
