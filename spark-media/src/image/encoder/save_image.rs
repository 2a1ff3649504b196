use crate::Image;
use anyhow::{Context, Result};
use std::path::Path;

impl Image {
    /// Encodes the frame, format picked from the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        self.to_dynamic()?
            .save(path)
            .with_context(|| format!("Failed to save image {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Image, RGB};

    #[test]
    fn save_and_open_png() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out/frame.png");

        let mut image = Image::filled(6, 5, RGB(0, 0, 0));
        image.put_pixel(2, 3, RGB(250, 10, 10));
        image.save(&path)?;

        let decoded = Image::open_file(&path)?;
        assert_eq!(decoded.get_size(), (6, 5));
        assert_eq!(decoded.pixel(2, 3), RGB(250, 10, 10));
        Ok(())
    }
}
