use crate::Image;
use anyhow::{bail, Result};
use image::imageops::FilterType;

pub trait ResizeImage {
    fn resize_to(&mut self, size: (u32, u32)) -> Result<()>;
    fn resize_into(&self, size: (u32, u32)) -> Result<Self>
    where
        Self: Sized;
}

impl ResizeImage for Image {
    fn resize_to(&mut self, size: (u32, u32)) -> Result<()> {
        if self.get_size() == size {
            return Ok(());
        }
        *self = self.resize_into(size)?;
        Ok(())
    }

    fn resize_into(&self, size: (u32, u32)) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            bail!("Cannot resize to an empty frame {}x{}", size.0, size.1);
        }
        if self.get_size() == size {
            return Ok(self.clone());
        }

        let scaled = self.to_dynamic()?.resize_exact(size.0, size.1, FilterType::Nearest);
        Ok(Image::from_dynamic(scaled))
    }
}

impl Image {
    pub fn get_width(&self) -> u32 {
        self.width
    }

    pub fn get_height(&self) -> u32 {
        self.height
    }

    pub fn get_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RGB;

    #[test]
    fn resize_keeps_color() -> Result<()> {
        let image = Image::filled(8, 4, RGB(10, 200, 30));
        let scaled = image.resize_into((4, 2))?;
        assert_eq!(scaled.get_size(), (4, 2));
        assert_eq!(scaled.pixel(3, 1), RGB(10, 200, 30));
        Ok(())
    }

    #[test]
    fn resize_to_zero_fails() {
        let mut image = Image::filled(2, 2, RGB::BLACK);
        assert!(image.resize_to((0, 2)).is_err());
    }
}
