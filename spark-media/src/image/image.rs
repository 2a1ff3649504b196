use crate::image::pixel::RGB;
use anyhow::{bail, Result};

/// Channel layout of the raw buffer. Alpha, when present, is carried but never read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Rgb,
    Rgba,
}

impl PixelLayout {
    pub fn channels(&self) -> usize {
        match self {
            PixelLayout::Rgb => 3,
            PixelLayout::Rgba => 4,
        }
    }
}

/// Row-major frame buffer with a fixed size for its lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) layout: PixelLayout,
    pub(crate) data: Vec<u8>,
}

impl Image {
    pub fn from_raw(width: u32, height: u32, layout: PixelLayout, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * layout.channels();
        if data.len() != expected {
            bail!(
                "Raw buffer size mismatch: got {} bytes, expected {} for {}x{} {:?}",
                data.len(),
                expected,
                width,
                height,
                layout
            );
        }

        Ok(Image {
            width,
            height,
            layout,
            data,
        })
    }

    /// Opaque RGBA frame of a single color.
    pub fn filled(width: u32, height: u32, color: RGB) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * 4);
        for _ in 0..pixels {
            data.extend_from_slice(&[color.0, color.1, color.2, 255]);
        }

        Image {
            width,
            height,
            layout: PixelLayout::Rgba,
            data,
        }
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    pub fn raw_data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels()
    }

    /// Color at `(x, y)`. Callers keep coordinates in bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> RGB {
        let i = self.offset(x, y);
        RGB(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, color: RGB) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.offset(x, y);
        self.data[i] = color.0;
        self.data[i + 1] = color.1;
        self.data[i + 2] = color.2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_buffer() {
        assert!(Image::from_raw(2, 2, PixelLayout::Rgb, vec![0; 11]).is_err());
        assert!(Image::from_raw(2, 2, PixelLayout::Rgb, vec![0; 12]).is_ok());
    }

    #[test]
    fn reads_both_layouts() -> Result<()> {
        let rgb = Image::from_raw(2, 1, PixelLayout::Rgb, vec![1, 2, 3, 4, 5, 6])?;
        assert_eq!(rgb.pixel(1, 0), RGB(4, 5, 6));

        let rgba = Image::from_raw(2, 1, PixelLayout::Rgba, vec![1, 2, 3, 255, 4, 5, 6, 255])?;
        assert_eq!(rgba.pixel(1, 0), RGB(4, 5, 6));
        Ok(())
    }

    #[test]
    fn put_pixel_ignores_out_of_bounds() {
        let mut image = Image::filled(3, 3, RGB::BLACK);
        image.put_pixel(3, 0, RGB::WHITE);
        image.put_pixel(1, 1, RGB::WHITE);
        assert_eq!(image.pixel(1, 1), RGB::WHITE);
        assert_eq!(image.raw_data().len(), 3 * 3 * 4);
    }
}
