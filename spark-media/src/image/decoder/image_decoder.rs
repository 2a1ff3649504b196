use crate::{Image, PixelLayout};
use anyhow::{Context, Result};
use image::DynamicImage;
use std::path::Path;

impl Image {
    /// Decodes a still image file (PNG or JPEG) into an RGBA frame.
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let decoded = image::open(path)
            .with_context(|| format!("Failed to decode image {}", path.display()))?;
        Ok(Self::from_dynamic(decoded))
    }

    pub(crate) fn from_dynamic(decoded: DynamicImage) -> Self {
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Image {
            width,
            height,
            layout: PixelLayout::Rgba,
            data: rgba.into_raw(),
        }
    }

    pub(crate) fn to_dynamic(&self) -> Result<DynamicImage> {
        let dynamic = match self.layout {
            PixelLayout::Rgb => image::RgbImage::from_raw(self.width, self.height, self.data.clone())
                .map(DynamicImage::ImageRgb8),
            PixelLayout::Rgba => image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
                .map(DynamicImage::ImageRgba8),
        };
        dynamic.context("Frame buffer does not match its declared size")
    }
}
