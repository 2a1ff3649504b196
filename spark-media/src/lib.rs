pub mod capture;
pub mod image;

pub use crate::image::image::{Image, PixelLayout};
pub use crate::image::pixel::RGB;
