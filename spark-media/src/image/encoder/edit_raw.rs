use crate::{Image, RGB};

impl Image {
    /// Paints a solid rectangle, clipped to the frame.
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: RGB) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for py in y..y_end {
            for px in x..x_end {
                self.put_pixel(px, py, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_is_clipped() {
        let mut image = Image::filled(4, 4, RGB::BLACK);
        image.fill_rect(2, 2, 10, 10, RGB::WHITE);
        assert_eq!(image.pixel(3, 3), RGB::WHITE);
        assert_eq!(image.pixel(1, 1), RGB::BLACK);
    }
}
