use crate::{Image, RGB};
use anyhow::{bail, Result};
use bitvec::vec::BitVec;

pub trait ApplyMask {
    /// Tints every pixel whose mask bit is set. The mask is row-major, one bit per pixel.
    fn layering_mask(&mut self, mask: &BitVec, apply_color: RGB) -> Result<()>;
}

impl ApplyMask for Image {
    fn layering_mask(&mut self, mask: &BitVec, apply_color: RGB) -> Result<()> {
        let pixels = self.width as usize * self.height as usize;
        if mask.len() != pixels {
            bail!("Mask length mismatch: {} vs {}", mask.len(), pixels);
        }

        let channels = self.channels();
        for index in mask.iter_ones() {
            let i = index * channels;
            self.data[i] = self.data[i].saturating_add(apply_color.0);
            self.data[i + 1] = self.data[i + 1].saturating_add(apply_color.1);
            self.data[i + 2] = self.data[i + 2].saturating_add(apply_color.2);
        }

        Ok(())
    }
}

impl Image {
    /// Outlines a rectangle `thickness` pixels wide, clipped to the frame.
    pub fn stroke_rect(&mut self, x: i64, y: i64, width: i64, height: i64, thickness: u32, color: RGB) {
        if width <= 0 || height <= 0 {
            return;
        }
        let t = (thickness.max(1) as i64).min(width).min(height);
        self.paint_span(x, y, width, t, color);
        self.paint_span(x, y + height - t, width, t, color);
        self.paint_span(x, y, t, height, color);
        self.paint_span(x + width - t, y, t, height, color);
    }

    /// Outlines a circle with the midpoint algorithm, clipped to the frame.
    pub fn stroke_circle(&mut self, center_x: i64, center_y: i64, radius: i64, color: RGB) {
        if radius <= 0 {
            self.paint(center_x, center_y, color);
            return;
        }

        let mut x = radius;
        let mut y = 0;
        let mut error = 1 - radius;
        while x >= y {
            for (dx, dy) in [
                (x, y),
                (y, x),
                (-y, x),
                (-x, y),
                (-x, -y),
                (-y, -x),
                (y, -x),
                (x, -y),
            ] {
                self.paint(center_x + dx, center_y + dy, color);
            }

            y += 1;
            if error < 0 {
                error += 2 * y + 1;
            } else {
                x -= 1;
                error += 2 * (y - x) + 1;
            }
        }
    }

    fn paint_span(&mut self, x: i64, y: i64, width: i64, height: i64, color: RGB) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + width).min(self.width as i64);
        let y1 = (y + height).min(self.height as i64);
        for py in y0..y1 {
            for px in x0..x1 {
                self.put_pixel(px as u32, py as u32, color);
            }
        }
    }

    fn paint(&mut self, x: i64, y: i64, color: RGB) {
        if x >= 0 && y >= 0 {
            self.put_pixel(x as u32, y as u32, color);
        }
    }
}
