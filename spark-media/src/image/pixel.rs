use std::fmt::{Display, Formatter};

/// A single color sample, alpha dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RGB(pub u8, pub u8, pub u8);

impl RGB {
    pub const BLACK: RGB = RGB(0, 0, 0);
    pub const WHITE: RGB = RGB(255, 255, 255);

    /// Sum of the absolute per-channel differences.
    pub fn channel_distance(&self, other: &RGB) -> u32 {
        self.0.abs_diff(other.0) as u32
            + self.1.abs_diff(other.1) as u32
            + self.2.abs_diff(other.2) as u32
    }
}

impl Display for RGB {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

impl From<[u8; 3]> for RGB {
    fn from(value: [u8; 3]) -> Self {
        RGB(value[0], value[1], value[2])
    }
}
