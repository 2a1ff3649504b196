use bitvec::array::BitArray;
use bitvec::order::Lsb0;
use serde::{Deserialize, Serialize};
use spark_media::RGB;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Named color categories a line may be painted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorCategory {
    White,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
}

impl ColorCategory {
    pub const ALL: [ColorCategory; 6] = [
        ColorCategory::White,
        ColorCategory::Black,
        ColorCategory::Red,
        ColorCategory::Green,
        ColorCategory::Yellow,
        ColorCategory::Blue,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ColorCategory::White => "white",
            ColorCategory::Black => "black",
            ColorCategory::Red => "red",
            ColorCategory::Green => "green",
            ColorCategory::Yellow => "yellow",
            ColorCategory::Blue => "blue",
        }
    }

    /// Fixed channel-threshold rule of the category.
    #[inline]
    pub fn matches(&self, RGB(r, g, b): RGB) -> bool {
        match self {
            ColorCategory::White => r > 200 && g > 200 && b > 200,
            ColorCategory::Black => r < 50 && g < 50 && b < 50,
            ColorCategory::Red => r > 150 && g < 100 && b < 100,
            ColorCategory::Green => r < 100 && g > 150 && b < 100,
            ColorCategory::Yellow => r > 200 && g > 200 && b < 100,
            ColorCategory::Blue => r < 100 && g < 100 && b > 150,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl Display for ColorCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ColorCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ColorCategory::ALL
            .into_iter()
            .find(|category| category.name() == wanted)
            .ok_or_else(|| anyhow::anyhow!("Unknown color category: {}", s))
    }
}

/// The user-selected set of "line-like" colors, kept in category order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ColorCategory>", into = "Vec<ColorCategory>")]
pub struct ColorReferenceSet(BitArray<[u8; 1], Lsb0>);

impl ColorReferenceSet {
    pub fn empty() -> Self {
        ColorReferenceSet(BitArray::ZERO)
    }

    pub fn insert(&mut self, category: ColorCategory) {
        self.0.set(category.index(), true);
    }

    pub fn remove(&mut self, category: ColorCategory) {
        self.0.set(category.index(), false);
    }

    pub fn contains(&self, category: ColorCategory) -> bool {
        self.0[category.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.0.not_any()
    }

    pub fn len(&self) -> usize {
        self.0.count_ones()
    }

    pub fn iter(&self) -> impl Iterator<Item = ColorCategory> + '_ {
        self.0
            .iter_ones()
            .filter_map(|index| ColorCategory::ALL.get(index).copied())
    }

    /// True iff the pixel matches any selected category. An empty set matches nothing.
    #[inline]
    pub fn classify(&self, pixel: RGB) -> bool {
        self.iter().any(|category| category.matches(pixel))
    }
}

impl FromIterator<ColorCategory> for ColorReferenceSet {
    fn from_iter<T: IntoIterator<Item = ColorCategory>>(iter: T) -> Self {
        let mut set = ColorReferenceSet::empty();
        for category in iter {
            set.insert(category);
        }
        set
    }
}

impl From<Vec<ColorCategory>> for ColorReferenceSet {
    fn from(value: Vec<ColorCategory>) -> Self {
        value.into_iter().collect()
    }
}

impl From<ColorReferenceSet> for Vec<ColorCategory> {
    fn from(value: ColorReferenceSet) -> Self {
        value.iter().collect()
    }
}

impl Display for ColorReferenceSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let names = self.iter().map(|c| c.name()).collect::<Vec<_>>();
        write!(f, "{}", names.join(", "))
    }
}

/// Free-function form of [`ColorReferenceSet::classify`].
pub fn classify(pixel: RGB, reference: &ColorReferenceSet) -> bool {
    reference.classify(pixel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_matches_iff_all_channels_above_200() {
        let set: ColorReferenceSet = [ColorCategory::White].into_iter().collect();
        for r in (0..=255u16).step_by(15) {
            for g in [0u8, 150, 200, 201, 255] {
                for b in [0u8, 200, 201, 255] {
                    let pixel = RGB(r as u8, g, b);
                    assert_eq!(classify(pixel, &set), r > 200 && g > 200 && b > 200, "{}", pixel);
                }
            }
        }
    }

    #[test]
    fn each_category_rule() {
        assert!(ColorCategory::Black.matches(RGB(49, 49, 49)));
        assert!(!ColorCategory::Black.matches(RGB(50, 0, 0)));
        assert!(ColorCategory::Red.matches(RGB(151, 99, 99)));
        assert!(!ColorCategory::Red.matches(RGB(150, 0, 0)));
        assert!(ColorCategory::Green.matches(RGB(99, 151, 99)));
        assert!(ColorCategory::Yellow.matches(RGB(201, 201, 99)));
        assert!(!ColorCategory::Yellow.matches(RGB(201, 201, 100)));
        assert!(ColorCategory::Blue.matches(RGB(99, 99, 151)));
    }

    #[test]
    fn empty_set_matches_nothing() {
        let set = ColorReferenceSet::empty();
        assert!(set.is_empty());
        assert!(!set.classify(RGB(255, 255, 255)));
        assert!(!set.classify(RGB(0, 0, 0)));
    }

    #[test]
    fn set_keeps_category_order_and_round_trips_names() -> anyhow::Result<()> {
        let set: ColorReferenceSet = serde_json::from_str(r#"["blue", "white", "blue"]"#)?;
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![ColorCategory::White, ColorCategory::Blue]);
        assert_eq!(serde_json::to_string(&set)?, r#"["white","blue"]"#);
        assert_eq!("  Yellow ".parse::<ColorCategory>()?, ColorCategory::Yellow);
        assert!("purple".parse::<ColorCategory>().is_err());
        Ok(())
    }
}
