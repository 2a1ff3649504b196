use crate::detect::property::color::ColorReferenceSet;
use crate::detect::{LINE_DEVIATION_SCALE, LINE_REGION_START, LINE_TIE_BREAK_FACTOR, MAX_DEVIATION};
use bitvec::vec::BitVec;
use serde::Serialize;
use spark_media::Image;
use std::fmt::{Display, Formatter};

/// Which way the detected line pulls relative to the frame's vertical centerline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SteeringDirection {
    Left,
    Center,
    Right,
}

impl Display for SteeringDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SteeringDirection::Left => write!(f, "LEFT"),
            SteeringDirection::Center => write!(f, "CENTER"),
            SteeringDirection::Right => write!(f, "RIGHT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineReading {
    pub direction: SteeringDirection,
    /// 0..=100, zero whenever the direction is CENTER.
    pub deviation: f64,
    pub detected: bool,
}

impl Default for LineReading {
    fn default() -> Self {
        LineReading {
            direction: SteeringDirection::Center,
            deviation: 0.0,
            detected: false,
        }
    }
}

impl LineReading {
    /// Scans the road region (lower 40% of the frame) and weighs every matching pixel by
    /// its horizontal distance from the centerline. Far-off pixels pull harder, so the
    /// reading tracks how far the line drifted, not only that it exists.
    pub fn detect(frame: &Image, colors: &ColorReferenceSet) -> Self {
        let (left_weight, right_weight) = accumulate_weights(frame, colors);
        Self::from_weights(left_weight, right_weight)
    }

    pub(crate) fn from_weights(left_weight: f64, right_weight: f64) -> Self {
        let detected = left_weight + right_weight > 0.0;

        let (direction, deviation) = if left_weight > right_weight * LINE_TIE_BREAK_FACTOR {
            (
                SteeringDirection::Left,
                ((left_weight - right_weight) / LINE_DEVIATION_SCALE).min(MAX_DEVIATION),
            )
        } else if right_weight > left_weight * LINE_TIE_BREAK_FACTOR {
            (
                SteeringDirection::Right,
                ((right_weight - left_weight) / LINE_DEVIATION_SCALE).min(MAX_DEVIATION),
            )
        } else {
            (SteeringDirection::Center, 0.0)
        };

        LineReading {
            direction,
            deviation,
            detected,
        }
    }
}

fn road_rows(frame: &Image) -> std::ops::Range<u32> {
    let start = (frame.get_height() as f64 * LINE_REGION_START).floor() as u32;
    start..frame.get_height()
}

fn accumulate_weights(frame: &Image, colors: &ColorReferenceSet) -> (f64, f64) {
    if colors.is_empty() {
        return (0.0, 0.0);
    }

    let center_x = frame.get_width() as f64 / 2.0;
    let mut left_weight = 0.0;
    let mut right_weight = 0.0;

    for y in road_rows(frame) {
        for x in 0..frame.get_width() {
            if !colors.classify(frame.pixel(x, y)) {
                continue;
            }
            let x = x as f64;
            if x < center_x {
                left_weight += center_x - x;
            } else {
                right_weight += x - center_x;
            }
        }
    }

    (left_weight, right_weight)
}

/// Per-pixel match mask over the whole frame, set only inside the road region.
/// Used to tint debug snapshots.
pub fn line_match_mask(frame: &Image, colors: &ColorReferenceSet) -> BitVec {
    let width = frame.get_width() as usize;
    let mut mask = BitVec::repeat(false, width * frame.get_height() as usize);
    for y in road_rows(frame) {
        for x in 0..frame.get_width() {
            if colors.classify(frame.pixel(x, y)) {
                mask.set(y as usize * width + x as usize, true);
            }
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::property::color::ColorCategory;
    use spark_media::RGB;

    fn white() -> ColorReferenceSet {
        [ColorCategory::White].into_iter().collect()
    }

    #[test]
    fn all_black_road_detects_nothing() {
        let frame = Image::filled(64, 40, RGB::BLACK);
        let reading = LineReading::detect(&frame, &white());
        assert_eq!(reading, LineReading::default());
    }

    #[test]
    fn left_heavy_mass_steers_left() {
        // 100x100: road rows 60..100 (40 rows). A white column at x=10 weighs 40 each.
        let mut frame = Image::filled(100, 100, RGB::BLACK);
        frame.fill_rect(10, 0, 1, 100, RGB::WHITE);
        let reading = LineReading::detect(&frame, &white());

        let left = 40.0 * 40.0;
        assert!(reading.detected);
        assert_eq!(reading.direction, SteeringDirection::Left);
        assert_eq!(reading.deviation, (left - 0.0) / 1000.0);
    }

    #[test]
    fn pixels_above_road_region_are_ignored() {
        let mut frame = Image::filled(100, 100, RGB::BLACK);
        frame.fill_rect(0, 0, 100, 60, RGB::WHITE);
        assert!(!LineReading::detect(&frame, &white()).detected);
    }

    #[test]
    fn balanced_mass_is_center() {
        let mut frame = Image::filled(100, 100, RGB::BLACK);
        frame.fill_rect(20, 60, 1, 40, RGB::WHITE);
        frame.fill_rect(80, 60, 1, 40, RGB::WHITE);
        let reading = LineReading::detect(&frame, &white());
        assert!(reading.detected);
        assert_eq!(reading.direction, SteeringDirection::Center);
        assert_eq!(reading.deviation, 0.0);
    }

    #[test]
    fn pixel_on_centerline_is_detected_but_weightless() {
        let mut frame = Image::filled(100, 100, RGB::BLACK);
        frame.put_pixel(50, 80, RGB::WHITE);
        let reading = LineReading::detect(&frame, &white());
        // 50 - 50 = 0, nothing accumulates.
        assert!(!reading.detected);
    }

    #[test]
    fn deviation_is_capped() {
        let reading = LineReading::from_weights(500_000.0, 0.0);
        assert_eq!(reading.direction, SteeringDirection::Left);
        assert_eq!(reading.deviation, 100.0);

        let reading = LineReading::from_weights(1000.0, 3000.0);
        assert_eq!(reading.direction, SteeringDirection::Right);
        assert_eq!(reading.deviation, 2.0);
    }

    #[test]
    fn mask_marks_only_road_region() {
        let mut frame = Image::filled(10, 10, RGB::BLACK);
        frame.put_pixel(2, 1, RGB::WHITE);
        frame.put_pixel(3, 8, RGB::WHITE);
        let mask = line_match_mask(&frame, &white());
        assert_eq!(mask.count_ones(), 1);
        assert!(mask[8 * 10 + 3]);
    }
}
