use crate::detect::{GO_GREEN_MIN_SAMPLES, SIGN_REGION_END, SIGN_STRIDE, STOP_RED_MIN_SAMPLES};
use serde::Serialize;
use spark_media::{Image, RGB};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrafficSign {
    Stop,
    GreenLight,
}

impl Display for TrafficSign {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TrafficSign::Stop => write!(f, "STOP"),
            TrafficSign::GreenLight => write!(f, "GREEN_LIGHT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SignReading {
    pub sign: Option<TrafficSign>,
    /// Red plus green sample count.
    pub confidence: u32,
}

#[inline]
fn is_stop_red(RGB(r, g, b): RGB) -> bool {
    r > 180 && g < 80 && b < 80
}

#[inline]
fn is_go_green(RGB(r, g, b): RGB) -> bool {
    r < 80 && g > 180 && b < 80
}

impl SignReading {
    /// Color-density thresholding over the upper half of the frame, sampled on a coarse
    /// grid. No shape analysis.
    pub fn detect(frame: &Image) -> Self {
        let end_y = (frame.get_height() as f64 * SIGN_REGION_END).floor() as u32;

        let mut red = 0u32;
        let mut green = 0u32;
        for y in (0..end_y).step_by(SIGN_STRIDE) {
            for x in (0..frame.get_width()).step_by(SIGN_STRIDE) {
                let pixel = frame.pixel(x, y);
                if is_stop_red(pixel) {
                    red += 1;
                }
                if is_go_green(pixel) {
                    green += 1;
                }
            }
        }

        Self::classify(red, green)
    }

    pub(crate) fn classify(red: u32, green: u32) -> Self {
        let sign = if red > STOP_RED_MIN_SAMPLES {
            Some(TrafficSign::Stop)
        } else if green > GO_GREEN_MIN_SAMPLES {
            Some(TrafficSign::GreenLight)
        } else {
            None
        };

        SignReading {
            sign,
            confidence: red + green,
        }
    }
}
