use crate::detect::property::color::ColorReferenceSet;
use crate::detect::property::frame_readings::FrameReadings;
use crate::detect::property::line::line_match_mask;
use anyhow::Result;
use serde::Serialize;
use spark_media::image::util::draw::ApplyMask;
use spark_media::{Image, RGB};

pub(crate) const ZONE_COLOR: RGB = RGB(102, 126, 234);
pub(crate) const ALERT_COLOR: RGB = RGB(245, 87, 108);
pub(crate) const MATCH_TINT: RGB = RGB(0, 96, 0);
const ZONE_THICKNESS: u32 = 2;
const OBSTACLE_ZONE_RADIUS: i64 = 50;
/// Text is not rasterized; a label is marked by a tag of this size at its anchor.
const LABEL_TAG_SIZE: u32 = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum OverlayShape {
    Rect {
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        color: [u8; 3],
    },
    Circle {
        x: i64,
        y: i64,
        radius: i64,
        color: [u8; 3],
    },
    Text {
        x: i64,
        y: i64,
        text: String,
        color: [u8; 3],
    },
}

/// Detection zones and labels for one frame, in frame pixel coordinates.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Overlay {
    pub width: u32,
    pub height: u32,
    pub shapes: Vec<OverlayShape>,
}

fn rgb(color: RGB) -> [u8; 3] {
    [color.0, color.1, color.2]
}

impl Overlay {
    pub fn describe(width: u32, height: u32, readings: &FrameReadings) -> Self {
        let w = width as i64;
        let h = height as f64;
        let mut shapes = vec![
            OverlayShape::Rect {
                x: 10,
                y: (h * 0.6) as i64,
                width: w - 20,
                height: (h * 0.35) as i64,
                color: rgb(ZONE_COLOR),
            },
            OverlayShape::Rect {
                x: 10,
                y: 10,
                width: w - 20,
                height: (h * 0.4) as i64,
                color: rgb(ZONE_COLOR),
            },
            OverlayShape::Circle {
                x: w / 2,
                y: height as i64 / 2,
                radius: OBSTACLE_ZONE_RADIUS,
                color: rgb(ALERT_COLOR),
            },
        ];

        if readings.line.detected {
            shapes.push(OverlayShape::Text {
                x: 20,
                y: height as i64 - 20,
                text: readings.line.direction.to_string(),
                color: rgb(ZONE_COLOR),
            });
        }
        if let Some(sign) = readings.sign.sign {
            shapes.push(OverlayShape::Text {
                x: w / 2 - 50,
                y: 50,
                text: sign.to_string(),
                color: rgb(ALERT_COLOR),
            });
        }

        Overlay {
            width,
            height,
            shapes,
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(|shape| match shape {
            OverlayShape::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn render_onto(&self, frame: &mut Image) {
        for shape in &self.shapes {
            match shape {
                OverlayShape::Rect {
                    x,
                    y,
                    width,
                    height,
                    color,
                } => frame.stroke_rect(*x, *y, *width, *height, ZONE_THICKNESS, RGB::from(*color)),
                OverlayShape::Circle { x, y, radius, color } => {
                    frame.stroke_circle(*x, *y, *radius, RGB::from(*color));
                    frame.stroke_circle(*x, *y, *radius - 1, RGB::from(*color));
                }
                OverlayShape::Text { x, y, color, .. } => {
                    let top = (*y - LABEL_TAG_SIZE as i64).max(0) as u32;
                    frame.fill_rect((*x).max(0) as u32, top, LABEL_TAG_SIZE, LABEL_TAG_SIZE, RGB::from(*color));
                }
            }
        }
    }
}

/// Debug snapshot: the frame with matched line pixels tinted and the overlay drawn on top.
pub fn annotate(frame: &Image, colors: &ColorReferenceSet, overlay: &Overlay) -> Result<Image> {
    let mut annotated = frame.clone();
    let mask = line_match_mask(frame, colors);
    annotated.layering_mask(&mask, MATCH_TINT)?;
    overlay.render_onto(&mut annotated);
    Ok(annotated)
}
