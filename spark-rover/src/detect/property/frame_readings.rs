use crate::detect::property::color::ColorReferenceSet;
use crate::detect::property::line::LineReading;
use crate::detect::property::obstacle::ObstacleReading;
use crate::detect::property::sign::SignReading;
use serde::Serialize;
use spark_media::Image;
use std::fmt::{Display, Formatter};

/// Everything the detectors saw in one frame. Lives for a single cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FrameReadings {
    pub line: LineReading,
    pub sign: SignReading,
    pub obstacle: ObstacleReading,
}

impl Display for FrameReadings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Line: {} ({:.1}, detected: {}), Sign: {} ({}), Obstacle: {} at {}cm",
            self.line.direction,
            self.line.deviation,
            self.line.detected,
            self.sign.sign.map_or("none".to_string(), |s| s.to_string()),
            self.sign.confidence,
            self.obstacle.detected,
            self.obstacle.distance
        )
    }
}

/// Runs the three detectors on the same read-only frame. They share nothing mutable,
/// so they run side by side on the rayon pool.
pub fn analyze_frame(frame: &Image, colors: &ColorReferenceSet) -> FrameReadings {
    let (line, (sign, obstacle)) = rayon::join(
        || LineReading::detect(frame, colors),
        || {
            rayon::join(
                || SignReading::detect(frame),
                || ObstacleReading::detect(frame),
            )
        },
    );

    FrameReadings {
        line,
        sign,
        obstacle,
    }
}
