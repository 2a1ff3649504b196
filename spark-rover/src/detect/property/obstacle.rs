use crate::detect::{
    EDGES_PER_CM, EDGE_DIFF_THRESHOLD, FAR_DISTANCE_CM, MIN_DISTANCE_CM, OBSTACLE_MIN_EDGES,
    OBSTACLE_WINDOW_RADIUS,
};
use serde::Serialize;
use spark_media::Image;

/// Texture-density proxy for something close in front of the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObstacleReading {
    pub detected: bool,
    /// Estimated proximity in whole centimeters, never below 10.
    pub distance: u32,
    pub edge_count: u32,
}

impl Default for ObstacleReading {
    fn default() -> Self {
        ObstacleReading {
            detected: false,
            distance: FAR_DISTANCE_CM,
            edge_count: 0,
        }
    }
}

impl ObstacleReading {
    /// Counts abrupt horizontal color changes inside the central window.
    pub fn detect(frame: &Image) -> Self {
        Self::from_edges(count_center_edges(frame))
    }

    pub(crate) fn from_edges(edge_count: u32) -> Self {
        if edge_count <= OBSTACLE_MIN_EDGES {
            return ObstacleReading {
                edge_count,
                ..Default::default()
            };
        }

        let estimate = (FAR_DISTANCE_CM as f64 - edge_count as f64 / EDGES_PER_CM).max(MIN_DISTANCE_CM);
        ObstacleReading {
            detected: true,
            // Half-up rounding; the estimate is always positive.
            distance: (estimate + 0.5).floor() as u32,
            edge_count,
        }
    }
}

fn count_center_edges(frame: &Image) -> u32 {
    let width = frame.get_width() as i64;
    let height = frame.get_height() as i64;
    let center_x = width / 2;
    let center_y = height / 2;

    let mut edges = 0;
    for y in center_y - OBSTACLE_WINDOW_RADIUS..center_y + OBSTACLE_WINDOW_RADIUS {
        // Border rows and columns have no full neighbourhood.
        if y <= 0 || y >= height - 1 {
            continue;
        }
        for x in center_x - OBSTACLE_WINDOW_RADIUS..center_x + OBSTACLE_WINDOW_RADIUS {
            if x <= 0 || x >= width - 1 {
                continue;
            }
            let here = frame.pixel(x as u32, y as u32);
            let next = frame.pixel(x as u32 + 1, y as u32);
            if here.channel_distance(&next) > EDGE_DIFF_THRESHOLD {
                edges += 1;
            }
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use spark_media::RGB;

    /// Vertical stripes every other column: every pixel in the window is an edge.
    fn striped(width: u32, height: u32) -> Image {
        let mut frame = Image::filled(width, height, RGB::BLACK);
        for x in (0..width).step_by(2) {
            frame.fill_rect(x, 0, 1, height, RGB::WHITE);
        }
        frame
    }

    #[test]
    fn uniform_window_has_no_obstacle() {
        let reading = ObstacleReading::detect(&Image::filled(640, 480, RGB(120, 80, 40)));
        assert!(!reading.detected);
        assert_eq!(reading.distance, 100);
        assert_eq!(reading.edge_count, 0);
    }

    #[test]
    fn dense_texture_is_close() {
        let reading = ObstacleReading::detect(&striped(640, 480));
        // 100 x 100 window, all edges: 100 - 10000/20 clamps to the floor.
        assert_eq!(reading.edge_count, 10_000);
        assert!(reading.detected);
        assert_eq!(reading.distance, 10);
    }

    #[test]
    fn window_is_clipped_on_small_frames() {
        // 20x10 frame: interior x in 1..19 and y in 1..9.
        let reading = ObstacleReading::detect(&striped(20, 10));
        assert_eq!(reading.edge_count, 18 * 8);
        assert!(!reading.detected);
    }

    #[test]
    fn distance_estimate_and_rounding() {
        assert_eq!(ObstacleReading::from_edges(200), ObstacleReading { edge_count: 200, ..Default::default() });
        assert_eq!(ObstacleReading::from_edges(201).distance, 90);
        assert_eq!(ObstacleReading::from_edges(210).distance, 90);
        assert_eq!(ObstacleReading::from_edges(1_000).distance, 50);
        assert_eq!(ObstacleReading::from_edges(1_790).distance, 11);
        assert_eq!(ObstacleReading::from_edges(5_000).distance, 10);
    }
}
