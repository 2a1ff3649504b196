pub mod analysis;
pub mod overlay;
pub mod property;

// --- Line detection ---
/// Normalized row where the road region starts; everything below is scanned.
pub(crate) const LINE_REGION_START: f64 = 0.6;
/// One side must outweigh the other by this factor to count as a turn.
pub(crate) const LINE_TIE_BREAK_FACTOR: f64 = 1.5;
/// Weighted mass is divided by this to get a deviation.
pub(crate) const LINE_DEVIATION_SCALE: f64 = 1000.0;
pub(crate) const MAX_DEVIATION: f64 = 100.0;

// --- Sign detection ---
/// Normalized row where the sign region ends; everything above is scanned.
pub(crate) const SIGN_REGION_END: f64 = 0.5;
/// Sampling stride in both axes.
pub(crate) const SIGN_STRIDE: usize = 5;
pub(crate) const STOP_RED_MIN_SAMPLES: u32 = 100;
pub(crate) const GO_GREEN_MIN_SAMPLES: u32 = 50;

// --- Obstacle detection ---
/// Half-width of the square window around the frame center.
pub(crate) const OBSTACLE_WINDOW_RADIUS: i64 = 50;
/// Summed channel difference against the right neighbour that marks an edge.
pub(crate) const EDGE_DIFF_THRESHOLD: u32 = 100;
pub(crate) const OBSTACLE_MIN_EDGES: u32 = 200;
/// Edges per centimeter of proximity.
pub(crate) const EDGES_PER_CM: f64 = 20.0;
pub(crate) const FAR_DISTANCE_CM: u32 = 100;
pub(crate) const MIN_DISTANCE_CM: f64 = 10.0;
