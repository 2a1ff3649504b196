pub mod color;
pub mod frame_readings;
pub mod line;
pub mod obstacle;
pub mod sign;
