pub mod edit_raw;
pub mod save_image;
