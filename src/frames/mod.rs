pub mod daily_frame;
pub mod grid_frame;
