pub mod classifier;
pub mod error;
pub mod month_windows;
