pub mod color;
pub mod format;
pub mod time;
