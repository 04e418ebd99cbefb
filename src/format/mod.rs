pub mod date;
pub mod duration;

pub use date::{DateFormat, format_publish_date};
pub use duration::format_duration;
