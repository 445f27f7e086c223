pub mod source;
pub mod time;

pub use source::FailingSource;
pub use time::{fixed_clock, fixed_now};
