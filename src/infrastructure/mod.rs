pub mod content;
pub mod time;
pub mod util;
