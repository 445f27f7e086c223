pub mod dto;
pub mod error;
pub mod pipeline;
pub mod ports;

pub use error::ApplicationResult;
