mod filesystem;
mod memory;

pub use filesystem::FilesystemContentSource;
pub use memory::InMemoryContentSource;
