//! Application services

pub mod directory;

pub use directory::{DirectoryService, InputFormat};
