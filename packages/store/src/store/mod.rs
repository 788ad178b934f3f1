//! Built-in loader implementations

mod file_store;

pub use file_store::FileLoader;
