//! Storage layer: atomic file writes and the file-backed key/value store.

mod atomic_file;
mod file_store;

pub use atomic_file::write_atomic;
pub use file_store::FileKeyValueStore;
