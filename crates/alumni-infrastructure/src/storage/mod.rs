//! Local file storage.
//!
//! - `atomic_file`: crash-safe typed TOML/JSON documents

mod atomic_file;

pub use atomic_file::{AtomicFile, FileFormat, StorageError, read_text, write_atomic};
