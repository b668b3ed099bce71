//! Local adapters for the alumni content tools.
//!
//! # Module Structure
//!
//! - `paths`: platform directories (`dirs`)
//! - `storage`: crash-safe TOML/JSON files
//! - `config_service`: cached `config.toml` loading
//! - `snapshot_repository`: file-backed wizard draft snapshots
//! - `logging`: tracing subscriber with daily rolling files

pub mod config_service;
pub mod logging;
pub mod paths;
pub mod snapshot_repository;
pub mod storage;

pub use config_service::ConfigService;
pub use logging::init_tracing;
pub use paths::{AlumniPaths, PathError};
pub use snapshot_repository::FileSnapshotStore;
pub use storage::{AtomicFile, StorageError};
