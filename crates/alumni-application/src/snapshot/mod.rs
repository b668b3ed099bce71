//! Draft snapshot stores that need no infrastructure.

mod cache;

pub use cache::MemorySnapshotStore;
