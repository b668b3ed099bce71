//! Form domain module.
//!
//! # Module Structure
//!
//! - `schema`: the `FormSchema` contract implemented by each wizard
//! - `container`: `FormContainer`, the single update entry point plus snapshots
//! - `derived`: summary generation (`strip_markup`, `truncate`)
//! - `collection`: pure editors over sub-record lists
//! - `transport`: encoding to and from the persistence collaborator
//! - `repository`: record persistence and draft snapshot traits

pub mod collection;
mod container;
pub mod derived;
mod repository;
mod schema;
pub mod transport;

pub use collection::{ClientId, CollectionOp, SubRecord, TagOp};
pub use container::{FormContainer, FormSnapshot};
pub use derived::SummaryPolicy;
pub use repository::{RecordRepository, SnapshotStore};
pub use schema::{DerivedRule, FormSchema, Hydrated, RecordKind};
pub use transport::{ParseWarning, PayloadReader, TransportOptions, TransportPayload, TransportValue};
