//! Domain layer of the alumni portal content tools.
//!
//! Multi-step content wizards (news, reports, biographies) with validation
//! gating and a derived summary field, the nested comment tree of the social
//! feed, and notification drafts. Nothing here performs I/O; remote calls go
//! through the traits in [`repository`].

pub mod comment;
pub mod config;
pub mod content;
pub mod error;
pub mod form;
pub mod notification;
pub mod repository;
pub mod sequence;
pub mod wizard;

pub use config::AlumniConfig;
pub use error::{AlumniError, Result, TransportError};
pub use form::{FormContainer, FormSchema, RecordKind};
pub use wizard::{StepController, ValidationError, WizardError};
