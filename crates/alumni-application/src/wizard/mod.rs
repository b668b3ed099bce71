//! Wizard application services.
//!
//! - `session`: `WizardSession`, one open wizard with its cursor
//! - `submission`: `SubmissionPipeline`, validation plus the record call

mod session;
mod submission;

pub use session::WizardSession;
pub use submission::{SubmissionPipeline, SubmitError, SubmitMode, SubmitOutcome};
