//! Wizard domain module.
//!
//! # Module Structure
//!
//! - `validate`: field checks and the `ValidationError` they produce
//! - `step`: static step declarations (`Step`)
//! - `controller`: the cursor state machine (`StepController`)

mod controller;
mod step;
pub mod validate;

pub use controller::{StepController, WizardError};
pub use step::{Step, StepValidator};
pub use validate::{FieldIssue, ValidationError};
