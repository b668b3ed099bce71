//! Static step declarations.

use super::validate::FieldIssue;
use std::fmt;

/// Validator signature shared by every step.
pub type StepValidator<S> = fn(&S) -> Result<(), FieldIssue>;

/// One page of a wizard: identity, title and the rule gating forward
/// navigation out of it.
pub struct Step<S> {
    pub id: &'static str,
    pub title: &'static str,
    validator: StepValidator<S>,
}

impl<S> Step<S> {
    pub fn new(id: &'static str, title: &'static str, validator: StepValidator<S>) -> Self {
        Self {
            id,
            title,
            validator,
        }
    }

    /// A step without mandatory fields; always passes.
    pub fn optional(id: &'static str, title: &'static str) -> Self {
        Self::new(id, title, always_passes::<S>)
    }

    pub fn check(&self, state: &S) -> Result<(), FieldIssue> {
        (self.validator)(state)
    }
}

fn always_passes<S>(_: &S) -> Result<(), FieldIssue> {
    Ok(())
}

impl<S> Clone for Step<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Step<S> {}

impl<S> fmt::Debug for Step<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("id", &self.id)
            .field("title", &self.title)
            .finish()
    }
}
