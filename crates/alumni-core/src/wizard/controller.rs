//! Step controller: the wizard's cursor state machine.
//!
//! States are step indices `0..N`. Forward moves are gated by the current
//! step's validator; backward moves never are.

use super::step::Step;
use super::validate::ValidationError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    /// Forward navigation refused because the current step is invalid
    #[error("cannot advance: {0}")]
    Blocked(ValidationError),

    #[error("invalid step index {target}; step_count={len}")]
    OutOfRange { target: usize, len: usize },

    #[error("a wizard needs at least one step")]
    NoSteps,
}

/// Ordered steps plus the cursor into them.
///
/// Invariant: `0 <= cursor < steps.len()`.
#[derive(Debug, Clone)]
pub struct StepController<S> {
    steps: Vec<Step<S>>,
    cursor: usize,
}

impl<S> StepController<S> {
    pub fn new(steps: Vec<Step<S>>) -> Result<Self, WizardError> {
        if steps.is_empty() {
            return Err(WizardError::NoSteps);
        }
        Ok(Self { steps, cursor: 0 })
    }

    pub fn current(&self) -> usize {
        self.cursor
    }

    pub fn current_step(&self) -> &Step<S> {
        &self.steps[self.cursor]
    }

    pub fn steps(&self) -> &[Step<S>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_first(&self) -> bool {
        self.cursor == 0
    }

    /// Submission is offered from the last step only.
    pub fn is_last(&self) -> bool {
        self.cursor + 1 == self.steps.len()
    }

    /// 1-based position and total, for "Step 2 of 4" labels.
    pub fn progress(&self) -> (usize, usize) {
        (self.cursor + 1, self.steps.len())
    }

    /// Validates a single step against `state`.
    pub fn validate(&self, step: usize, state: &S) -> Result<(), WizardError> {
        let s = self.steps.get(step).ok_or(WizardError::OutOfRange {
            target: step,
            len: self.steps.len(),
        })?;
        s.check(state).map_err(|issue| {
            let err = ValidationError::from_issue(step, s.id, issue);
            tracing::debug!(
                "[Wizard] step {} ({}) rejected field '{}': {}",
                step,
                s.id,
                err.field,
                err.message
            );
            WizardError::Blocked(err)
        })
    }

    /// Validates every step in order, returning the first failure.
    pub fn validate_all(&self, state: &S) -> Result<(), ValidationError> {
        for (i, s) in self.steps.iter().enumerate() {
            if let Err(issue) = s.check(state) {
                return Err(ValidationError::from_issue(i, s.id, issue));
            }
        }
        Ok(())
    }

    /// Advances one step if the current step validates. At the last step a
    /// successful validation leaves the cursor where it is.
    pub fn next(&mut self, state: &S) -> Result<usize, WizardError> {
        self.validate(self.cursor, state)?;
        self.cursor = (self.cursor + 1).min(self.steps.len() - 1);
        Ok(self.cursor)
    }

    /// Moves back one step, clamped at the first step.
    pub fn prev(&mut self) -> usize {
        self.cursor = self.cursor.saturating_sub(1);
        self.cursor
    }

    /// Jumps to `target`. Backward jumps are unconditional; forward jumps
    /// require the current step to validate.
    pub fn go_to(&mut self, target: usize, state: &S) -> Result<usize, WizardError> {
        if target >= self.steps.len() {
            return Err(WizardError::OutOfRange {
                target,
                len: self.steps.len(),
            });
        }
        if target > self.cursor {
            self.validate(self.cursor, state)?;
        }
        self.cursor = target;
        Ok(self.cursor)
    }

    /// Moves the cursor without validation. Used to surface a failing step
    /// after whole-document validation.
    pub fn force(&mut self, step: usize) -> Result<(), WizardError> {
        if step >= self.steps.len() {
            return Err(WizardError::OutOfRange {
                target: step,
                len: self.steps.len(),
            });
        }
        self.cursor = step;
        Ok(())
    }

    /// Restores a persisted cursor, clamping stale values into range.
    pub fn restore_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.steps.len() - 1);
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
