//! Form state container.
//!
//! Owns one schema instance, applies updates through a single entry point
//! and keeps the derived field in step with its sources.

use super::derived::SummaryPolicy;
use super::schema::{DerivedRule, FormSchema};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Point-in-time copy of an in-progress form, for crash recovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSnapshot<S> {
    pub state: S,
    pub cursor: usize,
    #[serde(default)]
    pub derived_pinned: bool,
    /// RFC 3339 timestamp
    pub taken_at: String,
}

#[derive(Debug, Clone)]
pub struct FormContainer<S: FormSchema> {
    state: S,
    policy: SummaryPolicy,
    /// Set when the user edited the derived field under `KeepManualEdits`
    derived_pinned: bool,
    revision: u64,
}

impl<S: FormSchema> FormContainer<S> {
    pub fn new(policy: SummaryPolicy) -> Self {
        Self::hydrate(S::default(), policy)
    }

    /// Wraps an existing record. The derived field keeps its stored value
    /// until a source field changes.
    pub fn hydrate(state: S, policy: SummaryPolicy) -> Self {
        Self {
            state,
            policy,
            derived_pinned: false,
            revision: 0,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn into_state(self) -> S {
        self.state
    }

    pub fn policy(&self) -> SummaryPolicy {
        self.policy
    }

    /// Number of updates applied since creation or the last restore.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_derived_pinned(&self) -> bool {
        self.derived_pinned
    }

    /// The single mutation entry point.
    ///
    /// Returns `true` when the update also rewrote the derived field.
    pub fn update(&mut self, update: S::Update) -> bool {
        let field = S::field_of(&update);
        self.state.apply(update);
        self.revision += 1;

        let Some(rule) = S::derived_rule() else {
            return false;
        };

        if field == rule.target {
            if self.policy == SummaryPolicy::KeepManualEdits {
                // clearing the field hands it back to auto-generation
                self.derived_pinned = !(rule.read)(&self.state).trim().is_empty();
            }
            return false;
        }

        if rule.sources.contains(&field) {
            return self.recompute(&rule);
        }
        false
    }

    /// Drops a manual pin and regenerates the derived field.
    pub fn reset_derived(&mut self) -> bool {
        self.derived_pinned = false;
        match S::derived_rule() {
            Some(rule) => self.recompute(&rule),
            None => false,
        }
    }

    fn recompute(&mut self, rule: &DerivedRule<S>) -> bool {
        if self.policy == SummaryPolicy::KeepManualEdits && self.derived_pinned {
            tracing::debug!(
                "[Form] {:?} pinned by manual edit, skipping recompute",
                rule.target
            );
            return false;
        }
        let next = (rule.compute)(&self.state);
        if (rule.read)(&self.state) == next {
            return false;
        }
        (rule.write)(&mut self.state, next);
        true
    }

    pub fn snapshot(&self, cursor: usize) -> FormSnapshot<S> {
        FormSnapshot {
            state: self.state.clone(),
            cursor,
            derived_pinned: self.derived_pinned,
            taken_at: Utc::now().to_rfc3339(),
        }
    }

    /// Replaces the state with a snapshot and returns the cursor it recorded.
    ///
    /// Sub-records get fresh client ids, so they can be edited after resume.
    pub fn restore(&mut self, snapshot: FormSnapshot<S>) -> usize {
        self.state = snapshot.state;
        self.state.reassign_ids();
        self.derived_pinned = snapshot.derived_pinned;
        self.revision = 0;
        snapshot.cursor
    }
}
