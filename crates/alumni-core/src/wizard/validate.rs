//! Field validators.
//!
//! Each wizard step declares its rule as a plain function built from the
//! presence and length checks below. A check returns the first [`FieldIssue`]
//! it finds; the step controller turns that into a [`ValidationError`] carrying
//! the step position.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single failed check on a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// A step-level validation failure, as surfaced next to a field or as a
/// transient notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Zero-based index of the failing step
    pub step: usize,
    /// Static identifier of the failing step (e.g. "basic")
    pub step_id: String,
    /// Name of the offending field
    pub field: String,
    /// User-facing message
    pub message: String,
}

impl ValidationError {
    pub fn from_issue(step: usize, step_id: &str, issue: FieldIssue) -> Self {
        Self {
            step,
            step_id: step_id.to_string(),
            field: issue.field.to_string(),
            message: issue.message,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {} ({}): {}: {}",
            self.step, self.step_id, self.field, self.message
        )
    }
}

impl std::error::Error for ValidationError {}

/// Length in characters (Unicode scalar values), not bytes.
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

pub fn require_text(field: &'static str, label: &str, value: &str) -> Result<(), FieldIssue> {
    if value.trim().is_empty() {
        return Err(FieldIssue::new(field, format!("{label} is required")));
    }
    Ok(())
}

pub fn max_chars(
    field: &'static str,
    label: &str,
    value: &str,
    max: usize,
) -> Result<(), FieldIssue> {
    if char_len(value) > max {
        return Err(FieldIssue::new(
            field,
            format!("{label} must be at most {max} characters"),
        ));
    }
    Ok(())
}

pub fn min_chars(
    field: &'static str,
    label: &str,
    value: &str,
    min: usize,
) -> Result<(), FieldIssue> {
    if char_len(value.trim()) < min {
        return Err(FieldIssue::new(
            field,
            format!("{label} must be at least {min} characters"),
        ));
    }
    Ok(())
}

pub fn require_some<T>(
    field: &'static str,
    label: &str,
    value: &Option<T>,
) -> Result<(), FieldIssue> {
    if value.is_none() {
        return Err(FieldIssue::new(field, format!("{label} is required")));
    }
    Ok(())
}

pub fn require_non_empty<T>(
    field: &'static str,
    label: &str,
    items: &[T],
) -> Result<(), FieldIssue> {
    if items.is_empty() {
        return Err(FieldIssue::new(
            field,
            format!("select at least one {label}"),
        ));
    }
    Ok(())
}

/// Runs `check` against every record, reporting the first failure with its
/// 1-based position prefixed to the message.
pub fn each_record<T>(
    items: &[T],
    check: impl Fn(&T) -> Result<(), FieldIssue>,
) -> Result<(), FieldIssue> {
    for (i, item) in items.iter().enumerate() {
        if let Err(issue) = check(item) {
            return Err(FieldIssue::new(
                issue.field,
                format!("item {}: {}", i + 1, issue.message),
            ));
        }
    }
    Ok(())
}
