//! Presence checks for outgoing payloads.

/// Errors raised when a required field is missing from a payload.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was empty or blank.
    #[error("{0} is required")]
    Missing(&'static str),
}

/// Reject empty or whitespace-only values for a required field.
pub(crate) fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Missing(field));
    }
    Ok(())
}
