//! Domain error type.

use thiserror::Error;

/// A business-rule failure carrying one human-readable message.
///
/// Every domain operation reports failures through this type; the caller
/// surfaces the message verbatim. Storage failures are never passed
/// through — each service translates them into a generic variant with an
/// operation-specific message and logs the underlying cause.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A validation rule was violated.
    #[error("{0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness rule was violated.
    #[error("{0}")]
    Duplicate(String),
}

impl DomainError {
    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        match self {
            DomainError::Validation(msg)
            | DomainError::NotFound(msg)
            | DomainError::Duplicate(msg) => msg,
        }
    }
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_the_message_alone() {
        let err = DomainError::Validation("some product codes do not exist".to_string());
        assert_eq!(err.to_string(), "some product codes do not exist");
        assert_eq!(err.message(), "some product codes do not exist");
    }
}
