//! Validation error types for StatForge models
//!
//! These cover request decoding at the edges (granularity names, registry
//! keys, site domains). The composition functions themselves never fail.

use std::fmt;
use thiserror::Error;

/// Main validation error type
#[derive(Error, Debug, Clone)]
pub struct ValidationError {
    /// The kind of validation error
    pub kind: ValidationErrorKind,
    /// The field that failed validation
    pub field: String,
    /// Optional additional context
    pub context: Option<String>,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(kind: ValidationErrorKind, field: impl Into<String>) -> Self {
        Self {
            kind,
            field: field.into(),
            context: None,
        }
    }

    /// Create a validation error with additional context
    pub fn with_context(
        kind: ValidationErrorKind,
        field: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            field: field.into(),
            context: Some(context.into()),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(ctx) => write!(
                f,
                "Validation failed for field '{}': {} - {}",
                self.field, self.kind, ctx
            ),
            None => write!(
                f,
                "Validation failed for field '{}': {}",
                self.field, self.kind
            ),
        }
    }
}

/// Specific validation error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Granularity is not one of the supported bucket sizes
    #[error("Invalid granularity (expected: daily or hourly)")]
    InvalidGranularity,

    /// Registry key is not a bare domain
    #[error("Invalid domain (expected a bare hostname without scheme or path)")]
    InvalidDomain,

    /// Referrer type in the registry is not recognized
    #[error("Invalid referrer type")]
    InvalidReferrerType,

    /// Field is required but missing
    #[error("Required field is missing")]
    RequiredField,

    /// Custom validation error
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Convert validation errors to application errors
impl From<ValidationError> for crate::error::Error {
    fn from(err: ValidationError) -> Self {
        crate::error::Error::validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_creation() {
        let error = ValidationError::new(ValidationErrorKind::InvalidGranularity, "granularity");
        assert_eq!(error.field, "granularity");
        assert!(error.context.is_none());
    }

    #[test]
    fn test_validation_error_display() {
        let error = ValidationError::with_context(
            ValidationErrorKind::InvalidDomain,
            "registry",
            "key 'https://bing.com' has a scheme",
        );
        let display = error.to_string();
        assert!(display.contains("registry"));
        assert!(display.contains("bare hostname"));
        assert!(display.contains("has a scheme"));
    }

    #[test]
    fn test_conversion_into_app_error() {
        let error = ValidationError::new(ValidationErrorKind::RequiredField, "rows");
        let app: crate::error::Error = error.into();
        assert!(matches!(app, crate::error::Error::Validation(_)));
    }
}
