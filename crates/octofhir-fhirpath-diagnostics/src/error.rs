//! FHIRPath error types

use crate::{ErrorCode, SourceLocation, Span};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Error - construction or evaluation cannot proceed
    Error,
    /// Warning - potential issue but can continue
    Warning,
    /// Information - informational message
    Info,
    /// Hint - suggestion for improvement
    Hint,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
            Severity::Hint => write!(f, "hint"),
        }
    }
}

/// A diagnostic message with location and context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub severity: Severity,
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Source location
    pub location: Option<SourceLocation>,
    /// Additional context or help
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            location: None,
            help: None,
        }
    }

    /// Create a new warning diagnostic
    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            location: None,
            help: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the location from line and column
    pub fn at(self, line: usize, column: usize) -> Self {
        self.with_location(SourceLocation::point(line, column))
    }

    /// Set the span (converts to location using provided source)
    pub fn with_span(mut self, span: Span, source: &str) -> Self {
        self.location = Some(SourceLocation::from_span(span, source));
        self
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.severity, self.code, self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " at {loc}")?;
        }
        Ok(())
    }
}

/// Main FHIRPath error type
#[derive(Debug, Clone, Error)]
pub enum FhirPathError {
    /// Expression construction error (bad literal, unknown operator token)
    #[error("{code}: {message}")]
    Construction {
        code: ErrorCode,
        message: String,
        location: Option<SourceLocation>,
    },

    /// Evaluation error
    #[error("{code}: {message}")]
    Evaluation {
        code: ErrorCode,
        message: String,
        location: Option<SourceLocation>,
    },

    /// Model error (foreign-node navigation or conversion)
    #[error("{code}: {message}")]
    Model { code: ErrorCode, message: String },

    /// Multiple errors collected
    #[error("Multiple errors: {}", .0.len())]
    Multiple(Vec<FhirPathError>),
}

impl FhirPathError {
    /// Create a construction error
    pub fn construction(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Construction {
            code,
            message: message.into(),
            location: None,
        }
    }

    /// Create a construction error with location
    pub fn construction_at(
        code: ErrorCode,
        message: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self::Construction {
            code,
            message: message.into(),
            location: Some(location),
        }
    }

    /// Create an evaluation error
    pub fn evaluation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Evaluation {
            code,
            message: message.into(),
            location: None,
        }
    }

    /// Create a model error
    pub fn model(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Model {
            code,
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Construction { code, .. } => *code,
            Self::Evaluation { code, .. } => *code,
            Self::Model { code, .. } => *code,
            Self::Multiple(errors) => errors.first().map(|e| e.code()).unwrap_or(ErrorCode::new(0)),
        }
    }

    /// Get the location if available
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::Construction { location, .. } => location.as_ref(),
            Self::Evaluation { location, .. } => location.as_ref(),
            _ => None,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Construction {
                code,
                message,
                location,
            }
            | Self::Evaluation {
                code,
                message,
                location,
            } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(loc) = location {
                    diag = diag.with_location(*loc);
                }
                diag
            }
            Self::Model { code, message } => Diagnostic::error(*code, message.clone()),
            Self::Multiple(errors) => {
                if let Some(first) = errors.first() {
                    first.to_diagnostic()
                } else {
                    Diagnostic::error(ErrorCode::new(0), "Unknown error")
                }
            }
        }
    }
}

impl From<Diagnostic> for FhirPathError {
    fn from(diag: Diagnostic) -> Self {
        let mut err = Self::construction(diag.code, diag.message);
        if let (Self::Construction { location, .. }, Some(loc)) = (&mut err, diag.location) {
            *location = Some(loc);
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FP0003, FP0202};

    #[test]
    fn test_construction_error_location() {
        let err = FhirPathError::construction_at(
            FP0003,
            "invalid date literal '20x8'",
            SourceLocation::new(1, 10, 9, 4),
        );

        assert!(matches!(err, FhirPathError::Construction { .. }));
        assert_eq!(err.code(), FP0003);
        assert_eq!(err.location().map(|l| (l.line, l.column)), Some((1, 10)));
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error(FP0202, "units 'a' and 'g' are not comparable")
            .with_location(SourceLocation::new(1, 5, 4, 1));

        assert!(diag.to_string().contains("FP0202"));
        assert!(diag.to_string().contains("1:5"));
    }

    #[test]
    fn test_diagnostic_round_trip_to_error() {
        let diag = Diagnostic::error(FP0003, "bad time").at(2, 7);
        let err: FhirPathError = diag.into();
        assert_eq!(err.location().map(|l| l.line), Some(2));
        assert_eq!(err.to_diagnostic().message, "bad time");
    }
}
