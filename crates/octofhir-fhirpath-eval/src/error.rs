//! Evaluation errors for the FHIRPath engine
//!
//! These are the fatal outcomes of an evaluation call. An empty result is
//! not an error and travels as `Ok(None)`; the two channels never merge.

use octofhir_fhirpath_diagnostics::{
    ErrorCode, FhirPathError, FP0200, FP0201, FP0202, FP0203, FP0204, FP0205, FP0206, FP0207,
    FP0208, FP0300, FP0301,
};
use octofhir_fhirpath_system::{ModelError, QuantityError, TemporalError};
use thiserror::Error;

/// Result type for evaluation operations. `Ok(None)` is the empty result.
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors that abort the current evaluation call
#[derive(Debug, Error, Clone)]
pub enum EvalError {
    /// Operand kind does not fit the operator
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Operand kinds can never be ordered against each other
    #[error("Cannot compare {left} with {right}")]
    NotComparable { left: String, right: String },

    /// Quantity units from different families
    #[error("Incompatible units: {left} and {right}")]
    IncompatibleUnits { left: String, right: String },

    /// Merged unit exponent left the supported 1..=3 range
    #[error("Unit exponent {exp} out of range")]
    ExponentOutOfRange { exp: i8 },

    /// Arithmetic overflow
    #[error("Arithmetic overflow in {operation}")]
    Overflow { operation: String },

    /// Temporal arithmetic left the supported calendar range
    #[error("Date/time out of range: {message}")]
    DateTimeOutOfRange { message: String },

    /// Operand value is unusable for the operator
    #[error("Invalid operand for {operator}: {message}")]
    InvalidOperand { operator: String, message: String },

    /// An operand collection held more than one item where one was required
    #[error("Expected a singleton collection, found {count} items")]
    SingletonRequired { count: usize },

    /// Expression nesting exceeded the context's depth limit
    #[error("Maximum recursion depth {depth} exceeded")]
    RecursionLimit { depth: usize },

    /// Unsupported operator for the given operand kinds
    #[error("Unsupported operator: {operator} for types {types}")]
    UnsupportedOperator { operator: String, types: String },

    /// A tree with construction diagnostics was evaluated anyway
    #[error("Expression was built with errors: {message}")]
    InvalidExpression { message: String },

    /// Model adapter failure during navigation or conversion
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl EvalError {
    /// Create a type mismatch error
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an error for operand kinds that can never be ordered
    pub fn not_comparable(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::NotComparable {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Create an invalid operand error
    pub fn invalid_operand(operator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOperand {
            operator: operator.into(),
            message: message.into(),
        }
    }

    /// Create an overflow error
    pub fn overflow(operation: impl Into<String>) -> Self {
        Self::Overflow {
            operation: operation.into(),
        }
    }

    /// Create an unsupported operator error
    pub fn unsupported_operator(operator: impl Into<String>, types: impl Into<String>) -> Self {
        Self::UnsupportedOperator {
            operator: operator.into(),
            types: types.into(),
        }
    }

    /// Create an invalid expression error
    pub fn invalid_expression(message: impl Into<String>) -> Self {
        Self::InvalidExpression {
            message: message.into(),
        }
    }

    /// Diagnostic code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::TypeMismatch { .. } => FP0200,
            Self::NotComparable { .. } => FP0201,
            Self::IncompatibleUnits { .. } => FP0202,
            Self::Overflow { .. } => FP0203,
            Self::InvalidOperand { .. } | Self::InvalidExpression { .. } => FP0204,
            Self::ExponentOutOfRange { .. } => FP0205,
            Self::DateTimeOutOfRange { .. } => FP0206,
            Self::RecursionLimit { .. } => FP0207,
            Self::SingletonRequired { .. } => FP0208,
            Self::UnsupportedOperator { .. } => FP0200,
            Self::Model(err) => match err {
                ModelError::NavigationFailed(_) => FP0300,
                _ => FP0301,
            },
        }
    }
}

impl From<TemporalError> for EvalError {
    fn from(err: TemporalError) -> Self {
        match err {
            TemporalError::InvalidUnit { unit, kind } => Self::InvalidOperand {
                operator: "+".to_string(),
                message: format!("unit '{unit}' cannot be added to a {kind}"),
            },
            TemporalError::YearOutOfRange { year } => Self::DateTimeOutOfRange {
                message: format!("resulting year {year} is outside 1..=9999"),
            },
            TemporalError::Overflow => Self::Overflow {
                operation: "date/time arithmetic".to_string(),
            },
        }
    }
}

impl From<QuantityError> for EvalError {
    fn from(err: QuantityError) -> Self {
        match err {
            QuantityError::IncompatibleUnits { left, right } => {
                Self::IncompatibleUnits { left, right }
            }
            QuantityError::ExponentOutOfRange { exp } => Self::ExponentOutOfRange { exp },
            QuantityError::Overflow => Self::Overflow {
                operation: "quantity arithmetic".to_string(),
            },
        }
    }
}

impl From<EvalError> for FhirPathError {
    fn from(err: EvalError) -> Self {
        FhirPathError::evaluation(err.code(), err.to_string())
    }
}
