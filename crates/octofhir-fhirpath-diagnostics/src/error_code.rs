//! FHIRPath error codes following a structured numbering system
//!
//! Error code ranges:
//! - FP0001-FP0099: Construction errors (literals, operator tokens)
//! - FP0200-FP0299: Evaluation errors (runtime)
//! - FP0300-FP0399: Model errors (foreign-node navigation, conversion)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a construction error (0001-0099)
    pub const fn is_construction_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is an evaluation error (0200-0299)
    pub const fn is_evaluation_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if this is a model error (0300-0399)
    pub const fn is_model_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FP{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Construction errors (0001-0099)
    map.insert(1, ErrorInfo::new("Invalid expression"));
    map.insert(2, ErrorInfo::new("Invalid number literal"));
    map.insert(
        3,
        ErrorInfo::new("Invalid date/time literal")
            .with_help("Dates use YYYY[-MM[-DD]], times use HH[:MM[:SS[.fff]]]"),
    );
    map.insert(
        4,
        ErrorInfo::new("Invalid quantity literal")
            .with_help("Quantities are a number followed by a unit word or a quoted UCUM code"),
    );
    map.insert(5, ErrorInfo::new("Invalid string escape sequence"));
    map.insert(15, ErrorInfo::new("Invalid operator"));

    // Evaluation errors (0200-0299)
    map.insert(200, ErrorInfo::new("Type mismatch"));
    map.insert(201, ErrorInfo::new("Operands cannot be compared"));
    map.insert(
        202,
        ErrorInfo::new("Incompatible units")
            .with_help("Quantity units must share a root unit family"),
    );
    map.insert(203, ErrorInfo::new("Arithmetic overflow"));
    map.insert(204, ErrorInfo::new("Invalid operand"));
    map.insert(205, ErrorInfo::new("Unit exponent out of range"));
    map.insert(206, ErrorInfo::new("Date/time out of range"));
    map.insert(207, ErrorInfo::new("Recursion limit exceeded"));
    map.insert(208, ErrorInfo::new("Singleton collection required"));

    // Model errors (0300-0399)
    map.insert(300, ErrorInfo::new("Navigation failed"));
    map.insert(301, ErrorInfo::new("Value conversion failed"));

    map
});

// Construction errors
pub const FP0001: ErrorCode = ErrorCode::new(1);
pub const FP0002: ErrorCode = ErrorCode::new(2);
pub const FP0003: ErrorCode = ErrorCode::new(3);
pub const FP0004: ErrorCode = ErrorCode::new(4);
pub const FP0005: ErrorCode = ErrorCode::new(5);
pub const FP0015: ErrorCode = ErrorCode::new(15);

// Evaluation errors
pub const FP0200: ErrorCode = ErrorCode::new(200);
pub const FP0201: ErrorCode = ErrorCode::new(201);
pub const FP0202: ErrorCode = ErrorCode::new(202);
pub const FP0203: ErrorCode = ErrorCode::new(203);
pub const FP0204: ErrorCode = ErrorCode::new(204);
pub const FP0205: ErrorCode = ErrorCode::new(205);
pub const FP0206: ErrorCode = ErrorCode::new(206);
pub const FP0207: ErrorCode = ErrorCode::new(207);
pub const FP0208: ErrorCode = ErrorCode::new(208);

// Model errors
pub const FP0300: ErrorCode = ErrorCode::new(300);
pub const FP0301: ErrorCode = ErrorCode::new(301);
