//! FHIRPath diagnostics and error handling
//!
//! This crate provides the error handling infrastructure for the FHIRPath
//! engine: error codes, source locations, the construction-time diagnostic
//! collector, and the library error type.

mod collector;
mod error;
mod error_code;
mod span;

pub use collector::*;
pub use error::*;
pub use error_code::*;
pub use span::*;

/// Result type for FHIRPath operations
pub type Result<T> = std::result::Result<T, FhirPathError>;
