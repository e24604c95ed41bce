//! Diagnostic collector for expression construction
//!
//! Evaluator constructors never fail hard: a bad operator token or a
//! malformed literal is recorded here and construction continues, so one
//! pass over an expression surfaces every problem. A tree built with a
//! non-empty collector must be rejected before evaluation.

use crate::{Diagnostic, ErrorCode, FhirPathError, Severity, FP0001};

/// Accumulates diagnostics during expression-tree construction.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error at a line/column position
    pub fn add_error(&mut self, line: usize, column: usize, message: impl Into<String>) {
        self.items
            .push(Diagnostic::error(FP0001, message).at(line, column));
    }

    /// Record an error with a specific code at a line/column position
    pub fn add_error_with_code(
        &mut self,
        code: ErrorCode,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) {
        self.items
            .push(Diagnostic::error(code, message).at(line, column));
    }

    /// Record a pre-built diagnostic
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Whether any error-severity diagnostic has been recorded
    pub fn has_errors(&self) -> bool {
        self.items
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// All recorded diagnostics, in recording order
    pub fn items(&self) -> &[Diagnostic] {
        &self.items
    }

    /// Number of recorded diagnostics
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append all diagnostics from another collector
    pub fn merge(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    /// Consume the collector, producing an error if any error was recorded.
    ///
    /// A single error becomes itself; several become
    /// [`FhirPathError::Multiple`].
    pub fn into_error(self) -> Option<FhirPathError> {
        let mut errors: Vec<FhirPathError> = self
            .items
            .into_iter()
            .filter(|d| d.severity == Severity::Error)
            .map(FhirPathError::from)
            .collect();
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(FhirPathError::Multiple(errors)),
        }
    }
}
