//! Validation error types for task presenter configurations
//!
//! Copyright (c) 2025 tpcheck contributors
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single broken rule with the expected and actual values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// The validation rule that was violated
    pub rule: String,
    /// What was expected
    pub expected: String,
    /// What was actually found
    pub actual: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rule '{}' violated: expected {}, but found {}",
            self.rule, self.expected, self.actual
        )
    }
}

/// Everything a validator can report.
///
/// `Rejected` is the expected outcome for a bad configuration. `InvalidArgument`
/// means the caller handed the engine something it cannot work with (a list
/// where a document was expected, an inconsistent schema declaration) and is
/// never turned into a `(false, message)` verdict.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    /// The configuration breaks a rule
    #[error("{}", display_rejection(.path, .message, .violations))]
    Rejected {
        /// JSON path where the error occurred
        path: String,
        /// Human-readable error message
        message: String,
        /// Detailed rule violations
        violations: Vec<Violation>,
    },

    /// The caller broke the validator's contract
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

fn display_rejection(path: &str, message: &str, violations: &[Violation]) -> String {
    let mut out = format!("Validation error at '{}': {}", path, message);
    if !violations.is_empty() {
        out.push_str("\nViolations:");
        for violation in violations {
            out.push_str(&format!("\n  - {}", violation));
        }
    }
    out
}

impl ValidationError {
    /// Create a new rejection
    pub fn new<P, M>(path: P, message: M) -> Self
    where
        P: Into<String>,
        M: Into<String>,
    {
        Self::Rejected {
            path: path.into(),
            message: message.into(),
            violations: Vec::new(),
        }
    }

    /// Create a rejection with violations
    pub fn with_violations<P, M>(path: P, message: M, violations: Vec<Violation>) -> Self
    where
        P: Into<String>,
        M: Into<String>,
    {
        Self::Rejected {
            path: path.into(),
            message: message.into(),
            violations,
        }
    }

    /// Create a contract error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a violation for a specific rule
    pub fn create_violation<R, E, A>(rule: R, expected: E, actual: A) -> Violation
    where
        R: Into<String>,
        E: Into<String>,
        A: Into<String>,
    {
        Violation {
            rule: rule.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Whether this is a data-dependent rejection rather than a caller bug
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// The human-readable message, without the path prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Rejected { message, .. } => message,
            Self::InvalidArgument(message) => message,
        }
    }

    /// Location of the offending value, if this is a rejection
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Rejected { path, .. } => Some(path),
            Self::InvalidArgument(_) => None,
        }
    }

    /// Rule violations attached to a rejection
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Rejected { violations, .. } => violations,
            Self::InvalidArgument(_) => &[],
        }
    }
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// The `(valid, message)` pair reported to a human
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the configuration was accepted
    pub valid: bool,
    /// Why it was rejected
    pub message: Option<String>,
}

impl Verdict {
    /// An accepting verdict
    pub fn accepted() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    /// A rejecting verdict with the given message
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }

    /// Turn a validation result into a verdict.
    ///
    /// Contract errors are passed through untouched.
    pub fn from_result(result: ValidationResult<()>) -> ValidationResult<Self> {
        match result {
            Ok(()) => Ok(Self::accepted()),
            Err(ValidationError::Rejected { message, .. }) => Ok(Self::rejected(message)),
            Err(error) => Err(error),
        }
    }
}

/// Multiple validation errors collected during batch validation
#[derive(Debug, Error, Serialize, Deserialize)]
pub struct ValidationErrors {
    /// List of validation errors
    pub errors: Vec<ValidationError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Multiple validation errors occurred:")?;
        for (i, error) in self.errors.iter().enumerate() {
            write!(f, "\n{}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl ValidationErrors {
    /// Create a new validation errors collection
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add an error to the collection
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Convert to result - Ok if no errors, Err if any errors exist
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Default for ValidationErrors {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        let mut errors = Self::new();
        errors.add(error);
        errors
    }
}
