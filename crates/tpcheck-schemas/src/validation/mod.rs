//! Validation of task presenter configuration sets
//!
//! Every document type has a closed [`Schema`](schema::Schema): the fields it
//! requires, the fields it tolerates and the rule checking each of them.
//! Validation stops at the first violated rule and reports it as a
//! [`ValidationError::Rejected`] carrying a human-readable message and the
//! JSON path of the offending value.
//!
//! Passing something other than a dictionary to a top-level validator is a
//! caller bug and is reported as [`ValidationError::InvalidArgument`] instead.
//!
//! Copyright (c) 2025 tpcheck contributors
//! Licensed under the Apache-2.0 license

pub mod base;
pub mod configuration_set;
pub mod error;
pub mod input;
pub mod language;
pub mod project;
pub mod question;
pub mod schema;
pub mod task_presenter;
pub mod tutorial;

// Re-export commonly used types
pub use base::{SchemaValidator, ValidationContext, ValidationHelpers};
pub use configuration_set::ConfigurationSetValidator;
pub use error::{ValidationError, ValidationErrors, ValidationResult, Verdict, Violation};
pub use input::{validate_question_input, InputKind};
pub use language::{is_configuration_string, is_language_tag, validate_configuration_string, LanguageTagCache};
pub use project::{is_project_short_name, ProjectValidator};
pub use question::{
    is_question_key, is_reserved_key, validate_question_branch, validate_question_key, validate_reserved_key,
    QuestionValidator,
};
pub use schema::{Field, FieldScope, Schema};
pub use task_presenter::TaskPresenterValidator;
pub use tutorial::{TutorialOptions, TutorialValidator};

use tracing::debug;

/// Validation configuration for batch operations
#[derive(Debug, Clone, Default)]
pub struct ValidationConfig {
    /// Whether to stop on first error or collect all errors
    pub fail_fast: bool,
    /// Maximum number of errors to collect (0 = unlimited)
    pub max_errors: usize,
}

impl ValidationConfig {
    /// Enable fail-fast mode
    pub fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Set maximum number of errors to collect
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }
}

/// Batch validation for multiple configuration sets.
///
/// Each set contributes at most one error, located under `$[index]`. Sets share
/// one language tag cache.
pub fn validate_configuration_sets_batch(
    sets: &[serde_json::Value],
    config: &ValidationConfig,
) -> Result<(), ValidationErrors> {
    let validator = ConfigurationSetValidator::new();
    let mut errors = ValidationErrors::new();
    let context = ValidationContext::new();

    for (i, set) in sets.iter().enumerate() {
        let set_context = context.child_index(i);
        match validator.validate_with_context(set, &set_context) {
            Ok(_) => continue,
            Err(error) => {
                debug!(index = i, "Configuration set rejected");
                errors.add(error);

                if config.fail_fast {
                    break;
                }

                if config.max_errors > 0 && errors.len() >= config.max_errors {
                    break;
                }
            }
        }
    }

    errors.into_result()
}
