//! tpcheck schemas - validators for task presenter configuration sets
//!
//! A project built on a task presenter ships three JSON documents:
//! - **project**: name, short name, description and repository
//! - **task presenter**: available languages, subject type and a questionnaire
//!   of branching questions
//! - **tutorial** (optional): example subjects with the answers volunteers are
//!   expected to give
//!
//! This crate checks those documents before they reach the presenter runtime.
//!
//! ## Features
//!
//! - **Closed schemas**: required fields, no unrecognized fields, one rule per field
//! - **Localized text**: configuration strings are plain text or per-language
//!   dictionaries, checked against the task presenter's available languages
//! - **Typed inputs**: eight question input kinds with their own fields and rules
//! - **Batch Processing**: validation of many configuration sets at once
//! - **Detailed Error Reporting**: messages, JSON paths and violation details
//!
//! ## Quick Start
//!
//! ```rust
//! use tpcheck_schemas::{ConfigurationSetValidator, SchemaValidator};
//! use serde_json::json;
//!
//! let validator = ConfigurationSetValidator::new();
//!
//! let set = json!({
//!     "project": {"name": "Demo", "short_name": "demo", "description": "A demo."},
//!     "task_presenter": {
//!         "questionnaire": {
//!             "questions": [
//!                 {"key": "ready", "title": "Are you ready?", "input": {"type": "polar"}}
//!             ]
//!         }
//!     }
//! });
//!
//! match validator.validate(&set) {
//!     Ok(_) => println!("Valid configuration set!"),
//!     Err(e) => println!("Validation error: {}", e),
//! }
//! ```
//!
//! Copyright (c) 2025 tpcheck contributors
//! Licensed under the Apache-2.0 license

pub mod validation;

// Re-export commonly used types for convenience
pub use validation::{
    validate_configuration_sets_batch, ConfigurationSetValidator, InputKind, LanguageTagCache, ProjectValidator,
    QuestionValidator, SchemaValidator, TaskPresenterValidator, TutorialOptions, TutorialValidator, ValidationConfig,
    ValidationContext, ValidationError, ValidationErrors, ValidationHelpers, ValidationResult, Verdict,
};
