//! Project configuration validator
//!
//! Copyright (c) 2025 tpcheck contributors
//! Licensed under the Apache-2.0 license

use crate::validation::base::{SchemaValidator, ValidationContext, ValidationHelpers};
use crate::validation::error::{ValidationError, ValidationResult};
use crate::validation::schema::{Field, Schema};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

static SHORT_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn short_name_regex() -> &'static Regex {
    SHORT_NAME_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap())
}

/// Whether `short_name` only uses alphanumeric characters, hyphens and underscores
pub fn is_project_short_name(short_name: &str) -> bool {
    short_name_regex().is_match(short_name)
}

fn validate_short_name(value: &Value, context: &ValidationContext) -> ValidationResult<()> {
    let short_name = ValidationHelpers::validate_non_empty_string(value, "project short name", context)?;
    if !is_project_short_name(short_name) {
        return Err(ValidationError::with_violations(
            &context.path,
            format!(
                "The project short name '{}' may only contain alphanumeric characters (a-z, A-Z, 0-9), hyphens (-) or underscores (_).",
                short_name
            ),
            vec![ValidationError::create_violation("short_name_format", "[A-Za-z0-9_-]+", short_name)],
        ));
    }
    Ok(())
}

fn project_schema() -> Schema<'static> {
    Schema::new("project configuration")
        .field(Field::required("name", |v, s| {
            ValidationHelpers::validate_non_empty_string(v, "project name", s.context()).map(|_| ())
        }))
        .field(Field::required("short_name", |v, s| validate_short_name(v, s.context())))
        .field(Field::required("description", |v, s| {
            ValidationHelpers::validate_non_empty_string(v, "project description", s.context()).map(|_| ())
        }))
        .field(Field::optional("repository", |v, s| {
            ValidationHelpers::validate_url(v, "project repository", s.context())
        }))
        .field(Field::optional("do_not_track", |v, s| {
            ValidationHelpers::validate_boolean(v, "'do_not_track' field", s.context()).map(|_| ())
        }))
}

/// Validate a nested project configuration
pub fn validate_project(value: &Value, context: &ValidationContext) -> ValidationResult<()> {
    project_schema().validate_value(value, context)
}

/// Validator for project configurations
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectValidator;

impl ProjectValidator {
    /// Create a new project validator
    pub fn new() -> Self {
        Self
    }
}

impl SchemaValidator for ProjectValidator {
    type Input = Value;

    fn validate_with_context(&self, input: &Value, context: &ValidationContext) -> ValidationResult<()> {
        let configuration = ValidationHelpers::expect_document(input, "configuration", "ProjectValidator")?;
        project_schema().validate(configuration, context)
    }
}
