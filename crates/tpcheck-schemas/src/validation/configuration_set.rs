//! Configuration set validator
//!
//! A configuration set bundles everything a project ships: the project
//! descriptor, its task presenter and optionally a tutorial. Members are
//! checked in that order and the first failure is returned.
//!
//! Copyright (c) 2025 tpcheck contributors
//! Licensed under the Apache-2.0 license

use crate::validation::base::{SchemaValidator, ValidationContext, ValidationHelpers};
use crate::validation::error::ValidationResult;
use crate::validation::project::validate_project;
use crate::validation::schema::{Field, Schema};
use crate::validation::task_presenter::validate_task_presenter;
use crate::validation::tutorial::validate_tutorial;
use serde_json::Value;

fn configuration_set_schema() -> Schema<'static> {
    Schema::new("configuration set")
        .field(Field::required("project", |v, s| {
            ValidationHelpers::expect_non_empty_object(v, "project configuration", s.context())?;
            validate_project(v, s.context())
        }))
        .field(
            Field::required("task_presenter", |v, s| {
                ValidationHelpers::expect_non_empty_object(v, "task presenter configuration", s.context())?;
                validate_task_presenter(v, s.context())
            })
            .after(["project"]),
        )
        .field(
            Field::optional("tutorial", |v, s| match s.sibling("task_presenter") {
                Some(task_presenter) => validate_tutorial(v, task_presenter, s.context()),
                None => validate_tutorial(v, &Value::Null, s.context()),
            })
            .after(["task_presenter"]),
        )
}

/// Validator for a whole configuration set
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigurationSetValidator;

impl ConfigurationSetValidator {
    /// Create a new configuration set validator
    pub fn new() -> Self {
        Self
    }
}

impl SchemaValidator for ConfigurationSetValidator {
    type Input = Value;

    fn validate_with_context(&self, input: &Value, context: &ValidationContext) -> ValidationResult<()> {
        let set = ValidationHelpers::expect_document(input, "configuration set", "ConfigurationSetValidator")?;
        configuration_set_schema().validate(set, context)
    }
}
