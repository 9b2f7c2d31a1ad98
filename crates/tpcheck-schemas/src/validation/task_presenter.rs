//! Task presenter configuration validator
//!
//! The task presenter declares which languages it is available in, the kind of
//! subject volunteers look at, and the questionnaire they answer. Every
//! configuration string inside the questionnaire must be translated into each
//! of the available languages, so `language` is always checked before
//! `questionnaire`.
//!
//! Copyright (c) 2025 tpcheck contributors
//! Licensed under the Apache-2.0 license

use crate::validation::base::{SchemaValidator, ValidationContext, ValidationHelpers};
use crate::validation::error::{ValidationError, ValidationResult};
use crate::validation::language::validate_language_tag;
use crate::validation::question::validate_question;
use crate::validation::schema::{Field, Schema};
use serde_json::Value;
use std::collections::HashSet;

/// Subject types a task presenter can display
pub const SUBJECT_TYPES: [&str; 2] = ["image", "pdf"];

/// Languages declared by a task presenter's `language.available` field.
///
/// Returns `None` when the field is absent or malformed; callers are expected
/// to have validated the task presenter first.
pub fn available_languages(task_presenter: &Value) -> Option<Vec<String>> {
    declared_languages(task_presenter.get("language")?)
}

fn declared_languages(language: &Value) -> Option<Vec<String>> {
    let available = language.get("available")?.as_array()?;
    Some(
        available
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}

fn validate_available_languages(value: &Value, context: &ValidationContext) -> ValidationResult<()> {
    let languages = ValidationHelpers::expect_non_empty_array(value, "list of available languages", context)?;
    let mut seen = HashSet::new();
    for (i, language) in languages.iter().enumerate() {
        let language_context = context.child_index(i);
        validate_language_tag(language, &language_context)?;
        if !seen.insert(language.as_str()) {
            return Err(ValidationError::new(
                &language_context.path,
                format!("The language {} is listed more than once in the available languages.", language),
            ));
        }
    }
    Ok(())
}

/// Validate a `language` block
pub fn validate_language(value: &Value, context: &ValidationContext) -> ValidationResult<()> {
    Schema::new("task presenter language configuration")
        .field(Field::required("available", |v, s| validate_available_languages(v, s.context())))
        .field(
            Field::required("default", |v, s| {
                validate_language_tag(v, s.context())?;
                let available = s.sibling("available").and_then(Value::as_array);
                match available {
                    Some(languages) if !languages.contains(v) => Err(ValidationError::with_violations(
                        &s.context().path,
                        format!(
                            "The default language {} is not one of the available languages.",
                            v
                        ),
                        vec![ValidationError::create_violation(
                            "default_language",
                            format!(
                                "one of: {}",
                                languages.iter().filter_map(Value::as_str).collect::<Vec<_>>().join(", ")
                            ),
                            v.to_string(),
                        )],
                    )),
                    _ => Ok(()),
                }
            })
            .after(["available"]),
        )
        .validate_value(value, context)
}

/// Validate a `subject` block
pub fn validate_subject(value: &Value, context: &ValidationContext) -> ValidationResult<()> {
    Schema::new("task presenter subject configuration")
        .field(Field::required("type", |v, s| match v.as_str() {
            Some(kind) if SUBJECT_TYPES.contains(&kind) => Ok(()),
            _ => Err(ValidationError::with_violations(
                &s.context().path,
                format!("The subject type {} is not recognized.", v),
                vec![ValidationError::create_violation(
                    "subject_type",
                    format!("one of: {}", SUBJECT_TYPES.join(", ")),
                    v.to_string(),
                )],
            )),
        }))
        .validate_value(value, context)
}

/// Validate a `questionnaire` block.
///
/// Question keys must be unique within the questionnaire.
pub fn validate_questionnaire(value: &Value, context: &ValidationContext) -> ValidationResult<()> {
    Schema::new("questionnaire configuration")
        .field(Field::required("questions", |v, s| {
            let context = s.context();
            let questions =
                ValidationHelpers::expect_non_empty_array(v, "questionnaire's 'questions' field", context)?;

            let mut keys = HashSet::new();
            for (i, question) in questions.iter().enumerate() {
                let question_context = context.child_index(i);
                validate_question(question, &question_context)?;

                if let Some(key) = question.get("key").and_then(Value::as_str) {
                    if !keys.insert(key) {
                        return Err(ValidationError::new(
                            question_context.child("key").path,
                            format!("The question key '{}' is used by more than one question.", key),
                        ));
                    }
                }
            }
            Ok(())
        }))
        .validate_value(value, context)
}

fn task_presenter_schema() -> Schema<'static> {
    Schema::new("task presenter configuration")
        .field(Field::optional("language", |v, s| validate_language(v, s.context())))
        .field(Field::optional("subject", |v, s| validate_subject(v, s.context())))
        .field(
            Field::required("questionnaire", |v, s| {
                match s.sibling("language").and_then(declared_languages) {
                    Some(languages) => {
                        let context = s.context().clone().with_available_languages(languages);
                        validate_questionnaire(v, &context)
                    }
                    None => validate_questionnaire(v, s.context()),
                }
            })
            .after(["language"]),
        )
}

/// Validate a nested task presenter configuration
pub fn validate_task_presenter(value: &Value, context: &ValidationContext) -> ValidationResult<()> {
    task_presenter_schema().validate_value(value, context)
}

/// Validator for task presenter configurations
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskPresenterValidator;

impl TaskPresenterValidator {
    /// Create a new task presenter validator
    pub fn new() -> Self {
        Self
    }
}

impl SchemaValidator for TaskPresenterValidator {
    type Input = Value;

    fn validate_with_context(&self, input: &Value, context: &ValidationContext) -> ValidationResult<()> {
        let configuration = ValidationHelpers::expect_document(input, "configuration", "TaskPresenterValidator")?;
        task_presenter_schema().validate(configuration, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "questionnaire": {
                "questions": [
                    {"key": "ready", "title": "Are you ready?", "input": {"type": "polar"}}
                ]
            }
        })
    }

    #[test]
    fn test_minimal_task_presenter() {
        assert!(TaskPresenterValidator::new().validate(&minimal()).is_ok());
    }

    #[test]
    fn test_questionnaire_is_required() {
        let err = TaskPresenterValidator::new().validate(&json!({})).unwrap_err();
        assert_eq!(
            err.message(),
            "The task presenter configuration is missing the following fields: 'questionnaire'."
        );
    }

    #[test]
    fn test_language_block() {
        let ctx = ValidationContext::new();
        assert!(validate_language(&json!({"available": ["en", "fr"], "default": "en"}), &ctx).is_ok());
        assert!(validate_language(&json!({"available": [], "default": "en"}), &ctx).is_err());
        assert!(validate_language(&json!({"available": ["en", "EN"], "default": "en"}), &ctx).is_err());
        assert!(validate_language(&json!({"available": ["en", "en"], "default": "en"}), &ctx)
            .unwrap_err()
            .message()
            .contains("more than once"));

        let err = validate_language(&json!({"available": ["en"], "default": "fr"}), &ctx).unwrap_err();
        assert!(err.message().contains("not one of the available languages"));
        assert_eq!(err.path(), Some("$.default"));
    }

    #[test]
    fn test_subject_block() {
        let ctx = ValidationContext::new();
        assert!(validate_subject(&json!({"type": "image"}), &ctx).is_ok());
        assert!(validate_subject(&json!({"type": "pdf"}), &ctx).is_ok());
        assert!(validate_subject(&json!({"type": "video"}), &ctx).is_err());
        assert!(validate_subject(&json!({}), &ctx).is_err());
        assert!(validate_subject(&json!({"type": "image", "size": 3}), &ctx).is_err());
    }

    #[test]
    fn test_empty_questionnaire() {
        let err = validate_questionnaire(&json!({"questions": []}), &ValidationContext::new()).unwrap_err();
        assert_eq!(err.message(), "The questionnaire's 'questions' field must be a non-empty list.");
    }

    #[test]
    fn test_duplicate_question_keys() {
        let question = json!({"key": "ready", "title": "Ready?", "input": {"type": "polar"}});
        let err = validate_questionnaire(&json!({"questions": [question.clone(), question]}), &ValidationContext::new())
            .unwrap_err();
        assert_eq!(err.path(), Some("$.questions[1].key"));
    }

    #[test]
    fn test_available_languages_reach_questions() {
        let mut configuration = minimal();
        configuration["language"] = json!({"available": ["en", "fr"], "default": "en"});
        configuration["questionnaire"]["questions"][0]["title"] = json!({"en": "Ready?"});

        let err = TaskPresenterValidator::new().validate(&configuration).unwrap_err();
        assert!(err.message().contains("'fr'"), "{}", err);
        assert_eq!(err.path(), Some("$.questionnaire.questions[0].title"));

        configuration["questionnaire"]["questions"][0]["title"] = json!({"en": "Ready?", "fr": "Prêt ?"});
        assert!(TaskPresenterValidator::new().validate(&configuration).is_ok());
    }

    #[test]
    fn test_language_is_checked_before_questionnaire() {
        // The questionnaire comes first in the document but its error must not
        // mask the language error.
        let configuration = json!({
            "questionnaire": {"questions": []},
            "language": {"available": ["en"], "default": "fr"}
        });
        let err = TaskPresenterValidator::new().validate(&configuration).unwrap_err();
        assert_eq!(err.path(), Some("$.language.default"));
    }

    #[test]
    fn test_available_languages_helper() {
        let configuration = json!({"language": {"available": ["en", "fr"], "default": "en"}});
        assert_eq!(available_languages(&configuration), Some(vec!["en".to_string(), "fr".to_string()]));
        assert_eq!(available_languages(&minimal()), None);
    }

    #[test]
    fn test_non_mapping_is_a_contract_error() {
        let err = TaskPresenterValidator::new().validate(&json!([])).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidArgument(_)));
    }
}
