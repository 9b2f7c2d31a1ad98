//! Tutorial configuration validator
//!
//! A tutorial walks volunteers through a handful of subjects and checks their
//! answers against assertions. It always belongs to a task presenter, whose
//! available languages every tutorial message must be translated into.
//!
//! Copyright (c) 2025 tpcheck contributors
//! Licensed under the Apache-2.0 license

use crate::validation::base::{SchemaValidator, ValidationContext, ValidationHelpers};
use crate::validation::error::ValidationResult;
use crate::validation::language::validate_configuration_string;
use crate::validation::question::validate_key_reference;
use crate::validation::schema::{Field, Schema};
use crate::validation::task_presenter::{available_languages, TaskPresenterValidator};
use serde_json::Value;
use tracing::debug;

/// Options for [`TutorialValidator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TutorialOptions {
    /// Validate the owning task presenter before the tutorial
    pub validate_task_presenter: bool,
}

impl Default for TutorialOptions {
    fn default() -> Self {
        Self {
            validate_task_presenter: true,
        }
    }
}

fn validate_default_message(value: &Value, context: &ValidationContext) -> ValidationResult<()> {
    Schema::new("tutorial default message")
        .field(Field::optional("on-wrong-answer", |v, s| {
            validate_configuration_string(v, "default message on wrong answers", s.context())
        }))
        .field(Field::optional("on-correct-answer", |v, s| {
            validate_configuration_string(v, "default message on correct answers", s.context())
        }))
        .validate_value(value, context)
}

fn validate_assertion_messages(value: &Value, context: &ValidationContext) -> ValidationResult<()> {
    let messages = ValidationHelpers::expect_non_empty_object(value, "assertion's 'messages' field", context)?;
    for (label, message) in messages {
        validate_configuration_string(message, "assertion message", &context.child(label))?;
    }
    Ok(())
}

/// Validate a single assertion
pub fn validate_assertion(value: &Value, context: &ValidationContext) -> ValidationResult<()> {
    Schema::new("tutorial assertion")
        .field(Field::required("expects", |v, s| {
            ValidationHelpers::validate_non_empty_string(v, "assertion's expected answer", s.context()).map(|_| ())
        }))
        .field(Field::optional("messages", |v, s| validate_assertion_messages(v, s.context())))
        .field(Field::optional("autocomplete", |v, s| {
            ValidationHelpers::validate_boolean(v, "assertion's 'autocomplete' field", s.context()).map(|_| ())
        }))
        .validate_value(value, context)
}

/// Validate a subject's assertions, keyed by the question they apply to
pub fn validate_assertions(value: &Value, context: &ValidationContext) -> ValidationResult<()> {
    let assertions = ValidationHelpers::expect_non_empty_object(value, "tutorial subject's 'assertions' field", context)?;
    for (key, assertion) in assertions {
        let assertion_context = context.child(key);
        validate_key_reference(&Value::String(key.clone()), "assertion key", &assertion_context)?;
        validate_assertion(assertion, &assertion_context)?;
    }
    Ok(())
}

/// Validate one tutorial subject
pub fn validate_tutorial_subject(value: &Value, context: &ValidationContext) -> ValidationResult<()> {
    Schema::new("tutorial subject")
        .field(Field::required("source", |v, s| {
            ValidationHelpers::validate_non_empty_string(v, "tutorial subject's source", s.context()).map(|_| ())
        }))
        .field(Field::required("page", |v, s| {
            ValidationHelpers::validate_non_empty_string(v, "tutorial subject's page", s.context()).map(|_| ())
        }))
        .field(Field::optional("attribution", |v, s| {
            ValidationHelpers::validate_non_empty_string(v, "tutorial subject's attribution", s.context()).map(|_| ())
        }))
        .field(Field::required("assertions", |v, s| validate_assertions(v, s.context())))
        .validate_value(value, context)
}

fn tutorial_schema() -> Schema<'static> {
    Schema::new("tutorial configuration")
        .field(Field::optional("enable-random-order", |v, s| {
            ValidationHelpers::validate_boolean(v, "'enable-random-order' field", s.context()).map(|_| ())
        }))
        .field(Field::optional("default-message", |v, s| validate_default_message(v, s.context())))
        .field(Field::required("subjects", |v, s| {
            let context = s.context();
            let subjects = ValidationHelpers::expect_non_empty_array(v, "tutorial's 'subjects' field", context)?;
            for (i, subject) in subjects.iter().enumerate() {
                validate_tutorial_subject(subject, &context.child_index(i))?;
            }
            Ok(())
        }))
}

/// Validate a nested tutorial against an already validated task presenter
pub fn validate_tutorial(value: &Value, task_presenter: &Value, context: &ValidationContext) -> ValidationResult<()> {
    let context = match available_languages(task_presenter) {
        Some(languages) => context.clone().with_available_languages(languages),
        None => context.clone(),
    };
    tutorial_schema().validate_value(value, &context)
}

/// Validator for tutorial configurations
#[derive(Debug, Clone, Copy)]
pub struct TutorialValidator<'a> {
    task_presenter: &'a Value,
    options: TutorialOptions,
}

impl<'a> TutorialValidator<'a> {
    /// Create a validator for tutorials of the given task presenter
    pub fn new(task_presenter: &'a Value) -> Self {
        Self {
            task_presenter,
            options: TutorialOptions::default(),
        }
    }

    /// Replace the validator options
    pub fn with_options(mut self, options: TutorialOptions) -> Self {
        self.options = options;
        self
    }

    /// Skip validating the task presenter, for callers that already did
    pub fn trust_task_presenter(self) -> Self {
        self.with_options(TutorialOptions {
            validate_task_presenter: false,
        })
    }
}

impl SchemaValidator for TutorialValidator<'_> {
    type Input = Value;

    fn validate_with_context(&self, input: &Value, context: &ValidationContext) -> ValidationResult<()> {
        ValidationHelpers::expect_document(input, "tutorial configuration", "TutorialValidator")?;
        ValidationHelpers::expect_document(self.task_presenter, "task presenter configuration", "TutorialValidator")?;

        if self.options.validate_task_presenter {
            debug!("Validating the tutorial's task presenter");
            TaskPresenterValidator::new().validate_with_context(self.task_presenter, context)?;
        }

        validate_tutorial(input, self.task_presenter, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::error::ValidationError;
    use serde_json::json;

    fn task_presenter() -> Value {
        json!({
            "language": {"available": ["en", "fr"], "default": "en"},
            "questionnaire": {
                "questions": [{
                    "key": "flooded",
                    "title": {"en": "Is it flooded?", "fr": "Est-ce inondé ?"},
                    "input": {"type": "polar"}
                }]
            }
        })
    }

    fn tutorial() -> Value {
        json!({
            "enable-random-order": true,
            "default-message": {
                "on-wrong-answer": {"en": "Try again.", "fr": "Essayez encore."}
            },
            "subjects": [{
                "source": "https://example.org/flood.jpg",
                "page": "https://example.org/flood",
                "assertions": {
                    "flooded": {
                        "expects": "yes",
                        "messages": {"no": {"en": "Look at the water.", "fr": "Regardez l'eau."}},
                        "autocomplete": false
                    },
                    "_end": {"expects": "done"}
                }
            }]
        })
    }

    #[test]
    fn test_valid_tutorial() {
        let presenter = task_presenter();
        assert!(TutorialValidator::new(&presenter).validate(&tutorial()).is_ok());
    }

    #[test]
    fn test_subjects_are_required() {
        let presenter = task_presenter();
        let err = TutorialValidator::new(&presenter).validate(&json!({})).unwrap_err();
        assert!(err.message().contains("'subjects'"));

        let err = TutorialValidator::new(&presenter)
            .validate(&json!({"subjects": []}))
            .unwrap_err();
        assert!(err.message().contains("non-empty list"));
    }

    #[test]
    fn test_messages_follow_task_presenter_languages() {
        let presenter = task_presenter();
        let mut configuration = tutorial();
        configuration["default-message"]["on-correct-answer"] = json!({"en": "Well done!"});
        let err = TutorialValidator::new(&presenter).validate(&configuration).unwrap_err();
        assert_eq!(err.path(), Some("$.default-message.on-correct-answer"));
    }

    #[test]
    fn test_assertion_keys() {
        let presenter = task_presenter();
        let mut configuration = tutorial();
        configuration["subjects"][0]["assertions"] = json!({"not a key": {"expects": "yes"}});
        let err = TutorialValidator::new(&presenter).validate(&configuration).unwrap_err();
        assert_eq!(err.path(), Some("$.subjects[0].assertions.not a key"));

        configuration["subjects"][0]["assertions"] = json!({});
        assert!(TutorialValidator::new(&presenter).validate(&configuration).is_err());
    }

    #[test]
    fn test_assertion_rules() {
        let ctx = ValidationContext::new();
        assert!(validate_assertion(&json!({"expects": "yes"}), &ctx).is_ok());
        assert!(validate_assertion(&json!({}), &ctx).is_err());
        assert!(validate_assertion(&json!({"expects": ""}), &ctx).is_err());
        assert!(validate_assertion(&json!({"expects": "yes", "messages": {}}), &ctx).is_err());
        assert!(validate_assertion(&json!({"expects": "yes", "autocomplete": "no"}), &ctx).is_err());
        assert!(validate_assertion(&json!({"expects": "yes", "hint": "?"}), &ctx).is_err());
    }

    #[test]
    fn test_task_presenter_is_validated_unless_trusted() {
        let broken = json!({"questionnaire": {"questions": []}});
        let err = TutorialValidator::new(&broken).validate(&tutorial()).unwrap_err();
        assert!(err.message().contains("'questions'"));

        // Without language declarations any translation set is accepted.
        assert!(TutorialValidator::new(&broken)
            .trust_task_presenter()
            .validate(&tutorial())
            .is_ok());
    }

    #[test]
    fn test_arguments_must_be_dictionaries() {
        let presenter = task_presenter();
        let err = TutorialValidator::new(&presenter).validate(&json!("tutorial")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidArgument(_)));

        let not_a_presenter = json!(["questionnaire"]);
        let err = TutorialValidator::new(&not_a_presenter).validate(&tutorial()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidArgument(_)));
    }
}
