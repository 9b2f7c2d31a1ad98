//! Questionnaire questions, keys and branches
//!
//! Copyright (c) 2025 tpcheck contributors
//! Licensed under the Apache-2.0 license

use crate::validation::base::{SchemaValidator, ValidationContext, ValidationHelpers};
use crate::validation::error::{ValidationError, ValidationResult};
use crate::validation::input::validate_question_input;
use crate::validation::language::validate_configuration_string;
use crate::validation::schema::{Field, Schema};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

static QUESTION_KEY_REGEX: OnceLock<Regex> = OnceLock::new();
static RESERVED_KEY_REGEX: OnceLock<Regex> = OnceLock::new();

const QUESTION_KEY_RULE: &str = "A question key must be a non-empty string strictly composed of alphanumeric characters (a-z, A-Z, 0-9), hyphens (-) or underscores (_). It must never begin with an underscore.";
const RESERVED_KEY_RULE: &str = "A reserved key must be a non-empty string strictly composed of alphanumeric characters (a-z, A-Z, 0-9), hyphens (-) or underscores (_). It must always begin with an underscore.";

fn question_key_regex() -> &'static Regex {
    QUESTION_KEY_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z0-9-][A-Za-z0-9_-]*$").unwrap())
}

fn reserved_key_regex() -> &'static Regex {
    RESERVED_KEY_REGEX.get_or_init(|| Regex::new(r"^_+[A-Za-z0-9_-]+$").unwrap())
}

/// Whether `key` is an ordinary question key
pub fn is_question_key(key: &str) -> bool {
    !ValidationHelpers::is_empty_string(key) && question_key_regex().is_match(key)
}

/// Whether `key` is a reserved (underscore-prefixed) key
pub fn is_reserved_key(key: &str) -> bool {
    !ValidationHelpers::is_empty_string(key) && reserved_key_regex().is_match(key)
}

fn key_rule_violation(value: &Value, expected: &str, rule: &str, context: &ValidationContext) -> ValidationError {
    ValidationError::with_violations(
        &context.path,
        rule,
        vec![ValidationError::create_violation("key_format", expected, value.to_string())],
    )
}

/// Validate an ordinary question key
pub fn validate_question_key(value: &Value, context: &ValidationContext) -> ValidationResult<()> {
    match value.as_str() {
        Some(key) if is_question_key(key) => Ok(()),
        _ => Err(key_rule_violation(value, "question key", QUESTION_KEY_RULE, context)),
    }
}

/// Validate a reserved key
pub fn validate_reserved_key(value: &Value, context: &ValidationContext) -> ValidationResult<()> {
    match value.as_str() {
        Some(key) if is_reserved_key(key) => Ok(()),
        _ => Err(key_rule_violation(value, "reserved key", RESERVED_KEY_RULE, context)),
    }
}

/// Validate a reference to a question, which may also be a reserved key.
///
/// Only the format is checked; the key does not have to name an existing
/// question.
pub fn validate_key_reference(value: &Value, what: &str, context: &ValidationContext) -> ValidationResult<()> {
    match value.as_str() {
        Some(key) if is_question_key(key) || is_reserved_key(key) => Ok(()),
        _ => Err(ValidationError::with_violations(
            &context.path,
            format!(
                "The {} {} is neither a valid question key nor a valid reserved key.",
                what, value
            ),
            vec![ValidationError::create_violation(
                "key_format",
                "question key or reserved key",
                value.to_string(),
            )],
        )),
    }
}

/// Validate a question's branch.
///
/// A branch is either a single key or a non-empty dictionary mapping answers
/// to keys.
pub fn validate_question_branch(value: &Value, context: &ValidationContext) -> ValidationResult<()> {
    match value {
        Value::String(_) => validate_key_reference(value, "branch target", context),
        Value::Object(targets) => {
            if targets.is_empty() {
                return Err(ValidationError::new(
                    &context.path,
                    "A conditional branch must map at least one answer to a question key.",
                ));
            }
            for (answer, target) in targets {
                validate_key_reference(target, "branch target", &context.child(answer))?;
            }
            Ok(())
        }
        other => Err(ValidationError::with_violations(
            &context.path,
            "A question branch must be a key or a dictionary of answers to keys.",
            vec![ValidationError::create_violation(
                "branch",
                "string or dictionary",
                ValidationHelpers::type_name(other),
            )],
        )),
    }
}

fn question_schema() -> Schema<'static> {
    Schema::new("question configuration")
        .field(Field::required("key", |v, s| validate_question_key(v, s.context())))
        .field(Field::required("title", |v, s| {
            validate_configuration_string(v, "question title", s.context())
        }))
        .field(Field::optional("hint", |v, s| {
            validate_configuration_string(v, "question hint", s.context())
        }))
        .field(Field::optional("help", |v, s| {
            validate_configuration_string(v, "question help", s.context())
        }))
        .field(Field::required("input", |v, s| validate_question_input(v, s.context())))
        .field(Field::optional("branch", |v, s| validate_question_branch(v, s.context())))
}

/// Validate a nested question configuration.
///
/// Configuration strings are checked against the context's available
/// languages.
pub fn validate_question(value: &Value, context: &ValidationContext) -> ValidationResult<()> {
    question_schema().validate_value(value, context)
}

/// Validator for a standalone question configuration
#[derive(Debug, Clone, Default)]
pub struct QuestionValidator {
    available_languages: Option<Vec<String>>,
}

impl QuestionValidator {
    /// Create a validator that accepts any set of translations
    pub fn new() -> Self {
        Self::default()
    }

    /// Require translations for each of the given languages
    pub fn with_available_languages<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            available_languages: Some(languages.into_iter().map(Into::into).collect()),
        }
    }
}

impl SchemaValidator for QuestionValidator {
    type Input = Value;

    fn validate_with_context(&self, input: &Value, context: &ValidationContext) -> ValidationResult<()> {
        let question = ValidationHelpers::expect_document(input, "question", "QuestionValidator")?;
        let context = match &self.available_languages {
            Some(languages) => context.clone().with_available_languages(languages.iter().cloned()),
            None => context.clone(),
        };
        question_schema().validate(question, &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_question_keys() {
        assert!(is_question_key("ready"));
        assert!(is_question_key("is-it-flooded_2"));
        assert!(is_question_key("-dash"));
        assert!(!is_question_key("_ready"));
        assert!(!is_question_key(""));
        assert!(!is_question_key("   "));
        assert!(!is_question_key("with space"));
        assert!(!is_question_key("é"));
    }

    #[test]
    fn test_reserved_keys() {
        assert!(is_reserved_key("_ready"));
        assert!(is_reserved_key("__end"));
        assert!(is_reserved_key("__"));
        assert!(!is_reserved_key("_"));
        assert!(!is_reserved_key("ready"));
        assert!(!is_reserved_key("_with space"));
    }

    #[test]
    fn test_key_values_must_be_strings() {
        let ctx = ValidationContext::new();
        assert!(validate_question_key(&json!("ready"), &ctx).is_ok());
        let err = validate_question_key(&json!(7), &ctx).unwrap_err();
        assert!(err.message().starts_with("A question key must be"));
        assert!(validate_reserved_key(&json!("_end"), &ctx).is_ok());
        assert!(validate_reserved_key(&json!("end"), &ctx).is_err());
    }

    #[test]
    fn test_branches() {
        let ctx = ValidationContext::new();
        assert!(validate_question_branch(&json!("next-question"), &ctx).is_ok());
        assert!(validate_question_branch(&json!("_end"), &ctx).is_ok());
        assert!(validate_question_branch(&json!({"yes": "details", "no": "_end"}), &ctx).is_ok());
        // Targets are only format-checked.
        assert!(validate_question_branch(&json!({"maybe": "does-not-exist"}), &ctx).is_ok());

        assert!(validate_question_branch(&json!({}), &ctx).is_err());
        assert!(validate_question_branch(&json!(""), &ctx).is_err());
        assert!(validate_question_branch(&json!(["a"]), &ctx).is_err());
        let err = validate_question_branch(&json!({"yes": "not a key"}), &ctx).unwrap_err();
        assert_eq!(err.path(), Some("$.yes"));
    }

    #[test]
    fn test_minimal_question() {
        let validator = QuestionValidator::new();
        let question = json!({"key": "ready", "title": "Are you ready?", "input": {"type": "polar"}});
        assert!(validator.validate(&question).is_ok());
    }

    #[test]
    fn test_question_required_fields() {
        let validator = QuestionValidator::new();
        let err = validator
            .validate(&json!({"key": "ready", "input": {"type": "polar"}}))
            .unwrap_err();
        assert!(err.message().contains("'title'"));
    }

    #[test]
    fn test_question_unknown_field() {
        let validator = QuestionValidator::new();
        let err = validator
            .validate(&json!({
                "key": "ready",
                "title": "Are you ready?",
                "input": {"type": "polar"},
                "footnote": "?"
            }))
            .unwrap_err();
        assert!(err.message().contains("'footnote'"));
    }

    #[test]
    fn test_question_languages() {
        let validator = QuestionValidator::with_available_languages(["en", "fr"]);
        let question = json!({
            "key": "ready",
            "title": {"en": "Are you ready?"},
            "input": {"type": "polar"}
        });
        let err = validator.validate(&question).unwrap_err();
        assert!(err.message().contains("'fr'"));
        assert_eq!(err.path(), Some("$.title"));
    }

    #[test]
    fn test_non_mapping_question_is_a_contract_error() {
        let err = QuestionValidator::new().validate(&json!("ready")).unwrap_err();
        assert!(!err.is_rejection());
    }
}
