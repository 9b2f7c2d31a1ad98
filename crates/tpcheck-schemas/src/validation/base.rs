//! Base validation trait and common utilities
//!
//! Copyright (c) 2025 tpcheck contributors
//! Licensed under the Apache-2.0 license

use crate::validation::error::{ValidationError, ValidationResult, Verdict};
use crate::validation::language::LanguageTagCache;
use serde_json::{Map, Value};
use std::sync::Arc;
use url::Url;

/// Validation context for passing additional information
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Current JSON path
    pub path: String,
    /// Languages every configuration string must provide a translation for
    available_languages: Option<Arc<[String]>>,
    /// Cache of previously accepted language tags
    language_cache: Arc<LanguageTagCache>,
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationContext {
    /// Create a root context backed by the process-wide language cache
    pub fn new() -> Self {
        Self::with_cache(LanguageTagCache::global())
    }

    /// Create a root context backed by the given language cache
    pub fn with_cache(language_cache: Arc<LanguageTagCache>) -> Self {
        Self {
            path: "$".to_string(),
            available_languages: None,
            language_cache,
        }
    }

    /// Create a child context with updated path
    pub fn child<P: AsRef<str>>(&self, path_segment: P) -> Self {
        let new_path = if self.path == "$" {
            format!("$.{}", path_segment.as_ref())
        } else {
            format!("{}.{}", self.path, path_segment.as_ref())
        };

        Self {
            path: new_path,
            available_languages: self.available_languages.clone(),
            language_cache: Arc::clone(&self.language_cache),
        }
    }

    /// Create a child context for array index
    pub fn child_index(&self, index: usize) -> Self {
        Self {
            path: format!("{}[{}]", self.path, index),
            available_languages: self.available_languages.clone(),
            language_cache: Arc::clone(&self.language_cache),
        }
    }

    /// Require translations for the given languages from here on down
    pub fn with_available_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.available_languages = Some(languages.into_iter().map(Into::into).collect());
        self
    }

    /// Languages every configuration string must be translated into
    pub fn available_languages(&self) -> Option<&[String]> {
        self.available_languages.as_deref()
    }

    /// The language tag cache shared by this validation run
    pub fn language_cache(&self) -> &LanguageTagCache {
        &self.language_cache
    }
}

/// Base trait for configuration validators
pub trait SchemaValidator {
    /// The type being validated
    type Input: ?Sized;

    /// Validate using a fresh root context
    fn validate(&self, input: &Self::Input) -> ValidationResult<()> {
        let context = ValidationContext::new();
        self.validate_with_context(input, &context)
    }

    /// Validate with a specific context
    fn validate_with_context(
        &self,
        input: &Self::Input,
        context: &ValidationContext,
    ) -> ValidationResult<()>;

    /// Validate and report the outcome as a `(valid, message)` verdict
    fn verdict(&self, input: &Self::Input) -> ValidationResult<Verdict> {
        Verdict::from_result(self.validate(input))
    }
}

/// Helper functions for common validation patterns
pub struct ValidationHelpers;

impl ValidationHelpers {
    /// A string is empty when it holds nothing but whitespace
    pub fn is_empty_string(value: &str) -> bool {
        value.trim().is_empty()
    }

    /// Name of a JSON type, for error messages
    pub fn type_name(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "list",
            Value::Object(_) => "dictionary",
        }
    }

    /// Borrow a top-level document, treating anything other than a mapping
    /// as a contract error
    pub fn expect_document<'v>(
        value: &'v Value,
        argument: &str,
        validator: &str,
    ) -> ValidationResult<&'v Map<String, Value>> {
        value.as_object().ok_or_else(|| {
            ValidationError::invalid_argument(format!(
                "{} expects a dictionary for the {} argument but got a {}.",
                validator,
                argument,
                Self::type_name(value)
            ))
        })
    }

    /// Borrow a nested mapping, rejecting other types
    pub fn expect_object<'v>(
        value: &'v Value,
        what: &str,
        context: &ValidationContext,
    ) -> ValidationResult<&'v Map<String, Value>> {
        value.as_object().ok_or_else(|| {
            ValidationError::with_violations(
                &context.path,
                format!("The {} must be a dictionary.", what),
                vec![ValidationError::create_violation(
                    "type",
                    "dictionary",
                    Self::type_name(value),
                )],
            )
        })
    }

    /// Borrow a nested mapping that must hold at least one entry
    pub fn expect_non_empty_object<'v>(
        value: &'v Value,
        what: &str,
        context: &ValidationContext,
    ) -> ValidationResult<&'v Map<String, Value>> {
        let object = Self::expect_object(value, what, context)?;
        if object.is_empty() {
            return Err(ValidationError::new(
                &context.path,
                format!("The {} must be a non-empty dictionary.", what),
            ));
        }
        Ok(object)
    }

    /// Borrow a list that must hold at least one item
    pub fn expect_non_empty_array<'v>(
        value: &'v Value,
        what: &str,
        context: &ValidationContext,
    ) -> ValidationResult<&'v Vec<Value>> {
        match value.as_array() {
            Some(items) if !items.is_empty() => Ok(items),
            Some(_) => Err(ValidationError::with_violations(
                &context.path,
                format!("The {} must be a non-empty list.", what),
                vec![ValidationError::create_violation(
                    "non_empty_list",
                    "at least one item",
                    "0 items",
                )],
            )),
            None => Err(ValidationError::with_violations(
                &context.path,
                format!("The {} must be a non-empty list.", what),
                vec![ValidationError::create_violation(
                    "type",
                    "list",
                    Self::type_name(value),
                )],
            )),
        }
    }

    /// Validate that a value is a string, possibly empty
    pub fn validate_string<'v>(value: &'v Value, what: &str, context: &ValidationContext) -> ValidationResult<&'v str> {
        value.as_str().ok_or_else(|| {
            ValidationError::with_violations(
                &context.path,
                format!("The {} must be a string.", what),
                vec![ValidationError::create_violation(
                    "type",
                    "string",
                    Self::type_name(value),
                )],
            )
        })
    }

    /// Validate that a value is a string holding something other than whitespace
    pub fn validate_non_empty_string<'v>(
        value: &'v Value,
        what: &str,
        context: &ValidationContext,
    ) -> ValidationResult<&'v str> {
        match value.as_str() {
            Some(s) if !Self::is_empty_string(s) => Ok(s),
            _ => Err(ValidationError::new(
                &context.path,
                format!("The {} must be a non-empty string.", what),
            )),
        }
    }

    /// Validate that a value is a boolean
    pub fn validate_boolean(value: &Value, what: &str, context: &ValidationContext) -> ValidationResult<bool> {
        value.as_bool().ok_or_else(|| {
            ValidationError::with_violations(
                &context.path,
                format!("The {} must be a boolean.", what),
                vec![ValidationError::create_violation(
                    "type",
                    "boolean",
                    Self::type_name(value),
                )],
            )
        })
    }

    /// Validate that a value is an integer greater than or equal to zero
    pub fn validate_non_negative_integer(
        value: &Value,
        what: &str,
        context: &ValidationContext,
    ) -> ValidationResult<u64> {
        value.as_u64().ok_or_else(|| {
            ValidationError::with_violations(
                &context.path,
                format!("The {} must be a non-negative integer.", what),
                vec![ValidationError::create_violation(
                    "non_negative_integer",
                    "an integer greater than or equal to 0",
                    value.to_string(),
                )],
            )
        })
    }

    /// Validate that a URL is absolute and carries an explicit scheme
    pub fn validate_url(value: &Value, what: &str, context: &ValidationContext) -> ValidationResult<()> {
        let raw = Self::validate_non_empty_string(value, what, context)?;
        match Url::parse(raw) {
            Ok(url) if !url.cannot_be_a_base() => Ok(()),
            Ok(url) => Err(ValidationError::with_violations(
                &context.path,
                format!("The {} '{}' is not a valid URL.", what, raw),
                vec![ValidationError::create_violation(
                    "url_format",
                    "scheme://authority/path",
                    format!("opaque '{}' URL", url.scheme()),
                )],
            )),
            Err(e) => Err(ValidationError::with_violations(
                &context.path,
                format!("The {} '{}' is not a valid URL.", what, raw),
                vec![ValidationError::create_violation(
                    "url_format",
                    "valid URL with scheme",
                    e.to_string(),
                )],
            )),
        }
    }
}
