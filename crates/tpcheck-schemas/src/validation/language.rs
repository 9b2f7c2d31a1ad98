//! Language tags and localizable configuration strings
//!
//! A configuration string is either plain text or a dictionary mapping language
//! tags (`en`, `en-US`, `zh-Hans`) to translations. Tags that pass the shape
//! check once are remembered in a [`LanguageTagCache`] so later lookups skip the
//! regular expression.
//!
//! Copyright (c) 2025 tpcheck contributors
//! Licensed under the Apache-2.0 license

use crate::validation::base::{ValidationContext, ValidationHelpers};
use crate::validation::error::{ValidationError, ValidationResult};
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use tracing::trace;

static LANGUAGE_TAG_REGEX: OnceLock<Regex> = OnceLock::new();
static GLOBAL_CACHE: OnceLock<Arc<LanguageTagCache>> = OnceLock::new();

fn language_tag_regex() -> &'static Regex {
    LANGUAGE_TAG_REGEX.get_or_init(|| {
        Regex::new(r"^[a-z]{2,3}(?:-(?:[A-Z]{2}|[A-Z][a-z]{3}))?$").unwrap()
    })
}

/// Append-only set of language tags that were judged valid.
///
/// Only positive results are stored. The set is never invalidated.
#[derive(Debug, Default)]
pub struct LanguageTagCache {
    accepted: RwLock<HashSet<String>>,
}

impl LanguageTagCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used by [`ValidationContext::new`]
    pub fn global() -> Arc<Self> {
        Arc::clone(GLOBAL_CACHE.get_or_init(|| Arc::new(Self::new())))
    }

    /// Check a tag, consulting and filling the cache
    pub fn is_language_tag(&self, tag: &str) -> bool {
        if self.contains(tag) {
            return true;
        }

        if !language_tag_regex().is_match(tag) {
            return false;
        }

        trace!(tag, "Caching language tag");
        self.accepted
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(tag.to_string());
        true
    }

    /// Whether the tag was previously accepted
    pub fn contains(&self, tag: &str) -> bool {
        self.accepted
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(tag)
    }

    /// Number of cached tags
    pub fn len(&self) -> usize {
        self.accepted.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Check a language tag against the process-wide cache
pub fn is_language_tag(tag: &str) -> bool {
    LanguageTagCache::global().is_language_tag(tag)
}

/// Validate a language tag value
pub fn validate_language_tag(value: &Value, context: &ValidationContext) -> ValidationResult<()> {
    match value.as_str() {
        Some(tag) if context.language_cache().is_language_tag(tag) => Ok(()),
        _ => Err(ValidationError::with_violations(
            &context.path,
            format!("The value {} is not a valid language tag.", value),
            vec![ValidationError::create_violation(
                "language_tag",
                "a 2-3 letter lowercase code with an optional region (en-US) or script (zh-Hans)",
                value.to_string(),
            )],
        )),
    }
}

/// Validate a configuration string.
///
/// `what` names the field in error messages. When the context carries a list
/// of available languages, a dictionary must translate into every one of them.
pub fn validate_configuration_string(
    value: &Value,
    what: &str,
    context: &ValidationContext,
) -> ValidationResult<()> {
    match value {
        Value::String(s) => {
            if ValidationHelpers::is_empty_string(s) {
                Err(ValidationError::new(
                    &context.path,
                    format!("The {} must not be an empty string.", what),
                ))
            } else {
                Ok(())
            }
        }
        Value::Object(translations) => {
            if translations.is_empty() {
                return Err(ValidationError::new(
                    &context.path,
                    format!("The {} must not be an empty dictionary.", what),
                ));
            }

            for (tag, text) in translations {
                if !context.language_cache().is_language_tag(tag) {
                    return Err(ValidationError::new(
                        &context.path,
                        format!("The {} contains an invalid language tag '{}'.", what, tag),
                    ));
                }
                let is_text = text
                    .as_str()
                    .is_some_and(|s| !ValidationHelpers::is_empty_string(s));
                if !is_text {
                    return Err(ValidationError::new(
                        context.child(tag).path,
                        format!("The {} translation for '{}' must be a non-empty string.", what, tag),
                    ));
                }
            }

            if let Some(required) = context.available_languages() {
                let missing: Vec<&str> = required
                    .iter()
                    .filter(|tag| !translations.contains_key(tag.as_str()))
                    .map(String::as_str)
                    .collect();
                if !missing.is_empty() {
                    return Err(ValidationError::with_violations(
                        &context.path,
                        format!(
                            "The {} is missing translations for the following languages: '{}'.",
                            what,
                            missing.join("', '")
                        ),
                        vec![ValidationError::create_violation(
                            "required_languages",
                            required.join(", "),
                            translations.keys().cloned().collect::<Vec<_>>().join(", "),
                        )],
                    ));
                }
            }

            Ok(())
        }
        other => Err(ValidationError::with_violations(
            &context.path,
            format!(
                "The {} must be a non-empty string or a dictionary of translations.",
                what
            ),
            vec![ValidationError::create_violation(
                "configuration_string",
                "string or dictionary",
                ValidationHelpers::type_name(other),
            )],
        )),
    }
}

/// Whether `value` is a configuration string, optionally translated into
/// every one of `required_languages`
pub fn is_configuration_string(value: &Value, required_languages: Option<&[String]>) -> bool {
    let mut context = ValidationContext::new();
    if let Some(languages) = required_languages {
        context = context.with_available_languages(languages.iter().cloned());
    }
    validate_configuration_string(value, "configuration string", &context).is_ok()
}
