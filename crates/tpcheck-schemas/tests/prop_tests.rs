//! Property-based tests for schema validation
//!
//! These tests verify that the validators behave correctly across a wide
//! range of inputs.

use proptest::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;
use tpcheck_schemas::validation::{
    is_configuration_string, is_question_key, is_reserved_key, validate_question_input,
};
use tpcheck_schemas::{
    ConfigurationSetValidator, LanguageTagCache, ProjectValidator, SchemaValidator, ValidationContext,
};

/// Strategy for generating random JSON values with controlled complexity
fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[a-zA-Z0-9 ]{0,50}".prop_map(Value::String),
    ];

    leaf.prop_recursive(
        3,  // max depth
        10, // max size
        5,  // items per collection
        |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
                proptest::collection::hash_map("[a-zA-Z_][a-zA-Z0-9_-]{0,20}", inner, 0..5)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        },
    )
}

/// Strategy for generating well-formed language tags
fn language_tag_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{2,3}",
        "[a-z]{2,3}-[A-Z]{2}",
        "[a-z]{2,3}-[A-Z][a-z]{3}",
    ]
}

/// Strategy for generating field names unknown to every schema
fn unknown_field_strategy() -> impl Strategy<Value = String> {
    "x-[a-z]{1,10}"
}

proptest! {
    #[test]
    fn test_well_formed_tags_are_accepted(tag in language_tag_strategy()) {
        let cache = LanguageTagCache::new();
        prop_assert!(cache.is_language_tag(&tag));
        prop_assert!(cache.contains(&tag));
    }

    #[test]
    fn test_padded_tags_are_rejected(tag in language_tag_strategy(), pad in "[ \t\n]{1,3}") {
        let cache = LanguageTagCache::new();
        let leading = format!("{}{}", pad, tag);
        let trailing = format!("{}{}", tag, pad);
        prop_assert!(!cache.is_language_tag(&leading));
        prop_assert!(!cache.is_language_tag(&trailing));
        prop_assert!(cache.is_empty());
    }

    #[test]
    fn test_uppercase_language_is_rejected(tag in "[A-Z]{2,3}") {
        prop_assert!(!LanguageTagCache::new().is_language_tag(&tag));
    }

    #[test]
    fn test_key_kinds_are_exclusive(key in "[A-Za-z0-9_-]{1,20}") {
        // A key-shaped string is either ordinary or reserved, except for a
        // lone underscore which is neither.
        prop_assert_eq!(is_question_key(&key), !key.starts_with('_'));
        prop_assert_eq!(is_reserved_key(&key), key.starts_with('_') && key.len() > 1);
    }

    #[test]
    fn test_configuration_string_validation_is_idempotent(value in json_value_strategy()) {
        let first = is_configuration_string(&value, None);
        let second = is_configuration_string(&value, None);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_plain_strings(text in "[a-zA-Z0-9 ]{0,30}") {
        prop_assert_eq!(is_configuration_string(&json!(text), None), !text.trim().is_empty());
    }

    #[test]
    fn test_translations_cover_required_languages(
        tags in proptest::collection::btree_set(language_tag_strategy(), 1..5),
        text in "[a-zA-Z]{1,10}",
    ) {
        let tags: Vec<String> = tags.into_iter().collect();
        let translations: serde_json::Map<String, Value> =
            tags.iter().map(|tag| (tag.clone(), Value::String(text.clone()))).collect();
        let value = Value::Object(translations);

        prop_assert!(is_configuration_string(&value, Some(&tags)));

        let mut required = tags.clone();
        required.push("und-Zzzz".to_string());
        prop_assert!(!is_configuration_string(&value, Some(&required)));
    }

    #[test]
    fn test_validators_never_panic(value in json_value_strategy()) {
        let context = ValidationContext::with_cache(Arc::new(LanguageTagCache::new()));
        let _ = ConfigurationSetValidator::new().validate_with_context(&value, &context);
        let _ = ProjectValidator::new().validate_with_context(&value, &context);
        let _ = validate_question_input(&value, &context);
    }

    #[test]
    fn test_unknown_project_fields_are_named(field in unknown_field_strategy(), value in json_value_strategy()) {
        let mut project = json!({"name": "Demo", "short_name": "demo", "description": "A demo."});
        project[field.as_str()] = value;
        let error = ProjectValidator::new().validate(&project).unwrap_err();
        let quoted = format!("'{}'", field);
        prop_assert!(error.message().contains(&quoted), "{}", error.message());
    }

    #[test]
    fn test_missing_project_fields_are_named(keep in proptest::collection::vec(any::<bool>(), 3)) {
        let fields = ["name", "short_name", "description"];
        let mut project = serde_json::Map::new();
        for (field, kept) in fields.iter().zip(&keep) {
            if *kept {
                project.insert(field.to_string(), json!("demo"));
            }
        }
        let missing: Vec<&str> = fields.iter().zip(&keep).filter(|(_, kept)| !**kept).map(|(f, _)| *f).collect();

        let result = ProjectValidator::new().validate(&Value::Object(project));
        if missing.is_empty() {
            prop_assert!(result.is_ok());
        } else {
            let error = result.unwrap_err();
            for field in fields {
                let named = error.message().contains(&format!("'{}'", field));
                prop_assert_eq!(named, missing.contains(&field));
            }
        }
    }
}
