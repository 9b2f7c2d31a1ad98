//! Unit tests for task presenter and tutorial validation

use serde_json::{json, Value};
use tpcheck_schemas::{
    LanguageTagCache, SchemaValidator, TaskPresenterValidator, TutorialOptions, TutorialValidator,
    ValidationContext,
};
use std::sync::Arc;

fn task_presenter() -> Value {
    json!({
        "language": {"available": ["en", "zh-Hans"], "default": "en"},
        "subject": {"type": "pdf"},
        "questionnaire": {
            "questions": [{
                "key": "signed",
                "title": {"en": "Is the document signed?", "zh-Hans": "文件是否已签名？"},
                "input": {"type": "polar"}
            }]
        }
    })
}

fn tutorial() -> Value {
    json!({
        "subjects": [{
            "source": "https://example.org/contract.pdf",
            "page": "3",
            "assertions": {"signed": {"expects": "yes"}}
        }]
    })
}

#[cfg(test)]
mod task_presenter_validation {
    use super::*;

    #[test]
    fn test_valid_task_presenter() {
        assert!(TaskPresenterValidator::new().validate(&task_presenter()).is_ok());
    }

    #[test]
    fn test_unknown_subject_type() {
        let mut configuration = task_presenter();
        configuration["subject"]["type"] = json!("video");
        let error = TaskPresenterValidator::new().validate(&configuration).unwrap_err();
        assert_eq!(error.path(), Some("$.subject.type"));
    }

    #[test]
    fn test_invalid_available_language() {
        let mut configuration = task_presenter();
        configuration["language"]["available"] = json!(["en", "zh-hans"]);
        let error = TaskPresenterValidator::new().validate(&configuration).unwrap_err();
        assert_eq!(error.path(), Some("$.language.available[1]"));
    }

    #[test]
    fn test_unknown_top_level_field() {
        let mut configuration = task_presenter();
        configuration["theme"] = json!("dark");
        let error = TaskPresenterValidator::new().validate(&configuration).unwrap_err();
        assert_eq!(
            error.message(),
            "The task presenter configuration field 'theme' is not recognized."
        );
    }

    #[test]
    fn test_injected_language_cache() {
        let cache = Arc::new(LanguageTagCache::new());
        let context = ValidationContext::with_cache(Arc::clone(&cache));
        TaskPresenterValidator::new()
            .validate_with_context(&task_presenter(), &context)
            .unwrap();
        assert!(cache.contains("en"));
        assert!(cache.contains("zh-Hans"));
        assert!(!cache.contains("fr"));
    }
}

#[cfg(test)]
mod tutorial_validation {
    use super::*;

    #[test]
    fn test_valid_tutorial() {
        let presenter = task_presenter();
        assert!(TutorialValidator::new(&presenter).validate(&tutorial()).is_ok());
    }

    #[test]
    fn test_options_default_to_validating_the_task_presenter() {
        assert!(TutorialOptions::default().validate_task_presenter);

        let mut presenter = task_presenter();
        presenter["subject"] = json!({"type": "video"});
        assert!(TutorialValidator::new(&presenter).validate(&tutorial()).is_err());

        let options = TutorialOptions {
            validate_task_presenter: false,
        };
        assert!(TutorialValidator::new(&presenter)
            .with_options(options)
            .validate(&tutorial())
            .is_ok());
    }

    #[test]
    fn test_subject_fields() {
        let presenter = task_presenter();
        let validator = TutorialValidator::new(&presenter);

        let mut configuration = tutorial();
        configuration["subjects"][0]["attribution"] = json!("");
        let error = validator.validate(&configuration).unwrap_err();
        assert_eq!(error.path(), Some("$.subjects[0].attribution"));

        let mut configuration = tutorial();
        configuration["subjects"][0].as_object_mut().unwrap().remove("page");
        let error = validator.validate(&configuration).unwrap_err();
        assert_eq!(error.message(), "The tutorial subject is missing the following fields: 'page'.");
    }

    #[test]
    fn test_assertion_messages_need_every_language() {
        let presenter = task_presenter();
        let mut configuration = tutorial();
        configuration["subjects"][0]["assertions"]["signed"]["messages"] = json!({"no": {"en": "Look again."}});
        let error = TutorialValidator::new(&presenter).validate(&configuration).unwrap_err();
        assert_eq!(error.path(), Some("$.subjects[0].assertions.signed.messages.no"));
        assert!(error.message().contains("'zh-Hans'"));
    }

    #[test]
    fn test_random_order_flag() {
        let presenter = task_presenter();
        let mut configuration = tutorial();
        configuration["enable-random-order"] = json!("true");
        assert!(TutorialValidator::new(&presenter).validate(&configuration).is_err());
        configuration["enable-random-order"] = json!(true);
        assert!(TutorialValidator::new(&presenter).validate(&configuration).is_ok());
    }
}
