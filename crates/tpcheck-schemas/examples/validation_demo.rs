//! Validation demonstration example
//!
//! Copyright (c) 2025 tpcheck contributors
//! Licensed under the Apache-2.0 license

use serde_json::json;
use tpcheck_schemas::{
    ConfigurationSetValidator, QuestionValidator, SchemaValidator, TutorialValidator,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== tpcheck Validation Demo ===\n");

    demo_configuration_set_validation()?;

    println!();

    demo_question_validation()?;

    Ok(())
}

fn demo_configuration_set_validation() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Configuration Set Validation Demo ---");

    let validator = ConfigurationSetValidator::new();

    let valid_set = json!({
        "project": {"name": "Demo", "short_name": "demo", "description": "A demo."},
        "task_presenter": {
            "questionnaire": {
                "questions": [{"key": "ready", "title": "Are you ready?", "input": {"type": "polar"}}]
            }
        }
    });

    println!("✅ Validating minimal configuration set:");
    let verdict = validator.verdict(&valid_set)?;
    println!("   valid = {}, message = {:?}", verdict.valid, verdict.message);

    let mut empty_questionnaire = valid_set.clone();
    empty_questionnaire["task_presenter"]["questionnaire"]["questions"] = json!([]);

    println!("\n❌ Validating a configuration set without questions:");
    match validator.validate(&empty_questionnaire) {
        Ok(_) => println!("   Unexpectedly valid!"),
        Err(e) => println!("   Error: {}", e),
    }

    let mut wrong_default = valid_set.clone();
    wrong_default["task_presenter"]["language"] = json!({"available": ["en"], "default": "fr"});

    println!("\n❌ Validating a default language missing from the available languages:");
    match validator.validate(&wrong_default) {
        Ok(_) => println!("   Unexpectedly valid!"),
        Err(e) => println!("   Error: {}", e),
    }

    println!("\n⚠️  Validating a tutorial against its task presenter:");
    let tutorial = json!({
        "subjects": [{
            "source": "https://example.org/flood.jpg",
            "page": "https://example.org/flood",
            "assertions": {"ready": {"expects": "yes", "autocomplete": "sometimes"}}
        }]
    });
    match TutorialValidator::new(&valid_set["task_presenter"]).validate(&tutorial) {
        Ok(_) => println!("   Unexpectedly valid!"),
        Err(e) => println!("   Error: {}", e),
    }

    Ok(())
}

fn demo_question_validation() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Question Validation Demo ---");

    let validator = QuestionValidator::with_available_languages(["en", "fr"]);

    let question = json!({
        "key": "comments",
        "title": {"en": "Anything else?", "fr": "Autre chose ?"},
        "input": {"type": "text", "min-length": 5, "max-length": 3}
    });

    println!("❌ Validating a text input with an inverted length range:");
    match validator.validate(&question) {
        Ok(_) => println!("   Unexpectedly valid!"),
        Err(e) => println!("   Error: {}", e),
    }

    let untranslated = json!({
        "key": "comments",
        "title": {"en": "Anything else?"},
        "input": {"type": "text"}
    });

    println!("\n❌ Validating a title missing its French translation:");
    match validator.validate(&untranslated) {
        Ok(_) => println!("   Unexpectedly valid!"),
        Err(e) => println!("   Error: {}", e),
    }

    Ok(())
}
