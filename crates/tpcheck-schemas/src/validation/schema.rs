//! Closed-schema validation engine
//!
//! A [`Schema`] declares every field a document may contain, which of them are
//! required, and the rule that checks each one. Validation is fail-fast:
//!
//! 1. required fields that are absent or `null` are reported together;
//! 2. the first field without a declared rule, in document order, is
//!    reported as unrecognized before any field rule runs;
//! 3. present fields are checked in dependency order and the first failing
//!    rule ends validation.
//!
//! A field may declare that it must be checked [`after`](Field::after) some of
//! its siblings. Its rule can then read those siblings' values through
//! [`FieldScope::sibling`], knowing they were already accepted.
//!
//! Copyright (c) 2025 tpcheck contributors
//! Licensed under the Apache-2.0 license

use crate::validation::base::{ValidationContext, ValidationHelpers};
use crate::validation::error::{ValidationError, ValidationResult};
use serde_json::{Map, Value};
use tracing::debug;

/// Default message for absent required fields
pub const DEFAULT_MISSING_TEMPLATE: &str = "The {subject} is missing the following fields: {fields}.";

/// Default message for undeclared fields
pub const DEFAULT_UNEXPECTED_TEMPLATE: &str = "The {subject} field '{field}' is not recognized.";

/// A boxed field rule
pub type FieldRule<'a> = Box<dyn Fn(&Value, &FieldScope<'_>) -> ValidationResult<()> + 'a>;

/// One declared field of a schema
pub struct Field<'a> {
    name: &'static str,
    required: bool,
    after: Vec<&'static str>,
    rule: FieldRule<'a>,
}

impl<'a> Field<'a> {
    /// A field that must be present and non-null
    pub fn required<F>(name: &'static str, rule: F) -> Self
    where
        F: Fn(&Value, &FieldScope<'_>) -> ValidationResult<()> + 'a,
    {
        Self {
            name,
            required: true,
            after: Vec::new(),
            rule: Box::new(rule),
        }
    }

    /// A field that may be omitted
    pub fn optional<F>(name: &'static str, rule: F) -> Self
    where
        F: Fn(&Value, &FieldScope<'_>) -> ValidationResult<()> + 'a,
    {
        Self {
            name,
            required: false,
            after: Vec::new(),
            rule: Box::new(rule),
        }
    }

    /// Check this field only once the given siblings have been accepted
    pub fn after<I>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        self.after.extend(dependencies);
        self
    }

    /// The field name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the field must be present
    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// What a field rule sees besides the field value
pub struct FieldScope<'s> {
    context: ValidationContext,
    document: &'s Map<String, Value>,
    dependencies: &'s [&'static str],
}

impl<'s> FieldScope<'s> {
    /// Context whose path points at the field being checked
    pub fn context(&self) -> &ValidationContext {
        &self.context
    }

    /// Value of a sibling this field was declared to run after.
    ///
    /// Returns `None` when the sibling is absent, `null`, or not a declared
    /// dependency.
    pub fn sibling(&self, name: &str) -> Option<&'s Value> {
        if !self.dependencies.iter().any(|dep| *dep == name) {
            return None;
        }
        self.document.get(name).filter(|value| !value.is_null())
    }
}

/// A closed set of fields with one rule per field
pub struct Schema<'a> {
    subject: String,
    fields: Vec<Field<'a>>,
    missing_template: String,
    unexpected_template: String,
}

impl<'a> Schema<'a> {
    /// Create an empty schema. `subject` names the document in messages.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            fields: Vec::new(),
            missing_template: DEFAULT_MISSING_TEMPLATE.to_string(),
            unexpected_template: DEFAULT_UNEXPECTED_TEMPLATE.to_string(),
        }
    }

    /// Declare a field
    pub fn field(mut self, field: Field<'a>) -> Self {
        self.fields.push(field);
        self
    }

    /// Override the missing-fields message; `{subject}` and `{fields}` are substituted
    pub fn missing_message(mut self, template: impl Into<String>) -> Self {
        self.missing_template = template.into();
        self
    }

    /// Override the unrecognized-field message; `{subject}` and `{field}` are substituted
    pub fn unexpected_message(mut self, template: impl Into<String>) -> Self {
        self.unexpected_template = template.into();
        self
    }

    /// The document name used in messages
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Whether a field with this name is declared
    pub fn declares(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Names of all declared fields, in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Names of the required fields, in declaration order
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.required).map(|f| f.name)
    }

    /// Validate a value that must be a mapping; other types are rejected
    pub fn validate_value(&self, value: &Value, context: &ValidationContext) -> ValidationResult<()> {
        let document = ValidationHelpers::expect_object(value, &self.subject, context)?;
        self.validate(document, context)
    }

    /// Validate a document
    pub fn validate(&self, document: &Map<String, Value>, context: &ValidationContext) -> ValidationResult<()> {
        let order = self.evaluation_order()?;
        debug!(subject = %self.subject, path = %context.path, "Validating document");

        let missing: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required && document.get(f.name).map_or(true, Value::is_null))
            .map(|f| f.name)
            .collect();
        if !missing.is_empty() {
            let quoted = missing
                .iter()
                .map(|name| format!("'{}'", name))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ValidationError::with_violations(
                &context.path,
                self.render(&self.missing_template, "{fields}", &quoted),
                vec![ValidationError::create_violation(
                    "required_fields",
                    quoted.clone(),
                    "absent or null",
                )],
            ));
        }

        if let Some(unexpected) = document.keys().find(|key| !self.declares(key)) {
            return Err(ValidationError::new(
                context.child(unexpected).path,
                self.render(&self.unexpected_template, "{field}", unexpected),
            ));
        }

        for index in order {
            let field = &self.fields[index];
            let value = match document.get(field.name) {
                Some(value) if !value.is_null() => value,
                _ => continue,
            };
            let scope = FieldScope {
                context: context.child(field.name),
                document,
                dependencies: &field.after,
            };
            (field.rule)(value, &scope)?;
        }

        Ok(())
    }

    fn render(&self, template: &str, placeholder: &str, value: &str) -> String {
        template
            .replace("{subject}", &self.subject)
            .replace(placeholder, value)
    }

    /// Topological order of the declared fields; ties keep declaration order
    fn evaluation_order(&self) -> ValidationResult<Vec<usize>> {
        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(ValidationError::invalid_argument(format!(
                    "The {} schema declares the field '{}' more than once.",
                    self.subject, field.name
                )));
            }
            if let Some(unknown) = field.after.iter().find(|dep| !self.declares(dep)) {
                return Err(ValidationError::invalid_argument(format!(
                    "The {} field '{}' depends on the undeclared field '{}'.",
                    self.subject, field.name, unknown
                )));
            }
        }

        let mut placed = vec![false; self.fields.len()];
        let mut order = Vec::with_capacity(self.fields.len());
        while order.len() < self.fields.len() {
            let next = self.fields.iter().enumerate().position(|(i, field)| {
                !placed[i]
                    && field.after.iter().all(|dep| {
                        self.fields
                            .iter()
                            .position(|f| f.name == *dep)
                            .is_some_and(|d| placed[d])
                    })
            });
            match next {
                Some(i) => {
                    placed[i] = true;
                    order.push(i);
                }
                None => {
                    let stuck: Vec<&str> = self
                        .fields
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| !placed[*i])
                        .map(|(_, f)| f.name)
                        .collect();
                    return Err(ValidationError::invalid_argument(format!(
                        "The {} schema has a dependency cycle between the fields '{}'.",
                        self.subject,
                        stuck.join("', '")
                    )));
                }
            }
        }
        Ok(order)
    }
}
