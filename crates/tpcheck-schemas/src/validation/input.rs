//! Question inputs
//!
//! Every input carries a `type` discriminator naming one of the [`InputKind`]s.
//! Each kind has its own allow-list of fields, checked before any of the
//! kind's rules run, so a field that belongs to another kind is reported even
//! when a required field is also missing.
//!
//! Copyright (c) 2025 tpcheck contributors
//! Licensed under the Apache-2.0 license

use crate::validation::base::{ValidationContext, ValidationHelpers};
use crate::validation::error::{ValidationError, ValidationResult};
use crate::validation::language::validate_configuration_string;
use crate::validation::schema::{Field, FieldScope, Schema};
use chrono::{NaiveDate, NaiveTime};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// The kind of control a question presents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// Yes / no / I don't know
    Polar,
    /// A drop-down list of options
    DropdownList,
    /// A list of options shown side by side, optionally illustrated
    MultipleOption,
    /// Free text
    Text,
    /// A number, optionally bounded
    Number,
    /// A date, a time or both
    Datetime,
    /// A link
    Url,
    /// A location on a map
    Geotagging,
}

impl InputKind {
    /// Every input kind, in documentation order
    pub const ALL: [InputKind; 8] = [
        InputKind::Polar,
        InputKind::DropdownList,
        InputKind::MultipleOption,
        InputKind::Text,
        InputKind::Number,
        InputKind::Datetime,
        InputKind::Url,
        InputKind::Geotagging,
    ];

    /// Look up a kind by its `type` value
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// The `type` value for this kind
    pub fn as_str(self) -> &'static str {
        match self {
            InputKind::Polar => "polar",
            InputKind::DropdownList => "dropdown-list",
            InputKind::MultipleOption => "multiple-option",
            InputKind::Text => "text",
            InputKind::Number => "number",
            InputKind::Datetime => "datetime",
            InputKind::Url => "url",
            InputKind::Geotagging => "geotagging",
        }
    }

    /// Fields this kind accepts besides `type`
    pub fn allowed_fields(self) -> &'static [&'static str] {
        match self {
            InputKind::Polar => &[],
            InputKind::DropdownList => &["placeholder", "enable-multiple-choices", "options"],
            InputKind::MultipleOption => &[
                "enable-multiple-choices",
                "enable-other-option",
                "enable-illustrations",
                "options",
            ],
            InputKind::Text => &["placeholder", "enable-long-text", "min-length", "max-length"],
            InputKind::Number => &["placeholder", "enable-decimal", "min", "max"],
            InputKind::Datetime => &[
                "enable-date",
                "enable-time",
                "min-date",
                "max-date",
                "min-time",
                "max-time",
            ],
            InputKind::Url => &["placeholder", "min-length", "max-length"],
            InputKind::Geotagging => &["location"],
        }
    }

    /// Validate an input of this kind. The `type` field is assumed to name it.
    pub fn validate(self, input: &Map<String, Value>, context: &ValidationContext) -> ValidationResult<()> {
        self.schema().validate(input, context)
    }

    fn schema(self) -> Schema<'static> {
        let schema = Schema::new(format!("{} input", self))
            .unexpected_message(format!(
                "The field '{{field}}' is not allowed for the '{}' input type.",
                self
            ))
            .field(Field::required("type", |_, _| Ok(())));

        match self {
            InputKind::Polar => schema,
            InputKind::DropdownList => schema
                .field(placeholder())
                .field(flag("enable-multiple-choices"))
                .field(Field::required("options", |v, s| validate_options(v, None, s.context()))),
            InputKind::MultipleOption => schema
                .field(flag("enable-multiple-choices"))
                .field(flag("enable-other-option"))
                .field(flag("enable-illustrations"))
                .field(
                    Field::required("options", |v, s| {
                        let illustrated = s
                            .sibling("enable-illustrations")
                            .and_then(Value::as_bool)
                            .unwrap_or(false);
                        validate_options(v, Some(illustrated), s.context())
                    })
                    .after(["enable-illustrations"]),
                ),
            InputKind::Text => schema
                .field(placeholder())
                .field(flag("enable-long-text"))
                .field(Field::optional("min-length", |v, s| {
                    ValidationHelpers::validate_non_negative_integer(v, "'min-length' field", s.context())
                        .map(|_| ())
                }))
                .field(Field::optional("max-length", move |v, s| validate_max_length(v, s, self)).after(["min-length"])),
            InputKind::Number => schema
                .field(placeholder())
                .field(flag("enable-decimal"))
                .field(Field::optional("min", |v, s| validate_bound(v, "min", s).map(|_| ())).after(["enable-decimal"]))
                .field(Field::optional("max", validate_number_max).after(["enable-decimal", "min"])),
            InputKind::Datetime => schema
                .field(flag("enable-date"))
                .field(Field::optional("enable-time", validate_enable_time).after(["enable-date"]))
                .field(Field::optional("min-date", |v, s| parse_date(v, "min-date", s.context()).map(|_| ())))
                .field(Field::optional("max-date", validate_max_date).after(["min-date"]))
                .field(Field::optional("min-time", |v, s| parse_time(v, "min-time", s.context()).map(|_| ())))
                .field(Field::optional("max-time", validate_max_time).after(["min-time"])),
            InputKind::Url => schema
                .field(placeholder())
                .field(Field::optional("min-length", |v, s| {
                    ValidationHelpers::validate_non_negative_integer(v, "'min-length' field", s.context())
                        .map(|_| ())
                }))
                .field(Field::optional("max-length", move |v, s| validate_max_length(v, s, self)).after(["min-length"])),
            InputKind::Geotagging => schema.field(Field::optional("location", |v, s| {
                ValidationHelpers::validate_non_empty_string(v, "'location' field", s.context()).map(|_| ())
            })),
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a question's input block
pub fn validate_question_input(value: &Value, context: &ValidationContext) -> ValidationResult<()> {
    let input = ValidationHelpers::expect_object(value, "question input", context)?;

    let declared = match input.get("type") {
        Some(declared) if !declared.is_null() => declared,
        _ => {
            return Err(ValidationError::new(
                &context.path,
                "The question input is missing the following fields: 'type'.",
            ))
        }
    };

    let kind = declared.as_str().and_then(InputKind::parse).ok_or_else(|| {
        ValidationError::with_violations(
            context.child("type").path,
            format!("The question input type {} is not recognized.", declared),
            vec![ValidationError::create_violation(
                "input_type",
                format!(
                    "one of: {}",
                    InputKind::ALL.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
                ),
                declared.to_string(),
            )],
        )
    })?;

    let allowed = kind.allowed_fields();
    if let Some(unexpected) = input
        .keys()
        .find(|key| key.as_str() != "type" && !allowed.contains(&key.as_str()))
    {
        return Err(ValidationError::with_violations(
            context.child(unexpected).path,
            format!("The field '{}' is not allowed for the '{}' input type.", unexpected, kind),
            vec![ValidationError::create_violation(
                "allowed_fields",
                allowed.join(", "),
                unexpected.clone(),
            )],
        ));
    }

    kind.validate(input, context)
}

fn flag(name: &'static str) -> Field<'static> {
    Field::optional(name, move |v, s| {
        ValidationHelpers::validate_boolean(v, &format!("'{}' field", name), s.context()).map(|_| ())
    })
}

fn placeholder() -> Field<'static> {
    Field::optional("placeholder", |v, s| {
        validate_configuration_string(v, "input placeholder", s.context())
    })
}

fn validate_max_length(value: &Value, scope: &FieldScope<'_>, kind: InputKind) -> ValidationResult<()> {
    let context = scope.context();
    let max = ValidationHelpers::validate_non_negative_integer(value, "'max-length' field", context)?;
    match scope.sibling("min-length").and_then(Value::as_u64) {
        Some(min) if max < min => Err(ValidationError::with_violations(
            &context.path,
            format!(
                "The {} input's length range is invalid: max-length ≥ min-length must hold, but max-length is {} and min-length is {}.",
                kind, max, min
            ),
            vec![ValidationError::create_violation(
                "length_range",
                "max-length ≥ min-length",
                format!("{} < {}", max, min),
            )],
        )),
        _ => Ok(()),
    }
}

/// A number bound; integers only unless decimals are enabled
fn validate_bound(value: &Value, name: &str, scope: &FieldScope<'_>) -> ValidationResult<f64> {
    let context = scope.context();
    let number = value.as_f64().ok_or_else(|| {
        ValidationError::new(&context.path, format!("The '{}' field must be a number.", name))
    })?;

    let decimal = scope.sibling("enable-decimal").and_then(Value::as_bool).unwrap_or(false);
    if !decimal && !(value.is_i64() || value.is_u64()) {
        return Err(ValidationError::with_violations(
            &context.path,
            format!(
                "The '{}' field must be an integer unless 'enable-decimal' is set to true.",
                name
            ),
            vec![ValidationError::create_violation("integer", "an integer", value.to_string())],
        ));
    }

    Ok(number)
}

fn validate_number_max(value: &Value, scope: &FieldScope<'_>) -> ValidationResult<()> {
    let max = validate_bound(value, "max", scope)?;
    match scope.sibling("min").and_then(Value::as_f64) {
        Some(min) if max < min => Err(ValidationError::with_violations(
            &scope.context().path,
            format!(
                "The number input's range is invalid: max ≥ min must hold, but max is {} and min is {}.",
                max, min
            ),
            vec![ValidationError::create_violation("number_range", "max ≥ min", format!("{} < {}", max, min))],
        )),
        _ => Ok(()),
    }
}

fn validate_enable_time(value: &Value, scope: &FieldScope<'_>) -> ValidationResult<()> {
    let time = ValidationHelpers::validate_boolean(value, "'enable-time' field", scope.context())?;
    let date = scope.sibling("enable-date").and_then(Value::as_bool).unwrap_or(true);
    if !time && !date {
        return Err(ValidationError::new(
            &scope.context().path,
            "A datetime input must enable at least one of 'enable-date' and 'enable-time'.",
        ));
    }
    Ok(())
}

fn parse_date(value: &Value, name: &str, context: &ValidationContext) -> ValidationResult<NaiveDate> {
    value
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
        .ok_or_else(|| {
            ValidationError::with_violations(
                &context.path,
                format!("The '{}' field must be a date formatted as YYYY-MM-DD.", name),
                vec![ValidationError::create_violation("date_format", "YYYY-MM-DD", value.to_string())],
            )
        })
}

fn parse_time(value: &Value, name: &str, context: &ValidationContext) -> ValidationResult<NaiveTime> {
    value
        .as_str()
        .and_then(|s| NaiveTime::parse_from_str(s, TIME_FORMAT).ok())
        .ok_or_else(|| {
            ValidationError::with_violations(
                &context.path,
                format!("The '{}' field must be a time formatted as HH:MM.", name),
                vec![ValidationError::create_violation("time_format", "HH:MM", value.to_string())],
            )
        })
}

fn validate_max_date(value: &Value, scope: &FieldScope<'_>) -> ValidationResult<()> {
    let context = scope.context();
    let max = parse_date(value, "max-date", context)?;
    let min = scope
        .sibling("min-date")
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok());
    match min {
        Some(min) if max < min => Err(ValidationError::new(
            &context.path,
            format!(
                "The datetime input's date range is invalid: max-date ≥ min-date must hold, but max-date is {} and min-date is {}.",
                max, min
            ),
        )),
        _ => Ok(()),
    }
}

fn validate_max_time(value: &Value, scope: &FieldScope<'_>) -> ValidationResult<()> {
    let context = scope.context();
    let max = parse_time(value, "max-time", context)?;
    let min = scope
        .sibling("min-time")
        .and_then(Value::as_str)
        .and_then(|s| NaiveTime::parse_from_str(s, TIME_FORMAT).ok());
    match min {
        Some(min) if max < min => Err(ValidationError::new(
            &context.path,
            format!(
                "The datetime input's time range is invalid: max-time ≥ min-time must hold, but max-time is {} and min-time is {}.",
                max.format(TIME_FORMAT),
                min.format(TIME_FORMAT)
            ),
        )),
        _ => Ok(()),
    }
}

/// Validate a list of options.
///
/// `illustrations` is `None` for kinds without illustrations, otherwise
/// whether the input enables them.
fn validate_options(value: &Value, illustrations: Option<bool>, context: &ValidationContext) -> ValidationResult<()> {
    let options = ValidationHelpers::expect_non_empty_array(value, "'options' field", context)?;
    let mut seen = HashSet::new();

    for (i, option) in options.iter().enumerate() {
        let option_context = context.child_index(i);
        let mut schema = Schema::new(format!("option #{}", i + 1))
            .field(Field::required("label", |v, s| {
                validate_configuration_string(v, "option label", s.context())
            }))
            .field(Field::required("value", |v, s| {
                ValidationHelpers::validate_string(v, "option value", s.context()).map(|_| ())
            }));
        if let Some(enabled) = illustrations {
            schema = schema.field(Field::optional("illustration", move |v, s| {
                validate_illustration(v, enabled, s.context())
            }));
        }
        schema.validate_value(option, &option_context)?;

        if let Some(value) = option.get("value").and_then(Value::as_str) {
            if !seen.insert(value) {
                return Err(ValidationError::new(
                    option_context.child("value").path,
                    format!("The option value '{}' is used more than once.", value),
                ));
            }
        }
    }

    Ok(())
}

fn validate_illustration(value: &Value, enabled: bool, context: &ValidationContext) -> ValidationResult<()> {
    let part = |name: &'static str| {
        let rule = move |v: &Value, s: &FieldScope<'_>| {
            ValidationHelpers::validate_non_empty_string(v, &format!("illustration '{}' field", name), s.context())
                .map(|_| ())
        };
        if enabled {
            Field::required(name, rule)
        } else {
            Field::optional(name, rule)
        }
    };

    Schema::new("option illustration")
        .field(part("image"))
        .field(part("page"))
        .field(part("attribution"))
        .validate_value(value, context)
}
