use chrono::NaiveDate;
use regex::Regex;

use crate::violations::Violation;

use super::{anchored, Bound, FieldDescriptor, FieldType, FieldValue, FormSchema, SubmissionPayload};

/// Checks `payload` against `schema`, returning every broken rule.
///
/// An empty list means the payload may be persisted. Empty values of
/// optional fields are skipped rather than checked against constraints.
pub fn validate_submission(schema: &FormSchema, payload: &SubmissionPayload) -> Vec<Violation> {
    let mut violations = vec![];

    for field in schema.fields() {
        match payload.get(&field.name) {
            Some(value) if !value.is_empty() => check_value(field, value, &mut violations),
            _ => {
                if field.required {
                    violations.push(Violation::MissingRequiredField {
                        field_name: field.name.clone(),
                    });
                }
            }
        }
    }

    for name in payload.keys() {
        if schema.field_by_name(name).is_none() {
            violations.push(Violation::UnexpectedField {
                field_name: name.clone(),
            });
        }
    }

    violations
}

fn check_value(field: &FieldDescriptor, value: &FieldValue, violations: &mut Vec<Violation>) {
    match field.field_type {
        FieldType::Text | FieldType::Email | FieldType::Tel | FieldType::Textarea => {
            let text = match value {
                FieldValue::Text(text) => text,
                _ => return violations.push(wrong_shape(field)),
            };

            let well_formed = match field.field_type {
                FieldType::Email => is_email(text),
                FieldType::Tel => is_phone_number(text),
                _ => true,
            };
            if !well_formed {
                violations.push(bad_format(field));
            }

            check_text(field, text, violations);
        }
        FieldType::Number => {
            let number = match value {
                FieldValue::Number(number) => Some(*number),
                FieldValue::Text(text) => text.trim().parse::<f64>().ok(),
                FieldValue::Choices(_) => return violations.push(wrong_shape(field)),
            };

            match number.filter(|number| number.is_finite()) {
                Some(number) => check_bounds(field, Bound::Number(number), violations),
                None => violations.push(bad_format(field)),
            }
        }
        FieldType::Date => {
            let text = match value {
                FieldValue::Text(text) => text,
                _ => return violations.push(wrong_shape(field)),
            };

            match NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d") {
                Ok(date) => check_bounds(field, Bound::Date(date), violations),
                Err(_) => violations.push(bad_format(field)),
            }
        }
        FieldType::Select | FieldType::Radio => match value {
            FieldValue::Text(choice) => check_choice(field, choice, violations),
            _ => violations.push(wrong_shape(field)),
        },
        FieldType::Checkbox => match value {
            FieldValue::Choices(choices) => {
                for choice in choices {
                    check_choice(field, choice, violations);
                }
            }
            _ => violations.push(wrong_shape(field)),
        },
    }
}

fn check_choice(field: &FieldDescriptor, choice: &str, violations: &mut Vec<Violation>) {
    if !field.accepts_choice(choice) {
        violations.push(Violation::UndeclaredOption {
            field_name: field.name.clone(),
            value: choice.to_string(),
        });
    }
}

fn check_text(field: &FieldDescriptor, text: &str, violations: &mut Vec<Violation>) {
    let validation = match &field.validation {
        Some(validation) => validation,
        None => return,
    };

    let length = text.chars().count();
    if let Some(min_length) = validation.min_length {
        if length < min_length as usize {
            violations.push(Violation::TooShort {
                field_name: field.name.clone(),
                min_length,
                length,
            });
        }
    }
    if let Some(max_length) = validation.max_length {
        if length > max_length as usize {
            violations.push(Violation::TooLong {
                field_name: field.name.clone(),
                max_length,
                length,
            });
        }
    }

    if let Some(pattern) = &validation.pattern {
        // unparseable patterns are reported by the schema integrity check
        if let Ok(regex) = Regex::new(&anchored(pattern)) {
            if !regex.is_match(text) {
                violations.push(Violation::PatternMismatch {
                    field_name: field.name.clone(),
                    pattern: pattern.clone(),
                });
            }
        }
    }
}

fn check_bounds(field: &FieldDescriptor, value: Bound, violations: &mut Vec<Violation>) {
    if let Some(minimum) = field.min() {
        if is_before(value, minimum) {
            violations.push(Violation::BelowMinimum {
                field_name: field.name.clone(),
                minimum,
                value,
            });
        }
    }
    if let Some(maximum) = field.max() {
        if is_before(maximum, value) {
            violations.push(Violation::AboveMaximum {
                field_name: field.name.clone(),
                maximum,
                value,
            });
        }
    }
}

// bounds of the wrong kind never apply
fn is_before(lhs: Bound, rhs: Bound) -> bool {
    match (lhs, rhs) {
        (Bound::Number(lhs), Bound::Number(rhs)) => lhs < rhs,
        (Bound::Date(lhs), Bound::Date(rhs)) => lhs < rhs,
        _ => false,
    }
}

fn is_email(text: &str) -> bool {
    let (local, domain) = match text.split_once('@') {
        Some(parts) => parts,
        None => return false,
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !text.chars().any(char::is_whitespace)
}

fn is_phone_number(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.'))
}

fn wrong_shape(field: &FieldDescriptor) -> Violation {
    Violation::InvalidValueShape {
        field_name: field.name.clone(),
        field_type: field.field_type,
    }
}

fn bad_format(field: &FieldDescriptor) -> Violation {
    Violation::InvalidFormat {
        field_name: field.name.clone(),
        field_type: field.field_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::registry::create_default;
    use crate::form::FieldValidation;

    fn field(name: &str, field_type: FieldType) -> FieldDescriptor {
        let mut field = create_default(field_type, 1, &FormSchema::new());
        field.name = name.to_string();
        field
    }

    fn with_options(mut field: FieldDescriptor, options: &[&str]) -> FieldDescriptor {
        field.options = options.iter().map(|o| o.to_string()).collect();
        field
    }

    fn with_validation(mut field: FieldDescriptor, validation: FieldValidation) -> FieldDescriptor {
        field.validation = Some(validation);
        field
    }

    fn payload(entries: Vec<(&str, FieldValue)>) -> SubmissionPayload {
        entries
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn missing_required_field_is_reported_by_name() {
        let mut email = field("email", FieldType::Email);
        email.required = true;
        let mut company = field("company", FieldType::Text);
        company.required = true;
        let schema = FormSchema::from(vec![email, company]);

        let violations = validate_submission(
            &schema,
            &payload(vec![("company", FieldValue::Text("Acme".into()))]),
        );

        assert_eq!(
            violations,
            vec![Violation::MissingRequiredField {
                field_name: "email".into()
            }]
        );
    }

    #[test]
    fn optional_fields_may_be_left_empty() {
        let schema = FormSchema::from(vec![
            with_validation(
                field("website", FieldType::Text),
                FieldValidation {
                    min_length: Some(5),
                    ..Default::default()
                },
            ),
            field("phone", FieldType::Tel),
        ]);

        let violations =
            validate_submission(&schema, &payload(vec![("website", FieldValue::Text("".into()))]));

        assert!(violations.is_empty(), "{:?}", violations);
    }

    #[test]
    fn undeclared_select_and_radio_values_are_rejected() {
        let schema = FormSchema::from(vec![
            with_options(field("service", FieldType::Select), &["Brand Strategy", "Web"]),
            with_options(field("budget", FieldType::Radio), &["Small", "Large"]),
        ]);

        let accepted = validate_submission(
            &schema,
            &payload(vec![
                ("service", FieldValue::Text("brand_strategy".into())),
                ("budget", FieldValue::Text("Large".into())),
            ]),
        );
        assert!(accepted.is_empty(), "{:?}", accepted);

        let rejected = validate_submission(
            &schema,
            &payload(vec![
                ("service", FieldValue::Text("seo".into())),
                ("budget", FieldValue::Text("medium".into())),
            ]),
        );
        assert_eq!(
            rejected,
            vec![
                Violation::UndeclaredOption {
                    field_name: "service".into(),
                    value: "seo".into()
                },
                Violation::UndeclaredOption {
                    field_name: "budget".into(),
                    value: "medium".into()
                },
            ]
        );
    }

    #[test]
    fn every_checkbox_value_must_be_declared() {
        let schema = FormSchema::from(vec![with_options(
            field("colors", FieldType::Checkbox),
            &["Red", "Green", "Blue"],
        )]);

        let violations = validate_submission(
            &schema,
            &payload(vec![(
                "colors",
                FieldValue::Choices(vec!["Red".into(), "Purple".into()]),
            )]),
        );

        assert_eq!(
            violations,
            vec![Violation::UndeclaredOption {
                field_name: "colors".into(),
                value: "Purple".into()
            }]
        );
    }

    #[test]
    fn text_constraints_apply() {
        let schema = FormSchema::from(vec![with_validation(
            field("code", FieldType::Text),
            FieldValidation {
                min_length: Some(3),
                max_length: Some(5),
                pattern: Some("[A-Z]+".into()),
                ..Default::default()
            },
        )]);

        let check = |text: &str| {
            validate_submission(&schema, &payload(vec![("code", FieldValue::Text(text.into()))]))
        };

        assert!(check("ABCD").is_empty());
        assert_eq!(
            check("AB"),
            vec![Violation::TooShort {
                field_name: "code".into(),
                min_length: 3,
                length: 2
            }]
        );
        assert_eq!(
            check("ABCDEFG"),
            vec![Violation::TooLong {
                field_name: "code".into(),
                max_length: 5,
                length: 7
            }]
        );
        // pattern must match the whole value
        assert_eq!(
            check("ABc"),
            vec![Violation::PatternMismatch {
                field_name: "code".into(),
                pattern: "[A-Z]+".into()
            }]
        );
    }

    #[test]
    fn numeric_bounds_apply_to_numbers_and_numeric_text() {
        let schema = FormSchema::from(vec![with_validation(
            field("budget", FieldType::Number),
            FieldValidation {
                min: Some(Bound::Number(1000.0)),
                max: Some(Bound::Number(50000.0)),
                ..Default::default()
            },
        )]);
        let check = |value: FieldValue| validate_submission(&schema, &payload(vec![("budget", value)]));

        assert!(check(FieldValue::Number(1000.0)).is_empty());
        assert!(check(FieldValue::Text(" 25000 ".into())).is_empty());
        assert_eq!(
            check(FieldValue::Number(999.5)),
            vec![Violation::BelowMinimum {
                field_name: "budget".into(),
                minimum: Bound::Number(1000.0),
                value: Bound::Number(999.5)
            }]
        );
        assert_eq!(
            check(FieldValue::Text("60000".into())),
            vec![Violation::AboveMaximum {
                field_name: "budget".into(),
                maximum: Bound::Number(50000.0),
                value: Bound::Number(60000.0)
            }]
        );
        assert_eq!(
            check(FieldValue::Text("lots".into())),
            vec![Violation::InvalidFormat {
                field_name: "budget".into(),
                field_type: FieldType::Number
            }]
        );
    }

    #[test]
    fn date_bounds_apply_to_dates() {
        let schema = FormSchema::from(vec![with_validation(
            field("start", FieldType::Date),
            FieldValidation {
                min: Some(Bound::Date(date(2026, 1, 1))),
                max: Some(Bound::Date(date(2026, 12, 31))),
                ..Default::default()
            },
        )]);
        let check = |text: &str| {
            validate_submission(&schema, &payload(vec![("start", FieldValue::Text(text.into()))]))
        };

        assert!(check("2026-06-15").is_empty());
        assert_eq!(
            check("2025-12-31"),
            vec![Violation::BelowMinimum {
                field_name: "start".into(),
                minimum: Bound::Date(date(2026, 1, 1)),
                value: Bound::Date(date(2025, 12, 31))
            }]
        );
        assert_eq!(
            check("15/06/2026"),
            vec![Violation::InvalidFormat {
                field_name: "start".into(),
                field_type: FieldType::Date
            }]
        );
    }

    #[test]
    fn email_and_phone_formats_are_checked() {
        let schema = FormSchema::from(vec![
            field("email", FieldType::Email),
            field("phone", FieldType::Tel),
        ]);

        let good = validate_submission(
            &schema,
            &payload(vec![
                ("email", FieldValue::Text("hello@studio.example".into())),
                ("phone", FieldValue::Text("+1 (555) 010-0199".into())),
            ]),
        );
        assert!(good.is_empty(), "{:?}", good);

        let bad = validate_submission(
            &schema,
            &payload(vec![
                ("email", FieldValue::Text("hello at studio".into())),
                ("phone", FieldValue::Text("call me".into())),
            ]),
        );
        let names: Vec<_> = bad.iter().map(Violation::field_name).collect();
        assert_eq!(names, vec!["email", "phone"]);
    }

    #[test]
    fn value_shape_must_fit_the_type() {
        let schema = FormSchema::from(vec![
            field("name", FieldType::Text),
            with_options(field("service", FieldType::Select), &["Web"]),
            with_options(field("colors", FieldType::Checkbox), &["Red", "Blue"]),
        ]);

        let violations = validate_submission(
            &schema,
            &payload(vec![
                ("name", FieldValue::Choices(vec!["a".into()])),
                ("service", FieldValue::Choices(vec!["Web".into()])),
                ("colors", FieldValue::Text("Red".into())),
            ]),
        );

        assert_eq!(
            violations,
            vec![
                Violation::InvalidValueShape {
                    field_name: "name".into(),
                    field_type: FieldType::Text
                },
                Violation::InvalidValueShape {
                    field_name: "service".into(),
                    field_type: FieldType::Select
                },
                Violation::InvalidValueShape {
                    field_name: "colors".into(),
                    field_type: FieldType::Checkbox
                },
            ]
        );
    }

    #[test]
    fn unknown_payload_keys_are_reported() {
        let schema = FormSchema::from(vec![field("name", FieldType::Text)]);

        let violations = validate_submission(
            &schema,
            &payload(vec![
                ("name", FieldValue::Text("Ada".into())),
                ("is_admin", FieldValue::Text("yes".into())),
            ]),
        );

        assert_eq!(
            violations,
            vec![Violation::UnexpectedField {
                field_name: "is_admin".into()
            }]
        );
    }
}
