//! Value validation of a post's field map against its post type schema.
//!
//! The validator is pure and never fails: it walks every field schema in
//! group-then-field order and accumulates all violations, so a form can show
//! every problem at once. An empty report is the only success signal.

use std::sync::LazyLock;

use cpt_engine_sdk::{
    FieldGroup, FieldSchema, FieldType, FieldValue, FieldValues, ValidationReport, Violation,
};
use regex::Regex;

#[allow(clippy::unwrap_used)]
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[allow(clippy::unwrap_used)]
static TEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{0,15}$").unwrap());

/// Check `values` against every field schema in `field_groups`.
#[must_use]
pub fn validate_fields(field_groups: &[FieldGroup], values: &FieldValues) -> ValidationReport {
    let mut errors = Vec::new();

    for schema in field_groups.iter().flat_map(|g| g.fields.iter()) {
        let value = values.get(&schema.name).filter(|v| !v.is_empty());

        match value {
            None if schema.required => errors.push(Violation::new(
                &schema.name,
                format!("{} is required", schema.display_label()),
            )),
            None => {}
            Some(value) => {
                if let Err(message) = check_value(schema, value) {
                    errors.push(Violation::new(&schema.name, message));
                }
            }
        }
    }

    ValidationReport { errors }
}

/// Fill absent keys from schema default values. Present keys are never touched.
pub fn apply_defaults(field_groups: &[FieldGroup], values: &mut FieldValues) {
    for schema in field_groups.iter().flat_map(|g| g.fields.iter()) {
        if let Some(default) = &schema.default_value
            && !values.contains_key(&schema.name)
        {
            values.insert(schema.name.clone(), default.clone());
        }
    }
}

fn check_value(schema: &FieldSchema, value: &FieldValue) -> Result<(), String> {
    let label = schema.display_label();
    match &schema.field_type {
        FieldType::Number => check_number(schema, label, value),
        FieldType::Email => match value.as_text() {
            Some(s) if EMAIL_RE.is_match(s) => Ok(()),
            _ => Err(format!("{label} must be a valid email address")),
        },
        FieldType::Url => match value.as_text().map(url::Url::parse) {
            Some(Ok(_)) => Ok(()),
            _ => Err(format!("{label} must be a valid URL")),
        },
        FieldType::Tel => {
            let digits = value.as_text().map(|s| {
                s.chars()
                    .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
                    .collect::<String>()
            });
            match digits {
                Some(d) if TEL_RE.is_match(&d) => Ok(()),
                _ => Err(format!("{label} must be a valid phone number")),
            }
        }
        FieldType::Date => match value.as_text() {
            Some(s) if is_date(s) => Ok(()),
            _ => Err(format!("{label} must be a valid date (YYYY-MM-DD)")),
        },
        FieldType::Boolean => match value {
            FieldValue::Bool(_) => Ok(()),
            FieldValue::Text(s) if matches!(s.as_str(), "true" | "false" | "1" | "0") => Ok(()),
            _ => Err(format!("{label} must be true or false")),
        },
        FieldType::Select => match value.as_text() {
            Some(s) if schema.options.iter().any(|o| o == s) => Ok(()),
            _ => Err(format!(
                "{label} must be one of: {}",
                schema.options.join(", ")
            )),
        },
        FieldType::Checkbox => check_checkbox(schema, label, value),
        FieldType::Text | FieldType::Textarea => match value.as_text() {
            Some(s) => check_text(schema, label, s),
            None => Ok(()),
        },
        FieldType::Other(_) => Ok(()),
    }
}

fn check_number(schema: &FieldSchema, label: &str, value: &FieldValue) -> Result<(), String> {
    let Some(n) = value.as_number() else {
        return Err(format!("{label} must be a valid number"));
    };
    if let Some(min) = schema.min
        && n < min
    {
        return Err(format!("{label} must be at least {min}"));
    }
    if let Some(max) = schema.max
        && n > max
    {
        return Err(format!("{label} must be at most {max}"));
    }
    Ok(())
}

fn check_checkbox(schema: &FieldSchema, label: &str, value: &FieldValue) -> Result<(), String> {
    let selected: Vec<&FieldValue> = match value {
        FieldValue::List(items) => items.iter().collect(),
        FieldValue::Text(_) => vec![value],
        _ => return Err(format!("{label} must be a list of options")),
    };
    for item in selected {
        match item.as_text() {
            Some(s) if schema.options.iter().any(|o| o == s) => {}
            Some(s) => return Err(format!("{label} contains an invalid option '{s}'")),
            None => return Err(format!("{label} must be a list of options")),
        }
    }
    Ok(())
}

fn check_text(schema: &FieldSchema, label: &str, s: &str) -> Result<(), String> {
    let len = s.chars().count();
    if let Some(min) = schema.min_length
        && len < min
    {
        return Err(format!("{label} must be at least {min} characters"));
    }
    if let Some(max) = schema.max_length
        && len > max
    {
        return Err(format!("{label} must be at most {max} characters"));
    }
    if let Some(pattern) = &schema.pattern {
        // Patterns are compiled during shape validation; a stale invalid one matches nothing.
        let matches = Regex::new(pattern).is_ok_and(|re| re.is_match(s));
        if !matches {
            return Err(format!("{label} has an invalid format"));
        }
    }
    Ok(())
}

fn is_date(s: &str) -> bool {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || chrono::DateTime::parse_from_rfc3339(s).is_ok()
}
