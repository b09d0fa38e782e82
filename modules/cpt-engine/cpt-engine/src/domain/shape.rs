//! Structural validation of post type definitions.
//!
//! This checks the *shape* of a definition (ids, names, types, constraint
//! sanity), never field values. Every violation found is collected and the
//! whole definition is rejected with a single `DomainError::InvalidShape`.

use std::collections::HashSet;
use std::sync::LazyLock;

use cpt_engine_sdk::{FieldGroup, FieldSchema, FieldType, Violation};
use regex::Regex;
use serde_json::{Map, Value};

use super::error::DomainError;

pub const MAX_SLUG_LEN: usize = 64;

static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[a-z0-9][a-z0-9_-]*$").unwrap()
});

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Validate the identifying attributes and field groups of a definition.
///
/// # Errors
/// Returns `DomainError::InvalidShape` listing every violation found.
pub fn validate_definition(
    slug: &str,
    name: &str,
    field_groups: &[FieldGroup],
) -> Result<(), DomainError> {
    let mut violations = identity_violations(slug, name);
    violations.extend(field_group_violations(field_groups));

    if violations.is_empty() {
        Ok(())
    } else {
        Err(DomainError::invalid_shape(violations))
    }
}

fn identity_violations(slug: &str, name: &str) -> Vec<Violation> {
    let mut violations = Vec::new();

    if blank(slug) {
        violations.push(Violation::new("slug", "must not be empty"));
    } else if slug.len() > MAX_SLUG_LEN {
        violations.push(Violation::new(
            "slug",
            format!("must be at most {MAX_SLUG_LEN} characters"),
        ));
    } else if !SLUG_RE.is_match(slug) {
        violations.push(Violation::new(
            "slug",
            "must contain only lowercase letters, digits, '-' or '_' and start with a letter or digit",
        ));
    }

    if blank(name) {
        violations.push(Violation::new("name", "must not be empty"));
    }

    violations
}

/// Decode the wire form of a new definition's field groups.
///
/// `id`, `name` and `type` must be strings and `fields` an array; absent,
/// null or mistyped keys are reported alongside every other violation of the
/// definition.
///
/// # Errors
/// Returns `DomainError::InvalidShape` listing every violation found.
pub fn decode_definition(
    slug: &str,
    name: &str,
    raw: Vec<Value>,
) -> Result<Vec<FieldGroup>, DomainError> {
    decode_with(identity_violations(slug, name), raw)
}

/// Decode the wire form of a replacement field group list.
///
/// # Errors
/// Returns `DomainError::InvalidShape` listing every violation found.
pub fn decode_field_groups(raw: Vec<Value>) -> Result<Vec<FieldGroup>, DomainError> {
    decode_with(Vec::new(), raw)
}

fn decode_with(
    mut violations: Vec<Violation>,
    raw: Vec<Value>,
) -> Result<Vec<FieldGroup>, DomainError> {
    let mut wire = Vec::new();
    let groups: Vec<FieldGroup> = raw
        .into_iter()
        .enumerate()
        .map(|(gi, group)| decode_group(gi, group, &mut wire))
        .collect();

    // Well-formed input gets the full structural check from the registry.
    if wire.is_empty() {
        return Ok(groups);
    }

    let structural: Vec<Violation> = field_group_violations(&groups)
        .into_iter()
        .filter(|v| !wire.iter().any(|w| covers(&w.field, &v.field)))
        .collect();
    violations.extend(wire);
    violations.extend(structural);
    Err(DomainError::invalid_shape(violations))
}

/// `outer` is `inner` or one of its ancestors.
fn covers(outer: &str, inner: &str) -> bool {
    inner
        .strip_prefix(outer)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(['.', '[']))
}

fn decode_group(gi: usize, raw: Value, out: &mut Vec<Violation>) -> FieldGroup {
    let path = format!("fieldGroups[{gi}]");
    let Value::Object(mut obj) = raw else {
        out.push(Violation::new(path, "must be an object"));
        return FieldGroup::default();
    };

    require_string(&path, &mut obj, "id", out);
    require_string(&path, &mut obj, "name", out);
    let items = match obj.remove("fields") {
        Some(Value::Array(items)) => items,
        None | Some(Value::Null) => {
            out.push(Violation::new(format!("{path}.fields"), "is required"));
            Vec::new()
        }
        Some(_) => {
            out.push(Violation::new(format!("{path}.fields"), "must be an array"));
            Vec::new()
        }
    };
    let fields = items
        .into_iter()
        .enumerate()
        .map(|(fi, field)| decode_field(&format!("{path}.fields[{fi}]"), field, out))
        .collect();

    let mut group = serde_json::from_value::<FieldGroup>(Value::Object(obj)).unwrap_or_else(|e| {
        out.push(Violation::new(path.clone(), format!("is malformed: {e}")));
        FieldGroup::default()
    });
    group.fields = fields;
    group
}

fn decode_field(path: &str, raw: Value, out: &mut Vec<Violation>) -> FieldSchema {
    let Value::Object(mut obj) = raw else {
        out.push(Violation::new(path, "must be an object"));
        return FieldSchema::default();
    };

    for key in ["id", "name", "type"] {
        require_string(path, &mut obj, key, out);
    }

    serde_json::from_value(Value::Object(obj)).unwrap_or_else(|e| {
        out.push(Violation::new(path, format!("is malformed: {e}")));
        FieldSchema::default()
    })
}

/// Report a missing or non-string `key` and blank it so decoding can go on.
fn require_string(path: &str, obj: &mut Map<String, Value>, key: &str, out: &mut Vec<Violation>) {
    let problem = match obj.get(key) {
        Some(Value::String(_)) => return,
        None | Some(Value::Null) => "is required",
        Some(_) => "must be a string",
    };
    out.push(Violation::new(format!("{path}.{key}"), problem));
    obj.insert(key.to_owned(), Value::String(String::new()));
}

/// Collect structural violations of a field group list.
#[must_use]
pub fn field_group_violations(field_groups: &[FieldGroup]) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut group_ids = HashSet::new();
    let mut field_names = HashSet::new();

    for (gi, group) in field_groups.iter().enumerate() {
        let path = format!("fieldGroups[{gi}]");

        if blank(&group.id) {
            violations.push(Violation::new(format!("{path}.id"), "must not be empty"));
        } else if !group_ids.insert(group.id.as_str()) {
            violations.push(Violation::new(
                format!("{path}.id"),
                format!("duplicate field group id '{}'", group.id),
            ));
        }
        if blank(&group.name) {
            violations.push(Violation::new(format!("{path}.name"), "must not be empty"));
        }

        for (fi, field) in group.fields.iter().enumerate() {
            let field_path = format!("{path}.fields[{fi}]");
            field_violations(&field_path, field, &mut field_names, &mut violations);
        }
    }

    violations
}

fn field_violations<'a>(
    path: &str,
    field: &'a FieldSchema,
    seen_names: &mut HashSet<&'a str>,
    out: &mut Vec<Violation>,
) {
    if blank(&field.id) {
        out.push(Violation::new(format!("{path}.id"), "must not be empty"));
    }
    if blank(&field.name) {
        out.push(Violation::new(format!("{path}.name"), "must not be empty"));
    } else if !seen_names.insert(field.name.as_str()) {
        out.push(Violation::new(
            format!("{path}.name"),
            format!("duplicate field name '{}'", field.name),
        ));
    }
    if matches!(&field.field_type, FieldType::Other(t) if blank(t)) {
        out.push(Violation::new(format!("{path}.type"), "must not be empty"));
    }

    if let (Some(min), Some(max)) = (field.min, field.max)
        && min > max
    {
        out.push(Violation::new(
            format!("{path}.min"),
            "must not be greater than max",
        ));
    }
    if let (Some(min), Some(max)) = (field.min_length, field.max_length)
        && min > max
    {
        out.push(Violation::new(
            format!("{path}.minLength"),
            "must not be greater than maxLength",
        ));
    }
    if let Some(pattern) = &field.pattern
        && let Err(e) = Regex::new(pattern)
    {
        out.push(Violation::new(
            format!("{path}.pattern"),
            format!("is not a valid regular expression: {e}"),
        ));
    }
    if field.field_type.is_choice() && field.options.is_empty() {
        out.push(Violation::new(
            format!("{path}.options"),
            format!("a {} field must declare at least one option", field.field_type),
        ));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn text(id: &str, name: &str) -> FieldSchema {
        FieldSchema::new(id, name, name, FieldType::Text)
    }

    fn shape_violations(groups: &[FieldGroup]) -> Vec<String> {
        match validate_definition("book", "Books", groups) {
            Ok(()) => vec![],
            Err(DomainError::InvalidShape { violations }) => {
                violations.into_iter().map(|v| v.field).collect()
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn accepts_well_formed_groups_including_empty_ones() {
        let groups = vec![
            FieldGroup::new("g1", "Main", vec![text("f1", "title"), text("f2", "isbn")]),
            FieldGroup::new("g2", "Empty", vec![]),
        ];
        assert!(shape_violations(&groups).is_empty());
        assert!(shape_violations(&[]).is_empty());
    }

    #[test]
    fn rejects_group_without_id_or_name() {
        let groups = vec![FieldGroup::new("", " ", vec![])];
        assert_eq!(
            shape_violations(&groups),
            vec!["fieldGroups[0].id", "fieldGroups[0].name"]
        );
    }

    #[test]
    fn rejects_field_without_id_name_or_type() {
        let field = FieldSchema {
            label: "Nameless".to_owned(),
            ..FieldSchema::default()
        };
        let groups = vec![FieldGroup::new("g1", "Main", vec![text("f1", "ok"), field])];
        assert_eq!(
            shape_violations(&groups),
            vec![
                "fieldGroups[0].fields[1].id",
                "fieldGroups[0].fields[1].name",
                "fieldGroups[0].fields[1].type",
            ]
        );
    }

    #[test]
    fn rejects_duplicate_field_names_across_groups() {
        let groups = vec![
            FieldGroup::new("g1", "A", vec![text("f1", "isbn")]),
            FieldGroup::new("g2", "B", vec![text("f2", "isbn")]),
        ];
        assert_eq!(shape_violations(&groups), vec!["fieldGroups[1].fields[0].name"]);
    }

    #[test]
    fn rejects_duplicate_group_ids() {
        let groups = vec![
            FieldGroup::new("g1", "A", vec![]),
            FieldGroup::new("g1", "B", vec![]),
        ];
        assert_eq!(shape_violations(&groups), vec!["fieldGroups[1].id"]);
    }

    #[test]
    fn rejects_inconsistent_constraints() {
        let field = FieldSchema::new("f1", "score", "Score", FieldType::Number)
            .with_range(Some(10.0), Some(1.0));
        let pattern = text("f2", "code").with_pattern("([a-z");
        let choice = FieldSchema::new("f3", "color", "Color", FieldType::Select);
        let groups = vec![FieldGroup::new("g1", "A", vec![field, pattern, choice])];
        assert_eq!(
            shape_violations(&groups),
            vec![
                "fieldGroups[0].fields[0].min",
                "fieldGroups[0].fields[1].pattern",
                "fieldGroups[0].fields[2].options",
            ]
        );
    }

    #[test]
    fn unknown_types_are_structurally_fine() {
        let field = FieldSchema::new("f1", "body", "Body", FieldType::from("wysiwyg"));
        let groups = vec![FieldGroup::new("g1", "A", vec![field])];
        assert!(shape_violations(&groups).is_empty());
    }

    #[test]
    fn slug_must_be_url_safe() {
        for bad in ["", "Has Caps", "-leading", "sp ace", "sla/sh"] {
            let err = validate_definition(bad, "Name", &[]).unwrap_err();
            assert!(
                matches!(&err, DomainError::InvalidShape { violations } if violations[0].field == "slug"),
                "slug {bad:?} should be rejected"
            );
        }
        for good in ["testimonial", "case-study", "faq_item", "v2"] {
            assert!(validate_definition(good, "Name", &[]).is_ok(), "{good}");
        }
    }

    fn decode_violations(raw: serde_json::Value) -> Vec<String> {
        let serde_json::Value::Array(groups) = raw else {
            panic!("expected an array");
        };
        match decode_definition("book", "Books", groups) {
            Ok(_) => vec![],
            Err(DomainError::InvalidShape { violations }) => {
                violations.into_iter().map(|v| v.field).collect()
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn decode_accepts_well_formed_wire_groups() {
        let groups = decode_field_groups(vec![serde_json::json!({
            "id": "g1",
            "name": "Main",
            "fields": [{"id": "f1", "name": "isbn", "label": "ISBN", "type": "text", "required": true}]
        })])
        .unwrap();
        assert_eq!(groups[0].fields[0].name, "isbn");
        assert!(groups[0].fields[0].required);
    }

    #[test]
    fn decode_reports_absent_null_and_mistyped_keys() {
        let fields = decode_violations(serde_json::json!([
            {"id": "g1", "name": "A"},
            {"id": "g2", "name": "B", "fields": {"not": "an array"}},
            "not an object",
            {"id": "g4", "name": "D", "fields": [
                {"id": "f1", "name": "x"},
                42
            ]}
        ]));
        assert_eq!(
            fields,
            vec![
                "fieldGroups[0].fields",
                "fieldGroups[1].fields",
                "fieldGroups[2]",
                "fieldGroups[3].fields[0].type",
                "fieldGroups[3].fields[1]",
            ]
        );
    }

    #[test]
    fn decode_keeps_structural_violations_outside_wire_errors() {
        let fields = decode_violations(serde_json::json!([
            {"id": "g1", "name": "A", "fields": [
                {"id": "f1", "name": "dup", "type": "text"},
                {"id": "f2", "name": "dup", "type": null}
            ]}
        ]));
        assert_eq!(
            fields,
            vec!["fieldGroups[0].fields[1].type", "fieldGroups[0].fields[1].name"]
        );
    }

    #[test]
    fn decode_reports_mistyped_attributes_at_the_field() {
        let fields = decode_violations(serde_json::json!([
            {"id": "g1", "name": "A", "fields": [
                {"id": "f1", "name": "n", "type": "number", "min": "low"}
            ]}
        ]));
        assert_eq!(fields, vec!["fieldGroups[0].fields[0]"]);
    }

    #[test]
    fn covers_matches_ancestors_only() {
        assert!(covers("fieldGroups[1]", "fieldGroups[1].fields[0].id"));
        assert!(covers("fieldGroups[1].fields", "fieldGroups[1].fields"));
        assert!(!covers("fieldGroups[1]", "fieldGroups[10].id"));
    }

    #[test]
    fn name_is_required() {
        let err = validate_definition("book", "  ", &[]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidShape { violations } if violations[0].field == "name"));
    }
}
