//! Public models for the `cpt-engine` module.
//!
//! Schema types (`FieldGroup`, `FieldSchema`, `FieldType`, `FieldValue`,
//! `PostTypeSettings`) carry serde derives because they are persisted as
//! opaque JSON documents. Everything else is a plain transport-agnostic
//! contract type.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::Violation;

/// Field-value bag of a custom post, keyed by `FieldSchema::name`.
pub type FieldValues = BTreeMap<String, FieldValue>;

/// Icon assigned to post types created without one.
pub const DEFAULT_ICON: &str = "dashicons-admin-post";

// ==================== Field schema ====================

/// Declared type of a dynamic field.
///
/// Unknown type names are kept verbatim in `Other` and receive no value checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Email,
    Url,
    Tel,
    Date,
    Boolean,
    Select,
    Checkbox,
    Other(String),
}

impl FieldType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Number => "number",
            Self::Email => "email",
            Self::Url => "url",
            Self::Tel => "tel",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::Other(name) => name,
        }
    }

    /// True for types whose values must be one of `FieldSchema::options`.
    #[must_use]
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Select | Self::Checkbox)
    }
}

impl Default for FieldType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<&str> for FieldType {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Self::Text,
            "textarea" => Self::Textarea,
            "number" => Self::Number,
            "email" => Self::Email,
            "url" => Self::Url,
            "tel" => Self::Tel,
            "date" => Self::Date,
            "boolean" => Self::Boolean,
            "select" => Self::Select,
            "checkbox" => Self::Checkbox,
            _ => Self::Other(raw.trim().to_owned()),
        }
    }
}

impl From<String> for FieldType {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<FieldType> for String {
    fn from(t: FieldType) -> Self {
        match t {
            FieldType::Other(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declaration of one dynamic field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl FieldSchema {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        label: impl Into<String>,
        field_type: FieldType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            label: label.into(),
            field_type,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    #[must_use]
    pub fn with_length(mut self, min_length: Option<usize>, max_length: Option<usize>) -> Self {
        self.min_length = min_length;
        self.max_length = max_length;
        self
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Label used in violation messages; falls back to the field name.
    #[must_use]
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

/// Named, ordered collection of field schemas owned by one post type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldGroup {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

impl FieldGroup {
    pub fn new(id: impl Into<String>, name: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            fields,
        }
    }
}

// ==================== Field values ====================

/// A dynamic field value decoded from the wire format.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Null, empty string and empty list count as "no value".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
            _ => false,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value: finite numbers, or text that parses to one.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        n.is_finite().then_some(n)
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        // Integral and within the exactly representable range.
        #[allow(clippy::cast_possible_truncation)]
        return serde_json::Value::from(n as i64);
    }
    serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<FieldValue> for serde_json::Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Null => Self::Null,
            FieldValue::Bool(b) => Self::Bool(b),
            FieldValue::Number(n) => number_to_json(n),
            FieldValue::Text(s) => Self::String(s),
            FieldValue::List(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            FieldValue::Map(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

// ==================== Post types ====================

/// Type-level settings of a post type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostTypeSettings {
    pub public: bool,
    pub has_archive: bool,
    pub supports: Vec<String>,
}

impl Default for PostTypeSettings {
    fn default() -> Self {
        Self {
            public: true,
            has_archive: true,
            supports: vec!["title".to_owned()],
        }
    }
}

/// Partial settings; absent keys keep the base value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostTypeSettingsPatch {
    pub public: Option<bool>,
    pub has_archive: Option<bool>,
    pub supports: Option<Vec<String>>,
}

impl PostTypeSettingsPatch {
    #[must_use]
    pub fn apply_to(self, base: PostTypeSettings) -> PostTypeSettings {
        PostTypeSettings {
            public: self.public.unwrap_or(base.public),
            has_archive: self.has_archive.unwrap_or(base.has_archive),
            supports: self.supports.unwrap_or(base.supports),
        }
    }
}

/// An operator-defined entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct PostTypeDefinition {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub singular_name: String,
    pub description: Option<String>,
    pub icon: String,
    pub field_groups: Vec<FieldGroup>,
    pub settings: PostTypeSettings,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostTypeDefinition {
    /// All field schemas in group-then-field order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.field_groups.iter().flat_map(|g| g.fields.iter())
    }
}

/// Data for creating a new post type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewPostType {
    pub slug: String,
    pub name: String,
    pub singular_name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub field_groups: Vec<FieldGroup>,
    pub settings: PostTypeSettingsPatch,
}

/// Partial update data for a post type. `field_groups` replaces the whole array.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostTypePatch {
    pub name: Option<String>,
    pub singular_name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub field_groups: Option<Vec<FieldGroup>>,
    pub settings: Option<PostTypeSettingsPatch>,
}

// ==================== Posts ====================

/// Publication status of a custom post. Any other value is kept as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
    Custom(String),
}

impl PostStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Custom(s) => s,
        }
    }

    #[must_use]
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published)
    }
}

impl From<&str> for PostStatus {
    fn from(raw: &str) -> Self {
        match raw.trim() {
            "draft" => Self::Draft,
            "published" => Self::Published,
            other => Self::Custom(other.to_owned()),
        }
    }
}

impl From<String> for PostStatus {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<PostStatus> for String {
    fn from(status: PostStatus) -> Self {
        match status {
            PostStatus::Custom(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One instance of a post type.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomPost {
    pub id: Uuid,
    pub post_type_slug: String,
    pub title: String,
    pub slug: String,
    pub status: PostStatus,
    pub fields: FieldValues,
    pub content: Option<String>,
    pub author_id: Option<Uuid>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new custom post. `slug` is derived from `title` when absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewCustomPost {
    pub title: String,
    pub slug: Option<String>,
    pub status: PostStatus,
    pub fields: FieldValues,
    pub content: Option<String>,
    pub author_id: Option<Uuid>,
}

/// Partial update data for a custom post. `fields` replaces the whole map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomPostPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub status: Option<PostStatus>,
    pub fields: Option<FieldValues>,
    pub content: Option<String>,
    pub author_id: Option<Uuid>,
}

// ==================== Queries ====================

/// Sort key for post listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    PublishedAt,
    Title,
    Slug,
    Status,
}

impl PostSortField {
    /// Accepts both `camelCase` and `snake_case` spellings.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "createdAt" | "created_at" => Some(Self::CreatedAt),
            "updatedAt" | "updated_at" => Some(Self::UpdatedAt),
            "publishedAt" | "published_at" => Some(Self::PublishedAt),
            "title" => Some(Self::Title),
            "slug" => Some(Self::Slug),
            "status" => Some(Self::Status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if raw.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }
}

/// Filter, search, sort and page parameters for post listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostListQuery {
    /// 1-based page number.
    pub page: u64,
    /// Page size; the service default applies when `None`.
    pub limit: Option<u64>,
    pub status: Option<PostStatus>,
    pub search: Option<String>,
    pub sort_by: PostSortField,
    pub sort_order: SortOrder,
}

impl Default for PostListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: None,
            status: None,
            search: None,
            sort_by: PostSortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page (1-based).
    pub current: u64,
    /// Total number of pages.
    pub total: u64,
    /// Number of items on this page.
    pub count: u64,
    pub limit: u64,
    /// Total number of matching posts.
    pub total_items: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostPage {
    pub items: Vec<CustomPost>,
    pub pagination: Pagination,
}

// ==================== Validation reports ====================

/// Outcome of value validation. Success is signalled only by an empty error list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub errors: Vec<Violation>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Human-readable messages, one per violation.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|v| v.message.clone()).collect()
    }
}

/// Violations found for one stored post during batch re-validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostViolations {
    pub post_id: Uuid,
    pub errors: Vec<Violation>,
}

/// Result of checking every stored post of a type against its current schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevalidationReport {
    pub post_type_slug: String,
    pub checked: u64,
    pub invalid: Vec<PostViolations>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_value_decodes_json_generically() {
        let v: FieldValue = serde_json::from_value(json!({
            "a": null, "b": true, "c": 4.5, "d": "x", "e": [1, "two"]
        }))
        .unwrap();
        let FieldValue::Map(map) = v else {
            panic!("expected map");
        };
        assert_eq!(map["a"], FieldValue::Null);
        assert_eq!(map["b"], FieldValue::Bool(true));
        assert_eq!(map["c"], FieldValue::Number(4.5));
        assert_eq!(map["d"], FieldValue::Text("x".to_owned()));
        assert_eq!(
            map["e"],
            FieldValue::List(vec![FieldValue::Number(1.0), FieldValue::from("two")])
        );
    }

    #[test]
    fn integral_numbers_serialize_as_integers() {
        let json = serde_json::to_value(FieldValue::Number(42.0)).unwrap();
        assert_eq!(json, json!(42));
        let json = serde_json::to_value(FieldValue::Number(2.5)).unwrap();
        assert_eq!(json, json!(2.5));
    }

    #[test]
    fn empty_values() {
        assert!(FieldValue::Null.is_empty());
        assert!(FieldValue::from("").is_empty());
        assert!(FieldValue::List(vec![]).is_empty());
        assert!(!FieldValue::from(" ").is_empty());
        assert!(!FieldValue::Bool(false).is_empty());
    }

    #[test]
    fn numeric_view_accepts_numeric_text() {
        assert_eq!(FieldValue::from("42").as_number(), Some(42.0));
        assert_eq!(FieldValue::from(7).as_number(), Some(7.0));
        assert_eq!(FieldValue::from("abc").as_number(), None);
        assert_eq!(FieldValue::from("inf").as_number(), None);
        assert_eq!(FieldValue::Bool(true).as_number(), None);
    }

    #[test]
    fn field_type_round_trips_unknown_names() {
        assert_eq!(FieldType::from("Number"), FieldType::Number);
        assert_eq!(
            FieldType::from("wysiwyg"),
            FieldType::Other("wysiwyg".to_owned())
        );
        assert_eq!(String::from(FieldType::Other("wysiwyg".to_owned())), "wysiwyg");
        let schema: FieldSchema =
            serde_json::from_value(json!({"id": "f1", "name": "rating", "type": "number"}))
                .unwrap();
        assert_eq!(schema.field_type, FieldType::Number);
        assert!(!schema.required);
    }

    #[test]
    fn post_status_keeps_custom_values() {
        assert_eq!(PostStatus::from("published"), PostStatus::Published);
        assert_eq!(
            PostStatus::from("archived"),
            PostStatus::Custom("archived".to_owned())
        );
        assert_eq!(PostStatus::Custom("archived".to_owned()).as_str(), "archived");
    }

    #[test]
    fn settings_patch_merges_over_base() {
        let merged = PostTypeSettingsPatch {
            public: Some(false),
            ..PostTypeSettingsPatch::default()
        }
        .apply_to(PostTypeSettings::default());
        assert!(!merged.public);
        assert!(merged.has_archive);
        assert_eq!(merged.supports, vec!["title".to_owned()]);
    }

    #[test]
    fn sort_parsing() {
        assert_eq!(PostSortField::parse("createdAt"), Some(PostSortField::CreatedAt));
        assert_eq!(PostSortField::parse("title"), Some(PostSortField::Title));
        assert_eq!(PostSortField::parse("bogus"), None);
        assert_eq!(SortOrder::parse("ASC"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::parse("sideways"), None);
    }
}
