//! Core domain types: the denizen record and its loosely typed field values.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Placeholder rendered for a missing `name` or `type`.
pub const UNKNOWN: &str = "Unknown";

// ---------------------------------------------------------------------------
// FieldValue
// ---------------------------------------------------------------------------

/// A single record field as it arrived on the wire.
///
/// Records come from an evolving upstream schema, so any JSON value is
/// accepted and rendered as text on demand instead of being validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValue(pub Value);

impl FieldValue {
    /// Whether the value counts as set: not null, `""`, `false`, zero, or an
    /// empty array/object.
    pub fn is_present(&self) -> bool {
        match &self.0 {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Object(o) => !o.is_empty(),
        }
    }

    /// Text form of the value. Strings are borrowed verbatim; everything else
    /// renders as compact JSON.
    pub fn text(&self) -> Cow<'_, str> {
        match &self.0 {
            Value::String(s) => Cow::Borrowed(s.as_str()),
            other => Cow::Owned(other.to_string()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self(Value::String(s.to_string()))
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text())
    }
}

// ---------------------------------------------------------------------------
// Denizen
// ---------------------------------------------------------------------------

/// One catalogued entity in the world archive.
///
/// Every field is optional. A JSON `null` is treated like an absent key.
/// Keys this type does not know about are kept in [`Denizen::extra`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Denizen {
    /// Identifier; only used as a recency sort key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FieldValue>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<FieldValue>,
    /// Category label (`type` on the wire).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<FieldValue>,
    /// Faction or affiliation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allegiance: Option<FieldValue>,
    /// Thematic or geographic grouping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threat_level: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lore: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<FieldValue>,
    /// Unrecognised keys, preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Denizen {
    /// Build a record from an arbitrary JSON value.
    ///
    /// Non-object values yield a record with every field absent.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "unreadable record, treating as empty");
                Self::default()
            }),
            other => {
                tracing::debug!(kind = json_kind(&other), "non-object record, treating as empty");
                Self::default()
            }
        }
    }

    /// Display name, `Unknown` when absent.
    pub fn name(&self) -> Cow<'_, str> {
        text_or(&self.name, UNKNOWN)
    }

    /// Category label, `Unknown` when absent.
    pub fn kind(&self) -> Cow<'_, str> {
        text_or(&self.kind, UNKNOWN)
    }

    pub fn allegiance(&self) -> Option<Cow<'_, str>> {
        present_text(&self.allegiance)
    }

    pub fn domain(&self) -> Option<Cow<'_, str>> {
        present_text(&self.domain)
    }

    pub fn description(&self) -> Option<Cow<'_, str>> {
        present_text(&self.description)
    }

    /// Recency sort key: the stringified `id`, empty when absent.
    pub fn sort_key(&self) -> Cow<'_, str> {
        text_or(&self.id, "")
    }
}

fn text_or<'a>(field: &'a Option<FieldValue>, default: &'static str) -> Cow<'a, str> {
    field
        .as_ref()
        .map(FieldValue::text)
        .unwrap_or(Cow::Borrowed(default))
}

fn present_text(field: &Option<FieldValue>) -> Option<Cow<'_, str>> {
    field
        .as_ref()
        .filter(|v| v.is_present())
        .map(FieldValue::text)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
