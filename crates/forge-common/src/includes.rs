//! Links and the includes side-table
//!
//! A delivery API response carries its primary `items` plus an `includes`
//! object holding every asset and entry those items point at. Items never
//! embed those records, they carry links:
//!
//! ```json
//! { "sys": { "type": "Link", "linkType": "Asset", "id": "4shwYI3POEGkw0Eg6kcyaQ" } }
//! ```
//!
//! The table built here is read-only once constructed and is shared by every
//! post normalized from the same response.

use serde_json::Value;
use smol_str::SmolStr;

/// Which partition of the includes table a link points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Asset,
    Entry,
}

impl LinkKind {
    pub fn from_link_type(link_type: &str) -> Option<Self> {
        match link_type {
            "Asset" => Some(Self::Asset),
            "Entry" => Some(Self::Entry),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "Asset",
            Self::Entry => "Entry",
        }
    }
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed pointer to a record in the includes table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    pub kind: LinkKind,
    pub id: SmolStr,
}

impl Link {
    pub fn new(kind: LinkKind, id: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    pub fn asset(id: impl Into<SmolStr>) -> Self {
        Self::new(LinkKind::Asset, id)
    }

    pub fn entry(id: impl Into<SmolStr>) -> Self {
        Self::new(LinkKind::Entry, id)
    }

    /// Decode a raw link. Returns `None` when `sys` is missing, the id is
    /// missing or empty, or `linkType` is not one of the known kinds.
    pub fn from_value(value: &Value) -> Option<Self> {
        let sys = value.get("sys")?;
        let kind = sys
            .get("linkType")
            .and_then(Value::as_str)
            .and_then(LinkKind::from_link_type)?;
        Self::with_id(kind, sys)
    }

    /// Decode a link's id as a link of kind `kind`, whatever its `linkType`
    /// says.
    pub fn from_value_as(value: &Value, kind: LinkKind) -> Option<Self> {
        Self::with_id(kind, value.get("sys")?)
    }

    fn with_id(kind: LinkKind, sys: &Value) -> Option<Self> {
        let id = sys
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())?;
        Some(Self::new(kind, id))
    }
}

/// One asset or entry as delivered by the API: its `sys` metadata we care
/// about plus the untouched `fields` object.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: SmolStr,
    pub content_type: Option<SmolStr>,
    pub created_at: Option<String>,
    /// Always a JSON object (empty when the payload had none).
    pub fields: Value,
    /// Whether the payload carried a `fields` object at all.
    pub has_fields: bool,
}

impl Record {
    /// Decode a record. Never fails: missing pieces come back empty, and a
    /// record without an id simply can never be the target of a link.
    pub fn from_value(value: &Value) -> Self {
        let sys = value.get("sys");
        let id = sys
            .and_then(|sys| sys.get("id"))
            .and_then(Value::as_str)
            .map(SmolStr::new)
            .unwrap_or_default();
        let content_type = sys
            .and_then(|sys| sys.pointer("/contentType/sys/id"))
            .and_then(Value::as_str)
            .map(SmolStr::new);
        let created_at = sys
            .and_then(|sys| sys.get("createdAt"))
            .and_then(Value::as_str)
            .map(str::to_owned);
        let (fields, has_fields) = match value.get("fields") {
            Some(fields @ Value::Object(_)) => (fields.clone(), true),
            _ => (Value::Object(Default::default()), false),
        };

        Self {
            id,
            content_type,
            created_at,
            fields,
            has_fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).filter(|v| !v.is_null())
    }

    pub fn str_field(&self, name: &str) -> Option<&str> {
        crate::non_empty_str(&self.fields, name)
    }
}

/// The includes side-table, partitioned by link kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Includes {
    assets: Vec<Record>,
    entries: Vec<Record>,
}

impl Includes {
    pub fn new(assets: Vec<Record>, entries: Vec<Record>) -> Self {
        Self { assets, entries }
    }

    /// Decode the `includes` object of a response (`{ "Asset": [...], "Entry": [...] }`).
    /// Anything that isn't shaped like that decodes to an empty table.
    pub fn from_value(value: &Value) -> Self {
        Self {
            assets: Self::decode_partition(value, LinkKind::Asset),
            entries: Self::decode_partition(value, LinkKind::Entry),
        }
    }

    fn decode_partition(value: &Value, kind: LinkKind) -> Vec<Record> {
        let Some(items) = value.get(kind.as_str()).and_then(Value::as_array) else {
            return Vec::new();
        };
        items
            .iter()
            .map(Record::from_value)
            .filter(|record| {
                if record.id.is_empty() {
                    tracing::debug!(%kind, "dropping included record without an id");
                    false
                } else {
                    true
                }
            })
            .collect()
    }

    pub fn partition(&self, kind: LinkKind) -> &[Record] {
        match kind {
            LinkKind::Asset => &self.assets,
            LinkKind::Entry => &self.entries,
        }
    }

    pub fn assets(&self) -> &[Record] {
        &self.assets
    }

    pub fn entries(&self) -> &[Record] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty() && self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_link_from_value() {
        let raw = json!({ "sys": { "type": "Link", "linkType": "Entry", "id": "author-1" } });
        assert_eq!(Link::from_value(&raw), Some(Link::entry("author-1")));
    }

    #[test]
    fn test_link_rejects_malformed() {
        assert_eq!(Link::from_value(&json!({})), None);
        assert_eq!(Link::from_value(&json!({ "sys": { "linkType": "Asset" } })), None);
        assert_eq!(
            Link::from_value(&json!({ "sys": { "linkType": "Asset", "id": "" } })),
            None
        );
        assert_eq!(
            Link::from_value(&json!({ "sys": { "linkType": "Space", "id": "x" } })),
            None
        );
        assert_eq!(Link::from_value(&json!("a string")), None);
    }

    #[test]
    fn test_link_forced_kind() {
        let raw = json!({ "sys": { "id": "img" } });
        assert_eq!(Link::from_value(&raw), None);
        assert_eq!(Link::from_value_as(&raw, LinkKind::Asset), Some(Link::asset("img")));

        let entry = json!({ "sys": { "id": "img", "linkType": "Entry" } });
        assert_eq!(Link::from_value_as(&entry, LinkKind::Asset), Some(Link::asset("img")));

        let blank = json!({ "sys": { "id": "", "linkType": "Asset" } });
        assert_eq!(Link::from_value_as(&blank, LinkKind::Asset), None);
    }

    #[test]
    fn test_includes_from_value() {
        let raw = json!({
            "Asset": [
                { "sys": { "id": "a1" }, "fields": { "title": "One" } },
                { "fields": { "title": "no id" } }
            ],
            "Entry": [
                {
                    "sys": {
                        "id": "e1",
                        "createdAt": "2024-01-01T00:00:00Z",
                        "contentType": { "sys": { "id": "author" } }
                    },
                    "fields": { "name": "Ada" }
                }
            ]
        });

        let includes = Includes::from_value(&raw);
        assert_eq!(includes.assets().len(), 1);
        assert_eq!(includes.entries().len(), 1);

        let entry = &includes.entries()[0];
        assert_eq!(entry.id, "e1");
        assert_eq!(entry.content_type.as_deref(), Some("author"));
        assert_eq!(entry.created_at.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(entry.str_field("name"), Some("Ada"));
    }

    #[test]
    fn test_includes_garbage_is_empty() {
        assert!(Includes::from_value(&json!(null)).is_empty());
        assert!(Includes::from_value(&json!({ "Asset": "nope" })).is_empty());
    }

    #[test]
    fn test_record_without_fields() {
        let record = Record::from_value(&json!({ "sys": { "id": "x" } }));
        assert!(record.fields.is_object());
        assert!(!record.has_fields);
        assert_eq!(record.field("anything"), None);

        let empty = Record::from_value(&json!({ "sys": { "id": "y" }, "fields": {} }));
        assert!(empty.has_fields);
    }
}
