//! Link resolution against the includes table
//!
//! Resolution is a plain lookup: no network, no mutation of the table, and a
//! miss is an ordinary `None`, never an error.

use serde_json::Value;
use smol_str::SmolStr;

use crate::includes::{Includes, Link, LinkKind, Record};

/// Find the record a link points at. Lookup is linear over the partition for
/// the link's kind and the first record with a matching id wins.
pub fn resolve<'a>(link: &Link, includes: &'a Includes) -> Option<&'a Record> {
    let found = includes
        .partition(link.kind)
        .iter()
        .find(|record| record.id == link.id);
    if found.is_none() {
        tracing::trace!(kind = %link.kind, id = %link.id, "link not found in includes");
    }
    found
}

/// Decode a raw link and resolve it. Malformed links resolve to `None`.
pub fn resolve_value<'a>(value: &Value, includes: &'a Includes) -> Option<&'a Record> {
    Link::from_value(value).and_then(|link| resolve(&link, includes))
}

/// The parts of an asset record the site uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Asset {
    pub id: SmolStr,
    /// As delivered, usually scheme-relative (`//images.ctfassets.net/...`).
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content_type: Option<String>,
}

impl Asset {
    pub fn from_record(record: &Record) -> Self {
        let mut asset = Self::from_fields(&record.fields);
        asset.id = record.id.clone();
        asset
    }

    /// Read an asset out of a `fields`-shaped object (`title`, `description`, `file`).
    pub fn from_fields(fields: &Value) -> Self {
        let file = fields.get("file");
        Self {
            id: SmolStr::default(),
            url: file
                .and_then(|file| crate::non_empty_str(file, "url"))
                .map(str::to_owned),
            title: crate::non_empty_str(fields, "title").map(str::to_owned),
            description: crate::non_empty_str(fields, "description").map(str::to_owned),
            content_type: file
                .and_then(|file| crate::non_empty_str(file, "contentType"))
                .map(str::to_owned),
        }
    }

    /// The url with its scheme filled in, if the asset has one.
    pub fn absolute_url(&self) -> Option<String> {
        self.url.as_deref().map(normalize_asset_url)
    }

    /// Alt text for an image of this asset: description, else title, else empty.
    pub fn alt_text(&self) -> &str {
        self.description
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or("")
    }
}

/// Turn a scheme-relative url (`//host/path`) into an `https:` one.
/// Anything else is returned as is.
pub fn normalize_asset_url(url: &str) -> String {
    if url.starts_with("//") {
        format!("https:{url}")
    } else {
        url.to_owned()
    }
}

/// Resolve either an inline asset or a link to one.
///
/// Inline assets come in two shapes: a full record (`{ "fields": { "file": ... } }`)
/// or a bare fields object (`{ "file": ... }`). Everything else is treated as a
/// link into the asset partition.
pub fn resolve_asset(value: &Value, includes: &Includes) -> Option<Asset> {
    if let Some(fields) = value.get("fields").filter(|f| f.get("file").is_some()) {
        let mut asset = Asset::from_fields(fields);
        if let Some(id) = value.pointer("/sys/id").and_then(Value::as_str) {
            asset.id = SmolStr::new(id);
        }
        return Some(asset);
    }
    if value.get("file").is_some() {
        return Some(Asset::from_fields(value));
    }

    let link = Link::from_value(value)?;
    if link.kind != LinkKind::Asset {
        tracing::debug!(id = %link.id, "expected an asset link, got {}", link.kind);
        return None;
    }
    resolve(&link, includes).map(Asset::from_record)
}

/// Absolute url of an inline asset or asset link, `None` when the link
/// doesn't resolve or the asset has no file url.
pub fn asset_url(value: &Value, includes: &Includes) -> Option<String> {
    resolve_asset(value, includes).and_then(|asset| asset.absolute_url())
}
