//! Flattening raw `blogPost` entries into [`Post`]s
//!
//! Everything here is total: a missing or malformed field falls back to its
//! documented default and never aborts normalization of the entry.

use std::sync::Arc;

use forge_common::{Includes, Record, asset_url, non_empty_str, resolve_value, str_array};
use serde_json::Value;
use smol_str::SmolStr;

use crate::richtext::{Document, RenderOptions, render_post_content};

pub const DEFAULT_TWITTER_CARD: &str = "summary_large_image";
pub const DEFAULT_META_ROBOTS: &str = "index,follow";

/// A post body: the raw content tree plus the includes table it resolves against.
#[derive(Debug, Clone, Default)]
pub struct PostContent {
    pub raw: Option<Value>,
    pub includes: Arc<Includes>,
}

impl PostContent {
    pub fn new(raw: Option<Value>, includes: Arc<Includes>) -> Self {
        Self { raw, includes }
    }

    /// Decoded rich-text tree, if the body is one.
    pub fn document(&self) -> Option<Document> {
        self.raw
            .as_ref()
            .filter(|raw| Document::is_document(raw))
            .map(Document::from_value)
    }

    pub fn to_html(&self, options: RenderOptions) -> String {
        render_post_content(self.raw.as_ref(), &self.includes, options)
    }

    /// Characters of top-level text, zero for plain or missing bodies.
    pub fn text_length(&self) -> usize {
        self.document().map_or(0, |doc| doc.text_length())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Author {
    pub name: Option<String>,
    pub bio: Option<String>,
    /// Absolute avatar url
    pub avatar: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    /// Passed through untouched
    pub social_links: Option<Value>,
    pub expertise: Vec<String>,
}

impl Author {
    pub fn from_record(record: &Record, includes: &Includes) -> Self {
        let fields = &record.fields;
        Self {
            name: owned(fields, "name"),
            bio: owned(fields, "bio"),
            avatar: fields
                .get("avatar")
                .and_then(|avatar| asset_url(avatar, includes)),
            email: owned(fields, "email"),
            website: owned(fields, "website"),
            social_links: fields.get("socialLinks").filter(|v| !v.is_null()).cloned(),
            expertise: str_array(fields, "expertise"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Category {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
}

impl Category {
    pub fn from_record(record: &Record) -> Self {
        let fields = &record.fields;
        Self {
            name: owned(fields, "name"),
            slug: owned(fields, "slug"),
            description: owned(fields, "description"),
            icon: owned(fields, "icon"),
            color: owned(fields, "color"),
            seo_title: owned(fields, "seoTitle"),
            seo_description: owned(fields, "seoDescription"),
        }
    }
}

/// Search and social metadata, with every fallback already applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Seo {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub og_title: String,
    pub og_description: String,
    pub og_image: Option<String>,
    pub twitter_card: String,
    pub canonical_url: Option<String>,
    /// Author-supplied JSON-LD, passed through
    pub structured_data: Option<Value>,
    pub meta_robots: String,
}

#[derive(Debug, Clone, Default)]
pub struct Post {
    pub id: SmolStr,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: PostContent,
    pub featured_image: Option<String>,
    pub author: Option<Author>,
    pub category: Option<Category>,
    pub tags: Vec<String>,
    pub publish_date: Option<String>,
    pub last_modified: Option<String>,
    /// `sys.createdAt`, used where the publish date is missing
    pub created_at: Option<String>,
    /// Minutes
    pub reading_time: Option<u32>,
    pub seo: Seo,
    pub featured: bool,
    pub allow_comments: bool,
}

impl Post {
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().and_then(|c| c.name.as_deref())
    }

    pub fn category_slug(&self) -> Option<&str> {
        self.category.as_ref().and_then(|c| c.slug.as_deref())
    }

    pub fn author_name(&self) -> Option<&str> {
        self.author.as_ref().and_then(|a| a.name.as_deref())
    }
}

/// Flatten a raw entry into a [`Post`], resolving author, category and image
/// links against `includes`.
pub fn normalize(entry: &Value, includes: &Arc<Includes>) -> Post {
    let record = Record::from_value(entry);
    let fields = &record.fields;

    let title = owned(fields, "title").unwrap_or_default();
    let excerpt = owned(fields, "excerpt").unwrap_or_default();
    let featured_image = fields
        .get("featuredImage")
        .and_then(|image| asset_url(image, includes));
    let og_image = fields
        .get("ogImage")
        .filter(|image| !image.is_null())
        .or_else(|| fields.get("featuredImage"))
        .and_then(|image| asset_url(image, includes));

    let author = linked_record(fields.get("author"), includes)
        .map(|record| Author::from_record(&record, includes));
    let category = linked_record(fields.get("category"), includes)
        .map(|record| Category::from_record(&record));

    let seo = Seo {
        title: owned(fields, "seoTitle").unwrap_or_else(|| title.clone()),
        description: owned(fields, "seoDescription").unwrap_or_else(|| excerpt.clone()),
        keywords: str_array(fields, "seoKeywords"),
        og_title: owned(fields, "ogTitle").unwrap_or_else(|| title.clone()),
        og_description: owned(fields, "ogDescription").unwrap_or_else(|| excerpt.clone()),
        og_image,
        twitter_card: owned(fields, "twitterCard")
            .unwrap_or_else(|| DEFAULT_TWITTER_CARD.to_string()),
        canonical_url: owned(fields, "canonicalUrl"),
        structured_data: fields
            .get("structuredData")
            .filter(|v| !v.is_null())
            .cloned(),
        meta_robots: owned(fields, "metaRobots")
            .unwrap_or_else(|| DEFAULT_META_ROBOTS.to_string()),
    };

    if record.id.is_empty() {
        tracing::debug!(title = %title, "post entry has no sys.id");
    }

    Post {
        id: record.id.clone(),
        slug: owned(fields, "slug").unwrap_or_default(),
        content: PostContent::new(
            fields.get("content").filter(|v| !v.is_null()).cloned(),
            Arc::clone(includes),
        ),
        featured_image,
        author,
        category,
        tags: str_array(fields, "tags"),
        publish_date: owned(fields, "publishDate"),
        last_modified: owned(fields, "lastModified"),
        created_at: record.created_at.clone(),
        reading_time: fields.get("readingTime").and_then(minutes),
        seo,
        featured: fields.get("featured").and_then(Value::as_bool).unwrap_or(false),
        allow_comments: fields.get("allowComments").and_then(Value::as_bool) != Some(false),
        title,
        excerpt,
    }
}

/// Normalize a `blogCategory` entry. Entries without any fields yield `None`.
pub fn normalize_category(entry: &Value) -> Option<Category> {
    entry.get("fields").filter(|f| f.is_object())?;
    Some(Category::from_record(&Record::from_value(entry)))
}

/// A delivery API `entries` response: `{ items, includes, total }`.
#[derive(Debug, Clone, Default)]
pub struct EntryCollection {
    pub items: Vec<Value>,
    pub includes: Arc<Includes>,
    pub total: u64,
}

impl EntryCollection {
    /// Decode a response body. Missing pieces default to empty and zero.
    pub fn from_value(payload: &Value) -> Self {
        let items = match payload.get("items") {
            Some(Value::Array(items)) => items.clone(),
            Some(other) => {
                tracing::warn!(kind = json_kind(other), "response `items` is not an array");
                Vec::new()
            }
            None => Vec::new(),
        };
        let includes = payload
            .get("includes")
            .map(Includes::from_value)
            .unwrap_or_default();
        let total = payload
            .get("total")
            .and_then(Value::as_u64)
            .unwrap_or(items.len() as u64);

        Self {
            items,
            includes: Arc::new(includes),
            total,
        }
    }

    pub fn from_slice(bytes: &[u8]) -> forge_common::Result<Self> {
        let payload: Value = serde_json::from_slice(bytes)?;
        Ok(Self::from_value(&payload))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn posts(&self) -> Vec<Post> {
        self.items
            .iter()
            .map(|item| normalize(item, &self.includes))
            .collect()
    }

    /// The first item as a post, which is what a by-slug query returns.
    pub fn first_post(&self) -> Option<Post> {
        self.items
            .first()
            .map(|item| normalize(item, &self.includes))
    }

    pub fn categories(&self) -> Vec<Category> {
        self.items.iter().filter_map(normalize_category).collect()
    }
}

fn owned(fields: &Value, key: &str) -> Option<String> {
    non_empty_str(fields, key).map(str::to_owned)
}

/// Resolve an entry link, or accept an inline entry that already carries its fields.
/// An included entry without `fields` counts as missing.
fn linked_record(value: Option<&Value>, includes: &Includes) -> Option<Record> {
    let value = value?;
    if value.get("fields").is_some_and(Value::is_object) {
        return Some(Record::from_value(value));
    }
    let Some(record) = resolve_value(value, includes) else {
        if !value.is_null() {
            tracing::debug!("linked entry not found in includes");
        }
        return None;
    };
    if !record.has_fields {
        tracing::debug!(id = %record.id, "linked entry has no fields");
        return None;
    }
    Some(record.clone())
}

/// Reading time as stored: a number, or a numeric string.
fn minutes(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
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
