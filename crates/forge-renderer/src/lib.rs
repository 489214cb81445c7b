//! Blog rendering for forge
//!
//! Turns a delivery API `entries` response into what the site shows:
//!
//! - [`post`]: flattening raw entries into [`Post`]s
//! - [`richtext`]: decoding and rendering post bodies to HTML
//! - [`query`]: the request urls the site issues
//! - [`view`]: page view-models (headers, cards, pagination, metadata)
//!
//! Nothing in here performs I/O.

pub mod post;
pub mod query;
pub mod richtext;
pub mod view;

pub use post::{Author, Category, EntryCollection, Post, PostContent, Seo, normalize, normalize_category};
pub use query::{EntriesQuery, RelatedPosts};
pub use richtext::{Document, RenderOptions, RichTextRenderer, render, render_value};
pub use view::{PostCard, PostPage};
