//! Delivery API request urls
//!
//! Only the urls are built here. Fetching them, and what to do when that
//! fails, belongs to whoever holds an HTTP client.

use forge_common::{ConfigError, ContentfulConfig};
use url::Url;

use crate::post::Post;

pub const POST_CONTENT_TYPE: &str = "blogPost";
pub const CATEGORY_CONTENT_TYPE: &str = "blogCategory";
const NEWEST_FIRST: &str = "-sys.createdAt";
const INCLUDE_DEPTH: &str = "2";

/// One `entries` request: a content type plus its query parameters, in the
/// order they are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntriesQuery {
    content_type: &'static str,
    params: Vec<(&'static str, String)>,
}

impl EntriesQuery {
    fn new(content_type: &'static str) -> Self {
        Self {
            content_type,
            params: Vec::new(),
        }
    }

    fn param(mut self, key: &'static str, value: impl ToString) -> Self {
        self.params.push((key, value.to_string()));
        self
    }

    /// A page of posts, newest first.
    pub fn blog_posts(limit: u32, skip: u32) -> Self {
        Self::new(POST_CONTENT_TYPE)
            .param("order", NEWEST_FIRST)
            .param("limit", limit)
            .param("skip", skip)
            .param("include", INCLUDE_DEPTH)
    }

    pub fn post_by_slug(slug: &str) -> Self {
        Self::new(POST_CONTENT_TYPE)
            .param("fields.slug", slug)
            .param("include", INCLUDE_DEPTH)
    }

    pub fn categories() -> Self {
        Self::new(CATEGORY_CONTENT_TYPE)
            .param("order", "fields.name")
            .param("include", INCLUDE_DEPTH)
    }

    pub fn posts_by_category(category_slug: &str, limit: u32, skip: u32) -> Self {
        Self::new(POST_CONTENT_TYPE)
            .param("fields.category.fields.slug", category_slug)
            .param("order", NEWEST_FIRST)
            .param("limit", limit)
            .param("skip", skip)
            .param("include", INCLUDE_DEPTH)
    }

    /// Full-text search over posts.
    pub fn search(query: &str, limit: u32) -> Self {
        Self::new(POST_CONTENT_TYPE)
            .param("query", query)
            .param("order", NEWEST_FIRST)
            .param("limit", limit)
            .param("include", INCLUDE_DEPTH)
    }

    /// Smallest request whose `total` is the number of posts.
    pub fn total_count() -> Self {
        Self::new(POST_CONTENT_TYPE).param("limit", 1)
    }

    /// Posts in the same category, excluding `post_id`.
    pub fn related(post_id: &str, category_slug: &str, limit: u32) -> Self {
        Self::new(POST_CONTENT_TYPE)
            .param("fields.category.fields.slug", category_slug)
            .param("sys.id[ne]", post_id)
            .param("order", NEWEST_FIRST)
            .param("limit", limit)
            .param("include", INCLUDE_DEPTH)
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    /// `{base}/spaces/{space}/environments/{environment}/entries?access_token=...`
    pub fn url(&self, config: &ContentfulConfig) -> Result<Url, ConfigError> {
        let mut url = config.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ConfigError::Invalid {
                field: "CONTENTFUL_BASE_URL",
                message: format!("{} cannot carry a path", config.base_url),
            })?
            .pop_if_empty()
            .extend([
                "spaces",
                config.space_id.as_str(),
                "environments",
                config.environment.as_str(),
                "entries",
            ]);

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("access_token", &config.access_token);
            query.append_pair("content_type", self.content_type);
            for (key, value) in &self.params {
                query.append_pair(key, value);
            }
        }

        tracing::trace!(content_type = self.content_type, "built entries url");
        Ok(url)
    }
}

/// Related posts for one post: same category, the post itself left out.
#[derive(Debug, Clone, Copy)]
pub struct RelatedPosts<'a> {
    post: &'a Post,
    limit: u32,
}

impl<'a> RelatedPosts<'a> {
    pub const DEFAULT_LIMIT: u32 = 3;

    pub fn new(post: &'a Post) -> Self {
        Self {
            post,
            limit: Self::DEFAULT_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// `None` when the post has no category slug to match on.
    pub fn query(&self) -> Option<EntriesQuery> {
        let slug = self.post.category_slug()?;
        Some(EntriesQuery::related(&self.post.id, slug, self.limit))
    }

    pub fn query_for(post: &Post) -> Option<EntriesQuery> {
        RelatedPosts::new(post).query()
    }

    /// Drop the post itself from a fetched list and cap it at the limit.
    pub fn select(&self, candidates: Vec<Post>) -> Vec<Post> {
        candidates
            .into_iter()
            .filter(|candidate| candidate.id != self.post.id)
            .take(self.limit as usize)
            .collect()
    }
}
