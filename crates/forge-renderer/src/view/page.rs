use forge_common::SiteConfig;
use serde::Serialize;
use serde_json::Value;

use super::{PageMeta, RelatedCard, long_date, push_text, structured_data, tag_spans};
use crate::post::Post;
use crate::richtext::RenderOptions;

/// Author box under a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorBlock {
    pub name: String,
    pub bio: String,
    /// Hidden when `None`
    pub avatar: Option<String>,
}

impl AuthorBlock {
    pub fn for_post(post: &Post, site: &SiteConfig) -> Self {
        match &post.author {
            Some(author) => Self {
                name: author.name.clone().unwrap_or_default(),
                bio: author.bio.clone().unwrap_or_else(|| site.author_bio.clone()),
                avatar: author.avatar.clone(),
            },
            None => Self {
                name: site.name.clone(),
                bio: site.organisation_bio.clone(),
                avatar: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeaturedImage {
    pub src: String,
    pub alt: String,
}

/// Everything the post page shows.
#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    /// Slug this page was built for
    pub slug: String,
    pub category: String,
    pub date: String,
    /// `None` when the post doesn't state a reading time
    pub reading_time: Option<String>,
    pub title: String,
    pub excerpt: String,
    pub author: AuthorBlock,
    pub featured_image: Option<FeaturedImage>,
    pub body_html: String,
    /// `None` hides the tag section
    pub tags_html: Option<String>,
    pub allow_comments: bool,
    pub meta: PageMeta,
    pub structured_data: Value,
    pub related: Vec<RelatedCard>,
}

impl PostPage {
    pub fn build(post: &Post, site: &SiteConfig) -> Self {
        Self::build_with(post, site, RenderOptions::default())
    }

    pub fn build_with(post: &Post, site: &SiteConfig, options: RenderOptions) -> Self {
        let tags_html = (!post.tags.is_empty())
            .then(|| format!("<h4>Tags</h4>{}", tag_spans(&post.tags, options.escape_html)));

        Self {
            slug: post.slug.clone(),
            category: post.category_name().unwrap_or("Uncategorized").to_string(),
            date: long_date(post.publish_date.as_deref()),
            reading_time: post.reading_time.map(|minutes| format!("{minutes} min read")),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            author: AuthorBlock::for_post(post, site),
            featured_image: post.featured_image.as_ref().map(|src| FeaturedImage {
                src: src.clone(),
                alt: post.title.clone(),
            }),
            body_html: post.content.to_html(options),
            tags_html,
            allow_comments: post.allow_comments,
            meta: PageMeta::for_post(post, site),
            structured_data: structured_data(post, site),
            related: Vec::new(),
        }
    }

    /// Page for the slug taken from the request, or the panel to show instead.
    pub fn resolve(
        slug: Option<&str>,
        post: Option<&Post>,
        site: &SiteConfig,
        options: RenderOptions,
    ) -> Result<Self, ErrorPanel> {
        let Some(slug) = slug.filter(|s| !s.is_empty()) else {
            return Err(ErrorPanel::not_specified());
        };
        match post {
            Some(post) => Ok(Self::build_with(post, site, options)),
            None => {
                tracing::debug!(slug, "no post for slug");
                Err(ErrorPanel::not_found())
            }
        }
    }

    /// Attach related-post cards. Posts equal to this page's are skipped.
    pub fn with_related(mut self, related: &[Post]) -> Self {
        self.related = related
            .iter()
            .filter(|post| post.slug != self.slug)
            .map(RelatedCard::from_post)
            .collect();
        self
    }

    /// Whether this page still matches the slug the reader navigated to.
    /// A page built for an earlier navigation should be dropped.
    pub fn is_current(&self, slug: &str) -> bool {
        self.slug == slug
    }
}

/// Error box shown in place of the page content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPanel {
    pub message: String,
}

impl ErrorPanel {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn not_specified() -> Self {
        Self::new("No blog post specified.")
    }

    pub fn not_found() -> Self {
        Self::new("Blog post not found.")
    }

    pub fn load_failed() -> Self {
        Self::new("Failed to load blog post. Please try again later.")
    }

    pub fn listing_failed() -> Self {
        Self::new("Failed to load blog posts. Please try again later.")
    }

    /// Post page variant, with a retry button.
    pub fn html(&self, options: RenderOptions) -> String {
        let mut html = String::from(
            "<div class=\"error-message\"><div class=\"error-icon\">⚠️</div><h3>Error</h3><p>",
        );
        push_text(&mut html, &self.message, options.escape_html);
        html.push_str(
            "</p><button onclick=\"location.reload()\" class=\"retry-btn\">Retry</button></div>",
        );
        html
    }

    /// Listing variant, styled like the empty-listing notice.
    pub fn listing_html(&self, options: RenderOptions) -> String {
        let mut html = String::from(
            "<div class=\"no-posts\"><div class=\"no-posts-icon\">⚠️</div><h3>Error</h3><p>",
        );
        push_text(&mut html, &self.message, options.escape_html);
        html.push_str("</p></div>");
        html
    }
}

impl std::fmt::Display for ErrorPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
