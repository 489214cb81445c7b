use std::fmt::Write;

use forge_common::SiteConfig;
use serde::Serialize;

use super::{push_text, short_date, tag_spans};
use crate::post::Post;
use crate::query::EntriesQuery;
use crate::richtext::RenderOptions;

const EXCERPT_WORDS: usize = 10;
const DEFAULT_READING_TIME: u32 = 5;
const DEFAULT_TAG: &str = "General";

pub fn post_href(slug: &str) -> String {
    format!("blog-post.html?slug={slug}")
}

/// First ten words of the excerpt, with an ellipsis when there were more.
pub fn short_excerpt(excerpt: &str) -> String {
    let words: Vec<&str> = excerpt.split_whitespace().collect();
    if words.is_empty() {
        return "No excerpt available".to_string();
    }
    let mut short = words[..words.len().min(EXCERPT_WORDS)].join(" ");
    if words.len() > EXCERPT_WORDS {
        short.push('…');
    }
    short
}

/// One card of the post listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostCard {
    pub slug: String,
    pub href: String,
    pub title: String,
    pub image: String,
    pub fallback_image: String,
    pub featured: bool,
    pub author: String,
    pub author_avatar: Option<String>,
    pub excerpt: String,
    pub date: String,
    pub reading_time: u32,
    pub tags: Vec<String>,
}

impl PostCard {
    pub fn from_post(post: &Post, site: &SiteConfig) -> Self {
        let tags = if post.tags.is_empty() {
            vec![DEFAULT_TAG.to_string()]
        } else {
            post.tags.clone()
        };
        Self {
            slug: post.slug.clone(),
            href: post_href(&post.slug),
            title: post.title.clone(),
            image: post
                .featured_image
                .clone()
                .unwrap_or_else(|| site.fallback_image.clone()),
            fallback_image: site.fallback_image.clone(),
            featured: post.featured,
            author: post.author_name().unwrap_or(&site.card_author).to_string(),
            author_avatar: post.author.as_ref().and_then(|a| a.avatar.clone()),
            excerpt: short_excerpt(&post.excerpt),
            date: short_date(post.publish_date.as_deref().or(post.created_at.as_deref())),
            reading_time: post.reading_time.unwrap_or(DEFAULT_READING_TIME),
            tags,
        }
    }

    pub fn html(&self, options: RenderOptions) -> String {
        let escape = options.escape_html;
        let mut html = String::from("<article class=\"blog-card\" data-slug=\"");
        push_text(&mut html, &self.slug, escape);
        html.push_str("\"><a class=\"blog-card-link\" href=\"");
        push_text(&mut html, &self.href, escape);
        html.push_str("\"><div class=\"blog-card-image\"><img src=\"");
        push_text(&mut html, &self.image, escape);
        html.push_str("\" alt=\"");
        push_text(&mut html, &self.title, escape);
        html.push_str("\" loading=\"lazy\" onerror=\"this.src='");
        push_text(&mut html, &self.fallback_image, escape);
        html.push_str("'\">");
        if self.featured {
            html.push_str("<div class=\"featured-badge\">⭐ Featured</div>");
        }
        html.push_str("</div><div class=\"blog-card-content\"><h3 class=\"blog-card-title\">");
        push_text(&mut html, &self.title, escape);
        html.push_str("</h3><div class=\"blog-card-row\"><div class=\"blog-card-author-col\"><span class=\"blog-card-author\">");
        if let Some(avatar) = &self.author_avatar {
            html.push_str("<img src=\"");
            push_text(&mut html, avatar, escape);
            html.push_str("\" alt=\"");
            push_text(&mut html, &self.author, escape);
            html.push_str("\" class=\"author-avatar\">");
        }
        push_text(&mut html, &self.author, escape);
        html.push_str("</span></div><p class=\"blog-card-excerpt\">");
        push_text(&mut html, &self.excerpt, escape);
        html.push_str("</p></div><div class=\"blog-card-meta\"><span class=\"blog-card-date\">");
        html.push_str(&self.date);
        html.push_str("</span><span class=\"blog-card-reading-time\">");
        let _ = write!(html, "{} min read", self.reading_time);
        html.push_str("</span></div><div class=\"blog-card-tags\">");
        html.push_str(&tag_spans(&self.tags, escape));
        html.push_str("</div></div></a></article>");
        html
    }
}

/// Empty-listing notice.
pub fn no_posts_html() -> &'static str {
    "<div class=\"no-posts\"><div class=\"no-posts-icon\">📝</div><h3>No blog posts found</h3><p>No posts available at the moment.</p></div>"
}

/// The listing grid: one card per post, or the empty notice.
pub fn render_post_cards(posts: &[Post], site: &SiteConfig, options: RenderOptions) -> String {
    if posts.is_empty() {
        return no_posts_html().to_string();
    }
    posts
        .iter()
        .map(|post| PostCard::from_post(post, site).html(options))
        .collect()
}

/// Smaller card in the "related posts" strip under a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedCard {
    pub slug: String,
    pub href: String,
    pub title: String,
    pub excerpt: String,
    pub image: Option<String>,
}

impl RelatedCard {
    pub fn from_post(post: &Post) -> Self {
        Self {
            slug: post.slug.clone(),
            href: post_href(&post.slug),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            image: post.featured_image.clone(),
        }
    }

    pub fn html(&self, options: RenderOptions) -> String {
        let escape = options.escape_html;
        let mut html = String::from("<div class=\"related-post-card\">");
        if let Some(image) = &self.image {
            html.push_str("<div class=\"related-post-image\"><img src=\"");
            push_text(&mut html, image, escape);
            html.push_str("\" alt=\"");
            push_text(&mut html, &self.title, escape);
            html.push_str("\" loading=\"lazy\"></div>");
        }
        html.push_str("<div class=\"related-post-content\"><h3 class=\"related-post-title\"><a href=\"");
        push_text(&mut html, &self.href, escape);
        html.push_str("\">");
        push_text(&mut html, &self.title, escape);
        html.push_str("</a></h3><p class=\"related-post-excerpt\">");
        push_text(&mut html, &self.excerpt, escape);
        html.push_str("</p></div></div>");
        html
    }
}

/// Listing pagination. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current: u32,
    pub total_pages: u32,
    pub per_page: u32,
}

impl Pagination {
    pub const PER_PAGE: u32 = 9;

    /// `current` is clamped into the valid page range.
    pub fn new(current: u32, total_items: u64, per_page: u32) -> Self {
        let per_page = per_page.max(1);
        let total_pages = u32::try_from(total_items.div_ceil(u64::from(per_page))).unwrap_or(u32::MAX);
        Self {
            current: current.clamp(1, total_pages.max(1)),
            total_pages,
            per_page,
        }
    }

    pub fn first(total_items: u64) -> Self {
        Self::new(1, total_items, Self::PER_PAGE)
    }

    /// Pagination controls are hidden for a single page.
    pub fn is_visible(&self) -> bool {
        self.total_pages > 1
    }

    pub fn previous_disabled(&self) -> bool {
        self.current <= 1
    }

    pub fn next_disabled(&self) -> bool {
        self.current >= self.total_pages
    }

    pub fn next(&self) -> Self {
        if self.next_disabled() {
            *self
        } else {
            Self {
                current: self.current + 1,
                ..*self
            }
        }
    }

    pub fn previous(&self) -> Self {
        if self.previous_disabled() {
            *self
        } else {
            Self {
                current: self.current - 1,
                ..*self
            }
        }
    }

    pub fn skip(&self) -> u32 {
        (self.current - 1) * self.per_page
    }

    /// Request for the posts on the current page.
    pub fn query(&self) -> EntriesQuery {
        EntriesQuery::blog_posts(self.per_page, self.skip())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::Author;

    fn post() -> Post {
        Post {
            id: "p1".into(),
            title: "Micro Gears".into(),
            slug: "micro-gears".into(),
            excerpt: "Tiny gears".into(),
            publish_date: Some("2024-01-15".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_short_excerpt() {
        assert_eq!(short_excerpt("  "), "No excerpt available");
        assert_eq!(short_excerpt("one two  three"), "one two three");
        assert_eq!(
            short_excerpt("a b c d e f g h i j k l"),
            "a b c d e f g h i j…"
        );
        assert_eq!(short_excerpt("a b c d e f g h i j"), "a b c d e f g h i j");
    }

    #[test]
    fn test_card_fallbacks() {
        let card = PostCard::from_post(&post(), &SiteConfig::default());
        assert_eq!(card.image, "assets/images/Company_Logo_for_second_design.png");
        assert_eq!(card.author, "SmartForge");
        assert_eq!(card.author_avatar, None);
        assert_eq!(card.reading_time, 5);
        assert_eq!(card.date, "Jan 15, 2024");
        assert_eq!(card.tags, vec!["General"]);
        assert_eq!(card.href, "blog-post.html?slug=micro-gears");
    }

    #[test]
    fn test_card_date_falls_back_to_created_at() {
        let mut post = post();
        post.publish_date = None;
        post.created_at = Some("2023-12-24T12:00:00Z".into());
        assert_eq!(PostCard::from_post(&post, &SiteConfig::default()).date, "Dec 24, 2023");

        post.created_at = None;
        assert_eq!(
            PostCard::from_post(&post, &SiteConfig::default()).date,
            "Date not available"
        );
    }

    #[test]
    fn test_card_markup() {
        let mut post = post();
        post.featured = true;
        post.reading_time = Some(3);
        post.tags = vec!["gears".into()];
        post.featured_image = Some("https://img.test/hero.jpg".into());
        post.author = Some(Author {
            name: Some("Jane".into()),
            avatar: Some("https://img.test/jane.jpg".into()),
            ..Default::default()
        });
        let html = PostCard::from_post(&post, &SiteConfig::default()).html(RenderOptions::default());

        insta::assert_snapshot!(html, @r#"<article class="blog-card" data-slug="micro-gears"><a class="blog-card-link" href="blog-post.html?slug=micro-gears"><div class="blog-card-image"><img src="https://img.test/hero.jpg" alt="Micro Gears" loading="lazy" onerror="this.src='assets/images/Company_Logo_for_second_design.png'"><div class="featured-badge">⭐ Featured</div></div><div class="blog-card-content"><h3 class="blog-card-title">Micro Gears</h3><div class="blog-card-row"><div class="blog-card-author-col"><span class="blog-card-author"><img src="https://img.test/jane.jpg" alt="Jane" class="author-avatar">Jane</span></div><p class="blog-card-excerpt">Tiny gears</p></div><div class="blog-card-meta"><span class="blog-card-date">Jan 15, 2024</span><span class="blog-card-reading-time">3 min read</span></div><div class="blog-card-tags"><span class="tag">gears</span></div></div></a></article>"#);
    }

    #[test]
    fn test_empty_listing() {
        assert_eq!(
            render_post_cards(&[], &SiteConfig::default(), RenderOptions::default()),
            no_posts_html()
        );
        let html = render_post_cards(&[post(), post()], &SiteConfig::default(), RenderOptions::default());
        assert_eq!(html.matches("<article class=\"blog-card\"").count(), 2);
    }

    #[test]
    fn test_related_card_markup() {
        let mut post = post();
        post.featured_image = Some("https://img.test/hero.jpg".into());
        insta::assert_snapshot!(
            RelatedCard::from_post(&post).html(RenderOptions::default()),
            @r#"<div class="related-post-card"><div class="related-post-image"><img src="https://img.test/hero.jpg" alt="Micro Gears" loading="lazy"></div><div class="related-post-content"><h3 class="related-post-title"><a href="blog-post.html?slug=micro-gears">Micro Gears</a></h3><p class="related-post-excerpt">Tiny gears</p></div></div>"#
        );
    }

    #[test]
    fn test_pagination_arithmetic() {
        let page = Pagination::first(20);
        assert_eq!(page.total_pages, 3);
        assert!(page.is_visible());
        assert!(page.previous_disabled());
        assert!(!page.next_disabled());
        assert_eq!(page.previous(), page);

        let last = page.next().next();
        assert_eq!(last.current, 3);
        assert!(last.next_disabled());
        assert_eq!(last.next(), last);
        assert_eq!(last.skip(), 18);
        assert_eq!(last.query(), EntriesQuery::blog_posts(9, 18));
    }

    #[test]
    fn test_pagination_edges() {
        let single = Pagination::first(9);
        assert_eq!(single.total_pages, 1);
        assert!(!single.is_visible());

        let none = Pagination::first(0);
        assert_eq!(none.total_pages, 0);
        assert_eq!(none.current, 1);
        assert!(!none.is_visible());

        let clamped = Pagination::new(40, 10, 9);
        assert_eq!(clamped.current, 2);
        assert_eq!(Pagination::new(0, 10, 9).current, 1);
    }
}
