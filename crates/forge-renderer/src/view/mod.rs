//! Declarative view-model for the blog pages
//!
//! Plain data plus small markup fragments. A presentation layer drops these
//! into its templates; nothing here touches a DOM.

mod cards;
mod meta;
mod page;

pub use cards::{
    Pagination, PostCard, RelatedCard, no_posts_html, post_href, render_post_cards, short_excerpt,
};
pub use meta::{PageMeta, structured_data};
pub use page::{AuthorBlock, ErrorPanel, FeaturedImage, PostPage};

use chrono::NaiveDate;
use pulldown_cmark_escape::escape_html;

pub const DATE_NOT_AVAILABLE: &str = "Date not available";

/// `2024-01-15` or a full timestamp starting with one.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// `January 15, 2024`
pub fn long_date(raw: Option<&str>) -> String {
    format_date(raw, "%B %-d, %Y")
}

/// `Jan 15, 2024`
pub fn short_date(raw: Option<&str>) -> String {
    format_date(raw, "%b %-d, %Y")
}

fn format_date(raw: Option<&str>, pattern: &str) -> String {
    match raw.and_then(parse_date) {
        Some(date) => date.format(pattern).to_string(),
        None => {
            if let Some(raw) = raw {
                tracing::debug!(raw, "unparseable date");
            }
            DATE_NOT_AVAILABLE.to_string()
        }
    }
}

/// Push `text`, escaped when asked to.
fn push_text(html: &mut String, text: &str, escape: bool) {
    if escape {
        let _ = escape_html(&mut *html, text);
    } else {
        html.push_str(text);
    }
}

/// `<span class="tag">…</span>` per tag.
fn tag_spans(tags: &[String], escape: bool) -> String {
    let mut html = String::new();
    for tag in tags {
        html.push_str("<span class=\"tag\">");
        push_text(&mut html, tag, escape);
        html.push_str("</span>");
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_date() {
        assert_eq!(long_date(Some("2024-01-15")), "January 15, 2024");
        assert_eq!(long_date(Some("2023-11-05T10:30:00.000Z")), "November 5, 2023");
        assert_eq!(long_date(None), "Date not available");
        assert_eq!(long_date(Some("yesterday")), "Date not available");
        assert_eq!(long_date(Some("2024-02-30")), "Date not available");
    }

    #[test]
    fn test_short_date() {
        assert_eq!(short_date(Some("2024-01-15")), "Jan 15, 2024");
        assert_eq!(short_date(Some("2024-09-01T00:00:00Z")), "Sep 1, 2024");
        assert_eq!(short_date(Some("")), "Date not available");
    }

    #[test]
    fn test_tag_spans() {
        let tags = vec!["a".to_string(), "<b>".to_string()];
        assert_eq!(
            tag_spans(&tags, false),
            "<span class=\"tag\">a</span><span class=\"tag\"><b></span>"
        );
        assert_eq!(
            tag_spans(&tags, true),
            "<span class=\"tag\">a</span><span class=\"tag\">&lt;b&gt;</span>"
        );
    }
}
