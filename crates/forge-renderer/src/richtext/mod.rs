//! Rich-text documents and their HTML rendering
//!
//! A post body arrives as a loosely typed JSON tree. [`Document::from_value`]
//! decodes it into [`Block`]s and [`Node`]s, and [`RichTextRenderer`] turns
//! those into an HTML fragment with no separators between blocks.
//!
//! Rendering never fails. Nodes with an unknown kind or a missing field
//! produce no output and their siblings render as usual.

mod html;
mod node;

pub use html::{RichTextRenderer, escaped};
pub use node::{Block, Document, Mark, Node, TableRow};

use forge_common::Includes;
use serde_json::Value;

/// Rendering switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// HTML-escape text and attribute values. Off by default, in which case
    /// CMS text is written into the markup verbatim.
    pub escape_html: bool,
}

impl RenderOptions {
    pub fn escaped() -> Self {
        Self { escape_html: true }
    }
}

/// Render a decoded document with default options.
pub fn render(document: &Document, includes: &Includes) -> String {
    RichTextRenderer::new(includes).render(document)
}

/// Decode and render a raw document tree with default options.
pub fn render_value(raw: &Value, includes: &Includes) -> String {
    render(&Document::from_value(raw), includes)
}

/// Body HTML of a post: rich text is rendered, a plain string becomes a
/// single paragraph, anything else gets a placeholder.
pub fn render_post_content(raw: Option<&Value>, includes: &Includes, options: RenderOptions) -> String {
    match raw {
        Some(value) if Document::is_document(value) => {
            RichTextRenderer::with_options(includes, options).render(&Document::from_value(value))
        }
        Some(Value::String(text)) => {
            let text = if options.escape_html {
                escaped(text)
            } else {
                text.clone()
            };
            format!("<p>{text}</p>")
        }
        _ => {
            tracing::debug!("post has no renderable content");
            "<p>Content not available.</p>".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_is_repeatable() {
        let includes = Includes::default();
        let raw = json!({
            "nodeType": "document",
            "content": [
                { "nodeType": "heading-2", "content": [{ "nodeType": "text", "value": "Title" }] },
                { "nodeType": "paragraph", "content": [{ "nodeType": "text", "value": "Body" }] }
            ]
        });
        let first = render_value(&raw, &includes);
        let second = render_value(&raw, &includes);
        assert_eq!(first, second);
        insta::assert_snapshot!(first, @"<h2>Title</h2><p>Body</p>");
    }

    #[test]
    fn test_post_content_shapes() {
        let includes = Includes::default();
        let options = RenderOptions::default();

        let rich = json!({
            "nodeType": "document",
            "content": [{ "nodeType": "paragraph", "content": [{ "nodeType": "text", "value": "x" }] }]
        });
        assert_eq!(render_post_content(Some(&rich), &includes, options), "<p>x</p>");

        let plain = json!("Just a string");
        assert_eq!(
            render_post_content(Some(&plain), &includes, options),
            "<p>Just a string</p>"
        );

        assert_eq!(
            render_post_content(None, &includes, options),
            "<p>Content not available.</p>"
        );
        assert_eq!(
            render_post_content(Some(&json!(12)), &includes, options),
            "<p>Content not available.</p>"
        );
    }

    #[test]
    fn test_plain_string_content_escaping() {
        let includes = Includes::default();
        let plain = json!("a <b>");
        assert_eq!(
            render_post_content(Some(&plain), &includes, RenderOptions::escaped()),
            "<p>a &lt;b&gt;</p>"
        );
        assert_eq!(
            render_post_content(Some(&plain), &includes, RenderOptions::default()),
            "<p>a <b></p>"
        );
    }
}
