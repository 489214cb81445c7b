use std::fmt::Write;

use forge_common::{Asset, Includes, resolve};
use pulldown_cmark_escape::escape_html;

use super::RenderOptions;
use super::node::{Block, Document, Node, TableRow};

/// Renders a decoded [`Document`] to an HTML string.
///
/// Borrowed includes table plus options; holds no other state, so rendering
/// the same document twice yields the same bytes.
#[derive(Debug, Clone, Copy)]
pub struct RichTextRenderer<'a> {
    includes: &'a Includes,
    options: RenderOptions,
}

impl<'a> RichTextRenderer<'a> {
    pub fn new(includes: &'a Includes) -> Self {
        Self::with_options(includes, RenderOptions::default())
    }

    pub fn with_options(includes: &'a Includes, options: RenderOptions) -> Self {
        Self { includes, options }
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn render(&self, document: &Document) -> String {
        let mut html = String::new();
        for block in &document.blocks {
            self.render_block(&mut html, block);
        }
        html
    }

    pub fn render_block(&self, html: &mut String, block: &Block) {
        match block {
            Block::Paragraph(content) => self.render_paragraph(html, content),
            Block::Heading { level, content } => self.render_heading(html, *level, content),
            Block::UnorderedList(items) => self.render_list(html, "ul", items),
            Block::OrderedList(items) => self.render_list(html, "ol", items),
            Block::Blockquote(content) => self.render_blockquote(html, content),
            Block::HorizontalRule => html.push_str("<hr>"),
            Block::EmbeddedAsset { target } => {
                let Some(link) = target else {
                    tracing::debug!("embedded asset block without a target");
                    return;
                };
                match resolve(link, self.includes) {
                    Some(record) => self.render_image(html, &Asset::from_record(record)),
                    None => tracing::debug!(id = %link.id, "embedded asset not in includes"),
                }
            }
            Block::Table(rows) => self.render_table(html, rows),
            Block::Unknown(kind) => {
                tracing::debug!(kind = %kind, "skipping unsupported block");
            }
        }
    }

    /// Text of an inline node with its marks applied. Containers concatenate
    /// their children; anything else is empty.
    pub fn text_of(&self, node: &Node) -> String {
        match node {
            Node::Text { value, marks } => {
                let mut text = String::new();
                self.push_text(&mut text, value);
                for tag in marks.iter().filter_map(|mark| mark.tag()) {
                    text = format!("<{tag}>{text}</{tag}>");
                }
                text
            }
            Node::Hyperlink { content, .. } | Node::Element { content, .. } => {
                self.text_of_all(content)
            }
            Node::Empty => String::new(),
        }
    }

    fn text_of_all(&self, nodes: &[Node]) -> String {
        nodes.iter().map(|node| self.text_of(node)).collect()
    }

    fn render_paragraph(&self, html: &mut String, content: &[Node]) {
        html.push_str("<p>");
        for node in content {
            match node {
                Node::Hyperlink { uri, content } => {
                    html.push_str("<a href=\"");
                    self.push_text(html, uri.as_deref().unwrap_or("#"));
                    html.push_str("\" target=\"_blank\" rel=\"noopener noreferrer\">");
                    html.push_str(&self.text_of_all(content));
                    html.push_str("</a>");
                }
                other => html.push_str(&self.text_of(other)),
            }
        }
        html.push_str("</p>");
    }

    fn render_heading(&self, html: &mut String, level: u8, content: &[Node]) {
        let _ = write!(html, "<h{level}>");
        // Only the first child's raw value; marks and later children are dropped.
        if let Some(Node::Text { value, .. }) = content.first() {
            self.push_text(html, value);
        }
        let _ = write!(html, "</h{level}>");
    }

    fn render_list(&self, html: &mut String, tag: &str, items: &[Node]) {
        let _ = write!(html, "<{tag}>");
        for item in items {
            html.push_str("<li>");
            html.push_str(&self.text_of_all(item.children()));
            html.push_str("</li>");
        }
        let _ = write!(html, "</{tag}>");
    }

    fn render_blockquote(&self, html: &mut String, content: &[Node]) {
        html.push_str("<blockquote>");
        for paragraph in content.iter().filter(|node| node.is_kind("paragraph")) {
            html.push_str("<p>");
            html.push_str(&self.text_of_all(paragraph.children()));
            html.push_str("</p>");
        }
        html.push_str("</blockquote>");
    }

    fn render_image(&self, html: &mut String, asset: &Asset) {
        let Some(src) = asset.absolute_url() else {
            tracing::debug!(asset = %asset.id, "embedded asset has no file url");
            return;
        };
        html.push_str("<img class=\"post-image\" src=\"");
        self.push_text(html, &src);
        html.push_str("\" alt=\"");
        self.push_text(html, asset.alt_text());
        html.push_str("\">");
    }

    fn render_table(&self, html: &mut String, rows: &[TableRow]) {
        html.push_str("<table>");
        for row in rows {
            let cell_tag = if row.header { "th" } else { "td" };
            html.push_str("<tr>");
            for cell in &row.cells {
                let _ = write!(
                    html,
                    "<{cell_tag}>{}</{cell_tag}>",
                    self.text_of_all(cell.children())
                );
            }
            html.push_str("</tr>");
        }
        html.push_str("</table>");
    }

    fn push_text(&self, html: &mut String, text: &str) {
        if self.options.escape_html {
            let _ = escape_html(&mut *html, text);
        } else {
            html.push_str(text);
        }
    }
}

/// Owned escaped copy of `text`.
pub fn escaped(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let _ = escape_html(&mut out, text);
    out
}
