use forge_common::SiteConfig;
use serde::Serialize;
use serde_json::{Value, json};

use crate::post::Post;

/// Head metadata for a post page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    /// `<title>`
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub robots: String,
    pub og_title: String,
    pub og_description: String,
    pub og_image: Option<String>,
    pub twitter_card: String,
    pub twitter_title: String,
    pub twitter_description: String,
    pub twitter_image: Option<String>,
    pub canonical_url: Option<String>,
}

impl PageMeta {
    pub fn for_post(post: &Post, site: &SiteConfig) -> Self {
        let seo = &post.seo;
        Self {
            title: format!("{} - {} Blog", seo.title, site.name),
            description: seo.description.clone(),
            keywords: seo.keywords.clone(),
            robots: seo.meta_robots.clone(),
            og_title: seo.og_title.clone(),
            og_description: seo.og_description.clone(),
            og_image: seo.og_image.clone(),
            twitter_card: seo.twitter_card.clone(),
            // Twitter gets the plain title and excerpt, not the SEO overrides.
            twitter_title: post.title.clone(),
            twitter_description: post.excerpt.clone(),
            twitter_image: post.featured_image.clone(),
            canonical_url: seo.canonical_url.clone(),
        }
    }
}

/// schema.org `BlogPosting` JSON-LD for a post. Keys without a value are
/// left out rather than written as `null`.
pub fn structured_data(post: &Post, site: &SiteConfig) -> Value {
    let author = post.author.as_ref();
    let keywords = if post.seo.keywords.is_empty() {
        site.default_keywords.clone()
    } else {
        post.seo.keywords.join(", ")
    };

    let mut data = json!({
        "@context": "https://schema.org",
        "@type": "BlogPosting",
        "headline": post.seo.title,
        "description": post.seo.description,
        "image": post.featured_image,
        "author": {
            "@type": "Person",
            "name": author.and_then(|a| a.name.as_deref()).unwrap_or(&site.name),
            "url": author.and_then(|a| a.website.as_deref()).unwrap_or(&site.url),
        },
        "publisher": {
            "@type": "Organization",
            "name": site.name,
            "logo": {
                "@type": "ImageObject",
                "url": site.logo_url,
            },
        },
        "datePublished": post.publish_date,
        "dateModified": post.last_modified,
        "mainEntityOfPage": {
            "@type": "WebPage",
            "@id": format!("{}/blog/{}", site.url, post.slug),
        },
        "articleSection": post.category_name().unwrap_or(&site.default_section),
        "keywords": keywords,
        "wordCount": post.content.text_length(),
    });

    if let Some(object) = data.as_object_mut() {
        object.retain(|_, value| !value.is_null());
    }
    data
}
