use std::sync::LazyLock;

use url::Url;

use crate::error::ConfigError;

static DEFAULT_BASE_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse(ContentfulConfig::DEFAULT_BASE_URL).expect("valid default base url")
});

/// Which deployment the site is running as, from `NODE_ENV`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn parse(value: &str) -> Self {
        match value {
            "production" => Self::Production,
            "test" => Self::Test,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Delivery API configuration
#[derive(Debug, Clone)]
pub struct ContentfulConfig {
    pub space_id: String,
    pub access_token: String,
    pub management_token: Option<String>,
    pub environment: String,
    pub base_url: Url,
}

impl ContentfulConfig {
    /// Default delivery API host
    pub const DEFAULT_BASE_URL: &'static str = "https://cdn.contentful.com";
    pub const DEFAULT_ENVIRONMENT: &'static str = "master";

    pub fn new(space_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            space_id: space_id.into(),
            access_token: access_token.into(),
            management_token: None,
            environment: Self::DEFAULT_ENVIRONMENT.to_string(),
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> Url {
    DEFAULT_BASE_URL.clone()
}

/// Public-facing site identity, used wherever a post lacks its own value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Canonical site root, no trailing slash
    pub url: String,
    /// Organisation name
    pub name: String,
    pub description: String,
    /// Bio shown in the author block of posts without an author
    pub organisation_bio: String,
    /// Bio shown for authors who haven't written one
    pub author_bio: String,
    /// Byline on listing cards for posts without an author
    pub card_author: String,
    pub logo_url: String,
    /// Image for listing cards of posts without a featured image
    pub fallback_image: String,
    pub default_keywords: String,
    pub default_section: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: "https://microforge.com".to_string(),
            name: "MicroForge Polymers".to_string(),
            description: String::new(),
            organisation_bio: "Leading experts in revolutionary microfabrication technology"
                .to_string(),
            author_bio: "Expert in microfabrication and precision manufacturing".to_string(),
            card_author: "SmartForge".to_string(),
            logo_url: "https://microforge.com/assets/images/Company_Logo_for_second_design.svg"
                .to_string(),
            fallback_image: "assets/images/Company_Logo_for_second_design.png".to_string(),
            default_keywords:
                "microfabrication, precision manufacturing, micro-injection molding".to_string(),
            default_section: "Manufacturing".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsConfig {
    pub google_analytics_id: Option<String>,
    pub google_tag_manager_id: Option<String>,
}

/// Everything the site reads from its environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub contentful: ContentfulConfig,
    pub site: SiteConfig,
    pub analytics: AnalyticsConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required in production (or when `FORGE_VALIDATE_SECRETS=true`):
    /// - `CONTENTFUL_SPACE_ID`
    /// - `CONTENTFUL_ACCESS_TOKEN`
    /// - `CONTENTFUL_MANAGEMENT_TOKEN`
    ///
    /// Optional:
    /// - `CONTENTFUL_ENVIRONMENT` (default: master)
    /// - `CONTENTFUL_BASE_URL` (default: https://cdn.contentful.com)
    /// - `SITE_URL`, `SITE_NAME`, `SITE_DESCRIPTION`
    /// - `NODE_ENV` (default: development)
    /// - `NEXT_PUBLIC_GOOGLE_ANALYTICS_ID`, `NEXT_PUBLIC_GOOGLE_TAG_MANAGER_ID`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let environment = get("NODE_ENV")
            .map(|env| Environment::parse(&env))
            .unwrap_or_default();
        let validate = environment.is_production()
            || get("FORGE_VALIDATE_SECRETS").is_some_and(|v| v == "true");

        let secret = |var: &'static str| -> Result<Option<String>, ConfigError> {
            match get(var) {
                Some(value) => Ok(Some(value)),
                None if validate => Err(ConfigError::MissingEnv { var }),
                None => {
                    tracing::warn!(var, "environment variable not set");
                    Ok(None)
                }
            }
        };

        let space_id = secret("CONTENTFUL_SPACE_ID")?.unwrap_or_default();
        let access_token = secret("CONTENTFUL_ACCESS_TOKEN")?.unwrap_or_default();
        let management_token = secret("CONTENTFUL_MANAGEMENT_TOKEN")?;

        let base_url = match get("CONTENTFUL_BASE_URL") {
            Some(raw) => Url::parse(&raw).map_err(|e| ConfigError::UrlParse {
                url: raw.clone(),
                message: e.to_string(),
            })?,
            None => default_base_url(),
        };

        let mut site = SiteConfig::default();
        if let Some(url) = get("SITE_URL") {
            Url::parse(&url).map_err(|e| ConfigError::UrlParse {
                url: url.clone(),
                message: e.to_string(),
            })?;
            site.url = url.trim_end_matches('/').to_string();
        }
        if let Some(name) = get("SITE_NAME") {
            site.name = name;
        }
        if let Some(description) = get("SITE_DESCRIPTION") {
            site.description = description;
        }

        let config = Self {
            environment,
            contentful: ContentfulConfig {
                space_id,
                access_token,
                management_token,
                environment: get("CONTENTFUL_ENVIRONMENT")
                    .unwrap_or_else(|| ContentfulConfig::DEFAULT_ENVIRONMENT.to_string()),
                base_url,
            },
            site,
            analytics: AnalyticsConfig {
                google_analytics_id: get("NEXT_PUBLIC_GOOGLE_ANALYTICS_ID"),
                google_tag_manager_id: get("NEXT_PUBLIC_GOOGLE_TAG_MANAGER_ID"),
            },
        };

        tracing::debug!(
            environment = ?config.environment,
            space_id = !config.contentful.space_id.is_empty(),
            access_token = !config.contentful.access_token.is_empty(),
            management_token = config.contentful.management_token.is_some(),
            "configuration loaded"
        );

        Ok(config)
    }
}
