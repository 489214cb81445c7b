//! Error types for forge
//!
//! Only the edges of the system produce these: configuration loading and
//! decoding a whole payload from bytes. Rendering and normalization degrade
//! to empty output instead of failing.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for forge operations
#[derive(Error, Debug, Diagnostic)]
pub enum ForgeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    /// The payload wasn't JSON at all
    #[error("failed to decode content payload")]
    #[diagnostic(
        code(forge::payload),
        help("expected the JSON body of a delivery API `entries` response")
    )]
    Payload(#[from] serde_json::Error),

    #[error("io error: {0}")]
    #[diagnostic(code(forge::io))]
    Io(#[from] std::io::Error),
}

/// Configuration errors
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("missing required environment variable: {var}")]
    #[diagnostic(
        code(config::missing_env),
        help("Set the {var} environment variable or add it to your deployment platform")
    )]
    MissingEnv { var: &'static str },

    #[error("invalid configuration value for {field}: {message}")]
    #[diagnostic(code(config::invalid))]
    Invalid { field: &'static str, message: String },

    #[error("failed to parse URL: {url}")]
    #[diagnostic(code(config::url_parse))]
    UrlParse { url: String, message: String },
}

pub type Result<T> = std::result::Result<T, ForgeError>;
