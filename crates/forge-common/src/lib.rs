//! Shared building blocks for forge
//!
//! Holds the pieces every other crate leans on: the includes side-table that
//! accompanies a delivery API response, link resolution against it, error
//! types, configuration and (behind the `telemetry` feature) tracing setup.

pub mod config;
pub mod error;
pub mod includes;
pub mod resolve;
#[cfg(feature = "telemetry")]
pub mod telemetry;

pub use crate::config::{AnalyticsConfig, Config, ContentfulConfig, Environment, SiteConfig};
pub use crate::error::{ConfigError, ForgeError, Result};
pub use crate::includes::{Includes, Link, LinkKind, Record};
pub use crate::resolve::{Asset, asset_url, normalize_asset_url, resolve, resolve_asset, resolve_value};

use serde_json::Value;

/// Non-empty string at `key` of a JSON object.
///
/// Empty strings count as missing, which is how the CMS payloads signal
/// "author left this blank".
pub fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Strings of the array at `key`, skipping anything that isn't a string.
pub fn str_array(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_empty_str_skips_blank() {
        let value = json!({ "title": "", "slug": "hello", "count": 3 });
        assert_eq!(non_empty_str(&value, "title"), None);
        assert_eq!(non_empty_str(&value, "slug"), Some("hello"));
        assert_eq!(non_empty_str(&value, "count"), None);
        assert_eq!(non_empty_str(&value, "missing"), None);
    }

    #[test]
    fn test_str_array_filters_non_strings() {
        let value = json!({ "tags": ["a", 1, "b", null] });
        assert_eq!(str_array(&value, "tags"), vec!["a", "b"]);
        assert!(str_array(&value, "nope").is_empty());
    }
}
