//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! router. All types derive Serde traits for deserialization from config
//! files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the CMS content router.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CmsConfig {
    /// File path to published CMS content files.
    pub content_path: PathBuf,

    /// Path to the redirect listing JSON file, absolute or relative to
    /// `content_path`. None means no redirects are configured.
    pub redirect_listing_path: Option<PathBuf>,

    /// Default directory document (e.g. "index.html").
    pub default_document: String,

    /// Disable URL variations (trailing "/" and default-document
    /// fallback).
    pub strict_url_resolution: bool,

    /// Maximum number of seconds for a passthru request.
    pub passthru_timeout_secs: u64,

    /// CMS server URLs enabled for page editing. "*" enables any remote
    /// CMS.
    pub cms_server_urls: CmsServerUrls,

    /// HTTP server settings.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            content_path: PathBuf::from("."),
            redirect_listing_path: None,
            default_document: "index.html".to_string(),
            strict_url_resolution: false,
            passthru_timeout_secs: 30,
            cms_server_urls: CmsServerUrls::default(),
            server: ServerConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// List of CMS server URLs.
///
/// A scalar value in the config file is accepted and wrapped into a
/// one-element list at the serde boundary, so downstream code never has
/// to re-check the shape.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CmsServerUrls(Vec<String>);

impl CmsServerUrls {
    /// Create from a list of URLs.
    pub fn new(urls: Vec<String>) -> Self {
        Self(urls)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for CmsServerUrls {
    fn from(url: String) -> Self {
        Self(vec![url])
    }
}

impl From<Vec<String>> for CmsServerUrls {
    fn from(urls: Vec<String>) -> Self {
        Self(urls)
    }
}

impl<'de> Deserialize<'de> for CmsServerUrls {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum ScalarOrList {
            Scalar(String),
            List(Vec<String>),
        }

        Ok(match ScalarOrList::deserialize(deserializer)? {
            ScalarOrList::Scalar(url) => Self(vec![url]),
            ScalarOrList::List(urls) => Self(urls),
        })
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g. "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,

    /// Render a 404 page when no page matches; when false the handler
    /// responds 404 with an empty body.
    pub generate_404_on_not_found: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 60,
            generate_404_on_not_found: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CmsConfig::default();
        assert_eq!(config.content_path, PathBuf::from("."));
        assert_eq!(config.default_document, "index.html");
        assert!(!config.strict_url_resolution);
        assert_eq!(config.passthru_timeout_secs, 30);
        assert!(config.cms_server_urls.is_empty());
        assert!(config.server.generate_404_on_not_found);
    }

    #[test]
    fn test_scalar_cms_server_url_wrapped_into_list() {
        let config: CmsConfig = toml::from_str(
            r#"
            content_path = "/var/www/site"
            cms_server_urls = "https://cms.example.com"
            "#,
        )
        .unwrap();
        let urls: Vec<_> = config.cms_server_urls.iter().collect();
        assert_eq!(urls, vec!["https://cms.example.com"]);
    }

    #[test]
    fn test_list_cms_server_urls() {
        let config: CmsConfig = toml::from_str(
            r#"
            cms_server_urls = ["https://a.example.com", "*"]
            "#,
        )
        .unwrap();
        assert_eq!(config.cms_server_urls.iter().count(), 2);
    }

    #[test]
    fn test_minimal_config_parses() {
        let config: CmsConfig = toml::from_str(
            r#"
            content_path = "/var/www/site"
            redirect_listing_path = "redirects.json"

            [server]
            bind_address = "127.0.0.1:9000"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.redirect_listing_path,
            Some(PathBuf::from("redirects.json"))
        );
        assert_eq!(config.server.bind_address, "127.0.0.1:9000");
        assert_eq!(config.server.request_timeout_secs, 60);
    }
}
