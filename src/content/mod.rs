//! Published content loading.
//!
//! # Responsibilities
//! - Read page files, escalating through resolution variations when the
//!   exact path is absent
//! - Decode page JSON payloads with degrade-to-none semantics
//!
//! # Design Decisions
//! - Only "file does not exist" and "path is a directory" trigger the
//!   next variation; any other I/O error (e.g. permissions) propagates
//! - A malformed page payload is equivalent to not-found for data
//!   consumers, never a hard error

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::RouterResult;
use crate::routing::resolver::{PathResolver, ResolveOptions};
use crate::routing::CmsRouter;

/// SEO fields of a page payload.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageSeo {
    /// Title for the HEAD tag.
    pub title: String,
    pub keywords: String,
    pub metadesc: String,
    pub canonical_url: String,
}

/// Decoded page payload. Every field is defaulted so partial payloads
/// decode.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageData {
    pub seo: PageSeo,
    pub css: String,
    pub js: String,
    pub header: String,
    pub footer: String,
    /// Title for the page body content.
    pub title: String,
    /// Content area name → content.
    pub content: HashMap<String, String>,
    /// Property name → property value.
    pub properties: HashMap<String, Value>,
    pub page_template_id: String,
}

/// Loads page files through the resolver's variation ladder.
#[derive(Debug, Clone)]
pub struct PageStore {
    resolver: PathResolver,
    strict_url_resolution: bool,
}

impl PageStore {
    /// Create a store sharing a router's resolution behavior.
    pub fn new(router: &CmsRouter) -> Self {
        Self {
            resolver: router.resolver().clone(),
            strict_url_resolution: router.strict_url_resolution(),
        }
    }

    /// Read the page file for a URL, escalating through variations until
    /// a file can be read or the ladder is exhausted.
    pub async fn read_page(&self, url: &str) -> RouterResult<String> {
        let mut options = ResolveOptions::first(self.strict_url_resolution);
        loop {
            let path = self.resolver.resolve(url, &options)?;
            match tokio::fs::read_to_string(&path).await {
                Ok(content) => return Ok(content),
                Err(err)
                    if matches!(
                        err.kind(),
                        std::io::ErrorKind::NotFound | std::io::ErrorKind::IsADirectory
                    ) =>
                {
                    options = options.next();
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Decode the page payload for a URL.
    ///
    /// Returns `None` when the page is absent or its JSON is malformed.
    pub async fn page_data(&self, url: &str) -> Option<PageData> {
        let content = self.read_page(url).await.ok()?;
        serde_json::from_str(&content).ok()
    }
}
