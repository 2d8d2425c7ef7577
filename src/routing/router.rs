//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Load the redirect listing and check it first
//! - Fall through to content resolution with variation escalation
//! - Return exactly one tagged outcome per request
//!
//! # Design Decisions
//! - Redirect codes are validated only on the matched rule: "301"/"302"
//!   become redirects, "PASSTHRU" becomes a proxy outcome, anything else
//!   is a configuration error
//! - PageNotFound is expected control flow and maps to the NotFound
//!   outcome; every other error propagates
//! - Variation escalation re-resolves and re-probes; a missing file or a
//!   bare directory escalates, any other I/O error propagates as-is

use std::path::{Path, PathBuf};

use crate::config::CmsConfig;
use crate::error::{RouterError, RouterResult};
use crate::routing::redirects::{match_redirect, RedirectSource};
use crate::routing::resolver::{PathResolver, ResolveOptions};

/// Outcome of routing one request URL. Outcomes are mutually exclusive
/// and exhaustive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Serve the published content file at this path.
    Content(PathBuf),
    /// Respond with an HTTP redirect.
    Redirect { code: u16, url: String },
    /// Proxy the request to this destination via the passthru forwarder.
    Proxy { url: String },
    /// No redirect matched and all content variations were exhausted.
    NotFound,
}

/// Coordinates redirect matching and content resolution for one site.
#[derive(Debug, Clone)]
pub struct CmsRouter {
    resolver: PathResolver,
    redirects: RedirectSource,
    strict_url_resolution: bool,
}

impl CmsRouter {
    /// Build a router from the site configuration.
    pub fn new(config: &CmsConfig) -> Self {
        Self {
            resolver: PathResolver::new(&config.content_path, config.default_document.as_str()),
            redirects: RedirectSource::new(
                config.redirect_listing_path.as_deref(),
                &config.content_path,
            ),
            strict_url_resolution: config.strict_url_resolution,
        }
    }

    /// Route a request URL to its outcome.
    pub async fn route(&self, url: &str) -> RouterResult<RouteOutcome> {
        let rules = self.redirects.load().await?;
        if let Some(matched) = match_redirect(&rules, url)? {
            return match matched.http_code.as_str() {
                "301" => Ok(RouteOutcome::Redirect {
                    code: 301,
                    url: matched.url,
                }),
                "302" => Ok(RouteOutcome::Redirect {
                    code: 302,
                    url: matched.url,
                }),
                "PASSTHRU" => Ok(RouteOutcome::Proxy { url: matched.url }),
                other => Err(RouterError::InvalidRedirectCode(other.to_string())),
            };
        }

        match self.locate_content(url).await {
            Ok(path) => Ok(RouteOutcome::Content(path)),
            Err(err) if err.is_not_found() => Ok(RouteOutcome::NotFound),
            Err(err) => Err(err),
        }
    }

    /// Resolve a URL to an existing content file, escalating through the
    /// variation ladder until a file is found or the ladder is exhausted.
    pub async fn locate_content(&self, url: &str) -> RouterResult<PathBuf> {
        let mut options = ResolveOptions::first(self.strict_url_resolution);
        loop {
            let path = self.resolver.resolve(url, &options)?;
            match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => return Ok(path),
                // A bare directory needs the default-document variation.
                Ok(_) => options = options.next(),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    options = options.next();
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Resolve a URL for a specific variation without probing the
    /// filesystem.
    pub fn resolve(&self, url: &str, options: &ResolveOptions) -> RouterResult<PathBuf> {
        self.resolver.resolve(url, options)
    }

    /// The resolver's content root.
    pub fn content_root(&self) -> &Path {
        self.resolver.content_root()
    }

    pub(crate) fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub(crate) fn strict_url_resolution(&self) -> bool {
        self.strict_url_resolution
    }
}
