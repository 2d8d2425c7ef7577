//! CMS editor launch support.
//!
//! # Responsibilities
//! - Detect when a page is opened from the CMS editor (query token)
//! - Whitelist the claimed CMS server URL against the configured list
//! - Emit the script tag that launches the editor
//!
//! # Design Decisions
//! - Whitelisting is a simple, non-recursive URL comparison: scheme,
//!   case-insensitive host, port with http/https defaults, and path
//!   prefix; "*" matches any server
//! - Configured entries that fail to parse as absolute URLs are skipped,
//!   never treated as wildcards

use url::Url;

use crate::config::CmsServerUrls;
use crate::http::pages::escape_html_attr;

/// Query parameter carrying the editor session token.
pub const TOKEN_PARAM: &str = "cms_token";

/// Query parameter carrying the claimed CMS server URL.
pub const SERVER_PARAM: &str = "cms_url";

/// Path of the editor launcher script on the CMS server.
const EDITOR_SCRIPT_PATH: &str = "/js/editor.js";

/// Validates editor launch requests against the configured CMS servers.
#[derive(Debug, Clone)]
pub struct EditorLauncher {
    cms_server_urls: CmsServerUrls,
}

impl EditorLauncher {
    pub fn new(cms_server_urls: CmsServerUrls) -> Self {
        Self { cms_server_urls }
    }

    /// True when the request carries an editor session token.
    pub fn is_in_editor(query: &str) -> bool {
        query_param(query, TOKEN_PARAM).is_some_and(|token| !token.is_empty())
    }

    /// Script tag launching the CMS editor, or `None` when the request is
    /// not an editor launch or the claimed server is not whitelisted.
    pub fn editor_script(&self, query: &str) -> Option<String> {
        query_param(query, TOKEN_PARAM).filter(|token| !token.is_empty())?;
        let server_url = query_param(query, SERVER_PARAM).filter(|url| !url.is_empty())?;

        if !self.is_allowed_server(&server_url) {
            return None;
        }

        let script_url = join_url_path(&server_url, EDITOR_SCRIPT_PATH);
        Some(format!(
            "<script type=\"text/javascript\" src=\"{}\"></script>",
            escape_html_attr(&script_url)
        ))
    }

    fn is_allowed_server(&self, server_url: &str) -> bool {
        let Ok(claimed) = Url::parse(server_url) else {
            return false;
        };

        for entry in self.cms_server_urls.iter() {
            if entry.is_empty() {
                continue;
            }
            if entry == "*" {
                return true;
            }
            let Ok(allowed) = Url::parse(entry) else {
                continue;
            };
            if !allowed.scheme().eq_ignore_ascii_case(claimed.scheme()) {
                continue;
            }
            let (Some(allowed_host), Some(claimed_host)) = (allowed.host_str(), claimed.host_str())
            else {
                continue;
            };
            if !allowed_host.eq_ignore_ascii_case(claimed_host) {
                continue;
            }
            if allowed.port_or_known_default() != claimed.port_or_known_default() {
                continue;
            }
            if claimed.path().starts_with(allowed.path()) {
                return true;
            }
        }
        false
    }
}

fn query_param(query: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Join a base URL and a path without doubling separators.
fn join_url_path(base: &str, path: &str) -> String {
    let base = base.trim_end_matches(['/', '\\']);
    let path = path.trim_start_matches(['/', '\\']);
    if base.is_empty() {
        return path.to_string();
    }
    if path.is_empty() {
        return base.to_string();
    }
    format!("{base}/{path}")
}
