//! Request URL normalization.
//!
//! # Responsibilities
//! - Force root-relative URLs to start with "/"
//! - Extract the path component, discarding query and fragment
//! - Provide ONE implementation shared by the path resolver and the
//!   redirect matcher so the two can never drift apart
//!
//! # Design Decisions
//! - A URL containing "//" is treated as protocol-absolute and parsed as
//!   a full URL; everything else is treated as a site-relative path
//! - A single leading backslash is redundant and stripped before the
//!   leading "/" is enforced

use url::Url;

/// Normalize a request URL into a root-relative path.
///
/// Returns the path component only: the query string and fragment are
/// discarded, and the result always starts with "/".
pub fn normalize_url_path(url: &str) -> String {
    let mut url = url.to_string();
    if !url.contains("//") && !url.starts_with('/') {
        if let Some(stripped) = url.strip_prefix('\\') {
            url = stripped.to_string();
        }
        url = format!("/{url}");
    }

    let path = match Url::parse(&url) {
        Ok(parsed) => parsed.path().to_string(),
        // Not an absolute URL: strip query/fragment by hand.
        Err(_) => {
            let end = url.find(['?', '#']).unwrap_or(url.len());
            url[..end].to_string()
        }
    };

    if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    }
}
