//! Redirect rule listing and ordered matching.
//!
//! # Responsibilities
//! - Deserialize the external redirect listing (JSON array)
//! - Match a request URL against the rules in list order
//! - Substitute regex capture groups into the destination template
//!
//! # Design Decisions
//! - First match wins; there is no priority field and no best-match pass
//! - Regex match types perform a SEARCH (substring) match, not an
//!   anchored full-path match; patterns that want anchoring carry their
//!   own `^`/`$`
//! - `$n` placeholders are substituted from the highest group index down
//!   so `$1` data cannot corrupt a later `$10`-style replacement
//! - The HTTP code stays a string on the rule; it is only validated when
//!   a rule actually matches, so a bad code on a dead rule is inert but a
//!   bad code on a matched rule surfaces as a configuration error

use std::path::{Path, PathBuf};

use regex::RegexBuilder;
use serde::Deserialize;

use crate::error::{RouterError, RouterResult};
use crate::routing::normalize::normalize_url_path;

/// How a redirect rule's pattern is compared against the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum MatchType {
    /// Byte-for-byte equality.
    #[serde(rename = "EXACT")]
    Exact,
    /// Equality after lowercasing both sides.
    #[serde(rename = "EXACTICASE")]
    ExactICase,
    /// Path starts with the pattern.
    #[serde(rename = "BEGINS")]
    Begins,
    /// Path starts with the pattern, compared lowercased.
    #[serde(rename = "BEGINSICASE")]
    BeginsICase,
    /// Pattern compiled as a regular expression.
    #[serde(rename = "REGEX")]
    Regex,
    /// Pattern compiled as a case-insensitive regular expression.
    #[serde(rename = "REGEXICASE")]
    RegexICase,
}

/// One entry of the redirect listing. Rules are never mutated; list order
/// is significant.
#[derive(Debug, Clone, Deserialize)]
pub struct RedirectRule {
    /// Pattern to compare against the normalized request path.
    #[serde(rename = "redirect_url")]
    pub url_pattern: String,

    /// Comparison strategy for `url_pattern`.
    #[serde(rename = "redirect_url_type")]
    pub match_type: MatchType,

    /// Destination template; may contain `$1..$n` placeholders for the
    /// regex match types.
    #[serde(rename = "redirect_dest")]
    pub destination: String,

    /// "301", "302", or "PASSTHRU"; validated at dispatch time.
    #[serde(rename = "redirect_http_code")]
    pub http_code: String,
}

/// A matched rule, transformed into its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectMatch {
    /// The matched rule's HTTP code string.
    pub http_code: String,
    /// Destination URL with capture placeholders substituted.
    pub url: String,
}

/// Match a URL against an ordered rule list; the first matching rule wins.
///
/// Returns `Ok(None)` when no rule matches, which means "fall through to
/// content resolution" rather than not-found.
pub fn match_redirect(rules: &[RedirectRule], url: &str) -> RouterResult<Option<RedirectMatch>> {
    let urlpath = normalize_url_path(url);

    for rule in rules {
        match rule.match_type {
            MatchType::Exact => {
                if urlpath != rule.url_pattern {
                    continue;
                }
            }
            MatchType::ExactICase => {
                if urlpath.to_lowercase() != rule.url_pattern.to_lowercase() {
                    continue;
                }
            }
            MatchType::Begins => {
                if !urlpath.starts_with(&rule.url_pattern) {
                    continue;
                }
            }
            MatchType::BeginsICase => {
                if !urlpath
                    .to_lowercase()
                    .starts_with(&rule.url_pattern.to_lowercase())
                {
                    continue;
                }
            }
            MatchType::Regex | MatchType::RegexICase => {
                let pattern = RegexBuilder::new(&rule.url_pattern)
                    .case_insensitive(rule.match_type == MatchType::RegexICase)
                    .build()
                    .map_err(|source| RouterError::InvalidRedirectPattern {
                        pattern: rule.url_pattern.clone(),
                        source,
                    })?;
                let Some(captures) = pattern.captures(&urlpath) else {
                    continue;
                };
                let mut destination = rule.destination.clone();
                // Highest group first, so substituted data containing a
                // "$n" literal is never re-expanded.
                for group in (1..captures.len()).rev() {
                    let value = captures.get(group).map(|m| m.as_str()).unwrap_or("");
                    destination = destination.replace(&format!("${group}"), value);
                }
                return Ok(Some(RedirectMatch {
                    http_code: rule.http_code.clone(),
                    url: destination,
                }));
            }
        }
        return Ok(Some(RedirectMatch {
            http_code: rule.http_code.clone(),
            url: rule.destination.clone(),
        }));
    }

    Ok(None)
}

/// Loads the redirect listing configured for a site.
#[derive(Debug, Clone)]
pub struct RedirectSource {
    listing_path: Option<PathBuf>,
}

impl RedirectSource {
    /// Create a source for the given listing path. A relative path is
    /// taken relative to the content root; `None` means no redirects are
    /// configured.
    pub fn new(listing_path: Option<&Path>, content_root: &Path) -> Self {
        let listing_path = listing_path.map(|path| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                content_root.join(path)
            }
        });
        Self { listing_path }
    }

    /// Load the rule list. No configured path yields an empty list, not
    /// an error.
    pub async fn load(&self) -> RouterResult<Vec<RedirectRule>> {
        let Some(path) = &self.listing_path else {
            return Ok(Vec::new());
        };
        let content = tokio::fs::read_to_string(path).await?;
        serde_json::from_str(&content).map_err(|source| RouterError::RedirectListing {
            path: path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str, match_type: MatchType, dest: &str, code: &str) -> RedirectRule {
        RedirectRule {
            url_pattern: pattern.to_string(),
            match_type,
            destination: dest.to_string(),
            http_code: code.to_string(),
        }
    }

    #[test]
    fn test_exact_match_is_case_sensitive() {
        let rules = vec![rule("/old", MatchType::Exact, "/new", "301")];

        let matched = match_redirect(&rules, "/old").unwrap().unwrap();
        assert_eq!(matched.url, "/new");
        assert_eq!(matched.http_code, "301");

        assert!(match_redirect(&rules, "/OLD").unwrap().is_none());
    }

    #[test]
    fn test_exact_icase_matches_any_casing() {
        let rules = vec![rule("/Old", MatchType::ExactICase, "/new", "302")];
        assert!(match_redirect(&rules, "/oLd").unwrap().is_some());
        assert!(match_redirect(&rules, "/other").unwrap().is_none());
    }

    #[test]
    fn test_begins_match() {
        let rules = vec![rule("/blog/", MatchType::Begins, "/news/", "301")];
        assert!(match_redirect(&rules, "/blog/2020/post").unwrap().is_some());
        assert!(match_redirect(&rules, "/BLOG/2020/post").unwrap().is_none());

        let rules = vec![rule("/blog/", MatchType::BeginsICase, "/news/", "301")];
        assert!(match_redirect(&rules, "/BLOG/2020/post").unwrap().is_some());
    }

    #[test]
    fn test_regex_capture_substitution() {
        let rules = vec![rule("^/old/(.*)$", MatchType::Regex, "/new/$1", "301")];
        let matched = match_redirect(&rules, "/old/page").unwrap().unwrap();
        assert_eq!(matched.http_code, "301");
        assert_eq!(matched.url, "/new/page");
    }

    #[test]
    fn test_regex_icase() {
        let rules = vec![rule("^/old/(.*)$", MatchType::Regex, "/new/$1", "301")];
        assert!(match_redirect(&rules, "/OLD/page").unwrap().is_none());

        let rules = vec![rule("^/old/(.*)$", MatchType::RegexICase, "/new/$1", "301")];
        assert!(match_redirect(&rules, "/OLD/page").unwrap().is_some());
    }

    #[test]
    fn test_regex_is_substring_search() {
        // Unanchored patterns match mid-path.
        let rules = vec![rule("/old/", MatchType::Regex, "/new/", "302")];
        assert!(match_redirect(&rules, "/x/old/y").unwrap().is_some());
    }

    #[test]
    fn test_substitution_processes_highest_group_first() {
        // $1 captures the literal text "$2"; substituting high-to-low must
        // not re-expand it with $2's value.
        let rules = vec![rule(
            "^/x/([^/]+)/([^/]+)$",
            MatchType::Regex,
            "/r/$1-$2",
            "301",
        )];
        let matched = match_redirect(&rules, "/x/$2/b").unwrap().unwrap();
        assert_eq!(matched.url, "/r/$2-b");
    }

    #[test]
    fn test_first_match_wins_regardless_of_specificity() {
        let rules = vec![
            rule("/a", MatchType::Begins, "/first", "301"),
            rule("/a/b/c", MatchType::Exact, "/second", "302"),
        ];
        let matched = match_redirect(&rules, "/a/b/c").unwrap().unwrap();
        assert_eq!(matched.url, "/first");
    }

    #[test]
    fn test_invalid_pattern_surfaces_error() {
        let rules = vec![rule("(", MatchType::Regex, "/new", "301")];
        let err = match_redirect(&rules, "/anything").unwrap_err();
        assert!(matches!(err, RouterError::InvalidRedirectPattern { .. }));
    }

    #[test]
    fn test_url_normalized_before_matching() {
        let rules = vec![rule("/old", MatchType::Exact, "/new", "301")];
        assert!(match_redirect(&rules, "old?from=feed").unwrap().is_some());
        assert!(match_redirect(&rules, "https://example.com/old")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_no_rules_no_match() {
        assert!(match_redirect(&[], "/anything").unwrap().is_none());
    }

    #[test]
    fn test_listing_deserializes() {
        let listing = r#"[
            {
                "redirect_url": "^/old/(.*)$",
                "redirect_url_type": "REGEX",
                "redirect_dest": "/new/$1",
                "redirect_http_code": "301"
            },
            {
                "redirect_url": "/ext",
                "redirect_url_type": "BEGINS",
                "redirect_dest": "http://example.com/x",
                "redirect_http_code": "PASSTHRU"
            }
        ]"#;
        let rules: Vec<RedirectRule> = serde_json::from_str(listing).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].match_type, MatchType::Regex);
        assert_eq!(rules[1].http_code, "PASSTHRU");
    }
}
