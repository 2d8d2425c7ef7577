//! URL to content path resolution.
//!
//! # Responsibilities
//! - Map a request URL to a canonical path under the content root
//! - Apply the default-document variation ladder when strict resolution
//!   is off
//! - Guarantee the resolved path can never escape the content root
//!
//! # Design Decisions
//! - Traversal safety comes from segment-level joining ("." dropped,
//!   ".." pops but never past the root), not from convention
//! - Backslashes are accepted as path separators and normalized
//! - Variation escalation is driven by the caller's filesystem probe
//!   loop; the resolver itself is a pure function

use std::path::{Path, PathBuf};

use crate::error::{RouterError, RouterResult};
use crate::routing::normalize::normalize_url_path;

/// Options for a single resolution attempt.
#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions {
    /// Disable the default-document variation ladder.
    pub strict_url_resolution: bool,

    /// Variation step, starting at 1 and strictly increasing across
    /// fallback attempts.
    pub variation: u32,
}

impl ResolveOptions {
    /// Options for the first resolution attempt.
    pub fn first(strict_url_resolution: bool) -> Self {
        Self {
            strict_url_resolution,
            variation: 1,
        }
    }

    /// Options for the next variation in the fallback ladder.
    pub fn next(self) -> Self {
        Self {
            variation: self.variation + 1,
            ..self
        }
    }
}

/// Pure URL-to-filesystem-path resolver.
#[derive(Debug, Clone)]
pub struct PathResolver {
    content_root: PathBuf,
    default_document: String,
}

impl PathResolver {
    /// Create a resolver rooted at `content_root`.
    pub fn new(content_root: impl Into<PathBuf>, default_document: impl Into<String>) -> Self {
        Self {
            content_root: content_root.into(),
            default_document: default_document.into(),
        }
    }

    /// Resolve a request URL into a content path for the given variation.
    ///
    /// Fails with [`RouterError::PageNotFound`] once the variation exceeds
    /// the maximum for the current strictness mode.
    pub fn resolve(&self, url: &str, options: &ResolveOptions) -> RouterResult<PathBuf> {
        let urlpath = normalize_url_path(url);

        // Join under the content root, collapsing "."/".." and redundant
        // separators. ".." can never climb above the root.
        let mut segments: Vec<&str> = Vec::new();
        for segment in urlpath.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                segment => segments.push(segment),
            }
        }
        let trailing_separator = !segments.is_empty() && urlpath.ends_with(['/', '\\']);

        let mut path = self.content_root.clone();
        for segment in &segments {
            path.push(segment);
        }

        if options.strict_url_resolution {
            if options.variation >= 2 {
                return Err(RouterError::PageNotFound(urlpath));
            }
            return Ok(path);
        }

        if trailing_separator {
            path.push(&self.default_document);
        }

        match options.variation {
            0 | 1 => {}
            2 => {
                let url_ext = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .and_then(file_extension);
                let default_ext = file_extension(&self.default_document);
                match (url_ext, default_ext) {
                    // Already shaped like a default document but absent on
                    // disk; appending another one would be pointless.
                    (Some(url_ext), Some(default_ext)) if url_ext == default_ext => {
                        return Err(RouterError::PageNotFound(urlpath));
                    }
                    _ => path.push(&self.default_document),
                }
            }
            _ => return Err(RouterError::PageNotFound(urlpath)),
        }

        Ok(path)
    }

    /// The configured content root.
    pub fn content_root(&self) -> &Path {
        &self.content_root
    }
}

/// Extension of the final path component, including the dot.
fn file_extension(name: &str) -> Option<&str> {
    let name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    name.rfind('.').map(|idx| &name[idx..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> PathResolver {
        PathResolver::new("/site", "index.html")
    }

    #[test]
    fn test_variation_one_leaves_path_untouched() {
        let path = resolver()
            .resolve("/about", &ResolveOptions::first(false))
            .unwrap();
        assert_eq!(path, PathBuf::from("/site/about"));
    }

    #[test]
    fn test_variation_two_appends_default_document() {
        let options = ResolveOptions::first(false).next();
        let path = resolver().resolve("/about", &options).unwrap();
        assert_eq!(path, PathBuf::from("/site/about/index.html"));
    }

    #[test]
    fn test_variation_two_appends_on_foreign_extension() {
        let options = ResolveOptions::first(false).next();
        let path = resolver().resolve("/about.php", &options).unwrap();
        assert_eq!(path, PathBuf::from("/site/about.php/index.html"));
    }

    #[test]
    fn test_variation_two_fails_on_default_extension() {
        let options = ResolveOptions::first(false).next();
        let err = resolver().resolve("/about.html", &options).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_variation_three_fails() {
        let options = ResolveOptions {
            strict_url_resolution: false,
            variation: 3,
        };
        let err = resolver().resolve("/about", &options).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_trailing_separator_appends_default_document_once() {
        let path = resolver()
            .resolve("/docs/", &ResolveOptions::first(false))
            .unwrap();
        assert_eq!(path, PathBuf::from("/site/docs/index.html"));
    }

    #[test]
    fn test_strict_mode_never_substitutes() {
        let options = ResolveOptions::first(true);
        let path = resolver().resolve("/docs/", &options).unwrap();
        assert_eq!(path, PathBuf::from("/site/docs"));

        let err = resolver().resolve("/docs/", &options.next()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_traversal_cannot_escape_root() {
        let path = resolver()
            .resolve("/../../etc/passwd", &ResolveOptions::first(false))
            .unwrap();
        assert_eq!(path, PathBuf::from("/site/etc/passwd"));

        let path = resolver()
            .resolve("/a/../../b", &ResolveOptions::first(false))
            .unwrap();
        assert_eq!(path, PathBuf::from("/site/b"));
    }

    #[test]
    fn test_backslashes_treated_as_separators() {
        let path = resolver()
            .resolve("/a\\b\\c", &ResolveOptions::first(false))
            .unwrap();
        assert_eq!(path, PathBuf::from("/site/a/b/c"));
    }

    #[test]
    fn test_root_with_trailing_separator_does_not_double() {
        let resolver = PathResolver::new("/site/", "index.html");
        let path = resolver
            .resolve("/about", &ResolveOptions::first(false))
            .unwrap();
        assert_eq!(path, PathBuf::from("/site/about"));
    }

    #[test]
    fn test_query_only_url_resolves_to_root_directory() {
        let path = resolver()
            .resolve("?page=2", &ResolveOptions::first(false))
            .unwrap();
        assert_eq!(path, PathBuf::from("/site"));
    }

    #[test]
    fn test_full_url_resolves_path_component() {
        let path = resolver()
            .resolve(
                "https://example.com/products/item?id=2",
                &ResolveOptions::first(false),
            )
            .unwrap();
        assert_eq!(path, PathBuf::from("/site/products/item"));
    }
}
