//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the content root exists and is a directory
//! - Validate value ranges (timeouts > 0, bind address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: CmsConfig → Result<(), Vec<ValidationError>>
//! - Runs before the config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::CmsConfig;

/// A single semantic violation in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn violation(errors: &mut Vec<ValidationError>, field: &str, message: impl Into<String>) {
    errors.push(ValidationError {
        field: field.to_string(),
        message: message.into(),
    });
}

/// Validate a parsed configuration, reporting every violation found.
pub fn validate_config(config: &CmsConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.content_path.as_os_str().is_empty() {
        violation(&mut errors, "content_path", "must not be empty");
    } else if !config.content_path.is_dir() {
        violation(
            &mut errors,
            "content_path",
            format!(
                "directory does not exist: {}",
                config.content_path.display()
            ),
        );
    }

    if config.default_document.is_empty() {
        violation(&mut errors, "default_document", "must not be empty");
    } else if config.default_document.contains(['/', '\\']) {
        violation(
            &mut errors,
            "default_document",
            "must be a bare filename without path separators",
        );
    }

    if config.passthru_timeout_secs == 0 {
        violation(&mut errors, "passthru_timeout_secs", "must be greater than zero");
    }

    if config.server.request_timeout_secs == 0 {
        violation(
            &mut errors,
            "server.request_timeout_secs",
            "must be greater than zero",
        );
    }

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        violation(
            &mut errors,
            "server.bind_address",
            format!("not a valid socket address: {}", config.server.bind_address),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        // Default content_path is "." which always exists.
        assert!(validate_config(&CmsConfig::default()).is_ok());
    }

    #[test]
    fn test_all_violations_reported() {
        let mut config = CmsConfig::default();
        config.content_path = "/nonexistent/content/root".into();
        config.default_document = "pages/index.html".to_string();
        config.passthru_timeout_secs = 0;
        config.server.bind_address = "not-an-address".to_string();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"content_path"));
        assert!(fields.contains(&"default_document"));
        assert!(fields.contains(&"passthru_timeout_secs"));
        assert!(fields.contains(&"server.bind_address"));
    }

    #[test]
    fn test_empty_default_document_rejected() {
        let mut config = CmsConfig::default();
        config.default_document = String::new();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "default_document");
    }
}
