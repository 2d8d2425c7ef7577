//! CMS Content Router Library
//!
//! Resolves request URLs for a published content site into one of four
//! outcomes: a redirect instruction, a proxied (passthru) response from
//! a remote origin, a path to a locally published content file, or
//! NotFound.

pub mod config;
pub mod content;
pub mod editor;
pub mod error;
pub mod http;
pub mod passthru;
pub mod routing;

pub use config::CmsConfig;
pub use content::{PageData, PageStore};
pub use editor::EditorLauncher;
pub use error::{RouterError, RouterResult};
pub use http::HttpServer;
pub use passthru::{PassthruForwarder, PassthruOutcome};
pub use routing::{CmsRouter, ResolveOptions, RouteOutcome};
