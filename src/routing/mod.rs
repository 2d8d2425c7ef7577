//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request URL
//!     → normalize.rs (leading slash, path extraction)
//!     → redirects.rs (ordered rule matching, first match wins)
//!     → on match: Redirect / Proxy outcome
//!     → otherwise: resolver.rs (content path + variation ladder)
//!     → router.rs probes the filesystem, escalating variations
//!     → Return: RouteOutcome::{Content, Redirect, Proxy, NotFound}
//! ```
//!
//! # Design Decisions
//! - URL normalization implemented once and shared by matcher and
//!   resolver
//! - Redirect rules are reloaded per request and treated as immutable
//!   for the duration of that request
//! - Deterministic: same input always produces the same outcome

pub mod normalize;
pub mod redirects;
pub mod resolver;
pub mod router;

pub use redirects::{match_redirect, MatchType, RedirectMatch, RedirectRule, RedirectSource};
pub use resolver::{PathResolver, ResolveOptions};
pub use router::{CmsRouter, RouteOutcome};
