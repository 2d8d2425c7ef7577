//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → server.rs (Axum setup, timeout, tracing)
//!     → routing engine decides the outcome
//!     → Redirect: 301/302 with Location
//!     → Proxy: passthru forwarder, filtered headers
//!     → Content: file read, served as HTML
//!     → NotFound / error: pages.rs (rendered 404/500)
//! ```

pub mod pages;
pub mod server;

pub use server::HttpServer;
