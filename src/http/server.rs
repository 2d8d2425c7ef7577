//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all CMS handler
//! - Wire up middleware (tracing, request timeout)
//! - Map route outcomes to HTTP responses
//! - Invoke the passthru forwarder for proxy outcomes
//! - Render 404/500 pages

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use url::Url;

use crate::config::CmsConfig;
use crate::error::RouterError;
use crate::http::pages::render_page_text;
use crate::passthru::{PassthruForwarder, PassthruOutcome};
use crate::routing::{CmsRouter, RouteOutcome};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<CmsRouter>,
    pub forwarder: PassthruForwarder,
    pub generate_404_on_not_found: bool,
}

/// HTTP server for the CMS content router.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &CmsConfig) -> Self {
        let state = AppState {
            router: Arc::new(CmsRouter::new(config)),
            forwarder: PassthruForwarder::from_secs(config.passthru_timeout_secs),
            generate_404_on_not_found: config.server.generate_404_on_not_found,
        };

        let router = Self::build_router(config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &CmsConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(cms_handler))
            .route("/", any(cms_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main CMS handler: redirects first, then published content.
async fn cms_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let url = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    match state.router.route(&url).await {
        Ok(RouteOutcome::Redirect { code, url }) => {
            tracing::debug!(code, destination = %url, "Redirecting");
            redirect_response(code, &url)
        }
        Ok(RouteOutcome::Proxy { url: destination }) => {
            let destination = match absolute_destination(&request, &destination) {
                Ok(destination) => destination,
                Err(err) => {
                    tracing::error!(url = %url, error = %err, "Invalid passthru destination");
                    return error_response();
                }
            };
            tracing::debug!(destination = %destination, "Passthru request");
            match state.forwarder.forward(&destination).await {
                Ok(outcome) => passthru_response(outcome),
                Err(err) => {
                    tracing::error!(url = %url, destination = %destination, error = %err, "Passthru failed");
                    error_response()
                }
            }
        }
        Ok(RouteOutcome::Content(path)) => match tokio::fs::read(&path).await {
            Ok(bytes) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                bytes,
            )
                .into_response(),
            Err(err) => {
                tracing::error!(url = %url, path = %path.display(), error = %err, "Failed to read content file");
                error_response()
            }
        },
        Ok(RouteOutcome::NotFound) => not_found_response(state.generate_404_on_not_found),
        Err(err) => {
            tracing::error!(url = %url, error = %err, "Error routing request");
            error_response()
        }
    }
}

/// Resolve a passthru destination against the inbound request URL, so
/// root-relative destinations proxy back through the requested host.
fn absolute_destination(request: &Request<Body>, destination: &str) -> Result<String, RouterError> {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    let base = format!("http://{}{}", host, request.uri().path());
    let base = Url::parse(&base).map_err(|source| RouterError::InvalidDestination {
        url: base.clone(),
        source,
    })?;
    let resolved = base
        .join(destination)
        .map_err(|source| RouterError::InvalidDestination {
            url: destination.to_string(),
            source,
        })?;
    Ok(resolved.into())
}

fn redirect_response(code: u16, url: &str) -> Response {
    let status = match code {
        301 => StatusCode::MOVED_PERMANENTLY,
        _ => StatusCode::FOUND,
    };
    (status, [(header::LOCATION, url.to_string())]).into_response()
}

fn passthru_response(outcome: PassthruOutcome) -> Response {
    let status =
        StatusCode::from_u16(outcome.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    match outcome {
        PassthruOutcome::Redirect { location, .. } => {
            (status, [(header::LOCATION, location)]).into_response()
        }
        PassthruOutcome::Response {
            content_type: Some(content_type),
            body,
            ..
        } => (status, [(header::CONTENT_TYPE, content_type)], body).into_response(),
        PassthruOutcome::Response { body, .. } => (status, body).into_response(),
    }
}

fn not_found_response(generate_page: bool) -> Response {
    if generate_page {
        let page = render_page_text(
            "404 - Not Found",
            "Not Found",
            "The requested page was not found on this server.",
        );
        (StatusCode::NOT_FOUND, Html(page)).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

fn error_response() -> Response {
    let page = render_page_text(
        "System Error",
        "System Error",
        "An unexpected error has occurred. Please see system log for more details.",
    );
    (StatusCode::INTERNAL_SERVER_ERROR, Html(page)).into_response()
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl+C handler");
    }
    tracing::info!("Shutdown signal received");
}
