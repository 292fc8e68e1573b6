//! # lamina_api
//!
//! HTTP API library for Lamina.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use lamina_core::auth::{AuthError, GoogleTokenVerifier, RemoteJwks};
use tower_http::trace::TraceLayer;
use tracing::info;
use url::Url;

use crate::config::ApiConfig;
use crate::handlers::{items, root};

/// Route paths.
pub mod routes {
    pub const GET_ROOT: &str = "/";
    pub const GET_API_ITEMS_ID: &str = "/api/items/{item_id}";
}

/// Shared application state passed to all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// API configuration.
    pub config: ApiConfig,
    /// Token verifier; `None` when auth is disabled.
    pub verifier: Option<GoogleTokenVerifier>,
}

impl AppState {
    pub fn new(config: ApiConfig, verifier: Option<GoogleTokenVerifier>) -> Self {
        Self { config, verifier }
    }

    /// Build state from configuration, wiring a remote JWKS source when a
    /// Google client id is configured.
    pub fn from_config(config: ApiConfig) -> Result<Self, AuthError> {
        let verifier = match config.google_client_id.as_deref() {
            Some(client_id) => {
                let url = Url::parse(&config.jwks_url)
                    .map_err(|e| AuthError::KeyFetch(format!("jwks url: {e}")))?;
                let keys = Arc::new(RemoteJwks::new(url)?);
                info!(client_id, jwks_url = %config.jwks_url, "bearer auth enabled");
                Some(GoogleTokenVerifier::new(client_id, keys).with_leeway(config.clock_skew_secs))
            }
            None => {
                info!("GOOGLE_CLIENT_ID not set, bearer auth disabled");
                None
            }
        };
        Ok(Self::new(config, verifier))
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = middleware::cors::cors_layer(&state.config.allowed_origins);

    // Public routes (no auth required)
    let public = Router::new().route(routes::GET_ROOT, get(root::read_root));

    // Protected routes (require auth when a verifier is configured)
    let protected = Router::new()
        .route(routes::GET_API_ITEMS_ID, get(items::read_item))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
