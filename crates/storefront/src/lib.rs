//! Paradise Nursery Storefront library.
//!
//! Serves the plant catalog and the shopping cart. The cart view is
//! server-rendered with Askama and driven by HTMX; every cart button posts an
//! intent that the session's [`CartStore`](paradise_nursery_core::CartStore)
//! applies, and the response is re-rendered from the store afterwards.
//!
//! This crate provides the storefront as a library so the router can be
//! exercised in tests without binding a socket.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod carts;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod view;

use axum::{Router, http::Request};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router with sessions, tracing, and request IDs.
///
/// Sentry layers and static file serving are added by the binary.
pub fn app(state: AppState) -> Router {
    let config = state.config();
    let sessions = middleware::CartSessionStore::new(config.max_carts, config.cart_idle_timeout);
    let session_layer = middleware::create_session_layer(config, sessions);

    Router::new()
        .merge(routes::routes())
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}
