//! Article similarity HTTP API server (Axum).
//!
//! Exposes article creation, lookup, unique-article listing, duplicate group
//! listing and a health probe.

pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use state::AppState;

/// Build the application router with the given state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::article_routes())
        .merge(routes::group_routes())
        .with_state(state)
}

#[cfg(test)]
mod tests;
