//! movie-ledger: an in-memory, hash-linked chain of movie checkouts.
//!
//! The chain lives in [`chain::ChainHandle`], built once at startup and
//! handed to the router through [`AppState`].

pub mod chain;
pub mod cli;
pub mod error;
pub mod logging;
pub mod model;
pub mod routes;
pub mod validate;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use chain::ChainHandle;

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub chain: ChainHandle,
}

/// Build the router over an existing chain.
pub fn create_app(chain: ChainHandle) -> Router {
    let state = AppState { chain };

    Router::new()
        .route("/", get(routes::get_chain).post(routes::write_block))
        .route("/new", post(routes::new_movie))
        .route("/validate", get(routes::validate_chain))
        .route("/health", get(routes::health))
        .route("/version", get(routes::version))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
