//! HTTP routes for reading the chain, recording checkouts and minting movie IDs.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::ser::PrettyFormatter;
use tracing::{info, warn};

use crate::error::AppError;
use crate::model::{Movie, MovieCheckout};
use crate::AppState;

/// Serialize `value` as JSON indented by a single space.
fn pretty_json<T: Serialize>(status: StatusCode, value: &T) -> Result<Response, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b" "));
    value.serialize(&mut ser)?;
    Ok((status, [(header::CONTENT_TYPE, "application/json")], buf).into_response())
}

fn decode<T: DeserializeOwned>(body: &[u8], what: &'static str) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!("could not {what}: {e}");
        AppError::Decode(format!("could not {what}"))
    })
}

/// GET /
pub async fn get_chain(State(state): State<AppState>) -> Result<Response, AppError> {
    let blocks = state.chain.snapshot();
    pretty_json(StatusCode::OK, &blocks).map_err(|e| AppError::Internal(e.to_string()))
}

/// POST / — 201 with the new block, 409 if the chain refused it.
pub async fn write_block(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let checkout: MovieCheckout = decode(&body, "write block")?;
    let block = state.chain.append(checkout)?;
    pretty_json(StatusCode::CREATED, &block).map_err(|e| AppError::Internal(e.to_string()))
}

/// POST /new — replace the movie id with a digest of id and release date.
pub async fn new_movie(body: Bytes) -> Result<Response, AppError> {
    let mut movie: Movie = decode(&body, "create movie")?;
    movie.id = movie.derived_id();
    info!(id = %movie.id, title = %movie.title, "movie registered");

    pretty_json(StatusCode::OK, &movie).map_err(|e| {
        warn!("could not marshal payload: {e}");
        AppError::Internal("could not save movie data".into())
    })
}

/// GET /validate — re-check every linkage and hash; returns { ok, errors[] }
#[derive(Serialize)]
pub struct ValidateResp {
    pub ok: bool,
    pub errors: Vec<String>,
}
pub async fn validate_chain(State(state): State<AppState>) -> Json<ValidateResp> {
    let errors = state.chain.audit();
    Json(ValidateResp {
        ok: errors.is_empty(),
        errors,
    })
}

/// GET /health
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
}
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// GET /version
#[derive(Serialize)]
pub struct Version {
    pub version: &'static str,
    pub git_sha: Option<&'static str>,
}
pub async fn version() -> Json<Version> {
    Json(Version {
        version: env!("CARGO_PKG_VERSION"),
        git_sha: option_env!("GIT_SHA"),
    })
}
