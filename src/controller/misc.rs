//! Service metadata endpoints

use actix_web::{get, web, HttpRequest, Responder};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{limit, ApiResponse};
use crate::{
    configuration::{AppState, State},
    error::Error,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
}

#[get("/version")]
pub async fn version(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    limit(&state, &req, "version").await?;
    Ok(ApiResponse::ok(VersionResponse { version: VERSION }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub cache_entries: Option<usize>,
    pub timestamp: DateTime<Utc>,
}

/// Liveness only; never calls an upstream provider.
#[get("/health")]
pub async fn health(
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    let cache_entries = state.telemetry.cache_entries().await;
    Ok(ApiResponse::ok(HealthResponse {
        status: "healthy",
        version: VERSION,
        cache_entries,
        timestamp: Utc::now(),
    }))
}
