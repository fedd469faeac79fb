//! Network and BlockDAG endpoints

use actix_web::{get, web, HttpRequest, Responder};

use super::{limit, ApiResponse};
use crate::{
    configuration::{AppState, State},
    error::Error,
};

#[get("/network/stats")]
pub async fn stats(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    limit(&state, &req, "network_stats").await?;
    let data = state.telemetry.network_stats().await?;
    Ok(ApiResponse::ok(data))
}

#[get("/network/health")]
pub async fn health(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    limit(&state, &req, "network_health").await?;
    let data = state.telemetry.network_health().await?;
    Ok(ApiResponse::ok(data))
}

#[get("/blockdag/metrics")]
pub async fn blockdag(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    limit(&state, &req, "blockdag").await?;
    let data = state.telemetry.blockdag().await?;
    Ok(ApiResponse::ok(data))
}
