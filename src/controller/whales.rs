//! Whale tracking endpoints

use actix_web::{get, web, HttpRequest, Responder};
use serde::Deserialize;

use super::{limit, ApiResponse};
use crate::{
    configuration::{AppState, State},
    error::Error,
    service::DEFAULT_WHALE_LIMIT,
};

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    limit: Option<i64>,
}

#[get("/whales/top")]
pub async fn top(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
    query: web::Query<TopQuery>,
) -> Result<impl Responder, Error> {
    limit(&state, &req, "whales_top").await?;
    let data = state
        .telemetry
        .top_whales(query.limit.unwrap_or(DEFAULT_WHALE_LIMIT))
        .await?;
    Ok(ApiResponse::ok(data))
}

#[get("/whales/stats")]
pub async fn stats(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    limit(&state, &req, "whales_stats").await?;
    let data = state.telemetry.whale_statistics().await?;
    Ok(ApiResponse::ok(data))
}
