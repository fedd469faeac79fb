//! Price endpoints

use actix_web::{get, web, HttpRequest, Responder};
use serde::Deserialize;

use super::{limit, ApiResponse};
use crate::{
    configuration::{AppState, State},
    error::Error,
};

const DEFAULT_TIMEFRAME: &str = "1D";

#[get("/price")]
pub async fn current(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    limit(&state, &req, "price").await?;
    let data = state.telemetry.price().await?;
    Ok(ApiResponse::ok(data))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    timeframe: Option<String>,
    limit: Option<i64>,
}

#[get("/price/history")]
pub async fn history(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
    query: web::Query<HistoryQuery>,
) -> Result<impl Responder, Error> {
    limit(&state, &req, "price_history").await?;
    let timeframe = query.timeframe.as_deref().unwrap_or(DEFAULT_TIMEFRAME);
    let data = state.telemetry.price_history(timeframe, query.limit).await?;
    Ok(ApiResponse::ok(data))
}
