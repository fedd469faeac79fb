//! KRC-20 token endpoints

use actix_web::{get, web, HttpRequest, Responder};
use serde::Deserialize;

use super::{limit, ApiResponse};
use crate::{
    configuration::{AppState, State},
    error::Error,
    service::DEFAULT_TRENDING_LIMIT,
};

#[get("/krc20/tokens")]
pub async fn tokens(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    limit(&state, &req, "krc20_tokens").await?;
    let data = state.telemetry.tokens().await?;
    Ok(ApiResponse::ok(data))
}

#[get("/krc20/tokens/{symbol}")]
pub async fn token(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
    path: web::Path<String>,
) -> Result<impl Responder, Error> {
    limit(&state, &req, "krc20_token").await?;
    let symbol = path.into_inner();
    let data = state.telemetry.token(&symbol).await?;
    Ok(ApiResponse::ok(data))
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    limit: Option<i64>,
}

#[get("/krc20/trending")]
pub async fn trending(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
    query: web::Query<TrendingQuery>,
) -> Result<impl Responder, Error> {
    limit(&state, &req, "krc20_trending").await?;
    let data = state
        .telemetry
        .trending_tokens(query.limit.unwrap_or(DEFAULT_TRENDING_LIMIT))
        .await?;
    Ok(ApiResponse::ok(data))
}

#[get("/krc20/analytics")]
pub async fn analytics(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    limit(&state, &req, "krc20_analytics").await?;
    let data = state.telemetry.token_analytics().await?;
    Ok(ApiResponse::ok(data))
}
