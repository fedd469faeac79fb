//! Admin API endpoints
//!
//! Cache maintenance.

use actix_web::{post, web, HttpRequest, Responder};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{limit, ApiResponse};
use crate::{
    configuration::{AppState, State},
    error::Error,
};

#[derive(Debug, Deserialize)]
pub struct ClearQuery {
    pattern: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub pattern: String,
    pub removed: usize,
}

#[post("/admin/cache/clear")]
pub async fn clear_cache(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
    query: web::Query<ClearQuery>,
) -> Result<impl Responder, Error> {
    limit(&state, &req, "admin_cache_clear").await?;
    let pattern = query.into_inner().pattern.unwrap_or(String::from("*"));
    let removed = state.telemetry.clear_cache(Some(&pattern)).await?;
    info!("Cleared {} cache entries matching {}", removed, pattern);

    Ok(ApiResponse::ok(ClearResponse { pattern, removed }))
}
