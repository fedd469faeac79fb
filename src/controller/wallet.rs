use actix_web::{get, web, HttpRequest, Responder};

use super::{limit, ApiResponse};
use crate::{
    configuration::{AppState, State},
    error::Error,
};

#[get("/wallet/{address}")]
pub async fn index(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
    path: web::Path<String>,
) -> Result<impl Responder, Error> {
    limit(&state, &req, "wallet").await?;
    let address = path.into_inner();
    let data = state.telemetry.wallet(&address).await?;
    Ok(ApiResponse::ok(data))
}
