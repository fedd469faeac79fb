use actix_web::{post, web, HttpRequest, Responder};

use super::{limit, ApiResponse};
use crate::{
    configuration::{AppState, State},
    error::Error,
    model::MiningInput,
};

#[post("/mining/calculate")]
pub async fn calculate(
    req: HttpRequest,
    state: web::Data<AppState<State>>,
    body: web::Json<MiningInput>,
) -> Result<impl Responder, Error> {
    limit(&state, &req, "mining").await?;
    let data = state.telemetry.mining(body.into_inner()).await?;
    Ok(ApiResponse::ok(data))
}
