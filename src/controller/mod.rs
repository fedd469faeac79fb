//! API Controller modules
//!
//! Every route runs the per-client rate limiter before reaching the service
//! and wraps its payload in the success envelope.

use actix_web::{web, HttpRequest};
use serde::Serialize;

use crate::{
    configuration::{AppState, State},
    error::Error,
};

pub mod admin;
pub mod krc20;
pub mod mining;
pub mod misc;
pub mod network;
pub mod price;
pub mod wallet;
pub mod whales;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> web::Json<ApiResponse<T>> {
        web::Json(ApiResponse {
            success: true,
            data,
        })
    }
}

pub fn client_ip(req: &HttpRequest) -> String {
    req.peer_addr()
        .map(|item| item.ip().to_string())
        .unwrap_or_else(|| String::from("unknown"))
}

/// Rejects the request when `route` is over either window for this client.
pub async fn limit(
    state: &web::Data<AppState<State>>,
    req: &HttpRequest,
    route: &str,
) -> Result<(), Error> {
    state.rate_limiter.check(route, &client_ip(req)).await
}
