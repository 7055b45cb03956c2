use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::AppState;
use matchedge::models::HealthResponse;

/// Health check endpoint
pub async fn health_check(state: web::Data<Arc<AppState>>) -> impl Responder {
    let response = HealthResponse {
        status: format!("ok ({})", state.engine.config().policy.name()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    HttpResponse::Ok().json(response)
}
