use actix_web::{web, HttpResponse};
use std::sync::Arc;
use tracing::warn;

use crate::AppState;
use matchedge::error::AppError;
use matchedge::models::AnalysisRequest;

/// Evaluate a match analysis request
pub async fn evaluate_match(
    state: web::Data<Arc<AppState>>,
    req: web::Json<AnalysisRequest>,
) -> Result<HttpResponse, AppError> {
    let report = state.engine.evaluate(&req).map_err(|e| {
        warn!(match_id = %req.match_id, "rejected analysis request: {}", e);
        AppError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(report))
}
