use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::errors::AppError;
use crate::models::BusinessHours;
use crate::state::AppState;

// GET /api/settings/business-hours
pub async fn get_business_hours(State(state): State<Arc<AppState>>) -> Json<BusinessHours> {
    Json(state.hours.lock().unwrap().clone())
}

// PUT /api/settings/business-hours
pub async fn update_business_hours(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BusinessHours>,
) -> Result<Json<BusinessHours>, AppError> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let mut hours = state.hours.lock().unwrap();
    *hours = body;
    tracing::info!(hours = %hours.to_human_readable(), "business hours updated");
    Ok(Json(hours.clone()))
}
