use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::check_duration;
use crate::models::{NewService, Service, ServicePatch};
use crate::state::AppState;

// GET /api/services
pub async fn list_services(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Service>>, AppError> {
    let services = {
        let db = state.db.lock().unwrap();
        queries::list_services(&db)?
    };
    Ok(Json(services))
}

// POST /api/services
pub async fn create_service(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewService>,
) -> Result<(StatusCode, Json<Service>), AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::BadRequest("시술명을 입력해 주세요.".to_string()));
    }
    if let Some(duration) = body.duration_minutes {
        check_duration(duration)?;
    }

    let service = Service {
        id: uuid::Uuid::new_v4().to_string(),
        name: body.name.trim().to_string(),
        duration_minutes: body.duration_minutes,
        price: body.price.unwrap_or(0),
        category: body.category,
        created_at: chrono::Utc::now().naive_utc(),
    };

    {
        let db = state.db.lock().unwrap();
        queries::create_service(&db, &service)?;
    }

    tracing::info!(service_id = %service.id, "service created");
    Ok((StatusCode::CREATED, Json(service)))
}

// PUT /api/services/:id
pub async fn update_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<ServicePatch>,
) -> Result<Json<Service>, AppError> {
    let db = state.db.lock().unwrap();

    let mut service = queries::get_service_by_id(&db, &id)?
        .ok_or_else(|| AppError::NotFound(format!("service {id}")))?;

    if let Some(name) = patch.name {
        service.name = name;
    }
    if let Some(duration) = patch.duration_minutes {
        check_duration(duration)?;
        service.duration_minutes = Some(duration);
    }
    if let Some(price) = patch.price {
        service.price = price;
    }
    if let Some(category) = patch.category {
        service.category = Some(category);
    }

    queries::update_service(&db, &service)?;
    Ok(Json(service))
}

// DELETE /api/services/:id
pub async fn delete_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let db = state.db.lock().unwrap();

    let in_use = queries::count_reservations_for_service(&db, &id)?;
    if in_use > 0 {
        return Err(AppError::BadRequest(
            "예약 내역이 있는 시술은 삭제할 수 없습니다.".to_string(),
        ));
    }

    if queries::delete_service(&db, &id)? {
        tracing::info!(service_id = %id, "service deleted");
        Ok(Json(serde_json::json!({"ok": true})))
    } else {
        Err(AppError::NotFound(format!("service {id}")))
    }
}
