use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{NewStaff, Staff, StaffPatch};
use crate::state::AppState;

// GET /api/staff
#[derive(Deserialize)]
pub struct ListQuery {
    pub position: Option<String>,
}

pub async fn list_staff(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Staff>>, AppError> {
    let staff = {
        let db = state.db.lock().unwrap();
        queries::list_staff(&db, query.position.as_deref())?
    };
    Ok(Json(staff))
}

// POST /api/staff
pub async fn create_staff(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewStaff>,
) -> Result<(StatusCode, Json<Staff>), AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::BadRequest("이름을 입력해 주세요.".to_string()));
    }

    let member = Staff {
        id: uuid::Uuid::new_v4().to_string(),
        name: body.name.trim().to_string(),
        phone: body.phone.unwrap_or_default(),
        position: body.position.unwrap_or_default(),
        created_at: chrono::Utc::now().naive_utc(),
    };

    {
        let db = state.db.lock().unwrap();
        queries::create_staff(&db, &member)?;
    }

    tracing::info!(staff_id = %member.id, "staff created");
    Ok((StatusCode::CREATED, Json(member)))
}

// PUT /api/staff/:id
pub async fn update_staff(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<StaffPatch>,
) -> Result<Json<Staff>, AppError> {
    let db = state.db.lock().unwrap();

    let mut member = queries::get_staff_by_id(&db, &id)?
        .ok_or_else(|| AppError::NotFound(format!("staff {id}")))?;

    if let Some(name) = patch.name {
        member.name = name;
    }
    if let Some(phone) = patch.phone {
        member.phone = phone;
    }
    if let Some(position) = patch.position {
        member.position = position;
    }

    queries::update_staff(&db, &member)?;
    Ok(Json(member))
}

// DELETE /api/staff/:id
pub async fn delete_staff(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    // Reservations keep their row; the FK nulls out the assignment.
    let deleted = {
        let db = state.db.lock().unwrap();
        queries::delete_staff(&db, &id)?
    };

    if deleted {
        tracing::info!(staff_id = %id, "staff deleted");
        Ok(Json(serde_json::json!({"ok": true})))
    } else {
        Err(AppError::NotFound(format!("staff {id}")))
    }
}
