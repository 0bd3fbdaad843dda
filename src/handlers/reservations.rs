use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::db::repo::SqliteRepo;
use crate::errors::AppError;
use crate::handlers::parse_date;
use crate::models::{
    Reservation, ReservationDetail, ReservationDraft, ReservationPatch, ReservationStatus,
};
use crate::services::calendar::generate_ics;
use crate::services::validation::{self, ReservationValidator};
use crate::state::AppState;

fn rejection(messages: Vec<String>) -> Response {
    let body = serde_json::json!({"valid": false, "errors": messages});
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}

// GET /api/reservations?date= | ?from=&to=&status=&staff_id=
#[derive(Deserialize)]
pub struct ListQuery {
    pub date: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub status: Option<String>,
    pub staff_id: Option<String>,
}

pub async fn list_reservations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ReservationDetail>>, AppError> {
    let db = state.db.lock().unwrap();

    if let Some(date) = &query.date {
        let date = parse_date(date)?;
        return Ok(Json(queries::get_reservations_by_date(&db, date)?));
    }

    let (Some(from), Some(to)) = (&query.from, &query.to) else {
        return Err(AppError::BadRequest(
            "date 또는 from/to를 지정해 주세요.".to_string(),
        ));
    };
    let from = parse_date(from)?;
    let to = parse_date(to)?;

    Ok(Json(queries::get_reservations_in_range(
        &db,
        from,
        to,
        query.status.as_deref(),
        query.staff_id.as_deref(),
    )?))
}

// POST /api/reservations
pub async fn create_reservation(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<ReservationDraft>,
) -> Result<Response, AppError> {
    let hours = state.hours.lock().unwrap().clone();
    let today = chrono::Local::now().date_naive();

    let db = state.db.lock().unwrap();

    // 1. The customer must exist; an FK violation says less than a 404.
    if queries::get_customer_by_id(&db, &draft.customer_id)?.is_none() {
        return Err(AppError::NotFound(format!(
            "customer {}",
            draft.customer_id
        )));
    }

    // 2. Run the validator over the draft.
    let report = {
        let repo = SqliteRepo::new(&db);
        let validator = ReservationValidator {
            reservations: &repo,
            services: &repo,
            staff: &repo,
            hours,
            today,
        };
        validator.validate(&draft)?
    };
    if !report.is_valid() {
        tracing::info!(count = report.issues.len(), "reservation draft rejected");
        return Ok(rejection(report.messages()));
    }

    // 3. Store with the end time resolved, so the row never relies on the
    //    checker's fallback.
    let service = queries::get_service_by_id(&db, &draft.service_id)?
        .ok_or_else(|| AppError::NotFound(format!("service {}", draft.service_id)))?;
    let end_time = validation::resolved_end(&draft.start_time, draft.end_time.as_deref(), &service);

    let now = chrono::Utc::now().naive_utc();
    let reservation = Reservation {
        id: uuid::Uuid::new_v4().to_string(),
        customer_id: draft.customer_id.clone(),
        staff_id: draft.staff_id.clone(),
        service_id: draft.service_id.clone(),
        date: parse_date(&draft.date)?,
        start_time: draft.start_time.clone(),
        end_time,
        status: draft.status.clone().unwrap_or(ReservationStatus::Pending),
        memo: draft.memo.clone(),
        created_at: now,
        updated_at: now,
    };
    queries::create_reservation(&db, &reservation)?;
    tracing::info!(
        reservation_id = %reservation.id,
        date = %reservation.date,
        start = %reservation.start_time,
        "reservation created"
    );

    let detail = queries::get_reservation_detail(&db, &reservation.id)?
        .ok_or_else(|| AppError::NotFound(format!("reservation {}", reservation.id)))?;
    Ok((StatusCode::CREATED, Json(detail)).into_response())
}

// GET /api/reservations/:id
pub async fn get_reservation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ReservationDetail>, AppError> {
    let detail = {
        let db = state.db.lock().unwrap();
        queries::get_reservation_detail(&db, &id)?
    };
    detail
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("reservation {id}")))
}

// PUT /api/reservations/:id
pub async fn update_reservation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<ReservationPatch>,
) -> Result<Response, AppError> {
    let hours = state.hours.lock().unwrap().clone();
    let today = chrono::Local::now().date_naive();

    let db = state.db.lock().unwrap();

    let (report, merged) = {
        let repo = SqliteRepo::new(&db);
        let validator = ReservationValidator {
            reservations: &repo,
            services: &repo,
            staff: &repo,
            hours,
            today,
        };
        validator.validate_update(&id, &patch)?
    };
    if !report.is_valid() {
        tracing::info!(reservation_id = %id, "reservation update rejected");
        return Ok(rejection(report.messages()));
    }

    queries::update_reservation(&db, &merged)?;
    tracing::info!(reservation_id = %id, "reservation updated");

    let detail = queries::get_reservation_detail(&db, &id)?
        .ok_or_else(|| AppError::NotFound(format!("reservation {id}")))?;
    Ok(Json(detail).into_response())
}

// POST /api/reservations/:id/status
#[derive(Deserialize)]
pub struct StatusBody {
    pub status: String,
}

pub async fn set_reservation_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    // Strict at the boundary; only reads are lenient about unknown text.
    let status = match body.status.as_str() {
        "pending" | "confirmed" | "completed" | "cancelled" => {
            ReservationStatus::parse(&body.status)
        }
        _ => {
            return Err(AppError::BadRequest(
                "올바르지 않은 예약 상태입니다.".to_string(),
            ))
        }
    };

    let updated = {
        let db = state.db.lock().unwrap();
        queries::update_reservation_status(&db, &id, &status)?
    };

    if updated {
        tracing::info!(reservation_id = %id, status = status.as_str(), "reservation status changed");
        Ok(Json(
            serde_json::json!({"ok": true, "status": status.as_str()}),
        ))
    } else {
        Err(AppError::NotFound(format!("reservation {id}")))
    }
}

// DELETE /api/reservations/:id
pub async fn delete_reservation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = {
        let db = state.db.lock().unwrap();
        queries::delete_reservation(&db, &id)?
    };

    if deleted {
        tracing::info!(reservation_id = %id, "reservation deleted");
        Ok(Json(serde_json::json!({"ok": true})))
    } else {
        Err(AppError::NotFound(format!("reservation {id}")))
    }
}

// GET /api/reservations/:id/ics
pub async fn download_ics(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    // Strip .ics suffix if present
    let id = raw_id.strip_suffix(".ics").unwrap_or(&raw_id);

    let detail = {
        let db = state.db.lock().unwrap();
        queries::get_reservation_detail(&db, id)?
    }
    .ok_or_else(|| AppError::NotFound(format!("reservation {id}")))?;

    let ics = generate_ics(&detail)?;
    let filename = format!("reservation-{id}.ics");

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/calendar; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        ics,
    )
        .into_response())
}
