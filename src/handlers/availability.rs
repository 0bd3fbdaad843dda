use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::db::repo::SqliteRepo;
use crate::errors::AppError;
use crate::handlers::{check_duration, parse_date, parse_time};
use crate::models::Staff;
use crate::services::scheduling::{
    self, TimeSlot, DEFAULT_DURATION_MINUTES, DEFAULT_SUGGESTION_LIMIT,
};
use crate::services::validation::ReservationValidator;
use crate::state::AppState;

// GET /api/availability/slots
#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: String,
    pub staff_id: Option<String>,
    pub duration: Option<u32>,
}

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Vec<TimeSlot>>, AppError> {
    let date = parse_date(&query.date)?;
    let duration = query.duration.unwrap_or(DEFAULT_DURATION_MINUTES);
    check_duration(i64::from(duration))?;
    let hours = state.hours.lock().unwrap().clone();

    let slots = {
        let db = state.db.lock().unwrap();
        let repo = SqliteRepo::new(&db);
        scheduling::available_time_slots(&repo, &hours, date, duration, query.staff_id.as_deref())?
    };
    Ok(Json(slots))
}

// GET /api/availability/suggestions
#[derive(Deserialize)]
pub struct SuggestionsQuery {
    pub date: String,
    pub staff_id: Option<String>,
    pub duration: Option<u32>,
    pub limit: Option<usize>,
}

pub async fn get_suggestions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SuggestionsQuery>,
) -> Result<Json<Vec<TimeSlot>>, AppError> {
    let date = parse_date(&query.date)?;
    let duration = query.duration.unwrap_or(DEFAULT_DURATION_MINUTES);
    check_duration(i64::from(duration))?;
    let limit = query.limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT);
    let hours = state.hours.lock().unwrap().clone();

    let slots = {
        let db = state.db.lock().unwrap();
        let repo = SqliteRepo::new(&db);
        scheduling::suggest_time_slots(
            &repo,
            &hours,
            date,
            duration,
            query.staff_id.as_deref(),
            limit,
        )?
    };
    Ok(Json(slots))
}

// GET /api/availability/staff
#[derive(Deserialize)]
pub struct StaffQuery {
    pub date: String,
    pub start: String,
    pub end: String,
    pub position: Option<String>,
}

pub async fn get_available_staff(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StaffQuery>,
) -> Result<Json<Vec<Staff>>, AppError> {
    let date = parse_date(&query.date)?;
    parse_time(&query.start)?;
    parse_time(&query.end)?;

    let staff = {
        let db = state.db.lock().unwrap();
        let repo = SqliteRepo::new(&db);
        scheduling::available_staff(
            &repo,
            &repo,
            date,
            &query.start,
            &query.end,
            query.position.as_deref(),
        )?
    };
    Ok(Json(staff))
}

// GET /api/availability/check
#[derive(Deserialize)]
pub struct CheckQuery {
    pub date: String,
    pub start: String,
    pub end: String,
    pub staff_id: Option<String>,
}

pub async fn check_availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CheckQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let date = parse_date(&query.date)?;
    parse_time(&query.start)?;
    parse_time(&query.end)?;

    let hours = state.hours.lock().unwrap().clone();
    let today = chrono::Local::now().date_naive();

    let refusal = {
        let db = state.db.lock().unwrap();
        let repo = SqliteRepo::new(&db);
        let validator = ReservationValidator {
            reservations: &repo,
            services: &repo,
            staff: &repo,
            hours,
            today,
        };
        validator.can_make_reservation(
            state.holidays.as_ref(),
            date,
            &query.start,
            &query.end,
            query.staff_id.as_deref(),
        )?
    };

    Ok(Json(match refusal {
        Some(reason) => {
            serde_json::json!({"available": false, "reason": reason.to_string()})
        }
        None => serde_json::json!({"available": true}),
    }))
}
