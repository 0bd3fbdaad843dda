use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::db::queries::{self, DailyReport, DashboardStats, MonthlyReport};
use crate::errors::AppError;
use crate::handlers::parse_date;
use crate::state::AppState;

// GET /api/reports/dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardStats>, AppError> {
    let today = chrono::Local::now().date_naive();
    let stats = {
        let db = state.db.lock().unwrap();
        queries::get_dashboard_stats(&db, today)?
    };
    Ok(Json(stats))
}

// GET /api/reports/daily?date=YYYY-MM-DD
#[derive(Deserialize)]
pub struct DailyQuery {
    pub date: String,
}

pub async fn daily(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DailyQuery>,
) -> Result<Json<DailyReport>, AppError> {
    let date = parse_date(&query.date)?;
    let report = {
        let db = state.db.lock().unwrap();
        queries::get_daily_report(&db, date)?
    };
    Ok(Json(report))
}

// GET /api/reports/monthly?month=YYYY-MM
#[derive(Deserialize)]
pub struct MonthlyQuery {
    pub month: String,
}

pub async fn monthly(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MonthlyQuery>,
) -> Result<Json<MonthlyReport>, AppError> {
    // The queries filter with a LIKE prefix, so the shape must be checked
    // here.
    let first_day = format!("{}-01", query.month);
    if NaiveDate::parse_from_str(&first_day, "%Y-%m-%d").is_err() {
        return Err(AppError::BadRequest(
            "올바르지 않은 월입니다. (YYYY-MM)".to_string(),
        ));
    }

    let report = {
        let db = state.db.lock().unwrap();
        queries::get_monthly_report(&db, &query.month)?
    };
    Ok(Json(report))
}
