pub mod availability;
pub mod customers;
pub mod health;
pub mod reports;
pub mod reservations;
pub mod services;
pub mod settings;
pub mod staff;

use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::hours::time_to_minutes;
use crate::models::service::MAX_DURATION_MINUTES;

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("올바르지 않은 날짜입니다.".to_string()))
}

pub(crate) fn parse_time(s: &str) -> Result<(), AppError> {
    time_to_minutes(s)
        .map(|_| ())
        .map_err(|_| AppError::BadRequest("올바르지 않은 시간 형식입니다.".to_string()))
}

pub(crate) fn check_duration(minutes: i64) -> Result<(), AppError> {
    if (1..=MAX_DURATION_MINUTES).contains(&minutes) {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "시술 시간은 1분에서 1440분 사이로 입력해 주세요.".to_string(),
        ))
    }
}
