use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub customer_id: String,
    pub staff_id: Option<String>,
    pub service_id: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: Option<String>,
    pub status: ReservationStatus,
    pub memo: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A reservation joined with the display names the UI and the conflict
/// messages need. This is what day/range listings return.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationDetail {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub staff_id: Option<String>,
    pub staff_name: Option<String>,
    pub service_id: String,
    pub service_name: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: Option<String>,
    pub status: ReservationStatus,
    pub memo: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "confirmed" => ReservationStatus::Confirmed,
            "completed" => ReservationStatus::Completed,
            "cancelled" => ReservationStatus::Cancelled,
            _ => ReservationStatus::Pending,
        }
    }
}

/// Proposed reservation as it arrives from the UI. Date and times stay raw
/// strings here: checking them is the validator's job.
#[derive(Debug, Clone, Deserialize)]
pub struct ReservationDraft {
    pub customer_id: String,
    pub staff_id: Option<String>,
    pub service_id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: Option<String>,
    pub status: Option<ReservationStatus>,
    pub memo: Option<String>,
}

/// Partial update; absent fields keep the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationPatch {
    pub customer_id: Option<String>,
    pub staff_id: Option<String>,
    pub service_id: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub status: Option<ReservationStatus>,
    pub memo: Option<String>,
}
