use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Longest accepted service duration, in minutes (one full day).
pub const MAX_DURATION_MINUTES: i64 = 1440;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    /// None means the shop never set one; scheduling substitutes 60.
    pub duration_minutes: Option<i64>,
    /// Whole KRW.
    pub price: i64,
    pub category: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Service {
    /// Duration used for end-time computation and conflict checks. A stored
    /// value outside 1..=MAX_DURATION_MINUTES behaves like an unset one.
    pub fn effective_duration(&self) -> u32 {
        self.duration_minutes
            .filter(|d| (1..=MAX_DURATION_MINUTES).contains(d))
            .map(|d| d as u32)
            .unwrap_or(60)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewService {
    pub name: String,
    pub duration_minutes: Option<i64>,
    pub price: Option<i64>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServicePatch {
    pub name: Option<String>,
    pub duration_minutes: Option<i64>,
    pub price: Option<i64>,
    pub category: Option<String>,
}
