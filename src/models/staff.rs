use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    pub id: String,
    pub name: String,
    pub phone: String,
    /// Free-text role ("디자이너", "인턴", ...) used by the availability
    /// search's position filter.
    pub position: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStaff {
    pub name: String,
    pub phone: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaffPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
}
