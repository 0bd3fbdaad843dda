use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::models::BusinessHours;
use crate::services::holiday::HolidayCalendar;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    /// Live opening hours. Not persisted: every process start goes back to
    /// the default, and only the settings endpoint mutates it.
    pub hours: Mutex<BusinessHours>,
    pub holidays: Box<dyn HolidayCalendar>,
}
