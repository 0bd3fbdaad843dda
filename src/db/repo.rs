use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::queries;
use crate::models::{Reservation, ReservationDetail, Service, Staff};

/// Read access to stored reservations, as the scheduling logic sees it.
pub trait ReservationRepository {
    /// Every reservation on the given day, cancelled ones included.
    fn reservations_on(&self, date: NaiveDate) -> anyhow::Result<Vec<ReservationDetail>>;

    fn reservation_by_id(&self, id: &str) -> anyhow::Result<Option<Reservation>>;
}

pub trait ServiceRepository {
    fn service_by_id(&self, id: &str) -> anyhow::Result<Option<Service>>;
}

pub trait StaffRepository {
    fn staff_by_id(&self, id: &str) -> anyhow::Result<Option<Staff>>;

    fn all_staff(&self) -> anyhow::Result<Vec<Staff>>;
}

/// Live implementation over an open SQLite connection. Built per request,
/// inside the scope that holds the connection lock.
pub struct SqliteRepo<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl ReservationRepository for SqliteRepo<'_> {
    fn reservations_on(&self, date: NaiveDate) -> anyhow::Result<Vec<ReservationDetail>> {
        queries::get_reservations_by_date(self.conn, date)
    }

    fn reservation_by_id(&self, id: &str) -> anyhow::Result<Option<Reservation>> {
        queries::get_reservation_by_id(self.conn, id)
    }
}

impl ServiceRepository for SqliteRepo<'_> {
    fn service_by_id(&self, id: &str) -> anyhow::Result<Option<Service>> {
        queries::get_service_by_id(self.conn, id)
    }
}

impl StaffRepository for SqliteRepo<'_> {
    fn staff_by_id(&self, id: &str) -> anyhow::Result<Option<Staff>> {
        queries::get_staff_by_id(self.conn, id)
    }

    fn all_staff(&self) -> anyhow::Result<Vec<Staff>> {
        queries::list_staff(self.conn, None)
    }
}
