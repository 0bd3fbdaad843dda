use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;

use crate::models::{
    Customer, Reservation, ReservationDetail, ReservationStatus, Service, Staff,
};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

fn now_string() -> String {
    Utc::now().naive_utc().format(DATETIME_FORMAT).to_string()
}

fn parse_datetime(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).unwrap_or_else(|_| Utc::now().naive_utc())
}

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap_or_else(|_| Utc::now().date_naive())
}

// ── Customers ──

pub fn create_customer(conn: &Connection, customer: &Customer) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO customers (id, name, phone, memo, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            customer.id,
            customer.name,
            customer.phone,
            customer.memo,
            customer.created_at.format(DATETIME_FORMAT).to_string(),
            customer.updated_at.format(DATETIME_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_customer_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Customer>> {
    let result = conn.query_row(
        "SELECT id, name, phone, memo, created_at, updated_at FROM customers WHERE id = ?1",
        params![id],
        |row| Ok(parse_customer_row(row)),
    );

    match result {
        Ok(customer) => Ok(Some(customer?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_customers(
    conn: &Connection,
    search: Option<&str>,
    limit: i64,
) -> anyhow::Result<Vec<Customer>> {
    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match search {
        Some(q) => (
            "SELECT id, name, phone, memo, created_at, updated_at FROM customers
             WHERE name LIKE ?1 OR phone LIKE ?1 ORDER BY name ASC LIMIT ?2"
                .to_string(),
            vec![
                Box::new(format!("%{q}%")) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit),
            ],
        ),
        None => (
            "SELECT id, name, phone, memo, created_at, updated_at FROM customers
             ORDER BY name ASC LIMIT ?1"
                .to_string(),
            vec![Box::new(limit) as Box<dyn rusqlite::types::ToSql>],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_customer_row(row)))?;

    let mut customers = vec![];
    for row in rows {
        customers.push(row??);
    }
    Ok(customers)
}

pub fn update_customer(conn: &Connection, customer: &Customer) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE customers SET name = ?1, phone = ?2, memo = ?3, updated_at = ?4 WHERE id = ?5",
        params![
            customer.name,
            customer.phone,
            customer.memo,
            now_string(),
            customer.id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_customer(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM customers WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn parse_customer_row(row: &rusqlite::Row) -> anyhow::Result<Customer> {
    let created_at_str: String = row.get(4)?;
    let updated_at_str: String = row.get(5)?;

    Ok(Customer {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        memo: row.get(3)?,
        created_at: parse_datetime(&created_at_str),
        updated_at: parse_datetime(&updated_at_str),
    })
}

// ── Staff ──

pub fn create_staff(conn: &Connection, staff: &Staff) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO staff (id, name, phone, position, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            staff.id,
            staff.name,
            staff.phone,
            staff.position,
            staff.created_at.format(DATETIME_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_staff_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Staff>> {
    let result = conn.query_row(
        "SELECT id, name, phone, position, created_at FROM staff WHERE id = ?1",
        params![id],
        |row| Ok(parse_staff_row(row)),
    );

    match result {
        Ok(staff) => Ok(Some(staff?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_staff(conn: &Connection, position: Option<&str>) -> anyhow::Result<Vec<Staff>> {
    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match position {
        Some(p) => (
            "SELECT id, name, phone, position, created_at FROM staff
             WHERE position = ?1 ORDER BY name ASC"
                .to_string(),
            vec![Box::new(p.to_string()) as Box<dyn rusqlite::types::ToSql>],
        ),
        None => (
            "SELECT id, name, phone, position, created_at FROM staff ORDER BY name ASC"
                .to_string(),
            vec![],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_staff_row(row)))?;

    let mut staff = vec![];
    for row in rows {
        staff.push(row??);
    }
    Ok(staff)
}

pub fn update_staff(conn: &Connection, staff: &Staff) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE staff SET name = ?1, phone = ?2, position = ?3 WHERE id = ?4",
        params![staff.name, staff.phone, staff.position, staff.id],
    )?;
    Ok(count > 0)
}

pub fn delete_staff(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM staff WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn parse_staff_row(row: &rusqlite::Row) -> anyhow::Result<Staff> {
    let created_at_str: String = row.get(4)?;

    Ok(Staff {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        position: row.get(3)?,
        created_at: parse_datetime(&created_at_str),
    })
}

// ── Services ──

pub fn create_service(conn: &Connection, service: &Service) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO services (id, name, duration_minutes, price, category, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            service.id,
            service.name,
            service.duration_minutes,
            service.price,
            service.category,
            service.created_at.format(DATETIME_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_service_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Service>> {
    let result = conn.query_row(
        "SELECT id, name, duration_minutes, price, category, created_at FROM services WHERE id = ?1",
        params![id],
        |row| Ok(parse_service_row(row)),
    );

    match result {
        Ok(service) => Ok(Some(service?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_services(conn: &Connection) -> anyhow::Result<Vec<Service>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, duration_minutes, price, category, created_at FROM services
         ORDER BY name ASC",
    )?;
    let rows = stmt.query_map([], |row| Ok(parse_service_row(row)))?;

    let mut services = vec![];
    for row in rows {
        services.push(row??);
    }
    Ok(services)
}

pub fn update_service(conn: &Connection, service: &Service) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE services SET name = ?1, duration_minutes = ?2, price = ?3, category = ?4
         WHERE id = ?5",
        params![
            service.name,
            service.duration_minutes,
            service.price,
            service.category,
            service.id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_service(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM services WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

pub fn count_reservations_for_service(conn: &Connection, service_id: &str) -> anyhow::Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM reservations WHERE service_id = ?1",
        params![service_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn parse_service_row(row: &rusqlite::Row) -> anyhow::Result<Service> {
    let created_at_str: String = row.get(5)?;

    Ok(Service {
        id: row.get(0)?,
        name: row.get(1)?,
        duration_minutes: row.get(2)?,
        price: row.get(3)?,
        category: row.get(4)?,
        created_at: parse_datetime(&created_at_str),
    })
}

// ── Reservations ──

const RESERVATION_COLUMNS: &str =
    "id, customer_id, staff_id, service_id, date, start_time, end_time, status, memo, created_at, updated_at";

const RESERVATION_DETAIL_SELECT: &str = "SELECT r.id, r.customer_id, c.name, r.staff_id, st.name, r.service_id, sv.name,
            r.date, r.start_time, r.end_time, r.status, r.memo, r.created_at, r.updated_at
     FROM reservations r
     JOIN customers c ON c.id = r.customer_id
     JOIN services sv ON sv.id = r.service_id
     LEFT JOIN staff st ON st.id = r.staff_id";

pub fn create_reservation(conn: &Connection, reservation: &Reservation) -> anyhow::Result<()> {
    conn.execute(
        &format!("INSERT INTO reservations ({RESERVATION_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"),
        params![
            reservation.id,
            reservation.customer_id,
            reservation.staff_id,
            reservation.service_id,
            reservation.date.format(DATE_FORMAT).to_string(),
            reservation.start_time,
            reservation.end_time,
            reservation.status.as_str(),
            reservation.memo,
            reservation.created_at.format(DATETIME_FORMAT).to_string(),
            reservation.updated_at.format(DATETIME_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_reservation_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Reservation>> {
    let result = conn.query_row(
        &format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = ?1"),
        params![id],
        |row| Ok(parse_reservation_row(row)),
    );

    match result {
        Ok(reservation) => Ok(Some(reservation?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_reservation_detail(
    conn: &Connection,
    id: &str,
) -> anyhow::Result<Option<ReservationDetail>> {
    let result = conn.query_row(
        &format!("{RESERVATION_DETAIL_SELECT} WHERE r.id = ?1"),
        params![id],
        |row| Ok(parse_reservation_detail_row(row)),
    );

    match result {
        Ok(detail) => Ok(Some(detail?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Every reservation on the given day, cancelled ones included: the
/// conflict checker decides for itself which rows participate.
pub fn get_reservations_by_date(
    conn: &Connection,
    date: NaiveDate,
) -> anyhow::Result<Vec<ReservationDetail>> {
    let date_str = date.format(DATE_FORMAT).to_string();

    let mut stmt = conn.prepare(&format!(
        "{RESERVATION_DETAIL_SELECT} WHERE r.date = ?1 ORDER BY r.start_time ASC, r.created_at ASC"
    ))?;
    let rows = stmt.query_map(params![date_str], |row| {
        Ok(parse_reservation_detail_row(row))
    })?;

    let mut reservations = vec![];
    for row in rows {
        reservations.push(row??);
    }
    Ok(reservations)
}

pub fn get_reservations_in_range(
    conn: &Connection,
    from: NaiveDate,
    to: NaiveDate,
    status: Option<&str>,
    staff_id: Option<&str>,
) -> anyhow::Result<Vec<ReservationDetail>> {
    let mut sql = format!("{RESERVATION_DETAIL_SELECT} WHERE r.date >= ?1 AND r.date <= ?2");
    let mut params_vec: Vec<Box<dyn rusqlite::types::ToSql>> = vec![
        Box::new(from.format(DATE_FORMAT).to_string()),
        Box::new(to.format(DATE_FORMAT).to_string()),
    ];

    if let Some(status) = status {
        params_vec.push(Box::new(status.to_string()));
        sql.push_str(&format!(" AND r.status = ?{}", params_vec.len()));
    }
    if let Some(staff_id) = staff_id {
        params_vec.push(Box::new(staff_id.to_string()));
        sql.push_str(&format!(" AND r.staff_id = ?{}", params_vec.len()));
    }
    sql.push_str(" ORDER BY r.date ASC, r.start_time ASC");

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| {
        Ok(parse_reservation_detail_row(row))
    })?;

    let mut reservations = vec![];
    for row in rows {
        reservations.push(row??);
    }
    Ok(reservations)
}

pub fn get_reservations_for_customer(
    conn: &Connection,
    customer_id: &str,
    limit: i64,
) -> anyhow::Result<Vec<ReservationDetail>> {
    let mut stmt = conn.prepare(&format!(
        "{RESERVATION_DETAIL_SELECT} WHERE r.customer_id = ?1
         ORDER BY r.date DESC, r.start_time DESC LIMIT ?2"
    ))?;
    let rows = stmt.query_map(params![customer_id, limit], |row| {
        Ok(parse_reservation_detail_row(row))
    })?;

    let mut reservations = vec![];
    for row in rows {
        reservations.push(row??);
    }
    Ok(reservations)
}

pub fn update_reservation(conn: &Connection, reservation: &Reservation) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE reservations SET customer_id = ?1, staff_id = ?2, service_id = ?3, date = ?4,
                start_time = ?5, end_time = ?6, status = ?7, memo = ?8, updated_at = ?9
         WHERE id = ?10",
        params![
            reservation.customer_id,
            reservation.staff_id,
            reservation.service_id,
            reservation.date.format(DATE_FORMAT).to_string(),
            reservation.start_time,
            reservation.end_time,
            reservation.status.as_str(),
            reservation.memo,
            now_string(),
            reservation.id,
        ],
    )?;
    Ok(count > 0)
}

pub fn update_reservation_status(
    conn: &Connection,
    id: &str,
    status: &ReservationStatus,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE reservations SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now_string(), id],
    )?;
    Ok(count > 0)
}

pub fn delete_reservation(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM reservations WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn parse_reservation_row(row: &rusqlite::Row) -> anyhow::Result<Reservation> {
    let date_str: String = row.get(4)?;
    let status_str: String = row.get(7)?;
    let created_at_str: String = row.get(9)?;
    let updated_at_str: String = row.get(10)?;

    Ok(Reservation {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        staff_id: row.get(2)?,
        service_id: row.get(3)?,
        date: parse_date(&date_str),
        start_time: row.get(5)?,
        end_time: row.get(6)?,
        status: ReservationStatus::parse(&status_str),
        memo: row.get(8)?,
        created_at: parse_datetime(&created_at_str),
        updated_at: parse_datetime(&updated_at_str),
    })
}

fn parse_reservation_detail_row(row: &rusqlite::Row) -> anyhow::Result<ReservationDetail> {
    let date_str: String = row.get(7)?;
    let status_str: String = row.get(10)?;
    let created_at_str: String = row.get(12)?;
    let updated_at_str: String = row.get(13)?;

    Ok(ReservationDetail {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        customer_name: row.get(2)?,
        staff_id: row.get(3)?,
        staff_name: row.get(4)?,
        service_id: row.get(5)?,
        service_name: row.get(6)?,
        date: parse_date(&date_str),
        start_time: row.get(8)?,
        end_time: row.get(9)?,
        status: ReservationStatus::parse(&status_str),
        memo: row.get(11)?,
        created_at: parse_datetime(&created_at_str),
        updated_at: parse_datetime(&updated_at_str),
    })
}

// ── Reports ──

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub today_total: i64,
    pub today_pending: i64,
    pub today_confirmed: i64,
    pub today_completed: i64,
    pub today_cancelled: i64,
    pub customer_count: i64,
    pub staff_count: i64,
    pub month_revenue: i64,
}

pub fn get_dashboard_stats(conn: &Connection, today: NaiveDate) -> anyhow::Result<DashboardStats> {
    let daily = get_daily_report(conn, today)?;

    let customer_count: i64 =
        conn.query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))?;
    let staff_count: i64 = conn.query_row("SELECT COUNT(*) FROM staff", [], |row| row.get(0))?;

    let month_prefix = today.format("%Y-%m").to_string();
    let month_revenue: i64 = conn.query_row(
        "SELECT COALESCE(SUM(sv.price), 0) FROM reservations r
         JOIN services sv ON sv.id = r.service_id
         WHERE r.date LIKE ?1 || '%' AND r.status = 'completed'",
        params![month_prefix],
        |row| row.get(0),
    )?;

    Ok(DashboardStats {
        today_total: daily.total,
        today_pending: daily.pending,
        today_confirmed: daily.confirmed,
        today_completed: daily.completed,
        today_cancelled: daily.cancelled,
        customer_count,
        staff_count,
        month_revenue,
    })
}

#[derive(Debug, Serialize)]
pub struct DailyReport {
    pub date: String,
    pub total: i64,
    pub pending: i64,
    pub confirmed: i64,
    pub completed: i64,
    pub cancelled: i64,
    /// Sum of service prices for completed reservations.
    pub completed_revenue: i64,
    /// Sum of service prices for all non-cancelled reservations.
    pub expected_revenue: i64,
}

pub fn get_daily_report(conn: &Connection, date: NaiveDate) -> anyhow::Result<DailyReport> {
    let date_str = date.format(DATE_FORMAT).to_string();

    let mut report = DailyReport {
        date: date_str.clone(),
        total: 0,
        pending: 0,
        confirmed: 0,
        completed: 0,
        cancelled: 0,
        completed_revenue: 0,
        expected_revenue: 0,
    };

    let mut stmt =
        conn.prepare("SELECT status, COUNT(*) FROM reservations WHERE date = ?1 GROUP BY status")?;
    let rows = stmt.query_map(params![date_str], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;
    for row in rows {
        let (status, count) = row?;
        report.total += count;
        match status.as_str() {
            "pending" => report.pending += count,
            "confirmed" => report.confirmed += count,
            "completed" => report.completed += count,
            "cancelled" => report.cancelled += count,
            _ => report.pending += count,
        }
    }

    report.completed_revenue = conn.query_row(
        "SELECT COALESCE(SUM(sv.price), 0) FROM reservations r
         JOIN services sv ON sv.id = r.service_id
         WHERE r.date = ?1 AND r.status = 'completed'",
        params![date_str],
        |row| row.get(0),
    )?;
    report.expected_revenue = conn.query_row(
        "SELECT COALESCE(SUM(sv.price), 0) FROM reservations r
         JOIN services sv ON sv.id = r.service_id
         WHERE r.date = ?1 AND r.status != 'cancelled'",
        params![date_str],
        |row| row.get(0),
    )?;

    Ok(report)
}

#[derive(Debug, Serialize)]
pub struct DailyRevenue {
    pub date: String,
    pub count: i64,
    pub revenue: i64,
}

#[derive(Debug, Serialize)]
pub struct ServiceTally {
    pub service_name: String,
    pub count: i64,
    pub revenue: i64,
}

#[derive(Debug, Serialize)]
pub struct MonthlyReport {
    pub month: String,
    pub reservation_count: i64,
    pub completed_count: i64,
    pub cancelled_count: i64,
    pub revenue: i64,
    pub daily: Vec<DailyRevenue>,
    pub top_services: Vec<ServiceTally>,
}

/// `month` is "YYYY-MM"; callers validate the shape.
pub fn get_monthly_report(conn: &Connection, month: &str) -> anyhow::Result<MonthlyReport> {
    let prefix = format!("{month}-%");

    let (reservation_count, completed_count, cancelled_count): (i64, i64, i64) = conn.query_row(
        "SELECT COUNT(*),
                COALESCE(SUM(CASE WHEN status = 'completed' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN status = 'cancelled' THEN 1 ELSE 0 END), 0)
         FROM reservations WHERE date LIKE ?1",
        params![prefix],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;

    let revenue: i64 = conn.query_row(
        "SELECT COALESCE(SUM(sv.price), 0) FROM reservations r
         JOIN services sv ON sv.id = r.service_id
         WHERE r.date LIKE ?1 AND r.status = 'completed'",
        params![prefix],
        |row| row.get(0),
    )?;

    let mut stmt = conn.prepare(
        "SELECT r.date, COUNT(*),
                COALESCE(SUM(CASE WHEN r.status = 'completed' THEN sv.price ELSE 0 END), 0)
         FROM reservations r
         JOIN services sv ON sv.id = r.service_id
         WHERE r.date LIKE ?1
         GROUP BY r.date ORDER BY r.date ASC",
    )?;
    let rows = stmt.query_map(params![prefix], |row| {
        Ok(DailyRevenue {
            date: row.get(0)?,
            count: row.get(1)?,
            revenue: row.get(2)?,
        })
    })?;
    let mut daily = vec![];
    for row in rows {
        daily.push(row?);
    }

    let mut stmt = conn.prepare(
        "SELECT sv.name, COUNT(*), COALESCE(SUM(sv.price), 0)
         FROM reservations r
         JOIN services sv ON sv.id = r.service_id
         WHERE r.date LIKE ?1 AND r.status != 'cancelled'
         GROUP BY sv.id, sv.name
         ORDER BY COUNT(*) DESC, sv.name ASC LIMIT 5",
    )?;
    let rows = stmt.query_map(params![prefix], |row| {
        Ok(ServiceTally {
            service_name: row.get(0)?,
            count: row.get(1)?,
            revenue: row.get(2)?,
        })
    })?;
    let mut top_services = vec![];
    for row in rows {
        top_services.push(row?);
    }

    Ok(MonthlyReport {
        month: month.to_string(),
        reservation_count,
        completed_count,
        cancelled_count,
        revenue,
        daily,
        top_services,
    })
}
