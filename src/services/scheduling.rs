use chrono::NaiveDate;
use serde::Serialize;

use crate::db::repo::{ReservationRepository, StaffRepository};
use crate::models::hours::{minutes_to_time, time_to_minutes};
use crate::models::{BusinessHours, ReservationDetail, ReservationStatus, Staff};

/// Candidate slots start every 30 minutes.
pub const SLOT_STEP_MINUTES: u32 = 30;
/// Assumed length of a reservation whose service carries no duration, and
/// of a stored row with no end time.
pub const DEFAULT_DURATION_MINUTES: u32 = 60;
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct TimeSlot {
    pub time: String,
    pub available: bool,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConflictingReservation {
    pub id: String,
    pub customer_name: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Serialize)]
pub struct ConflictReport {
    pub has_conflict: bool,
    pub conflicts: Vec<ConflictingReservation>,
}

/// Stored interval of a row in minutes-of-day. None when the start does not
/// parse; such rows never take part in overlap checks. A missing or
/// unparseable end falls back to start + 60.
fn row_interval(row: &ReservationDetail) -> Option<(u32, u32)> {
    let start = time_to_minutes(&row.start_time).ok()?;
    let end = row
        .end_time
        .as_deref()
        .and_then(|e| time_to_minutes(e).ok())
        .unwrap_or(start + DEFAULT_DURATION_MINUTES);
    Some((start, end))
}

/// Rows that participate in overlap checks, with their resolved intervals.
/// Cancelled rows and the excluded id are dropped. A concrete staff filter
/// keeps only that staff's rows; unassigned rows never match it.
fn kept_rows<'a>(
    rows: &'a [ReservationDetail],
    staff_id: Option<&str>,
    exclude_id: Option<&str>,
) -> Vec<(&'a ReservationDetail, u32, u32)> {
    rows.iter()
        .filter(|r| r.status != ReservationStatus::Cancelled)
        .filter(|r| exclude_id.map_or(true, |ex| r.id != ex))
        .filter(|r| match staff_id {
            Some(id) => r.staff_id.as_deref() == Some(id),
            None => true,
        })
        .filter_map(|r| row_interval(r).map(|(s, e)| (r, s, e)))
        .collect()
}

/// Half-open overlap: intervals that only touch at a boundary do not
/// conflict.
fn overlaps(start: u32, end: u32, row_start: u32, row_end: u32) -> bool {
    start < row_end && end > row_start
}

pub fn check_time_conflict(
    repo: &dyn ReservationRepository,
    date: NaiveDate,
    start_time: &str,
    end_time: &str,
    staff_id: Option<&str>,
    exclude_id: Option<&str>,
) -> anyhow::Result<ConflictReport> {
    let start = time_to_minutes(start_time)?;
    let end = time_to_minutes(end_time)?;
    find_conflicts(repo, date, start, end, staff_id, exclude_id)
}

/// Minutes-of-day variant; accepts ends past 23:59, which a derived end can
/// legitimately reach.
pub fn find_conflicts(
    repo: &dyn ReservationRepository,
    date: NaiveDate,
    start: u32,
    end: u32,
    staff_id: Option<&str>,
    exclude_id: Option<&str>,
) -> anyhow::Result<ConflictReport> {
    let rows = repo.reservations_on(date)?;
    let conflicts: Vec<ConflictingReservation> = kept_rows(&rows, staff_id, exclude_id)
        .into_iter()
        .filter(|(_, row_start, row_end)| overlaps(start, end, *row_start, *row_end))
        .map(|(row, row_start, row_end)| ConflictingReservation {
            id: row.id.clone(),
            customer_name: row.customer_name.clone(),
            start_time: minutes_to_time(row_start),
            end_time: minutes_to_time(row_end),
        })
        .collect();

    Ok(ConflictReport {
        has_conflict: !conflicts.is_empty(),
        conflicts,
    })
}

/// One entry per 30-minute candidate start across [open, close), ascending.
/// A candidate failing the business-hours check reads "영업시간 외"; one
/// overlapping an existing reservation reads "이미 예약됨".
pub fn available_time_slots(
    repo: &dyn ReservationRepository,
    hours: &BusinessHours,
    date: NaiveDate,
    duration_minutes: u32,
    staff_id: Option<&str>,
) -> anyhow::Result<Vec<TimeSlot>> {
    let Some((open, close)) = hours.window() else {
        return Ok(vec![]);
    };

    let rows = repo.reservations_on(date)?;
    let kept = kept_rows(&rows, staff_id, None);

    let mut slots = vec![];
    let mut t = open;
    while t < close {
        let end = t + duration_minutes;
        let slot = if !hours.covers(t, end) {
            TimeSlot {
                time: minutes_to_time(t),
                available: false,
                reason: Some("영업시간 외".to_string()),
            }
        } else if kept.iter().any(|(_, rs, re)| overlaps(t, end, *rs, *re)) {
            TimeSlot {
                time: minutes_to_time(t),
                available: false,
                reason: Some("이미 예약됨".to_string()),
            }
        } else {
            TimeSlot {
                time: minutes_to_time(t),
                available: true,
                reason: None,
            }
        };
        slots.push(slot);
        t += SLOT_STEP_MINUTES;
    }

    Ok(slots)
}

/// First `limit` open slots of the day.
pub fn suggest_time_slots(
    repo: &dyn ReservationRepository,
    hours: &BusinessHours,
    date: NaiveDate,
    duration_minutes: u32,
    staff_id: Option<&str>,
    limit: usize,
) -> anyhow::Result<Vec<TimeSlot>> {
    let mut slots = available_time_slots(repo, hours, date, duration_minutes, staff_id)?;
    slots.retain(|s| s.available);
    slots.truncate(limit);
    Ok(slots)
}

/// Staff free over the interval, optionally restricted to one position.
pub fn available_staff(
    reservations: &dyn ReservationRepository,
    staff: &dyn StaffRepository,
    date: NaiveDate,
    start_time: &str,
    end_time: &str,
    position: Option<&str>,
) -> anyhow::Result<Vec<Staff>> {
    let start = time_to_minutes(start_time)?;
    let end = time_to_minutes(end_time)?;

    let rows = reservations.reservations_on(date)?;

    let mut free = vec![];
    for member in staff.all_staff()? {
        if let Some(position) = position {
            if member.position != position {
                continue;
            }
        }
        let busy = kept_rows(&rows, Some(&member.id), None)
            .iter()
            .any(|(_, rs, re)| overlaps(start, end, *rs, *re));
        if !busy {
            free.push(member);
        }
    }
    Ok(free)
}
