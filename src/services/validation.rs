use chrono::NaiveDate;
use thiserror::Error;

use crate::db::repo::{ReservationRepository, ServiceRepository, StaffRepository};
use crate::models::hours::{minutes_to_time, time_to_minutes};
use crate::models::{BusinessHours, Reservation, ReservationDraft, ReservationPatch, Service};
use crate::services::holiday::HolidayCalendar;
use crate::services::scheduling::{self, ConflictingReservation};

/// Failure to evaluate a draft at all, as opposed to a draft that evaluated
/// to issues.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("service not found: {0}")]
    ServiceNotFound(String),
    #[error("reservation not found: {0}")]
    ReservationNotFound(String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// One finding against a draft. Rendered text is what the UI shows, so the
/// messages are Korean like the rest of the product.
#[derive(Debug, Clone)]
pub enum ValidationIssue {
    InvalidTime,
    OutsideBusinessHours { hours: String },
    InvalidDate,
    PastDate,
    Conflict { conflicts: Vec<ConflictingReservation> },
    UnknownStaff,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationIssue::InvalidTime => {
                write!(f, "올바르지 않은 시간 형식입니다.")
            }
            ValidationIssue::OutsideBusinessHours { hours } => {
                write!(f, "영업시간({hours}) 외의 시간입니다.")
            }
            ValidationIssue::InvalidDate => {
                write!(f, "올바르지 않은 날짜입니다.")
            }
            ValidationIssue::PastDate => {
                write!(f, "지난 날짜에는 예약할 수 없습니다.")
            }
            ValidationIssue::Conflict { conflicts } => {
                let listed: Vec<String> = conflicts
                    .iter()
                    .map(|c| format!("{}~{} ({})", c.start_time, c.end_time, c.customer_name))
                    .collect();
                write!(f, "해당 시간에 이미 예약이 있습니다: {}", listed.join(", "))
            }
            ValidationIssue::UnknownStaff => {
                write!(f, "담당 직원을 찾을 수 없습니다.")
            }
        }
    }
}

/// Everything found wrong with a draft. Empty means the draft may be stored.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(|i| i.to_string()).collect()
    }
}

/// First reason the coarse probe turns a time down.
#[derive(Debug)]
pub enum Refusal {
    Holiday,
    OutsideHours { hours: String },
    Booked,
}

impl std::fmt::Display for Refusal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Refusal::Holiday => write!(f, "휴무일입니다."),
            Refusal::OutsideHours { hours } => {
                write!(f, "영업시간({hours}) 외의 시간입니다.")
            }
            Refusal::Booked => write!(f, "이미 예약된 시간입니다."),
        }
    }
}

/// End time a stored row gets: the explicit value when present, otherwise
/// start plus the service duration.
pub fn resolved_end(
    start_time: &str,
    explicit_end: Option<&str>,
    service: &Service,
) -> Option<String> {
    match explicit_end {
        Some(end) => Some(end.to_string()),
        None => time_to_minutes(start_time)
            .ok()
            .map(|start| minutes_to_time(start + service.effective_duration())),
    }
}

/// Checks drafts against the current store. Collaborators and the clock are
/// injected; the validator itself holds no connection and no globals.
pub struct ReservationValidator<'a> {
    pub reservations: &'a dyn ReservationRepository,
    pub services: &'a dyn ServiceRepository,
    pub staff: &'a dyn StaffRepository,
    pub hours: BusinessHours,
    pub today: NaiveDate,
}

impl ReservationValidator<'_> {
    /// Evaluates a new-reservation draft. A missing service is a
    /// precondition failure, not an issue: there is nothing to evaluate the
    /// draft against. Everything else accumulates so the UI can show the
    /// whole list at once.
    pub fn validate(
        &self,
        draft: &ReservationDraft,
    ) -> Result<ValidationReport, ValidationError> {
        // 1. Precondition: the service must exist.
        let service = self
            .services
            .service_by_id(&draft.service_id)?
            .ok_or_else(|| ValidationError::ServiceNotFound(draft.service_id.clone()))?;

        let mut issues = vec![];

        // 2. Resolve the interval. The derived end is plain arithmetic and
        //    may pass 23:59; the hours check rejects that on its own terms.
        let interval = match time_to_minutes(&draft.start_time) {
            Ok(start) => match draft.end_time.as_deref() {
                Some(explicit) => match time_to_minutes(explicit) {
                    Ok(end) if end > start => Some((start, end)),
                    _ => None,
                },
                None => Some((start, start + service.effective_duration())),
            },
            Err(_) => None,
        };

        // 3. Business hours, or the time issue that preempts them.
        match interval {
            Some((start, end)) => {
                if !self.hours.covers(start, end) {
                    issues.push(ValidationIssue::OutsideBusinessHours {
                        hours: self.hours.to_human_readable(),
                    });
                }
            }
            None => issues.push(ValidationIssue::InvalidTime),
        }

        // 4. The date must parse and may not lie in the past.
        let date = match NaiveDate::parse_from_str(&draft.date, "%Y-%m-%d") {
            Ok(date) => {
                if date < self.today {
                    issues.push(ValidationIssue::PastDate);
                }
                Some(date)
            }
            Err(_) => {
                issues.push(ValidationIssue::InvalidDate);
                None
            }
        };

        // 5. Conflicts, scoped to the draft's staff when named.
        if let (Some(date), Some((start, end))) = (date, interval) {
            let report = scheduling::find_conflicts(
                self.reservations,
                date,
                start,
                end,
                draft.staff_id.as_deref(),
                None,
            )?;
            if report.has_conflict {
                issues.push(ValidationIssue::Conflict {
                    conflicts: report.conflicts,
                });
            }
        }

        // 6. A named staff member must exist.
        if let Some(staff_id) = &draft.staff_id {
            if self.staff.staff_by_id(staff_id)?.is_none() {
                issues.push(ValidationIssue::UnknownStaff);
            }
        }

        Ok(ValidationReport { issues })
    }

    /// Evaluates a patch against the stored row it targets. Only the
    /// business-hours and conflict checks re-run, against the merged state
    /// and with the row's own id excluded. Returns the merged row so the
    /// caller stores exactly what was checked.
    pub fn validate_update(
        &self,
        id: &str,
        patch: &ReservationPatch,
    ) -> Result<(ValidationReport, Reservation), ValidationError> {
        // 1. Preconditions: the row and its (possibly patched) service.
        let stored = self
            .reservations
            .reservation_by_id(id)?
            .ok_or_else(|| ValidationError::ReservationNotFound(id.to_string()))?;

        let service_id = patch
            .service_id
            .clone()
            .unwrap_or_else(|| stored.service_id.clone());
        let service = self
            .services
            .service_by_id(&service_id)?
            .ok_or_else(|| ValidationError::ServiceNotFound(service_id.clone()))?;

        // 2. Merge. Absent fields keep the stored value; a PUT cannot clear
        //    the assigned staff or the memo.
        let mut merged = stored;
        merged.service_id = service_id;
        if let Some(customer_id) = &patch.customer_id {
            merged.customer_id = customer_id.clone();
        }
        if let Some(staff_id) = &patch.staff_id {
            merged.staff_id = Some(staff_id.clone());
        }
        if let Some(start_time) = &patch.start_time {
            merged.start_time = start_time.clone();
        }
        if let Some(status) = &patch.status {
            merged.status = status.clone();
        }
        if let Some(memo) = &patch.memo {
            merged.memo = Some(memo.clone());
        }

        let mut issues = vec![];

        // 3. Resolve the merged end. An explicit end wins; a changed start
        //    or service re-derives it; otherwise the stored end stands.
        let time_changed = patch.start_time.is_some() || patch.service_id.is_some();
        let mut interval = None;
        if let Ok(start) = time_to_minutes(&merged.start_time) {
            if let Some(explicit) = &patch.end_time {
                if let Ok(end) = time_to_minutes(explicit) {
                    if end > start {
                        interval = Some((start, end));
                    }
                }
                merged.end_time = Some(explicit.clone());
            } else if time_changed || merged.end_time.is_none() {
                let end = start + service.effective_duration();
                merged.end_time = Some(minutes_to_time(end));
                interval = Some((start, end));
            } else if let Some(stored_end) = merged.end_time.as_deref() {
                if let Ok(end) = time_to_minutes(stored_end) {
                    if end > start {
                        interval = Some((start, end));
                    }
                }
            }
        }

        // 4. Hours, then conflicts against everyone but this row.
        match interval {
            Some((start, end)) => {
                if !self.hours.covers(start, end) {
                    issues.push(ValidationIssue::OutsideBusinessHours {
                        hours: self.hours.to_human_readable(),
                    });
                }
            }
            None => issues.push(ValidationIssue::InvalidTime),
        }

        let mut date_ok = true;
        if let Some(date) = &patch.date {
            match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
                Ok(date) => merged.date = date,
                Err(_) => {
                    issues.push(ValidationIssue::InvalidDate);
                    date_ok = false;
                }
            }
        }

        if let (true, Some((start, end))) = (date_ok, interval) {
            let report = scheduling::find_conflicts(
                self.reservations,
                merged.date,
                start,
                end,
                merged.staff_id.as_deref(),
                Some(id),
            )?;
            if report.has_conflict {
                issues.push(ValidationIssue::Conflict {
                    conflicts: report.conflicts,
                });
            }
        }

        Ok((ValidationReport { issues }, merged))
    }

    /// Coarse probe: the first reason the interval cannot be booked, or
    /// None when it can.
    pub fn can_make_reservation(
        &self,
        holidays: &dyn HolidayCalendar,
        date: NaiveDate,
        start_time: &str,
        end_time: &str,
        staff_id: Option<&str>,
    ) -> anyhow::Result<Option<Refusal>> {
        // 1. Whole-day closures win.
        if holidays.is_holiday(date) {
            return Ok(Some(Refusal::Holiday));
        }

        // 2. The interval must sit inside business hours.
        let start = time_to_minutes(start_time)?;
        let end = time_to_minutes(end_time)?;
        if !self.hours.covers(start, end) {
            return Ok(Some(Refusal::OutsideHours {
                hours: self.hours.to_human_readable(),
            }));
        }

        // 3. No overlap with what is already booked.
        let report =
            scheduling::find_conflicts(self.reservations, date, start, end, staff_id, None)?;
        if report.has_conflict {
            return Ok(Some(Refusal::Booked));
        }

        Ok(None)
    }
}
