use chrono::{Duration, NaiveTime};

use crate::models::hours::time_to_minutes;
use crate::models::ReservationDetail;

pub fn generate_ics(reservation: &ReservationDetail) -> anyhow::Result<String> {
    let start_min = time_to_minutes(&reservation.start_time)?;
    let end_min = reservation
        .end_time
        .as_deref()
        .and_then(|e| time_to_minutes(e).ok())
        .unwrap_or(start_min + 60);

    let midnight = reservation.date.and_time(NaiveTime::MIN);
    let dtstart = (midnight + Duration::minutes(start_min as i64))
        .format("%Y%m%dT%H%M%S")
        .to_string();
    let dtend = (midnight + Duration::minutes(end_min as i64))
        .format("%Y%m%dT%H%M%S")
        .to_string();
    let dtstamp = reservation.created_at.format("%Y%m%dT%H%M%S").to_string();
    let uid = format!("{}@salonbook", reservation.id);

    let summary = format!("{} - {}", reservation.customer_name, reservation.service_name);
    let description = match (&reservation.staff_name, reservation.memo.as_deref()) {
        (Some(staff), Some(memo)) => format!("담당: {staff} / {memo}"),
        (Some(staff), None) => format!("담당: {staff}"),
        (None, Some(memo)) => memo.to_string(),
        (None, None) => "예약".to_string(),
    };

    Ok(format!(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//Salonbook//Reservations//KO\r\n\
         BEGIN:VEVENT\r\n\
         UID:{uid}\r\n\
         DTSTAMP:{dtstamp}\r\n\
         DTSTART:{dtstart}\r\n\
         DTEND:{dtend}\r\n\
         SUMMARY:{summary}\r\n\
         DESCRIPTION:{description}\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n"
    ))
}
