use chrono::{Datelike, NaiveDate, Weekday};

/// Decides whether the shop is closed for the whole day.
pub trait HolidayCalendar: Send + Sync {
    fn is_holiday(&self, date: NaiveDate) -> bool;
}

/// Fixed weekly closing days. The stock configuration closes Sundays.
pub struct WeeklyClosure {
    closed: Vec<Weekday>,
}

impl WeeklyClosure {
    pub fn new(closed: Vec<Weekday>) -> Self {
        Self { closed }
    }

    /// Builds the closure set from day names ("sun", "monday", ...).
    /// Unrecognized names are logged and skipped.
    pub fn from_names(names: &[String]) -> Self {
        let mut closed = vec![];
        for name in names {
            match name.trim().parse::<Weekday>() {
                Ok(day) => closed.push(day),
                Err(_) => tracing::warn!(day = %name, "ignoring unknown closed day"),
            }
        }
        Self { closed }
    }
}

impl Default for WeeklyClosure {
    fn default() -> Self {
        Self {
            closed: vec![Weekday::Sun],
        }
    }
}

impl HolidayCalendar for WeeklyClosure {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.closed.contains(&date.weekday())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_default_closes_sundays() {
        let cal = WeeklyClosure::default();
        // 2025-06-15 is a Sunday, 2025-06-16 a Monday
        assert!(cal.is_holiday(date("2025-06-15")));
        assert!(!cal.is_holiday(date("2025-06-16")));
    }

    #[test]
    fn test_from_names() {
        let cal = WeeklyClosure::from_names(&["sun".to_string(), "Wednesday".to_string()]);
        assert!(cal.is_holiday(date("2025-06-15"))); // Sunday
        assert!(cal.is_holiday(date("2025-06-18"))); // Wednesday
        assert!(!cal.is_holiday(date("2025-06-16")));
    }

    #[test]
    fn test_unknown_names_are_skipped() {
        let cal = WeeklyClosure::from_names(&["funday".to_string()]);
        assert!(!cal.is_holiday(date("2025-06-15")));
    }

    #[test]
    fn test_empty_set_never_closes() {
        let cal = WeeklyClosure::new(vec![]);
        for d in ["2025-06-15", "2025-06-16", "2025-06-17"] {
            assert!(!cal.is_holiday(date(d)));
        }
    }
}
