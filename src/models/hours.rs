use serde::{Deserialize, Serialize};

/// Daily opening window plus an optional single break during which no
/// reservation may be scheduled. Times are "HH:MM" on a 24-hour clock.
///
/// Not persisted: the live value sits in `AppState` and resets to
/// `BusinessHours::default()` on every process start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessHours {
    pub open: String,
    pub close: String,
    pub break_start: Option<String>,
    pub break_end: Option<String>,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            open: "09:00".to_string(),
            close: "18:00".to_string(),
            break_start: Some("12:00".to_string()),
            break_end: Some("13:00".to_string()),
        }
    }
}

impl BusinessHours {
    /// Open/close window in minutes-of-day, or None when either bound is
    /// unparseable.
    pub fn window(&self) -> Option<(u32, u32)> {
        let open = time_to_minutes(&self.open).ok()?;
        let close = time_to_minutes(&self.close).ok()?;
        Some((open, close))
    }

    /// Break window in minutes-of-day. A break is active only when both
    /// ends are present and parseable.
    pub fn break_window(&self) -> Option<(u32, u32)> {
        let start = time_to_minutes(self.break_start.as_deref()?).ok()?;
        let end = time_to_minutes(self.break_end.as_deref()?).ok()?;
        Some((start, end))
    }

    /// Whether `[start_min, end_min)` lies fully inside the opening window
    /// without touching the break.
    pub fn covers(&self, start_min: u32, end_min: u32) -> bool {
        let Some((open, close)) = self.window() else {
            return false;
        };

        if start_min < open || end_min > close {
            return false;
        }

        if let Some((break_start, break_end)) = self.break_window() {
            if start_min < break_end && end_min > break_start {
                return false;
            }
            // Also catches zero-length intervals that begin inside the
            // break, which the overlap test above lets through.
            if start_min >= break_start && start_min < break_end {
                return false;
            }
        }

        true
    }

    pub fn to_human_readable(&self) -> String {
        match (&self.break_start, &self.break_end) {
            (Some(bs), Some(be)) => format!("{}~{} (휴식 {}~{})", self.open, self.close, bs, be),
            _ => format!("{}~{}", self.open, self.close),
        }
    }

    /// Shape check used by the settings endpoint before the value is
    /// swapped in.
    pub fn validate(&self) -> anyhow::Result<()> {
        let open = time_to_minutes(&self.open)?;
        let close = time_to_minutes(&self.close)?;
        if open >= close {
            return Err(anyhow::anyhow!(
                "open time must precede close time: {}~{}",
                self.open,
                self.close
            ));
        }
        match (&self.break_start, &self.break_end) {
            (None, None) => {}
            (Some(bs), Some(be)) => {
                time_to_minutes(bs)?;
                time_to_minutes(be)?;
            }
            _ => {
                return Err(anyhow::anyhow!(
                    "break_start and break_end must be given together"
                ));
            }
        }
        Ok(())
    }
}

/// "HH:MM" → minutes since midnight. Total for valid 24-hour-clock input.
pub fn time_to_minutes(s: &str) -> anyhow::Result<u32> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err(anyhow::anyhow!("invalid time format: {s}"));
    }
    let hour: u32 = parts[0]
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid hour in: {s}"))?;
    let minute: u32 = parts[1]
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid minute in: {s}"))?;
    if hour > 23 || minute > 59 {
        return Err(anyhow::anyhow!("time out of range: {s}"));
    }
    Ok(hour * 60 + minute)
}

/// Minutes since midnight → zero-padded "HH:MM". No day wraparound: values
/// past 23:59 render as "24:10", "25:00" and so on.
pub fn minutes_to_time(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Start time plus a duration, re-encoded as "HH:MM".
pub fn calculate_end_time(start: &str, duration_minutes: u32) -> anyhow::Result<String> {
    let start_min = time_to_minutes(start)?;
    Ok(minutes_to_time(start_min + duration_minutes))
}
