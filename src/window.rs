use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Trailing time span used to count "new" feedback.
///
/// Both bounds are UTC at second precision and render with an explicit `Z`
/// suffix; the platforms disagree on how they treat naive timestamps, so a
/// zone-explicit format is the only one that keeps window boundaries
/// consistent across them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl ReportWindow {
    /// Window covering the last `days` days, ending now.
    pub fn trailing_days(days: i64) -> Self {
        Self::trailing_days_from(Utc::now(), days)
    }

    /// Window covering the last `days` days, ending at `until`.
    pub fn trailing_days_from(until: DateTime<Utc>, days: i64) -> Self {
        Self {
            since: until - Duration::days(days),
            until,
        }
    }

    /// Lower bound as RFC3339, e.g. `2026-08-23T09:15:04Z`.
    pub fn since_rfc3339(&self) -> String {
        self.since.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// Upper bound as RFC3339, e.g. `2026-08-30T09:15:04Z`.
    pub fn until_rfc3339(&self) -> String {
        self.until.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// Run date (the window's upper bound) as `YYYY-MM-DD`.
    pub fn run_date(&self) -> String {
        self.until.date_naive().to_string()
    }
}
