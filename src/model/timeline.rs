use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::{ProjectGroup, TaskRecord};

/// Minimum visible horizon of the overview, in days.
pub const MIN_WINDOW_DAYS: i64 = 45;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Length of a bare `YYYY-MM-DD` date.
const BARE_DATE_LEN: usize = 10;

/// Parse a time string as the service sends it.
///
/// Accepts RFC 3339 timestamps (offset dropped, wall-clock time kept),
/// date-times with optional fractional seconds, bare dates (midnight) and
/// `YYYY-MM` months (first day, midnight).
pub fn parse_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    parse_date(s).map(|d| d.and_time(NaiveTime::MIN))
}

/// Parse a bare date or a `YYYY-MM` month.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d").ok()
}

/// Calendar day of a task time, ignoring the time-of-day.
pub fn task_date(s: &str) -> Option<NaiveDate> {
    parse_time(s).map(|dt| dt.date())
}

/// Time used by the overview filter.
///
/// Date-times are compared at minute precision: the seconds field and any
/// fraction are dropped. Bare dates are compared unchanged.
pub fn comparison_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    let dt = parse_time(s)?;
    if s.len() > BARE_DATE_LEN {
        dt.with_second(0).and_then(|dt| dt.with_nanosecond(0))
    } else {
        Some(dt)
    }
}

/// Inclusive day count between two dates (`diff + 1`).
pub fn span_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Shift a month-start date by whole months.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 + months;
    NaiveDate::from_ymd_opt(total.div_euclid(12), total.rem_euclid(12) as u32 + 1, 1)
        .unwrap_or(date)
}

/// The `[start, end]` date range sizing the timeline and grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeWindow {
    /// Window spanning the earliest start and latest end of `tasks`,
    /// stretched to [`MIN_WINDOW_DAYS`]. `None` when no task has a
    /// readable date.
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a TaskRecord>) -> Option<Self> {
        let mut start: Option<NaiveDate> = None;
        let mut end: Option<NaiveDate> = None;
        for task in tasks {
            if let Some(s) = task_date(&task.start_time) {
                start = Some(start.map_or(s, |cur| cur.min(s)));
            }
            if let Some(e) = task_date(&task.end_time) {
                end = Some(end.map_or(e, |cur| cur.max(e)));
            }
        }
        let (start, end) = match (start, end) {
            (Some(s), Some(e)) => (s, e),
            (Some(s), None) => (s, s),
            (None, Some(e)) => (e, e),
            (None, None) => return None,
        };
        let end = if (end - start).num_days() < MIN_WINDOW_DAYS {
            start + Duration::days(MIN_WINDOW_DAYS)
        } else {
            end
        };
        Some(Self { start, end })
    }

    pub fn from_projects(projects: &[ProjectGroup]) -> Option<Self> {
        Self::from_tasks(projects.iter().flat_map(|p| &p.task_slice))
    }

    /// Number of day columns (inclusive of both ends).
    pub fn days(&self) -> i64 {
        span_days(self.start, self.end)
    }

    /// Days from the window start to `date` (negative before the window).
    pub fn offset_days(&self, date: NaiveDate) -> i64 {
        (date - self.start).num_days()
    }

    /// Convert a date to an x-pixel offset from the window start.
    pub fn date_to_x(&self, date: NaiveDate, cell_width: f32) -> f32 {
        self.offset_days(date) as f32 * cell_width
    }

    /// Iterate every day of the window in order.
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }
}
