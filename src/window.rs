// src/window.rs
use chrono::{DateTime, Local, LocalResult, NaiveDate, TimeZone};

/// The "today" window: every post created at or after `cutoff` belongs to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub cutoff: DateTime<Local>,
    pub today: NaiveDate,
}

impl TimeWindow {
    /// Window with an explicit cutoff; `today` is the cutoff's local date.
    pub fn starting_at<Tz: TimeZone>(cutoff: DateTime<Tz>) -> Self {
        let cutoff = cutoff.with_timezone(&Local);
        Self {
            today: cutoff.date_naive(),
            cutoff,
        }
    }

    /// True if a post created at `created_utc` (unix seconds) is in the window.
    pub fn contains_unix(&self, created_utc: i64) -> bool {
        created_utc >= self.cutoff.timestamp()
    }
}

/// Window for the current local wall-clock time.
pub fn current_window() -> TimeWindow {
    window_at(Local::now())
}

/// Truncate `now` to the start of its local calendar day.
pub fn window_at(now: DateTime<Local>) -> TimeWindow {
    let today = now.date_naive();
    TimeWindow {
        cutoff: start_of_day(today).unwrap_or(now),
        today,
    }
}

fn start_of_day(day: NaiveDate) -> Option<DateTime<Local>> {
    let midnight = day.and_hms_opt(0, 0, 0)?;
    match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        // DST gap at midnight: walk forward to the first instant that exists.
        LocalResult::None => (1..=24 * 4).find_map(|quarter| {
            let t = midnight + chrono::Duration::minutes(15 * quarter);
            Local.from_local_datetime(&t).earliest()
        }),
    }
}
