// Date utility functions
// Calendar-day boundaries expressed as epoch seconds

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use thiserror::Error;

/// Length of the window opened by a day click, in seconds.
pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Step used to find the first representable instant when a DST jump skips midnight.
const GAP_PROBE_MINUTES: i64 = 15;
const GAP_PROBE_STEPS: i64 = 12;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("no representable start of day for {0}")]
    NonexistentMidnight(NaiveDate),
    #[error("the day {0} ends past the representable range")]
    OutOfRange(NaiveDate),
}

/// Epoch-second window `[start, end)` covering one calendar day.
///
/// `end` is always `start + SECONDS_PER_DAY`: on days where the wall clock
/// shifts, the window keeps its fixed length and `end` lands an hour away
/// from the next local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayBoundary {
    pub start: i64,
    pub end: i64,
}

impl DayBoundary {
    /// Boundaries of the day containing `instant`, evaluated in the instant's own zone.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use event_calendar::utils::date::DayBoundary;
    ///
    /// let clicked = Utc.with_ymd_and_hms(2024, 1, 1, 15, 30, 0).unwrap();
    /// let day = DayBoundary::containing(&clicked).unwrap();
    /// assert_eq!(day.start, 1_704_067_200);
    /// assert_eq!(day.end, 1_704_153_600);
    /// ```
    pub fn containing<Tz: TimeZone>(instant: &DateTime<Tz>) -> Result<Self, DateError> {
        let midnight = start_of_day(instant)?;
        // Whole seconds; sub-second precision is dropped, never rounded.
        let start = midnight.timestamp();
        let end = midnight
            .checked_add_signed(Duration::seconds(SECONDS_PER_DAY))
            .ok_or_else(|| DateError::OutOfRange(instant.date_naive()))?
            .timestamp();

        Ok(Self { start, end })
    }

    /// Boundaries of `date` in `tz`.
    pub fn for_date<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Result<Self, DateError> {
        let midnight = resolve_midnight(date, tz)?;
        Self::containing(&midnight)
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start && timestamp < self.end
    }

    pub fn len_seconds(&self) -> i64 {
        self.end - self.start
    }
}

/// Truncate `instant` to midnight of its calendar day (hour, minute, second zeroed).
pub fn start_of_day<Tz: TimeZone>(instant: &DateTime<Tz>) -> Result<DateTime<Tz>, DateError> {
    resolve_midnight(instant.date_naive(), &instant.timezone())
}

fn resolve_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Result<DateTime<Tz>, DateError> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or(DateError::NonexistentMidnight(date))?;

    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => Ok(dt),
        // Clocks fell back across midnight: take the first pass.
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        // Clocks sprang forward over midnight: the day starts at the end of the gap.
        LocalResult::None => first_instant_after_gap(midnight, tz)
            .ok_or(DateError::NonexistentMidnight(date)),
    }
}

fn first_instant_after_gap<Tz: TimeZone>(midnight: NaiveDateTime, tz: &Tz) -> Option<DateTime<Tz>> {
    (1..=GAP_PROBE_STEPS).find_map(|step| {
        let probe = midnight.checked_add_signed(Duration::minutes(step * GAP_PROBE_MINUTES))?;
        tz.from_local_datetime(&probe).earliest()
    })
}
