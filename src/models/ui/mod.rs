// UI models module
// Values passed between calendar views and dialogs

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone};

use crate::utils::date::{DayBoundary, DateError};

/// Emitted when a calendar day cell is clicked.
///
/// `start` is any instant inside the clicked day; only its calendar date
/// (in its own zone) matters to consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarClickEvent<Tz: TimeZone = Local> {
    pub start: DateTime<Tz>,
}

impl<Tz: TimeZone> CalendarClickEvent<Tz> {
    pub fn new(start: DateTime<Tz>) -> Self {
        Self { start }
    }

    /// Click on `date` at wall-clock `time` in `tz`.
    ///
    /// Falls back to the day's first representable instant when `time`
    /// does not exist on that date.
    pub fn at(date: NaiveDate, time: NaiveTime, tz: &Tz) -> Result<Self, DateError> {
        match tz.from_local_datetime(&date.and_time(time)).earliest() {
            Some(start) => Ok(Self { start }),
            None => {
                let day = DayBoundary::for_date(date, tz)?;
                let start = tz
                    .timestamp_opt(day.start, 0)
                    .single()
                    .ok_or(DateError::NonexistentMidnight(date))?;
                Ok(Self { start })
            }
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use chrono_tz::America::New_York;

    #[test]
    fn test_at_keeps_date_and_time() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let time = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        let click = CalendarClickEvent::at(date, time, &Utc).unwrap();
        assert_eq!(click.date(), date);
        assert_eq!(click.start.to_rfc3339(), "2024-05-01T09:30:00+00:00");
    }

    #[test]
    fn test_at_inside_dst_gap_falls_back_to_day_start() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let time = NaiveTime::from_hms_opt(2, 30, 0).unwrap();
        let click = CalendarClickEvent::at(date, time, &New_York).unwrap();
        assert_eq!(click.date(), date);
        assert_eq!(
            click.start,
            New_York.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap()
        );
    }
}
