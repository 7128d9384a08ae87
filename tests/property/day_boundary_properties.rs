// Property-based tests for calendar day boundaries
// Random clicks across zones must always open one fixed-length day

use chrono::{FixedOffset, TimeZone, Utc};
use chrono_tz::Tz;
use event_calendar::models::filter::FilterSpec;
use event_calendar::utils::date::{DayBoundary, SECONDS_PER_DAY};
use proptest::prelude::*;

const ZONES: [Tz; 5] = [
    chrono_tz::UTC,
    chrono_tz::America::New_York,
    chrono_tz::Europe::London,
    chrono_tz::Australia::Sydney,
    chrono_tz::Asia::Kolkata,
];

proptest! {
    /// Property: the window is exactly one day long and contains the click
    #[test]
    fn prop_window_is_one_day_and_contains_click(
        secs in 0i64..4_102_444_800,
        zone in 0usize..ZONES.len(),
    ) {
        let tz = ZONES[zone];
        let clicked = tz.timestamp_opt(secs, 0).unwrap();
        let day = DayBoundary::containing(&clicked).unwrap();

        prop_assert_eq!(day.end - day.start, SECONDS_PER_DAY);
        prop_assert!(day.start <= secs);
        prop_assert!(day.contains(day.start));
        prop_assert!(!day.contains(day.end));
    }

    /// Property: with a fixed offset, start is local midnight
    #[test]
    fn prop_fixed_offset_start_is_midnight(
        secs in 0i64..4_102_444_800,
        offset_quarters in -48i32..=56,
    ) {
        let offset = FixedOffset::east_opt(offset_quarters * 15 * 60).unwrap();
        let clicked = offset.timestamp_opt(secs, 0).unwrap();
        let day = DayBoundary::containing(&clicked).unwrap();

        prop_assert_eq!((day.start + offset.local_minus_utc() as i64).rem_euclid(SECONDS_PER_DAY), 0);
        prop_assert!(secs - day.start < SECONDS_PER_DAY);
    }

    /// Property: every click on the same day yields the same filter
    #[test]
    fn prop_same_day_clicks_agree(
        day_index in 0i64..40_000,
        first in 0i64..SECONDS_PER_DAY,
        second in 0i64..SECONDS_PER_DAY,
    ) {
        let midnight = day_index * SECONDS_PER_DAY;
        let a = DayBoundary::containing(&Utc.timestamp_opt(midnight + first, 0).unwrap()).unwrap();
        let b = DayBoundary::containing(&Utc.timestamp_opt(midnight + second, 0).unwrap()).unwrap();

        prop_assert_eq!(a, b);
        prop_assert_eq!(FilterSpec::new(a.start, a.end), FilterSpec::new(b.start, b.end));
    }

    /// Property: sub-second parts of the click never move the window
    #[test]
    fn prop_sub_second_precision_is_truncated(
        secs in 0i64..4_102_444_800,
        nanos in 0u32..1_000_000_000,
    ) {
        let whole = DayBoundary::containing(&Utc.timestamp_opt(secs, 0).unwrap()).unwrap();
        let fractional = DayBoundary::containing(&Utc.timestamp_opt(secs, nanos).unwrap()).unwrap();
        prop_assert_eq!(whole, fractional);
    }
}
