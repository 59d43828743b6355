use crate::models::NOT_AVAILABLE;
use chrono::{DateTime, Duration, DurationRound, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

pub const FIVE_STAR_MARKER: &str = "*****";
pub const FOUR_STAR_MARKER: &str = "****";
pub const LAST_MINUTE_MARKER: &str = "Dernière minute";

// `%#z` also accepts a `Z` suffix.
const API_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M%#z";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

const SNAPSHOT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Splits "City, Country" on the first comma. Without a comma the whole text
/// is taken as the country.
pub fn split_destination(destination: &str) -> (String, String) {
    match destination.split_once(',') {
        Some((city, country)) => (city.trim().to_string(), country.trim().to_string()),
        None => (String::new(), destination.trim().to_string()),
    }
}

pub fn is_last_minute(hotel_name: &str) -> bool {
    hotel_name.contains(LAST_MINUTE_MARKER)
}

/// Converts an API date such as `2025-01-10T14:00+0100` into the snapshot
/// timestamp format, keeping the wall-clock time of the given offset.
pub fn transform_api_date(date: &str) -> String {
    match DateTime::parse_from_str(date.trim(), API_DATE_FORMAT) {
        Ok(parsed) => parsed.format(TIMESTAMP_FORMAT).to_string(),
        Err(_) => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Reads a `start_date`/`end_date` cell of a snapshot, rounded to the nearest
/// whole second. Sentinels and garbage give `None`.
pub fn parse_snapshot_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() || value == NOT_AVAILABLE {
        return None;
    }

    let parsed = SNAPSHOT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    Some(parsed.duration_round(Duration::seconds(1)).unwrap_or(parsed))
}

fn days_regex() -> &'static Regex {
    static DAYS: OnceLock<Regex> = OnceLock::new();
    DAYS.get_or_init(|| Regex::new(r"(?i)(\d+)\s*days?").expect("days pattern is valid"))
}

fn hours_regex() -> &'static Regex {
    static HOURS: OnceLock<Regex> = OnceLock::new();
    HOURS.get_or_init(|| Regex::new(r"(?i)(\d+)h\s*(\d+)?m?").expect("hours pattern is valid"))
}

/// Parses the "time remaining" badge of a sale: `3 days`, `1 day`, `2h 30m`,
/// `5h`. Anything else is a zero duration.
pub fn parse_time_remaining(text: &str) -> Duration {
    if let Some(captures) = days_regex().captures(text) {
        return captures
            .get(1)
            .and_then(|days| days.as_str().parse::<i64>().ok())
            .and_then(Duration::try_days)
            .unwrap_or_else(Duration::zero);
    }

    if let Some(captures) = hours_regex().captures(text) {
        let hours = captures
            .get(1)
            .and_then(|hours| hours.as_str().parse::<i64>().ok())
            .and_then(Duration::try_hours);
        let minutes = match captures.get(2) {
            Some(minutes) => minutes.as_str().parse::<i64>().ok().and_then(Duration::try_minutes),
            None => Some(Duration::zero()),
        };

        return match (hours, minutes) {
            (Some(hours), Some(minutes)) => hours.checked_add(&minutes).unwrap_or_else(Duration::zero),
            _ => Duration::zero(),
        };
    }

    Duration::zero()
}

/// Validity window of a sale seen at `now` with the given remaining time.
pub fn offer_window(now: NaiveDateTime, time_remaining: &str) -> (NaiveDateTime, NaiveDateTime) {
    let end = now
        .checked_add_signed(parse_time_remaining(time_remaining))
        .unwrap_or(now);
    (now, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn destination_splits_on_first_comma() {
        assert_eq!(
            split_destination("Paris, Île-de-France, France"),
            ("Paris".to_string(), "Île-de-France, France".to_string())
        );
        assert_eq!(split_destination("Maldives"), (String::new(), "Maldives".to_string()));
        assert_eq!(split_destination(""), (String::new(), String::new()));
    }

    #[test]
    fn last_minute_marker_is_detected() {
        assert!(is_last_minute("Dernière minute - Villa Marie"));
        assert!(!is_last_minute("Villa Marie"));
    }

    #[test]
    fn api_dates_keep_their_wall_clock_time() {
        assert_eq!(transform_api_date("2025-01-10T14:05+0100"), "2025-01-10 14:05:00.000000");
        assert_eq!(transform_api_date("2025-02-10T09:00Z"), "2025-02-10 09:00:00.000000");
        assert_eq!(transform_api_date("2025-01-10T14:05"), NOT_AVAILABLE);
        assert_eq!(transform_api_date(NOT_AVAILABLE), NOT_AVAILABLE);
    }

    #[test]
    fn snapshot_timestamps_are_rounded_to_seconds() {
        let parsed = parse_snapshot_timestamp("2025-01-01 12:00:00.600000").unwrap();
        assert_eq!(parsed, now() + Duration::seconds(1));
        assert_eq!(parsed.nanosecond(), 0);

        let parsed = parse_snapshot_timestamp("2025-01-01 12:00:00.400000").unwrap();
        assert_eq!(parsed, now());
    }

    #[test]
    fn snapshot_timestamps_accept_several_shapes() {
        assert_eq!(parse_snapshot_timestamp("2025-01-01 12:00:00"), Some(now()));
        assert_eq!(parse_snapshot_timestamp("2025-01-01T12:00:00"), Some(now()));
        assert_eq!(
            parse_snapshot_timestamp("2025-01-01"),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_snapshot_timestamp("N/A"), None);
        assert_eq!(parse_snapshot_timestamp(""), None);
        assert_eq!(parse_snapshot_timestamp("tomorrow"), None);
    }

    #[test]
    fn remaining_days_are_added_to_now() {
        let (start, end) = offer_window(now(), "3 days");
        assert_eq!(start, now());
        assert_eq!(end, now() + Duration::days(3));

        assert_eq!(parse_time_remaining("Ends in 1 DAY"), Duration::days(1));
    }

    #[test]
    fn remaining_hours_and_minutes_are_added_to_now() {
        let (_, end) = offer_window(now(), "2h 30m");
        assert_eq!(end, now() + Duration::hours(2) + Duration::minutes(30));

        assert_eq!(parse_time_remaining("5h"), Duration::hours(5));
    }

    #[test]
    fn unknown_remaining_time_gives_zero_duration() {
        let (start, end) = offer_window(now(), "Last chance!");
        assert_eq!(start, end);
        assert_eq!(parse_time_remaining(NOT_AVAILABLE), Duration::zero());
        assert_eq!(parse_time_remaining("99999999999999999999 days"), Duration::zero());
    }
}
