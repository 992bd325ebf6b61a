use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};

/// Parses `HH:MM` or `HH:MM:SS` into a minute-precision time of day.
/// Seconds are dropped so the value matches how departures are keyed.
pub fn parse_time_of_day(s: &str) -> Option<NaiveTime> {
    let parsed = NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()?;
    NaiveTime::from_hms_opt(parsed.hour(), parsed.minute(), 0)
}

/// Departure plus a fractional-hour route duration, truncated to the minute.
pub fn arrival_after(departure: NaiveDateTime, duration_hours: f64) -> NaiveDateTime {
    departure + Duration::minutes((duration_hours * 60.0) as i64)
}
