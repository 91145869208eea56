use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use log::warn;

// Number of seconds in various time periods
const SECS_MINUTE: i64 = 60;
const SECS_HOUR: i64 = SECS_MINUTE * 60;
const SECS_DAY: i64 = SECS_HOUR * 24;

/// Format the span between two timestamps as a compact duration string
/// The end defaults to now for runs that are still in progress.
pub fn duration(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> String {
    let Some(start) = start else {
        return String::from("-");
    };

    let seconds = end.unwrap_or(now).signed_duration_since(start).num_seconds();
    match seconds {
        s if s < 0 => String::from("-"),
        s if s < SECS_MINUTE => format!("{s}s"),
        s if s < SECS_HOUR => format!("{}m {}s", s / SECS_MINUTE, s % SECS_MINUTE),
        s => format!("{}h {}m", s / SECS_HOUR, s % SECS_HOUR / SECS_MINUTE),
    }
}

/// Format how long ago a timestamp occurred
pub fn time_ago(timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(timestamp) = timestamp else {
        return String::from("-");
    };

    let seconds = now.signed_duration_since(timestamp).num_seconds();
    match seconds {
        s if s >= SECS_DAY => format!("{}d ago", s / SECS_DAY),
        s if s >= SECS_HOUR => format!("{}h ago", s / SECS_HOUR),
        s if s >= SECS_MINUTE => format!("{}m ago", s / SECS_MINUTE),
        _ => String::from("just now"),
    }
}

/// Format a wall-clock time in the display timezone, like `14:05 CET`
pub fn local_clock(now: DateTime<Utc>, tz: Tz) -> String {
    now.with_timezone(&tz).format("%H:%M %Z").to_string()
}

/// Look up the display timezone by its IANA name
/// An invalid name falls back to UTC so that a misconfigured display keeps refreshing.
pub fn display_tz(name: &str) -> Tz {
    name.parse().unwrap_or_else(|_| {
        warn!("Invalid timezone {name}, falling back to UTC");
        Tz::UTC
    })
}
