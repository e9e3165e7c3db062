//! Human-readable time display
//!
//! Relative ages for repositories ("3 days ago"), play-time labels for
//! tracks, and `M:SS` durations.

use chrono::{DateTime, Utc};

const MILLIS_PER_DAY: i64 = 1000 * 60 * 60 * 24;

/// Relative age between `then` and `now`
///
/// Day count rounds up, so anything under 24 hours reads "1 day ago".
/// Months are 30 days and years 365.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use folio_common::human_time::relative_age;
///
/// let now = Utc::now();
/// assert_eq!(relative_age(now - Duration::hours(3), now), "1 day ago");
/// assert_eq!(relative_age(now - Duration::days(12), now), "12 days ago");
/// assert_eq!(relative_age(now - Duration::days(65), now), "2 months ago");
/// assert_eq!(relative_age(now - Duration::days(800), now), "2 years ago");
/// ```
pub fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff_millis = (now - then).num_milliseconds().abs();
    let days = (diff_millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;

    if days == 1 {
        "1 day ago".to_string()
    } else if days < 30 {
        format!("{} days ago", days)
    } else if days < 365 {
        format!("{} months ago", days / 30)
    } else {
        format!("{} years ago", days / 365)
    }
}

/// [`relative_age`] for an RFC 3339 timestamp; `None` if it does not parse
pub fn relative_age_str(timestamp: &str, now: DateTime<Utc>) -> Option<String> {
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|t| relative_age(t.with_timezone(&Utc), now))
}

/// Label for when a track was played
///
/// "Now playing" wins over any timestamp; a missing timestamp reads "Recently".
pub fn played_label(played_at: Option<DateTime<Utc>>, now_playing: bool) -> String {
    if now_playing {
        return "Now playing".to_string();
    }
    match played_at {
        Some(at) => at.format("%d %b %Y").to_string(),
        None => "Recently".to_string(),
    }
}

/// Milliseconds as `M:SS`
pub fn format_duration_ms(ms: u64) -> String {
    let seconds = ms / 1000;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
