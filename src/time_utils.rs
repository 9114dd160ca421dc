// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current time as an RFC3339 string.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// Parse a fixture's `YYYY-MM-DD` date and optional `HH:MM[:SS]` time.
///
/// A missing or unparseable time means midnight.
pub fn kickoff(date: &str, time: Option<&str>) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let time = time
        .and_then(|t| {
            let t = t.trim();
            NaiveTime::parse_from_str(t, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
                .ok()
        })
        .unwrap_or(NaiveTime::MIN);
    Some(date.and_time(time))
}

/// Whether a kickoff lies before `now`.
pub fn is_past(kickoff: NaiveDateTime, now: NaiveDateTime) -> bool {
    kickoff < now
}

/// Format a kickoff like `Sat, May 4 • 07:30 PM`, optionally with the year.
pub fn format_kickoff(kickoff: NaiveDateTime, with_year: bool) -> String {
    let date = if with_year {
        kickoff.format("%a, %b %-d, %Y")
    } else {
        kickoff.format("%a, %b %-d")
    };
    format!("{} • {}", date, kickoff.format("%I:%M %p"))
}

/// Human label for a kickoff relative to `now`.
///
/// Anything a week or more away falls back to the full formatted date.
pub fn relative_label(kickoff: NaiveDateTime, now: NaiveDateTime) -> String {
    let future = kickoff > now;
    let days = (kickoff - now).num_days().abs();

    match (days, future) {
        (0, true) => "Today".to_string(),
        (0, false) => "Earlier today".to_string(),
        (1, true) => "Tomorrow".to_string(),
        (1, false) => "Yesterday".to_string(),
        (n, true) if n < 7 => format!("In {} days", n),
        (n, false) if n < 7 => format!("{} days ago", n),
        _ => format_kickoff(kickoff, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_kickoff_parsing() {
        assert_eq!(
            kickoff("2024-05-04", Some("19:30:00")),
            Some(at("2024-05-04 19:30:00"))
        );
        assert_eq!(kickoff("2024-05-04", None), Some(at("2024-05-04 00:00:00")));
        assert_eq!(
            kickoff("2024-05-04", Some("garbage")),
            Some(at("2024-05-04 00:00:00"))
        );
        assert_eq!(kickoff("not-a-date", Some("19:30:00")), None);
    }

    #[test]
    fn test_relative_labels() {
        let now = at("2024-05-04 12:00:00");

        assert_eq!(relative_label(at("2024-05-04 19:30:00"), now), "Today");
        assert_eq!(relative_label(at("2024-05-04 08:00:00"), now), "Earlier today");
        assert_eq!(relative_label(at("2024-05-05 13:00:00"), now), "Tomorrow");
        assert_eq!(relative_label(at("2024-05-03 11:00:00"), now), "Yesterday");
        assert_eq!(relative_label(at("2024-05-08 12:00:00"), now), "In 4 days");
        assert_eq!(relative_label(at("2024-05-01 12:00:00"), now), "3 days ago");
        assert_eq!(
            relative_label(at("2024-05-25 19:30:00"), now),
            "Sat, May 25, 2024 • 07:30 PM"
        );
    }

    #[test]
    fn test_is_past() {
        let now = at("2024-05-04 12:00:00");
        assert!(is_past(at("2024-05-04 11:59:59"), now));
        assert!(!is_past(at("2024-05-04 12:00:01"), now));
    }
}
