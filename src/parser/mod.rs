//! Duration mining and formatting for step text.
//!
//! [`detect`] scans free-form instruction text ("simmer for 10 minutes")
//! for durations that can be offered as one-tap timers. Patterns are
//! applied per unit in a fixed order (hours, minutes, seconds), so results
//! are grouped by unit rather than sorted by position in the text.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// A duration found in step text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedDuration {
    /// Total length in seconds (never zero).
    pub seconds: u32,
    /// The matched text, e.g. `"25 minutes"`.
    pub origin_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Unit {
    Hours,
    Minutes,
    Seconds,
}

impl Unit {
    fn multiplier(self) -> f64 {
        match self {
            Unit::Hours => 3600.0,
            Unit::Minutes => 60.0,
            Unit::Seconds => 1.0,
        }
    }
}

static UNIT_PATTERNS: LazyLock<[(Unit, Regex); 3]> = LazyLock::new(|| {
    [
        (Unit::Hours, unit_pattern("hours?|hrs?|h")),
        (Unit::Minutes, unit_pattern("minutes?|mins?|m")),
        (Unit::Seconds, unit_pattern("seconds?|secs?|s")),
    ]
});

fn unit_pattern(units: &str) -> Regex {
    let pattern = format!(r"(?i)\b(\d+(?:\.\d+)?)\s*(?:{units})\b");
    Regex::new(&pattern).expect("unit patterns are static and valid")
}

/// Finds every duration mentioned in `text`.
///
/// Matches are converted to seconds with their unit's multiplier; decimal
/// values are rounded to the nearest second. A match is identified by its
/// position, value and unit, and each is reported once. Zero-length
/// durations are dropped.
///
/// # Example
///
/// ```
/// use cookalong::parser::detect;
///
/// let found = detect("Bake for 25 minutes, then rest 10 min");
/// let seconds: Vec<u32> = found.iter().map(|d| d.seconds).collect();
/// assert_eq!(seconds, vec![1500, 600]);
/// ```
#[must_use]
pub fn detect(text: &str) -> Vec<DetectedDuration> {
    let mut seen: HashSet<(usize, u64, Unit)> = HashSet::new();
    let mut found = Vec::new();

    for (unit, pattern) in UNIT_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Ok(value) = number.as_str().parse::<f64>() else {
                continue;
            };

            if !seen.insert((whole.start(), value.to_bits(), *unit)) {
                continue;
            }

            let seconds = (value * unit.multiplier()).round();
            if seconds < 1.0 || seconds > f64::from(u32::MAX) {
                continue;
            }

            found.push(DetectedDuration {
                seconds: seconds as u32,
                origin_token: whole.as_str().to_string(),
            });
        }
    }

    found
}

/// Renders a duration in compact human form.
///
/// - one hour or more: `"2h"` or `"1h 5m"` (seconds are dropped)
/// - whole minutes: `"10min"`
/// - under a minute: `"45sec"`
/// - otherwise: `"1m 30s"`
#[must_use]
pub fn format_duration(seconds: u32) -> String {
    if seconds >= 3600 {
        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;
        return if minutes == 0 {
            format!("{hours}h")
        } else {
            format!("{hours}h {minutes}m")
        };
    }

    let minutes = seconds / 60;
    let secs = seconds % 60;
    match (minutes, secs) {
        (0, s) => format!("{s}sec"),
        (m, 0) => format!("{m}min"),
        (m, s) => format!("{m}m {s}s"),
    }
}

/// Renders a countdown as `M:SS`, or `H:MM:SS` from one hour up.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seconds_of(text: &str) -> Vec<u32> {
        detect(text).iter().map(|d| d.seconds).collect()
    }

    mod detect_tests {
        use super::*;

        #[test]
        fn test_minutes_in_text_order() {
            assert_eq!(
                seconds_of("Bake for 25 minutes, then rest 10 min"),
                vec![1500, 600]
            );
        }

        #[test]
        fn test_origin_tokens() {
            let found = detect("Bake for 25 minutes, then rest 10 min");
            assert_eq!(found[0].origin_token, "25 minutes");
            assert_eq!(found[1].origin_token, "10 min");
        }

        #[test]
        fn test_grouped_by_unit_order() {
            // Seconds appear first in the text but are reported last
            assert_eq!(
                seconds_of("Whisk 30 seconds, simmer 1 hour, then 5 minutes"),
                vec![3600, 300, 30]
            );
        }

        #[test]
        fn test_unit_spellings() {
            assert_eq!(seconds_of("2 hrs"), vec![7200]);
            assert_eq!(seconds_of("1 hr"), vec![3600]);
            assert_eq!(seconds_of("3h"), vec![10800]);
            assert_eq!(seconds_of("4 mins"), vec![240]);
            assert_eq!(seconds_of("4m"), vec![240]);
            assert_eq!(seconds_of("45 secs"), vec![45]);
            assert_eq!(seconds_of("45s"), vec![45]);
            assert_eq!(seconds_of("1 second"), vec![1]);
        }

        #[test]
        fn test_case_insensitive() {
            assert_eq!(seconds_of("Rest 10 MINUTES"), vec![600]);
        }

        #[test]
        fn test_decimal_values() {
            assert_eq!(seconds_of("Braise 1.5 hours"), vec![5400]);
            assert_eq!(seconds_of("Steam 2.5 min"), vec![150]);
        }

        #[test]
        fn test_zero_is_discarded() {
            assert!(detect("0 minutes").is_empty());
            assert_eq!(seconds_of("0 minutes or 2 minutes"), vec![120]);
        }

        #[test]
        fn test_no_match_inside_words() {
            assert!(detect("Add 200ml of milk and 2 eggs").is_empty());
            assert!(detect("Use 5 mugs").is_empty());
        }

        #[test]
        fn test_repeated_values_at_different_positions() {
            assert_eq!(seconds_of("Stir 5 min, rest 5 min"), vec![300, 300]);
        }

        #[test]
        fn test_empty_text() {
            assert!(detect("").is_empty());
            assert!(detect("Season to taste").is_empty());
        }

        #[test]
        fn test_each_call_is_independent() {
            let first = detect("Boil 8 minutes");
            let second = detect("Boil 8 minutes");
            assert_eq!(first, second);
        }
    }

    mod format_tests {
        use super::*;

        #[test]
        fn test_minutes_and_seconds() {
            assert_eq!(format_duration(90), "1m 30s");
        }

        #[test]
        fn test_hours_only() {
            assert_eq!(format_duration(3600), "1h");
            assert_eq!(format_duration(7200), "2h");
        }

        #[test]
        fn test_hours_and_minutes_drop_seconds() {
            assert_eq!(format_duration(3661), "1h 1m");
            assert_eq!(format_duration(5400), "1h 30m");
        }

        #[test]
        fn test_whole_minutes() {
            assert_eq!(format_duration(600), "10min");
            assert_eq!(format_duration(60), "1min");
        }

        #[test]
        fn test_seconds_only() {
            assert_eq!(format_duration(45), "45sec");
            assert_eq!(format_duration(0), "0sec");
        }

        #[test]
        fn test_clock() {
            assert_eq!(format_clock(0), "0:00");
            assert_eq!(format_clock(59), "0:59");
            assert_eq!(format_clock(1500), "25:00");
            assert_eq!(format_clock(3661), "1:01:01");
        }
    }
}
