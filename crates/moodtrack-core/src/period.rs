//! Morning/evening submission windows.
//!
//! Each collaborator reports twice a day. The half-day is decided by the
//! local hour: anything before noon is the morning slot, the rest of the
//! day is the evening slot. The backend closes submissions at 17:00 and
//! refuses an evening entry when the morning one was missed; the same rules
//! are evaluated here so the form can explain itself before posting.

use chrono::{DateTime, FixedOffset, Local, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Emotion;

/// First hour of the evening slot
pub const MORNING_END_HOUR: u32 = 12;

/// Hour from which no more submissions are accepted
pub const SUBMISSION_END_HOUR: u32 = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HalfDay {
    Morning,
    Evening,
}

impl HalfDay {
    /// Classify a local hour (0-23)
    pub fn from_hour(hour: u32) -> Self {
        if hour < MORNING_END_HOUR {
            HalfDay::Morning
        } else {
            HalfDay::Evening
        }
    }

    /// Parse the period values the API uses (`DAY`, `MORNING`, `EVENING`,
    /// `morning`, `evening`)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "morning" => Some(HalfDay::Morning),
            "evening" => Some(HalfDay::Evening),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HalfDay::Morning => "morning",
            HalfDay::Evening => "evening",
        }
    }
}

/// Whether a submission can be made right now, and why not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// The given slot is open
    Open(HalfDay),
    /// The given slot has already been filled today
    AlreadySubmitted(HalfDay),
    /// Past noon with no morning entry; the server rejects evening entries
    MorningMissed,
    /// Past the end of the submission day
    Closed,
}

impl Eligibility {
    pub fn is_open(&self) -> bool {
        matches!(self, Eligibility::Open(_))
    }

    pub fn message(&self) -> String {
        match self {
            Eligibility::Open(half) => format!("The {} check-in is open", half.label()),
            Eligibility::AlreadySubmitted(half) => {
                format!("You already checked in this {}", half.label())
            }
            Eligibility::MorningMissed => {
                "Morning check-in was missed; evening check-in is unavailable today".to_string()
            }
            Eligibility::Closed => format!(
                "Check-ins are closed after {}:00, come back tomorrow",
                SUBMISSION_END_HOUR
            ),
        }
    }
}

/// Evaluate the submission rules for a local hour and today's entries
pub fn submission_eligibility(hour: u32, today: &[Emotion]) -> Eligibility {
    let has = |half: HalfDay| today.iter().any(|e| e.half_day() == Some(half));

    match HalfDay::from_hour(hour) {
        HalfDay::Morning => {
            if has(HalfDay::Morning) {
                Eligibility::AlreadySubmitted(HalfDay::Morning)
            } else {
                Eligibility::Open(HalfDay::Morning)
            }
        }
        HalfDay::Evening => {
            if has(HalfDay::Evening) {
                Eligibility::AlreadySubmitted(HalfDay::Evening)
            } else if hour >= SUBMISSION_END_HOUR {
                Eligibility::Closed
            } else if !has(HalfDay::Morning) {
                Eligibility::MorningMissed
            } else {
                Eligibility::Open(HalfDay::Evening)
            }
        }
    }
}

/// Current time in the configured UTC offset, or the machine's local
/// offset when none is configured
pub fn local_now(utc_offset_hours: Option<i32>) -> DateTime<FixedOffset> {
    let now = Utc::now();
    match utc_offset_hours.and_then(|h| FixedOffset::east_opt(h * 3600)) {
        Some(offset) => now.with_timezone(&offset),
        None => now.with_timezone(&Local).fixed_offset(),
    }
}

/// Half-day active at the given time
pub fn current_half_day(now: &DateTime<FixedOffset>) -> HalfDay {
    HalfDay::from_hour(now.hour())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(period: &str) -> Emotion {
        Emotion {
            id: 1,
            collaborator: None,
            emotion_type: 1,
            emotion_degree: 1,
            emotion_status: None,
            date: NaiveDate::from_ymd_opt(2025, 7, 10).expect("valid date"),
            submission_time: None,
            period: Some(period.to_string()),
            comment: None,
            relative_period: None,
            formatted_date: None,
        }
    }

    #[test]
    fn test_from_hour() {
        assert_eq!(HalfDay::from_hour(9), HalfDay::Morning);
        assert_eq!(HalfDay::from_hour(15), HalfDay::Evening);
        assert_eq!(HalfDay::from_hour(0), HalfDay::Morning);
        assert_eq!(HalfDay::from_hour(11), HalfDay::Morning);
        assert_eq!(HalfDay::from_hour(12), HalfDay::Evening);
        assert_eq!(HalfDay::from_hour(23), HalfDay::Evening);
    }

    #[test]
    fn test_parse() {
        assert_eq!(HalfDay::parse("DAY"), Some(HalfDay::Morning));
        assert_eq!(HalfDay::parse("MORNING"), Some(HalfDay::Morning));
        assert_eq!(HalfDay::parse("evening"), Some(HalfDay::Evening));
        assert_eq!(HalfDay::parse("night"), None);
    }

    #[test]
    fn test_morning_window() {
        assert_eq!(submission_eligibility(9, &[]), Eligibility::Open(HalfDay::Morning));
        assert_eq!(
            submission_eligibility(9, &[entry("DAY")]),
            Eligibility::AlreadySubmitted(HalfDay::Morning)
        );
    }

    #[test]
    fn test_evening_window() {
        assert_eq!(
            submission_eligibility(15, &[entry("DAY")]),
            Eligibility::Open(HalfDay::Evening)
        );
        assert_eq!(submission_eligibility(15, &[]), Eligibility::MorningMissed);
        assert_eq!(
            submission_eligibility(15, &[entry("DAY"), entry("EVENING")]),
            Eligibility::AlreadySubmitted(HalfDay::Evening)
        );
    }

    #[test]
    fn test_after_close() {
        assert_eq!(submission_eligibility(17, &[entry("DAY")]), Eligibility::Closed);
        assert_eq!(submission_eligibility(21, &[]), Eligibility::Closed);
        assert_eq!(
            submission_eligibility(18, &[entry("DAY"), entry("EVENING")]),
            Eligibility::AlreadySubmitted(HalfDay::Evening)
        );
    }

    #[test]
    fn test_eligibility_messages() {
        assert!(Eligibility::Open(HalfDay::Morning).is_open());
        assert!(!Eligibility::Closed.is_open());
        assert_eq!(
            Eligibility::Open(HalfDay::Evening).message(),
            "The evening check-in is open"
        );
        assert!(Eligibility::Closed.message().contains("17:00"));
    }

    #[test]
    fn test_local_now_fixed_offset() {
        let now = local_now(Some(3));
        assert_eq!(now.offset().local_minus_utc(), 3 * 3600);
    }
}
