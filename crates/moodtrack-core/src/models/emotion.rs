use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::period::HalfDay;

/// The closed set of emotions a collaborator can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mood {
    Happy,
    Sad,
    Neutral,
    Angry,
    Excited,
    Anxious,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Excited,
        Mood::Happy,
        Mood::Neutral,
        Mood::Sad,
        Mood::Anxious,
        Mood::Angry,
    ];

    /// Degree the backend assigns to each emotion
    pub fn degree(&self) -> i64 {
        match self {
            Mood::Happy => 1,
            Mood::Sad => -1,
            Mood::Neutral => 0,
            Mood::Angry => -5,
            Mood::Excited => 5,
            Mood::Anxious => -2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Sad => "Sad",
            Mood::Neutral => "Neutral",
            Mood::Angry => "Angry",
            Mood::Excited => "Excited",
            Mood::Anxious => "Anxious",
        }
    }

    /// Fallback glyph when the catalog entry has no emoticon
    pub fn glyph(&self) -> &'static str {
        match self {
            Mood::Happy => ":)",
            Mood::Sad => ":(",
            Mood::Neutral => ":|",
            Mood::Angry => ">:(",
            Mood::Excited => ":D",
            Mood::Anxious => ":S",
        }
    }

    /// Classify a summed degree (weekly or monthly totals).
    ///
    /// - `<= -5` angry, `<= -2` anxious, `<= -1` sad
    /// - `0` neutral
    /// - `1..=4` happy, `>= 5` excited
    pub fn from_total(total: i64) -> Self {
        match total {
            t if t <= -5 => Mood::Angry,
            t if t <= -2 => Mood::Anxious,
            t if t <= -1 => Mood::Sad,
            0 => Mood::Neutral,
            t if t < 5 => Mood::Happy,
            _ => Mood::Excited,
        }
    }

    /// Classify an averaged degree (unit roll-ups).
    ///
    /// Same thresholds as [`Mood::from_total`]; averages strictly between
    /// -1 and 0 count as sad.
    pub fn from_average(average: f64) -> Self {
        if average <= -5.0 {
            Mood::Angry
        } else if average <= -2.0 {
            Mood::Anxious
        } else if average < 0.0 {
            Mood::Sad
        } else if average == 0.0 {
            Mood::Neutral
        } else if average < 5.0 {
            Mood::Happy
        } else {
            Mood::Excited
        }
    }
}

/// Catalog entry from `emotions/emotion-types/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionType {
    pub id: i64,
    pub name: Mood,
    #[serde(default)]
    pub emoticon: Option<String>,
    #[serde(default)]
    pub degree: Option<i64>,
}

impl EmotionType {
    pub fn degree(&self) -> i64 {
        self.degree.unwrap_or_else(|| self.name.degree())
    }

    pub fn display(&self) -> String {
        let glyph = self
            .emoticon
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| self.name.glyph());
        format!("{} {} ({:+})", glyph, self.name.label(), self.degree())
    }
}

/// A submitted emotion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Emotion {
    pub id: i64,
    #[serde(default)]
    pub collaborator: Option<i64>,
    pub emotion_type: i64,
    #[serde(default)]
    pub emotion_degree: i64,
    #[serde(default)]
    pub emotion_status: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub submission_time: Option<String>,
    #[serde(default, alias = "half_day")]
    pub period: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub relative_period: Option<String>,
    #[serde(default)]
    pub formatted_date: Option<String>,
}

impl Emotion {
    /// Which half-day the entry was recorded for, if the server said
    pub fn half_day(&self) -> Option<HalfDay> {
        self.period.as_deref().and_then(HalfDay::parse)
    }

    pub fn mood(&self) -> Mood {
        Mood::from_total(self.emotion_degree)
    }

    /// "HH:MM" part of the submission time
    pub fn submitted_at(&self) -> &str {
        self.submission_time
            .as_deref()
            .map(|t| t.get(..5).unwrap_or(t))
            .unwrap_or("--:--")
    }
}

/// Body of `POST emotions/submit/`
#[derive(Debug, Clone, Serialize)]
pub struct SubmitEmotion {
    pub emotion_type: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Mood bucket for a summed period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodSummary {
    #[serde(rename = "type")]
    pub mood: Mood,
    #[serde(default)]
    pub degree: i64,
    #[serde(default)]
    pub description: Option<String>,
}

/// Personal summary from `emotion-overview/overview/`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmotionOverview {
    #[serde(default)]
    pub today_morning: Option<Emotion>,
    #[serde(default)]
    pub today_evening: Option<Emotion>,
    #[serde(default)]
    pub today: Vec<Emotion>,
    #[serde(default)]
    pub week_degree: Option<i64>,
    #[serde(default)]
    pub week_emotion: Option<MoodSummary>,
    #[serde(default)]
    pub month_degree: Option<i64>,
    #[serde(default)]
    pub month_emotion: Option<MoodSummary>,
}

impl EmotionOverview {
    /// Weekly mood, derived from the degree when the server omits it
    pub fn week_mood(&self) -> Option<Mood> {
        self.week_emotion
            .as_ref()
            .map(|s| s.mood)
            .or_else(|| self.week_degree.map(Mood::from_total))
    }

    pub fn month_mood(&self) -> Option<Mood> {
        self.month_emotion
            .as_ref()
            .map(|s| s.mood)
            .or_else(|| self.month_degree.map(Mood::from_total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_from_total() {
        assert_eq!(Mood::from_total(-12), Mood::Angry);
        assert_eq!(Mood::from_total(-5), Mood::Angry);
        assert_eq!(Mood::from_total(-4), Mood::Anxious);
        assert_eq!(Mood::from_total(-2), Mood::Anxious);
        assert_eq!(Mood::from_total(-1), Mood::Sad);
        assert_eq!(Mood::from_total(0), Mood::Neutral);
        assert_eq!(Mood::from_total(1), Mood::Happy);
        assert_eq!(Mood::from_total(4), Mood::Happy);
        assert_eq!(Mood::from_total(5), Mood::Excited);
        assert_eq!(Mood::from_total(40), Mood::Excited);
    }

    #[test]
    fn test_mood_from_average() {
        assert_eq!(Mood::from_average(-5.0), Mood::Angry);
        assert_eq!(Mood::from_average(-2.5), Mood::Anxious);
        assert_eq!(Mood::from_average(-0.4), Mood::Sad);
        assert_eq!(Mood::from_average(0.0), Mood::Neutral);
        assert_eq!(Mood::from_average(0.25), Mood::Happy);
        assert_eq!(Mood::from_average(4.99), Mood::Happy);
        assert_eq!(Mood::from_average(5.0), Mood::Excited);
    }

    #[test]
    fn test_mood_degrees_match_catalog() {
        let degrees: Vec<i64> = Mood::ALL.iter().map(Mood::degree).collect();
        assert_eq!(degrees, vec![5, 1, 0, -1, -2, -5]);
    }

    #[test]
    fn test_parse_emotion() {
        let json = r#"{
            "id": 7, "collaborator": 3, "emotion_type": 2, "emotion_degree": -1,
            "emotion_status": "Négatif", "date": "2025-07-10",
            "submission_time": "09:14:22.510", "period": "DAY", "comment": null,
            "team": 1, "company": 1, "cluster": 1,
            "relative_period": "ce jour", "formatted_date": "10/07/2025 (matin, ce jour)"
        }"#;
        let emotion: Emotion = serde_json::from_str(json).expect("parse emotion");
        assert_eq!(emotion.half_day(), Some(HalfDay::Morning));
        assert_eq!(emotion.mood(), Mood::Sad);
        assert_eq!(emotion.submitted_at(), "09:14");
        assert_eq!(emotion.date, NaiveDate::from_ymd_opt(2025, 7, 10).expect("valid date"));
    }

    #[test]
    fn test_submitted_at_tolerates_odd_times() {
        let with_time = |time: &str| -> Emotion {
            let json = format!(
                r#"{{"id": 8, "emotion_type": 1, "emotion_degree": 1, "date": "2025-07-10", "submission_time": "{}"}}"#,
                time
            );
            serde_json::from_str(&json).expect("parse emotion")
        };
        assert_eq!(with_time("0910é").submitted_at(), "0910é");
        assert_eq!(with_time("9:05").submitted_at(), "9:05");
        assert_eq!(with_time("14:30:00").submitted_at(), "14:30");
    }

    #[test]
    fn test_parse_emotion_half_day_alias() {
        let json = r#"{"id": 1, "emotion_type": 1, "date": "2025-07-10", "half_day": "evening"}"#;
        let emotion: Emotion = serde_json::from_str(json).expect("parse emotion");
        assert_eq!(emotion.half_day(), Some(HalfDay::Evening));
        assert_eq!(emotion.submitted_at(), "--:--");
    }

    #[test]
    fn test_emotion_type_display() {
        let json = r#"[{"id": 1, "name": "HAPPY", "emoticon": "😊", "degree": 1},
                       {"id": 4, "name": "ANGRY", "emoticon": ""}]"#;
        let types: Vec<EmotionType> = serde_json::from_str(json).expect("parse types");
        assert_eq!(types[0].display(), "😊 Happy (+1)");
        assert_eq!(types[1].degree(), -5);
        assert_eq!(types[1].display(), ">:( Angry (-5)");
    }

    #[test]
    fn test_overview_moods() {
        let json = r#"{
            "today_morning": null, "today_evening": null, "today": [],
            "week_degree": 3,
            "week_emotion": {"type": "HAPPY", "degree": 1, "description": "Semaine positive"},
            "month_degree": -6, "month_emotion": null
        }"#;
        let overview: EmotionOverview = serde_json::from_str(json).expect("parse overview");
        assert_eq!(overview.week_mood(), Some(Mood::Happy));
        assert_eq!(overview.month_mood(), Some(Mood::Angry));
    }

    #[test]
    fn test_submit_body() {
        let body = serde_json::to_value(SubmitEmotion { emotion_type: 3, comment: None })
            .expect("serialize");
        assert_eq!(body, serde_json::json!({"emotion_type": 3}));
    }
}
