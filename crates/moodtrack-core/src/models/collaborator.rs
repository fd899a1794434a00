use serde::{Deserialize, Serialize};

use super::emotion::{Mood, MoodSummary};

/// Position of a collaborator in the company hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Employee,
    Manager,
    Director,
    PoleDirector,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Employee => "Employee",
            Role::Manager => "Manager",
            Role::Director => "Director",
            Role::PoleDirector => "Cluster Director",
        }
    }
}

/// The authenticated user's profile from `auth/me/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collaborator {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub team: Option<i64>,
    #[serde(default)]
    pub company: Option<i64>,
    #[serde(default)]
    pub cluster: Option<i64>,
    #[serde(default)]
    pub manager: Option<i64>,
}

impl Collaborator {
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.username.clone()
        } else {
            name.to_string()
        }
    }
}

/// Weekly/monthly totals attached to a list row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendTotals {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub emotion: Option<MoodSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EmotionTrends {
    #[serde(default)]
    pub week: Option<TrendTotals>,
    #[serde(default)]
    pub month: Option<TrendTotals>,
}

/// One row of a unit's collaborator list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaboratorSummary {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub has_submitted_morning_emotion: Option<bool>,
    #[serde(default)]
    pub emotion_trend: Option<String>,
    #[serde(default)]
    pub emotion_trends: EmotionTrends,
}

impl CollaboratorSummary {
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.username.clone()
        } else {
            name.to_string()
        }
    }

    pub fn week_total(&self) -> Option<i64> {
        self.emotion_trends.week.as_ref().map(|w| w.total)
    }

    pub fn week_mood(&self) -> Option<Mood> {
        self.emotion_trends.week.as_ref().map(|w| {
            w.emotion
                .as_ref()
                .map(|e| e.mood)
                .unwrap_or_else(|| Mood::from_total(w.total))
        })
    }
}
