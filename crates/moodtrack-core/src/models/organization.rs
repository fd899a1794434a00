use serde::{Deserialize, Serialize};

use super::emotion::Mood;

/// Levels of the company hierarchy that aggregate emotion data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrgUnitKind {
    Service,
    Department,
    Entity,
    Cluster,
}

impl OrgUnitKind {
    pub const ALL: [OrgUnitKind; 4] = [
        OrgUnitKind::Service,
        OrgUnitKind::Department,
        OrgUnitKind::Entity,
        OrgUnitKind::Cluster,
    ];

    /// API route prefix serving this level's roll-ups
    pub fn endpoint(&self) -> &'static str {
        match self {
            OrgUnitKind::Service => "manager",
            OrgUnitKind::Department => "department",
            OrgUnitKind::Entity => "entity",
            OrgUnitKind::Cluster => "cluster",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrgUnitKind::Service => "Service",
            OrgUnitKind::Department => "Department",
            OrgUnitKind::Entity => "Entity",
            OrgUnitKind::Cluster => "Cluster",
        }
    }

    /// Parse a command-line name (`service`, `department`, ...)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "service" | "manager" => Some(OrgUnitKind::Service),
            "department" => Some(OrgUnitKind::Department),
            "entity" => Some(OrgUnitKind::Entity),
            "cluster" | "pole" => Some(OrgUnitKind::Cluster),
            _ => None,
        }
    }
}

/// Status label the server attaches to an average
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodStatus {
    pub status: Mood,
    #[serde(default)]
    pub description: Option<String>,
}

/// Average degree over one period (day, week or month)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeriodAverage {
    #[serde(default)]
    pub average: f64,
    #[serde(default)]
    pub collaborators_count: u32,
    #[serde(default)]
    pub participation_rate: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub status: Option<MoodStatus>,
}

impl PeriodAverage {
    pub fn mood(&self) -> Mood {
        self.status
            .as_ref()
            .map(|s| s.status)
            .unwrap_or_else(|| Mood::from_average(self.average))
    }

    /// Date span covered, e.g. "2025-07-07 → 2025-07-10"
    pub fn span(&self) -> String {
        match (&self.date, &self.start_date, &self.end_date) {
            (Some(date), _, _) => date.clone(),
            (None, Some(start), Some(end)) => format!("{} → {}", start, end),
            (None, Some(start), None) => start.clone(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeriodAverages {
    #[serde(default)]
    pub daily: PeriodAverage,
    #[serde(default)]
    pub weekly: PeriodAverage,
    #[serde(default)]
    pub monthly: PeriodAverage,
}

/// Roll-up for one organizational unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitOverview {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub emotions_average: PeriodAverages,
    #[serde(default)]
    pub emotions_summary: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_prefixes() {
        let prefixes: Vec<&str> = OrgUnitKind::ALL.iter().map(|k| k.endpoint()).collect();
        assert_eq!(prefixes, vec!["manager", "department", "entity", "cluster"]);
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(OrgUnitKind::parse("Service"), Some(OrgUnitKind::Service));
        assert_eq!(OrgUnitKind::parse(" cluster "), Some(OrgUnitKind::Cluster));
        assert_eq!(OrgUnitKind::parse("team"), None);
    }

    #[test]
    fn test_parse_unit_overview() {
        let json = r#"{
            "id": 2, "name": "Support",
            "emotions_average": {
                "daily": {"average": 1.5, "date": "2025-07-10", "collaborators_count": 4, "period": "Aujourd'hui",
                          "status": {"status": "HAPPY", "description": "Positif"}},
                "weekly": {"average": -0.5, "start_date": "2025-07-07", "end_date": "2025-07-10", "collaborators_count": 6},
                "monthly": {"average": 0, "start_date": "2025-07-01", "end_date": "2025-07-10", "collaborators_count": 6,
                            "participation_rate": 75.0}
            },
            "emotions_summary": "Moyennes des émotions pour Support"
        }"#;
        let unit: UnitOverview = serde_json::from_str(json).expect("parse unit");
        let avg = &unit.emotions_average;
        assert_eq!(avg.daily.mood(), Mood::Happy);
        assert_eq!(avg.daily.span(), "2025-07-10");
        assert_eq!(avg.weekly.mood(), Mood::Sad);
        assert_eq!(avg.weekly.span(), "2025-07-07 → 2025-07-10");
        assert_eq!(avg.monthly.mood(), Mood::Neutral);
        assert_eq!(avg.monthly.participation_rate, Some(75.0));
    }
}
