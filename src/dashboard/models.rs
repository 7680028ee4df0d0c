//! Payloads served by the dashboard API

use serde::{Deserialize, Serialize};
use std::fmt;

/// One statistic card: a number plus two free-form strings shown verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatCard {
    pub value: f64,
    pub change: String,
    pub trend: String,
}

/// Body of `/api/dashboard/keystats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyStats {
    pub flooded_area: StatCard,
    pub population_impacted: StatCard,
    pub affected_villages: StatCard,
    pub rainfall: StatCard,
}

impl KeyStats {
    pub fn card(&self, category: StatCategory) -> &StatCard {
        match category {
            StatCategory::FloodedArea => &self.flooded_area,
            StatCategory::PopulationImpacted => &self.population_impacted,
            StatCategory::AffectedVillages => &self.affected_villages,
            StatCategory::Rainfall => &self.rainfall,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatCategory {
    FloodedArea,
    PopulationImpacted,
    AffectedVillages,
    Rainfall,
}

impl StatCategory {
    pub const ALL: [StatCategory; 4] = [
        StatCategory::FloodedArea,
        StatCategory::PopulationImpacted,
        StatCategory::AffectedVillages,
        StatCategory::Rainfall,
    ];

    /// Prefix shared by the card's `value`, `change` and `trend` element ids
    pub fn slot_prefix(&self) -> &'static str {
        match self {
            StatCategory::FloodedArea => "floodedarea",
            StatCategory::PopulationImpacted => "populationimpacted",
            StatCategory::AffectedVillages => "affectedvillages",
            StatCategory::Rainfall => "rainfall",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    /// 90 and above is high, 75 and above medium
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 90.0 {
            ConfidenceLevel::High
        } else if confidence >= 75.0 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "highconfidence",
            ConfidenceLevel::Medium => "mediumconfidence",
            ConfidenceLevel::Low => "lowconfidence",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub description: String,
    /// Percentage, 0 to 100
    pub confidence: f64,
    pub priority: Priority,
    pub category: String,
}

impl Insight {
    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_confidence(self.confidence)
    }
}

/// Body of `/api/reports/aiinsights`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsReport {
    pub insights: Vec<Insight>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub model_version: Option<String>,
}
