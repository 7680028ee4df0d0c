//! Element ids of the dashboard widgets

use super::models::StatCategory;

pub const STATS_ERROR: &str = "dashboardstatserror";
pub const AI_INSIGHTS_LIST: &str = "aiinsightslist";
pub const FEATURE_IMPORTANCE_CHART: &str = "featureimportancechart";

pub fn value(category: StatCategory) -> String {
    format!("{}value", category.slot_prefix())
}

pub fn change(category: StatCategory) -> String {
    format!("{}change", category.slot_prefix())
}

pub fn trend(category: StatCategory) -> String {
    format!("{}trend", category.slot_prefix())
}

/// Every dashboard slot id, stat cards first
pub fn all() -> Vec<String> {
    StatCategory::ALL
        .iter()
        .flat_map(|&category| [value(category), change(category), trend(category)])
        .chain(
            [STATS_ERROR, AI_INSIGHTS_LIST, FEATURE_IMPORTANCE_CHART]
                .iter()
                .map(|id| id.to_string()),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_ids() {
        assert_eq!(value(StatCategory::FloodedArea), "floodedareavalue");
        assert_eq!(trend(StatCategory::Rainfall), "rainfalltrend");
        let all = all();
        assert_eq!(all.len(), 15);
        assert!(all.contains(&"populationimpactedchange".to_string()));
    }
}
