//! Text and markup produced for the dashboard widgets

use super::models::Insight;
use crate::dom::escape_html;

const MAX_FRACTION_DIGITS: usize = 3;

/// Formats `value` with comma thousands separators and at most three
/// fraction digits, trailing zeros dropped: `2847.0` becomes `"2,847"`.
pub fn group_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

pub const INSIGHTS_LOADING: &str = r#"<div class="loading">Loading AI insights...</div>"#;
pub const INSIGHTS_ERROR: &str = "Unable to load AI insights";
pub const STATS_ERROR: &str = "Unable to load statistics";

/// Card markup for one insight
pub fn insight_card(insight: &Insight) -> String {
    let confidence = insight.confidence;
    format!(
        concat!(
            r#"<div class="aiinsightcard">"#,
            r#"<div class="cardheader"><h3>{title}</h3>"#,
            r#"<span class="confidencebadge {class}">{confidence}% confidence</span></div>"#,
            r#"<p class="insightdescription">{description}</p>"#,
            r#"<div class="insightmeta">"#,
            r#"<span class="prioritybadge priority{priority}">{priority_label}</span>"#,
            r#"<span class="categorytag">{category}</span></div>"#,
            r#"<div class="confidencebarbackground">"#,
            r#"<div class="confidencebarforeground" style="width: {confidence}%;"></div>"#,
            r#"</div></div>"#,
        ),
        title = escape_html(&insight.title),
        class = insight.confidence_level().css_class(),
        confidence = confidence,
        description = escape_html(&insight.description),
        priority = insight.priority,
        priority_label = insight.priority.as_str().to_uppercase(),
        category = escape_html(&insight.category),
    )
}
