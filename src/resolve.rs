//! Display Field Resolution
//!
//! One function per display field, each applying that field's fallback order
//! against a [`RiskResponse`]. [`DashboardModel::from_response`] runs all of
//! them and is what the renderer writes to the view.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::response::{report_keys, RiskResponse};
use crate::value::{display_text, is_truthy};

/// Placeholder for a missing air-quality reading
pub const NOT_AVAILABLE: &str = "N/A";

/// Risk level shown when neither the response nor its report names one
pub const UNKNOWN_RISK: &str = "Unknown";

/// Highest AQI still considered good air
pub const GOOD_AQI_LIMIT: f64 = 50.0;

pub const GOOD_AIR_ADVICE: &str = "Good air quality.";
pub const DEGRADED_AIR_ADVICE: &str = "Air quality is degraded\u{2014}consider a mask outdoors.";

/// Visual class of the risk badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskClass {
    Good,
    Warning,
    Danger,
}

impl RiskClass {
    /// All badge classes, for clearing before a new one is applied
    pub const ALL: [RiskClass; 3] = [RiskClass::Good, RiskClass::Warning, RiskClass::Danger];

    /// Classify a risk level by case-insensitive substring.
    /// Anything not recognized as low or moderate is a danger.
    pub fn classify(risk: &str) -> Self {
        let risk = risk.to_lowercase();
        if risk.contains("low") {
            RiskClass::Good
        } else if risk.contains("moderate") || risk.contains("medium") {
            RiskClass::Warning
        } else {
            RiskClass::Danger
        }
    }

    /// CSS class applied to the badge element
    pub fn css_class(&self) -> &'static str {
        match self {
            RiskClass::Good => "status-good",
            RiskClass::Warning => "status-warning",
            RiskClass::Danger => "status-danger",
        }
    }
}

/// Everything the dashboard shows for one response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardModel {
    pub aqi: String,
    pub pm25: String,
    pub pm10: String,
    pub aqi_advice: String,
    pub risk: String,
    pub risk_class: RiskClass,
    pub probability: String,
    pub summary: String,
    pub advice: Vec<String>,
    pub data_used: Vec<(String, String)>,
}

impl DashboardModel {
    pub fn from_response(response: &RiskResponse) -> Self {
        let risk = risk_level(response);
        Self {
            aqi: reading_text(response, "aqi"),
            pm25: reading_text(response, "pm25"),
            pm10: reading_text(response, "pm10"),
            aqi_advice: aqi_advice(response).unwrap_or_default().to_string(),
            risk_class: RiskClass::classify(&risk),
            probability: probability_text(response),
            summary: summary(response, &risk),
            advice: advice_items(response),
            data_used: data_used_rows(response),
            risk,
        }
    }
}

/// Air-quality reading as shown, or [`NOT_AVAILABLE`]
pub fn reading_text(response: &RiskResponse, field: &str) -> String {
    response
        .field(field)
        .map(display_text)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Advice for the AQI, only when the AQI is a number
pub fn aqi_advice(response: &RiskResponse) -> Option<&'static str> {
    let aqi = response.field("aqi")?.as_f64()?;
    if aqi <= GOOD_AQI_LIMIT {
        Some(GOOD_AIR_ADVICE)
    } else {
        Some(DEGRADED_AIR_ADVICE)
    }
}

/// `risk`, then the report's risk level, then [`UNKNOWN_RISK`]
pub fn risk_level(response: &RiskResponse) -> String {
    truthy(response.field("risk"))
        .or_else(|| truthy(response.report_field(report_keys::RISK_LEVEL)))
        .map(display_text)
        .unwrap_or_else(|| UNKNOWN_RISK.to_string())
}

/// `risk_probability`, then the report's probability.
/// Blank unless the chosen value is a number.
pub fn probability_text(response: &RiskResponse) -> String {
    response
        .field("risk_probability")
        .or_else(|| response.report_field(report_keys::RISK_PROBABILITY))
        .filter(|v| v.is_number())
        .map(|v| format!("Risk Probability: {}%", display_text(v)))
        .unwrap_or_default()
}

/// The report's summary, else a sentence built from the resolved risk level
pub fn summary(response: &RiskResponse, risk: &str) -> String {
    truthy(response.report_field(report_keys::SUMMARY))
        .map(display_text)
        .unwrap_or_else(|| format!("Estimated status: {}.", risk))
}

/// `advice`, then the report's advice, as a list of bullet-free lines
pub fn advice_items(response: &RiskResponse) -> Vec<String> {
    let Some(advice) = truthy(response.field("advice"))
        .or_else(|| truthy(response.report_field(report_keys::PERSONALIZED_ADVICE)))
    else {
        return Vec::new();
    };

    let entries: Vec<&Value> = match advice {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    entries
        .into_iter()
        .filter(|entry| is_truthy(entry))
        .map(|entry| strip_bullet(&display_text(entry)).to_string())
        .collect()
}

/// Remove one leading `-` or `•` bullet and the whitespace around it
pub fn strip_bullet(line: &str) -> &str {
    static BULLET: OnceLock<Regex> = OnceLock::new();
    let bullet = BULLET.get_or_init(|| Regex::new(r"^\s*[\x{2022}\-]\s*").expect("valid bullet pattern"));

    match bullet.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// The report's "Data Used" entries as `(key, value)` rows, in server order
pub fn data_used_rows(response: &RiskResponse) -> Vec<(String, String)> {
    match truthy(response.report_field(report_keys::DATA_USED)) {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(key, value)| (key.clone(), display_text(value)))
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, value)| (i.to_string(), display_text(value)))
            .collect(),
        Some(Value::String(s)) => s
            .chars()
            .enumerate()
            .map(|(i, c)| (i.to_string(), c.to_string()))
            .collect(),
        _ => Vec::new(),
    }
}

fn truthy(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| is_truthy(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: Value) -> RiskResponse {
        RiskResponse::new(value)
    }

    #[test]
    fn test_empty_response_defaults() {
        let model = DashboardModel::from_response(&response(json!({})));
        assert_eq!(model.aqi, NOT_AVAILABLE);
        assert_eq!(model.pm25, NOT_AVAILABLE);
        assert_eq!(model.pm10, NOT_AVAILABLE);
        assert_eq!(model.aqi_advice, "");
        assert_eq!(model.risk, UNKNOWN_RISK);
        assert_eq!(model.risk_class, RiskClass::Danger);
        assert_eq!(model.probability, "");
        assert_eq!(model.summary, "Estimated status: Unknown.");
        assert!(model.advice.is_empty());
        assert!(model.data_used.is_empty());
    }

    #[test]
    fn test_risk_class_selection() {
        assert_eq!(RiskClass::classify("Low Risk"), RiskClass::Good);
        assert_eq!(RiskClass::classify("LOW"), RiskClass::Good);
        assert_eq!(RiskClass::classify("Moderate"), RiskClass::Warning);
        assert_eq!(RiskClass::classify("medium risk"), RiskClass::Warning);
        assert_eq!(RiskClass::classify("High"), RiskClass::Danger);
        assert_eq!(RiskClass::classify("Unknown"), RiskClass::Danger);
        assert_eq!(RiskClass::classify("Error: timeout"), RiskClass::Danger);
    }

    #[test]
    fn test_aqi_advice_threshold() {
        assert_eq!(aqi_advice(&response(json!({"aqi": 50}))), Some(GOOD_AIR_ADVICE));
        assert_eq!(aqi_advice(&response(json!({"aqi": 50.5}))), Some(DEGRADED_AIR_ADVICE));
        assert_eq!(aqi_advice(&response(json!({"aqi": "42"}))), None);
        assert_eq!(reading_text(&response(json!({"aqi": "42"})), "aqi"), "42");
    }

    #[test]
    fn test_top_level_fields_take_precedence() {
        let r = response(json!({
            "risk": "Low",
            "risk_probability": 12,
            "advice": ["Walk outside"],
            "report": {
                "Risk Level": "High",
                "Risk Probability (%)": 80,
                "Personalized Advice": ["Stay in"]
            }
        }));
        assert_eq!(risk_level(&r), "Low");
        assert_eq!(probability_text(&r), "Risk Probability: 12%");
        assert_eq!(advice_items(&r), vec!["Walk outside"]);
    }

    #[test]
    fn test_report_fallbacks() {
        let r = response(json!({
            "risk": "",
            "report": {
                "Risk Level": "Medium",
                "Risk Probability (%)": 47.5,
                "Summary": "Moderate exposure today.",
                "Personalized Advice": "\u{2022} Limit outdoor exercise",
                "Data Used": { "AQI": "140", "Age": 40 }
            }
        }));
        let model = DashboardModel::from_response(&r);
        assert_eq!(model.risk, "Medium");
        assert_eq!(model.risk_class, RiskClass::Warning);
        assert_eq!(model.probability, "Risk Probability: 47.5%");
        assert_eq!(model.summary, "Moderate exposure today.");
        assert_eq!(model.advice, vec!["Limit outdoor exercise"]);
        assert_eq!(
            model.data_used,
            vec![
                ("AQI".to_string(), "140".to_string()),
                ("Age".to_string(), "40".to_string())
            ]
        );
    }

    #[test]
    fn test_probability_must_be_numeric() {
        let r = response(json!({
            "risk_probability": "62",
            "report": { "Risk Probability (%)": 62 }
        }));
        assert_eq!(probability_text(&r), "");
    }

    #[test]
    fn test_null_probability_falls_back() {
        let r = response(json!({
            "risk_probability": null,
            "report": { "Risk Probability (%)": 30 }
        }));
        assert_eq!(probability_text(&r), "Risk Probability: 30%");
    }

    #[test]
    fn test_strip_bullet() {
        assert_eq!(strip_bullet("- wear a mask"), "wear a mask");
        assert_eq!(strip_bullet("  \u{2022}  keep windows shut"), "keep windows shut");
        assert_eq!(strip_bullet("plain text"), "plain text");
        assert_eq!(strip_bullet("--double"), "-double");
        assert_eq!(strip_bullet("well-ventilated"), "well-ventilated");
    }

    #[test]
    fn test_advice_drops_empty_entries() {
        let r = response(json!({ "advice": ["- Stay indoors", "", null, "Use a mask"] }));
        assert_eq!(advice_items(&r), vec!["Stay indoors", "Use a mask"]);
    }

    #[test]
    fn test_data_used_preserves_server_order() {
        let r = response(json!({
            "report": { "Data Used": { "PM10": "88", "AQI": "120", "Location": "Delhi" } }
        }));
        let keys: Vec<_> = data_used_rows(&r).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["PM10", "AQI", "Location"]);
    }

    #[test]
    fn test_delhi_example() {
        let r = response(json!({
            "aqi": 120,
            "risk": "Moderate Risk",
            "risk_probability": 62,
            "advice": ["- Stay indoors", "Use a mask"]
        }));
        let model = DashboardModel::from_response(&r);
        assert_eq!(model.aqi, "120");
        assert_eq!(model.aqi_advice, DEGRADED_AIR_ADVICE);
        assert_eq!(model.risk, "Moderate Risk");
        assert_eq!(model.risk_class, RiskClass::Warning);
        assert_eq!(model.probability, "Risk Probability: 62%");
        assert_eq!(model.summary, "Estimated status: Moderate Risk.");
        assert_eq!(model.advice, vec!["Stay indoors", "Use a mask"]);
    }
}
