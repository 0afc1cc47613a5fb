//! Risk Response
//!
//! The scoring service answers with a loosely typed object. Every field is
//! optional, and a nested `report` object carries human-readable fallbacks.
//! The response is kept as raw JSON and read through accessors so that an
//! unexpected shape never fails to decode.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::payload::WearableReadings;
use crate::value::display_text;

/// Report keys used as fallbacks for top-level fields
pub mod report_keys {
    pub const RISK_LEVEL: &str = "Risk Level";
    pub const RISK_PROBABILITY: &str = "Risk Probability (%)";
    pub const SUMMARY: &str = "Summary";
    pub const PERSONALIZED_ADVICE: &str = "Personalized Advice";
    pub const DATA_USED: &str = "Data Used";
}

/// Response body from the scoring endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskResponse(Value);

impl RiskResponse {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Raw top-level field, including an explicit `null`.
    /// Non-object responses have no fields.
    pub fn raw_field(&self, name: &str) -> Option<&Value> {
        self.0.as_object().and_then(|object| object.get(name))
    }

    /// Top-level field, treating `null` as absent
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.raw_field(name).filter(|v| !v.is_null())
    }

    /// Field of the nested `report` object, treating `null` as absent
    pub fn report_field(&self, name: &str) -> Option<&Value> {
        self.field("report")
            .and_then(Value::as_object)
            .and_then(|report| report.get(name))
            .filter(|v| !v.is_null())
    }

    /// Server-estimated wearable readings, as returned
    pub fn wearable_readings(&self) -> WearableReadings {
        WearableReadings {
            heart_rate: self.raw_field("heart_rate").cloned(),
            spo2: self.raw_field("spo2").cloned(),
            cough_count: self.raw_field("cough_count").cloned(),
        }
    }

    /// Text for a wearable input field; blank when the reading is absent
    pub fn wearable_text(&self, name: &str) -> String {
        self.field(name).map(display_text).unwrap_or_default()
    }
}

impl From<Value> for RiskResponse {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_access() {
        let response = RiskResponse::new(json!({
            "aqi": 80,
            "risk": null,
            "report": { "Risk Level": "High", "Summary": null }
        }));

        assert_eq!(response.field("aqi"), Some(&json!(80)));
        assert_eq!(response.field("risk"), None);
        assert_eq!(response.raw_field("risk"), Some(&Value::Null));
        assert_eq!(response.report_field(report_keys::RISK_LEVEL), Some(&json!("High")));
        assert_eq!(response.report_field(report_keys::SUMMARY), None);
    }

    #[test]
    fn test_non_object_response_has_no_fields() {
        for value in [json!(null), json!([1, 2]), json!("ok"), json!({"report": "text"})] {
            let response = RiskResponse::new(value);
            assert_eq!(response.field("aqi"), None);
            assert_eq!(response.report_field(report_keys::SUMMARY), None);
        }
    }

    #[test]
    fn test_wearable_readings() {
        let response = RiskResponse::new(json!({ "heart_rate": 91, "spo2": null }));
        let readings = response.wearable_readings();
        assert_eq!(readings.heart_rate, Some(json!(91)));
        assert_eq!(readings.spo2, Some(Value::Null));
        assert_eq!(readings.cough_count, None);

        assert_eq!(response.wearable_text("heart_rate"), "91");
        assert_eq!(response.wearable_text("spo2"), "");
        assert_eq!(response.wearable_text("cough_count"), "");
    }

    #[test]
    fn test_deserialize_transparent() {
        let response: RiskResponse = serde_json::from_str(r#"{"risk":"Low"}"#).unwrap();
        assert_eq!(response.field("risk"), Some(&json!("Low")));
    }
}
