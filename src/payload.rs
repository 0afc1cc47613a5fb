//! Risk Request Payload
//!
//! Body of `POST /health-risk`. Wearable readings are flattened into the
//! top-level object and omitted entirely when not supplied.

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::profile::ValidatedProfile;
use crate::value::{number_value, parse_number};

/// Request body sent to the scoring endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskRequest {
    pub location: String,
    #[serde(serialize_with = "serialize_number")]
    pub age: f64,
    pub chronic_respiratory: String,
    pub heart_disease: String,
    pub smoking: String,
    #[serde(flatten)]
    pub wearable: Option<WearableReadings>,
}

/// Physiological readings attached to a request
///
/// Each reading is sent as given (including `null`) when present and left out
/// of the body when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WearableReadings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spo2: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cough_count: Option<Value>,
}

impl RiskRequest {
    /// Build a request from a validated profile. Conditions are lower-cased.
    pub fn new(profile: &ValidatedProfile, wearable: Option<WearableReadings>) -> Self {
        Self {
            location: profile.location.clone(),
            age: profile.age,
            chronic_respiratory: profile.chronic_respiratory.to_lowercase(),
            heart_disease: profile.heart_disease.to_lowercase(),
            smoking: profile.smoking.clone(),
            wearable,
        }
    }
}

impl WearableReadings {
    /// Readings from the three wearable input fields.
    ///
    /// Returns `None` unless all three inputs hold non-empty text. Text that is
    /// not a number is sent as `null`.
    pub fn from_inputs(
        heart_rate: Option<String>,
        spo2: Option<String>,
        cough_count: Option<String>,
    ) -> Option<Self> {
        let heart_rate = heart_rate.filter(|v| !v.is_empty())?;
        let spo2 = spo2.filter(|v| !v.is_empty())?;
        let cough_count = cough_count.filter(|v| !v.is_empty())?;

        Some(Self {
            heart_rate: Some(number_value(parse_number(&heart_rate))),
            spo2: Some(number_value(parse_number(&spo2))),
            cough_count: Some(number_value(parse_number(&cough_count))),
        })
    }
}

fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    number_value(*value).serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile() -> ValidatedProfile {
        ValidatedProfile {
            location: "Delhi".to_string(),
            age: 40.0,
            chronic_respiratory: "Asthma".to_string(),
            heart_disease: "None".to_string(),
            smoking: "never".to_string(),
        }
    }

    #[test]
    fn test_request_without_wearable() {
        let body = serde_json::to_value(RiskRequest::new(&profile(), None)).unwrap();
        assert_eq!(
            body,
            json!({
                "location": "Delhi",
                "age": 40,
                "chronic_respiratory": "asthma",
                "heart_disease": "none",
                "smoking": "never"
            })
        );
    }

    #[test]
    fn test_request_with_wearable_inputs() {
        let wearable = WearableReadings::from_inputs(
            Some("88".to_string()),
            Some("96.5".to_string()),
            Some("3".to_string()),
        );
        let body = serde_json::to_value(RiskRequest::new(&profile(), wearable)).unwrap();
        assert_eq!(body["heart_rate"], json!(88));
        assert_eq!(body["spo2"], json!(96.5));
        assert_eq!(body["cough_count"], json!(3));
    }

    #[test]
    fn test_wearable_requires_all_three_inputs() {
        assert_eq!(
            WearableReadings::from_inputs(Some("88".to_string()), Some("97".to_string()), None),
            None
        );
        assert_eq!(
            WearableReadings::from_inputs(
                Some("88".to_string()),
                Some(String::new()),
                Some("1".to_string())
            ),
            None
        );
    }

    #[test]
    fn test_unparseable_wearable_input_is_null() {
        let wearable = WearableReadings::from_inputs(
            Some("fast".to_string()),
            Some("97".to_string()),
            Some("0".to_string()),
        )
        .unwrap();
        let body = serde_json::to_value(RiskRequest::new(&profile(), Some(wearable))).unwrap();
        assert_eq!(body["heart_rate"], Value::Null);
        assert_eq!(body["cough_count"], json!(0));
    }

    #[test]
    fn test_partial_readings_omit_missing_fields() {
        let wearable = WearableReadings {
            heart_rate: Some(json!(72)),
            spo2: None,
            cough_count: Some(Value::Null),
        };
        let body = serde_json::to_value(RiskRequest::new(&profile(), Some(wearable))).unwrap();
        let object = body.as_object().unwrap();
        assert_eq!(object["heart_rate"], json!(72));
        assert!(!object.contains_key("spo2"));
        assert_eq!(object["cough_count"], Value::Null);
    }
}
