//! Cached User Profile
//!
//! The profile is written by the onboarding pages as a JSON object and read
//! once per dashboard load. Reading is lenient: a missing or unparseable entry
//! yields an empty profile, and non-string scalar fields are kept as text.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::value::{display_text, to_number};

/// Age used when the cached age is missing, not a number, or not positive
pub const DEFAULT_AGE: f64 = 30.0;

/// Condition value used when a condition field is left empty
pub const NO_CONDITION: &str = "none";

/// User profile as cached in client storage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<Value>,

    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub chronic_respiratory: Option<String>,

    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub heart_disease: Option<String>,

    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub smoking: Option<String>,
}

/// Profile with defaults applied and required fields checked
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedProfile {
    pub location: String,
    pub age: f64,
    pub chronic_respiratory: String,
    pub heart_disease: String,
    pub smoking: String,
}

/// Profile validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    /// One or more required fields are empty
    #[error("Profile incomplete, missing: {}", .missing.join(", "))]
    Incomplete { missing: Vec<&'static str> },
}

impl UserProfile {
    /// Parse the cached profile entry. Absent or invalid JSON gives an empty profile.
    pub fn from_storage(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };

        let fields = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => {
                tracing::warn!("Cached profile is not a JSON object, using empty profile");
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cached profile is not valid JSON, using empty profile");
                return Self::default();
            }
        };

        // Duplicate keys already collapsed to the last value in `fields`
        match Self::deserialize(Value::Object(fields)) {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(error = %e, "Cached profile has unreadable fields, using empty profile");
                Self::default()
            }
        }
    }

    /// Age after numeric coercion, falling back to [`DEFAULT_AGE`]
    pub fn effective_age(&self) -> f64 {
        let age = to_number(self.age.as_ref());
        if age.is_nan() || age <= 0.0 {
            DEFAULT_AGE
        } else {
            age
        }
    }

    /// Apply defaults and check that every field needed for a risk request is set
    pub fn validate(&self) -> Result<ValidatedProfile, ProfileError> {
        let chronic_respiratory = non_empty(&self.chronic_respiratory)
            .unwrap_or(NO_CONDITION)
            .to_string();
        let heart_disease = non_empty(&self.heart_disease)
            .unwrap_or(NO_CONDITION)
            .to_string();

        let location = non_empty(&self.location);
        let smoking = non_empty(&self.smoking);

        match (location, smoking) {
            (Some(location), Some(smoking)) => Ok(ValidatedProfile {
                location: location.to_string(),
                age: self.effective_age(),
                chronic_respiratory,
                heart_disease,
                smoking: smoking.to_string(),
            }),
            _ => {
                let mut missing = Vec::new();
                if location.is_none() {
                    missing.push("location");
                }
                if smoking.is_none() {
                    missing.push("smoking");
                }
                Err(ProfileError::Incomplete { missing })
            }
        }
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(display_text(&other)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delhi() -> UserProfile {
        UserProfile::from_storage(Some(
            r#"{"location":"Delhi","age":40,"chronicRespiratory":"asthma","heartDisease":"none","smoking":"never"}"#,
        ))
    }

    #[test]
    fn test_parse_complete_profile() {
        let profile = delhi();
        assert_eq!(profile.location.as_deref(), Some("Delhi"));
        assert_eq!(profile.chronic_respiratory.as_deref(), Some("asthma"));
        assert_eq!(profile.effective_age(), 40.0);

        let valid = profile.validate().unwrap();
        assert_eq!(valid.smoking, "never");
        assert_eq!(valid.heart_disease, "none");
    }

    #[test]
    fn test_absent_or_invalid_profile_is_empty() {
        assert_eq!(UserProfile::from_storage(None), UserProfile::default());
        assert_eq!(UserProfile::from_storage(Some("{not json")), UserProfile::default());
        assert_eq!(UserProfile::from_storage(Some("42")), UserProfile::default());
        assert_eq!(UserProfile::from_storage(Some("null")), UserProfile::default());
    }

    #[test]
    fn test_array_profile_is_not_read_positionally() {
        let profile =
            UserProfile::from_storage(Some(r#"["Delhi", 40, "asthma", "none", "never"]"#));
        assert_eq!(profile, UserProfile::default());
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_duplicate_keys_keep_last_value() {
        let profile = UserProfile::from_storage(Some(
            r#"{"location":"A","location":"Delhi","smoking":"never"}"#,
        ));
        assert_eq!(profile.location.as_deref(), Some("Delhi"));
        assert_eq!(profile.validate().unwrap().location, "Delhi");
    }

    #[test]
    fn test_age_coercion() {
        let mut profile = delhi();
        profile.age = Some(Value::from("52"));
        assert_eq!(profile.effective_age(), 52.0);

        profile.age = Some(Value::from("abc"));
        assert_eq!(profile.effective_age(), DEFAULT_AGE);

        profile.age = Some(Value::from(-4));
        assert_eq!(profile.effective_age(), DEFAULT_AGE);

        profile.age = Some(Value::from(0));
        assert_eq!(profile.effective_age(), DEFAULT_AGE);

        profile.age = None;
        assert_eq!(profile.effective_age(), DEFAULT_AGE);
    }

    #[test]
    fn test_conditions_default_to_none() {
        let profile = UserProfile::from_storage(Some(
            r#"{"location":"Pune","smoking":"former","chronicRespiratory":""}"#,
        ));
        let valid = profile.validate().unwrap();
        assert_eq!(valid.chronic_respiratory, NO_CONDITION);
        assert_eq!(valid.heart_disease, NO_CONDITION);
        assert_eq!(valid.age, DEFAULT_AGE);
    }

    #[test]
    fn test_missing_smoking_is_incomplete() {
        let mut profile = delhi();
        profile.smoking = None;
        assert_eq!(
            profile.validate(),
            Err(ProfileError::Incomplete { missing: vec!["smoking"] })
        );
    }

    #[test]
    fn test_empty_location_is_incomplete() {
        let profile = UserProfile::from_storage(Some(r#"{"location":"","smoking":"never"}"#));
        let err = profile.validate().unwrap_err();
        assert_eq!(err.to_string(), "Profile incomplete, missing: location");
    }

    #[test]
    fn test_non_string_fields_become_text() {
        let profile = UserProfile::from_storage(Some(r#"{"location":110001,"smoking":null}"#));
        assert_eq!(profile.location.as_deref(), Some("110001"));
        assert_eq!(profile.smoking, None);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(delhi()).unwrap();
        assert_eq!(json["chronicRespiratory"], "asthma");
        assert_eq!(json["heartDisease"], "none");
    }
}
