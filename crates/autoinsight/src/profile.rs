//! Owner and vehicle profile records.
//!
//! This is the record the dashboard's personal-info form edits and the
//! registry link-up fills in. It is always stored sealed (see
//! [`crate::vault`]); this module only defines the shape and the
//! validation run before sealing.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The owner/vehicle record behind the personal-info tab.
///
/// Field names serialize in camelCase to stay wire-compatible with the
/// dashboard's JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleProfile {
    /// The owner's full name.
    pub full_name: String,

    /// Vehicle registration number (e.g. `MH01AB1234`).
    pub vehicle_number: String,

    /// Authority that issued the registration.
    pub registration_authority: String,

    /// Registration date, ISO `YYYY-MM-DD`.
    pub registration_date: String,

    /// Owner contact number.
    pub contact_number: String,

    /// Driving licence number.
    pub license_number: String,

    /// Owner photo URL, if one was provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl VehicleProfile {
    /// Validate the record before it is sealed and stored.
    ///
    /// `registration_patterns` is the configured set of acceptable
    /// registration-number formats; an empty set disables the format
    /// check. The registration date, when present, must be an ISO
    /// calendar date.
    ///
    /// # Errors
    ///
    /// Returns a [`Error::ProfileValidation`] describing the first
    /// field that failed.
    pub fn validate(&self, registration_patterns: &[Regex]) -> Result<()> {
        if self.full_name.trim().is_empty() {
            return Err(Error::profile_validation("full name must not be empty"));
        }

        if self.license_number.trim().is_empty() {
            return Err(Error::profile_validation("licence number must not be empty"));
        }

        if !registration_patterns.is_empty()
            && !registration_patterns
                .iter()
                .any(|p| p.is_match(&self.vehicle_number))
        {
            return Err(Error::profile_validation(format!(
                "vehicle number '{}' does not match any accepted registration format",
                self.vehicle_number
            )));
        }

        if !self.registration_date.is_empty()
            && NaiveDate::parse_from_str(&self.registration_date, "%Y-%m-%d").is_err()
        {
            return Err(Error::profile_validation(format!(
                "registration date '{}' is not a YYYY-MM-DD date",
                self.registration_date
            )));
        }

        Ok(())
    }
}

/// Default registration-number formats.
///
/// Matches the standard Indian series the registry mock hands out
/// (state code, RTO code, series letters, four digits).
#[must_use]
pub fn default_registration_patterns() -> Vec<String> {
    vec![r"^[A-Z]{2}[0-9]{2}[A-Z]{1,2}[0-9]{4}$".to_string()]
}

/// Compile a configured pattern list.
///
/// # Errors
///
/// Returns a [`Error::ConfigValidation`] naming the first pattern that
/// fails to compile. Configuration validates the same patterns at load
/// time, so this only fails for pattern lists built by hand.
pub fn compile_registration_patterns(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|_| Error::ConfigValidation {
                message: format!("invalid registration pattern: {pattern}"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> VehicleProfile {
        VehicleProfile {
            full_name: "John Doe".to_string(),
            vehicle_number: "MH01AB1234".to_string(),
            registration_authority: "RTO Mumbai (MH-01)".to_string(),
            registration_date: "2019-06-15".to_string(),
            contact_number: "+91 9876543210".to_string(),
            license_number: "DL-0420110012345".to_string(),
            photo_url: None,
        }
    }

    fn default_patterns() -> Vec<Regex> {
        compile_registration_patterns(&default_registration_patterns()).unwrap()
    }

    #[test]
    fn test_valid_profile_passes() {
        assert!(sample_profile().validate(&default_patterns()).is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut profile = sample_profile();
        profile.full_name = "   ".to_string();
        let err = profile.validate(&default_patterns()).unwrap_err();
        assert!(err.to_string().contains("full name"));
    }

    #[test]
    fn test_empty_licence_rejected() {
        let mut profile = sample_profile();
        profile.license_number = String::new();
        let err = profile.validate(&default_patterns()).unwrap_err();
        assert!(err.to_string().contains("licence number"));
    }

    #[test]
    fn test_bad_vehicle_number_rejected() {
        let mut profile = sample_profile();
        profile.vehicle_number = "not-a-plate".to_string();
        let err = profile.validate(&default_patterns()).unwrap_err();
        assert!(err.to_string().contains("not-a-plate"));
    }

    #[test]
    fn test_single_series_letter_accepted() {
        let mut profile = sample_profile();
        profile.vehicle_number = "KA05M4321".to_string();
        assert!(profile.validate(&default_patterns()).is_ok());
    }

    #[test]
    fn test_empty_pattern_list_disables_format_check() {
        let mut profile = sample_profile();
        profile.vehicle_number = "anything goes".to_string();
        assert!(profile.validate(&[]).is_ok());
    }

    #[test]
    fn test_bad_registration_date_rejected() {
        let mut profile = sample_profile();
        profile.registration_date = "15/06/2019".to_string();
        let err = profile.validate(&default_patterns()).unwrap_err();
        assert!(err.to_string().contains("15/06/2019"));
    }

    #[test]
    fn test_empty_registration_date_allowed() {
        let mut profile = sample_profile();
        profile.registration_date = String::new();
        assert!(profile.validate(&default_patterns()).is_ok());
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let json = serde_json::to_string(&sample_profile()).unwrap();
        assert!(json.contains("fullName"));
        assert!(json.contains("vehicleNumber"));
        assert!(json.contains("registrationAuthority"));
        assert!(json.contains("licenseNumber"));
        // No photo set, so the field is omitted entirely
        assert!(!json.contains("photoUrl"));
    }

    #[test]
    fn test_deserializes_app_json() {
        let json = r#"{
            "fullName": "John Doe",
            "vehicleNumber": "MH01AB1234",
            "registrationAuthority": "RTO Mumbai (MH-01)",
            "registrationDate": "2019-06-15",
            "contactNumber": "+91 9876543210",
            "licenseNumber": "DL-0420110012345",
            "photoUrl": "https://example.com/photo.jpg"
        }"#;
        let profile: VehicleProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.full_name, "John Doe");
        assert_eq!(
            profile.photo_url.as_deref(),
            Some("https://example.com/photo.jpg")
        );
    }

    #[test]
    fn test_default_patterns_compile() {
        assert!(!default_patterns().is_empty());
    }

    #[test]
    fn test_compile_rejects_invalid_pattern() {
        let result = compile_registration_patterns(&["[broken".to_string()]);
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }
}
