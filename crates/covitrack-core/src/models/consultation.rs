//! Consultation models.

use serde::{Deserialize, Serialize};

/// Doctor's advice for a completed test.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DoctorSuggestion {
    HomeQuarantine,
    Admitted,
    NoIssues,
}

/// Consultation attached when a doctor records their advice.
///
/// Created exactly once, at the update-consultation transition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Consultation {
    /// Doctor's suggestion
    pub suggestion: DoctorSuggestion,
    /// Free-text comments from the doctor
    pub comments: Option<String>,
    /// Doctor who recorded the consultation
    pub doctor_id: String,
    /// When the consultation was recorded
    pub updated_at: String,
}

/// Payload for the update-consultation transition.
///
/// `suggestion` is optional at the wire level so a missing field surfaces
/// as a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CreateConsultationRequest {
    pub suggestion: Option<DoctorSuggestion>,
    pub comments: Option<String>,
}

impl CreateConsultationRequest {
    /// Build the consultation record owned by `doctor_id`.
    ///
    /// Returns `None` when the required suggestion field is absent.
    pub fn into_consultation(self, doctor_id: &str) -> Option<Consultation> {
        Some(Consultation {
            suggestion: self.suggestion?,
            comments: self.comments,
            doctor_id: doctor_id.to_string(),
            updated_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_consultation() {
        let payload = CreateConsultationRequest {
            suggestion: Some(DoctorSuggestion::HomeQuarantine),
            comments: Some("take medicines at home".into()),
        };

        let consultation = payload.into_consultation("doctor-1").unwrap();
        assert_eq!(consultation.suggestion, DoctorSuggestion::HomeQuarantine);
        assert_eq!(consultation.doctor_id, "doctor-1");
    }

    #[test]
    fn test_missing_suggestion_rejected() {
        let payload = CreateConsultationRequest {
            suggestion: None,
            comments: Some("ok".into()),
        };
        assert!(payload.into_consultation("doctor-1").is_none());
    }

    #[test]
    fn test_suggestion_wire_format() {
        let json = serde_json::to_string(&DoctorSuggestion::HomeQuarantine).unwrap();
        assert_eq!(json, r#""HOME_QUARANTINE""#);
    }
}
