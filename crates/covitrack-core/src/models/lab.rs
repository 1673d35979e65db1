//! Lab result models.

use serde::{Deserialize, Serialize};

/// Outcome of a lab test.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestStatus {
    Positive,
    Negative,
}

/// Lab result attached when a tester records the test outcome.
///
/// Created exactly once, at the update-lab-test transition. Immutable
/// afterward.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabResult {
    /// Test outcome
    pub result: TestStatus,
    /// Body temperature reading
    pub temperature: Option<String>,
    /// Blood oxygen saturation reading
    pub oxygen_level: Option<String>,
    /// Heart rate reading
    pub heart_beat: Option<String>,
    /// Free-text comments from the tester
    pub comments: Option<String>,
    /// Tester who recorded the result
    pub tester_id: String,
    /// When the result was recorded
    pub updated_at: String,
}

/// Payload for the update-lab-test transition.
///
/// `result` is optional at the wire level so a missing field surfaces as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CreateLabResult {
    pub result: Option<TestStatus>,
    pub temperature: Option<String>,
    pub oxygen_level: Option<String>,
    pub heart_beat: Option<String>,
    pub comments: Option<String>,
}

impl CreateLabResult {
    /// Build the immutable lab result owned by `tester_id`.
    ///
    /// Returns `None` when the required result field is absent.
    pub fn into_lab_result(self, tester_id: &str) -> Option<LabResult> {
        Some(LabResult {
            result: self.result?,
            temperature: self.temperature,
            oxygen_level: self.oxygen_level,
            heart_beat: self.heart_beat,
            comments: self.comments,
            tester_id: tester_id.to_string(),
            updated_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_lab_result() {
        let payload = CreateLabResult {
            result: Some(TestStatus::Positive),
            temperature: Some("99.1".into()),
            oxygen_level: Some("94".into()),
            heart_beat: Some("82".into()),
            comments: Some("mild symptoms".into()),
        };

        let lab = payload.into_lab_result("tester-1").unwrap();
        assert_eq!(lab.result, TestStatus::Positive);
        assert_eq!(lab.tester_id, "tester-1");
        assert_eq!(lab.temperature, Some("99.1".into()));
    }

    #[test]
    fn test_missing_result_rejected() {
        let payload = CreateLabResult {
            comments: Some("forgot the outcome".into()),
            ..Default::default()
        };
        assert!(payload.into_lab_result("tester-1").is_none());
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&TestStatus::Positive).unwrap();
        assert_eq!(json, r#""POSITIVE""#);
    }
}
