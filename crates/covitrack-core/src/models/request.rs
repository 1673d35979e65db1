//! Test request model and the forward-only status enumeration.

use serde::{Deserialize, Serialize};

use super::{Consultation, LabResult};

/// Workflow status of a test request.
///
/// Strictly forward-moving; declaration order is the workflow order and
/// `Completed` is terminal. No backward transition exists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    /// Created, waiting for a tester to pick it up
    Initiated,
    /// Tester assigned, sample being tested
    LabTestInProgress,
    /// Lab result recorded, waiting for a doctor
    LabTestCompleted,
    /// Doctor assigned, consultation in progress
    DiagnosisInProcess,
    /// Consultation recorded; terminal
    Completed,
}

impl RequestStatus {
    /// Wire/store representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Initiated => "INITIATED",
            RequestStatus::LabTestInProgress => "LAB_TEST_IN_PROGRESS",
            RequestStatus::LabTestCompleted => "LAB_TEST_COMPLETED",
            RequestStatus::DiagnosisInProcess => "DIAGNOSIS_IN_PROCESS",
            RequestStatus::Completed => "COMPLETED",
        }
    }

    /// Parse the store representation.
    pub fn parse(s: &str) -> Option<RequestStatus> {
        match s {
            "INITIATED" => Some(RequestStatus::Initiated),
            "LAB_TEST_IN_PROGRESS" => Some(RequestStatus::LabTestInProgress),
            "LAB_TEST_COMPLETED" => Some(RequestStatus::LabTestCompleted),
            "DIAGNOSIS_IN_PROCESS" => Some(RequestStatus::DiagnosisInProcess),
            "COMPLETED" => Some(RequestStatus::Completed),
            _ => None,
        }
    }

    /// The status this one advances to, if any.
    pub fn next(&self) -> Option<RequestStatus> {
        match self {
            RequestStatus::Initiated => Some(RequestStatus::LabTestInProgress),
            RequestStatus::LabTestInProgress => Some(RequestStatus::LabTestCompleted),
            RequestStatus::LabTestCompleted => Some(RequestStatus::DiagnosisInProcess),
            RequestStatus::DiagnosisInProcess => Some(RequestStatus::Completed),
            RequestStatus::Completed => None,
        }
    }
}

/// A COVID-19 test request tracked through the lab-to-consultation workflow.
///
/// Invariants: `lab_result` is present iff the status has passed the lab
/// stage (LabTestCompleted or later); `consultation` is present iff the
/// status has passed the diagnosis stage (DiagnosisInProcess or later).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestRequest {
    /// Unique request ID
    pub request_id: String,
    /// Owning patient reference
    pub patient_id: String,
    /// Patient display name
    pub patient_name: String,
    /// Current workflow status
    pub status: RequestStatus,
    /// Tester assigned at the lab stage
    pub tester_id: Option<String>,
    /// Doctor assigned at the diagnosis stage
    pub doctor_id: Option<String>,
    /// Lab result, attached at the update-lab-test transition
    pub lab_result: Option<LabResult>,
    /// Consultation, attached at the update-consultation transition
    pub consultation: Option<Consultation>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl TestRequest {
    /// Create a new request at INITIATED for the given patient.
    pub fn new(patient_id: String, patient_name: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            patient_name,
            status: RequestStatus::Initiated,
            tester_id: None,
            doctor_id: None,
            lab_result: None,
            consultation: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Whether the sub-record invariants hold for the current status.
    pub fn invariants_hold(&self) -> bool {
        let lab_expected = self.status >= RequestStatus::LabTestCompleted;
        let consultation_expected = self.status >= RequestStatus::DiagnosisInProcess;
        self.lab_result.is_some() == lab_expected
            && self.consultation.is_some() == consultation_expected
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

/// One entry in the per-request transition audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowEntry {
    /// Request this entry belongs to
    pub request_id: String,
    /// Status before the transition
    pub from_status: RequestStatus,
    /// Status after the transition
    pub to_status: RequestStatus,
    /// User who performed the transition
    pub actor_id: String,
    /// When the transition happened
    pub happened_at: String,
}

impl FlowEntry {
    /// Record a transition performed by `actor_id`.
    pub fn new(
        request_id: String,
        from_status: RequestStatus,
        to_status: RequestStatus,
        actor_id: String,
    ) -> Self {
        Self {
            request_id,
            from_status,
            to_status,
            actor_id,
            happened_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_request() {
        let request = TestRequest::new("patient-1".into(), "John Doe".into());
        assert_eq!(request.status, RequestStatus::Initiated);
        assert!(request.tester_id.is_none());
        assert!(request.invariants_hold());
        assert_eq!(request.request_id.len(), 36); // UUID format
    }

    #[test]
    fn test_status_order_is_workflow_order() {
        assert!(RequestStatus::Initiated < RequestStatus::LabTestInProgress);
        assert!(RequestStatus::LabTestInProgress < RequestStatus::LabTestCompleted);
        assert!(RequestStatus::LabTestCompleted < RequestStatus::DiagnosisInProcess);
        assert!(RequestStatus::DiagnosisInProcess < RequestStatus::Completed);
    }

    #[test]
    fn test_status_next_chain() {
        let mut status = RequestStatus::Initiated;
        let mut steps = 0;
        while let Some(next) = status.next() {
            assert!(next > status);
            status = next;
            steps += 1;
        }
        assert_eq!(status, RequestStatus::Completed);
        assert_eq!(steps, 4);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            RequestStatus::Initiated,
            RequestStatus::LabTestInProgress,
            RequestStatus::LabTestCompleted,
            RequestStatus::DiagnosisInProcess,
            RequestStatus::Completed,
        ] {
            assert_eq!(RequestStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RequestStatus::parse("CANCELLED"), None);
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&RequestStatus::DiagnosisInProcess).unwrap();
        assert_eq!(json, r#""DIAGNOSIS_IN_PROCESS""#);
    }

    #[test]
    fn test_invariants_detect_missing_lab_result() {
        let mut request = TestRequest::new("patient-1".into(), "John Doe".into());
        request.status = RequestStatus::LabTestCompleted;
        assert!(!request.invariants_hold());
    }
}
