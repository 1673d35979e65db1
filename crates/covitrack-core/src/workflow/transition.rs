//! Pure transition decisions for the request status state machine.

use crate::models::{
    CreateConsultationRequest, CreateLabResult, RequestStatus, Role, TestRequest, User,
};

use super::WorkflowError;

/// A workflow action requested by an actor.
#[derive(Debug, Clone)]
pub enum Action {
    /// Tester picks up an initiated request
    AssignForLabTest,
    /// Tester records the lab result
    UpdateLabTest(CreateLabResult),
    /// Doctor picks up a tested request
    AssignForConsultation,
    /// Doctor records the consultation
    UpdateConsultation(CreateConsultationRequest),
}

impl Action {
    /// Human-readable action name for error messages and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Action::AssignForLabTest => "assign-for-lab-test",
            Action::UpdateLabTest(_) => "update-lab-test",
            Action::AssignForConsultation => "assign-for-consultation",
            Action::UpdateConsultation(_) => "update-consultation",
        }
    }

    /// Role allowed to perform this action.
    pub fn required_role(&self) -> Role {
        match self {
            Action::AssignForLabTest | Action::UpdateLabTest(_) => Role::Tester,
            Action::AssignForConsultation | Action::UpdateConsultation(_) => Role::Doctor,
        }
    }

    /// Exact status a request must be in for this action.
    pub fn expected_status(&self) -> RequestStatus {
        match self {
            Action::AssignForLabTest => RequestStatus::Initiated,
            Action::UpdateLabTest(_) => RequestStatus::LabTestInProgress,
            Action::AssignForConsultation => RequestStatus::LabTestCompleted,
            Action::UpdateConsultation(_) => RequestStatus::DiagnosisInProcess,
        }
    }
}

/// Decide a transition: `(current status, action, actor role, payload)` →
/// the advanced request, or a rejection.
///
/// Pure: no store access, no clock beyond timestamping the mutated copy.
/// Checks run in order: actor role, exact source status, payload fields.
/// The returned request carries the new status, the assignment, and the
/// attached sub-record together, so the caller can persist them atomically.
pub fn decide(request: &TestRequest, action: Action, actor: &User) -> Result<TestRequest, WorkflowError> {
    let required = action.required_role();
    if actor.role != required {
        return Err(WorkflowError::Forbidden {
            role: actor.role.as_str(),
            action: action.name(),
        });
    }

    let expected = action.expected_status();
    if request.status != expected {
        return Err(WorkflowError::WrongState {
            request_id: request.request_id.clone(),
            expected: expected.as_str(),
            actual: request.status.as_str(),
        });
    }

    let mut updated = request.clone();
    match action {
        Action::AssignForLabTest => {
            updated.status = RequestStatus::LabTestInProgress;
            updated.tester_id = Some(actor.id.clone());
        }
        Action::UpdateLabTest(payload) => {
            let lab_result = payload
                .into_lab_result(&actor.id)
                .ok_or_else(|| WorkflowError::Validation("result must not be null".into()))?;
            updated.status = RequestStatus::LabTestCompleted;
            updated.lab_result = Some(lab_result);
        }
        Action::AssignForConsultation => {
            updated.status = RequestStatus::DiagnosisInProcess;
            updated.doctor_id = Some(actor.id.clone());
        }
        Action::UpdateConsultation(payload) => {
            let consultation = payload
                .into_consultation(&actor.id)
                .ok_or_else(|| WorkflowError::Validation("suggestion must not be null".into()))?;
            updated.status = RequestStatus::Completed;
            updated.consultation = Some(consultation);
        }
    }
    updated.touch();

    debug_assert!(updated.invariants_hold());
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DoctorSuggestion, TestStatus};

    fn tester() -> User {
        User::new("tester".into(), Role::Tester)
    }

    fn doctor() -> User {
        User::new("doctor".into(), Role::Doctor)
    }

    fn request_at(status: RequestStatus) -> TestRequest {
        let mut request = TestRequest::new("patient-1".into(), "John Doe".into());
        request.status = status;
        if status >= RequestStatus::LabTestInProgress {
            request.tester_id = Some("tester-1".into());
        }
        if status >= RequestStatus::LabTestCompleted {
            request.lab_result = CreateLabResult {
                result: Some(TestStatus::Positive),
                ..Default::default()
            }
            .into_lab_result("tester-1");
        }
        if status >= RequestStatus::DiagnosisInProcess {
            request.doctor_id = Some("doctor-1".into());
        }
        request
    }

    #[test]
    fn test_assign_for_lab_test() {
        let actor = tester();
        let updated = decide(
            &request_at(RequestStatus::Initiated),
            Action::AssignForLabTest,
            &actor,
        )
        .unwrap();
        assert_eq!(updated.status, RequestStatus::LabTestInProgress);
        assert_eq!(updated.tester_id, Some(actor.id));
    }

    #[test]
    fn test_update_lab_test_attaches_result() {
        let actor = tester();
        let payload = CreateLabResult {
            result: Some(TestStatus::Negative),
            temperature: Some("98.6".into()),
            ..Default::default()
        };
        let updated = decide(
            &request_at(RequestStatus::LabTestInProgress),
            Action::UpdateLabTest(payload),
            &actor,
        )
        .unwrap();
        assert_eq!(updated.status, RequestStatus::LabTestCompleted);
        let lab = updated.lab_result.unwrap();
        assert_eq!(lab.result, TestStatus::Negative);
        assert_eq!(lab.tester_id, actor.id);
    }

    #[test]
    fn test_update_lab_test_requires_result() {
        let result = decide(
            &request_at(RequestStatus::LabTestInProgress),
            Action::UpdateLabTest(CreateLabResult::default()),
            &tester(),
        );
        assert!(matches!(result, Err(WorkflowError::Validation(_))));
    }

    #[test]
    fn test_assign_for_consultation() {
        let actor = doctor();
        let updated = decide(
            &request_at(RequestStatus::LabTestCompleted),
            Action::AssignForConsultation,
            &actor,
        )
        .unwrap();
        assert_eq!(updated.status, RequestStatus::DiagnosisInProcess);
        assert_eq!(updated.doctor_id, Some(actor.id));
    }

    #[test]
    fn test_update_consultation_attaches_record() {
        let actor = doctor();
        let payload = CreateConsultationRequest {
            suggestion: Some(DoctorSuggestion::HomeQuarantine),
            comments: Some("take medicines at home".into()),
        };
        let updated = decide(
            &request_at(RequestStatus::DiagnosisInProcess),
            Action::UpdateConsultation(payload),
            &actor,
        )
        .unwrap();
        assert_eq!(updated.status, RequestStatus::Completed);
        let consultation = updated.consultation.unwrap();
        assert_eq!(consultation.suggestion, DoctorSuggestion::HomeQuarantine);
        assert_eq!(consultation.doctor_id, actor.id);
    }

    #[test]
    fn test_update_consultation_requires_suggestion() {
        let result = decide(
            &request_at(RequestStatus::DiagnosisInProcess),
            Action::UpdateConsultation(CreateConsultationRequest::default()),
            &doctor(),
        );
        assert!(matches!(result, Err(WorkflowError::Validation(_))));
    }

    #[test]
    fn test_role_is_checked_before_state() {
        // A doctor poking a lab action is a role failure even when the
        // request is also in the wrong status.
        let result = decide(
            &request_at(RequestStatus::Completed),
            Action::AssignForLabTest,
            &doctor(),
        );
        assert!(matches!(result, Err(WorkflowError::Forbidden { .. })));
    }

    #[test]
    fn test_wrong_state_rejected() {
        let result = decide(
            &request_at(RequestStatus::LabTestCompleted),
            Action::UpdateConsultation(CreateConsultationRequest {
                suggestion: Some(DoctorSuggestion::NoIssues),
                comments: None,
            }),
            &doctor(),
        );
        assert!(matches!(result, Err(WorkflowError::WrongState { .. })));
    }

    #[test]
    fn test_terminal_state_has_no_transitions() {
        let request = request_at(RequestStatus::Completed);
        let result = decide(&request, Action::AssignForConsultation, &doctor());
        assert!(matches!(result, Err(WorkflowError::WrongState { .. })));
    }

    #[test]
    fn test_no_backward_transition() {
        for status in [
            RequestStatus::LabTestInProgress,
            RequestStatus::LabTestCompleted,
            RequestStatus::DiagnosisInProcess,
            RequestStatus::Completed,
        ] {
            let request = request_at(status);
            if let Ok(updated) = decide(&request, Action::AssignForLabTest, &tester()) {
                panic!("unexpected transition from {:?} to {:?}", status, updated.status);
            }
        }
    }
}
