//! The request status state machine and its services.
//!
//! Pipeline: load request → pure transition decision → atomic store apply

mod transition;

pub use transition::*;

use crate::db::{Database, DbError};
use crate::models::{FlowEntry, RequestStatus, TestRequest, User};
use thiserror::Error;

/// Workflow errors.
///
/// `NotFound` and `Validation` are the two boundary-visible input errors;
/// callers map each to a different response. `WrongState` is the rejection
/// for a request that has already advanced past the action's source status.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Invalid ID: {0}")]
    NotFound(String),

    #[error("constraint violation: {0}")]
    Validation(String),

    #[error("invalid state: request {request_id} is {actual}, expected {expected}")]
    WrongState {
        request_id: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("role {role} is not allowed to {action}")]
    Forbidden {
        role: &'static str,
        action: &'static str,
    },

    #[error("database error: {0}")]
    Database(#[from] DbError),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Applies workflow transitions against the store.
///
/// Each call is one unit of work: load the row, run the pure decision,
/// persist status + sub-record + flow entry in a single transaction.
pub struct UpdateService<'a> {
    db: &'a mut Database,
}

impl<'a> UpdateService<'a> {
    /// Create a new update service.
    pub fn new(db: &'a mut Database) -> Self {
        Self { db }
    }

    /// Assign an initiated request to the acting tester.
    pub fn assign_for_lab_test(&mut self, request_id: &str, actor: &User) -> WorkflowResult<TestRequest> {
        self.apply(request_id, Action::AssignForLabTest, actor)
    }

    /// Record the lab result and complete the lab stage.
    pub fn update_lab_test(
        &mut self,
        request_id: &str,
        payload: crate::models::CreateLabResult,
        actor: &User,
    ) -> WorkflowResult<TestRequest> {
        self.apply(request_id, Action::UpdateLabTest(payload), actor)
    }

    /// Assign a tested request to the acting doctor.
    pub fn assign_for_consultation(
        &mut self,
        request_id: &str,
        actor: &User,
    ) -> WorkflowResult<TestRequest> {
        self.apply(request_id, Action::AssignForConsultation, actor)
    }

    /// Record the consultation and complete the request.
    pub fn update_consultation(
        &mut self,
        request_id: &str,
        payload: crate::models::CreateConsultationRequest,
        actor: &User,
    ) -> WorkflowResult<TestRequest> {
        self.apply(request_id, Action::UpdateConsultation(payload), actor)
    }

    fn apply(&mut self, request_id: &str, action: Action, actor: &User) -> WorkflowResult<TestRequest> {
        let request = self
            .db
            .get_request(request_id)?
            .ok_or_else(|| WorkflowError::NotFound(request_id.to_string()))?;

        let from_status = request.status;
        let updated = decide(&request, action, actor)?;

        let flow = FlowEntry::new(
            updated.request_id.clone(),
            from_status,
            updated.status,
            actor.id.clone(),
        );
        self.db.apply_transition(&updated, from_status, &flow)?;
        Ok(updated)
    }
}

/// Read-side queries over the store. No mutation.
pub struct QueryService<'a> {
    db: &'a Database,
}

impl<'a> QueryService<'a> {
    /// Create a new query service.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// All requests currently in the given status.
    pub fn find_by_status(&self, status: RequestStatus) -> WorkflowResult<Vec<TestRequest>> {
        Ok(self.db.list_requests_by_status(status)?)
    }

    /// All requests assigned to the given tester.
    pub fn find_for_tester(&self, tester: &User) -> WorkflowResult<Vec<TestRequest>> {
        Ok(self.db.list_requests_for_tester(&tester.id)?)
    }

    /// All requests assigned to the given doctor.
    pub fn find_for_doctor(&self, doctor: &User) -> WorkflowResult<Vec<TestRequest>> {
        Ok(self.db.list_requests_for_doctor(&doctor.id)?)
    }

    /// All requests, regardless of status.
    pub fn find_all(&self) -> WorkflowResult<Vec<TestRequest>> {
        Ok(self.db.list_all_requests()?)
    }

    /// The transition audit trail for a request.
    pub fn flow_for_request(&self, request_id: &str) -> WorkflowResult<Vec<FlowEntry>> {
        if self.db.get_request(request_id)?.is_none() {
            return Err(WorkflowError::NotFound(request_id.to_string()));
        }
        Ok(self.db.list_flow_for_request(request_id)?)
    }
}
