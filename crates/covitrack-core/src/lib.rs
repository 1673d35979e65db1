//! Covitrack Core Library
//!
//! COVID-19 test request workflow tracking with role-gated transitions.
//!
//! # Architecture
//!
//! ```text
//! TestRequest created (INITIATED)
//!         │
//!         ▼
//! Tester assigns ──────► LAB_TEST_IN_PROGRESS
//!         │
//! Tester records result ► LAB_TEST_COMPLETED   [LabResult attached]
//!         │
//! Doctor assigns ──────► DIAGNOSIS_IN_PROCESS
//!         │
//! Doctor records advice ► COMPLETED            [Consultation attached]
//! ```
//!
//! Every transition is decided by the pure state machine in [`workflow`]
//! and applied against the store in a single transaction, together with a
//! flow-log entry for the audit trail. The status field only moves forward.
//!
//! # Modules
//!
//! - [`db`]: SQLite store for users, test requests, and the flow log
//! - [`models`]: Domain types (TestRequest, LabResult, Consultation, etc.)
//! - [`workflow`]: The status state machine plus update/query services

pub mod db;
pub mod models;
pub mod workflow;

// Re-export commonly used types
pub use db::Database;
pub use models::{
    Consultation, CreateConsultationRequest, CreateLabResult, DoctorSuggestion, FlowEntry,
    LabResult, RequestStatus, Role, TestRequest, TestStatus, User,
};
pub use workflow::{Action, QueryService, UpdateService, WorkflowError};
