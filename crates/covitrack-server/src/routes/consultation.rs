//! Consultation routes (doctor-facing).

use axum::{
    extract::{Path, State},
    Json,
};

use covitrack_core::models::{CreateConsultationRequest, RequestStatus, Role, TestRequest};
use covitrack_core::workflow::{QueryService, UpdateService};

use crate::{auth::AuthUser, error::ApiError, state::AppState};

/// `GET /api/consultations/in-queue` — requests waiting for a doctor.
pub async fn in_queue(
    State(state): State<AppState>,
    actor: AuthUser,
) -> Result<Json<Vec<TestRequest>>, ApiError> {
    actor.require_role(Role::Doctor)?;
    let db = state.db()?;
    let requests = QueryService::new(&db).find_by_status(RequestStatus::LabTestCompleted)?;
    Ok(Json(requests))
}

/// `GET /api/consultations` — requests assigned to the calling doctor.
pub async fn for_doctor(
    State(state): State<AppState>,
    actor: AuthUser,
) -> Result<Json<Vec<TestRequest>>, ApiError> {
    let doctor = actor.require_role(Role::Doctor)?;
    let db = state.db()?;
    let requests = QueryService::new(&db).find_for_doctor(&doctor)?;
    Ok(Json(requests))
}

/// `PUT /api/consultations/assign/{id}` — assign the caller as doctor.
pub async fn assign(
    State(state): State<AppState>,
    Path(id): Path<String>,
    actor: AuthUser,
) -> Result<Json<TestRequest>, ApiError> {
    let doctor = actor.require_role(Role::Doctor)?;
    let mut db = state.db()?;
    let updated = UpdateService::new(&mut db).assign_for_consultation(&id, &doctor)?;
    tracing::info!(request_id = %id, doctor = %doctor.user_name, "request assigned for consultation");
    Ok(Json(updated))
}

/// `PUT /api/consultations/update/{id}` — record the consultation.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    actor: AuthUser,
    Json(payload): Json<CreateConsultationRequest>,
) -> Result<Json<TestRequest>, ApiError> {
    let doctor = actor.require_role(Role::Doctor)?;
    let mut db = state.db()?;
    let updated = UpdateService::new(&mut db).update_consultation(&id, payload, &doctor)?;
    tracing::info!(request_id = %id, doctor = %doctor.user_name, "consultation recorded");
    Ok(Json(updated))
}
