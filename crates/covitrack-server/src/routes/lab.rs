//! Lab request routes (tester-facing).

use axum::{
    extract::{Path, State},
    Json,
};

use covitrack_core::models::{CreateLabResult, RequestStatus, Role, TestRequest};
use covitrack_core::workflow::{QueryService, UpdateService};

use crate::{auth::AuthUser, error::ApiError, state::AppState};

/// `GET /api/labrequests/to-be-tested` — requests waiting for a tester.
pub async fn to_be_tested(
    State(state): State<AppState>,
    actor: AuthUser,
) -> Result<Json<Vec<TestRequest>>, ApiError> {
    actor.require_role(Role::Tester)?;
    let db = state.db()?;
    let requests = QueryService::new(&db).find_by_status(RequestStatus::Initiated)?;
    Ok(Json(requests))
}

/// `GET /api/labrequests` — requests assigned to the calling tester.
pub async fn for_tester(
    State(state): State<AppState>,
    actor: AuthUser,
) -> Result<Json<Vec<TestRequest>>, ApiError> {
    let tester = actor.require_role(Role::Tester)?;
    let db = state.db()?;
    let requests = QueryService::new(&db).find_for_tester(&tester)?;
    Ok(Json(requests))
}

/// `PUT /api/labrequests/assign/{id}` — assign the caller as tester.
pub async fn assign(
    State(state): State<AppState>,
    Path(id): Path<String>,
    actor: AuthUser,
) -> Result<Json<TestRequest>, ApiError> {
    let tester = actor.require_role(Role::Tester)?;
    let mut db = state.db()?;
    let updated = UpdateService::new(&mut db).assign_for_lab_test(&id, &tester)?;
    tracing::info!(request_id = %id, tester = %tester.user_name, "request assigned for lab test");
    Ok(Json(updated))
}

/// `PUT /api/labrequests/update/{id}` — record the lab result.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    actor: AuthUser,
    Json(payload): Json<CreateLabResult>,
) -> Result<Json<TestRequest>, ApiError> {
    let tester = actor.require_role(Role::Tester)?;
    let mut db = state.db()?;
    let updated = UpdateService::new(&mut db).update_lab_test(&id, payload, &tester)?;
    tracing::info!(request_id = %id, tester = %tester.user_name, "lab result recorded");
    Ok(Json(updated))
}
