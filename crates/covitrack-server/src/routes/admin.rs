//! Admin oversight routes.

use axum::{
    extract::{Path, State},
    Json,
};

use covitrack_core::models::{FlowEntry, Role, TestRequest};
use covitrack_core::workflow::QueryService;

use crate::{auth::AuthUser, error::ApiError, state::AppState};

/// `GET /api/requests` — every request, regardless of status.
pub async fn list_all(
    State(state): State<AppState>,
    actor: AuthUser,
) -> Result<Json<Vec<TestRequest>>, ApiError> {
    actor.require_role(Role::Admin)?;
    let db = state.db()?;
    let requests = QueryService::new(&db).find_all()?;
    Ok(Json(requests))
}

/// `GET /api/requests/{id}/flow` — the transition audit trail for a request.
pub async fn flow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    actor: AuthUser,
) -> Result<Json<Vec<FlowEntry>>, ApiError> {
    actor.require_role(Role::Admin)?;
    let db = state.db()?;
    let entries = QueryService::new(&db).flow_for_request(&id)?;
    Ok(Json(entries))
}
