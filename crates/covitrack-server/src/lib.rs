//! HTTP surface for the covitrack test request workflow.
//!
//! Thin adapters over `covitrack-core`: each handler resolves the actor,
//! checks the route's required role, and delegates to the update/query
//! services. Workflow rejections are translated to HTTP status codes in
//! [`error`].

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
