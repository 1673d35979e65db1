//! Covitrack server binary.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use covitrack_core::models::{Role, TestRequest, User};
use covitrack_core::Database;
use covitrack_server::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let db_path =
        std::env::var("COVITRACK_DB_PATH").unwrap_or_else(|_| "covitrack.db".to_string());
    let bind_addr =
        std::env::var("COVITRACK_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    let db = Database::open(&db_path).with_context(|| format!("opening database {db_path}"))?;
    seed_if_empty(&db)?;

    let app = router(AppState::new(db));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, db = %db_path, "covitrack server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

/// Seed one user per role and a couple of initiated requests on first run.
///
/// The login service is an external collaborator; until one is wired in,
/// the seeded user ids double as bearer tokens and are logged at startup.
fn seed_if_empty(db: &Database) -> anyhow::Result<()> {
    if db.get_user_by_name("tester")?.is_some() {
        return Ok(());
    }

    for (name, role) in [
        ("tester", Role::Tester),
        ("doctor", Role::Doctor),
        ("admin", Role::Admin),
    ] {
        let user = User::new(name.into(), role);
        db.insert_user(&user)?;
        tracing::info!(user = name, token = %user.id, "seeded user");
    }

    for (patient_id, patient_name) in [("patient-1", "John Doe"), ("patient-2", "Jane Roe")] {
        let request = TestRequest::new(patient_id.into(), patient_name.into());
        db.insert_request(&request)?;
        tracing::info!(request_id = %request.request_id, patient = patient_name, "seeded test request");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {e}");
    }
}
