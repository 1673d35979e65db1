//! SQLite schema definition.

/// Complete database schema for covitrack.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Users (the user directory)
-- ============================================================================

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    user_name TEXT NOT NULL UNIQUE,
    role TEXT NOT NULL CHECK (role IN ('TESTER', 'DOCTOR', 'ADMIN')),
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_users_role ON users(role);

-- ============================================================================
-- Test Requests
-- ============================================================================

CREATE TABLE IF NOT EXISTS test_requests (
    request_id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL,
    patient_name TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'INITIATED'
        CHECK (status IN ('INITIATED', 'LAB_TEST_IN_PROGRESS', 'LAB_TEST_COMPLETED',
                          'DIAGNOSIS_IN_PROCESS', 'COMPLETED')),
    tester_id TEXT REFERENCES users(id),
    doctor_id TEXT REFERENCES users(id),
    lab_result TEXT,                             -- JSON LabResult, once attached
    consultation TEXT,                           -- JSON Consultation, once attached
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_requests_status ON test_requests(status);
CREATE INDEX IF NOT EXISTS idx_requests_tester ON test_requests(tester_id);
CREATE INDEX IF NOT EXISTS idx_requests_doctor ON test_requests(doctor_id);

-- ============================================================================
-- Request Flow (Append-Only audit trail of transitions)
-- ============================================================================

CREATE TABLE IF NOT EXISTS request_flow (
    flow_id INTEGER PRIMARY KEY AUTOINCREMENT,
    request_id TEXT NOT NULL REFERENCES test_requests(request_id),
    from_status TEXT NOT NULL,
    to_status TEXT NOT NULL,
    actor_id TEXT NOT NULL REFERENCES users(id),
    happened_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_flow_request ON request_flow(request_id);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_role_check_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let result = conn.execute(
            "INSERT INTO users (id, user_name, role) VALUES ('u1', 'eve', 'SUPERUSER')",
            [],
        );
        assert!(result.is_err());

        let result = conn.execute(
            "INSERT INTO users (id, user_name, role) VALUES ('u1', 'eve', 'TESTER')",
            [],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_status_check_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let result = conn.execute(
            "INSERT INTO test_requests (request_id, patient_id, patient_name, status)
             VALUES ('r1', 'p1', 'John', 'CANCELLED')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_user_name_unique() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute(
            "INSERT INTO users (id, user_name, role) VALUES ('u1', 'doctor', 'DOCTOR')",
            [],
        )
        .unwrap();
        let result = conn.execute(
            "INSERT INTO users (id, user_name, role) VALUES ('u2', 'doctor', 'DOCTOR')",
            [],
        );
        assert!(result.is_err());
    }
}
