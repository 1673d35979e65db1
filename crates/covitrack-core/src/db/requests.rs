//! Test request and flow-log database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Consultation, FlowEntry, LabResult, RequestStatus, TestRequest};

const REQUEST_COLUMNS: &str = "request_id, patient_id, patient_name, status, tester_id, \
                               doctor_id, lab_result, consultation, created_at, updated_at";

impl Database {
    /// Insert a new test request.
    pub fn insert_request(&self, request: &TestRequest) -> DbResult<()> {
        let lab_result_json = request
            .lab_result
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let consultation_json = request
            .consultation
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        self.conn.execute(
            r#"
            INSERT INTO test_requests (
                request_id, patient_id, patient_name, status, tester_id,
                doctor_id, lab_result, consultation, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                request.request_id,
                request.patient_id,
                request.patient_name,
                request.status.as_str(),
                request.tester_id,
                request.doctor_id,
                lab_result_json,
                consultation_json,
                request.created_at,
                request.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a request by ID.
    pub fn get_request(&self, request_id: &str) -> DbResult<Option<TestRequest>> {
        self.conn
            .query_row(
                &format!("SELECT {REQUEST_COLUMNS} FROM test_requests WHERE request_id = ?"),
                [request_id],
                request_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List requests currently in the given status, oldest first.
    pub fn list_requests_by_status(&self, status: RequestStatus) -> DbResult<Vec<TestRequest>> {
        self.collect_requests(
            &format!(
                "SELECT {REQUEST_COLUMNS} FROM test_requests WHERE status = ? ORDER BY created_at"
            ),
            params![status.as_str()],
        )
    }

    /// List requests assigned to the given tester.
    pub fn list_requests_for_tester(&self, tester_id: &str) -> DbResult<Vec<TestRequest>> {
        self.collect_requests(
            &format!(
                "SELECT {REQUEST_COLUMNS} FROM test_requests WHERE tester_id = ? ORDER BY updated_at DESC"
            ),
            params![tester_id],
        )
    }

    /// List requests assigned to the given doctor.
    pub fn list_requests_for_doctor(&self, doctor_id: &str) -> DbResult<Vec<TestRequest>> {
        self.collect_requests(
            &format!(
                "SELECT {REQUEST_COLUMNS} FROM test_requests WHERE doctor_id = ? ORDER BY updated_at DESC"
            ),
            params![doctor_id],
        )
    }

    /// List all requests, newest first.
    pub fn list_all_requests(&self) -> DbResult<Vec<TestRequest>> {
        self.collect_requests(
            &format!("SELECT {REQUEST_COLUMNS} FROM test_requests ORDER BY created_at DESC"),
            params![],
        )
    }

    /// Apply a completed transition atomically.
    ///
    /// Writes the new status, assignment, and sub-record columns and appends
    /// the flow entry in a single transaction. The WHERE clause re-checks the
    /// source status so a racing writer that already advanced the row makes
    /// this call fail with a constraint error instead of clobbering it.
    pub fn apply_transition(
        &mut self,
        request: &TestRequest,
        from_status: RequestStatus,
        flow: &FlowEntry,
    ) -> DbResult<()> {
        let lab_result_json = request
            .lab_result
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let consultation_json = request
            .consultation
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let tx = self.conn.transaction()?;

        let rows_affected = tx.execute(
            r#"
            UPDATE test_requests SET
                status = ?2,
                tester_id = ?3,
                doctor_id = ?4,
                lab_result = ?5,
                consultation = ?6,
                updated_at = ?7
            WHERE request_id = ?1 AND status = ?8
            "#,
            params![
                request.request_id,
                request.status.as_str(),
                request.tester_id,
                request.doctor_id,
                lab_result_json,
                consultation_json,
                request.updated_at,
                from_status.as_str(),
            ],
        )?;

        if rows_affected == 0 {
            return Err(DbError::Constraint(format!(
                "request {} is no longer in status {}",
                request.request_id,
                from_status.as_str()
            )));
        }

        tx.execute(
            r#"
            INSERT INTO request_flow (request_id, from_status, to_status, actor_id, happened_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                flow.request_id,
                flow.from_status.as_str(),
                flow.to_status.as_str(),
                flow.actor_id,
                flow.happened_at,
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// List the flow log for a request, in transition order.
    pub fn list_flow_for_request(&self, request_id: &str) -> DbResult<Vec<FlowEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT request_id, from_status, to_status, actor_id, happened_at
            FROM request_flow
            WHERE request_id = ?
            ORDER BY flow_id
            "#,
        )?;

        let rows = stmt.query_map([request_id], |row| {
            Ok(FlowRow {
                request_id: row.get(0)?,
                from_status: row.get(1)?,
                to_status: row.get(2)?,
                actor_id: row.get(3)?,
                happened_at: row.get(4)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.try_into()?);
        }
        Ok(entries)
    }

    fn collect_requests<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> DbResult<Vec<TestRequest>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, request_row)?;

        let mut requests = Vec::new();
        for row in rows {
            requests.push(row?.try_into()?);
        }
        Ok(requests)
    }
}

/// Intermediate row struct for database mapping.
struct RequestRow {
    request_id: String,
    patient_id: String,
    patient_name: String,
    status: String,
    tester_id: Option<String>,
    doctor_id: Option<String>,
    lab_result: Option<String>,
    consultation: Option<String>,
    created_at: String,
    updated_at: String,
}

fn request_row(row: &Row<'_>) -> rusqlite::Result<RequestRow> {
    Ok(RequestRow {
        request_id: row.get(0)?,
        patient_id: row.get(1)?,
        patient_name: row.get(2)?,
        status: row.get(3)?,
        tester_id: row.get(4)?,
        doctor_id: row.get(5)?,
        lab_result: row.get(6)?,
        consultation: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

impl TryFrom<RequestRow> for TestRequest {
    type Error = DbError;

    fn try_from(row: RequestRow) -> Result<Self, Self::Error> {
        let status = RequestStatus::parse(&row.status)
            .ok_or_else(|| DbError::Constraint(format!("Unknown request status: {}", row.status)))?;
        let lab_result: Option<LabResult> = row
            .lab_result
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;
        let consultation: Option<Consultation> = row
            .consultation
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;

        Ok(TestRequest {
            request_id: row.request_id,
            patient_id: row.patient_id,
            patient_name: row.patient_name,
            status,
            tester_id: row.tester_id,
            doctor_id: row.doctor_id,
            lab_result,
            consultation,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Intermediate row struct for flow-log mapping.
struct FlowRow {
    request_id: String,
    from_status: String,
    to_status: String,
    actor_id: String,
    happened_at: String,
}

impl TryFrom<FlowRow> for FlowEntry {
    type Error = DbError;

    fn try_from(row: FlowRow) -> Result<Self, Self::Error> {
        let from_status = RequestStatus::parse(&row.from_status)
            .ok_or_else(|| DbError::Constraint(format!("Unknown status: {}", row.from_status)))?;
        let to_status = RequestStatus::parse(&row.to_status)
            .ok_or_else(|| DbError::Constraint(format!("Unknown status: {}", row.to_status)))?;
        Ok(FlowEntry {
            request_id: row.request_id,
            from_status,
            to_status,
            actor_id: row.actor_id,
            happened_at: row.happened_at,
        })
    }
}
