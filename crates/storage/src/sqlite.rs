// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable store backed by SQLite.
//!
//! Three tables — `jobs`, `audit_events`, `artifacts` — with integer
//! autoincrement ids on events/artifacts and the 36-char UUID string on
//! jobs. `signals` and `payload` columns hold JSON text; timestamps are
//! RFC 3339 strings.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docops_core::{Artifact, AuditEvent, AuditEventType, Job, JobId, JobStatus, Signals};
use parking_lot::Mutex;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use serde_json::Value;

use crate::store::{Store, StoreError};

/// Store schema version, recorded in `PRAGMA user_version`.
const SCHEMA_VERSION: i64 = 1;

/// How long a writer waits on a locked database before giving up.
const BUSY_TIMEOUT_MS: u64 = 5_000;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS jobs (
    id TEXT PRIMARY KEY,
    status TEXT NOT NULL,
    filename TEXT NOT NULL,
    content_type TEXT NOT NULL,
    domain TEXT,
    pipeline_id TEXT,
    schema_id TEXT,
    error TEXT,
    source_text TEXT,
    signals TEXT NOT NULL DEFAULT '{}',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS audit_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    job_id TEXT NOT NULL,
    event_type TEXT NOT NULL,
    payload TEXT NOT NULL DEFAULT '{}',
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_audit_events_job_id ON audit_events(job_id);

CREATE TABLE IF NOT EXISTS artifacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    job_id TEXT NOT NULL,
    name TEXT NOT NULL,
    payload TEXT NOT NULL DEFAULT '{}',
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_artifacts_job_id ON artifacts(job_id);
";

/// SQLite-backed [`Store`].
///
/// The connection is guarded by a mutex; every trait method takes the
/// lock for the duration of its statement batch, which keeps each
/// operation atomic with respect to this handle.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "opened sqlite store");
        Self::init(conn)
    }

    /// Open a private in-memory database (tests, throwaway runs).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(std::time::Duration::from_millis(BUSY_TIMEOUT_MS))?;
        // journal_mode returns the resulting mode as a row
        let _mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;

        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version > SCHEMA_VERSION {
            return Err(StoreError::Corrupt(format!(
                "database schema version {version} is newer than supported {SCHEMA_VERSION}"
            )));
        }
        conn.execute_batch(SCHEMA)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        Ok(Self { conn: Mutex::new(conn) })
    }

    fn load_job(conn: &Connection, id: &JobId) -> Result<Option<Job>, StoreError> {
        conn.query_row(
            "SELECT id, status, filename, content_type, domain, pipeline_id, schema_id,
                    error, source_text, signals, created_at, updated_at
             FROM jobs WHERE id = ?1",
            params![id.as_str()],
            job_from_row,
        )
        .optional()?
        .transpose()
    }
}

fn job_from_row(row: &Row<'_>) -> rusqlite::Result<Result<Job, StoreError>> {
    // Column decode failures are reported as StoreError::Corrupt rather
    // than rusqlite errors so callers see which row was bad.
    let id: String = row.get(0)?;
    let status: String = row.get(1)?;
    let signals: String = row.get(9)?;
    let created_at: String = row.get(10)?;
    let updated_at: String = row.get(11)?;

    let job = || -> Result<Job, StoreError> {
        Ok(Job {
            id: JobId::from_string(&id),
            status: JobStatus::parse(&status)
                .ok_or_else(|| StoreError::Corrupt(format!("job {id}: bad status {status:?}")))?,
            filename: row.get(2).map_err(|e| corrupt(&id, "filename", &e))?,
            content_type: row.get(3).map_err(|e| corrupt(&id, "content_type", &e))?,
            domain: row.get(4).map_err(|e| corrupt(&id, "domain", &e))?,
            pipeline_id: row.get(5).map_err(|e| corrupt(&id, "pipeline_id", &e))?,
            schema_id: row.get(6).map_err(|e| corrupt(&id, "schema_id", &e))?,
            error: row.get(7).map_err(|e| corrupt(&id, "error", &e))?,
            source_text: row.get(8).map_err(|e| corrupt(&id, "source_text", &e))?,
            signals: serde_json::from_str(&signals)
                .map_err(|e| StoreError::Corrupt(format!("job {id}: bad signals: {e}")))?,
            created_at: parse_timestamp(&id, &created_at)?,
            updated_at: parse_timestamp(&id, &updated_at)?,
        })
    };
    Ok(job())
}

fn corrupt(id: &str, column: &str, err: &rusqlite::Error) -> StoreError {
    StoreError::Corrupt(format!("job {id}: bad {column}: {err}"))
}

fn parse_timestamp(id: &str, raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("job {id}: bad timestamp {raw:?}: {e}")))
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

#[async_trait]
impl Store for SqliteStore {
    async fn create_job(&self, job: &Job) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        let signals = serde_json::to_string(&job.signals)?;
        let result = conn.execute(
            "INSERT INTO jobs (id, status, filename, content_type, domain, pipeline_id,
                               schema_id, error, source_text, signals, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                job.id.as_str(),
                job.status.to_string(),
                job.filename,
                job.content_type,
                job.domain,
                job.pipeline_id,
                job.schema_id,
                job.error,
                job.source_text,
                signals,
                job.created_at.to_rfc3339(),
                job.updated_at.to_rfc3339(),
            ],
        );
        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(StoreError::JobExists(job.id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn job(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        let conn = self.conn.lock();
        Self::load_job(&conn, id)
    }

    async fn update_job(&self, job: &Job) -> Result<Job, StoreError> {
        let conn = self.conn.lock();
        let signals = serde_json::to_string(&job.signals)?;
        let updated_at = Utc::now();
        let changed = conn.execute(
            "UPDATE jobs SET status = ?2, domain = ?3, pipeline_id = ?4, schema_id = ?5,
                             error = ?6, source_text = ?7, signals = ?8, updated_at = ?9
             WHERE id = ?1",
            params![
                job.id.as_str(),
                job.status.to_string(),
                job.domain,
                job.pipeline_id,
                job.schema_id,
                job.error,
                job.source_text,
                signals,
                updated_at.to_rfc3339(),
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::MissingJob(job.id));
        }
        Self::load_job(&conn, &job.id)?.ok_or(StoreError::MissingJob(job.id))
    }

    async fn merge_signals(&self, id: &JobId, new_signals: &Signals) -> Result<Job, StoreError> {
        let conn = self.conn.lock();
        let mut job = Self::load_job(&conn, id)?.ok_or(StoreError::MissingJob(*id))?;
        job.signals.merge(new_signals);
        conn.execute(
            "UPDATE jobs SET signals = ?2, updated_at = ?3 WHERE id = ?1",
            params![
                id.as_str(),
                serde_json::to_string(&job.signals)?,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Self::load_job(&conn, id)?.ok_or(StoreError::MissingJob(*id))
    }

    async fn append_event(
        &self,
        id: &JobId,
        event_type: AuditEventType,
        payload: Value,
    ) -> Result<AuditEvent, StoreError> {
        let conn = self.conn.lock();
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO audit_events (job_id, event_type, payload, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                id.as_str(),
                event_type.to_string(),
                serde_json::to_string(&payload)?,
                created_at.to_rfc3339(),
            ],
        )?;
        Ok(AuditEvent {
            id: conn.last_insert_rowid(),
            job_id: *id,
            event_type,
            payload,
            created_at,
        })
    }

    async fn events(&self, id: &JobId) -> Result<Vec<AuditEvent>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, job_id, event_type, payload, created_at
             FROM audit_events WHERE job_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![id.as_str()], |row| {
            let event_id: i64 = row.get(0)?;
            let job_id: String = row.get(1)?;
            let event_type: String = row.get(2)?;
            let payload: String = row.get(3)?;
            let created_at: String = row.get(4)?;
            Ok((event_id, job_id, event_type, payload, created_at))
        })?;

        let mut events = Vec::new();
        for row in rows {
            let (event_id, job_id, event_type, payload, created_at) = row?;
            events.push(AuditEvent {
                id: event_id,
                job_id: JobId::from_string(&job_id),
                event_type: AuditEventType::parse(&event_type).ok_or_else(|| {
                    StoreError::Corrupt(format!("event {event_id}: bad type {event_type:?}"))
                })?,
                payload: serde_json::from_str(&payload)
                    .map_err(|e| StoreError::Corrupt(format!("event {event_id}: bad payload: {e}")))?,
                created_at: parse_timestamp(&job_id, &created_at)?,
            });
        }
        Ok(events)
    }

    async fn append_artifact(
        &self,
        id: &JobId,
        name: &str,
        payload: Value,
    ) -> Result<Artifact, StoreError> {
        let conn = self.conn.lock();
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO artifacts (job_id, name, payload, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                id.as_str(),
                name,
                serde_json::to_string(&payload)?,
                created_at.to_rfc3339(),
            ],
        )?;
        Ok(Artifact {
            id: conn.last_insert_rowid(),
            job_id: *id,
            name: name.to_string(),
            payload,
            created_at,
        })
    }

    async fn artifacts(&self, id: &JobId) -> Result<Vec<Artifact>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, job_id, name, payload, created_at
             FROM artifacts WHERE job_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![id.as_str()], |row| {
            let artifact_id: i64 = row.get(0)?;
            let job_id: String = row.get(1)?;
            let name: String = row.get(2)?;
            let payload: String = row.get(3)?;
            let created_at: String = row.get(4)?;
            Ok((artifact_id, job_id, name, payload, created_at))
        })?;

        let mut artifacts = Vec::new();
        for row in rows {
            let (artifact_id, job_id, name, payload, created_at) = row?;
            artifacts.push(Artifact {
                id: artifact_id,
                job_id: JobId::from_string(&job_id),
                name,
                payload: serde_json::from_str(&payload).map_err(|e| {
                    StoreError::Corrupt(format!("artifact {artifact_id}: bad payload: {e}"))
                })?,
                created_at: parse_timestamp(&job_id, &created_at)?,
            });
        }
        Ok(artifacts)
    }
}

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod tests;
