// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job record and lifecycle state machine.

use crate::clock::Clock;
use crate::signals::Signals;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

crate::define_id! {
    /// Unique identifier for a job.
    ///
    /// Canonical 36-char UUID string; primary key in the jobs table and
    /// the foreign reference on audit events and artifacts.
    pub struct JobId;
}

/// Lifecycle status of a job.
///
/// Jobs march from `Received` to a terminal state; the legal successors
/// of each status are defined by [`JobStatus::allowed_next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Received,
    Preprocessed,
    Routed,
    Planned,
    Executing,
    Verified,
    Acted,
    NeedsReview,
    Succeeded,
    Failed,
    Cancelled,
}

crate::string_enum! {
    JobStatus {
        Received => "RECEIVED",
        Preprocessed => "PREPROCESSED",
        Routed => "ROUTED",
        Planned => "PLANNED",
        Executing => "EXECUTING",
        Verified => "VERIFIED",
        Acted => "ACTED",
        NeedsReview => "NEEDS_REVIEW",
        Succeeded => "SUCCEEDED",
        Failed => "FAILED",
        Cancelled => "CANCELLED",
    }
}

impl JobStatus {
    /// Legal successor statuses.
    ///
    /// Terminal statuses have no successors.
    pub fn allowed_next(self) -> &'static [JobStatus] {
        use JobStatus::*;
        match self {
            Received => &[Preprocessed, Cancelled, Failed],
            Preprocessed => &[Routed, Cancelled, Failed],
            Routed => &[Planned, Cancelled, Failed],
            Planned => &[Executing, Cancelled, Failed],
            Executing => &[Verified, Cancelled, Failed],
            Verified => &[Acted, NeedsReview, Failed],
            Acted => &[Succeeded, NeedsReview, Failed],
            NeedsReview => &[Executing, Cancelled, Failed],
            Succeeded | Failed | Cancelled => &[],
        }
    }

    /// Monotone ordering used by the runner's idempotent `advance_status`:
    /// a job never moves to a status of lower or equal rank.
    pub fn rank(self) -> u8 {
        use JobStatus::*;
        match self {
            Received => 10,
            Preprocessed => 20,
            Routed => 30,
            Planned => 40,
            Executing => 50,
            Verified => 60,
            Acted => 70,
            Succeeded => 80,
            NeedsReview => 90,
            Failed => 100,
            Cancelled => 110,
        }
    }

    /// Terminal statuses are sinks: no outgoing transitions.
    pub fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }
}

/// Rejected lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid transition: {from} -> {to}")]
pub struct TransitionError {
    pub from: JobStatus,
    pub to: JobStatus,
}

/// Check a lifecycle transition against the legal-successor graph.
///
/// The only sanctioned way to mutate a job's status is the job service's
/// `set_job_status`, which calls this first.
pub fn ensure_transition_allowed(from: JobStatus, to: JobStatus) -> Result<(), TransitionError> {
    if from.allowed_next().contains(&to) {
        Ok(())
    } else {
        Err(TransitionError { from, to })
    }
}

/// Ingest metadata for creating a new job.
#[derive(Debug, Clone)]
pub struct JobIntake {
    pub filename: String,
    pub content_type: String,
    pub source_text: Option<String>,
}

impl JobIntake {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self { filename: filename.into(), content_type: content_type.into(), source_text: None }
    }

    crate::setters! {
        option {
            source_text: String,
        }
    }
}

/// A persistent work item representing one document through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub filename: String,
    pub content_type: String,
    /// Routing attributes, set when the job reaches ROUTED.
    pub domain: Option<String>,
    pub pipeline_id: Option<String>,
    pub schema_id: Option<String>,
    pub error: Option<String>,
    /// Document body; required before the job can run.
    pub source_text: Option<String>,
    /// Dotted-key facts accumulated during processing. Monotone: the
    /// runner only merges, never deletes.
    #[serde(default)]
    pub signals: Signals,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a freshly received job.
    pub fn new(intake: JobIntake, clock: &impl Clock) -> Self {
        let now = clock.now_utc();
        Self {
            id: JobId::new(),
            status: JobStatus::Received,
            filename: intake.filename,
            content_type: intake.content_type,
            domain: None,
            pipeline_id: None,
            schema_id: None,
            error: None,
            source_text: intake.source_text,
            signals: Signals::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// True when the document body is present and non-empty.
    pub fn has_source_text(&self) -> bool {
        self.source_text.as_deref().is_some_and(|t| !t.is_empty())
    }
}

crate::builder! {
    pub struct JobBuilder => Job {
        field {
            id: JobId = JobId::new(),
            filename: String = "doc.txt",
            content_type: String = "text/plain",
            status: JobStatus = JobStatus::Received,
            signals: Signals = Signals::new(),
        }
        option {
            domain: String = None,
            pipeline_id: String = None,
            schema_id: String = None,
            error: String = None,
            source_text: String = Some("sample body".to_string()),
        }
        computed {
            created_at: DateTime<Utc> = Utc::now(),
            updated_at: DateTime<Utc> = Utc::now(),
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
