//! Idempotent re-run scenarios.

use crate::prelude::*;
use docops_core::JobStatus;
use docops_engine::run_job;
use docops_storage::{MemoryStore, Store};

#[tokio::test]
async fn rerunning_a_succeeded_job_is_a_noop() {
    let store = MemoryStore::new();
    let job = create_job(&store, Some("x")).await;
    let registry = passing_registry();

    let first = run_job(&store, &job.id, &registry).await.unwrap();
    assert_eq!(first.final_status, JobStatus::Succeeded);

    let events_before = store.events(&job.id).await.unwrap().len();
    let artifacts_before = store.artifacts(&job.id).await.unwrap().len();

    let second = run_job(&store, &job.id, &registry).await.unwrap();
    assert_eq!(second.final_status, JobStatus::Succeeded);
    assert_eq!(
        second.note.as_deref(),
        Some("no-op: job already terminal (SUCCEEDED)")
    );
    assert_eq!(second.signals, first.signals);

    // No new audit events, no new artifacts.
    assert_eq!(store.events(&job.id).await.unwrap().len(), events_before);
    assert_eq!(store.artifacts(&job.id).await.unwrap().len(), artifacts_before);
}

#[tokio::test]
async fn rerunning_a_failed_job_is_a_noop() {
    let store = MemoryStore::new();
    let job = create_job(&store, Some("x")).await;
    let registry = failing_registry();

    let first = run_job(&store, &job.id, &registry).await.unwrap();
    assert_eq!(first.final_status, JobStatus::Failed);

    let events_before = store.events(&job.id).await.unwrap().len();
    let second = run_job(&store, &job.id, &registry).await.unwrap();
    assert_eq!(second.note.as_deref(), Some("no-op: job already terminal (FAILED)"));
    assert_eq!(store.events(&job.id).await.unwrap().len(), events_before);
}

#[tokio::test]
async fn audit_count_is_nondecreasing_across_runs() {
    let store = MemoryStore::new();
    let job = create_job(&store, Some("x")).await;
    let registry = passing_registry();

    let mut last = store.events(&job.id).await.unwrap().len();
    for _ in 0..3 {
        run_job(&store, &job.id, &registry).await.unwrap();
        let count = store.events(&job.id).await.unwrap().len();
        assert!(count >= last);
        last = count;
    }
}
