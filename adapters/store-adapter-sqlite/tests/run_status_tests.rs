//! Run status guard tests
//!
//! Verifies the terminal-state write-once property of the conditional status
//! update, including the concurrent-writer race it exists to prevent.

use std::sync::Arc;
use tempfile::TempDir;
use tiller_store_adapter_sqlite::StoreAdapterSqlite;
use tiller::store_adapter::{
	NewRun, RunFilter, RunStatus, StatusChange, StoreAdapter,
};
use tiller::types::Timestamp;

async fn create_test_adapter() -> (StoreAdapterSqlite, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter = StoreAdapterSqlite::new(temp_dir.path().join("store.db"))
		.await
		.expect("Failed to create adapter");
	(adapter, temp_dir)
}

fn change(status: RunStatus, time: i64) -> StatusChange {
	if status == RunStatus::Started {
		StatusChange { status, started_time: Some(Timestamp(time)), finished_time: None }
	} else {
		StatusChange { status, started_time: None, finished_time: Some(Timestamp(time)) }
	}
}

#[tokio::test]
async fn test_create_and_read_run() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter
		.create_run(&NewRun { run_id: "r1", job_id: Some("j1") })
		.await
		.expect("Should create run");

	let run = adapter.read_run("r1").await.expect("Should read run");
	assert_eq!(&*run.run_id, "r1");
	assert_eq!(run.job_id.as_deref(), Some("j1"));
	assert_eq!(run.status, RunStatus::Pending);
	assert!(run.started_time.is_none());
	assert!(run.finished_time.is_none());
}

#[tokio::test]
async fn test_create_stamps_created_at() {
	let (adapter, _temp) = create_test_adapter().await;

	let before = Timestamp::now();
	adapter.create_run(&NewRun { run_id: "r1", job_id: None }).await.expect("Should create run");
	let after = Timestamp::now();

	let run = adapter.read_run("r1").await.expect("Should read run");
	assert!(run.created_at >= before && run.created_at <= after);
}

#[tokio::test]
async fn test_read_missing_run_is_not_found() {
	let (adapter, _temp) = create_test_adapter().await;
	let err = adapter.read_run("ghost").await;
	assert!(matches!(err, Err(tiller::error::Error::NotFound)));
}

#[tokio::test]
async fn test_pending_to_started_records_time() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.create_run(&NewRun { run_id: "r1", job_id: None }).await.expect("Should create run");

	let updated = adapter
		.update_run_status(&RunFilter::by_run_id("r1"), &change(RunStatus::Started, 100))
		.await
		.expect("Should update status");
	assert!(updated);

	let run = adapter.read_run("r1").await.expect("Should read run");
	assert_eq!(run.status, RunStatus::Started);
	assert_eq!(run.started_time, Some(Timestamp(100)));
}

#[tokio::test]
async fn test_terminal_status_is_write_once() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.create_run(&NewRun { run_id: "r1", job_id: None }).await.expect("Should create run");

	let updated = adapter
		.update_run_status(&RunFilter::by_run_id("r1"), &change(RunStatus::Success, 200))
		.await
		.expect("Should update status");
	assert!(updated);

	// A late conflicting report must affect zero rows
	let updated = adapter
		.update_run_status(&RunFilter::by_run_id("r1"), &change(RunStatus::Failure, 300))
		.await
		.expect("Should attempt update");
	assert!(!updated, "terminal status must not be overwritten");

	let run = adapter.read_run("r1").await.expect("Should read run");
	assert_eq!(run.status, RunStatus::Success);
	assert_eq!(run.finished_time, Some(Timestamp(200)));
}

#[tokio::test]
async fn test_aborted_is_terminal_too() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.create_run(&NewRun { run_id: "r1", job_id: None }).await.expect("Should create run");

	adapter
		.update_run_status(&RunFilter::by_run_id("r1"), &change(RunStatus::Aborted, 50))
		.await
		.expect("Should abort run");

	let updated = adapter
		.update_run_status(&RunFilter::by_run_id("r1"), &change(RunStatus::Success, 60))
		.await
		.expect("Should attempt update");
	assert!(!updated);

	let run = adapter.read_run("r1").await.expect("Should read run");
	assert_eq!(run.status, RunStatus::Aborted);
}

#[tokio::test]
async fn test_filter_matching_nothing_updates_nothing() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.create_run(&NewRun { run_id: "r1", job_id: Some("j1") }).await.expect("create");

	let filter = RunFilter { run_id: Some("r1"), job_id: Some("other-job"), status: None };
	let updated = adapter
		.update_run_status(&filter, &change(RunStatus::Started, 10))
		.await
		.expect("Should attempt update");
	assert!(!updated);
}

#[tokio::test]
async fn test_job_filter_updates_all_live_runs() {
	let (adapter, _temp) = create_test_adapter().await;
	for run_id in ["r1", "r2", "r3"] {
		adapter
			.create_run(&NewRun { run_id, job_id: Some("j1") })
			.await
			.expect("Should create run");
	}
	// r3 already finished; the batch abort must not touch it
	adapter
		.update_run_status(&RunFilter::by_run_id("r3"), &change(RunStatus::Success, 20))
		.await
		.expect("Should finish r3");

	let filter = RunFilter { run_id: None, job_id: Some("j1"), status: None };
	let updated = adapter
		.update_run_status(&filter, &change(RunStatus::Aborted, 30))
		.await
		.expect("Should abort job runs");
	assert!(updated);

	assert_eq!(adapter.read_run("r1").await.expect("read").status, RunStatus::Aborted);
	assert_eq!(adapter.read_run("r2").await.expect("read").status, RunStatus::Aborted);
	assert_eq!(adapter.read_run("r3").await.expect("read").status, RunStatus::Success);
}

#[tokio::test]
async fn test_list_runs_with_status_filter() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.create_run(&NewRun { run_id: "r1", job_id: Some("j1") }).await.expect("create");
	adapter.create_run(&NewRun { run_id: "r2", job_id: Some("j1") }).await.expect("create");
	adapter
		.update_run_status(&RunFilter::by_run_id("r2"), &change(RunStatus::Success, 10))
		.await
		.expect("Should finish r2");

	let pending = adapter
		.list_runs(&RunFilter { job_id: Some("j1"), status: Some(RunStatus::Pending), ..RunFilter::default() })
		.await
		.expect("Should list runs");
	assert_eq!(pending.len(), 1);
	assert_eq!(&*pending[0].run_id, "r1");
}

#[tokio::test]
async fn test_concurrent_writers_have_exactly_one_winner() {
	let (adapter, _temp) = create_test_adapter().await;
	let adapter = Arc::new(adapter);
	adapter.create_run(&NewRun { run_id: "r1", job_id: None }).await.expect("Should create run");

	let win = {
		let adapter = Arc::clone(&adapter);
		tokio::spawn(async move {
			adapter
				.update_run_status(&RunFilter::by_run_id("r1"), &change(RunStatus::Success, 100))
				.await
		})
	};
	let lose = {
		let adapter = Arc::clone(&adapter);
		tokio::spawn(async move {
			adapter
				.update_run_status(&RunFilter::by_run_id("r1"), &change(RunStatus::Failure, 100))
				.await
		})
	};

	let success_won = win.await.expect("task").expect("Should attempt update");
	let failure_won = lose.await.expect("task").expect("Should attempt update");

	assert!(
		success_won ^ failure_won,
		"exactly one writer must win, got success={success_won} failure={failure_won}"
	);

	let run = adapter.read_run("r1").await.expect("Should read run");
	let expected = if success_won { RunStatus::Success } else { RunStatus::Failure };
	assert_eq!(run.status, expected);
}

// vim: ts=4
