//! Adapter that persists engine settings and tracked run records.
//!
//! The engine only consumes this abstraction; adapters own the physical
//! layout. The one load-bearing requirement is `update_run_status`: it must
//! be executed as a server-side conditional update (`WHERE status IN
//! ('PENDING','STARTED')`), never as a read-then-write from the caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::HashMap;
use std::fmt::Debug;

use crate::prelude::*;

/// Lifecycle status of a tracked run.
///
/// A run is created in `Pending`, moves to `Started`, and ends in one of the
/// terminal statuses. Once terminal, the record is immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
	Pending,
	Started,
	Success,
	Failure,
	Aborted,
}

impl RunStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			RunStatus::Pending => "PENDING",
			RunStatus::Started => "STARTED",
			RunStatus::Success => "SUCCESS",
			RunStatus::Failure => "FAILURE",
			RunStatus::Aborted => "ABORTED",
		}
	}

	pub fn parse(s: &str) -> Option<Self> {
		match s {
			"PENDING" => Some(RunStatus::Pending),
			"STARTED" => Some(RunStatus::Started),
			"SUCCESS" => Some(RunStatus::Success),
			"FAILURE" => Some(RunStatus::Failure),
			"ABORTED" => Some(RunStatus::Aborted),
			_ => None,
		}
	}

	/// Terminal statuses are write-once: a record that reached one can never
	/// be updated again.
	pub fn is_terminal(&self) -> bool {
		matches!(self, RunStatus::Success | RunStatus::Failure | RunStatus::Aborted)
	}
}

impl std::fmt::Display for RunStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A tracked run record as stored by the adapter.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
	pub run_id: Box<str>,
	pub job_id: Option<Box<str>>,
	pub status: RunStatus,
	pub started_time: Option<Timestamp>,
	pub finished_time: Option<Timestamp>,
	pub created_at: Timestamp,
}

/// Data needed to create a new run. Runs always start out `Pending`.
#[derive(Debug)]
pub struct NewRun<'a> {
	pub run_id: &'a str,
	pub job_id: Option<&'a str>,
}

/// Filter selecting run records for matching and listing.
#[derive(Debug, Default)]
pub struct RunFilter<'a> {
	pub run_id: Option<&'a str>,
	pub job_id: Option<&'a str>,
	pub status: Option<RunStatus>,
}

impl<'a> RunFilter<'a> {
	pub fn by_run_id(run_id: &'a str) -> Self {
		Self { run_id: Some(run_id), ..Self::default() }
	}
}

/// A resolved status change with parsed timestamps, ready to be applied by
/// the adapter's conditional update.
#[derive(Debug, Clone, Copy)]
pub struct StatusChange {
	pub status: RunStatus,
	pub started_time: Option<Timestamp>,
	pub finished_time: Option<Timestamp>,
}

/// A Tiller store adapter
///
/// Every `StoreAdapter` implementation is required to implement this trait.
/// A `StoreAdapter` is responsible for persisting engine settings and run
/// status records.
#[async_trait]
pub trait StoreAdapter: Debug + Send + Sync {
	/// # Settings
	/// Reads all persisted settings as raw JSON values.
	async fn read_settings(&self) -> TlResult<HashMap<Box<str>, serde_json::Value>>;

	/// Replaces the persisted settings with the given pairs in one
	/// transaction: upsert every pair, then prune rows whose key is not in
	/// the set. Partial application must be impossible.
	async fn replace_settings(&self, pairs: &[(Box<str>, serde_json::Value)]) -> TlResult<()>;

	/// # Runs
	async fn create_run(&self, run: &NewRun<'_>) -> TlResult<()>;

	async fn read_run(&self, run_id: &str) -> TlResult<Run>;

	async fn list_runs(&self, filter: &RunFilter<'_>) -> TlResult<Vec<Run>>;

	/// Applies a status change to runs matching `filter` whose current status
	/// is still non-terminal. Returns whether at least one row was updated;
	/// `Ok(false)` is the expected outcome when a concurrent writer already
	/// finished the run.
	async fn update_run_status(
		&self,
		filter: &RunFilter<'_>,
		change: &StatusChange,
	) -> TlResult<bool>;
}


// vim: ts=4
