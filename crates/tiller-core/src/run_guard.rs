//! Terminal-state transition guard for tracked runs.
//!
//! Workers and the orchestrator both report status changes for the same run;
//! whichever reaches a terminal status first must win. The guard derives the
//! timestamp fields from the reported transition and delegates to the
//! adapter's conditional update, which only matches rows still in a
//! non-terminal status. The losing writer's update affects zero rows and
//! surfaces as `Ok(false)` - never as an error.

use tiller_types::store_adapter::{RunFilter, RunStatus, StatusChange, StoreAdapter};

use crate::prelude::*;

/// A raw status report as received from a worker, with ISO-8601 timestamps.
#[derive(Debug, Clone, Copy)]
pub struct StatusUpdate<'a> {
	pub status: RunStatus,
	pub started_time: Option<&'a str>,
	pub finished_time: Option<&'a str>,
}

/// Applies a status update to the runs matching `filter`, refusing to touch
/// rows that already reached a terminal status.
///
/// Returns whether at least one row was updated, so callers can detect
/// "run already finished, update ignored".
pub async fn apply_status_update(
	store: &dyn StoreAdapter,
	filter: &RunFilter<'_>,
	update: &StatusUpdate<'_>,
) -> TlResult<bool> {
	let mut change =
		StatusChange { status: update.status, started_time: None, finished_time: None };

	if update.status == RunStatus::Started {
		let raw = update
			.started_time
			.ok_or_else(|| Error::BadTimestamp("missing started_time for STARTED".into()))?;
		change.started_time = Some(Timestamp::parse_iso(raw)?);
	} else if update.status.is_terminal() {
		let raw = update.finished_time.ok_or_else(|| {
			Error::BadTimestamp(format!("missing finished_time for {}", update.status).into())
		})?;
		change.finished_time = Some(Timestamp::parse_iso(raw)?);
	}

	let updated = store.update_run_status(filter, &change).await?;
	if !updated {
		debug!("Status update to {} matched no live run, ignored", update.status);
	}
	Ok(updated)
}


// vim: ts=4
