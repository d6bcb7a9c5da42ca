//! Run record persistence and the guarded status update.

use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use tiller::prelude::*;
use tiller::store_adapter::{NewRun, Run, RunFilter, RunStatus, StatusChange};

use crate::utils::*;

fn run_from_row(row: &SqliteRow) -> TlResult<Run> {
	let status: &str = row.try_get("status").map_err(|_| Error::DbError)?;
	Ok(Run {
		run_id: row.try_get("run_id").map_err(|_| Error::DbError)?,
		job_id: row.try_get("job_id").map_err(|_| Error::DbError)?,
		status: RunStatus::parse(status).ok_or(Error::DbError)?,
		started_time: row
			.try_get::<Option<i64>, _>("started_time")
			.map_err(|_| Error::DbError)?
			.map(Timestamp),
		finished_time: row
			.try_get::<Option<i64>, _>("finished_time")
			.map_err(|_| Error::DbError)?
			.map(Timestamp),
		created_at: row.try_get("created_at").map(Timestamp).map_err(|_| Error::DbError)?,
	})
}

/// Create a new run record; runs always start out PENDING
pub(crate) async fn create(db: &SqlitePool, run: &NewRun<'_>) -> TlResult<()> {
	sqlx::query("INSERT INTO runs (run_id, job_id, status, created_at) VALUES (?, ?, ?, ?)")
		.bind(run.run_id)
		.bind(run.job_id)
		.bind(RunStatus::Pending.as_str())
		.bind(Timestamp::now().0)
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	Ok(())
}

/// Read a single run by id
pub(crate) async fn read(db: &SqlitePool, run_id: &str) -> TlResult<Run> {
	let row = sqlx::query(
		"SELECT run_id, job_id, status, started_time, finished_time, created_at
		FROM runs WHERE run_id = ?",
	)
	.bind(run_id)
	.fetch_optional(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	match row {
		Some(row) => run_from_row(&row),
		None => Err(Error::NotFound),
	}
}

/// List runs matching the filter
pub(crate) async fn list(db: &SqlitePool, filter: &RunFilter<'_>) -> TlResult<Vec<Run>> {
	let mut query = sqlx::QueryBuilder::new(
		"SELECT run_id, job_id, status, started_time, finished_time, created_at
		FROM runs WHERE 1=1",
	);
	if let Some(run_id) = filter.run_id {
		query.push(" AND run_id=").push_bind(run_id);
	}
	if let Some(job_id) = filter.job_id {
		query.push(" AND job_id=").push_bind(job_id);
	}
	if let Some(status) = filter.status {
		query.push(" AND status=").push_bind(status.as_str());
	}
	query.push(" ORDER BY created_at, run_id");

	let rows = query
		.build()
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	let mut runs = Vec::with_capacity(rows.len());
	for row in &rows {
		runs.push(run_from_row(row)?);
	}
	Ok(runs)
}

/// Apply a status change to matching runs that are still in a live status.
///
/// The `status IN ('PENDING', 'STARTED')` predicate is evaluated by SQLite
/// inside the UPDATE itself, which is what makes concurrent writers safe: a
/// run that already reached SUCCESS, FAILURE or ABORTED matches no row, so a
/// late or conflicting report cannot overwrite the terminal result.
pub(crate) async fn update_status(
	db: &SqlitePool,
	filter: &RunFilter<'_>,
	change: &StatusChange,
) -> TlResult<bool> {
	let mut query = sqlx::QueryBuilder::new("UPDATE runs SET status=");
	query.push_bind(change.status.as_str());
	if let Some(started_time) = change.started_time {
		query.push(", started_time=").push_bind(started_time.0);
	}
	if let Some(finished_time) = change.finished_time {
		query.push(", finished_time=").push_bind(finished_time.0);
	}

	// The filter can only narrow within the live set, never widen it.
	query.push(" WHERE status IN ('PENDING', 'STARTED')");
	if let Some(run_id) = filter.run_id {
		query.push(" AND run_id=").push_bind(run_id);
	}
	if let Some(job_id) = filter.job_id {
		query.push(" AND job_id=").push_bind(job_id);
	}
	if let Some(status) = filter.status {
		query.push(" AND status=").push_bind(status.as_str());
	}

	let res = query
		.build()
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	Ok(res.rows_affected() > 0)
}

// vim: ts=4
