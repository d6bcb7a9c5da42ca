//! Database schema initialization.

use sqlx::SqlitePool;

/// Initialize the database schema with all required tables and indexes
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Settings
	//**********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS settings (
		name text NOT NULL,
		value text,
		PRIMARY KEY(name)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Runs
	//******
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS runs (
		run_id text NOT NULL,
		job_id text,
		status text NOT NULL,
		started_time integer,
		finished_time integer,
		created_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(run_id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_runs_job_status ON runs(job_id, status)")
		.execute(&mut *tx)
		.await?;

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
