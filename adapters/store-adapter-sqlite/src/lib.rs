//! SQLite-backed implementation of the Tiller [`StoreAdapter`].
//!
//! Settings are stored as JSON text in a plain key/value table; run records
//! live in a `runs` table whose status column enforces the terminal-state
//! guard through conditional updates.

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::collections::HashMap;
use std::path::Path;

use tiller::prelude::*;
use tiller::store_adapter::{NewRun, Run, RunFilter, StatusChange, StoreAdapter};

mod run;
mod schema;
mod setting;
mod utils;

#[derive(Debug)]
pub struct StoreAdapterSqlite {
	db: SqlitePool,
}

impl StoreAdapterSqlite {
	pub async fn new(path: impl AsRef<Path>) -> TlResult<Self> {
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref())
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| warn!("DB: {:#?}", err))
			.map_err(|_| Error::DbError)?;

		schema::init_db(&db)
			.await
			.inspect_err(|err| warn!("DB: {:#?}", err))
			.map_err(|_| Error::DbError)?;

		Ok(Self { db })
	}
}

#[async_trait]
impl StoreAdapter for StoreAdapterSqlite {
	// Settings
	//**********
	async fn read_settings(&self) -> TlResult<HashMap<Box<str>, serde_json::Value>> {
		setting::read_all(&self.db).await
	}

	async fn replace_settings(&self, pairs: &[(Box<str>, serde_json::Value)]) -> TlResult<()> {
		setting::replace_all(&self.db, pairs).await
	}

	// Runs
	//******
	async fn create_run(&self, new_run: &NewRun<'_>) -> TlResult<()> {
		run::create(&self.db, new_run).await
	}

	async fn read_run(&self, run_id: &str) -> TlResult<Run> {
		run::read(&self.db, run_id).await
	}

	async fn list_runs(&self, filter: &RunFilter<'_>) -> TlResult<Vec<Run>> {
		run::list(&self.db, filter).await
	}

	async fn update_run_status(
		&self,
		filter: &RunFilter<'_>,
		change: &StatusChange,
	) -> TlResult<bool> {
		run::update_status(&self.db, filter, change).await
	}
}

// vim: ts=4
