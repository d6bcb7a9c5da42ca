//! Settings key-value persistence.
//!
//! Values are stored as JSON text. `replace_all` implements the engine's
//! save protocol: upsert every pair and prune rows outside the key set, in a
//! single transaction so partial application is impossible.

use std::collections::HashMap;

use sqlx::{Row, SqlitePool};

use tiller::prelude::*;

use crate::utils::*;

/// Read all persisted settings
pub(crate) async fn read_all(db: &SqlitePool) -> TlResult<HashMap<Box<str>, serde_json::Value>> {
	let rows = sqlx::query("SELECT name, value FROM settings")
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	let mut settings = HashMap::new();
	for row in rows {
		let name: Box<str> = row.try_get("name").map_err(|_| Error::DbError)?;
		let value: Option<String> = row.try_get("value").map_err(|_| Error::DbError)?;
		settings.insert(
			name,
			value
				.and_then(|v| serde_json::from_str(&v).ok())
				.unwrap_or(serde_json::Value::Null),
		);
	}

	Ok(settings)
}

/// Replace the persisted settings with the given pairs atomically
pub(crate) async fn replace_all(
	db: &SqlitePool,
	pairs: &[(Box<str>, serde_json::Value)],
) -> TlResult<()> {
	let mut tx = db.begin().await.map_err(|_| Error::DbError)?;

	for (name, value) in pairs {
		sqlx::query(
			"INSERT INTO settings (name, value) VALUES (?, ?)
			ON CONFLICT(name) DO UPDATE SET value=excluded.value",
		)
		.bind(&**name)
		.bind(value.to_string())
		.execute(&mut *tx)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;
	}

	// Prune settings that are no longer part of the configuration
	if pairs.is_empty() {
		sqlx::query("DELETE FROM settings")
			.execute(&mut *tx)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::DbError)?;
	} else {
		let keys: Vec<&str> = pairs.iter().map(|(name, _)| &**name).collect();
		let mut query = sqlx::QueryBuilder::new("DELETE FROM settings WHERE name NOT IN ");
		query = push_in(query, &keys);
		query
			.build()
			.execute(&mut *tx)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::DbError)?;
	}

	tx.commit().await.map_err(|_| Error::DbError)?;

	Ok(())
}

// vim: ts=4
