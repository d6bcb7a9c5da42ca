//! Common types used throughout the Tiller engine.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::prelude::*;

// Timestamp //
//***********//
/// Unix timestamp in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Self {
		let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
		Timestamp(res.as_secs() as i64)
	}

	/// Parses an ISO-8601 / RFC 3339 timestamp as reported by workers.
	///
	/// Accepts both offset-carrying forms ("2024-05-01T12:00:00+00:00") and
	/// naive forms ("2024-05-01T12:00:00.123"), the latter interpreted as UTC.
	pub fn parse_iso(raw: &str) -> TlResult<Self> {
		if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
			return Ok(Timestamp(dt.timestamp()));
		}
		chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
			.map(|dt| Timestamp(dt.and_utc().timestamp()))
			.map_err(|_| Error::BadTimestamp(raw.into()))
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for Timestamp {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_i64(self.0)
	}
}

impl<'de> Deserialize<'de> for Timestamp {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(Timestamp(i64::deserialize(deserializer)?))
	}
}


// vim: ts=4
