//! Layered settings resolution: locked -> stored -> default.
//!
//! `TillerSettings` is constructed once at startup (or wherever a fresh
//! snapshot is needed) and passed by reference; there is no ambient global
//! state. Reads operate on the in-memory snapshot; callers needing freshness
//! re-load.

use std::collections::HashMap;
use std::sync::Arc;

use tiller_types::store_adapter::StoreAdapter;

use crate::prelude::*;
use crate::settings::registry::{FrozenSettingsRegistry, OperatingMode, SettingValue};
use crate::settings::restart::restart_impact;
use crate::settings::validator::validate_map;

/// The effective system configuration, composed of three precedence layers.
///
/// - *Locked layer*: non-empty only in restricted mode; holds the values of
///   operator-locked settings captured at load time.
/// - *Stored layer*: values persisted by prior `save` calls.
/// - *Default layer*: the registry defaults, covering every key.
pub struct TillerSettings {
	registry: Arc<FrozenSettingsRegistry>,
	mode: OperatingMode,
	locked: HashMap<String, SettingValue>,
	stored: HashMap<String, SettingValue>,
}

impl TillerSettings {
	/// Loads the stored layer from the adapter and builds the snapshot.
	///
	/// Persisted values are validated in migrating mode so the process can
	/// boot on corrupted data; values that still fail (locked keys in
	/// restricted mode) surface as [`Error::CorruptedState`]. Healing only
	/// mutates the in-memory layer; nothing is persisted until `save`.
	pub async fn load(
		registry: Arc<FrozenSettingsRegistry>,
		mode: OperatingMode,
		store: &dyn StoreAdapter,
	) -> TlResult<Self> {
		let raw = store.read_settings().await?;
		let mut stored: HashMap<String, SettingValue> = HashMap::with_capacity(raw.len());

		for (key, value) in raw {
			let Some(def) = registry.get(&key) else {
				// Dropped here, pruned from the store on the next save.
				warn!("Dropping persisted setting with no definition: {}", key);
				continue;
			};
			match serde_json::from_value::<SettingValue>(value) {
				Ok(value) => {
					stored.insert(key.into(), value);
				}
				Err(_) if mode == OperatingMode::Restricted && def.locked => {
					return Err(Error::CorruptedState(
						format!("locked setting '{key}' has an unreadable value").into(),
					));
				}
				Err(_) => {
					warn!("Migrating unreadable persisted setting to default: {}", key);
					stored.insert(key.into(), def.default.clone());
				}
			}
		}

		validate_map(&registry, mode, &mut stored, true).map_err(|err| match err {
			err @ (Error::TypeMismatch { .. } | Error::InvalidValue { .. }) => {
				Error::CorruptedState(
					format!("persisted settings failed migration: {err}").into(),
				)
			}
			err => err,
		})?;

		let mut locked = HashMap::new();
		if mode == OperatingMode::Restricted {
			for def in registry.iter().filter(|def| def.locked) {
				// Keys absent from the stored layer are left out; lookups
				// fall through to the default layer anyway.
				if let Some(value) = stored.get(&def.key) {
					locked.insert(def.key.clone(), value.clone());
				}
			}
		}

		info!("Loaded settings snapshot ({} stored, {} locked)", stored.len(), locked.len());
		Ok(Self { registry, mode, locked, stored })
	}

	/// Returns the first defined value across locked -> stored -> default.
	///
	/// The default layer covers every registered key, so this only fails for
	/// keys with no definition at all.
	pub fn get(&self, key: &str) -> TlResult<&SettingValue> {
		if let Some(value) = self.locked.get(key) {
			return Ok(value);
		}
		if let Some(value) = self.stored.get(key) {
			return Ok(value);
		}
		match self.registry.get(key) {
			Some(def) => Ok(&def.default),
			None => Err(Error::UnknownKey(key.into())),
		}
	}

	/// Flattens all three layers into one map, locked and stored values
	/// overriding defaults.
	pub fn as_map(&self) -> HashMap<String, SettingValue> {
		let mut flat: HashMap<String, SettingValue> = self
			.registry
			.iter()
			.map(|def| (def.key.clone(), def.default.clone()))
			.collect();
		for (key, value) in &self.stored {
			flat.insert(key.clone(), value.clone());
		}
		for (key, value) in &self.locked {
			flat.insert(key.clone(), value.clone());
		}
		flat
	}

	/// Merges a partial candidate update into the stored layer.
	///
	/// Validation never migrates here: operator mistakes are rejected so they
	/// are visible immediately. Nothing is persisted until `save`. A valid
	/// write to a locked key is accepted into the stored layer but stays
	/// shadowed by the locked layer until the next load.
	pub fn update(&mut self, candidate: HashMap<String, SettingValue>) -> TlResult<()> {
		let candidate = self.validate_candidate(candidate)?;
		self.stored.extend(candidate);
		Ok(())
	}

	/// Replaces the stored layer with the candidate wholesale.
	pub fn set(&mut self, candidate: HashMap<String, SettingValue>) -> TlResult<()> {
		let candidate = self.validate_candidate(candidate)?;
		self.stored = candidate;
		Ok(())
	}

	fn validate_candidate(
		&self,
		mut candidate: HashMap<String, SettingValue>,
	) -> TlResult<HashMap<String, SettingValue>> {
		validate_map(&self.registry, self.mode, &mut candidate, false).inspect_err(|err| {
			error!("Rejected settings update with incorrect types or values: {}", err);
		})?;
		Ok(candidate)
	}

	/// Persists the effective map atomically (upsert + prune in one
	/// transaction) and, when a runtime map is supplied, reports which
	/// restart-requiring keys actually changed.
	pub async fn save(
		&self,
		store: &dyn StoreAdapter,
		runtime: Option<&HashMap<String, SettingValue>>,
	) -> TlResult<Option<Vec<String>>> {
		let flat = self.as_map();

		let mut pairs: Vec<(Box<str>, serde_json::Value)> = Vec::with_capacity(flat.len());
		for (key, value) in &flat {
			let json = serde_json::to_value(value)
				.map_err(|err| Error::ConfigError(format!("unserializable setting: {err}").into()))?;
			pairs.push((key.as_str().into(), json));
		}
		store.replace_settings(&pairs).await?;

		Ok(runtime.map(|runtime| restart_impact(&self.registry, self.mode, &flat, runtime)))
	}

	pub fn registry(&self) -> &Arc<FrozenSettingsRegistry> {
		&self.registry
	}

	pub fn mode(&self) -> OperatingMode {
		self.mode
	}
}


// vim: ts=4
