//! Setting definitions and the static registry.
//!
//! Every recognized setting is declared once at process start: default value,
//! declared type (carried by the default's variant), whether changing it
//! requires a service restart, whether it is operator-locked in restricted
//! mode, and an optional validity condition.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;

use crate::prelude::*;

/// Type alias for a setting validity condition
pub type SettingCondition = Box<dyn Fn(&SettingValue) -> bool + Send + Sync>;

/// Operating mode of the owning process, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingMode {
	Standard,
	/// Managed ("cloud") deployments: operator-locked settings cannot be
	/// changed through normal update paths.
	Restricted,
}

/// Setting value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)] // No type tag - the declared type lives in the definition
pub enum SettingValue {
	Bool(bool), // Must be before Int to avoid bool -> int coercion
	Int(i64),
	String(String),
}

impl SettingValue {
	/// Check if this value matches the type of another value
	pub fn matches_type(&self, other: &SettingValue) -> bool {
		matches!(
			(self, other),
			(SettingValue::Bool(_), SettingValue::Bool(_))
				| (SettingValue::Int(_), SettingValue::Int(_))
				| (SettingValue::String(_), SettingValue::String(_))
		)
	}

	/// Get the type name for error messages
	pub fn type_name(&self) -> &'static str {
		match self {
			SettingValue::Bool(_) => "bool",
			SettingValue::Int(_) => "int",
			SettingValue::String(_) => "string",
		}
	}
}

/// Setting definition - static metadata for one setting
pub struct SettingDefinition {
	/// Setting key (e.g. "MAX_JOB_RUNS_PARALLELISM")
	pub key: String,

	/// Human-readable description
	pub description: String,

	/// Default value; also declares the setting's type
	pub default: SettingValue,

	/// Whether a change only takes effect after a service restart
	pub requires_restart: bool,

	/// Whether the setting is operator-locked in restricted mode
	pub locked: bool,

	/// Optional validity condition on top of the type check
	pub condition: Option<SettingCondition>,

	/// Message fragment describing the condition, used in rejection errors
	/// (e.g. "within the range [1, 25]")
	pub condition_msg: Option<String>,
}

impl Debug for SettingDefinition {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SettingDefinition")
			.field("key", &self.key)
			.field("description", &self.description)
			.field("default", &self.default)
			.field("requires_restart", &self.requires_restart)
			.field("locked", &self.locked)
			.field("condition", &self.condition.is_some())
			.field("condition_msg", &self.condition_msg)
			.finish()
	}
}

impl SettingDefinition {
	/// Create a builder for constructing a SettingDefinition
	pub fn builder(key: impl Into<String>) -> SettingDefinitionBuilder {
		SettingDefinitionBuilder::new(key)
	}
}

/// Builder for SettingDefinition with fluent API
pub struct SettingDefinitionBuilder {
	key: String,
	description: Option<String>,
	default: Option<SettingValue>,
	requires_restart: bool,
	locked: bool,
	condition: Option<SettingCondition>,
	condition_msg: Option<String>,
}

impl SettingDefinitionBuilder {
	pub fn new(key: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			description: None,
			default: None,
			requires_restart: false,
			locked: false,
			condition: None,
			condition_msg: None,
		}
	}

	/// Set the description (required)
	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	/// Set the default value (required, also declares the type)
	pub fn default(mut self, value: SettingValue) -> Self {
		self.default = Some(value);
		self
	}

	/// Mark the setting as requiring a restart to take effect
	pub fn requires_restart(mut self, requires_restart: bool) -> Self {
		self.requires_restart = requires_restart;
		self
	}

	/// Mark the setting as operator-locked in restricted mode
	pub fn locked(mut self, locked: bool) -> Self {
		self.locked = locked;
		self
	}

	/// Set a validity condition together with its human-readable message
	pub fn condition<F>(mut self, f: F, msg: impl Into<String>) -> Self
	where
		F: Fn(&SettingValue) -> bool + Send + Sync + 'static,
	{
		self.condition = Some(Box::new(f));
		self.condition_msg = Some(msg.into());
		self
	}

	/// Build the SettingDefinition
	pub fn build(self) -> TlResult<SettingDefinition> {
		let description = self
			.description
			.ok_or_else(|| Error::ConfigError("setting description is required".into()))?;
		let default = self.default.ok_or_else(|| {
			Error::ConfigError(format!("setting '{}' needs a default value", self.key).into())
		})?;

		Ok(SettingDefinition {
			key: self.key,
			description,
			default,
			requires_restart: self.requires_restart,
			locked: self.locked,
			condition: self.condition,
			condition_msg: self.condition_msg,
		})
	}
}

/// Mutable registry used during process initialization
pub struct SettingsRegistry {
	// Registration order is part of the contract: restart-impact reports
	// iterate in this order.
	definitions: Vec<SettingDefinition>,
	index: HashMap<String, usize>,
}

impl SettingsRegistry {
	pub fn new() -> Self {
		Self { definitions: Vec::new(), index: HashMap::new() }
	}

	/// Register a new setting definition
	pub fn register(&mut self, def: SettingDefinition) -> TlResult<()> {
		if self.index.contains_key(&def.key) {
			return Err(Error::ConfigError(
				format!("setting '{}' is already registered", def.key).into(),
			));
		}

		debug!("Registering setting: {}", def.key);
		self.index.insert(def.key.clone(), self.definitions.len());
		self.definitions.push(def);
		Ok(())
	}

	/// Freeze the registry (make it immutable)
	pub fn freeze(self) -> FrozenSettingsRegistry {
		info!("Freezing settings registry with {} definitions", self.definitions.len());
		FrozenSettingsRegistry { definitions: self.definitions, index: self.index }
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}
}

impl Default for SettingsRegistry {
	fn default() -> Self {
		Self::new()
	}
}

/// Immutable registry shared by the resolver and the restart analyzer
pub struct FrozenSettingsRegistry {
	definitions: Vec<SettingDefinition>,
	index: HashMap<String, usize>,
}

impl FrozenSettingsRegistry {
	/// Get a setting definition by key
	pub fn get(&self, key: &str) -> Option<&SettingDefinition> {
		self.index.get(key).map(|i| &self.definitions[*i])
	}

	/// Iterate definitions in registration order
	pub fn iter(&self) -> impl Iterator<Item = &SettingDefinition> {
		self.definitions.iter()
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}
}


// vim: ts=4
