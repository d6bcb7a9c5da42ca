//! Restart-impact analysis.

use std::collections::HashMap;

use crate::settings::registry::{FrozenSettingsRegistry, OperatingMode, SettingValue};

/// Diffs a proposed settings map against the currently active runtime
/// configuration and reports which restart-requiring keys actually changed
/// value, in registration order.
///
/// Locked keys are skipped in restricted mode: their change can never take
/// effect without a separate operator action, so reporting them would only
/// alarm the caller. A key missing from the runtime map counts as changed.
pub fn restart_impact(
	registry: &FrozenSettingsRegistry,
	mode: OperatingMode,
	new: &HashMap<String, SettingValue>,
	runtime: &HashMap<String, SettingValue>,
) -> Vec<String> {
	let mut impacted = Vec::new();

	for def in registry.iter() {
		if !def.requires_restart {
			continue;
		}
		if mode == OperatingMode::Restricted && def.locked {
			continue;
		}
		if let Some(new_val) = new.get(&def.key) {
			if runtime.get(&def.key) != Some(new_val) {
				impacted.push(def.key.clone());
			}
		}
	}

	impacted
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::settings::registry::{SettingDefinition, SettingsRegistry};

	fn test_registry() -> FrozenSettingsRegistry {
		let mut registry = SettingsRegistry::new();
		let defs = [
			("MAX_JOB_RUNS_PARALLELISM", SettingValue::Int(1), true, false),
			("AUTH_ENABLED", SettingValue::Bool(false), true, true),
			("UI_THEME", SettingValue::String("dark".into()), false, false),
		];
		for (key, default, requires_restart, locked) in defs {
			registry
				.register(
					SettingDefinition::builder(key)
						.description(key)
						.default(default)
						.requires_restart(requires_restart)
						.locked(locked)
						.build()
						.unwrap(),
				)
				.unwrap();
		}
		registry.freeze()
	}

	fn map(entries: &[(&str, SettingValue)]) -> HashMap<String, SettingValue> {
		entries.iter().map(|(k, v)| ((*k).to_owned(), v.clone())).collect()
	}

	#[test]
	fn changed_restart_key_is_reported() {
		let registry = test_registry();
		let runtime = map(&[("AUTH_ENABLED", SettingValue::Bool(false))]);
		let new = map(&[("AUTH_ENABLED", SettingValue::Bool(true))]);
		let impacted = restart_impact(&registry, OperatingMode::Standard, &new, &runtime);
		assert_eq!(impacted, vec!["AUTH_ENABLED".to_owned()]);
	}

	#[test]
	fn identical_maps_report_nothing() {
		let registry = test_registry();
		let runtime = map(&[
			("MAX_JOB_RUNS_PARALLELISM", SettingValue::Int(4)),
			("AUTH_ENABLED", SettingValue::Bool(true)),
		]);
		let impacted =
			restart_impact(&registry, OperatingMode::Standard, &runtime.clone(), &runtime);
		assert!(impacted.is_empty());
	}

	#[test]
	fn locked_keys_skipped_in_restricted_mode() {
		let registry = test_registry();
		let runtime = map(&[("AUTH_ENABLED", SettingValue::Bool(false))]);
		let new = map(&[("AUTH_ENABLED", SettingValue::Bool(true))]);
		let impacted = restart_impact(&registry, OperatingMode::Restricted, &new, &runtime);
		assert!(impacted.is_empty());
	}

	#[test]
	fn non_restart_keys_never_reported() {
		let registry = test_registry();
		let runtime = map(&[("UI_THEME", SettingValue::String("dark".into()))]);
		let new = map(&[("UI_THEME", SettingValue::String("light".into()))]);
		let impacted = restart_impact(&registry, OperatingMode::Standard, &new, &runtime);
		assert!(impacted.is_empty());
	}

	#[test]
	fn keys_missing_from_runtime_count_as_changed() {
		let registry = test_registry();
		let new = map(&[
			("MAX_JOB_RUNS_PARALLELISM", SettingValue::Int(2)),
			("AUTH_ENABLED", SettingValue::Bool(true)),
		]);
		let impacted = restart_impact(&registry, OperatingMode::Standard, &new, &HashMap::new());
		// Registration order, not map order
		assert_eq!(
			impacted,
			vec!["MAX_JOB_RUNS_PARALLELISM".to_owned(), "AUTH_ENABLED".to_owned()]
		);
	}
}

// vim: ts=4
