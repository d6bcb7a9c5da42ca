//! Candidate validation with optional migration to defaults.
//!
//! Interactive updates run with `migrate = false` so operator mistakes are
//! rejected loudly. Boot-time validation of persisted state runs with
//! `migrate = true` so corrupted values are healed instead of preventing
//! startup. Operator-locked settings are never healed in restricted mode:
//! silently resetting an authentication-relevant value could disable access
//! control.

use std::collections::HashMap;

use crate::prelude::*;
use crate::settings::registry::{FrozenSettingsRegistry, OperatingMode, SettingValue};

/// Validates `candidate` against the registry, mutating it in place when
/// `migrate` is set.
///
/// Keys absent from `candidate` are skipped silently; partial updates are
/// legal and fall back to defaults at resolution time. Keys unknown to the
/// registry are not checked.
pub fn validate_map(
	registry: &FrozenSettingsRegistry,
	mode: OperatingMode,
	candidate: &mut HashMap<String, SettingValue>,
	migrate: bool,
) -> TlResult<()> {
	for def in registry.iter() {
		let Some(given) = candidate.get(&def.key) else {
			debug!("Missing value for config option: {}", def.key);
			continue;
		};

		let never_migrate = mode == OperatingMode::Restricted && def.locked;

		if !given.matches_type(&def.default) {
			if !migrate || never_migrate {
				return Err(Error::TypeMismatch {
					key: def.key.as_str().into(),
					expected: def.default.type_name(),
					actual: given.type_name(),
				});
			}
			candidate.insert(def.key.clone(), def.default.clone());
			// The substituted default needs no further checking.
			continue;
		}

		if let Some(condition) = &def.condition {
			if !condition(given) {
				if !migrate || never_migrate {
					return Err(Error::InvalidValue {
						key: def.key.as_str().into(),
						message: def.condition_msg.as_deref().unwrap_or("a valid value").into(),
					});
				}
				candidate.insert(def.key.clone(), def.default.clone());
			}
		}
	}

	Ok(())
}


// vim: ts=4
