//! Built-in engine settings registration.

use uuid::Uuid;

use crate::prelude::*;
use crate::settings::{SettingDefinition, SettingValue, SettingsRegistry};

/// Register all built-in settings.
///
/// Called once at process start, before the registry is frozen. The locked
/// settings are the operator-owned ones in restricted deployments: resetting
/// any of them behind the operator's back could disable authentication or
/// telemetry consent.
pub fn register_settings(registry: &mut SettingsRegistry) -> TlResult<()> {
	// Job run parallelism
	registry.register(
		SettingDefinition::builder("MAX_JOB_RUNS_PARALLELISM")
			.description("Maximum number of job runs executing in parallel")
			.default(SettingValue::Int(1))
			.requires_restart(true)
			.condition(
				|v| matches!(v, SettingValue::Int(x) if (1..=25).contains(x)),
				"within the range [1, 25]",
			)
			.build()?,
	)?;

	// Interactive run parallelism
	registry.register(
		SettingDefinition::builder("MAX_INTERACTIVE_RUNS_PARALLELISM")
			.description("Maximum number of interactive runs executing in parallel")
			.default(SettingValue::Int(1))
			.requires_restart(true)
			.condition(
				|v| matches!(v, SettingValue::Int(x) if (1..=25).contains(x)),
				"within the range [1, 25]",
			)
			.build()?,
	)?;

	// Authentication toggle
	registry.register(
		SettingDefinition::builder("AUTH_ENABLED")
			.description("Require authentication for all requests")
			.default(SettingValue::Bool(false))
			.requires_restart(true)
			.locked(true)
			.build()?,
	)?;

	// Telemetry opt-out
	registry.register(
		SettingDefinition::builder("TELEMETRY_DISABLED")
			.description("Disable anonymous usage telemetry")
			.default(SettingValue::Bool(false))
			.requires_restart(true)
			.locked(true)
			.build()?,
	)?;

	// Telemetry instance identifier, generated fresh per registry so new
	// installations get a unique id.
	registry.register(
		SettingDefinition::builder("TELEMETRY_UUID")
			.description("Anonymous identifier for telemetry reporting")
			.default(SettingValue::String(Uuid::new_v4().to_string()))
			.requires_restart(true)
			.locked(true)
			.build()?,
	)?;

	// Support contact address
	registry.register(
		SettingDefinition::builder("INTERCOM_USER_EMAIL")
			.description("Email address used for support conversations")
			.default(SettingValue::String("johndoe@example.org".into()))
			.requires_restart(true)
			.locked(true)
			.build()?,
	)?;

	Ok(())
}


// vim: ts=4
