//! Settings subsystem: registry, validation, layered resolution, and
//! restart-impact analysis.

pub mod registry;
pub mod resolver;
pub mod restart;
pub mod validator;

pub use registry::{
	FrozenSettingsRegistry, OperatingMode, SettingDefinition, SettingDefinitionBuilder,
	SettingValue, SettingsRegistry,
};
pub use resolver::TillerSettings;
pub use restart::restart_impact;

// vim: ts=4
