//! Tiller core engine
//!
//! Two subsystems live here: the layered settings engine (registry,
//! validator, resolver, restart-impact analysis) and the terminal-state
//! transition guard for tracked runs. Persistence is consumed through the
//! [`tiller_types::store_adapter::StoreAdapter`] trait; this crate never
//! talks to a database directly.

pub mod core_settings;
pub mod prelude;
pub mod run_guard;
pub mod settings;

pub use tiller_types::{error, store_adapter, types};

// vim: ts=4
