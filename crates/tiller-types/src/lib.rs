//! Shared types, adapter traits, and error types for the Tiller settings engine.
//!
//! This crate contains the foundational types shared between the core engine
//! and all store adapter implementations. Keeping them in a separate crate
//! lets adapters compile without depending on the engine itself.

pub mod error;
pub mod prelude;
pub mod store_adapter;
pub mod types;

// vim: ts=4
