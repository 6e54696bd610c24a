//! Configuration models for the engine and its rule catalog.

pub mod engine;

pub use engine::{EngineConfig, RuleConfig};
