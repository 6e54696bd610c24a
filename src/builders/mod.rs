//! Builders to construct a ready engine from configuration.

pub mod engine_builder;

pub use engine_builder::{build_engine, builtin_handler};
