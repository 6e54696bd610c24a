//! Core admission abstractions: descriptor model, rules, registry, executor.

pub mod error;
pub mod descriptor;
pub mod identity;
pub mod audit;
pub mod rule;
pub mod registry;
pub mod executor;

pub use error::{AppResult, EngineError, RuleViolation, ViolationCode};
pub use descriptor::{JobDescriptor, JobRecord, Partition, PartitionCatalog, Uid};
pub use identity::{IdentityError, IdentityResolver};
pub use audit::{AuditLog, AuditRecord, AuditSink, InMemoryAuditSink};
pub use rule::{Rule, RuleContext, RuleHandler, RuleMeta};
pub use registry::RuleRegistry;
pub use executor::{RuleEngine, Verdict};
