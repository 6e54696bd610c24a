//! Rule model: named, prioritized policy units and the per-invocation
//! context their handlers run against.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::audit::AuditLog;
use super::descriptor::{JobDescriptor, JobRecord, PartitionCatalog, Uid};
use super::error::RuleViolation;
use super::identity::IdentityResolver;

/// Identifying metadata of a rule: what audit lines are stamped with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMeta {
    /// Unique rule name.
    pub name: String,
    /// Execution priority; lower runs earlier. Ties break by name.
    pub priority: u32,
    /// Human-readable description, carried on audit lines.
    pub description: String,
}

impl RuleMeta {
    /// Create rule metadata.
    pub fn new(name: impl Into<String>, priority: u32, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority,
            description: description.into(),
        }
    }
}

/// Policy logic invoked for each job passing through the engine.
///
/// Handlers are bound to their rule entry once at registration time, so a
/// missing handler is a startup failure rather than a per-request one.
/// `on_modify` defaults to a no-op success: the modify lifecycle hook exists
/// so future rules can attach without an interface change.
#[async_trait]
pub trait RuleHandler: Send + Sync {
    /// Inspect and possibly mutate a new submission.
    ///
    /// Returning `Err` halts the chain and rejects the job; mutations made so
    /// far stay applied.
    async fn on_submit(
        &self,
        job: &mut JobDescriptor,
        partitions: &PartitionCatalog,
        ctx: &RuleContext<'_>,
    ) -> Result<(), RuleViolation>;

    /// Inspect a requested change to an already-accepted job.
    async fn on_modify(
        &self,
        job: &mut JobDescriptor,
        existing: &JobRecord,
        partitions: &PartitionCatalog,
        ctx: &RuleContext<'_>,
    ) -> Result<(), RuleViolation> {
        let _ = (job, existing, partitions, ctx);
        Ok(())
    }
}

/// A registered rule: metadata plus its handler, bound at registration time.
#[derive(Clone)]
pub struct Rule {
    /// Name, priority, and description.
    pub meta: RuleMeta,
    handler: Arc<dyn RuleHandler>,
}

impl Rule {
    /// Bind a handler to rule metadata.
    pub fn new(
        name: impl Into<String>,
        priority: u32,
        description: impl Into<String>,
        handler: Arc<dyn RuleHandler>,
    ) -> Self {
        Self {
            meta: RuleMeta::new(name, priority, description),
            handler,
        }
    }

    /// The bound handler.
    pub fn handler(&self) -> &dyn RuleHandler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("meta", &self.meta).finish_non_exhaustive()
    }
}

/// Per-invocation view handed to a rule handler: the submitting identity,
/// cluster constants for log formatting, and the audit/identity capabilities.
///
/// Built by the executor for each rule in the chain; the audit helper stamps
/// lines with this rule's priority, name, and description.
pub struct RuleContext<'a> {
    rule: &'a RuleMeta,
    uid: Uid,
    cluster: &'a str,
    identity: &'a dyn IdentityResolver,
    audit: &'a AuditLog,
    lookup_timeout: Duration,
}

impl<'a> RuleContext<'a> {
    /// Assemble a context for one rule invocation.
    pub fn new(
        rule: &'a RuleMeta,
        uid: Uid,
        cluster: &'a str,
        identity: &'a dyn IdentityResolver,
        audit: &'a AuditLog,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            rule,
            uid,
            cluster,
            identity,
            audit,
            lookup_timeout,
        }
    }

    /// Uid the request was submitted (or modified) under.
    pub fn uid(&self) -> Uid {
        self.uid
    }

    /// Cluster name, an opaque constant used in log formatting.
    pub fn cluster(&self) -> &str {
        self.cluster
    }

    /// Resolve the requesting uid to a display name for audit purposes.
    ///
    /// Bounded by the configured lookup timeout and trimmed to a single
    /// line. Degrades to an empty string on failure or timeout; a lookup
    /// problem never blocks the submission decision.
    pub async fn resolve_username(&self) -> String {
        let lookup = self.identity.resolve_username(self.uid);
        match tokio::time::timeout(self.lookup_timeout, lookup).await {
            Ok(Ok(name)) => name.lines().next().unwrap_or_default().trim().to_string(),
            Ok(Err(e)) => {
                tracing::warn!(uid = self.uid, error = %e, "identity lookup failed");
                String::new()
            }
            Err(_) => {
                tracing::warn!(
                    uid = self.uid,
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    "identity lookup timed out"
                );
                String::new()
            }
        }
    }

    /// Emit an audit line stamped with this rule's metadata.
    pub fn log(&self, message: &str) {
        self.audit.record(self.rule, message);
    }
}
