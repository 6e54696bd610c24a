//! Rule executor: the submit and modify entry points invoked by the
//! scheduler daemon.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::audit::{AuditLog, AuditSink};
use super::descriptor::{JobDescriptor, JobRecord, PartitionCatalog, Uid};
use super::error::ViolationCode;
use super::identity::IdentityResolver;
use super::registry::RuleRegistry;
use super::rule::RuleContext;

/// Outcome of one submission or modification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// All rules passed; the descriptor is finalized for the scheduler.
    Accepted,
    /// A rule refused the job; remaining rules did not run.
    Rejected {
        /// Name of the rule that raised the rejection.
        rule: String,
        /// Rejection category.
        code: ViolationCode,
        /// Actionable, user-facing message.
        message: String,
    },
}

impl Verdict {
    /// Whether the request was accepted.
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Applies the registered rule chain to incoming requests.
///
/// One engine instance serves the whole process: the registry is immutable
/// after construction and every entry point takes `&self`, so concurrent
/// invocations for different jobs need no locking among themselves. Rule
/// execution within one invocation is strictly sequential; later rules may
/// depend on mutations made by earlier ones.
pub struct RuleEngine {
    registry: RuleRegistry,
    identity: Arc<dyn IdentityResolver>,
    audit: AuditLog,
    cluster: String,
    lookup_timeout: Duration,
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("registry", &self.registry)
            .field("cluster", &self.cluster)
            .field("lookup_timeout", &self.lookup_timeout)
            .finish_non_exhaustive()
    }
}

impl RuleEngine {
    /// Create an engine from a populated registry.
    pub fn new(
        registry: RuleRegistry,
        identity: Arc<dyn IdentityResolver>,
        cluster: impl Into<String>,
        debug: bool,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            identity,
            audit: AuditLog::new(debug),
            cluster: cluster.into(),
            lookup_timeout,
        }
    }

    /// Attach an audit sink that captures every emitted record.
    #[must_use]
    pub fn with_audit_sink(mut self, sink: Box<dyn AuditSink>) -> Self {
        self.audit = self.audit.with_sink(sink);
        self
    }

    /// The registered rule catalog.
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Run the submit chain over a new request.
    ///
    /// Rules run in (priority, name) order; the first policy failure halts
    /// the chain and is surfaced with the offending rule's name. Mutations
    /// made by earlier rules stay applied even when the job is ultimately
    /// rejected.
    pub async fn submit(
        &self,
        job: &mut JobDescriptor,
        partitions: &PartitionCatalog,
        submitting_uid: Uid,
    ) -> Verdict {
        for rule in self.registry.sorted_by_priority() {
            tracing::debug!(
                rule = %rule.meta.name,
                priority = rule.meta.priority,
                uid = submitting_uid,
                "applying submit rule"
            );
            let ctx = self.context_for(rule, submitting_uid);
            if let Err(violation) = rule.handler().on_submit(job, partitions, &ctx).await {
                tracing::info!(
                    rule = %rule.meta.name,
                    code = %violation.code,
                    uid = submitting_uid,
                    "submission rejected: {}",
                    violation.message
                );
                return Verdict::Rejected {
                    rule: rule.meta.name.clone(),
                    code: violation.code,
                    message: violation.message,
                };
            }
        }
        tracing::debug!(uid = submitting_uid, partition = ?job.partition, "submission accepted");
        Verdict::Accepted
    }

    /// Run the modify chain over a change to an already-accepted job.
    ///
    /// The symmetric lifecycle hook to [`submit`](Self::submit). The shipped
    /// catalog installs no modify logic, so every handler's default no-op
    /// runs and the request is accepted; the entry point exists so future
    /// rules can attach without a signature change.
    pub async fn modify(
        &self,
        job: &mut JobDescriptor,
        existing: &JobRecord,
        partitions: &PartitionCatalog,
        modifying_uid: Uid,
    ) -> Verdict {
        for rule in self.registry.sorted_by_priority() {
            tracing::debug!(
                rule = %rule.meta.name,
                priority = rule.meta.priority,
                job_id = existing.job_id,
                "applying modify rule"
            );
            let ctx = self.context_for(rule, modifying_uid);
            if let Err(violation) = rule
                .handler()
                .on_modify(job, existing, partitions, &ctx)
                .await
            {
                tracing::info!(
                    rule = %rule.meta.name,
                    code = %violation.code,
                    job_id = existing.job_id,
                    "modification rejected: {}",
                    violation.message
                );
                return Verdict::Rejected {
                    rule: rule.meta.name.clone(),
                    code: violation.code,
                    message: violation.message,
                };
            }
        }
        Verdict::Accepted
    }

    fn context_for<'a>(&'a self, rule: &'a super::rule::Rule, uid: Uid) -> RuleContext<'a> {
        RuleContext::new(
            &rule.meta,
            uid,
            &self.cluster,
            self.identity.as_ref(),
            &self.audit,
            self.lookup_timeout,
        )
    }
}
