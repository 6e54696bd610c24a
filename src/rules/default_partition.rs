//! Default-partition routing rule.

use async_trait::async_trait;

use crate::core::{
    JobDescriptor, PartitionCatalog, RuleContext, RuleHandler, RuleViolation,
};

/// Ensures every job carries a concrete partition before leaving the engine.
///
/// A user-specified partition is left untouched. Otherwise the catalog's
/// default partition, when one exists, is written into the descriptor and an
/// audit line records the routing decision. A catalog without a default
/// leaves the partition unset; whether that is acceptable is the downstream
/// scheduler's call, not this rule's.
pub struct DefaultPartitionRule;

#[async_trait]
impl RuleHandler for DefaultPartitionRule {
    async fn on_submit(
        &self,
        job: &mut JobDescriptor,
        partitions: &PartitionCatalog,
        ctx: &RuleContext<'_>,
    ) -> Result<(), RuleViolation> {
        if job.partition.is_some() {
            // Idempotent: a user-specified partition wins.
            return Ok(());
        }
        match partitions.default_partition() {
            Some(default) => {
                job.set_partition(&default.name);
                let user = ctx.resolve_username().await;
                ctx.log(&format!(
                    "cluster {}: routed job from user {user} (uid {}) to default partition {}",
                    ctx.cluster(),
                    ctx.uid(),
                    default.name
                ));
            }
            None => {
                tracing::debug!(
                    uid = ctx.uid(),
                    "no default partition in catalog; leaving partition unset"
                );
            }
        }
        Ok(())
    }
}
