//! Build a rule engine from configuration using handler factories.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{EngineConfig, RuleConfig};
use crate::core::{EngineError, IdentityResolver, Rule, RuleEngine, RuleHandler, RuleRegistry};
use crate::rules::DefaultPartitionRule;

/// Build a rule engine from validated configuration.
///
/// Each configured rule is bound to its handler through the factory closure
/// at build time; an unknown rule name is a fatal startup error, never a
/// per-request one. The returned engine is ready to accept traffic.
pub fn build_engine<F>(
    cfg: &EngineConfig,
    identity: Arc<dyn IdentityResolver>,
    mut handler_factory: F,
) -> Result<RuleEngine, EngineError>
where
    F: FnMut(&RuleConfig) -> Result<Arc<dyn RuleHandler>, EngineError>,
{
    cfg.validate().map_err(EngineError::InvalidConfig)?;

    let mut registry = RuleRegistry::new();
    for rule_cfg in &cfg.rules {
        let handler = handler_factory(rule_cfg)?;
        registry.register(Rule::new(
            rule_cfg.name.clone(),
            rule_cfg.priority,
            rule_cfg.description.clone(),
            handler,
        ))?;
    }

    Ok(RuleEngine::new(
        registry,
        identity,
        cfg.cluster_name.clone(),
        cfg.debug,
        Duration::from_millis(cfg.lookup_timeout_ms),
    ))
}

/// Factory for the shipped rule catalog.
///
/// Deployment configuration refers to shipped rules by name; anything else
/// fails the build with [`EngineError::UnknownRule`].
pub fn builtin_handler(rule_cfg: &RuleConfig) -> Result<Arc<dyn RuleHandler>, EngineError> {
    match rule_cfg.name.as_str() {
        "part" => Ok(Arc::new(DefaultPartitionRule)),
        other => Err(EngineError::UnknownRule(other.to_string())),
    }
}
