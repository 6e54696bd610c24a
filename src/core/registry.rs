//! Rule registry: the process-wide catalog of policy rules.

use std::collections::HashSet;

use super::error::EngineError;
use super::rule::Rule;

/// Catalog of registered rules.
///
/// Built once during startup configuration loading and read-only during
/// request handling, so it is shared across concurrent invocations without
/// synchronization. Write-once-then-read-many; no removal operation.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
    names: HashSet<String>,
}

impl RuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule.
    ///
    /// Fails with [`EngineError::DuplicateRule`] if a rule with the same name
    /// is already present; a failed registration leaves the registry
    /// unchanged.
    pub fn register(&mut self, rule: Rule) -> Result<(), EngineError> {
        if !self.names.insert(rule.meta.name.clone()) {
            return Err(EngineError::DuplicateRule(rule.meta.name.clone()));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// All rules in execution order: priority ascending, ties broken by name.
    ///
    /// Recomputed on each call rather than cached, so late registrations
    /// during startup are always reflected. The (priority, name) key is a
    /// total order, making execution order reproducible across runs.
    pub fn sorted_by_priority(&self) -> Vec<&Rule> {
        let mut ordered: Vec<&Rule> = self.rules.iter().collect();
        ordered.sort_by(|a, b| {
            a.meta
                .priority
                .cmp(&b.meta.priority)
                .then_with(|| a.meta.name.cmp(&b.meta.name))
        });
        ordered
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
