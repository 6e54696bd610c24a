//! Engine and rule-catalog configuration structures.
//!
//! The deployment layer supplies these values at startup: the active rule
//! set (names, priorities, descriptions), the debug flag, and the cluster
//! name, which is an opaque string used only in log formatting.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

fn default_lookup_timeout_ms() -> u64 {
    2_000
}

/// One entry of the active rule set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Rule name, unique within the set.
    pub name: String,
    /// Execution priority; lower runs earlier.
    pub priority: u32,
    /// Human-readable description, carried on audit lines.
    pub description: String,
}

/// Root engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Cluster identifier used in log-message formatting.
    pub cluster_name: String,
    /// Emit audit lines at `info` severity instead of `debug`.
    #[serde(default)]
    pub debug: bool,
    /// Upper bound on a single identity lookup, in milliseconds.
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
    /// The active rule set.
    pub rules: Vec<RuleConfig>,
}

impl EngineConfig {
    /// Validate configuration values.
    ///
    /// An empty rule set is valid (the engine accepts everything); duplicate
    /// rule names are not, and are also re-checked at registration time.
    pub fn validate(&self) -> Result<(), String> {
        if self.cluster_name.trim().is_empty() {
            return Err("cluster_name must not be empty".into());
        }
        if self.lookup_timeout_ms == 0 {
            return Err("lookup_timeout_ms must be greater than 0".into());
        }
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if rule.name.trim().is_empty() {
                return Err("rule name must not be empty".into());
            }
            if !seen.insert(rule.name.as_str()) {
                return Err(format!("duplicate rule name `{}`", rule.name));
            }
        }
        Ok(())
    }

    /// Parse engine configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
