//! Job descriptor model: the submission under evaluation and the read-only
//! partition catalog it is evaluated against.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Numeric identifier of a submitting or modifying user.
pub type Uid = u32;

/// One job submission request under evaluation.
///
/// Constructed by the scheduler daemon immediately before invoking an entry
/// point and owned by it; the engine receives a mutable reference for the
/// duration of one call and never retains it. Mutations made by a rule are
/// visible to later rules in the same chain and to the daemon afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDescriptor {
    /// Uid the job was submitted under.
    pub submit_uid: Uid,
    /// Requested partition, if the user named one. Rules may fill this in.
    pub partition: Option<String>,
    /// Additional job attributes (resource limits, account, QOS, ...) passed
    /// through opaquely; the engine never interprets these itself.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl JobDescriptor {
    /// Create a descriptor with no partition and no attributes.
    pub fn new(submit_uid: Uid) -> Self {
        Self {
            submit_uid,
            partition: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Set the requested partition, replacing any previous value.
    pub fn set_partition(&mut self, name: impl Into<String>) {
        self.partition = Some(name.into());
    }

    /// Attach an opaque attribute.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }
}

/// A named pool of schedulable resources a job can be routed to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partition {
    /// Partition name, unique within a catalog.
    pub name: String,
    /// Whether this partition is the catalog's default target.
    pub is_default: bool,
}

impl Partition {
    /// Create a partition entry.
    pub fn new(name: impl Into<String>, is_default: bool) -> Self {
        Self {
            name: name.into(),
            is_default,
        }
    }
}

/// Read-only collection of partitions the submitting identity may use.
///
/// Supplied fresh per call by the scheduler daemon; never mutated here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartitionCatalog {
    partitions: Vec<Partition>,
}

impl PartitionCatalog {
    /// Build a catalog from partition entries.
    pub fn new(partitions: Vec<Partition>) -> Self {
        Self { partitions }
    }

    /// Look up a partition by name.
    pub fn get(&self, name: &str) -> Option<&Partition> {
        self.partitions.iter().find(|p| p.name == name)
    }

    /// The partition flagged as default, if any.
    ///
    /// A well-formed catalog flags at most one. Catalogs are supplied by an
    /// external system that does not enforce this, so ties are broken
    /// deterministically by smallest name and the inconsistency is logged;
    /// it is never treated as an error.
    pub fn default_partition(&self) -> Option<&Partition> {
        let mut defaults = self.partitions.iter().filter(|p| p.is_default);
        let first = defaults.next()?;
        let winner = defaults.fold(first, |best, p| if p.name < best.name { p } else { best });
        if self.partitions.iter().filter(|p| p.is_default).count() > 1 {
            tracing::warn!(
                chosen = %winner.name,
                "partition catalog flags multiple defaults; using smallest name"
            );
        }
        Some(winner)
    }

    /// Iterate over all partitions in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, Partition> {
        self.partitions.iter()
    }

    /// Number of partitions in the catalog.
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }
}

impl<'a> IntoIterator for &'a PartitionCatalog {
    type Item = &'a Partition;
    type IntoIter = std::slice::Iter<'a, Partition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Snapshot of an already-accepted job, handed to the `modify` entry point
/// alongside the requested changes. Read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    /// Scheduler-assigned job identifier.
    pub job_id: u64,
    /// Partition the job was accepted into.
    pub partition: Option<String>,
    /// Accepted job attributes.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}
