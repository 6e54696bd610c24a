//! Integration tests for the submit/modify admission flow.
//!
//! These validate:
//! 1. Default-partition routing assigns the catalog default and audits it
//! 2. A user-specified partition is never touched and emits no audit line
//! 3. A catalog without a default leaves the partition unset, still accepted
//! 4. Rule execution order is deterministic and reproducible
//! 5. Identity-lookup failures never change the admission outcome
//! 6. A rejecting rule short-circuits the chain; earlier mutations persist
//! 7. The modify hook accepts while no modify rules are installed

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use jobgate::builders::{build_engine, builtin_handler};
use jobgate::config::{EngineConfig, RuleConfig};
use jobgate::core::{
    AuditRecord, AuditSink, IdentityError, IdentityResolver, JobDescriptor, JobRecord, Partition,
    PartitionCatalog, Rule, RuleContext, RuleEngine, RuleHandler, RuleRegistry, RuleViolation,
    Uid, Verdict, ViolationCode,
};
use jobgate::infra::identity::StaticIdentityResolver;

// Audit sink that shares its records with the test body.
struct CaptureSink(Arc<Mutex<Vec<AuditRecord>>>);

impl AuditSink for CaptureSink {
    fn record(&mut self, record: AuditRecord) {
        self.0.lock().push(record);
    }
}

// Handler that appends its rule name to a shared trace, optionally tagging
// the descriptor, so tests can observe execution order and mutations.
struct TraceRule {
    name: &'static str,
    trace: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl RuleHandler for TraceRule {
    async fn on_submit(
        &self,
        job: &mut JobDescriptor,
        _partitions: &PartitionCatalog,
        _ctx: &RuleContext<'_>,
    ) -> Result<(), RuleViolation> {
        self.trace.lock().push(self.name.to_string());
        job.set_attribute(format!("seen_{}", self.name), "yes");
        Ok(())
    }
}

// Handler that always refuses the job.
struct RejectRule;

#[async_trait]
impl RuleHandler for RejectRule {
    async fn on_submit(
        &self,
        _job: &mut JobDescriptor,
        _partitions: &PartitionCatalog,
        _ctx: &RuleContext<'_>,
    ) -> Result<(), RuleViolation> {
        Err(RuleViolation::new(
            ViolationCode::AccessDenied,
            "submissions from this account are disabled",
        ))
    }
}

struct FailingResolver;

#[async_trait]
impl IdentityResolver for FailingResolver {
    async fn resolve_username(&self, uid: Uid) -> Result<String, IdentityError> {
        Err(IdentityError::NotFound(uid))
    }
}

struct HangingResolver;

#[async_trait]
impl IdentityResolver for HangingResolver {
    async fn resolve_username(&self, _uid: Uid) -> Result<String, IdentityError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok("never".into())
    }
}

fn two_partition_catalog() -> PartitionCatalog {
    PartitionCatalog::new(vec![
        Partition::new("batch", true),
        Partition::new("gpu", false),
    ])
}

fn part_config() -> EngineConfig {
    EngineConfig {
        cluster_name: "tundra".into(),
        debug: false,
        lookup_timeout_ms: 200,
        rules: vec![RuleConfig {
            name: "part".into(),
            priority: 0,
            description: "default partition".into(),
        }],
    }
}

fn part_engine(identity: Arc<dyn IdentityResolver>) -> (RuleEngine, Arc<Mutex<Vec<AuditRecord>>>) {
    let records = Arc::new(Mutex::new(Vec::new()));
    let engine = build_engine(&part_config(), identity, builtin_handler)
        .unwrap()
        .with_audit_sink(Box::new(CaptureSink(Arc::clone(&records))));
    (engine, records)
}

#[tokio::test]
async fn test_default_partition_assigned_and_audited() {
    let identity = Arc::new(StaticIdentityResolver::new().with_user(1001, "alice"));
    let (engine, records) = part_engine(identity);

    let mut job = JobDescriptor::new(1001);
    let verdict = engine.submit(&mut job, &two_partition_catalog(), 1001).await;

    assert_eq!(verdict, Verdict::Accepted);
    assert_eq!(job.partition.as_deref(), Some("batch"));

    let records = records.lock();
    assert_eq!(records.len(), 1);
    let line = &records[0];
    assert_eq!(line.priority, 0);
    assert_eq!(line.rule, "part");
    assert_eq!(line.description, "default partition");
    assert!(line.message.contains("alice"));
    assert!(line.message.contains("batch"));
    assert!(line.message.contains("tundra"));
}

#[tokio::test]
async fn test_preset_partition_is_noop_without_audit() {
    let identity = Arc::new(StaticIdentityResolver::new().with_user(1001, "alice"));
    let (engine, records) = part_engine(identity);

    let mut job = JobDescriptor::new(1001);
    job.set_partition("gpu");
    let verdict = engine.submit(&mut job, &two_partition_catalog(), 1001).await;

    assert_eq!(verdict, Verdict::Accepted);
    assert_eq!(job.partition.as_deref(), Some("gpu"));
    assert!(records.lock().is_empty());
}

#[tokio::test]
async fn test_no_default_partition_leaves_unset_and_accepts() {
    let identity = Arc::new(StaticIdentityResolver::new().with_user(1001, "alice"));
    let (engine, records) = part_engine(identity);

    let catalog = PartitionCatalog::new(vec![
        Partition::new("batch", false),
        Partition::new("gpu", false),
    ]);
    let mut job = JobDescriptor::new(1001);
    let verdict = engine.submit(&mut job, &catalog, 1001).await;

    assert_eq!(verdict, Verdict::Accepted);
    assert!(job.partition.is_none());
    assert!(records.lock().is_empty());
}

#[tokio::test]
async fn test_lookup_failure_never_changes_outcome() {
    // Same submission three times: working, failing, and hanging resolver.
    // The verdict and descriptor state must match in all three runs.
    let mut outcomes = Vec::new();
    let resolvers: Vec<Arc<dyn IdentityResolver>> = vec![
        Arc::new(StaticIdentityResolver::new().with_user(1001, "alice")),
        Arc::new(FailingResolver),
        Arc::new(HangingResolver),
    ];
    for identity in resolvers {
        let (engine, records) = part_engine(identity);
        let mut job = JobDescriptor::new(1001);
        let verdict = engine.submit(&mut job, &two_partition_catalog(), 1001).await;
        let audited = records.lock().len();
        outcomes.push((verdict, job.partition, audited));
    }

    for (verdict, partition, audited) in &outcomes {
        assert_eq!(*verdict, Verdict::Accepted);
        assert_eq!(partition.as_deref(), Some("batch"));
        assert_eq!(*audited, 1);
    }
    // Only the audit content differs: the failed lookups fall back to an
    // empty username placeholder.
}

#[tokio::test]
async fn test_execution_order_deterministic() {
    let trace = Arc::new(Mutex::new(Vec::new()));
    let mut registry = RuleRegistry::new();
    for (name, priority) in [("limits", 10u32), ("part", 0), ("account", 10), ("qos", 5)] {
        registry
            .register(Rule::new(
                name,
                priority,
                format!("{name} rule"),
                Arc::new(TraceRule {
                    name,
                    trace: Arc::clone(&trace),
                }),
            ))
            .unwrap();
    }
    let engine = RuleEngine::new(
        registry,
        Arc::new(StaticIdentityResolver::new()),
        "tundra",
        false,
        Duration::from_millis(200),
    );

    let catalog = two_partition_catalog();
    for _ in 0..2 {
        let mut job = JobDescriptor::new(1001);
        assert_eq!(engine.submit(&mut job, &catalog, 1001).await, Verdict::Accepted);
    }

    let trace = trace.lock();
    assert_eq!(
        *trace,
        ["part", "qos", "account", "limits", "part", "qos", "account", "limits"]
    );
}

#[tokio::test]
async fn test_rejection_short_circuits_and_keeps_mutations() {
    let trace = Arc::new(Mutex::new(Vec::new()));
    let mut registry = RuleRegistry::new();
    registry
        .register(Rule::new(
            "tag",
            0,
            "tags the descriptor",
            Arc::new(TraceRule {
                name: "tag",
                trace: Arc::clone(&trace),
            }),
        ))
        .unwrap();
    registry
        .register(Rule::new("deny", 1, "refuses everything", Arc::new(RejectRule)))
        .unwrap();
    registry
        .register(Rule::new(
            "late",
            2,
            "must never run",
            Arc::new(TraceRule {
                name: "late",
                trace: Arc::clone(&trace),
            }),
        ))
        .unwrap();

    let engine = RuleEngine::new(
        registry,
        Arc::new(StaticIdentityResolver::new()),
        "tundra",
        false,
        Duration::from_millis(200),
    );

    let mut job = JobDescriptor::new(1001);
    let verdict = engine.submit(&mut job, &two_partition_catalog(), 1001).await;

    match verdict {
        Verdict::Rejected { rule, code, message } => {
            assert_eq!(rule, "deny");
            assert_eq!(code, ViolationCode::AccessDenied);
            assert!(message.contains("disabled"));
        }
        Verdict::Accepted => panic!("expected rejection"),
    }
    // The rule after the rejection never ran.
    assert_eq!(*trace.lock(), ["tag"]);
    // The mutation made before the rejection stays applied; callers must not
    // assume atomicity across the chain.
    assert_eq!(job.attributes.get("seen_tag").map(String::as_str), Some("yes"));
}

#[tokio::test]
async fn test_modify_accepts_with_current_catalog() {
    let identity = Arc::new(StaticIdentityResolver::new().with_user(1001, "alice"));
    let (engine, records) = part_engine(identity);

    let existing = JobRecord {
        job_id: 7,
        partition: Some("batch".into()),
        attributes: Default::default(),
    };
    let mut change = JobDescriptor::new(1001);
    change.set_attribute("timelimit", "02:00:00");

    let verdict = engine
        .modify(&mut change, &existing, &two_partition_catalog(), 1001)
        .await;

    assert_eq!(verdict, Verdict::Accepted);
    assert!(records.lock().is_empty());
}

#[tokio::test]
async fn test_duplicate_rule_in_config_is_fatal() {
    let mut cfg = part_config();
    cfg.rules.push(RuleConfig {
        name: "part".into(),
        priority: 4,
        description: "second copy".into(),
    });
    let result = build_engine(
        &cfg,
        Arc::new(StaticIdentityResolver::new()) as Arc<dyn IdentityResolver>,
        builtin_handler,
    );
    assert!(result.is_err());
}
