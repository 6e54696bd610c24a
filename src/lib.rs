//! # Jobgate
//!
//! A pluggable admission-control and job-routing engine for batch schedulers.
//!
//! This library provides the decision layer a scheduler daemon invokes when a
//! job submission arrives: an ordered chain of policy rules that inspect and
//! mutate the request (selecting a default partition, rewriting limits,
//! rejecting disallowed combinations) before the scheduler accepts the job.
//!
//! ## Core Problem Solved
//!
//! Batch schedulers need site-specific admission policy without baking it into
//! the scheduler itself:
//!
//! - **Routing**: Jobs submitted without a partition must land somewhere sane
//! - **Policy**: Sites reject or rewrite submissions per local rules
//! - **Ordering**: Later rules depend on mutations made by earlier rules
//! - **Auditability**: Every decision must leave a structured trace
//!
//! ## Key Features
//!
//! - **Prioritized Rule Chain**: Rules run in a deterministic (priority, name)
//!   order, short-circuiting on the first rejection
//! - **Typed Handler Binding**: Handlers bind at registration time; no runtime
//!   name lookup can fail mid-request
//! - **Soft-Failing Identity Lookup**: Username resolution is bounded by a
//!   timeout and degrades to a placeholder, never blocking a submission
//! - **Structured Audit Stream**: One `tracing` line per rule action, carrying
//!   rule priority, name, and description, optionally mirrored into a sink
//! - **Lock-Free Request Path**: The registry is built once at startup and
//!   shared read-only across concurrent submissions
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use jobgate::builders::{build_engine, builtin_handler};
//! use jobgate::config::EngineConfig;
//! use jobgate::core::{JobDescriptor, PartitionCatalog};
//! use jobgate::infra::identity::PasswdResolver;
//!
//! let cfg = EngineConfig::from_json_str(r#"{
//!     "cluster_name": "tundra",
//!     "debug": false,
//!     "rules": [
//!         {"name": "part", "priority": 0, "description": "default partition"}
//!     ]
//! }"#)?;
//!
//! let engine = build_engine(&cfg, Arc::new(PasswdResolver::new()), builtin_handler)?;
//!
//! let mut job = JobDescriptor::new(1001);
//! let verdict = engine.submit(&mut job, &catalog, 1001).await;
//! ```
//!
//! For complete examples, see `tests/submit_flow_test.rs`.

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core admission abstractions: descriptor model, rules, registry, executor.
pub mod core;
/// Configuration models for the engine and its rule catalog.
pub mod config;
/// Builders to construct a ready engine from configuration.
pub mod builders;
/// Infrastructure adapters for identity-lookup backends.
pub mod infra;
/// Shipped rule catalog.
pub mod rules;
/// Shared utilities.
pub mod util;
