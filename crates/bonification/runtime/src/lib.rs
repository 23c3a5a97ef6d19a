//! Bonification Runtime
//!
//! Runtime components of the bonification engine:
//!
//! - [`PerformanceScorer`]: records job measurements, scores them against
//!   per-category targets and adapts those targets from rolling history.
//! - [`SlaEvaluator`]: checks jobs against their contractual SLA and decides
//!   bonification eligibility.
//! - [`BonificationLedger`]: per-design bonification pools, license sales and
//!   payouts.
//!
//! The components talk to each other only through the traits in
//! [`collaborators`], so each can be backed by a remote service or a test
//! double.

#![deny(unsafe_code)]

mod adjustment_engine;
mod bonification_ledger;
pub mod collaborators;
mod history_window;
mod job_locks;
mod metric_store;
mod performance_scorer;
mod policy_table;
pub mod scoring;
mod sla_evaluator;

pub use adjustment_engine::AdjustmentEngine;
pub use bonification_ledger::BonificationLedger;
pub use collaborators::{
    DesignRegistry, FundsTransfer, InMemoryTokenLedger, OperatorDirectory, ScoreProvider,
    ScoreUnavailable, StaticOperatorDirectory,
};
pub use history_window::HistoryWindow;
pub use job_locks::{JobGuard, JobLocks};
pub use metric_store::MetricStore;
pub use performance_scorer::PerformanceScorer;
pub use policy_table::PolicyTable;
pub use sla_evaluator::SlaEvaluator;
