//! Bonification Domain Types
//!
//! This crate defines the domain types for the manufacturing bonification
//! engine: the measurements recorded for each job, the policy records that
//! drive performance scoring, the contractual SLA records, and the per-design
//! pools from which incentives are paid.
//!
//! # Key Concepts
//!
//! - **Job**: one manufacturing run, identified by a numeric [`JobId`].
//! - **Category**: the manufacturing type used to look up weights and to
//!   bucket the rolling history of completed jobs.
//! - **Component score**: the normalized score of a single metric dimension.
//! - **Performance score**: the weighted aggregate of the component scores.
//! - **Bonification**: the payout drawn from a design's pool when a job is
//!   compliant and high-performing.
//!
//! # Architecture
//!
//! This is a pure types crate with no runtime dependencies. All types
//! implement `Clone`, `Debug`, `Serialize`, `Deserialize`. IDs use the
//! newtype pattern and implement `Display` and `new()`.

#![deny(unsafe_code)]

mod config;
mod errors;
mod ids;
mod ledger;
mod metrics;
mod sla;

pub use config::*;
pub use errors::*;
pub use ids::*;
pub use ledger::*;
pub use metrics::*;
pub use sla::*;
