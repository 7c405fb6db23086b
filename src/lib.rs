//! # referral-breakdown
//!
//! Credits closed deals to the initial referrer of their referral chain,
//! broken down by closing month.
//!
//! A referral chain may be arbitrarily long (A referred B, B referred C, ...).
//! Every deal in the chain is credited to its root, found through a
//! path-compressing resolver over the `name -> referred_by` map.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: names, months, deals, deal sets
//! - **graph** — Referral map with root resolution, cycle detection
//! - **aggregation** — Month x initial-referrer breakdown
//! - **format** — JSON record decoder and report emitter
//! - **simulation** — Random acyclic deal networks for testing
//! - **pipeline** — Decode, aggregate and emit in one call

pub mod aggregation;
pub mod core;
pub mod format;
pub mod graph;
pub mod pipeline;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::aggregation::breakdown::Breakdown;
    pub use crate::aggregation::engine::AttributionEngine;
    pub use crate::core::deal::{Deal, DealSet};
    pub use crate::core::month::Month;
    pub use crate::core::name::Name;
    pub use crate::format::emitter::OutputFormat;
    pub use crate::graph::referral_map::{ReferralMap, ResolveError};
    pub use crate::pipeline::{run, RunError};
}
