//! Auction feasibility engine.
//!
//! A deterministic, multi-layer pipeline over one property snapshot and one
//! candidate bid: valuation resolution, rights and tenancy classification,
//! acquisition cost, profitability, bid policy capping, overheat scoring, and
//! a bounded stochastic simulation of the competing field. Layers are pure
//! functions from immutable input to immutable output; the orchestrator in
//! [`engine`] sequences them and assembles the report.

pub mod competition;
pub mod costs;
pub mod engine;
pub mod policy;
pub mod profit;
pub mod rights;
pub mod valuation;

pub use engine::{run_feasibility, EngineError};
