//! Pure computation core for the GridPulse energy dashboard.
//!
//! Telemetry synthesis, corpus generation, calendar aggregation, metric
//! forecasting, and summary reduction. Everything in this crate is a
//! deterministic function of its inputs; randomness enters only through
//! explicitly passed RNGs, so the whole pipeline is reproducible from a
//! seed and safe to parallelize.

pub mod aggregation;
pub mod catalog;
pub mod charts;
pub mod corpus;
pub mod error;
pub mod forecast;
pub mod sampling;
pub mod summary;
pub mod synthesis;
pub mod types;
pub mod workload;
