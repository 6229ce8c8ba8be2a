//! Scenario analysis for auto insurance incident reports.
//!
//! The crate centers on the [`analysis`] pipeline: validated incident text is
//! classified, matched against the policy catalog, risk-scored, explained, and
//! turned into prioritized recommendations. Configuration, telemetry, and the
//! crate-level error type live alongside it so the service binary stays thin.

pub mod analysis;
pub mod config;
pub mod error;
pub mod telemetry;
