//! Engine-level test suites.
//!
//! - `helpers.rs`: shared behaviors (recorders, probes) and the wholesale
//!   invariant check used by the other suites.
//! - `integration.rs`: end-to-end tick-contract scenarios.
//! - `determinism.rs`: same seed, same trajectory.

mod helpers;

pub use helpers::*;
