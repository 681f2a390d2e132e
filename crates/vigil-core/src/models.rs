//! Domain models for Vigil.
//!
//! Records are created by the monitor and never mutated afterwards.

pub mod anomaly;
pub mod audit;
pub mod compliance;
pub mod event;
pub mod summary;
