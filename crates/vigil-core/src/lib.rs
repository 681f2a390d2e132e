//! Vigil Core — domain models, error taxonomy and the sink seams shared
//! by every Vigil crate.
//!
//! The engine itself lives in `vigil-monitor`; this crate only carries
//! the types that cross crate boundaries.

pub mod error;
pub mod models;
pub mod sink;

pub use error::{VigilError, VigilResult};
