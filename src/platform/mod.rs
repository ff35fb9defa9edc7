//! Platform abstraction layer
//!
//! Device sampling happens outside the simulation. This module only holds the
//! handoff: the latest sampled value, read by the tick without waiting.

pub mod input;

pub use input::{PointerTracker, SharedTilt};
