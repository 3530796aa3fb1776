//! Timing planner
//!
//! Derives the per-frame execution durations from the sanitized settings.

pub mod planner;

pub use planner::{derive, DerivedTiming, PlanError, FOCUS_DELAY_US};
