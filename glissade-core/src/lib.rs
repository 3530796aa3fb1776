//! Board-agnostic core logic for the Glissade slider controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Operator settings, range sanitizing, keypad editing
//! - Timing planner (per-frame travel/settle/shutter/pause derivation)
//! - Run sequencer (the frame loop as an interruptible action script)
//! - Run state machine
//! - Actuator and settings-store traits

#![no_std]
#![deny(unsafe_code)]

// Host-side tests (including proptest) link std.
#[cfg(test)]
#[macro_use]
extern crate std;

pub mod config;
pub mod plan;
pub mod sequencer;
pub mod state;
pub mod traits;
