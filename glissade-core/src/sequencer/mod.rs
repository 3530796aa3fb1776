//! Run sequencer
//!
//! Turns one run's derived timings into an ordered stream of actuator
//! actions and interruptible waits, tracking phase and progress as it
//! goes. The firmware interprets the stream; everything observable about
//! the frame loop lives here where it can be tested on the host.

pub mod progress;
pub mod script;

pub use progress::{Phase, RunProgress};
pub use script::{Action, Sequencer};
