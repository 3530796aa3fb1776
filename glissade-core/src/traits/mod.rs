//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod actuator;
pub mod store;

pub use actuator::{Actuator, Direction, Level, Line};
pub use store::{SettingsKey, SettingsStore, StoreError};
