//! Operator-facing configuration
//!
//! The six slider parameters, their range sanitizing, and the keypad
//! value editor.

pub mod editor;
pub mod settings;

pub use editor::{Commit, ValueEditor};
pub use settings::{sanitize, Field, Settings};
