//! Touch panel link
//!
//! The panel is a dumb terminal: it renders text lines, hit-tests its
//! own buttons, and reports each touch as one byte. All UI logic stays
//! on the controller.
//!
//! # Protocol Overview
//!
//! - Panel -> controller: raw one-byte input events (see `input`)
//! - Controller -> panel: framed screen commands at 115200 baud
//!   (clear, one frame per non-empty text row)

pub mod link;
pub mod screen;

pub use screen::Screen;
