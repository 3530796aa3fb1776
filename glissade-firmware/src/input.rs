//! Input events from the touch panel
//!
//! The panel does its own hit testing and sends one byte per touch. The
//! byte values are the wire protocol; anything unrecognized is dropped
//! by the receive task.

use glissade_core::config::Field;

/// Input event values sent from the touch panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelEvent {
    /// Keypad digit 0-9
    Digit(u8),
    /// Keypad backspace
    Delete,
    /// Keypad cancel, discards the pending entry
    Cancel,
    /// Commit the pending entry as a plain count
    DoneCount,
    /// Commit the pending entry as whole seconds
    DoneSeconds,
    /// Commit the pending entry as a 1/n second fraction
    DoneFraction,
    /// Open the keypad for a parameter
    SelectField(Field),
    /// Open/close the parameter list
    Gear,
    /// Toggle the run travel direction
    Direction,
    /// Start a run
    Start,
    /// Stop the run in progress
    Stop,
    /// Jog button pressed (hold to run the carriage)
    JogLeftPress,
    JogLeftRelease,
    JogRightPress,
    JogRightRelease,
}

// Wire format values
const EVENT_DIGIT_BASE: u8 = 0x00; // 0x00-0x09
const EVENT_DELETE: u8 = 0x10;
const EVENT_CANCEL: u8 = 0x11;
const EVENT_DONE_COUNT: u8 = 0x12;
const EVENT_DONE_SECONDS: u8 = 0x13;
const EVENT_DONE_FRACTION: u8 = 0x14;
const EVENT_FIELD_BASE: u8 = 0x20; // 0x20-0x25, panel order
const EVENT_GEAR: u8 = 0x30;
const EVENT_DIRECTION: u8 = 0x31;
const EVENT_START: u8 = 0x32;
const EVENT_STOP: u8 = 0x33;
const EVENT_JOG_LEFT_PRESS: u8 = 0x34;
const EVENT_JOG_LEFT_RELEASE: u8 = 0x35;
const EVENT_JOG_RIGHT_PRESS: u8 = 0x36;
const EVENT_JOG_RIGHT_RELEASE: u8 = 0x37;

impl PanelEvent {
    /// Parse an event from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            EVENT_DIGIT_BASE..=0x09 => Some(PanelEvent::Digit(byte)),
            EVENT_DELETE => Some(PanelEvent::Delete),
            EVENT_CANCEL => Some(PanelEvent::Cancel),
            EVENT_DONE_COUNT => Some(PanelEvent::DoneCount),
            EVENT_DONE_SECONDS => Some(PanelEvent::DoneSeconds),
            EVENT_DONE_FRACTION => Some(PanelEvent::DoneFraction),
            EVENT_FIELD_BASE..=0x25 => {
                let idx = (byte - EVENT_FIELD_BASE) as usize;
                Field::ALL.get(idx).copied().map(PanelEvent::SelectField)
            }
            EVENT_GEAR => Some(PanelEvent::Gear),
            EVENT_DIRECTION => Some(PanelEvent::Direction),
            EVENT_START => Some(PanelEvent::Start),
            EVENT_STOP => Some(PanelEvent::Stop),
            EVENT_JOG_LEFT_PRESS => Some(PanelEvent::JogLeftPress),
            EVENT_JOG_LEFT_RELEASE => Some(PanelEvent::JogLeftRelease),
            EVENT_JOG_RIGHT_PRESS => Some(PanelEvent::JogRightPress),
            EVENT_JOG_RIGHT_RELEASE => Some(PanelEvent::JogRightRelease),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            PanelEvent::Digit(d) => EVENT_DIGIT_BASE + d.min(9),
            PanelEvent::Delete => EVENT_DELETE,
            PanelEvent::Cancel => EVENT_CANCEL,
            PanelEvent::DoneCount => EVENT_DONE_COUNT,
            PanelEvent::DoneSeconds => EVENT_DONE_SECONDS,
            PanelEvent::DoneFraction => EVENT_DONE_FRACTION,
            PanelEvent::SelectField(field) => {
                let idx = Field::ALL.iter().position(|f| *f == field).unwrap_or(0);
                EVENT_FIELD_BASE + idx as u8
            }
            PanelEvent::Gear => EVENT_GEAR,
            PanelEvent::Direction => EVENT_DIRECTION,
            PanelEvent::Start => EVENT_START,
            PanelEvent::Stop => EVENT_STOP,
            PanelEvent::JogLeftPress => EVENT_JOG_LEFT_PRESS,
            PanelEvent::JogLeftRelease => EVENT_JOG_LEFT_RELEASE,
            PanelEvent::JogRightPress => EVENT_JOG_RIGHT_PRESS,
            PanelEvent::JogRightRelease => EVENT_JOG_RIGHT_RELEASE,
        }
    }

    /// Returns true if this event belongs to the keypad
    pub fn is_keypad(&self) -> bool {
        matches!(
            self,
            PanelEvent::Digit(_)
                | PanelEvent::Delete
                | PanelEvent::Cancel
                | PanelEvent::DoneCount
                | PanelEvent::DoneSeconds
                | PanelEvent::DoneFraction
        )
    }
}
