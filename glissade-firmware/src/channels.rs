//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_sync::watch::Watch;

use glissade_core::config::Settings;
use glissade_core::plan::DerivedTiming;
use glissade_core::sequencer::RunProgress;
use glissade_core::state::Event;
use glissade_core::traits::Direction;

use crate::input::PanelEvent;

/// Channel capacity for input events from the panel
const INPUT_CHANNEL_SIZE: usize = 8;

/// Channel capacity for run lifecycle events
const RUN_EVENT_CHANNEL_SIZE: usize = 4;

/// Maximum concurrent watch receivers (UI task only, spare for debug)
const WATCH_CONSUMERS: usize = 2;

/// A run request handed to the sequencer task
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunRequest {
    pub timing: DerivedTiming,
    pub images: u16,
    pub direction: Direction,
}

/// Manual carriage jog commands (serviced only while no run is active)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JogCommand {
    /// Drive the carriage while the button is held
    Drive(Direction),
    /// Button released; both motor lines go low
    Release,
}

/// Input events from the touch panel
pub static INPUT_CHANNEL: Channel<CriticalSectionRawMutex, PanelEvent, INPUT_CHANNEL_SIZE> =
    Channel::new();

/// Run lifecycle events from the sequencer task to the UI state machine
pub static RUN_EVENTS: Channel<CriticalSectionRawMutex, Event, RUN_EVENT_CHANNEL_SIZE> =
    Channel::new();

/// Start request (updated by the UI on an accepted start)
pub static RUN_CMD: Signal<CriticalSectionRawMutex, RunRequest> = Signal::new();

/// Cancellation wake. Signalled to interrupt whatever wait the sequencer
/// is in; ignored when no run is active.
pub static STOP: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Manual jog command (updated by the UI)
pub static JOG_CMD: Signal<CriticalSectionRawMutex, JogCommand> = Signal::new();

/// Run progress, published whole by the sequencer task on every change
pub static PROGRESS: Watch<CriticalSectionRawMutex, RunProgress, WATCH_CONSUMERS> = Watch::new();

/// Settings snapshot to persist (updated by the UI on every commit)
pub static SETTINGS_SAVE: Signal<CriticalSectionRawMutex, Settings> = Signal::new();

/// Signal that a screen update is ready to be sent
pub static SCREEN_UPDATE: Signal<CriticalSectionRawMutex, ()> = Signal::new();
