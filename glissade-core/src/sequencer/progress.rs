//! Shared run progress
//!
//! Single writer (the sequencer task), many readers (the UI). Always
//! published as a whole value so a reader never sees the phase from one
//! frame paired with the counters of another.

/// The sequencer's current sub-activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// No run armed
    #[default]
    Idle,
    /// Motor pulsed, carriage advancing
    Traveling,
    /// Dwelling for vibration decay
    Settling,
    /// Focus/shutter pulse train in progress
    Firing,
    /// Idle wait stretching the run to the timespan budget
    Pausing,
    /// Run finished or cancelled; decays back to Idle
    Done,
}

impl Phase {
    /// Whether a run is actively executing.
    pub fn is_running(self) -> bool {
        matches!(
            self,
            Phase::Traveling | Phase::Settling | Phase::Firing | Phase::Pausing
        )
    }
}

/// Snapshot of a run's progress for the status screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunProgress {
    /// True from the first action until teardown completes
    pub running: bool,
    /// 1-based index of the frame last fired (0 before the first)
    pub frame: u16,
    /// Wall-clock seconds consumed by completed waits
    pub consumed_s: u32,
    /// Current phase
    pub phase: Phase,
}

impl RunProgress {
    /// The quiescent snapshot.
    pub const fn idle() -> Self {
        Self {
            running: false,
            frame: 0,
            consumed_s: 0,
            phase: Phase::Idle,
        }
    }
}

impl Default for RunProgress {
    fn default() -> Self {
        Self::idle()
    }
}
