//! Events that trigger state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Settings were committed; carries whether a plan could be derived
    SettingsCommitted { feasible: bool },

    // Execution control events
    /// User requested a run start
    Start,
    /// User requested a run stop
    Stop,

    // Sequencer events
    /// The run's action stream (including teardown) completed
    RunFinished,
    /// The post-run hold period elapsed
    DoneTimeout,
}

impl Event {
    /// Check if this event is user-initiated
    pub fn is_user_event(&self) -> bool {
        matches!(
            self,
            Event::Start | Event::Stop | Event::SettingsCommitted { .. }
        )
    }

    /// Check if this event comes from the sequencer side
    pub fn is_sequencer_event(&self) -> bool {
        matches!(self, Event::RunFinished | Event::DoneTimeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_events() {
        assert!(Event::Start.is_user_event());
        assert!(Event::Stop.is_user_event());
        assert!(Event::SettingsCommitted { feasible: true }.is_user_event());
        assert!(!Event::RunFinished.is_user_event());
    }

    #[test]
    fn test_sequencer_events() {
        assert!(Event::RunFinished.is_sequencer_event());
        assert!(Event::DoneTimeout.is_sequencer_event());
        assert!(!Event::Start.is_sequencer_event());
    }
}
