//! State machine definition
//!
//! What the appliance does next is a function of the current state and
//! an event. Runs are single-flight: a Start while Running is ignored,
//! so there is never more than one sequencer active.

use super::events::Event;

/// Machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Ready; settings editable, run startable
    #[default]
    Idle,
    /// Settings cannot fit the timespan; run start refused
    Infeasible,
    /// Sequencer executing a run
    Running,
    /// Run finished or cancelled; decays back to Idle after a hold
    Done,
}

impl State {
    /// Check if a run start is accepted in this state
    pub fn start_allowed(&self) -> bool {
        matches!(self, State::Idle | State::Done)
    }

    /// Check if a run is in progress
    pub fn is_running(&self) -> bool {
        matches!(self, State::Running)
    }

    /// Check if manual jogging is permitted (no run active)
    pub fn jog_allowed(&self) -> bool {
        !self.is_running()
    }

    /// Process an event and return the next state
    ///
    /// This is the core state transition logic.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            // A run in progress is never disturbed by settings commits;
            // the new plan takes effect at the next start.
            (Running, SettingsCommitted { .. }) => Running,
            (_, SettingsCommitted { feasible: false }) => Infeasible,
            (_, SettingsCommitted { feasible: true }) => Idle,

            // Start transitions
            (Idle, Start) | (Done, Start) => Running,
            (Running, Start) => Running,
            (Infeasible, Start) => Infeasible,

            // Run end transitions
            (Running, Stop) => Done,
            (Running, RunFinished) => Done,

            // Done decays back to Idle
            (Done, DoneTimeout) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_from_idle() {
        let state = State::Idle;
        let next = state.transition(Event::Start);
        assert_eq!(next, State::Running);
    }

    #[test]
    fn test_start_is_single_flight() {
        let state = State::Running;
        let next = state.transition(Event::Start);
        assert_eq!(next, State::Running);
    }

    #[test]
    fn test_start_refused_when_infeasible() {
        let state = State::Infeasible;
        let next = state.transition(Event::Start);
        assert_eq!(next, State::Infeasible);
    }

    #[test]
    fn test_run_lifecycle() {
        let running = State::Idle.transition(Event::Start);
        assert_eq!(running, State::Running);

        let done = running.transition(Event::RunFinished);
        assert_eq!(done, State::Done);

        let idle = done.transition(Event::DoneTimeout);
        assert_eq!(idle, State::Idle);
    }

    #[test]
    fn test_stop_ends_run() {
        let done = State::Running.transition(Event::Stop);
        assert_eq!(done, State::Done);
    }

    #[test]
    fn test_restart_from_done() {
        // A new run can start during the done hold.
        let next = State::Done.transition(Event::Start);
        assert_eq!(next, State::Running);
    }

    #[test]
    fn test_infeasible_commit_blocks() {
        for state in [State::Idle, State::Done, State::Infeasible] {
            let next = state.transition(Event::SettingsCommitted { feasible: false });
            assert_eq!(next, State::Infeasible);
        }
    }

    #[test]
    fn test_feasible_commit_clears_block() {
        let next = State::Infeasible.transition(Event::SettingsCommitted { feasible: true });
        assert_eq!(next, State::Idle);
    }

    #[test]
    fn test_commit_never_disturbs_run() {
        for feasible in [true, false] {
            let next = State::Running.transition(Event::SettingsCommitted { feasible });
            assert_eq!(next, State::Running);
        }
    }

    #[test]
    fn test_jog_allowed() {
        assert!(State::Idle.jog_allowed());
        assert!(State::Done.jog_allowed());
        assert!(State::Infeasible.jog_allowed());
        assert!(!State::Running.jog_allowed());
    }
}
