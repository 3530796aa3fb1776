//! The frame-loop action script
//!
//! One frame is: travel pulse (skipped on the first frame), settle dwell,
//! then the firing train - backlight off, focus up, focus delay, shutter
//! up, exposure, shutter down, focus down, backlight on - and the pause
//! that stretches the run to its timespan. The sequencer emits this as a
//! stream of [`Action`]s; every `Wait` is a suspension point the
//! interpreter makes interruptible, and cancellation is re-checked before
//! every emission, so stop latency is bounded by the wait in flight and
//! never by a whole frame.

use crate::plan::{DerivedTiming, FOCUS_DELAY_US};
use crate::traits::{Direction, Level, Line};

use super::progress::{Phase, RunProgress};

/// One atomic unit of run execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Drive an output line
    Set(Line, Level),
    /// Sleep (interruptibly) for the given microseconds
    Wait(u64),
}

/// Position within the frame script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    FrameStart,
    TravelWait,
    TravelStop,
    SettleWait,
    LightOff,
    FocusUp,
    FocusWait,
    ShutterUp,
    ShutterWait,
    ShutterDown,
    FocusDown,
    LightOn,
    PauseWait,
    NextFrame,
    Teardown(u8),
    Finished,
}

/// Teardown drops whatever the script may have left asserted. Safe to run
/// from any cursor position; redundant writes are harmless.
const TEARDOWN_LEN: u8 = 4;

/// Cancellable action-script cursor for one run.
#[derive(Debug, Clone)]
pub struct Sequencer {
    timing: DerivedTiming,
    images: u16,
    /// Motor line selected by the run direction
    motor: Line,
    cursor: Cursor,
    /// Frame currently being executed, 1-based
    frame: u16,
    /// Frame last fired, for progress reporting
    fired: u16,
    consumed_us: u64,
    cancelled: bool,
    phase: Phase,
}

impl Sequencer {
    /// Arm a new run. The first action is emitted by the first
    /// [`advance`](Self::advance) call.
    pub fn new(timing: DerivedTiming, images: u16, direction: Direction) -> Self {
        Self {
            timing,
            images: images.max(1),
            motor: direction.line(),
            cursor: Cursor::FrameStart,
            frame: 1,
            fired: 0,
            consumed_us: 0,
            cancelled: false,
            phase: Phase::Idle,
        }
    }

    /// Request cooperative cancellation. The next `advance` call jumps
    /// straight to teardown no matter where in the frame the script is.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Progress snapshot for publication to the UI.
    pub fn progress(&self) -> RunProgress {
        RunProgress {
            running: self.phase.is_running(),
            frame: self.fired,
            consumed_s: (self.consumed_us / 1_000_000) as u32,
            phase: self.phase,
        }
    }

    /// Emit the next action, or `None` once the run (and its teardown)
    /// has completed. Cursor positions that only do bookkeeping are
    /// stepped through without emitting.
    pub fn advance(&mut self) -> Option<Action> {
        loop {
            if self.cancelled && !matches!(self.cursor, Cursor::Teardown(_) | Cursor::Finished) {
                self.cursor = Cursor::Teardown(0);
            }

            match self.cursor {
                Cursor::FrameStart => {
                    // No travel before the first frame, or ever with a
                    // single-frame run.
                    if self.frame == 1 || self.timing.travel_pulse_us == 0 {
                        self.cursor = Cursor::SettleWait;
                    } else {
                        self.phase = Phase::Traveling;
                        self.cursor = Cursor::TravelWait;
                        return Some(Action::Set(self.motor, Level::High));
                    }
                }
                Cursor::TravelWait => {
                    self.cursor = Cursor::TravelStop;
                    return Some(self.wait(self.timing.travel_pulse_us));
                }
                Cursor::TravelStop => {
                    self.cursor = Cursor::SettleWait;
                    return Some(Action::Set(self.motor, Level::Low));
                }
                Cursor::SettleWait => {
                    self.phase = Phase::Settling;
                    self.cursor = Cursor::LightOff;
                    if self.timing.settle_us > 0 {
                        return Some(self.wait(self.timing.settle_us));
                    }
                }
                Cursor::LightOff => {
                    self.phase = Phase::Firing;
                    self.fired = self.frame;
                    self.cursor = Cursor::FocusUp;
                    return Some(Action::Set(Line::Backlight, Level::Low));
                }
                Cursor::FocusUp => {
                    self.cursor = Cursor::FocusWait;
                    return Some(Action::Set(Line::Focus, Level::High));
                }
                Cursor::FocusWait => {
                    self.cursor = Cursor::ShutterUp;
                    return Some(self.wait(FOCUS_DELAY_US));
                }
                Cursor::ShutterUp => {
                    self.cursor = Cursor::ShutterWait;
                    return Some(Action::Set(Line::Shutter, Level::High));
                }
                Cursor::ShutterWait => {
                    self.cursor = Cursor::ShutterDown;
                    return Some(self.wait(self.timing.shutter_us));
                }
                Cursor::ShutterDown => {
                    self.cursor = Cursor::FocusDown;
                    return Some(Action::Set(Line::Shutter, Level::Low));
                }
                Cursor::FocusDown => {
                    self.cursor = Cursor::LightOn;
                    return Some(Action::Set(Line::Focus, Level::Low));
                }
                Cursor::LightOn => {
                    self.cursor = Cursor::PauseWait;
                    return Some(Action::Set(Line::Backlight, Level::High));
                }
                Cursor::PauseWait => {
                    self.phase = Phase::Pausing;
                    self.cursor = Cursor::NextFrame;
                    if self.timing.pause_us > 0 {
                        return Some(self.wait(self.timing.pause_us));
                    }
                }
                Cursor::NextFrame => {
                    if self.frame >= self.images {
                        self.cursor = Cursor::Teardown(0);
                    } else {
                        self.frame += 1;
                        self.cursor = Cursor::FrameStart;
                    }
                }
                Cursor::Teardown(step) => {
                    let action = match step {
                        0 => Action::Set(Line::Shutter, Level::Low),
                        1 => Action::Set(Line::Focus, Level::Low),
                        2 => Action::Set(self.motor, Level::Low),
                        _ => Action::Set(Line::Backlight, Level::High),
                    };
                    self.cursor = if step + 1 >= TEARDOWN_LEN {
                        Cursor::Finished
                    } else {
                        Cursor::Teardown(step + 1)
                    };
                    return Some(action);
                }
                Cursor::Finished => {
                    // Counters reset so the status screen reverts cleanly.
                    self.phase = Phase::Done;
                    self.fired = 0;
                    self.consumed_us = 0;
                    return None;
                }
            }
        }
    }

    fn wait(&mut self, us: u64) -> Action {
        self.consumed_us += us;
        Action::Wait(us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::plan::derive;

    fn timing() -> DerivedTiming {
        derive(&Settings::default()).unwrap()
    }

    /// Drain the full action stream.
    fn run_all(seq: &mut Sequencer) -> std::vec::Vec<Action> {
        let mut actions = std::vec::Vec::new();
        while let Some(a) = seq.advance() {
            actions.push(a);
        }
        actions
    }

    #[test]
    fn test_first_frame_skips_travel() {
        let mut seq = Sequencer::new(timing(), 2, Direction::Left);

        // First emission is the settle wait, not a motor pulse.
        let first = seq.advance().unwrap();
        assert_eq!(first, Action::Wait(timing().settle_us));
        assert_eq!(seq.phase(), Phase::Settling);
    }

    #[test]
    fn test_firing_train_order() {
        let t = timing();
        let mut seq = Sequencer::new(t, 1, Direction::Left);
        seq.advance(); // settle

        let expected = [
            Action::Set(Line::Backlight, Level::Low),
            Action::Set(Line::Focus, Level::High),
            Action::Wait(FOCUS_DELAY_US),
            Action::Set(Line::Shutter, Level::High),
            Action::Wait(t.shutter_us),
            Action::Set(Line::Shutter, Level::Low),
            Action::Set(Line::Focus, Level::Low),
            Action::Set(Line::Backlight, Level::High),
        ];
        for want in expected {
            assert_eq!(seq.advance(), Some(want));
        }
        assert_eq!(seq.progress().frame, 1);
    }

    #[test]
    fn test_second_frame_travels() {
        let t = timing();
        let mut seq = Sequencer::new(t, 2, Direction::Right);

        // Drain frame 1 up to and including its pause.
        let mut saw_pause = false;
        while !saw_pause {
            let a = seq.advance().unwrap();
            saw_pause = seq.phase() == Phase::Pausing && matches!(a, Action::Wait(_));
        }

        // Frame 2 opens with the motor pulse on the direction line.
        assert_eq!(seq.advance(), Some(Action::Set(Line::MotorB, Level::High)));
        assert_eq!(seq.phase(), Phase::Traveling);
        assert_eq!(seq.advance(), Some(Action::Wait(t.travel_pulse_us)));
        assert_eq!(seq.advance(), Some(Action::Set(Line::MotorB, Level::Low)));
    }

    #[test]
    fn test_single_frame_run_never_travels() {
        let s = Settings {
            images: 1,
            ..Settings::default()
        };
        let t = derive(&s).unwrap();
        let mut seq = Sequencer::new(t, 1, Direction::Left);

        let actions = run_all(&mut seq);
        // Teardown's defensive motor-low is the only motor touch.
        let motor_highs = actions
            .iter()
            .filter(|a| matches!(a, Action::Set(Line::MotorA | Line::MotorB, Level::High)))
            .count();
        assert_eq!(motor_highs, 0);
        assert_eq!(seq.phase(), Phase::Done);
    }

    #[test]
    fn test_cancel_during_pause_is_immediate() {
        let t = timing();
        let mut seq = Sequencer::new(t, 100, Direction::Left);

        // Advance into the first pause wait.
        loop {
            let a = seq.advance().unwrap();
            if seq.phase() == Phase::Pausing && matches!(a, Action::Wait(_)) {
                break;
            }
        }
        seq.cancel();

        // The very next emissions are teardown sets - no further waits,
        // no second frame.
        let rest = run_all(&mut seq);
        assert_eq!(rest.len(), TEARDOWN_LEN as usize);
        assert!(rest.iter().all(|a| matches!(a, Action::Set(_, _))));
        assert_eq!(rest[0], Action::Set(Line::Shutter, Level::Low));
        assert_eq!(seq.phase(), Phase::Done);
    }

    #[test]
    fn test_cancel_mid_travel_drops_motor() {
        let t = timing();
        let mut seq = Sequencer::new(t, 3, Direction::Left);

        // Reach frame 2's travel wait (motor currently high).
        loop {
            let a = seq.advance().unwrap();
            if seq.phase() == Phase::Traveling && matches!(a, Action::Wait(_)) {
                break;
            }
        }
        seq.cancel();

        let rest = run_all(&mut seq);
        assert!(rest.contains(&Action::Set(Line::MotorA, Level::Low)));
        assert!(!rest.iter().any(|a| matches!(a, Action::Wait(_))));
    }

    #[test]
    fn test_completion_resets_counters() {
        let s = Settings {
            images: 2,
            ..Settings::default()
        };
        let t = derive(&s).unwrap();
        let mut seq = Sequencer::new(t, 2, Direction::Left);
        run_all(&mut seq);

        let p = seq.progress();
        assert!(!p.running);
        assert_eq!(p.frame, 0);
        assert_eq!(p.consumed_s, 0);
        assert_eq!(p.phase, Phase::Done);
    }

    #[test]
    fn test_consumed_time_accumulates() {
        let t = timing();
        let mut seq = Sequencer::new(t, 2, Direction::Left);

        // Run frame 1 through its settle and firing waits.
        for _ in 0..9 {
            seq.advance();
        }
        let p = seq.progress();
        assert!(p.running);
        let expected_us = t.settle_us + FOCUS_DELAY_US + t.shutter_us;
        assert_eq!(p.consumed_s, (expected_us / 1_000_000) as u32);
    }

    #[test]
    fn test_frame_count_honored() {
        let s = Settings {
            images: 3,
            settle_us: 0,
            ..Settings::default()
        };
        let t = derive(&s).unwrap();
        let mut seq = Sequencer::new(t, 3, Direction::Left);

        let actions = run_all(&mut seq);
        let shutter_fires = actions
            .iter()
            .filter(|a| matches!(a, Action::Set(Line::Shutter, Level::High)))
            .count();
        assert_eq!(shutter_fires, 3);
        // Two inter-frame gaps -> two travel pulses.
        let travels = actions
            .iter()
            .filter(|a| matches!(a, Action::Set(Line::MotorA, Level::High)))
            .count();
        assert_eq!(travels, 2);
    }
}
