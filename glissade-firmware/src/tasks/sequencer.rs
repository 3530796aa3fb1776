//! Run execution task
//!
//! Owns the six output lines and interprets the core's action stream.
//! Every wait is raced against the STOP signal, so a stop lands within
//! signal-delivery latency instead of waiting out the current phase.
//! When no run is active the task services manual jog commands.

use defmt::*;
use embassy_futures::select::{select, select3, Either, Either3};
use embassy_rp::gpio::Output;
use embassy_time::Timer;

use glissade_core::sequencer::{Action, RunProgress, Sequencer};
use glissade_core::state::Event;
use glissade_core::traits::{Actuator, Level, Line};

use crate::channels::{JogCommand, RunRequest, JOG_CMD, PROGRESS, RUN_CMD, RUN_EVENTS, STOP};

/// How long the Done indication is held before reverting to Idle
const DONE_HOLD_SECS: u64 = 30;

/// The six output lines, indexed by [`Line`]
pub struct GpioActuator {
    outputs: [Output<'static>; 6],
}

impl GpioActuator {
    /// Pins in [`Line::ALL`] order: motor A, motor B, focus, shutter,
    /// backlight, status LED.
    pub fn new(outputs: [Output<'static>; 6]) -> Self {
        Self { outputs }
    }

    fn output(&mut self, line: Line) -> &mut Output<'static> {
        let idx = Line::ALL.iter().position(|l| *l == line).unwrap_or(0);
        &mut self.outputs[idx]
    }
}

impl Actuator for GpioActuator {
    fn set(&mut self, line: Line, level: Level) {
        match level {
            Level::High => self.output(line).set_high(),
            Level::Low => self.output(line).set_low(),
        }
    }
}

/// Sequencer task - executes runs and services jog commands
#[embassy_executor::task]
pub async fn sequencer_task(mut actuator: GpioActuator) {
    info!("Sequencer task started");

    // Known-safe output state at boot: everything low, backlight lit.
    actuator.all_low();
    actuator.set(Line::Backlight, Level::High);

    let progress = PROGRESS.sender();
    progress.send(RunProgress::idle());

    loop {
        match select(RUN_CMD.wait(), JOG_CMD.wait()).await {
            Either::First(req) => run_until_idle(&mut actuator, req).await,
            Either::Second(cmd) => apply_jog(&mut actuator, cmd),
        }
    }
}

/// Execute a run, then hold the Done indication. A new start during the
/// hold begins the next run immediately; jogging is serviced too.
async fn run_until_idle(actuator: &mut GpioActuator, req: RunRequest) {
    let progress = PROGRESS.sender();
    let mut req = req;

    loop {
        execute_run(actuator, &req).await;
        let _ = RUN_EVENTS.try_send(Event::RunFinished);

        match done_hold(actuator).await {
            Some(next) => req = next,
            None => break,
        }
    }

    actuator.set(Line::StatusLed, Level::Low);
    progress.send(RunProgress::idle());
    let _ = RUN_EVENTS.try_send(Event::DoneTimeout);
}

/// Wait out the Done hold. Returns a new request if one arrives first.
async fn done_hold(actuator: &mut GpioActuator) -> Option<RunRequest> {
    let deadline = embassy_time::Instant::now() + embassy_time::Duration::from_secs(DONE_HOLD_SECS);
    loop {
        match select3(
            Timer::at(deadline),
            RUN_CMD.wait(),
            JOG_CMD.wait(),
        )
        .await
        {
            Either3::First(()) => return None,
            Either3::Second(req) => return Some(req),
            Either3::Third(cmd) => apply_jog(actuator, cmd),
        }
    }
}

/// Drive one run's action stream to completion or cancellation.
async fn execute_run(actuator: &mut GpioActuator, req: &RunRequest) {
    info!(
        "Run start: {} frames, {:?} travel",
        req.images, req.direction
    );

    // Drop any stop press left over from before the run, and any motor
    // line still energized by a jog button held across the start.
    STOP.reset();
    park_motors(actuator);
    actuator.set(Line::StatusLed, Level::High);

    let progress = PROGRESS.sender();
    let mut seq = Sequencer::new(req.timing, req.images, req.direction);
    let mut last = RunProgress::idle();

    while let Some(action) = seq.advance() {
        match action {
            Action::Set(line, level) => actuator.set(line, level),
            Action::Wait(us) => match select(Timer::after_micros(us), STOP.wait()).await {
                Either::First(()) => {}
                Either::Second(()) => {
                    debug!("Run: stop requested");
                    seq.cancel();
                }
            },
        }

        let snap = seq.progress();
        if snap != last {
            progress.send(snap);
            last = snap;
        }
    }

    // Resting state: every line low, backlight lit.
    actuator.all_low();
    actuator.set(Line::Backlight, Level::High);
    actuator.set(Line::StatusLed, Level::High);

    progress.send(seq.progress());
    info!("Run complete");
}

/// Manual carriage jog; only reachable while no run is executing.
fn apply_jog(actuator: &mut impl Actuator, cmd: JogCommand) {
    match cmd {
        JogCommand::Drive(direction) => {
            // Never both motor lines at once.
            actuator.set(direction.opposite().line(), Level::Low);
            actuator.set(direction.line(), Level::High);
        }
        JogCommand::Release => park_motors(actuator),
    }
}

/// Both motor lines low.
fn park_motors(actuator: &mut impl Actuator) {
    actuator.set(Line::MotorA, Level::Low);
    actuator.set(Line::MotorB, Level::Low);
}

// Tests require std feature (not available on embedded target)
#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use glissade_core::traits::Direction;

    /// Records line levels without touching hardware.
    #[derive(Default)]
    struct FakeLines {
        high: [bool; 6],
    }

    impl FakeLines {
        fn is_high(&self, line: Line) -> bool {
            let idx = Line::ALL.iter().position(|l| *l == line).unwrap();
            self.high[idx]
        }
    }

    impl Actuator for FakeLines {
        fn set(&mut self, line: Line, level: Level) {
            let idx = Line::ALL.iter().position(|l| *l == line).unwrap();
            self.high[idx] = matches!(level, Level::High);
        }
    }

    #[test]
    fn test_jog_drives_one_motor_line() {
        let mut lines = FakeLines::default();
        apply_jog(&mut lines, JogCommand::Drive(Direction::Left));
        assert!(lines.is_high(Line::MotorA));
        assert!(!lines.is_high(Line::MotorB));

        // Reversing drops the old line first.
        apply_jog(&mut lines, JogCommand::Drive(Direction::Right));
        assert!(!lines.is_high(Line::MotorA));
        assert!(lines.is_high(Line::MotorB));
    }

    #[test]
    fn test_jog_release_parks_both_motors() {
        let mut lines = FakeLines::default();
        apply_jog(&mut lines, JogCommand::Drive(Direction::Right));
        apply_jog(&mut lines, JogCommand::Release);
        assert!(!lines.is_high(Line::MotorA));
        assert!(!lines.is_high(Line::MotorB));
    }

    #[test]
    fn test_run_start_parks_a_jogged_motor() {
        // A start with the jog button still held must not carry the
        // energized motor line into the first frame.
        let mut lines = FakeLines::default();
        apply_jog(&mut lines, JogCommand::Drive(Direction::Left));
        park_motors(&mut lines);
        assert!(!lines.is_high(Line::MotorA));
        assert!(!lines.is_high(Line::MotorB));
    }
}
