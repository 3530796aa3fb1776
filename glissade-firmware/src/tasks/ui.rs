//! UI task
//!
//! Folds panel input and run events into the appliance state machine,
//! runs the keypad editor, and renders the text screen. Settings commits
//! go through sanitize and the planner here, once per commit; the frame
//! loop never recomputes timing.

use core::fmt::Write as _;

use defmt::*;
use embassy_futures::select::{select3, Either3};
use heapless::String;

use glissade_core::config::{sanitize, Commit, Field, Settings, ValueEditor};
use glissade_core::plan::{derive, DerivedTiming};
use glissade_core::sequencer::{Phase, RunProgress};
use glissade_core::state::{Event, State};
use glissade_core::traits::Direction;

use crate::channels::{
    JogCommand, RunRequest, INPUT_CHANNEL, JOG_CMD, PROGRESS, RUN_CMD, RUN_EVENTS, SCREEN_UPDATE,
    SETTINGS_SAVE, STOP,
};
use crate::display::screen::SCREEN_COLS;
use crate::input::PanelEvent;
use crate::tasks::panel_tx::SCREEN_BUFFER;

/// Which screen the panel is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum ScreenMode {
    /// Run status and start/stop
    Status,
    /// Parameter list
    Menu,
    /// Numeric keypad for one parameter
    Keypad(Field),
}

struct Ui {
    settings: Settings,
    state: State,
    /// Plan for the current settings; None while infeasible
    timing: Option<DerivedTiming>,
    direction: Direction,
    mode: ScreenMode,
    editor: ValueEditor,
    progress: RunProgress,
}

/// UI task - input handling, state machine, screen rendering
#[embassy_executor::task]
pub async fn ui_task(initial: Settings) {
    info!("UI task started");

    let mut ui = Ui::new(initial);
    let mut progress_rx = match PROGRESS.receiver() {
        Some(rx) => rx,
        None => {
            error!("No progress receiver slot");
            return;
        }
    };

    ui.render().await;
    SCREEN_UPDATE.signal(());

    loop {
        match select3(
            INPUT_CHANNEL.receive(),
            RUN_EVENTS.receive(),
            progress_rx.changed(),
        )
        .await
        {
            Either3::First(input) => ui.handle_input(input),
            Either3::Second(event) => {
                debug!("Run event: {:?}", event);
                ui.state = ui.state.transition(event);
            }
            Either3::Third(progress) => ui.progress = progress,
        }

        ui.render().await;
        SCREEN_UPDATE.signal(());
    }
}

impl Ui {
    fn new(initial: Settings) -> Self {
        let settings = sanitize(initial);
        let timing = derive(&settings).ok();
        let state = State::default().transition(Event::SettingsCommitted {
            feasible: timing.is_some(),
        });

        Self {
            settings,
            state,
            timing,
            direction: Direction::Right,
            mode: ScreenMode::Status,
            editor: ValueEditor::new(),
            progress: RunProgress::idle(),
        }
    }

    fn handle_input(&mut self, event: PanelEvent) {
        // Keypad events only mean something while a keypad is open.
        if event.is_keypad() && !matches!(self.mode, ScreenMode::Keypad(_)) {
            return;
        }

        match event {
            PanelEvent::Gear => {
                self.mode = match self.mode {
                    ScreenMode::Status => ScreenMode::Menu,
                    _ => ScreenMode::Status,
                };
            }

            PanelEvent::SelectField(field) => {
                // Count fields open pre-filled; time fields open blank
                // (their stored microseconds are not what the pad shows).
                self.editor = if field.uses_fraction_pad() {
                    ValueEditor::new()
                } else {
                    ValueEditor::with_value(field.get(&self.settings))
                };
                self.mode = ScreenMode::Keypad(field);
            }

            PanelEvent::Digit(d) => self.editor.push_digit(d),
            PanelEvent::Delete => self.editor.backspace(),
            PanelEvent::Cancel => self.mode = ScreenMode::Menu,

            PanelEvent::DoneCount => self.commit(Commit::Count),
            PanelEvent::DoneSeconds => self.commit(Commit::Seconds),
            PanelEvent::DoneFraction => self.commit(Commit::Fraction),

            PanelEvent::Direction => {
                if !self.state.is_running() {
                    self.direction = self.direction.opposite();
                }
            }

            PanelEvent::Start => self.start(),
            PanelEvent::Stop => self.stop(),

            PanelEvent::JogLeftPress => self.jog(Some(Direction::Left)),
            PanelEvent::JogRightPress => self.jog(Some(Direction::Right)),
            PanelEvent::JogLeftRelease | PanelEvent::JogRightRelease => self.jog(None),
        }
    }

    /// Commit the keypad entry: store, sanitize, re-plan, persist.
    fn commit(&mut self, mode: Commit) {
        let field = match self.mode {
            ScreenMode::Keypad(field) => field,
            _ => return,
        };
        // The panel only offers the pad matching the field; anything
        // else is a protocol glitch.
        if field.uses_fraction_pad() == (mode == Commit::Count) {
            warn!("Commit kind does not match {:?}, ignoring", field);
            return;
        }

        let entered = self.editor.commit(mode);
        field.set(&mut self.settings, entered);
        self.settings = sanitize(self.settings);

        let stored = field.get(&self.settings);
        if stored != entered {
            warn!(
                "{} out of range: entered {}, using {}",
                field.label(),
                entered,
                stored
            );
        }

        self.timing = match derive(&self.settings) {
            Ok(timing) => Some(timing),
            Err(e) => {
                warn!("Plan infeasible: {:?}", e);
                None
            }
        };
        self.state = self.state.transition(Event::SettingsCommitted {
            feasible: self.timing.is_some(),
        });

        SETTINGS_SAVE.signal(self.settings);
        self.mode = ScreenMode::Menu;
    }

    fn start(&mut self) {
        if !self.state.start_allowed() {
            debug!("Start ignored in {:?}", self.state);
            return;
        }
        let timing = match self.timing {
            Some(timing) => timing,
            None => return,
        };

        self.state = self.state.transition(Event::Start);
        self.mode = ScreenMode::Status;
        RUN_CMD.signal(RunRequest {
            timing,
            images: self.settings.images,
            direction: self.direction,
        });
    }

    fn stop(&mut self) {
        if self.state.is_running() {
            self.state = self.state.transition(Event::Stop);
            STOP.signal(());
        }
    }

    fn jog(&mut self, direction: Option<Direction>) {
        match direction {
            Some(dir) if self.state.jog_allowed() => JOG_CMD.signal(JogCommand::Drive(dir)),
            Some(_) => {}
            // A release always goes through; a run may have started with
            // the button still held.
            None => JOG_CMD.signal(JogCommand::Release),
        }
    }

    /// Rebuild the shared screen buffer for the current mode.
    async fn render(&self) {
        let mut screen = SCREEN_BUFFER.lock().await;
        screen.clear();

        match self.mode {
            ScreenMode::Status => {
                let mut line: String<SCREEN_COLS> = String::new();
                let arrow = match self.direction {
                    Direction::Left => "<-",
                    Direction::Right => "->",
                };
                let _ = write!(line, "Glissade {} {}", arrow, self.state_label());
                screen.set_line(0, &line);

                line.clear();
                let _ = write!(
                    line,
                    "Frame {}/{}",
                    self.progress.frame, self.settings.images
                );
                screen.set_line(1, &line);

                line.clear();
                let remaining_s = self
                    .timing
                    .map(|t| t.remaining_us(self.settings.images, self.progress.frame) / 1_000_000)
                    .unwrap_or(0) as u32;
                // Worst case "23h59m / 23h59m left" exactly fills a row.
                let _ = write!(
                    line,
                    "{} / {} left",
                    SecsDisplay(self.progress.consumed_s),
                    SecsDisplay(remaining_s)
                );
                screen.set_line(2, &line);

                screen.set_line(3, self.phase_label());
            }

            ScreenMode::Menu => {
                let mut line: String<SCREEN_COLS> = String::new();

                let _ = write!(
                    line,
                    "Shtr {}  Span {}m",
                    MicrosDisplay(self.settings.shutter_us),
                    self.settings.timespan_min
                );
                screen.set_line(0, &line);

                line.clear();
                let _ = write!(
                    line,
                    "Imgs {}  Dist {}mm",
                    self.settings.images, self.settings.distance_mm
                );
                screen.set_line(1, &line);

                line.clear();
                let _ = write!(
                    line,
                    "Stle {}  Spd {}mm/s",
                    MicrosDisplay(self.settings.settle_us),
                    self.settings.speed_mm_s
                );
                screen.set_line(2, &line);

                if self.timing.is_none() {
                    screen.set_line(3, "Does not fit span!");
                }
            }

            ScreenMode::Keypad(field) => {
                screen.set_line(0, field.label());
                let mut line: String<SCREEN_COLS> = String::new();
                let _ = write!(line, "> {}", self.editor.display());
                screen.set_line(1, &line);
                if field.uses_fraction_pad() {
                    screen.set_line(3, "sec or 1/n");
                }
            }
        }
    }

    fn state_label(&self) -> &'static str {
        match self.state {
            State::Idle => "Ready",
            State::Infeasible => "Check!",
            State::Running => "Run",
            State::Done => "Done",
        }
    }

    fn phase_label(&self) -> &'static str {
        match self.progress.phase {
            Phase::Idle => "",
            Phase::Traveling => "Traveling",
            Phase::Settling => "Settling",
            Phase::Firing => "Firing",
            Phase::Pausing => "Pausing",
            Phase::Done => "Run complete",
        }
    }
}

/// Render a microsecond time the way the panel shows it: "2s" for whole
/// seconds, "1/60" for sub-second values.
struct MicrosDisplay(u32);

impl core::fmt::Display for MicrosDisplay {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.0 == 0 {
            write!(f, "0s")
        } else if self.0 >= 1_000_000 {
            if self.0 % 1_000_000 == 0 {
                write!(f, "{}s", self.0 / 1_000_000)
            } else {
                // Tenths are plenty for display purposes.
                write!(f, "{}.{}s", self.0 / 1_000_000, (self.0 / 100_000) % 10)
            }
        } else {
            write!(f, "1/{}", 1_000_000 / self.0)
        }
    }
}

/// Render a second count the way the countdown shows it: "42s" under a
/// minute, "12m30s" under an hour, "1h02m" beyond.
struct SecsDisplay(u32);

impl core::fmt::Display for SecsDisplay {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.0 >= 3600 {
            write!(f, "{}h{:02}m", self.0 / 3600, (self.0 % 3600) / 60)
        } else if self.0 >= 60 {
            write!(f, "{}m{:02}s", self.0 / 60, self.0 % 60)
        } else {
            write!(f, "{}s", self.0)
        }
    }
}

// Tests require std feature (not available on embedded target)
#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    fn shown(us: u32) -> std::string::String {
        std::format!("{}", MicrosDisplay(us))
    }

    #[test]
    fn test_micros_display() {
        assert_eq!(shown(2_000_000), "2s");
        assert_eq!(shown(16_666), "1/60");
        assert_eq!(shown(1_500_000), "1.5s");
        assert_eq!(shown(0), "0s");
    }

    #[test]
    fn test_secs_display() {
        assert_eq!(std::format!("{}", SecsDisplay(42)), "42s");
        assert_eq!(std::format!("{}", SecsDisplay(750)), "12m30s");
        assert_eq!(std::format!("{}", SecsDisplay(3720)), "1h02m");
        assert_eq!(std::format!("{}", SecsDisplay(0)), "0s");
    }
}
