//! Digital actuator outputs
//!
//! The sequencer drives named output lines; which GPIO each line maps to
//! is the firmware's business. Writes are fire-and-forget: the camera
//! release and motor drive give no feedback.

/// Named output lines of the slider rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// Motor drive, leftward travel
    MotorA,
    /// Motor drive, rightward travel
    MotorB,
    /// Camera autofocus (half-press)
    Focus,
    /// Camera shutter release (full press)
    Shutter,
    /// Panel backlight enable; dropped during exposures for night work
    Backlight,
    /// Run indicator LED
    StatusLed,
}

impl Line {
    /// All lines, for drive-everything-low sweeps.
    pub const ALL: [Line; 6] = [
        Line::MotorA,
        Line::MotorB,
        Line::Focus,
        Line::Shutter,
        Line::Backlight,
        Line::StatusLed,
    ];
}

/// Output level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

/// Travel direction; selects which motor line receives the pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    #[default]
    Left,
    Right,
}

impl Direction {
    /// The motor line pulsed for this direction.
    pub fn line(self) -> Line {
        match self {
            Direction::Left => Line::MotorA,
            Direction::Right => Line::MotorB,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Digital output driver for the slider rig.
pub trait Actuator {
    /// Drive one line to a level.
    fn set(&mut self, line: Line, level: Level);

    /// Force every output low (motor, camera, lights). Used at boot and
    /// on any shutdown path.
    fn all_low(&mut self) {
        for line in Line::ALL {
            self.set(line, Level::Low);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_lines() {
        assert_eq!(Direction::Left.line(), Line::MotorA);
        assert_eq!(Direction::Right.line(), Line::MotorB);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
    }
}
