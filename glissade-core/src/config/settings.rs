//! Slider run parameters
//!
//! All sub-second times are integer microseconds; there is no floating
//! point anywhere in the core. Values entered by the operator are coerced
//! into their documented ranges by [`sanitize`] before they reach the
//! planner - an out-of-range value is silently replaced by its fallback,
//! never rejected.

/// Shortest representable exposure: 1/8000 s.
pub const MIN_SHUTTER_US: u32 = 125;

/// Longest exposure: 90 s (bulb-length exposures are out of scope).
pub const MAX_SHUTTER_US: u32 = 90_000_000;

/// Fallback exposure when the entered value is unusable: 1/60 s.
pub const FALLBACK_SHUTTER_US: u32 = 16_667;

/// Frame count bounds and fallback.
pub const MAX_IMAGES: u16 = 500;
pub const FALLBACK_IMAGES: u16 = 10;

/// Rail geometry bounds.
pub const MAX_DISTANCE_MM: u16 = 5000;
pub const FALLBACK_DISTANCE_MM: u16 = 500;
pub const FALLBACK_SPEED_MM_S: u16 = 30;

/// Timespan bounds (minutes) and the two fallbacks.
pub const MAX_TIMESPAN_MIN: u16 = 1440;
pub const FALLBACK_TIMESPAN_SHORT_MIN: u16 = 30;
pub const FALLBACK_TIMESPAN_LONG_MIN: u16 = 60;

/// The six operator-editable run parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// Exposure time in microseconds
    pub shutter_us: u32,
    /// Vibration settle dwell after the motor stops, microseconds
    pub settle_us: u32,
    /// Number of frames in the run
    pub images: u16,
    /// Total rail travel in millimeters
    pub distance_mm: u16,
    /// Carriage speed in mm/s while the motor is pulsed
    pub speed_mm_s: u16,
    /// Total run budget in minutes
    pub timespan_min: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            shutter_us: 2_000_000,
            settle_us: 1_000_000,
            images: 120,
            distance_mm: 2000,
            speed_mm_s: 30,
            timespan_min: 60,
        }
    }
}

/// Selector for the parameter currently being edited on the keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    Shutter,
    Settle,
    Images,
    Distance,
    Speed,
    Timespan,
}

impl Field {
    /// All fields in parameter-screen order.
    pub const ALL: [Field; 6] = [
        Field::Shutter,
        Field::Timespan,
        Field::Images,
        Field::Distance,
        Field::Settle,
        Field::Speed,
    ];

    /// Fields holding a time in microseconds use the seconds/fraction
    /// keypad; the rest use the plain integer keypad.
    pub fn uses_fraction_pad(self) -> bool {
        matches!(self, Field::Shutter | Field::Settle)
    }

    /// Short label for the panel.
    pub fn label(self) -> &'static str {
        match self {
            Field::Shutter => "Shutter",
            Field::Settle => "Settle",
            Field::Images => "Images",
            Field::Distance => "Distance",
            Field::Speed => "Speed",
            Field::Timespan => "Timespan",
        }
    }

    /// Read the raw value of this field.
    pub fn get(self, s: &Settings) -> u32 {
        match self {
            Field::Shutter => s.shutter_us,
            Field::Settle => s.settle_us,
            Field::Images => s.images as u32,
            Field::Distance => s.distance_mm as u32,
            Field::Speed => s.speed_mm_s as u32,
            Field::Timespan => s.timespan_min as u32,
        }
    }

    /// Store a committed keypad value into this field.
    ///
    /// Count-valued fields saturate at u16; range enforcement proper is
    /// [`sanitize`]'s job.
    pub fn set(self, s: &mut Settings, value: u32) {
        let as_u16 = value.min(u16::MAX as u32) as u16;
        match self {
            Field::Shutter => s.shutter_us = value,
            Field::Settle => s.settle_us = value,
            Field::Images => s.images = as_u16,
            Field::Distance => s.distance_mm = as_u16,
            Field::Speed => s.speed_mm_s = as_u16,
            Field::Timespan => s.timespan_min = as_u16,
        }
    }
}

/// Coerce raw settings into the documented ranges.
///
/// Total and idempotent: every output field lies in range, and sanitizing
/// twice changes nothing. Out-of-range values become their fallback
/// (distance is clamped instead, per the rail geometry constraint
/// speed <= distance <= 5000).
pub fn sanitize(raw: Settings) -> Settings {
    let shutter_us = if raw.shutter_us > MIN_SHUTTER_US && raw.shutter_us <= MAX_SHUTTER_US {
        raw.shutter_us
    } else {
        FALLBACK_SHUTTER_US
    };

    // Settle has no upper bound; any u32 is a valid dwell.
    let settle_us = raw.settle_us;

    let images = if raw.images >= 1 && raw.images <= MAX_IMAGES {
        raw.images
    } else {
        FALLBACK_IMAGES
    };

    let speed_mm_s = if raw.speed_mm_s >= 1 && raw.speed_mm_s <= MAX_DISTANCE_MM {
        raw.speed_mm_s
    } else {
        FALLBACK_SPEED_MM_S
    };

    let distance_mm = if raw.distance_mm == 0 {
        FALLBACK_DISTANCE_MM
    } else {
        raw.distance_mm
    }
    .clamp(speed_mm_s, MAX_DISTANCE_MM);

    let timespan_min = if raw.timespan_min < 1 {
        FALLBACK_TIMESPAN_SHORT_MIN
    } else if raw.timespan_min > MAX_TIMESPAN_MIN {
        FALLBACK_TIMESPAN_LONG_MIN
    } else {
        raw.timespan_min
    };

    Settings {
        shutter_us,
        settle_us,
        images,
        distance_mm,
        speed_mm_s,
        timespan_min,
    }
}
