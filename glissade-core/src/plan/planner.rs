//! Derivation of frame timings from settings
//!
//! All arithmetic is integer microseconds. Derivation runs once per
//! settings commit, never inside the frame loop, so the run loop contains
//! no recomputation - and the infeasible-schedule check happens at the one
//! place a run can be armed.

use crate::config::Settings;

/// Fixed autofocus latency between raising the focus line and firing the
/// shutter.
pub const FOCUS_DELAY_US: u64 = 300_000;

/// Derivation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlanError {
    /// The requested timespan is shorter than the time the frames and
    /// rail travel alone require; the pause would be negative.
    Infeasible,
}

/// Execution durations for one run, recomputed whenever settings change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DerivedTiming {
    /// Dwell after the motor stops, before the focus line rises
    pub settle_us: u64,
    /// Exposure time
    pub shutter_us: u64,
    /// Motor pulse length advancing one frame's worth of rail
    pub travel_pulse_us: u64,
    /// Idle wait after each frame that stretches the run to the timespan
    pub pause_us: u64,
    /// Rail advance per frame, micrometers (display only)
    pub step_distance_um: u32,
    /// Total rail traversal time across the run
    pub travel_us: u64,
    /// Exposure + settle + focus delay, summed over all frames
    pub shoot_us: u64,
    /// pause + shutter + settle + focus delay
    pub frame_interval_us: u64,
    /// frame_interval + travel pulse
    pub frame_duration_us: u64,
}

impl DerivedTiming {
    /// Wall-clock estimate of the remaining run after `frames_done`
    /// frames, used by the status screen.
    pub fn remaining_us(&self, images: u16, frames_done: u16) -> u64 {
        let left = images.saturating_sub(frames_done) as u64;
        self.frame_duration_us.saturating_mul(left)
    }
}

/// Derive the execution durations for one run.
///
/// Expects sanitized settings; fails only when the timespan budget cannot
/// cover the shooting and travel time. A single frame collapses all
/// travel-related quantities to zero and never divides by the zero frame
/// gap count.
pub fn derive(s: &Settings) -> Result<DerivedTiming, PlanError> {
    let settle_us = s.settle_us as u64;
    let shutter_us = s.shutter_us as u64;
    let images = s.images as u64;

    let frame_us = shutter_us + settle_us + FOCUS_DELAY_US;
    let shoot_us = frame_us * images;

    // images - 1 gaps between frames; a lone frame never moves.
    let gaps = images.saturating_sub(1);

    let (travel_us, step_distance_um, travel_pulse_us) = if gaps == 0 {
        (0, 0, 0)
    } else {
        let travel_us = s.distance_mm as u64 * 1_000_000 / s.speed_mm_s as u64;
        let step_distance_um = (s.distance_mm as u64 * 1000 / gaps) as u32;
        // um / (mm/s) = um * 1000 / speed in us
        let travel_pulse_us = step_distance_um as u64 * 1000 / s.speed_mm_s as u64;
        (travel_us, step_distance_um, travel_pulse_us)
    };

    let budget_us = s.timespan_min as u64 * 60 * 1_000_000;
    let spent_us = shoot_us + travel_us;
    if budget_us < spent_us {
        return Err(PlanError::Infeasible);
    }

    let mut pause_us = if gaps == 0 {
        0
    } else {
        (budget_us - spent_us) / gaps
    };

    // When the pause dwarfs the settle time, level the two: vibration
    // settling scales with the idle time available instead of being
    // front-loaded.
    let mut settle_us = settle_us;
    if pause_us > 2 * settle_us {
        let each = (pause_us + settle_us) / 2;
        pause_us = each;
        settle_us = each;
    }

    let frame_interval_us = pause_us + shutter_us + settle_us + FOCUS_DELAY_US;
    let frame_duration_us = frame_interval_us + travel_pulse_us;

    Ok(DerivedTiming {
        settle_us,
        shutter_us,
        travel_pulse_us,
        pause_us,
        step_distance_um,
        travel_us,
        shoot_us,
        frame_interval_us,
        frame_duration_us,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::sanitize;

    #[test]
    fn test_default_scenario() {
        // {Shutter 2s, Timespan 60min, Images 120, Distance 2000mm,
        //  Speed 30mm/s, Settle 1s} - in range, so sanitize is identity.
        let s = Settings::default();
        assert_eq!(sanitize(s), s);

        let t = derive(&s).unwrap();
        assert_eq!(t.travel_us, 66_666_666);
        // 2000mm over 119 gaps ~= 16.8mm
        assert_eq!(t.step_distance_um, 16_806);
        // ~0.56s motor pulse per frame
        assert_eq!(t.travel_pulse_us, 560_200);
        // (3600s - 396s - 66.67s) / 119 gaps, then levelled with settle
        assert!(t.pause_us > 0);
        assert_eq!(t.frame_interval_us, t.pause_us + t.shutter_us + t.settle_us + FOCUS_DELAY_US);
        assert_eq!(t.frame_duration_us, t.frame_interval_us + t.travel_pulse_us);
    }

    #[test]
    fn test_remaining_estimate() {
        let s = Settings::default();
        let t = derive(&s).unwrap();
        // Full run ahead, then counting down frame by frame.
        assert_eq!(t.remaining_us(120, 0), t.frame_duration_us * 120);
        assert_eq!(t.remaining_us(120, 119), t.frame_duration_us);
        assert_eq!(t.remaining_us(120, 120), 0);
        // Never underflows past the end.
        assert_eq!(t.remaining_us(120, 130), 0);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let s = Settings::default();
        assert_eq!(derive(&s).unwrap(), derive(&s).unwrap());
    }

    #[test]
    fn test_single_image_collapses_travel() {
        let s = Settings {
            images: 1,
            ..Settings::default()
        };
        let t = derive(&s).unwrap();
        assert_eq!(t.travel_us, 0);
        assert_eq!(t.travel_pulse_us, 0);
        assert_eq!(t.step_distance_um, 0);
        assert_eq!(t.pause_us, 0);
    }

    #[test]
    fn test_infeasible_timespan() {
        // 500 frames of 90s exposure cannot fit in one minute.
        let s = Settings {
            shutter_us: 90_000_000,
            images: 500,
            timespan_min: 1,
            ..Settings::default()
        };
        assert_eq!(derive(&s), Err(PlanError::Infeasible));
    }

    #[test]
    fn test_exact_budget_is_feasible_with_zero_pause() {
        // shoot = (1s shutter + 0 settle + 0.3s focus) * 2 = 2.6s
        // travel = 60mm / 60mm/s = 1s; budget 1min = 60s
        let s = Settings {
            shutter_us: 1_000_000,
            settle_us: 0,
            images: 2,
            distance_mm: 60,
            speed_mm_s: 60,
            timespan_min: 1,
        };
        let t = derive(&s).unwrap();
        // (60 - 3.6)s across 1 gap, levelled with the zero settle
        assert_eq!(t.pause_us + t.settle_us, 56_400_000);
    }

    #[test]
    fn test_pause_settle_levelling() {
        let s = Settings::default();
        let t = derive(&s).unwrap();
        // Raw pause (~26.4s) exceeds twice the 1s settle, so the two are
        // levelled to the same value.
        assert_eq!(t.pause_us, t.settle_us);
        let raw_pause: u64 =
            (3_600_000_000u64 - (t.shoot_us + t.travel_us)) / 119;
        let each = (raw_pause + 1_000_000) / 2;
        assert_eq!(t.pause_us, each);
    }

    #[test]
    fn test_short_pause_not_levelled() {
        // Tight budget: pause stays below twice the settle.
        let s = Settings {
            shutter_us: 1_000_000,
            settle_us: 2_000_000,
            images: 10,
            distance_mm: 100,
            speed_mm_s: 50,
            timespan_min: 1,
        };
        let t = derive(&s).unwrap();
        assert!(t.pause_us <= 2 * t.settle_us);
        assert_eq!(t.settle_us, 2_000_000);
    }
}
