//! # Pad Configuration
//!
//! Parameter ranges, defaults and engine constants in one place. The host
//! params in [`crate::params`] and the engine factory both read from
//! [`PadConfig`], so the plugin adapter and any other host agree on what
//! "speed 1.0" or "full attenuation" means.

use crate::pad::{MemoryPad, PathDirection, Polarity};

/// A closed numeric range with a default value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32, default: f32) -> Self {
        Self { min, max, default }
    }

    /// Clamp a raw host value into the range. NaN falls back to the default.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }
}

/// Everything needed to describe and construct a memory pad.
#[derive(Debug, Clone, PartialEq)]
pub struct PadConfig {
    /// Live pad position, one range per axis.
    pub pad: ParamRange,
    /// Playback speed multiplier.
    pub speed: ParamRange,
    /// Per-axis output attenuation.
    pub attenuation: ParamRange,
    pub direction: PathDirection,
    pub polarity: Polarity,
    /// Nominal path-sampling rate in frames per second. Playback advances
    /// against this rate, never against the host sample rate.
    pub base_rate: f64,
    /// Output scale applied after polarity and attenuation.
    pub output_range: f32,
    /// Capacity of the editor-to-audio event queue.
    pub queue_capacity: usize,
    /// Points reserved up front so ordinary recordings never allocate on
    /// the audio thread.
    pub path_reserve: usize,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            pad: ParamRange::new(0.0, 1.0, 0.0),
            speed: ParamRange::new(0.1, 5.0, 1.0),
            attenuation: ParamRange::new(0.0, 1.0, 1.0),
            direction: PathDirection::Forward,
            polarity: Polarity::Unipolar,
            base_rate: 60.0,
            output_range: 5.0,
            queue_capacity: 4096,
            path_reserve: 16 * 1024,
        }
    }
}

impl PadConfig {
    /// Build an engine with this configuration.
    pub fn build(&self) -> MemoryPad {
        MemoryPad::new(self)
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
