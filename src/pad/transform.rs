//! # Output Transform
//!
//! Turns a normalized pad coordinate into an output value:
//!
//! ```text
//! unipolar:  v                 (0 ..= 1)
//! bipolar:   (v - 0.5) * 2     (-1 ..= 1)
//!
//! out = v * attenuation * output_range
//! ```
//!
//! With the default output range of 5.0 a unipolar axis spans 0..5 and a
//! bipolar axis spans -5..5, the usual control-voltage ranges.

use nih_plug::prelude::Enum;

use super::path::PadPoint;

/// Output polarity for one axis.
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    #[id = "uni"]
    #[name = "Unipolar"]
    Unipolar,
    #[id = "bi"]
    #[name = "Bipolar"]
    Bipolar,
}

impl Polarity {
    /// Convert a raw two-position switch value (0 = unipolar, 1 = bipolar).
    pub fn from_switch(raw: f32) -> Self {
        if raw > 0.5 {
            Polarity::Bipolar
        } else {
            Polarity::Unipolar
        }
    }

    /// State of the polarity indicator light.
    pub fn is_bipolar(self) -> bool {
        self == Polarity::Bipolar
    }

    fn remap(self, value: f32) -> f32 {
        match self {
            Polarity::Unipolar => value,
            Polarity::Bipolar => (value - 0.5) * 2.0,
        }
    }
}

/// Per-axis output settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisParams {
    pub polarity: Polarity,
    /// Output gain in `[0, 1]`.
    pub attenuation: f32,
}

impl Default for AxisParams {
    fn default() -> Self {
        Self {
            polarity: Polarity::Unipolar,
            attenuation: 1.0,
        }
    }
}

impl AxisParams {
    pub fn apply(&self, value: f32, output_range: f32) -> f32 {
        self.polarity.remap(value) * self.attenuation * output_range
    }
}

/// One frame of module output.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PadOutput {
    pub x: f32,
    pub y: f32,
    pub x_bipolar_light: bool,
    pub y_bipolar_light: bool,
    /// The pad point the outputs were computed from.
    pub point: PadPoint,
}

/// Run a point through both axes.
pub fn transform(point: PadPoint, x: &AxisParams, y: &AxisParams, output_range: f32) -> PadOutput {
    PadOutput {
        x: x.apply(point.x, output_range),
        y: y.apply(point.y, output_range),
        x_bipolar_light: x.polarity.is_bipolar(),
        y_bipolar_light: y.polarity.is_bipolar(),
        point,
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const RANGE: f32 = 5.0;

    #[test]
    fn test_unipolar_full_attenuation() {
        let axis = AxisParams {
            polarity: Polarity::Unipolar,
            attenuation: 1.0,
        };
        let out = axis.apply(0.75, RANGE);
        assert!((out - 3.75).abs() < 1e-6, "Expected 3.75, got {out}");
    }

    /// (0.75 - 0.5) * 2 = 0.5, then 0.5 * 0.5 * 5 = 1.25.
    #[test]
    fn test_bipolar_half_attenuation() {
        let axis = AxisParams {
            polarity: Polarity::Bipolar,
            attenuation: 0.5,
        };
        let out = axis.apply(0.75, RANGE);
        assert!((out - 1.25).abs() < 1e-6, "Expected 1.25, got {out}");
    }

    #[test]
    fn test_bipolar_spans_negative_range() {
        let axis = AxisParams {
            polarity: Polarity::Bipolar,
            attenuation: 1.0,
        };
        assert!((axis.apply(0.0, RANGE) + 5.0).abs() < 1e-6);
        assert!(axis.apply(0.5, RANGE).abs() < 1e-6);
        assert!((axis.apply(1.0, RANGE) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_attenuation_silences_axis() {
        let axis = AxisParams {
            polarity: Polarity::Bipolar,
            attenuation: 0.0,
        };
        assert_eq!(axis.apply(0.0, RANGE).abs(), 0.0);
    }

    /// Axes are independent, and the lights follow polarity only.
    #[test]
    fn test_transform_lights_and_axes() {
        let x = AxisParams {
            polarity: Polarity::Bipolar,
            attenuation: 1.0,
        };
        let y = AxisParams::default();
        let out = transform(PadPoint::clamped(1.0, 0.2), &x, &y, RANGE);

        assert!((out.x - 5.0).abs() < 1e-6);
        assert!((out.y - 1.0).abs() < 1e-6);
        assert!(out.x_bipolar_light);
        assert!(!out.y_bipolar_light);
    }

    #[test]
    fn test_polarity_from_switch() {
        assert_eq!(Polarity::from_switch(0.0), Polarity::Unipolar);
        assert_eq!(Polarity::from_switch(1.0), Polarity::Bipolar);
        assert_eq!(Polarity::from_switch(0.9), Polarity::Bipolar);
        assert_eq!(Polarity::from_switch(-3.0), Polarity::Unipolar);
    }
}
