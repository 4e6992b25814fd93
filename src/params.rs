//! # Plugin Parameters
//!
//! The knobs and switches the host sees, plus the persisted recording.
//!
//! - **Parameter IDs** (`#[id = "..."]`) are what the host saves presets
//!   and automation against. Once published, never change them.
//! - **Persisted fields** (`#[persist = "..."]`) are saved with the plugin
//!   state but are not automatable. The recorded path is stored as two
//!   parallel arrays under the same keys as its JSON form.
//!
//! Ranges and defaults come from [`PadConfig`]. Direction and polarity are
//! `EnumParam`s, so the engine receives proper enums rather than raw
//! switch positions.
//!
//! ## Syncing the recording
//!
//! [`PathSync`] copies a finished recording into the persisted arrays and
//! decides, on activation, whether the arrays or the engine hold the newer
//! path. See its docs for the rules.
//!
//! ## Smoothing
//!
//! Only attenuation is smoothed. Speed is read raw: any change in speed
//! resynchronizes playback timing, so a smoother ramping through
//! intermediate values would stall playback for the whole ramp. Pad X/Y
//! move in steps as the pointer moves, just as the recorded path does.

use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;
use std::sync::{Arc, PoisonError, RwLock};

use nih_plug::prelude::*;
use nih_plug_egui::EguiState;

use crate::config::{PadConfig, ParamRange};
use crate::pad::{AxisParams, FrameParams, MemoryPad, PathDirection, Polarity, RestoreError};

/// Editor window size in logical pixels.
const EDITOR_WIDTH: u32 = 260;
const EDITOR_HEIGHT: u32 = 380;

#[derive(Params)]
pub struct PluginParams {
    /// Editor window size, remembered between sessions.
    #[persist = "editor-state"]
    pub editor_state: Arc<EguiState>,

    /// X coordinates of the recorded path.
    #[persist = "RECORDED_X_PATH_KEY"]
    pub recorded_x: Arc<RwLock<Vec<f32>>>,

    /// Y coordinates of the recorded path, index-aligned with `recorded_x`.
    #[persist = "RECORDED_Y_PATH_KEY"]
    pub recorded_y: Arc<RwLock<Vec<f32>>>,

    /// **Pad X** — live horizontal pad position. Drives the X output
    /// directly whenever nothing is being played back.
    #[id = "pad_x"]
    pub pad_x: FloatParam,

    /// **Pad Y** — live vertical pad position.
    #[id = "pad_y"]
    pub pad_y: FloatParam,

    /// **Direction** — Fwd loops the path, InOut bounces between its ends,
    /// Rev loops it backwards.
    #[id = "dir"]
    pub direction: EnumParam<PathDirection>,

    /// **Speed** — playback rate relative to the 60 Hz base rate.
    #[id = "speed"]
    pub speed: FloatParam,

    /// **X Polarity** — unipolar (0..5) or bipolar (-5..5) X output.
    #[id = "x_pol"]
    pub x_polarity: EnumParam<Polarity>,

    /// **Y Polarity**
    #[id = "y_pol"]
    pub y_polarity: EnumParam<Polarity>,

    /// **X Attenuation** — output gain for the X axis.
    #[id = "x_attn"]
    pub x_attenuation: FloatParam,

    /// **Y Attenuation**
    #[id = "y_attn"]
    pub y_attenuation: FloatParam,
}

impl Default for PluginParams {
    fn default() -> Self {
        Self::new(&PadConfig::default())
    }
}

impl PluginParams {
    pub fn new(config: &PadConfig) -> Self {
        Self {
            editor_state: EguiState::from_size(EDITOR_WIDTH, EDITOR_HEIGHT),
            recorded_x: Arc::new(RwLock::new(Vec::new())),
            recorded_y: Arc::new(RwLock::new(Vec::new())),

            pad_x: pad_param("Pad X", config.pad),
            pad_y: pad_param("Pad Y", config.pad),

            direction: EnumParam::new("Path Direction", config.direction),

            speed: FloatParam::new("Speed", config.speed.default, linear(config.speed))
                .with_unit("x")
                .with_step_size(0.01),

            x_polarity: EnumParam::new("X Polarity", config.polarity),
            y_polarity: EnumParam::new("Y Polarity", config.polarity),

            x_attenuation: attenuation_param("X Attenuation", config.attenuation),
            y_attenuation: attenuation_param("Y Attenuation", config.attenuation),
        }
    }

    /// Snapshot the per-call parameter values for the engine. Advances the
    /// attenuation smoothers, so call it once per sample.
    pub fn frame_params(&self) -> FrameParams {
        FrameParams {
            speed: self.speed.value(),
            direction: self.direction.value(),
            x: AxisParams {
                polarity: self.x_polarity.value(),
                attenuation: self.x_attenuation.smoothed.next(),
            },
            y: AxisParams {
                polarity: self.y_polarity.value(),
                attenuation: self.y_attenuation.smoothed.next(),
            },
        }
    }

    /// Load the persisted arrays into `pad`, leaving its path alone when
    /// they are missing or malformed.
    pub fn restore_into(&self, pad: &mut MemoryPad) -> Result<(), RestoreError> {
        let x = self.recorded_x.read().unwrap_or_else(PoisonError::into_inner);
        let y = self.recorded_y.read().unwrap_or_else(PoisonError::into_inner);
        pad.restore_arrays(&x, &y)
    }

    /// Copy `pad`'s path into the persisted arrays without blocking.
    ///
    /// Returns the fingerprint of the written arrays, or `None` when the
    /// host holds either lock (it is saving state right now); the caller
    /// retries later.
    pub fn try_store_from(&self, pad: &MemoryPad) -> Option<u64> {
        let (Ok(mut x), Ok(mut y)) = (self.recorded_x.try_write(), self.recorded_y.try_write())
        else {
            return None;
        };
        // Growing the arrays past their previous size allocates.
        nih_plug::util::permit_alloc(|| pad.write_arrays(&mut x, &mut y));
        Some(fingerprint(&x, &y))
    }

    /// Copy `pad`'s path into the persisted arrays, waiting for the locks.
    /// Never call this from the audio thread.
    pub fn store_from(&self, pad: &MemoryPad) -> u64 {
        let mut x = self.recorded_x.write().unwrap_or_else(PoisonError::into_inner);
        let mut y = self.recorded_y.write().unwrap_or_else(PoisonError::into_inner);
        pad.write_arrays(&mut x, &mut y);
        fingerprint(&x, &y)
    }

    /// Fingerprint of the persisted arrays as they are now.
    pub fn stored_fingerprint(&self) -> u64 {
        let x = self.recorded_x.read().unwrap_or_else(PoisonError::into_inner);
        let y = self.recorded_y.read().unwrap_or_else(PoisonError::into_inner);
        fingerprint(&x, &y)
    }
}

/// Keeps the persisted arrays in step with the engine's path.
///
/// A finished recording is marked pending and copied over by
/// [`flush`](Self::flush) on the audio thread once the locks are free.
/// Between the two, the host may reactivate the plugin, either on its own
/// (sample rate change, bypass) or after loading saved state.
/// [`activate`](Self::activate) tells these apart by comparing the arrays
/// against the fingerprint of the last sync:
///
/// ```text
/// arrays unchanged since last sync -> write the pending recording, then restore
/// arrays replaced by the host      -> restore; the loaded state wins
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSync {
    pending: bool,
    /// Fingerprint of the arrays as this plugin last wrote or read them.
    synced: u64,
}

impl PathSync {
    pub fn new(params: &PluginParams) -> Self {
        Self {
            pending: false,
            synced: params.stored_fingerprint(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// A recording finished and needs persisting.
    pub fn mark_pending(&mut self) {
        self.pending = true;
    }

    /// Audio-thread sync. Waits for the recording to end and never blocks
    /// on the locks.
    pub fn flush(&mut self, params: &PluginParams, pad: &MemoryPad) {
        if !self.pending || pad.is_recording() {
            return;
        }
        if let Some(fingerprint) = params.try_store_from(pad) {
            self.synced = fingerprint;
            self.pending = false;
        }
    }

    /// Activation-time sync followed by a restore from the persisted arrays.
    pub fn activate(
        &mut self,
        params: &PluginParams,
        pad: &mut MemoryPad,
    ) -> Result<(), RestoreError> {
        if self.pending && !pad.is_recording() && params.stored_fingerprint() == self.synced {
            self.synced = params.store_from(pad);
            self.pending = false;
        }

        let restored = params.restore_into(pad);
        if restored.is_ok() {
            self.pending = false;
        }
        self.synced = params.stored_fingerprint();
        restored
    }
}

fn fingerprint(x: &[f32], y: &[f32]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for axis in [x, y] {
        hasher.write_usize(axis.len());
        for value in axis {
            hasher.write_u32(value.to_bits());
        }
    }
    hasher.finish()
}

fn linear(range: ParamRange) -> FloatRange {
    FloatRange::Linear {
        min: range.min,
        max: range.max,
    }
}

fn pad_param(name: &str, range: ParamRange) -> FloatParam {
    FloatParam::new(name, range.default, linear(range))
        .with_value_to_string(formatters::v2s_f32_rounded(3))
}

fn attenuation_param(name: &str, range: ParamRange) -> FloatParam {
    FloatParam::new(name, range.default, linear(range))
        .with_unit("%")
        .with_smoother(SmoothingStyle::Linear(20.0))
        // Display as percentage: 0.40 → "40.0%"
        .with_value_to_string(formatters::v2s_f32_percentage(1))
        .with_string_to_value(formatters::s2v_f32_percentage())
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
