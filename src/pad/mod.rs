//! # Memory Pad Engine
//!
//! The host-agnostic module. It owns the recorded path, the playback
//! cursor and the live pad position, and turns one processing call into one
//! [`PadOutput`].
//!
//! - **`path`**: the clamped point list.
//! - **`recorder`**: drag gesture capture.
//! - **`player`**: playback timing and the three direction modes.
//! - **`transform`**: polarity, attenuation and output scaling.
//! - **`events`**: the editor-to-audio event queue.
//! - **`persist`**: the saved two-array form and its restore contract.
//!
//! ## Modes
//!
//! ```text
//! recording || path empty   -> Direct:   output = transform(live position)
//! otherwise                 -> Playback: advance cursor, output = transform(path[cursor])
//! ```

pub mod events;
pub mod path;
pub mod persist;
pub mod player;
pub mod recorder;
pub mod transform;

pub use events::{pad_event_queue, PadEvent, PadEventReceiver, PadEventSender, QueueFull};
pub use path::{PadPoint, RecordedPath};
pub use persist::{PersistedPath, RestoreError};
pub use player::{Advance, PathDirection, PathPlayer, PlaybackCursor};
pub use recorder::PathRecorder;
pub use transform::{transform, AxisParams, PadOutput, Polarity};

use crate::config::{PadConfig, ParamRange};

/// Parameter values for one processing call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    pub speed: f32,
    pub direction: PathDirection,
    pub x: AxisParams,
    pub y: AxisParams,
}

impl Default for FrameParams {
    fn default() -> Self {
        Self {
            speed: 1.0,
            direction: PathDirection::Forward,
            x: AxisParams::default(),
            y: AxisParams::default(),
        }
    }
}

/// Which branch a processing call takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadMode {
    Direct,
    Playback,
}

pub struct MemoryPad {
    recorder: PathRecorder,
    player: PathPlayer,
    /// Current pad position, driving output in direct mode.
    live: PadPoint,
    output_range: f32,
    speed_range: ParamRange,
    attenuation_range: ParamRange,
}

impl MemoryPad {
    pub fn new(config: &PadConfig) -> Self {
        Self {
            recorder: PathRecorder::with_capacity(config.path_reserve),
            player: PathPlayer::new(config.base_rate),
            live: PadPoint::clamped(config.pad.default, config.pad.default),
            output_range: config.output_range,
            speed_range: config.speed,
            attenuation_range: config.attenuation,
        }
    }

    pub fn mode(&self) -> PadMode {
        if self.recorder.is_recording() || self.recorder.path().is_empty() {
            PadMode::Direct
        } else {
            PadMode::Playback
        }
    }

    pub fn begin_recording(&mut self) {
        self.recorder.begin_recording();
    }

    /// Record a pointer position. The clamped point also becomes the live
    /// position, so direct output follows the drag.
    pub fn capture_sample(&mut self, x: f32, y: f32) -> Option<PadPoint> {
        let point = self.recorder.capture_sample(x, y)?;
        self.live = point;
        Some(point)
    }

    /// Stop recording. The playback cursor carries on from where it was.
    pub fn end_recording(&mut self) {
        self.recorder.end_recording();
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    /// Apply one event from the pad surface. Returns true when it finished
    /// a recording.
    pub fn apply(&mut self, event: PadEvent) -> bool {
        match event {
            PadEvent::BeginRecording => {
                self.begin_recording();
                false
            }
            PadEvent::Capture { x, y } => {
                self.capture_sample(x, y);
                false
            }
            PadEvent::EndRecording => {
                let was_recording = self.is_recording();
                self.end_recording();
                was_recording
            }
        }
    }

    /// Apply every pending event. Returns true when a recording finished
    /// during the drain.
    pub fn drain_events(&mut self, receiver: &mut PadEventReceiver) -> bool {
        let mut finished = false;
        receiver.drain(|event| finished |= self.apply(event));
        finished
    }

    pub fn live_position(&self) -> PadPoint {
        self.live
    }

    pub fn set_live_position(&mut self, x: f32, y: f32) {
        self.live = PadPoint::clamped(x, y);
    }

    pub fn path(&self) -> &RecordedPath {
        self.recorder.path()
    }

    pub fn cursor(&self) -> &PlaybackCursor {
        self.player.cursor()
    }

    pub fn set_cursor(&mut self, cursor: PlaybackCursor) {
        self.player.set_cursor(cursor);
    }

    /// Points that still fit in the path without reallocating.
    pub fn has_room_for(&self, additional: usize) -> bool {
        self.recorder.path().has_room_for(additional)
    }

    pub fn reserve(&mut self, additional: usize) {
        self.recorder.path_mut().reserve(additional);
    }

    /// Replace the path from saved state. On error the current path is
    /// left as it was.
    pub fn restore(&mut self, persisted: &PersistedPath) -> Result<(), RestoreError> {
        self.restore_arrays(&persisted.x, &persisted.y)
    }

    /// Replace the path from two parallel axis arrays.
    pub fn restore_arrays(&mut self, x: &[f32], y: &[f32]) -> Result<(), RestoreError> {
        persist::check_arrays(x, y)?;

        let path = self.recorder.path_mut();
        path.clear();
        for (&px, &py) in x.iter().zip(y) {
            path.push(px, py);
        }
        Ok(())
    }

    pub fn persisted(&self) -> PersistedPath {
        PersistedPath::from_path(self.recorder.path())
    }

    /// Write the path into existing axis arrays, reusing their storage.
    pub fn write_arrays(&self, x: &mut Vec<f32>, y: &mut Vec<f32>) {
        x.clear();
        y.clear();
        for point in self.recorder.path().iter() {
            x.push(point.x);
            y.push(point.y);
        }
    }

    /// One processing call.
    ///
    /// `frame` counts samples since the host's time origin and
    /// `sample_time` is the sample period in seconds. Speed and attenuation
    /// are clamped into the configured ranges first; a speed of zero would
    /// otherwise stall playback on its first point.
    pub fn process(&mut self, frame: u64, sample_time: f32, params: &FrameParams) -> PadOutput {
        let speed = self.speed_range.clamp(params.speed);
        let x = AxisParams {
            attenuation: self.attenuation_range.clamp(params.x.attenuation),
            ..params.x
        };
        let y = AxisParams {
            attenuation: self.attenuation_range.clamp(params.y.attenuation),
            ..params.y
        };

        let point = match self.mode() {
            PadMode::Direct => self.live,
            PadMode::Playback => {
                let path = self.recorder.path();
                self.player
                    .play(path, frame, sample_time, speed, params.direction)
                    .and_then(|index| path.sample_at(index))
                    .unwrap_or(self.live)
            }
        };

        transform(point, &x, &y, self.output_range)
    }
}

impl Default for MemoryPad {
    fn default() -> Self {
        Self::new(&PadConfig::default())
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
