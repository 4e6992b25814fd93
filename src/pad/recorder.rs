//! # Path Recorder
//!
//! Captures a drag gesture into a [`RecordedPath`]. A drag-start clears the
//! previous path and raises the recording flag, every pointer move appends
//! one clamped point, and drag-end lowers the flag again.

use super::path::{PadPoint, RecordedPath};

#[derive(Debug, Clone, Default)]
pub struct PathRecorder {
    path: RecordedPath,
    recording: bool,
}

impl PathRecorder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            path: RecordedPath::with_capacity(capacity),
            recording: false,
        }
    }

    /// Drop the previous recording and start a new one.
    pub fn begin_recording(&mut self) {
        self.path.clear();
        self.recording = true;
    }

    /// Append a pointer position to the recording in progress.
    ///
    /// Returns the clamped point that was stored, or `None` when no
    /// recording is in progress.
    pub fn capture_sample(&mut self, x: f32, y: f32) -> Option<PadPoint> {
        if !self.recording {
            return None;
        }
        Some(self.path.push(x, y))
    }

    pub fn end_recording(&mut self) {
        self.recording = false;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn path(&self) -> &RecordedPath {
        &self.path
    }

    pub(crate) fn path_mut(&mut self) -> &mut RecordedPath {
        &mut self.path
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
