//! # Recorded Path
//!
//! The path is an ordered list of normalized pad positions. Every point is
//! clamped on the way in, so anything stored here lies in `[0, 1] x [0, 1]`.

/// A normalized position on the pad. `(0, 0)` is bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PadPoint {
    pub x: f32,
    pub y: f32,
}

impl PadPoint {
    /// Build a point, clamping each axis independently into `[0, 1]`.
    pub fn clamped(x: f32, y: f32) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }
}

/// NaN maps to 0.0; `f32::clamp` would pass it through.
fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// The recorded gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedPath {
    points: Vec<PadPoint>,
}

impl RecordedPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Clamp and append a point, returning what was stored.
    pub fn push(&mut self, x: f32, y: f32) -> PadPoint {
        let point = PadPoint::clamped(x, y);
        self.points.push(point);
        point
    }

    /// Drop every point but keep the allocation.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when another `additional` points fit without reallocating.
    pub fn has_room_for(&self, additional: usize) -> bool {
        self.points.capacity() - self.points.len() >= additional
    }

    pub fn reserve(&mut self, additional: usize) {
        self.points.reserve(additional);
    }

    pub fn get(&self, index: usize) -> Option<PadPoint> {
        self.points.get(index).copied()
    }

    /// The point a cursor at `index` should emit.
    ///
    /// Playback cursors may sit at `len` (or past it after a shorter
    /// re-recording), so reads at or past the end return the last point.
    /// Returns `None` only for an empty path.
    pub fn sample_at(&self, index: usize) -> Option<PadPoint> {
        self.points
            .get(index)
            .or_else(|| self.points.last())
            .copied()
    }

    pub fn points(&self) -> &[PadPoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &PadPoint> {
        self.points.iter()
    }
}

impl FromIterator<(f32, f32)> for RecordedPath {
    fn from_iter<I: IntoIterator<Item = (f32, f32)>>(iter: I) -> Self {
        Self {
            points: iter
                .into_iter()
                .map(|(x, y)| PadPoint::clamped(x, y))
                .collect(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
