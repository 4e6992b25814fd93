//! # Persisted Path
//!
//! A recording is saved as two parallel arrays, one per axis:
//!
//! ```json
//! {
//!   "RECORDED_X_PATH_KEY": [0.1, 0.2, 0.3],
//!   "RECORDED_Y_PATH_KEY": [0.9, 0.8, 0.7]
//! }
//! ```
//!
//! Restoring only succeeds when both arrays are non-empty and the same
//! length. Anything else means "no recording": the caller keeps whatever
//! path it already has.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::path::RecordedPath;

pub const RECORDED_X_PATH_KEY: &str = "RECORDED_X_PATH_KEY";
pub const RECORDED_Y_PATH_KEY: &str = "RECORDED_Y_PATH_KEY";

/// Why a persisted path could not be restored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RestoreError {
    #[error("no recorded path stored")]
    Empty,

    #[error("recorded path arrays differ in length (x: {x}, y: {y})")]
    LengthMismatch { x: usize, y: usize },
}

/// The saved form of a [`RecordedPath`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedPath {
    #[serde(rename = "RECORDED_X_PATH_KEY", default)]
    pub x: Vec<f32>,
    #[serde(rename = "RECORDED_Y_PATH_KEY", default)]
    pub y: Vec<f32>,
}

impl PersistedPath {
    pub fn from_path(path: &RecordedPath) -> Self {
        let (x, y) = path.iter().map(|p| (p.x, p.y)).unzip();
        Self { x, y }
    }

    /// Zip the arrays back into a path. Values are clamped on the way in.
    pub fn restore(&self) -> Result<RecordedPath, RestoreError> {
        check_arrays(&self.x, &self.y)?;
        Ok(self.x.iter().copied().zip(self.y.iter().copied()).collect())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse the saved form. Missing keys read as empty arrays.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Validate two parallel axis arrays against the restore contract.
pub fn check_arrays(x: &[f32], y: &[f32]) -> Result<(), RestoreError> {
    if x.len() != y.len() {
        return Err(RestoreError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if x.is_empty() {
        return Err(RestoreError::Empty);
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
