//! Coordinate normalization: raw device coordinates to the unit square.
//!
//! Raw pointer coordinates arrive in device pixels relative to a fixed
//! reference surface (640×480 in the original deployment).  The receiver
//! works exclusively in normalized `[0,1]×[0,1]` coordinates, so every
//! sample is clamped to the surface bounds and divided by the surface size
//! before it leaves the process.  Out-of-range input (including negative
//! coordinates) is pulled to the nearest bound; it is never an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for surface construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    /// Width and height must both be strictly positive.
    #[error("surface dimensions must be positive, got {width}x{height}")]
    EmptySurface { width: i32, height: i32 },
}

/// The fixed reference surface raw coordinates are measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSize {
    width: i32,
    height: i32,
}

impl SurfaceSize {
    /// Creates a surface, rejecting zero or negative dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::EmptySurface`] unless both dimensions are
    /// strictly positive.
    pub fn new(width: i32, height: i32) -> Result<Self, SurfaceError> {
        if width <= 0 || height <= 0 {
            return Err(SurfaceError::EmptySurface { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }
}

impl Default for SurfaceSize {
    /// The reference resolution of the original deployment.
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// A raw pointer sample in device coordinates.
///
/// Overwritten on every input event; owned exclusively by the router.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerSample {
    pub x: i32,
    pub y: i32,
}

/// A position rescaled into the closed unit square.
///
/// Invariant: `0.0 <= u <= 1.0` and `0.0 <= v <= 1.0`, regardless of the
/// raw input it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPosition {
    pub u: f64,
    pub v: f64,
}

/// Clamps `sample` to `[0, width]×[0, height]` and rescales to the unit square.
///
/// Pure and deterministic; the same inputs always yield the same output.
/// `x == width` maps to exactly `u == 1.0` and `x == 0` to `u == 0.0`.
pub fn normalize(sample: PointerSample, surface: SurfaceSize) -> NormalizedPosition {
    let x = sample.x.clamp(0, surface.width);
    let y = sample.y.clamp(0, surface.height);
    NormalizedPosition {
        u: f64::from(x) / f64::from(surface.width),
        v: f64::from(y) / f64::from(surface.height),
    }
}
