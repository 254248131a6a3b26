//! Centroid observations, 2-D points and distance helpers

use ndarray::prelude::*;
use rayon::prelude::*;
use std::fmt;

/// A point in image space (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point2) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// One detected object in one frame: centroid plus extent
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observation {
    pub cx: f32,
    pub cy: f32,
    pub w: f32,
    pub h: f32,
}

impl Observation {
    pub fn new(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self { cx, cy, w, h }
    }

    pub fn center(&self) -> Point2 {
        Point2::new(self.cx, self.cy)
    }

    pub fn size(&self) -> (f32, f32) {
        (self.w, self.h)
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Observation(c=({:.1}, {:.1}), {:.0}x{:.0})",
            self.cx, self.cy, self.w, self.h
        )
    }
}

/// Size of the observation whose centroid lies nearest to `position`.
///
/// Returns `None` when there is no observation with a finite distance.
pub fn nearest_size(observations: &[Observation], position: Point2) -> Option<(f32, f32)> {
    observations
        .iter()
        .map(|obs| (obs.center().distance(&position), obs))
        .filter(|(dist, _)| dist.is_finite())
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, obs)| obs.size())
}

/// Convert an Nx4 detection matrix (`[cx, cy, w, h]` per row) into observations.
///
/// A matrix with fewer than four columns yields no observations.
pub fn observations_from_array(rows: ArrayView2<f32>) -> Vec<Observation> {
    if rows.ncols() < 4 {
        return Vec::new();
    }

    let rows: Vec<_> = rows.outer_iter().collect();
    rows.par_iter()
        .map(|row| Observation::new(row[0], row[1], row[2], row[3]))
        .collect()
}
