//! Constant-velocity Kalman filter for a single tracked centroid
//!
//! State is `[x, y, vx, vy]` in pixels and pixels/frame. Only the position is
//! observed. All matrices are fixed-size so predict/update never allocate.

use crate::point::Point2;
use anyhow::{anyhow, bail, Result};
use nalgebra::{Matrix2, Matrix2x4, Matrix4, Vector2, Vector4};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    /// Variance of the measured centroid, per axis
    /// default = 10.0
    pub measurement_noise: f32,
    /// Variance added to every state component on each predict
    /// default = 1.0
    pub process_noise: f32,
    /// Diagonal of the initial state covariance
    /// default = 500.0
    pub initial_covariance: f32,
    /// Consecutive misses after which the filter is stale
    /// default = 10
    pub max_missed: u32,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            measurement_noise: 10.0,
            process_noise: 1.0,
            initial_covariance: 500.0,
            max_missed: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObjectFilter {
    x: Vector4<f32>,  // State vector
    p: Matrix4<f32>,  // State covariance matrix
    f: Matrix4<f32>,  // State transition matrix
    h: Matrix2x4<f32>, // Observation matrix
    q: Matrix4<f32>,  // Process noise covariance
    r: Matrix2<f32>,  // Observation noise covariance
    /// number of predict steps since birth
    pub age: u32,
    /// number of consecutive predict steps without an accepted update
    pub missed_count: u32,
    max_missed: u32,
}

impl ObjectFilter {
    /// Start a filter at an observed centroid with zero velocity
    pub fn new(cx: f32, cy: f32, params: &FilterParams) -> Self {
        #[rustfmt::skip]
        let f = Matrix4::new(
            1.0, 0.0, 1.0, 0.0, // x' = x + vx
            0.0, 1.0, 0.0, 1.0, // y' = y + vy
            0.0, 0.0, 1.0, 0.0, // vx' = vx
            0.0, 0.0, 0.0, 1.0, // vy' = vy
        );
        #[rustfmt::skip]
        let h = Matrix2x4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
        );

        Self {
            x: Vector4::new(cx, cy, 0.0, 0.0),
            p: Matrix4::identity() * params.initial_covariance,
            f,
            h,
            q: Matrix4::identity() * params.process_noise,
            r: Matrix2::identity() * params.measurement_noise,
            age: 0,
            missed_count: 0,
            max_missed: params.max_missed,
        }
    }

    /// Advance one frame. Counts as a miss until `update` succeeds.
    pub fn predict(&mut self) -> Vector4<f32> {
        // x = F * x
        self.x = self.f * self.x;

        // P = F * P * F^T + Q
        self.p = self.f * self.p * self.f.transpose() + self.q;

        self.age += 1;
        self.missed_count += 1;
        self.x
    }

    /// Correct the predicted state with a measured centroid.
    ///
    /// On a singular innovation covariance or a non-finite posterior the
    /// filter is left untouched and an error is returned.
    pub fn update(&mut self, cx: f32, cy: f32) -> Result<Vector4<f32>> {
        let z = Vector2::new(cx, cy);

        // Innovation covariance: S = H * P * H^T + R
        let s = self.h * self.p * self.h.transpose() + self.r;
        if s.iter().any(|v| !v.is_finite()) {
            bail!("non-finite innovation covariance");
        }

        // Kalman gain: K = P * H^T * S^-1
        let s_inv = s
            .try_inverse()
            .ok_or_else(|| anyhow!("Failed to invert innovation covariance matrix"))?;
        let k = self.p * self.h.transpose() * s_inv;

        // Residual: y = z - H * x
        let y = z - self.h * self.x;

        let x = self.x + k * y;
        let p = (Matrix4::identity() - k * self.h) * self.p;
        if x.iter().chain(p.iter()).any(|v| !v.is_finite()) {
            bail!("non-finite posterior for measurement ({}, {})", cx, cy);
        }

        self.x = x;
        self.p = p;
        self.missed_count = 0;
        Ok(self.x)
    }

    pub fn state(&self) -> &Vector4<f32> {
        &self.x
    }

    pub fn covariance(&self) -> &Matrix4<f32> {
        &self.p
    }

    pub fn position(&self) -> Point2 {
        Point2::new(self.x[0], self.x[1])
    }

    pub fn velocity(&self) -> (f32, f32) {
        (self.x[2], self.x[3])
    }

    pub fn speed(&self) -> f32 {
        self.x[2].hypot(self.x[3])
    }

    pub fn stale(&self) -> bool {
        self.missed_count >= self.max_missed
    }
}
