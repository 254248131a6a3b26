//! Trajectory forecasting from the filtered track state
//!
//! Two models share one entry point:
//! - constant velocity, used until two velocity samples are available
//! - constant acceleration, with the acceleration taken as the mean change of
//!   the recent velocity samples and clamped per axis
//!
//! Both produce exactly `horizon` future positions, nearest frame first.

use crate::point::Point2;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastParams {
    /// Number of future frames to forecast
    /// default = 40
    pub horizon: usize,
    /// Number of velocity samples kept for the acceleration estimate
    /// default = 8
    pub history_len: usize,
    /// Per-axis bound on the estimated acceleration (pixels/frame²)
    /// default = 2.0
    pub max_accel: f32,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            horizon: 40,
            history_len: 8,
            max_accel: 2.0,
        }
    }
}

/// Straight-line extrapolation: the t-th point is `(cx + vx*t, cy + vy*t)`
pub fn predict_linear(cx: f32, cy: f32, vx: f32, vy: f32, horizon: usize) -> Vec<Point2> {
    (1..=horizon)
        .map(|t| {
            let t = t as f32;
            Point2::new(cx + vx * t, cy + vy * t)
        })
        .collect()
}

/// Mean of consecutive differences. The sum telescopes, so only the
/// endpoints matter.
fn mean_step(first: f32, last: f32, n: usize) -> f32 {
    (last - first) / (n - 1) as f32
}

/// Per-track forecaster holding a short window of velocity samples
#[derive(Debug, Clone)]
pub struct TrajectoryForecaster {
    horizon: usize,
    history_len: usize,
    max_accel: f32,
    velocities: VecDeque<(f32, f32)>,
}

impl TrajectoryForecaster {
    pub fn new(params: &ForecastParams) -> Self {
        Self {
            horizon: params.horizon,
            history_len: params.history_len,
            max_accel: params.max_accel,
            velocities: VecDeque::with_capacity(params.history_len + 1),
        }
    }

    /// Record this frame's velocity and forecast `horizon` positions ahead.
    pub fn update_and_predict(&mut self, cx: f32, cy: f32, vx: f32, vy: f32) -> Vec<Point2> {
        self.velocities.push_back((vx, vy));
        while self.velocities.len() > self.history_len {
            self.velocities.pop_front();
        }

        let Some((ax, ay)) = self.acceleration() else {
            return predict_linear(cx, cy, vx, vy, self.horizon);
        };

        (1..=self.horizon)
            .map(|t| {
                let t = t as f32;
                Point2::new(
                    cx + vx * t + 0.5 * ax * t * t,
                    cy + vy * t + 0.5 * ay * t * t,
                )
            })
            .collect()
    }

    /// Clamped acceleration estimate, `None` with fewer than two samples
    pub fn acceleration(&self) -> Option<(f32, f32)> {
        if self.velocities.len() < 2 {
            return None;
        }

        let n = self.velocities.len();
        let (first, last) = (self.velocities.front()?, self.velocities.back()?);
        let ax = mean_step(first.0, last.0, n);
        let ay = mean_step(first.1, last.1, n);
        Some((
            ax.clamp(-self.max_accel, self.max_accel),
            ay.clamp(-self.max_accel, self.max_accel),
        ))
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Number of velocity samples currently held
    pub fn history_len(&self) -> usize {
        self.velocities.len()
    }

    pub fn reset(&mut self) {
        self.velocities.clear();
    }
}
