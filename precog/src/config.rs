//! Start-up configuration
//!
//! Loaded once from JSON (or defaults), validated, then frozen for the run.
//! Every section falls back to its defaults field by field, so a config file
//! only needs the values it changes.

use crate::error::{PrecogError, Result};
use crate::types::ProtectedZone;
use centroidtrack::{FilterParams, ForecastParams, TrackerParams};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Association and Kalman filter tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Maximum centroid distance for matching an observation to a track (pixels)
    pub max_distance: f32,
    /// Consecutive missed frames before a track is dropped
    pub max_missed: u32,
    /// Measurement noise variance (pixels²)
    pub measurement_noise: f32,
    /// Process noise variance added per frame
    pub process_noise: f32,
    /// Initial state covariance diagonal for new tracks
    pub initial_covariance: f32,
    /// Size reported for tracks in frames without observations
    pub fallback_size: [f32; 2],
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_distance: 80.0,
            max_missed: 10,
            measurement_noise: 10.0,
            process_noise: 1.0,
            initial_covariance: 500.0,
            fallback_size: [40.0, 40.0],
        }
    }
}

/// Trajectory forecasting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Future frames forecast per track
    pub horizon: usize,
    /// Velocity samples used for the acceleration estimate
    pub history_len: usize,
    /// Per-axis acceleration clamp (pixels/frame²)
    pub max_accel: f32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 40,
            history_len: 8,
            max_accel: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrecogConfig {
    pub tracker: TrackerConfig,
    pub forecast: ForecastConfig,
    pub zone: ProtectedZone,
    /// Wall-clock allowance per frame (milliseconds); ~30 FPS by default
    pub frame_budget_ms: f32,
}

impl Default for PrecogConfig {
    fn default() -> Self {
        Self {
            tracker: TrackerConfig::default(),
            forecast: ForecastConfig::default(),
            zone: ProtectedZone::default(),
            frame_budget_ms: 33.0,
        }
    }
}

fn require_positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PrecogError::config(format!(
            "{} must be a positive finite number, got {}",
            name, value
        )))
    }
}

impl PrecogConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            PrecogError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        let t = &self.tracker;
        require_positive("tracker.max_distance", t.max_distance)?;
        require_positive("tracker.measurement_noise", t.measurement_noise)?;
        require_positive("tracker.process_noise", t.process_noise)?;
        require_positive("tracker.initial_covariance", t.initial_covariance)?;
        require_positive("tracker.fallback_size[0]", t.fallback_size[0])?;
        require_positive("tracker.fallback_size[1]", t.fallback_size[1])?;
        if t.max_missed == 0 {
            return Err(PrecogError::config("tracker.max_missed must be at least 1"));
        }

        let f = &self.forecast;
        if f.horizon == 0 {
            return Err(PrecogError::config("forecast.horizon must be at least 1"));
        }
        if f.history_len == 0 {
            return Err(PrecogError::config(
                "forecast.history_len must be at least 1",
            ));
        }
        if !f.max_accel.is_finite() || f.max_accel < 0.0 {
            return Err(PrecogError::config(format!(
                "forecast.max_accel must be a non-negative finite number, got {}",
                f.max_accel
            )));
        }

        if !self.zone.center.is_finite() {
            return Err(PrecogError::config(format!(
                "zone.center must be finite, got {}",
                self.zone.center
            )));
        }
        require_positive("zone.radius", self.zone.radius)?;
        require_positive("frame_budget_ms", self.frame_budget_ms)?;
        Ok(())
    }

    /// Parameters for the tracking library
    pub fn tracker_params(&self) -> TrackerParams {
        TrackerParams {
            max_distance: self.tracker.max_distance,
            fallback_size: (self.tracker.fallback_size[0], self.tracker.fallback_size[1]),
            filter: FilterParams {
                measurement_noise: self.tracker.measurement_noise,
                process_noise: self.tracker.process_noise,
                initial_covariance: self.tracker.initial_covariance,
                max_missed: self.tracker.max_missed,
            },
            forecast: ForecastParams {
                horizon: self.forecast.horizon,
                history_len: self.forecast.history_len,
                max_accel: self.forecast.max_accel,
            },
        }
    }
}
