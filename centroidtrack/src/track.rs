//! A single tracked object: Kalman filter plus its own trajectory forecaster

use crate::forecast::{ForecastParams, TrajectoryForecaster};
use crate::kalman::{FilterParams, ObjectFilter};
use crate::point::{Observation, Point2};

/// Per-frame view of a live track
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackSnapshot {
    pub id: u32,
    pub cx: f32,
    pub cy: f32,
    pub vx: f32,
    pub vy: f32,
    pub speed: f32,
    pub w: f32,
    pub h: f32,
    pub age: u32,
}

#[derive(Debug, Clone)]
pub struct Track {
    /// track id, assigned once at birth
    id: u32,
    /// Kalman filter tracking the centroid state
    filter: ObjectFilter,
    /// forecaster born and dropped together with this track
    forecaster: TrajectoryForecaster,
    /// extent of the last matched observation
    pub last_size: (f32, f32),
}

impl Track {
    pub fn new(
        id: u32,
        observation: &Observation,
        filter_params: &FilterParams,
        forecast_params: &ForecastParams,
    ) -> Self {
        Self {
            id,
            filter: ObjectFilter::new(observation.cx, observation.cy, filter_params),
            forecaster: TrajectoryForecaster::new(forecast_params),
            last_size: observation.size(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Predict the centroid in the next frame
    pub fn predict(&mut self) -> Point2 {
        self.filter.predict();
        self.filter.position()
    }

    /// Update with a matched observation.
    ///
    /// Returns false when the filter rejected the measurement; the track then
    /// keeps its predicted state for this frame.
    pub fn update(&mut self, observation: &Observation) -> bool {
        match self.filter.update(observation.cx, observation.cy) {
            Ok(_) => {
                self.last_size = observation.size();
                true
            }
            Err(e) => {
                log::warn!(
                    "Track {} skipped update with {}: {}",
                    self.id,
                    observation,
                    e
                );
                false
            }
        }
    }

    /// Forecast from the current filtered state
    pub fn forecast(&mut self) -> Vec<Point2> {
        let position = self.filter.position();
        let (vx, vy) = self.filter.velocity();
        self.forecaster
            .update_and_predict(position.x, position.y, vx, vy)
    }

    pub fn snapshot(&self, size: (f32, f32)) -> TrackSnapshot {
        let position = self.filter.position();
        let (vx, vy) = self.filter.velocity();
        TrackSnapshot {
            id: self.id,
            cx: position.x,
            cy: position.y,
            vx,
            vy,
            speed: self.filter.speed(),
            w: size.0,
            h: size.1,
            age: self.filter.age,
        }
    }

    pub fn position(&self) -> Point2 {
        self.filter.position()
    }

    pub fn filter(&self) -> &ObjectFilter {
        &self.filter
    }

    pub fn forecaster(&self) -> &TrajectoryForecaster {
        &self.forecaster
    }

    pub fn age(&self) -> u32 {
        self.filter.age
    }

    pub fn missed_count(&self) -> u32 {
        self.filter.missed_count
    }

    pub fn is_stale(&self) -> bool {
        self.filter.stale()
    }
}
