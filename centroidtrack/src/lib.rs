//! Pure Rust centroid tracking library
//!
//! This crate tracks moving objects from per-frame centroid observations and
//! forecasts where each one is heading:
//!
//! - [`ObjectFilter`]: constant-velocity Kalman filter over `[x, y, vx, vy]`
//! - [`AssociationTracker`]: greedy nearest-neighbour association, track
//!   birth and pruning
//! - [`TrajectoryForecaster`]: per-track linear / quadratic extrapolation
//!
//! ```rust
//! use centroidtrack::{AssociationTracker, Observation, TrackerParams};
//!
//! let mut tracker = AssociationTracker::new(TrackerParams::default());
//! let tracks = tracker.update(&[Observation::new(120.0, 80.0, 40.0, 40.0)]);
//! let forecasts = tracker.forecast();
//! assert_eq!(tracks.len(), forecasts.len());
//! ```

pub mod forecast;
pub mod kalman;
pub mod point;
pub mod track;
pub mod tracker;

pub use forecast::{predict_linear, ForecastParams, TrajectoryForecaster};
pub use kalman::{FilterParams, ObjectFilter};
pub use point::{observations_from_array, Observation, Point2};
pub use track::{Track, TrackSnapshot};
pub use tracker::{snapshots_to_array, AssociationTracker, TrackForecast, TrackerParams};
