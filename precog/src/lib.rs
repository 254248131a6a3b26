//! Predictive safety gate
//!
//! Tracks objects from per-frame centroid observations, forecasts their
//! trajectories and blocks an actuator while any forecast enters a protected
//! circular zone.

pub mod actuator;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod replay;
pub mod safety;
pub mod types;

pub use actuator::{Actuator, SweepingArm};
pub use config::{ForecastConfig, PrecogConfig, TrackerConfig};
pub use error::{PrecogError, Result};
pub use pipeline::{FramePipeline, PipelineStats};
pub use replay::{parse_line, DecisionWriter, FrameRecord, ReplayReader};
pub use safety::SafetyMonitor;
pub use types::{CollisionEvent, FrameDecision, FrameTiming, ProtectedZone};

pub use centroidtrack::{Observation, Point2, TrackSnapshot};

/// Crate version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
