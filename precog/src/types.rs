//! Type definitions for zones, collision events and per-frame decisions

use centroidtrack::{Point2, TrackSnapshot};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Circular region that no forecast trajectory may enter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProtectedZone {
    pub center: Point2,
    /// Radius in pixels
    pub radius: f32,
}

impl ProtectedZone {
    pub fn new(center: Point2, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn distance_to_center(&self, point: &Point2) -> f32 {
        self.center.distance(point)
    }

    /// Strictly inside; a point on the boundary is outside
    pub fn contains(&self, point: &Point2) -> bool {
        self.distance_to_center(point) < self.radius
    }

    /// 1.0 at the center, 0.0 at the boundary and beyond
    pub fn severity_at(&self, distance: f32) -> f32 {
        (1.0 - distance / self.radius).max(0.0)
    }
}

impl Default for ProtectedZone {
    fn default() -> Self {
        Self {
            center: Point2::new(320.0, 240.0),
            radius: 120.0,
        }
    }
}

/// Predicted intrusion of one track's forecast into the protected zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionEvent {
    pub track_id: u32,
    /// 1-based index of the first forecast point inside the zone
    pub impact_frame: usize,
    pub impact_point: Point2,
    /// 0.0 (grazing) to 1.0 (dead center)
    pub severity: f32,
}

/// Wall-clock time spent in each stage of one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameTiming {
    pub track_ms: f32,
    pub forecast_ms: f32,
    pub safety_ms: f32,
    pub total_ms: f32,
}

/// Everything the pipeline decided for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameDecision {
    pub frame: u64,
    pub tracks: Vec<TrackSnapshot>,
    /// Soonest impact first
    pub events: Vec<CollisionEvent>,
    pub danger: bool,
    pub timing: FrameTiming,
}

impl FrameDecision {
    pub fn is_safe(&self) -> bool {
        !self.danger
    }

    /// Most imminent predicted intrusion
    pub fn soonest(&self) -> Option<&CollisionEvent> {
        self.events.first()
    }

    /// Intrusion that passes closest to the zone center
    pub fn most_severe(&self) -> Option<&CollisionEvent> {
        self.events
            .iter()
            .max_by(|a, b| a.severity.total_cmp(&b.severity))
    }

    /// One-line operator status
    pub fn status_line(&self) -> String {
        match self.soonest() {
            Some(event) => format!(
                "PREDICTED COLLISION — Track T{} in {} frames | ACTION BLOCKED",
                event.track_id, event.impact_frame
            ),
            None => "SAFE TO OPERATE — no trajectory intersects protected zone".to_string(),
        }
    }
}

impl fmt::Display for FrameDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[frame {}] {} tracks, {}",
            self.frame,
            self.tracks.len(),
            self.status_line()
        )
    }
}
