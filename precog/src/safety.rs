//! Predictive collision checks against the protected zone
//!
//! The monitor looks at forecast positions, not current ones, so danger is
//! raised before anything actually enters the zone.

use crate::types::{CollisionEvent, ProtectedZone};
use centroidtrack::{Point2, TrackForecast};
use rayon::prelude::*;

#[derive(Debug, Clone)]
pub struct SafetyMonitor {
    zone: ProtectedZone,
}

impl SafetyMonitor {
    pub fn new(zone: ProtectedZone) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> &ProtectedZone {
        &self.zone
    }

    /// First forecast point inside the zone, if any.
    ///
    /// Later intersections of the same forecast are not reported.
    pub fn check_track(&self, track_id: u32, forecast: &[Point2]) -> Option<CollisionEvent> {
        forecast.iter().enumerate().find_map(|(i, point)| {
            let dist = self.zone.distance_to_center(point);
            (dist < self.zone.radius).then(|| CollisionEvent {
                track_id,
                impact_frame: i + 1,
                impact_point: *point,
                severity: self.zone.severity_at(dist),
            })
        })
    }

    /// Check every track and rank the events, soonest impact first.
    ///
    /// Events with the same impact frame keep the order of `forecasts`.
    pub fn check_all(&self, forecasts: &[TrackForecast]) -> Vec<CollisionEvent> {
        let mut events: Vec<CollisionEvent> = forecasts
            .par_iter()
            .filter_map(|(track_id, points)| self.check_track(*track_id, points))
            .collect();

        events.sort_by_key(|e| e.impact_frame);
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use centroidtrack::predict_linear;

    fn monitor() -> SafetyMonitor {
        SafetyMonitor::new(ProtectedZone::new(Point2::new(320.0, 240.0), 120.0))
    }

    #[test]
    fn test_straight_line_impact() {
        let forecast = predict_linear(100.0, 240.0, 40.0, 0.0, 40);
        let event = monitor().check_track(5, &forecast).unwrap();

        assert_eq!(event.track_id, 5);
        assert_eq!(event.impact_frame, 3);
        assert_eq!(event.impact_point, Point2::new(220.0, 240.0));
        assert_abs_diff_eq!(event.severity, 1.0 - 100.0 / 120.0, epsilon = 1e-5);
    }

    #[test]
    fn test_no_event_when_forecast_stays_outside() {
        let forecast = predict_linear(0.0, 0.0, 10.0, 0.0, 40);
        assert!(monitor().check_track(1, &forecast).is_none());
        assert!(monitor().check_track(1, &[]).is_none());
    }

    #[test]
    fn test_boundary_point_is_outside() {
        let forecast = [Point2::new(440.0, 240.0), Point2::new(320.0, 360.0)];
        assert!(monitor().check_track(1, &forecast).is_none());
    }

    #[test]
    fn test_only_first_intersection_reported() {
        let forecast = [
            Point2::new(0.0, 0.0),
            Point2::new(420.0, 240.0), // enters, distance 100
            Point2::new(600.0, 240.0), // leaves
            Point2::new(320.0, 240.0), // re-enters at the center
            Point2::new(700.0, 240.0),
        ];
        let event = monitor().check_track(2, &forecast).unwrap();

        assert_eq!(event.impact_frame, 2);
        assert_eq!(event.impact_point, Point2::new(420.0, 240.0));
        assert_abs_diff_eq!(event.severity, 1.0 / 6.0, epsilon = 1e-5);
    }

    #[test]
    fn test_center_hit_has_full_severity() {
        let event = monitor()
            .check_track(0, &[Point2::new(320.0, 240.0)])
            .unwrap();
        assert_eq!(event.impact_frame, 1);
        assert_abs_diff_eq!(event.severity, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_check_all_sorted_and_stable() {
        let inside_at = |frame: usize| -> Vec<Point2> {
            let mut pts = vec![Point2::new(0.0, 0.0); 10];
            pts[frame - 1] = Point2::new(320.0, 240.0);
            pts
        };
        let forecasts = vec![
            (10, inside_at(5)),
            (11, vec![Point2::new(0.0, 0.0); 10]),
            (12, inside_at(2)),
            (13, inside_at(5)),
            (14, inside_at(9)),
        ];

        let events = monitor().check_all(&forecasts);
        let order: Vec<(u32, usize)> = events.iter().map(|e| (e.track_id, e.impact_frame)).collect();
        assert_eq!(order, vec![(12, 2), (10, 5), (13, 5), (14, 9)]);
        assert!(events.windows(2).all(|w| w[0].impact_frame <= w[1].impact_frame));
    }

    #[test]
    fn test_check_all_empty() {
        assert!(monitor().check_all(&[]).is_empty());
    }
}
