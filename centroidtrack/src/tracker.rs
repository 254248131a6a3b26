//! Multi-object centroid tracker with greedy nearest-neighbour association
//!
//! Each frame runs predict -> associate -> birth -> prune -> size lookup.
//! Association is greedy in observation order: every observation takes the
//! nearest track not yet claimed this frame, if it is closer than
//! `max_distance`. This is not an optimal assignment; near-ties resolve by
//! input order.

use crate::forecast::ForecastParams;
use crate::kalman::FilterParams;
use crate::point::{nearest_size, Observation, Point2};
use crate::track::{Track, TrackSnapshot};
use ndarray::prelude::*;
use rayon::prelude::*;

/// Forecast for one track in the current frame
pub type TrackForecast = (u32, Vec<Point2>);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerParams {
    /// Observations farther than this from every free track start a new one
    /// default = 80.0
    pub max_distance: f32,
    /// Size reported for tracks when the frame has no observations
    /// default = (40.0, 40.0)
    pub fallback_size: (f32, f32),
    pub filter: FilterParams,
    pub forecast: ForecastParams,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            max_distance: 80.0,
            fallback_size: (40.0, 40.0),
            filter: FilterParams::default(),
            forecast: ForecastParams::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssociationTracker {
    params: TrackerParams,
    next_track_id: u32,
    /// live tracks in birth order
    tracks: Vec<Track>,
    pub n_steps: u32,
}

impl AssociationTracker {
    pub fn new(params: TrackerParams) -> Self {
        AssociationTracker {
            params,
            next_track_id: 0,
            tracks: Vec::new(),
            n_steps: 0,
        }
    }

    pub fn params(&self) -> &TrackerParams {
        &self.params
    }

    /// Greedy association. Returns one flag per observation, true when it
    /// was absorbed by an existing track.
    fn associate(&mut self, observations: &[Observation]) -> Vec<bool> {
        let mut matched_tracks = vec![false; self.tracks.len()];
        let mut matched_observations = vec![false; observations.len()];

        for (obs_idx, obs) in observations.iter().enumerate() {
            let center = obs.center();
            let mut best: Option<(usize, f32)> = None;

            for (track_idx, track) in self.tracks.iter().enumerate() {
                if matched_tracks[track_idx] {
                    continue;
                }
                let dist = track.position().distance(&center);
                let limit = best.map_or(self.params.max_distance, |(_, d)| d);
                if dist < limit {
                    best = Some((track_idx, dist));
                }
            }

            if let Some((track_idx, dist)) = best {
                let track = &mut self.tracks[track_idx];
                log::debug!(
                    "  Matched observation {} -> track_id={} (dist={:.1}px)",
                    obs_idx,
                    track.id(),
                    dist
                );
                track.update(obs);
                matched_tracks[track_idx] = true;
                matched_observations[obs_idx] = true;
            }
        }

        matched_observations
    }

    /// Start a track for every observation left unmatched
    fn create_tracks(&mut self, observations: &[Observation], matched: &[bool]) {
        for (obs_idx, obs) in observations.iter().enumerate() {
            if matched[obs_idx] {
                continue;
            }
            if !obs.center().is_finite() {
                log::warn!("Ignoring non-finite observation {}: {}", obs_idx, obs);
                continue;
            }

            log::debug!(
                "  New track_id={} for observation {} ({})",
                self.next_track_id,
                obs_idx,
                obs
            );
            self.tracks.push(Track::new(
                self.next_track_id,
                obs,
                &self.params.filter,
                &self.params.forecast,
            ));
            self.next_track_id += 1;
        }
    }

    /// Remove tracks that have gone stale
    pub fn remove_stale_tracks(&mut self) {
        let before = self.tracks.len();
        self.tracks.retain(|track| {
            if track.is_stale() {
                log::debug!(
                    "  Dropping track_id={} after {} missed frames",
                    track.id(),
                    track.missed_count()
                );
                false
            } else {
                true
            }
        });

        let removed = before - self.tracks.len();
        if removed > 0 {
            log::debug!(
                "Removed {} stale tracks ({} remaining)",
                removed,
                self.tracks.len()
            );
        }
    }

    /// Main update: consume one frame of observations and return the live tracks
    pub fn update(&mut self, observations: &[Observation]) -> Vec<TrackSnapshot> {
        // Step 1: Predict every track into this frame
        for track in &mut self.tracks {
            track.predict();
        }

        // Step 2: Greedy nearest-neighbour association
        let matched = self.associate(observations);

        // Step 3: Birth
        self.create_tracks(observations, &matched);

        // Step 4: Prune
        self.remove_stale_tracks();

        self.n_steps += 1;
        log::debug!(
            "Frame {}: {} observations, {} matched, {} live tracks",
            self.n_steps,
            observations.len(),
            matched.iter().filter(|m| **m).count(),
            self.tracks.len()
        );

        // Step 5: Snapshots, sized by the nearest observation of this frame
        self.snapshots(observations)
    }

    fn snapshots(&self, observations: &[Observation]) -> Vec<TrackSnapshot> {
        self.tracks
            .iter()
            .map(|track| {
                let size = nearest_size(observations, track.position())
                    .unwrap_or(self.params.fallback_size);
                track.snapshot(size)
            })
            .collect()
    }

    /// Forecast every live track from its post-association state.
    ///
    /// Must run after `update` in the same frame. Output follows track order.
    pub fn forecast(&mut self) -> Vec<TrackForecast> {
        self.tracks
            .par_iter_mut()
            .map(|track| (track.id(), track.forecast()))
            .collect()
    }

    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn get(&self, track_id: u32) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id() == track_id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Total number of tracks ever created
    pub fn tracks_born(&self) -> u32 {
        self.next_track_id
    }

    pub fn frame_count(&self) -> u32 {
        self.n_steps
    }

    /// Drop all tracks. Ids keep counting up.
    pub fn clear(&mut self) {
        self.tracks.clear();
    }
}

/// Flatten snapshots into an Nx9 matrix:
/// `[id, cx, cy, vx, vy, speed, w, h, age]` per row
pub fn snapshots_to_array(snapshots: &[TrackSnapshot]) -> Array2<f32> {
    let data: Vec<f32> = snapshots
        .iter()
        .flat_map(|s| {
            [
                s.id as f32,
                s.cx,
                s.cy,
                s.vx,
                s.vy,
                s.speed,
                s.w,
                s.h,
                s.age as f32,
            ]
        })
        .collect();

    Array2::from_shape_vec((snapshots.len(), 9), data).unwrap_or_else(|_| Array2::zeros((0, 9)))
}
