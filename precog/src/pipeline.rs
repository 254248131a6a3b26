/// Per-frame safety pipeline: track, forecast, then check the protected zone
use crate::config::PrecogConfig;
use crate::error::Result;
use crate::safety::SafetyMonitor;
use crate::types::{FrameDecision, FrameTiming};
use centroidtrack::{AssociationTracker, Observation};
use std::time::Instant;

/// Running counters over every processed frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PipelineStats {
    pub frames: u64,
    pub danger_frames: u64,
    pub budget_overruns: u64,
    pub tracks_born: u32,
}

pub struct FramePipeline {
    tracker: AssociationTracker,
    monitor: SafetyMonitor,
    horizon: usize,
    frame_budget_ms: f32,
    stats: PipelineStats,
}

impl FramePipeline {
    /// Build a pipeline from a configuration, rejecting invalid settings
    pub fn new(config: &PrecogConfig) -> Result<Self> {
        config.validate()?;

        log::info!(
            "Pipeline ready: zone {} r={:.0}, horizon {} frames, budget {:.1}ms",
            config.zone.center,
            config.zone.radius,
            config.forecast.horizon,
            config.frame_budget_ms
        );

        Ok(Self {
            tracker: AssociationTracker::new(config.tracker_params()),
            monitor: SafetyMonitor::new(config.zone),
            horizon: config.forecast.horizon,
            frame_budget_ms: config.frame_budget_ms,
            stats: PipelineStats::default(),
        })
    }

    /// Process one frame of observations.
    ///
    /// The decision is always returned, also when the frame ran over budget.
    pub fn process(&mut self, observations: &[Observation]) -> FrameDecision {
        let start_total = Instant::now();

        // Stage 1: Predict, associate, birth, prune
        let start = Instant::now();
        let tracks = self.tracker.update(observations);
        let track_ms = start.elapsed().as_secs_f32() * 1000.0;

        // Stage 2: Forecast every live track
        let start = Instant::now();
        let forecasts = self.tracker.forecast();
        let forecast_ms = start.elapsed().as_secs_f32() * 1000.0;

        // Stage 3: Zone check
        let start = Instant::now();
        let events = self.monitor.check_all(&forecasts);
        let safety_ms = start.elapsed().as_secs_f32() * 1000.0;

        let total_ms = start_total.elapsed().as_secs_f32() * 1000.0;
        let timing = FrameTiming {
            track_ms,
            forecast_ms,
            safety_ms,
            total_ms,
        };

        let frame = self.stats.frames;
        self.stats.frames += 1;
        self.stats.tracks_born = self.tracker.tracks_born();

        let danger = !events.is_empty();
        if danger {
            self.stats.danger_frames += 1;
        }

        if total_ms > self.frame_budget_ms {
            self.stats.budget_overruns += 1;
            log::warn!(
                "Frame {} over budget: {:.1}ms > {:.1}ms (track {:.1}ms, forecast {:.1}ms, safety {:.1}ms)",
                frame, total_ms, self.frame_budget_ms, track_ms, forecast_ms, safety_ms
            );
        } else {
            log::debug!(
                "Frame {} timing - Track: {:.2}ms, Forecast: {:.2}ms, Safety: {:.2}ms, Total: {:.2}ms",
                frame, track_ms, forecast_ms, safety_ms, total_ms
            );
        }

        FrameDecision {
            frame,
            tracks,
            events,
            danger,
            timing,
        }
    }

    /// Forecast reach in milliseconds, taking `frame_budget_ms` as the frame
    /// period: `horizon * frame_budget_ms`. Only wall-clock accurate when
    /// frames arrive once per budget.
    pub fn lookahead_ms(&self) -> f32 {
        self.horizon as f32 * self.frame_budget_ms
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn budget_overruns(&self) -> u64 {
        self.stats.budget_overruns
    }

    pub fn tracker(&self) -> &AssociationTracker {
        &self.tracker
    }

    pub fn monitor(&self) -> &SafetyMonitor {
        &self.monitor
    }
}
