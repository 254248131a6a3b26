//! Synthetic scenario: noisy detections of three objects around a protected zone
//!
//! Usage: cargo run --example synthetic_scenario [frames] [noise_px]

use precog::{Actuator, FramePipeline, Observation, PrecogConfig, SweepingArm};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::env;

struct Mover {
    start: (f32, f32),
    velocity: (f32, f32),
    size: (f32, f32),
    /// Frame range in which the object is visible
    visible: std::ops::Range<usize>,
}

impl Mover {
    fn observe(&self, frame: usize, rng: &mut StdRng, noise: f32) -> Option<Observation> {
        if !self.visible.contains(&frame) {
            return None;
        }
        let t = (frame - self.visible.start) as f32;
        let jitter = |rng: &mut StdRng| if noise > 0.0 { rng.random_range(-noise..noise) } else { 0.0 };
        Some(Observation::new(
            self.start.0 + self.velocity.0 * t + jitter(rng),
            self.start.1 + self.velocity.1 * t + jitter(rng),
            self.size.0,
            self.size.1,
        ))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let n_frames: usize = args.get(1).map(|s| s.parse()).transpose()?.unwrap_or(120);
    let noise: f32 = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(2.0);

    let movers = [
        // Walks straight at the zone from the left
        Mover {
            start: (0.0, 250.0),
            velocity: (4.0, -0.2),
            size: (40.0, 80.0),
            visible: 0..70,
        },
        // Crosses the top of the frame, never near the zone
        Mover {
            start: (620.0, 30.0),
            velocity: (-5.0, 0.0),
            size: (60.0, 30.0),
            visible: 10..110,
        },
        // Appears late and drifts away from the zone
        Mover {
            start: (420.0, 380.0),
            velocity: (3.0, 1.5),
            size: (30.0, 30.0),
            visible: 60..120,
        },
    ];

    let config = PrecogConfig::default();
    let mut pipeline = FramePipeline::new(&config)?;
    let mut arm = SweepingArm::default();
    let mut rng = StdRng::seed_from_u64(2024);

    log::info!(
        "🎯 {} frames, ±{:.1}px noise, lookahead {:.1}s",
        n_frames,
        noise,
        pipeline.lookahead_ms() / 1000.0
    );

    let mut was_danger = false;
    for frame in 0..n_frames {
        let observations: Vec<Observation> = movers
            .iter()
            .filter_map(|m| m.observe(frame, &mut rng, noise))
            .collect();

        let decision = pipeline.process(&observations);
        arm.apply(&decision);

        if decision.danger != was_danger {
            log::info!("{} (arm at x={:.0})", decision, arm.x());
            if let Some(event) = decision.most_severe() {
                log::info!(
                    "   worst: T{} at ({:.0}, {:.0}) in {} frames, severity {:.2}",
                    event.track_id,
                    event.impact_point.x,
                    event.impact_point.y,
                    event.impact_frame,
                    event.severity
                );
            }
            was_danger = decision.danger;
        }
    }

    let stats = pipeline.stats();
    log::info!(
        "✓ {} frames, {} blocked, {} budget overruns, {} tracks born",
        stats.frames,
        stats.danger_frames,
        stats.budget_overruns,
        stats.tracks_born
    );
    Ok(())
}
