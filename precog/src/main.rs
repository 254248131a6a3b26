//! Replay observation frames through the safety gate
//!
//! Usage: precog [--config <file.json>] [<frames.jsonl>|-]
//!
//! Frames are read as JSON lines (stdin when the input is `-` or missing),
//! decisions are written as JSON lines to stdout and logs go to stderr.

use precog::{
    Actuator, DecisionWriter, FramePipeline, PrecogConfig, PrecogError, ReplayReader, Result,
    SweepingArm,
};
use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("❌ {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let mut arg_idx = 1;

    let config = if args.len() > arg_idx && args[arg_idx] == "--config" {
        arg_idx += 1;
        let path = args
            .get(arg_idx)
            .ok_or_else(|| PrecogError::config("--config needs a file path"))?;
        arg_idx += 1;
        log::info!("Loading configuration from {}", path);
        PrecogConfig::from_json_file(path)?
    } else {
        log::info!("Using default configuration");
        PrecogConfig::default()
    };

    let mut pipeline = FramePipeline::new(&config)?;
    log::info!(
        "precog {} - lookahead {:.0}ms",
        precog::version(),
        pipeline.lookahead_ms()
    );

    let input: Box<dyn BufRead> = match args.get(arg_idx).map(String::as_str) {
        None | Some("-") => {
            log::info!("Reading frames from stdin");
            Box::new(BufReader::new(io::stdin()))
        }
        Some(path) => {
            log::info!("Reading frames from {}", path);
            Box::new(BufReader::new(File::open(path)?))
        }
    };

    let mut writer = DecisionWriter::new(BufWriter::new(io::stdout().lock()));
    let mut arm = SweepingArm::default();
    let mut malformed = 0u64;

    for item in ReplayReader::new(input) {
        let observations = match item {
            Ok(record) => {
                record.frame_matches(pipeline.stats().frames);
                record.observations
            }
            Err(e) if e.is_recoverable() => {
                // Keep frame pacing: a bad line still counts as a frame
                log::warn!("⚠️  {} - processing as empty frame", e);
                malformed += 1;
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let decision = pipeline.process(&observations);
        let was_frozen = arm.is_frozen();
        arm.apply(&decision);
        if arm.is_frozen() != was_frozen {
            log::info!("[frame {}] {}", decision.frame, decision.status_line());
        }
        writer.write(&decision)?;
    }
    writer.flush()?;

    let stats = pipeline.stats();
    log::info!(
        "Done: {} frames, {} danger frames, {} budget overruns, {} tracks born, {} malformed lines",
        stats.frames,
        stats.danger_frames,
        stats.budget_overruns,
        stats.tracks_born,
        malformed
    );
    Ok(())
}
