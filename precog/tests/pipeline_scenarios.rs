//! End-to-end scenarios through the frame pipeline, replay and actuator gate

use approx::assert_abs_diff_eq;
use precog::{
    Actuator, DecisionWriter, FrameDecision, FramePipeline, Observation, PrecogConfig,
    PrecogError, ReplayReader, SweepingArm,
};
use std::io::Cursor;

fn run(config: &PrecogConfig, frames: &[Vec<Observation>]) -> Vec<FrameDecision> {
    let mut pipeline = FramePipeline::new(config).unwrap();
    frames.iter().map(|obs| pipeline.process(obs)).collect()
}

fn single_object(n: usize, position: impl Fn(usize) -> (f32, f32)) -> Vec<Vec<Observation>> {
    (0..n)
        .map(|k| {
            let (x, y) = position(k);
            vec![Observation::new(x, y, 40.0, 40.0)]
        })
        .collect()
}

#[test]
fn approaching_object_is_blocked_before_entry() {
    // Zone boundary is at x = 200 on this line
    let frames = single_object(20, |k| (10.0 * k as f32, 240.0));
    let decisions = run(&PrecogConfig::default(), &frames);

    assert!(decisions[0].is_safe(), "no velocity estimate on the first frame");
    assert!(decisions[5].danger, "danger must be raised far from the zone");

    let impacts: Vec<usize> = decisions[15..]
        .iter()
        .map(|d| d.soonest().unwrap().impact_frame)
        .collect();
    assert_eq!(impacts, vec![6, 5, 4, 3, 2]);

    for d in &decisions[15..] {
        let event = d.soonest().unwrap();
        assert_eq!(event.track_id, 0);
        assert_abs_diff_eq!(event.impact_point.y, 240.0, epsilon = 1e-2);
        assert!(event.severity > 0.0 && event.severity <= 1.0);
        assert_eq!(d.status_line(), format!(
            "PREDICTED COLLISION — Track T0 in {} frames | ACTION BLOCKED",
            event.impact_frame
        ));
    }
}

#[test]
fn receding_object_stays_safe() {
    let frames = single_object(30, |k| (100.0 - 5.0 * k as f32, 240.0));
    let decisions = run(&PrecogConfig::default(), &frames);

    assert!(decisions.iter().all(FrameDecision::is_safe));
    let last = decisions.last().unwrap();
    assert_eq!(last.tracks.len(), 1);
    assert_abs_diff_eq!(last.tracks[0].vx, -5.0, epsilon = 1e-2);
    assert_abs_diff_eq!(last.tracks[0].vy, 0.0, epsilon = 1e-2);
}

#[test]
fn object_passing_outside_zone_stays_safe() {
    let frames = single_object(40, |k| (8.0 * k as f32, 20.0));
    let decisions = run(&PrecogConfig::default(), &frames);
    assert!(decisions.iter().all(|d| d.events.is_empty() && !d.danger));
}

#[test]
fn lost_object_is_pruned_after_ten_empty_frames() {
    let mut frames = single_object(5, |k| (20.0 + 4.0 * k as f32, 30.0));
    frames.extend(std::iter::repeat(Vec::new()).take(12));
    let decisions = run(&PrecogConfig::default(), &frames);

    // Last observation in frame 4, empty frames 5..=16
    assert_eq!(decisions[13].tracks.len(), 1);
    assert_eq!(decisions[14].tracks.len(), 0);
    assert!(decisions[14..].iter().all(|d| d.tracks.is_empty()));
}

#[test]
fn two_objects_get_distinct_ids_in_input_order() {
    let decisions = run(
        &PrecogConfig::default(),
        &[vec![
            Observation::new(50.0, 50.0, 20.0, 30.0),
            Observation::new(400.0, 50.0, 60.0, 10.0),
        ]],
    );
    let tracks = &decisions[0].tracks;
    assert_eq!(tracks.len(), 2);
    assert_eq!((tracks[0].id, tracks[1].id), (0, 1));
    assert_eq!((tracks[0].w, tracks[0].h), (20.0, 30.0));
    assert_eq!((tracks[1].w, tracks[1].h), (60.0, 10.0));
}

#[test]
fn events_are_ranked_soonest_first() {
    // One object parked inside the zone, one approaching from the left
    let frames: Vec<Vec<Observation>> = (0..16)
        .map(|k| {
            vec![
                Observation::new(10.0 * k as f32, 240.0, 40.0, 40.0),
                Observation::new(330.0, 250.0, 40.0, 40.0),
            ]
        })
        .collect();
    let decisions = run(&PrecogConfig::default(), &frames);
    let last = decisions.last().unwrap();

    assert_eq!(last.events.len(), 2);
    assert_eq!(last.events[0].track_id, 1);
    assert_eq!(last.events[0].impact_frame, 1);
    assert!(last
        .events
        .windows(2)
        .all(|w| w[0].impact_frame <= w[1].impact_frame));
    assert_eq!(last.most_severe().unwrap().track_id, 1);
}

#[test]
fn invalid_config_is_rejected() {
    let config = PrecogConfig::from_json_str(r#"{"zone": {"center": {"x": 0, "y": 0}, "radius": 0}}"#)
        .unwrap();
    assert!(matches!(
        FramePipeline::new(&config),
        Err(PrecogError::ConfigError(_))
    ));
}

#[test]
fn config_file_overrides_defaults() {
    let path = std::env::temp_dir().join(format!("precog-config-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{"zone": {"center": {"x": 0.0, "y": 0.0}, "radius": 50.0}, "forecast": {"horizon": 5}}"#,
    )
    .unwrap();
    let config = PrecogConfig::from_json_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.forecast.horizon, 5);
    assert_eq!(config.tracker.max_distance, 80.0);

    // Inside the moved zone, and far from the default one
    let decisions = run(&config, &[vec![Observation::new(10.0, 10.0, 40.0, 40.0)]]);
    assert!(decisions[0].danger);
}

#[test]
fn replay_keeps_frame_pacing_on_malformed_lines() {
    let input = r#"{"observations": [{"cx": 0, "cy": 240, "w": 40, "h": 40}]}
{"observations": [{"cx": 10, "cy": 240, "w": 40, "h": 40}]}

{"observations": [{"cx": 20
{"frame": 3, "observations": [{"cx": 30, "cy": 240, "w": 40, "h": 40}]}
"#;
    let mut pipeline = FramePipeline::new(&PrecogConfig::default()).unwrap();
    let mut writer = DecisionWriter::new(Vec::new());
    let mut malformed = 0;

    for item in ReplayReader::new(Cursor::new(input)) {
        let observations = match item {
            Ok(record) => record.observations,
            Err(e) => {
                assert!(e.is_recoverable());
                malformed += 1;
                Vec::new()
            }
        };
        writer.write(&pipeline.process(&observations)).unwrap();
    }

    assert_eq!(malformed, 1);
    assert_eq!(pipeline.stats().frames, 4);
    assert_eq!(writer.written(), 4);

    let out = String::from_utf8(writer.into_inner()).unwrap();
    let frames: Vec<u64> = out
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["frame"].as_u64().unwrap())
        .collect();
    assert_eq!(frames, vec![0, 1, 2, 3]);

    // Track survived the empty frame and matched again
    assert_eq!(pipeline.stats().tracks_born, 1);
}

#[test]
fn arm_freezes_while_danger_is_predicted() {
    let mut pipeline = FramePipeline::new(&PrecogConfig::default()).unwrap();
    let mut arm = SweepingArm::default();

    // Nothing in view: the arm sweeps
    for _ in 0..5 {
        arm.apply(&pipeline.process(&[]));
    }
    assert!(!arm.is_frozen());
    let moved_to = arm.x();
    assert!(moved_to > 20.0);

    // Object sitting in the zone: the arm holds its position
    for _ in 0..5 {
        arm.apply(&pipeline.process(&[Observation::new(300.0, 230.0, 40.0, 40.0)]));
    }
    assert!(arm.is_frozen());
    assert_eq!(arm.x(), moved_to);
    assert_eq!(pipeline.stats().danger_frames, 5);
}
