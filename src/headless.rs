use crate::config::WaymarkConfig;
use crate::scenario::{ScenarioAction, ScenarioPlayer};
use anyhow::{Context, Result};
use glam::{Vec2, Vec3};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};
use waymark_camera::Viewer;
use waymark_scene::{
    ArSession, CommentRequest, HorizontalPlaneRaycaster, PlacementService, SceneSnapshot,
    TimedEvent,
};
use waymark_testkit::{
    JsonlSink, ManualGeocoder, MetricsSink, RecordingComposer, RunResult, SessionMetricsBuilder,
    SessionMetricsReport,
};
use waymark_tracking::TrackingBatch;

pub struct HeadlessConfig {
    pub scenario: PathBuf,
    pub event_log: Option<PathBuf>,
    pub metrics: Option<PathBuf>,
    pub max_ticks: Option<u64>,
}

/// Final state of a scripted run, printed as JSON by the binary.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub scenario: String,
    pub ticks: u64,
    pub events: usize,
    pub step_failures: usize,
    pub dropped_tracking_batches: usize,
    pub geocode_requests: usize,
    pub comment_requests: Vec<CommentRequest>,
    pub scene: SceneSnapshot,
}

pub struct RunOutcome {
    pub summary: RunSummary,
    pub events: Vec<TimedEvent>,
    pub report: SessionMetricsReport,
}

pub fn run(config: &WaymarkConfig, cfg: &HeadlessConfig) -> Result<RunOutcome> {
    let player = ScenarioPlayer::from_path(&cfg.scenario)?;
    let mut sink = match &cfg.event_log {
        Some(path) => Some(
            JsonlSink::create(path)
                .with_context(|| format!("failed to create event log {}", path.display()))?,
        ),
        None => None,
    };

    let outcome = run_player(config, player, cfg.max_ticks, sink.as_mut())?;

    if let Some(sink) = sink.as_mut() {
        sink.flush()?;
    }
    if let Some(path) = &cfg.metrics {
        MetricsSink::create(path)?
            .write(&outcome.report)
            .with_context(|| format!("failed to write metrics {}", path.display()))?;
    }
    Ok(outcome)
}

/// Tick a fresh session through `player`.
///
/// Runs until the script is exhausted and every queued placement has been
/// attempted, or until `max_ticks` frames when given.
pub fn run_player(
    config: &WaymarkConfig,
    mut player: ScenarioPlayer,
    max_ticks: Option<u64>,
    mut sink: Option<&mut JsonlSink>,
) -> Result<RunOutcome> {
    let started = Instant::now();
    let geocoder = ManualGeocoder::default();
    let composer = RecordingComposer::default();
    let placement = config.configure(PlacementService::new(
        Box::new(config.catalog()?),
        Box::new(HorizontalPlaneRaycaster),
        Box::new(geocoder.clone()),
    ))?;
    let mut session = ArSession::with_queue_capacity(
        placement,
        config.session.viewport,
        config.session.tracking_queue_capacity,
    )
    .with_composer(Box::new(composer.clone()));
    let tracking = session.tracking_sender();

    info!(scenario = player.name(), last_tick = player.last_tick().0, "scenario started");

    let mut viewer = Viewer::default();
    let mut events = Vec::new();
    let mut step_failures = 0;
    loop {
        let frame = session.frame();
        if max_ticks.is_some_and(|max| frame.0 >= max) {
            if !player.is_finished() {
                warn!(tick = frame.0, "max ticks reached before the scenario finished");
            }
            break;
        }
        if max_ticks.is_none() && player.is_finished() && session.pending_placements() == 0 {
            break;
        }

        for action in player.drain_ready(frame) {
            debug!(tick = frame.0, ?action, "scenario step");
            match action {
                ScenarioAction::PlanesAdded { events } => {
                    if let Err(err) = tracking.post(TrackingBatch::Added(events)) {
                        warn!(tick = frame.0, error = %err, "tracking batch rejected");
                    }
                }
                ScenarioAction::PlanesUpdated { events } => {
                    if let Err(err) = tracking.post(TrackingBatch::Updated(events)) {
                        warn!(tick = frame.0, error = %err, "tracking batch rejected");
                    }
                }
                ScenarioAction::Place { kind } => session.request_placement(kind),
                ScenarioAction::Resolve {
                    object_index,
                    placemark,
                } => {
                    if !geocoder.answer(object_index, placemark) {
                        warn!(tick = frame.0, object_index, "no geocoding request to answer");
                        step_failures += 1;
                    }
                }
                ScenarioAction::LongPress { x, y, choice } => {
                    match session.long_press(Vec2::new(x, y)) {
                        Some(menu) => {
                            if session.choose(&menu, choice).is_err() {
                                step_failures += 1;
                            }
                        }
                        None => debug!(tick = frame.0, x, y, "long press hit nothing"),
                    }
                }
                ScenarioAction::Viewer {
                    position,
                    yaw,
                    pitch,
                } => {
                    viewer = Viewer::new(Vec3::from_array(position)).with_orientation(yaw, pitch);
                }
            }
        }

        session.tick(&viewer);

        let fresh = session.drain_events();
        if let Some(sink) = sink.as_deref_mut() {
            sink.write_events(&fresh)?;
        }
        events.extend(fresh);
    }

    let ticks = session.frame().0;
    for line in session.graph().describe() {
        debug!("{line}");
    }
    let result = if step_failures == 0 {
        RunResult::Pass
    } else {
        RunResult::Fail
    };
    let report = SessionMetricsBuilder::new(player.name())
        .observe_all(&events)
        .ticks(ticks)
        .dropped_batches(session.dropped_tracking_batches())
        .result(result)
        .duration_seconds(started.elapsed().as_secs_f64())
        .build();

    info!(
        scenario = player.name(),
        ticks,
        events = events.len(),
        anchors = session.graph().anchors().count(),
        "scenario finished"
    );

    Ok(RunOutcome {
        summary: RunSummary {
            scenario: player.name().to_string(),
            ticks,
            events: events.len(),
            step_failures,
            dropped_tracking_batches: session.dropped_tracking_batches(),
            geocode_requests: geocoder.received(),
            comment_requests: composer.requests(),
            scene: session.snapshot(),
        },
        events,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_core::GeoCoordinate;
    use waymark_scene::SessionEvent;

    fn config() -> WaymarkConfig {
        let mut config = WaymarkConfig::default();
        config.session.device_location = Some(GeoCoordinate::new(36.06, 120.38));
        config
    }

    const LABELLED: &str = r#"{
        "name": "labelled",
        "steps": [
            {"tick": 0, "step": "viewer", "position": [0.0, 1.4, 0.0], "pitch": -1.45},
            {"tick": 0, "step": "place", "kind": "Drummer"},
            {"tick": 1, "step": "planes_added", "events": [
                {"id": 1, "kind": "horizontal_plane", "extent": [1.0, 1.0]}
            ]},
            {"tick": 1, "step": "place", "kind": "Drummer"},
            {"tick": 2, "step": "resolve", "object_index": 0, "placemark": {
                "name": "Haijun Park", "locality": "Qingdao", "country": "China"
            }}
        ]
    }"#;

    #[test]
    fn labelled_drummer_run() {
        let player = ScenarioPlayer::from_json_str(LABELLED).unwrap();
        let outcome = run_player(&config(), player, None, None).unwrap();

        let summary = &outcome.summary;
        assert_eq!(summary.ticks, 3);
        assert_eq!(summary.step_failures, 0);
        assert_eq!(summary.geocode_requests, 1);
        assert_eq!(summary.scene.anchors.len(), 1);
        let object = &summary.scene.anchors[0].objects[0];
        assert_eq!(object.kind, "Drummer");
        assert_eq!(object.name, "Haijun Park");
        let label = object.label.as_ref().unwrap();
        assert_eq!(label.detail, vec!["Qingdao, China"]);

        assert_eq!(outcome.report.placements.completed, 1);
        assert_eq!(
            outcome.report.placements.rejected_by_reason["surface_unavailable"],
            1
        );
        assert_eq!(outcome.report.labels.attached, 1);
        assert_eq!(outcome.report.result, RunResult::Pass);
    }

    #[test]
    fn long_press_deletes_and_comments() {
        let json = r#"{
            "steps": [
                {"tick": 0, "step": "viewer", "position": [0.0, 1.4, 0.0], "pitch": -1.45},
                {"tick": 0, "step": "planes_added", "events": [
                    {"id": 1, "kind": "horizontal_plane", "extent": [4.0, 4.0]}
                ]},
                {"tick": 0, "step": "place", "kind": "RocketToy"},
                {"tick": 1, "step": "resolve", "object_index": 0, "placemark": {"name": "Haijun Park"}},
                {"tick": 2, "step": "long_press", "x": 585.0, "y": 1266.0, "choice": "comment"},
                {"tick": 3, "step": "long_press", "x": 585.0, "y": 1266.0, "choice": "delete"}
            ]
        }"#;
        let player = ScenarioPlayer::from_json_str(json).unwrap();
        let outcome = run_player(&config(), player, None, None).unwrap();

        let comments = &outcome.summary.comment_requests;
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].place_name, "Haijun Park");
        assert_eq!(comments[0].initial_comment, "Beautiful sea view !");

        assert!(outcome.summary.scene.anchors.is_empty());
        assert!(outcome.events.iter().any(|event| matches!(
            event.event,
            SessionEvent::Deleted { removed: 7, .. }
        )));
    }

    #[test]
    fn unanswerable_resolve_counts_as_failure() {
        let json = r#"{"steps": [{"tick": 0, "step": "resolve", "object_index": 3}]}"#;
        let player = ScenarioPlayer::from_json_str(json).unwrap();
        let outcome = run_player(&WaymarkConfig::default(), player, None, None).unwrap();
        assert_eq!(outcome.summary.step_failures, 1);
        assert_eq!(outcome.report.result, RunResult::Fail);
    }

    #[test]
    fn max_ticks_bounds_the_run() {
        let player = ScenarioPlayer::from_json_str(LABELLED).unwrap();
        let outcome = run_player(&config(), player, Some(2), None).unwrap();
        assert_eq!(outcome.summary.ticks, 2);
        assert!(outcome.summary.scene.anchors[0].objects[0].label.is_none());
    }

    #[test]
    fn event_log_receives_every_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let mut sink = JsonlSink::create(&path).unwrap();
        let player = ScenarioPlayer::from_json_str(LABELLED).unwrap();
        let outcome = run_player(&config(), player, None, Some(&mut sink)).unwrap();
        sink.flush().unwrap();

        let lines = waymark_testkit::read_jsonl(&path).unwrap();
        assert_eq!(lines.len(), outcome.events.len());
        assert_eq!(lines[0]["event"], "surface_availability");
        assert_eq!(lines[0]["available"], false);
    }
}
