use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Command;

const SCENARIO: &str = r#"{
    "name": "drummer_at_haijun_park",
    "steps": [
        {"tick": 0, "step": "viewer", "position": [0.0, 1.4, 0.0], "pitch": -1.45},
        {"tick": 0, "step": "place", "kind": "Drummer"},
        {"tick": 1, "step": "planes_added", "events": [
            {"id": 1, "kind": "horizontal_plane", "extent": [1.0, 1.0]}
        ]},
        {"tick": 1, "step": "place", "kind": "Drummer"},
        {"tick": 3, "step": "resolve", "object_index": 0, "placemark": {
            "name": "Haijun Park", "locality": "Qingdao", "region": "Shandong", "country": "China"
        }},
        {"tick": 4, "step": "long_press", "x": 585.0, "y": 1266.0, "choice": "comment"}
    ]
}"#;

const CONFIG: &str = r#"
[session]
tracking_queue_capacity = 16

[session.device_location]
latitude = 36.0649
longitude = 120.3804
"#;

fn run(dir: &Path, extra: &[&str]) -> (std::process::ExitStatus, Value) {
    let scenario = dir.join("scenario.json");
    let config = dir.join("waymark.toml");
    fs::write(&scenario, SCENARIO).expect("write scenario");
    fs::write(&config, CONFIG).expect("write config");

    let output = Command::new(env!("CARGO_BIN_EXE_waymark"))
        .arg("--scenario")
        .arg(&scenario)
        .arg("--config")
        .arg(&config)
        .args(extra)
        .output()
        .expect("spawn waymark");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let summary = if output.status.success() {
        serde_json::from_str(&stdout).expect("summary is json")
    } else {
        Value::Null
    };
    (output.status, summary)
}

#[test]
fn scenario_places_labels_and_reports() {
    let dir = tempfile::tempdir().expect("tempdir");
    let events_path = dir.path().join("out").join("events.jsonl");
    let metrics_path = dir.path().join("out").join("metrics.json");
    let (status, summary) = run(
        dir.path(),
        &[
            "--event-log",
            events_path.to_str().unwrap(),
            "--metrics",
            metrics_path.to_str().unwrap(),
        ],
    );
    assert!(status.success(), "waymark exited with {status}");

    assert_eq!(summary["scenario"], "drummer_at_haijun_park");
    assert_eq!(summary["ticks"], 5);
    assert_eq!(summary["step_failures"], 0);
    assert_eq!(summary["geocode_requests"], 1);

    let anchors = summary["scene"]["anchors"].as_array().unwrap();
    assert_eq!(anchors.len(), 1);
    let object = &anchors[0]["objects"][0];
    assert_eq!(object["kind"], "Drummer");
    assert_eq!(object["name"], "Haijun Park");
    let label = &object["label"];
    assert_eq!(label["title"][0], "Haijun Park");
    assert_eq!(label["detail"][0], "Qingdao, Shandong, China");
    assert_eq!(label["billboarded"], true);
    let width = label["background_size"][0].as_f64().unwrap();
    assert!(width > 0.1);
    let top_right = label["background_corners"][2][0].as_f64().unwrap();
    assert!((top_right - width / 2.0).abs() < 1e-4);

    let comment = &summary["comment_requests"][0];
    assert_eq!(comment["place_name"], "Haijun Park");
    assert_eq!(comment["initial_comment"], "Beautiful sea view !");

    let events: Vec<Value> = fs::read_to_string(&events_path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let kinds: Vec<&str> = events.iter().map(|e| e["event"].as_str().unwrap()).collect();
    assert_eq!(
        kinds,
        vec![
            "surface_availability",
            "placement_rejected",
            "surface_availability",
            "placement_completed",
            "geocode_requested",
            "label_attached",
            "menu_opened",
            "comment_requested",
        ]
    );
    assert_eq!(events[1]["reason"], "surface_unavailable");
    assert_eq!(events[5]["tick"], 3);

    let metrics: Value = serde_json::from_str(&fs::read_to_string(&metrics_path).unwrap()).unwrap();
    assert_eq!(metrics["result"], "pass");
    assert_eq!(metrics["placements"]["completed"], 1);
    assert_eq!(metrics["labels"]["attached"], 1);
    assert_eq!(metrics["interaction"]["comments_requested"], 1);
}

#[test]
fn max_ticks_stops_before_the_label() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (status, summary) = run(dir.path(), &["--max-ticks", "3"]);
    assert!(status.success());
    assert_eq!(summary["ticks"], 3);
    assert!(summary["scene"]["anchors"][0]["objects"][0]["label"].is_null());
}

#[test]
fn write_config_saves_effective_settings() {
    let dir = tempfile::tempdir().expect("tempdir");
    let saved = dir.path().join("saved.toml");
    let (status, _) = run(dir.path(), &["--write-config", saved.to_str().unwrap()]);
    assert!(status.success());

    let contents = fs::read_to_string(&saved).unwrap();
    assert!(contents.contains("tracking_queue_capacity = 16"));
    assert!(contents.contains("comment_limit = 3"));
}

#[test]
fn missing_scenario_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let status = Command::new(env!("CARGO_BIN_EXE_waymark"))
        .arg("--scenario")
        .arg(dir.path().join("absent.json"))
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .status()
        .expect("spawn waymark");
    assert!(!status.success());
}
