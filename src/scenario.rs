use anyhow::{Context, Result};
use serde::Deserialize;
use std::{collections::VecDeque, fs, path::Path};
use waymark_core::FrameTick;
use waymark_scene::{MenuChoice, Placemark};
use waymark_tracking::TrackingEvent;

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    #[serde(default)]
    name: Option<String>,
    steps: Vec<ScenarioStepDef>,
}

#[derive(Debug, Clone, Deserialize)]
struct ScenarioStepDef {
    tick: u64,
    #[serde(flatten)]
    action: ScenarioAction,
}

/// One scripted thing the device or the user does.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ScenarioAction {
    /// Tracking service reports new anchors.
    PlanesAdded { events: Vec<TrackingEvent> },
    /// Tracking service refines known anchors.
    PlanesUpdated { events: Vec<TrackingEvent> },
    /// User taps a catalog entry.
    Place { kind: String },
    /// Geocoder answers its `object_index`-th request (placement order).
    Resolve {
        object_index: usize,
        #[serde(default)]
        placemark: Placemark,
    },
    /// User long-presses a screen point and picks a menu entry.
    LongPress { x: f32, y: f32, choice: MenuChoice },
    /// Device pose for the following frames.
    Viewer {
        position: [f32; 3],
        #[serde(default)]
        yaw: f32,
        #[serde(default)]
        pitch: f32,
    },
}

#[derive(Debug, Clone)]
struct ScenarioStep {
    tick: FrameTick,
    action: ScenarioAction,
}

/// Deterministic scenario runner.
///
/// Scenarios are a list of `{tick, step, ...}` entries, executed in file order.
#[derive(Debug)]
pub struct ScenarioPlayer {
    name: String,
    pending: VecDeque<ScenarioStep>,
    last_tick: FrameTick,
}

impl ScenarioPlayer {
    /// Load a scenario from a JSON file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        let mut player = Self::from_json_str(&contents)
            .with_context(|| format!("invalid scenario {}", path.display()))?;
        if player.name.is_empty() {
            player.name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        Ok(player)
    }

    /// Load a scenario from an in-memory JSON string.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let file: ScenarioFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("scenario contains no steps");
        }

        let mut pending = VecDeque::with_capacity(file.steps.len());
        let mut last_tick: Option<u64> = None;
        for step in file.steps {
            if let ScenarioAction::Place { kind } = &step.action {
                if kind.trim().is_empty() {
                    anyhow::bail!("scenario places an empty object kind");
                }
            }

            if let Some(prev) = last_tick {
                if step.tick < prev {
                    anyhow::bail!("scenario steps must be sorted by tick");
                }
            }
            last_tick = Some(step.tick);

            pending.push_back(ScenarioStep {
                tick: FrameTick(step.tick),
                action: step.action,
            });
        }

        Ok(Self {
            name: file.name.unwrap_or_default(),
            pending,
            last_tick: FrameTick(last_tick.unwrap_or_default()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tick of the final step.
    pub fn last_tick(&self) -> FrameTick {
        self.last_tick
    }

    /// Drain and return all actions scheduled for ticks `<= tick`.
    pub fn drain_ready(&mut self, tick: FrameTick) -> Vec<ScenarioAction> {
        let mut actions = Vec::new();
        while self.pending.front().is_some_and(|step| step.tick <= tick) {
            if let Some(step) = self.pending.pop_front() {
                actions.push(step.action);
            }
        }
        actions
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }
}
