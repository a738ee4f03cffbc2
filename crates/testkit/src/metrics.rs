//! Run metrics for headless sessions, exported as JSON for CI artifacts.
//!
//! Counters are folded from the session's event stream, so a report can be
//! rebuilt from an event log alone.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use waymark_scene::{SessionEvent, TimedEvent};

/// Top-level report for one scripted session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMetricsReport {
    /// Scenario identifier
    pub scenario: String,

    /// Timestamp when the report was built (ISO 8601)
    pub timestamp: String,

    /// Overall run result
    pub result: RunResult,

    /// Frames executed
    pub ticks: u64,

    /// Placement outcomes
    pub placements: PlacementMetrics,

    /// Label attachment outcomes
    pub labels: LabelMetrics,

    /// Long-press menu outcomes
    pub interaction: InteractionMetrics,

    /// Tracking queue behaviour
    pub tracking: TrackingMetrics,

    /// Wall-clock duration of the run (seconds)
    pub duration_seconds: f64,
}

/// Overall run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunResult {
    /// Scenario ran to completion
    Pass,
    /// Scenario aborted
    Fail,
}

/// Placement attempts and their outcomes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementMetrics {
    /// Objects anchored
    pub completed: usize,

    /// Attempts rejected
    pub rejected: usize,

    /// Rejections keyed by reason
    pub rejected_by_reason: BTreeMap<String, usize>,

    /// Reverse-geocoding requests sent
    pub geocode_requests: usize,
}

/// Label attachment counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMetrics {
    /// Labels attached
    pub attached: usize,

    /// Attachments that replaced an existing label
    pub replaced: usize,

    /// Placemarks dropped because the object was gone
    pub discarded: usize,
}

/// Menu interaction counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionMetrics {
    /// Menus opened by long presses
    pub menus_opened: usize,

    /// Comment editor hand-offs
    pub comments_requested: usize,

    /// Delete commands run
    pub deletions: usize,

    /// Scene nodes removed by deletions
    pub nodes_removed: usize,

    /// Menus dismissed
    pub cancelled: usize,
}

/// Tracking queue counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingMetrics {
    /// Surface availability notifications observed
    pub availability_changes: usize,

    /// Batches rejected because the queue was full
    pub dropped_batches: usize,
}

/// Builder for constructing session reports
pub struct SessionMetricsBuilder {
    report: SessionMetricsReport,
}

impl SessionMetricsBuilder {
    /// Create a new builder for `scenario`
    pub fn new(scenario: impl Into<String>) -> Self {
        Self {
            report: SessionMetricsReport {
                scenario: scenario.into(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                result: RunResult::Pass,
                ticks: 0,
                placements: PlacementMetrics::default(),
                labels: LabelMetrics::default(),
                interaction: InteractionMetrics::default(),
                tracking: TrackingMetrics::default(),
                duration_seconds: 0.0,
            },
        }
    }

    /// Fold one session event into the counters
    pub fn observe(&mut self, event: &TimedEvent) -> &mut Self {
        let report = &mut self.report;
        match &event.event {
            SessionEvent::SurfaceAvailability { .. } => report.tracking.availability_changes += 1,
            SessionEvent::PlacementCompleted { .. } => report.placements.completed += 1,
            SessionEvent::PlacementRejected { reason, .. } => {
                report.placements.rejected += 1;
                *report
                    .placements
                    .rejected_by_reason
                    .entry(reason.clone())
                    .or_default() += 1;
            }
            SessionEvent::GeocodeRequested { .. } => report.placements.geocode_requests += 1,
            SessionEvent::LabelAttached { replaced, .. } => {
                report.labels.attached += 1;
                if replaced.is_some() {
                    report.labels.replaced += 1;
                }
            }
            SessionEvent::LabelDiscarded { .. } => report.labels.discarded += 1,
            SessionEvent::MenuOpened { .. } => report.interaction.menus_opened += 1,
            SessionEvent::CommentRequested { .. } => report.interaction.comments_requested += 1,
            SessionEvent::Deleted { removed, .. } => {
                report.interaction.deletions += 1;
                report.interaction.nodes_removed += removed;
            }
            SessionEvent::MenuCancelled { .. } => report.interaction.cancelled += 1,
        }
        self
    }

    /// Fold a batch of events
    pub fn observe_all<'a>(&mut self, events: impl IntoIterator<Item = &'a TimedEvent>) -> &mut Self {
        for event in events {
            self.observe(event);
        }
        self
    }

    /// Set frames executed
    pub fn ticks(&mut self, ticks: u64) -> &mut Self {
        self.report.ticks = ticks;
        self
    }

    /// Set dropped tracking batches
    pub fn dropped_batches(&mut self, dropped: usize) -> &mut Self {
        self.report.tracking.dropped_batches = dropped;
        self
    }

    /// Set run result
    pub fn result(&mut self, result: RunResult) -> &mut Self {
        self.report.result = result;
        self
    }

    /// Set wall-clock duration
    pub fn duration_seconds(&mut self, seconds: f64) -> &mut Self {
        self.report.duration_seconds = seconds;
        self
    }

    /// Build the report
    pub fn build(&self) -> SessionMetricsReport {
        self.report.clone()
    }
}

/// Sink for writing metrics reports to JSON files
pub struct MetricsSink {
    path: std::path::PathBuf,
}

impl MetricsSink {
    /// Create a new metrics sink at the specified path
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(Self { path })
    }

    /// Write metrics report to file
    pub fn write(&self, report: &SessionMetricsReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(&self.path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
