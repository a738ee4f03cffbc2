use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;
use waymark_camera::Viewport;
use waymark_core::GeoCoordinate;
use waymark_scene::{PlacementService, StaticCatalog};
use waymark_tracking::DEFAULT_QUEUE_CAPACITY;
use waymark_ui3d::{CommentIndex, LabelLayoutEngine, LabelStyle};

pub const DEFAULT_CONFIG_PATH: &str = "config/waymark.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WaymarkConfig {
    pub session: SessionConfig,
    pub label: LabelStyle,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Tracking batches buffered between frames before new ones are rejected.
    pub tracking_queue_capacity: usize,
    pub viewport: Viewport,
    /// JSON object catalog; the built-in toys when unset.
    pub catalog: Option<PathBuf>,
    /// JSON comment table; the built-in sample places when unset.
    pub comments: Option<PathBuf>,
    /// Device location used for reverse geocoding. No location, no labels.
    pub device_location: Option<GeoCoordinate>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tracking_queue_capacity: DEFAULT_QUEUE_CAPACITY,
            viewport: Viewport::default(),
            catalog: None,
            comments: None,
            device_location: None,
        }
    }
}

impl WaymarkConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        let cfg = match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<WaymarkConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    WaymarkConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!("Config not found at {}. Using defaults", path.display());
                }
                WaymarkConfig::default()
            }
        };
        cfg.sanitized()
    }

    /// Replace settings that would break the session with their defaults.
    pub fn sanitized(mut self) -> Self {
        let problems = self.label.problems();
        if !problems.is_empty() {
            for problem in &problems {
                warn!(problem = %problem, "invalid label style");
            }
            warn!("Using the default label style");
            self.label = LabelStyle::default();
        }
        if self.session.tracking_queue_capacity == 0 {
            warn!(
                default = DEFAULT_QUEUE_CAPACITY,
                "tracking_queue_capacity must be positive, using default"
            );
            self.session.tracking_queue_capacity = DEFAULT_QUEUE_CAPACITY;
        }
        if self.session.viewport.width <= 0.0 || self.session.viewport.height <= 0.0 {
            warn!(viewport = ?self.session.viewport, "viewport must be positive, using default");
            self.session.viewport = Viewport::default();
        }
        if let Some(location) = self.session.device_location {
            if !location.is_valid() {
                warn!(?location, "device_location out of range, ignoring it");
                self.session.device_location = None;
            }
        }
        self
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    /// Catalog from the configured file, or the built-in one.
    pub fn catalog(&self) -> Result<StaticCatalog> {
        match &self.session.catalog {
            Some(path) => StaticCatalog::from_path(path)
                .with_context(|| format!("failed to load catalog {}", path.display())),
            None => Ok(StaticCatalog::default()),
        }
    }

    /// Comment table from the configured file, or the built-in one.
    pub fn comment_index(&self) -> Result<CommentIndex> {
        match &self.session.comments {
            Some(path) => CommentIndex::from_path(path)
                .with_context(|| format!("failed to load comments {}", path.display())),
            None => Ok(CommentIndex::global().clone()),
        }
    }

    /// Apply the label and location settings to a placement service.
    pub fn configure(&self, service: PlacementService) -> Result<PlacementService> {
        Ok(service
            .with_layout(LabelLayoutEngine::new(self.label.clone()))
            .with_comments(self.comment_index()?)
            .with_device_location(self.session.device_location))
    }
}
