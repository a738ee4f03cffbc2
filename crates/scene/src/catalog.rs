//! Object catalog - placeable object kinds and their local bounds

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use waymark_core::Aabb;

/// Built-in placeable kinds.
pub const DEFAULT_KINDS: [&str; 3] = ["Drummer", "RocketToy", "ToyBiplane"];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown object kind `{0}`")]
    UnknownKind(String),
    #[error("object kind `{kind}` has invalid size {size:?}")]
    InvalidSize { kind: String, size: [f32; 3] },
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A loaded object ready to be anchored
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectTemplate {
    pub kind: String,
    /// Collision/selection volume, resting on the local origin
    pub bounds: Aabb,
}

/// Resolves object kind names into loadable objects
pub trait ObjectCatalog {
    fn load(&self, kind: &str) -> Result<ObjectTemplate, CatalogError>;

    /// Kinds offered to the user, in menu order.
    fn kinds(&self) -> Vec<String>;
}

/// Catalog entry as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    /// Width, height, depth in metres
    pub size: [f32; 3],
}

/// Fixed table of object kinds
#[derive(Debug, Clone, PartialEq)]
pub struct StaticCatalog {
    entries: Vec<CatalogEntry>,
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self {
            entries: vec![
                CatalogEntry {
                    name: "Drummer".to_string(),
                    size: [0.35, 0.5, 0.3],
                },
                CatalogEntry {
                    name: "RocketToy".to_string(),
                    size: [0.2, 0.6, 0.2],
                },
                CatalogEntry {
                    name: "ToyBiplane".to_string(),
                    size: [0.6, 0.25, 0.55],
                },
            ],
        }
    }
}

impl StaticCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Parse a JSON array of `{"name": ..., "size": [w, h, d]}`.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

impl ObjectCatalog for StaticCatalog {
    fn load(&self, kind: &str) -> Result<ObjectTemplate, CatalogError> {
        let entry = self
            .entries
            .iter()
            .find(|entry| entry.name == kind)
            .ok_or_else(|| CatalogError::UnknownKind(kind.to_string()))?;

        let size = Vec3::from_array(entry.size);
        if !size.is_finite() || size.min_element() <= 0.0 {
            return Err(CatalogError::InvalidSize {
                kind: kind.to_string(),
                size: entry.size,
            });
        }

        Ok(ObjectTemplate {
            kind: entry.name.clone(),
            bounds: Aabb::grounded(size),
        })
    }

    fn kinds(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_builtin_kinds() {
        let catalog = StaticCatalog::default();
        assert_eq!(catalog.kinds(), DEFAULT_KINDS.map(String::from).to_vec());
        let drummer = catalog.load("Drummer").unwrap();
        assert_eq!(drummer.bounds.min.y, 0.0);
        assert!((drummer.bounds.extents().y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn unknown_kind_fails() {
        let err = StaticCatalog::default().load("Submarine").unwrap_err();
        assert!(matches!(err, CatalogError::UnknownKind(kind) if kind == "Submarine"));
    }

    #[test]
    fn invalid_size_fails() {
        let catalog = StaticCatalog::from_json_str(r#"[{"name": "Flat", "size": [1.0, 0.0, 1.0]}]"#)
            .unwrap();
        assert!(matches!(
            catalog.load("Flat"),
            Err(CatalogError::InvalidSize { .. })
        ));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, r#"[{"name": "Lantern", "size": [0.1, 0.3, 0.1]}]"#).unwrap();
        let catalog = StaticCatalog::from_path(&path).unwrap();
        assert_eq!(catalog.kinds(), vec!["Lantern".to_string()]);
        assert!(matches!(
            StaticCatalog::from_path(dir.path().join("missing.json")),
            Err(CatalogError::Io(_))
        ));
    }
}
