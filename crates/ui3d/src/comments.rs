//! Comment index - place name to stored comments
//!
//! Lookup is exact first. When no key matches exactly, the query and every
//! key are normalized (lowercase ASCII alphanumerics only) and the first key
//! in table order where either string contains the other wins.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// Comments stored for one place, oldest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceComments {
    pub place: String,
    pub comments: Vec<String>,
}

#[derive(Debug, Error)]
pub enum CommentIndexError {
    #[error("failed to read comment table: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse comment table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Lowercase and keep ASCII letters and digits only.
pub fn normalize_place_name(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Ordered, read-only table of comments keyed by place name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentIndex {
    entries: Vec<PlaceComments>,
}

static GLOBAL: OnceLock<CommentIndex> = OnceLock::new();

impl CommentIndex {
    /// Build from entries; a repeated place keeps its first entry.
    pub fn new(entries: Vec<PlaceComments>) -> Self {
        let mut kept: Vec<PlaceComments> = Vec::with_capacity(entries.len());
        for entry in entries {
            if kept.iter().any(|existing| existing.place == entry.place) {
                debug!(place = %entry.place, "duplicate comment table entry ignored");
                continue;
            }
            kept.push(entry);
        }
        Self { entries: kept }
    }

    /// Process-wide built-in table, initialised on first use.
    pub fn global() -> &'static CommentIndex {
        GLOBAL.get_or_init(Self::builtin)
    }

    /// Sample comments shipped with the app.
    pub fn builtin() -> Self {
        let table: &[(&str, &[&str])] = &[
            (
                "Badaguan Scenic Area",
                &["Not bad, we can still see the architecture of the Republic of China"],
            ),
            (
                "Ocean University of China Laoshan Campus",
                &[
                    "Good location, easy to travel",
                    "The cherry blossoms in spring are very beautiful",
                    "There are many canteens with rich dishes",
                ],
            ),
            ("Zhanqiao Scenic Area", &["Serious commercialization"]),
            (
                "Qingdao Shilaoren Bathing Beach",
                &["The beach is most beautiful at sunset. Highly recommended!"],
            ),
            (
                "Laoshan Mountain",
                &[
                    "Nice view. Recommended!",
                    "A little regret, to catch up with the typhoon closed the mountain",
                ],
            ),
            (
                "Ocean University of China Xihaian Campus",
                &[
                    "The scenery is pleasant and suitable for study",
                    "The library is spectacular, but it's not built yet",
                    "The location is remote!!!",
                    "Food in canteen needs to be strengthened!",
                    "I love this place!",
                ],
            ),
            (
                "Ocean University of China West Coast Campus",
                &[
                    "The scenery is pleasant and suitable for study",
                    "The library is spectacular, but it's not built yet",
                    "The location is remote!!!",
                    "Food in canteen needs to be strengthened!",
                ],
            ),
            (
                "Haijun Park",
                &["Good for hanging out after dinner", "Beautiful sea view !"],
            ),
            (
                "Mangrove Tree Town Square",
                &["Resort for leisure and food", "Price is too HIGH!!!"],
            ),
        ];

        Self::new(
            table
                .iter()
                .map(|(place, comments)| PlaceComments {
                    place: place.to_string(),
                    comments: comments.iter().map(|c| c.to_string()).collect(),
                })
                .collect(),
        )
    }

    /// Parse a JSON array of `{"place": ..., "comments": [...]}`.
    pub fn from_json_str(json: &str) -> Result<Self, CommentIndexError> {
        let entries: Vec<PlaceComments> = serde_json::from_str(json)?;
        Ok(Self::new(entries))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CommentIndexError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn places(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.place.as_str())
    }

    /// Every comment stored for the best-matching place.
    pub fn comments_for(&self, place_name: &str) -> Option<&[String]> {
        if let Some(exact) = self.entries.iter().find(|entry| entry.place == place_name) {
            return Some(&exact.comments);
        }

        let query = normalize_place_name(place_name);
        if query.is_empty() {
            return None;
        }

        self.entries
            .iter()
            .find(|entry| {
                let key = normalize_place_name(&entry.place);
                !key.is_empty() && (query.contains(&key) || key.contains(&query))
            })
            .map(|entry| {
                debug!(query = place_name, matched = %entry.place, "fuzzy comment match");
                entry.comments.as_slice()
            })
    }

    /// Up to `limit` comments for the place, in stored order.
    pub fn top_comments(&self, place_name: &str, limit: usize) -> Vec<String> {
        self.comments_for(place_name)
            .map(|comments| comments.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    /// Most recently stored comment, or an empty string.
    pub fn latest_comment(&self, place_name: &str) -> String {
        self.comments_for(place_name)
            .and_then(|comments| comments.last().cloned())
            .unwrap_or_default()
    }
}
