//! Reverse-geocoding results reduced to label text

use serde::{Deserialize, Serialize};

/// Best-effort address components; any of them may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placemark {
    pub name: Option<String>,
    pub thoroughfare: Option<String>,
    pub sub_locality: Option<String>,
    pub locality: Option<String>,
    /// Administrative area (state, province)
    pub region: Option<String>,
    pub country: Option<String>,
}

impl Placemark {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Name, else locality, else country, else `fallback`.
    pub fn place_name(&self, fallback: &str) -> String {
        [&self.name, &self.locality, &self.country]
            .into_iter()
            .flatten()
            .next()
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Present address parts from street to country, comma separated.
    pub fn place_detail(&self) -> String {
        [
            &self.thoroughfare,
            &self.sub_locality,
            &self.locality,
            &self.region,
            &self.country,
        ]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
    }
}
