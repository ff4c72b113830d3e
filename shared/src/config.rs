use serde::{Deserialize, Serialize};

use crate::csrf::CsrfSource;
use crate::endpoints::Endpoints;

pub const DEFAULT_CENTER: [f64; 2] = [31.5602, 130.5581]; // Kagoshima
pub const DEFAULT_ZOOM: u8 = 10;
pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const DEFAULT_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
pub const DEFAULT_RECONCILE_DELAY_MS: u32 = 500;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 10_000;
pub const MAX_ZOOM: u8 = 19;

/// Page-level settings. Every field may be omitted by the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub endpoints: Endpoints,
    pub map: MapConfig,
    pub csrf_source: CsrfSource,
    pub request_timeout_ms: u32,
    /// Path fragments whose pages reload after a confirmed favorite toggle.
    pub reload_paths: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            map: MapConfig::default(),
            csrf_source: CsrfSource::default(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            reload_paths: vec!["/favorites/".into()],
        }
    }
}

impl ClientConfig {
    pub fn request_timeout_ms(&self) -> u32 {
        Some(self.request_timeout_ms)
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS)
    }

    pub fn reloads_after_toggle(&self, path: &str) -> bool {
        self.reload_paths
            .iter()
            .any(|fragment| !fragment.is_empty() && path.contains(fragment.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub center: [f64; 2],
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
    /// One-shot delay before favorite buttons are re-rendered after marker placement.
    /// Leaflet has no "popup DOM settled" event, so this stays an approximation.
    pub reconcile_delay_ms: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            tile_url: DEFAULT_TILE_URL.into(),
            attribution: DEFAULT_ATTRIBUTION.into(),
            reconcile_delay_ms: DEFAULT_RECONCILE_DELAY_MS,
        }
    }
}

impl MapConfig {
    pub fn zoom(&self) -> u8 {
        self.zoom.min(MAX_ZOOM)
    }

    pub fn center(&self) -> [f64; 2] {
        if self.center.iter().all(|v| v.is_finite()) {
            self.center
        } else {
            DEFAULT_CENTER
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.map.center(), DEFAULT_CENTER);
        assert_eq!(config.map.zoom(), 10);
    }

    #[test]
    fn zero_timeout_falls_back() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"request_timeout_ms": 0}"#).unwrap();
        assert_eq!(config.request_timeout_ms(), DEFAULT_REQUEST_TIMEOUT_MS);
    }

    #[test]
    fn csrf_source_uses_snake_case() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"csrf_source": "hidden_field"}"#).unwrap();
        assert_eq!(config.csrf_source, CsrfSource::HiddenField);
    }

    #[test]
    fn reload_paths_match_fragments() {
        let config = ClientConfig::default();
        assert!(config.reloads_after_toggle("/users/favorites/"));
        assert!(!config.reloads_after_toggle("/"));

        let config = ClientConfig {
            reload_paths: vec![String::new()],
            ..ClientConfig::default()
        };
        assert!(!config.reloads_after_toggle("/anything/"));
    }

    #[test]
    fn zoom_is_clamped() {
        let map = MapConfig {
            zoom: 40,
            ..MapConfig::default()
        };
        assert_eq!(map.zoom(), MAX_ZOOM);
    }
}
