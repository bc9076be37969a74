use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_POINTER_DISTANCE: f64 = 5.0;
const DEFAULT_TOUCH_DELAY_MS: u64 = 250;
const DEFAULT_TOUCH_TOLERANCE: f64 = 5.0;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Pixels a pressed pointer must travel before a drag starts.
    #[serde(default)]
    pub pointer_activation_distance: Option<f64>,
    /// Milliseconds a touch must be held before a drag starts.
    #[serde(default)]
    pub touch_activation_delay_ms: Option<u64>,
    /// Pixels a held touch may wander before the activation is aborted.
    #[serde(default)]
    pub touch_activation_tolerance: Option<f64>,
    /// Renumber the column a card leaves, not only the one it enters.
    #[serde(default)]
    pub renumber_origin_column: Option<bool>,
    /// Reject empty gate input instead of accepting it.
    #[serde(default)]
    pub require_gate_input: Option<bool>,
    /// Base URL of the server exposing `PATCH /api/<entity>/reorder`.
    #[serde(default)]
    pub reorder_endpoint: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/stageboard/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("stageboard/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("stageboard\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    pub fn load() -> Self {
        match Self::config_path() {
            Some(config_path) => Self::load_from(&config_path),
            None => Self::default(),
        }
    }

    /// Load from an explicit path. A missing or malformed file yields defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn effective_pointer_activation_distance(&self) -> f64 {
        self.pointer_activation_distance
            .filter(|d| d.is_finite() && *d >= 0.0)
            .unwrap_or(DEFAULT_POINTER_DISTANCE)
    }

    pub fn effective_touch_activation_delay_ms(&self) -> u64 {
        self.touch_activation_delay_ms
            .unwrap_or(DEFAULT_TOUCH_DELAY_MS)
    }

    pub fn effective_touch_activation_tolerance(&self) -> f64 {
        self.touch_activation_tolerance
            .filter(|t| t.is_finite() && *t >= 0.0)
            .unwrap_or(DEFAULT_TOUCH_TOLERANCE)
    }

    pub fn effective_renumber_origin_column(&self) -> bool {
        self.renumber_origin_column.unwrap_or(true)
    }

    pub fn effective_require_gate_input(&self) -> bool {
        self.require_gate_input.unwrap_or(false)
    }

    pub fn effective_request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_sensor_constraints() {
        let config = AppConfig::default();
        assert_eq!(config.effective_pointer_activation_distance(), 5.0);
        assert_eq!(config.effective_touch_activation_delay_ms(), 250);
        assert_eq!(config.effective_touch_activation_tolerance(), 5.0);
        assert!(config.effective_renumber_origin_column());
        assert!(!config.effective_require_gate_input());
        assert_eq!(config.effective_request_timeout_secs(), 10);
    }

    #[test]
    fn load_from_reads_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "pointer_activation_distance = 8.0\nrenumber_origin_column = false\nrequire_gate_input = true\nreorder_endpoint = \"http://localhost:3000\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.effective_pointer_activation_distance(), 8.0);
        assert!(!config.effective_renumber_origin_column());
        assert!(config.effective_require_gate_input());
        assert_eq!(
            config.reorder_endpoint.as_deref(),
            Some("http://localhost:3000")
        );
    }

    #[test]
    fn missing_or_malformed_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let missing = AppConfig::load_from(&dir.path().join("nope.toml"));
        assert!(missing.reorder_endpoint.is_none());

        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "pointer_activation_distance = [").unwrap();
        let bad = AppConfig::load_from(&path);
        assert_eq!(bad.effective_pointer_activation_distance(), 5.0);
    }

    #[test]
    fn negative_distances_are_ignored() {
        let config = AppConfig {
            pointer_activation_distance: Some(-1.0),
            touch_activation_tolerance: Some(f64::NAN),
            ..Default::default()
        };
        assert_eq!(config.effective_pointer_activation_distance(), 5.0);
        assert_eq!(config.effective_touch_activation_tolerance(), 5.0);
    }
}
