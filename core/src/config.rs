use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "wwwroot/Data";
pub const DEFAULT_BOUNDARIES_FILE: &str = "fields.kml";
pub const DEFAULT_CENTROIDS_FILE: &str = "centroids.kml";

/// Where the two source documents live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldsConfig {
    pub data_dir:        PathBuf,
    pub boundaries_file: String,
    pub centroids_file:  String,
}

impl Default for FieldsConfig {
    fn default() -> Self {
        Self::with_data_dir(DEFAULT_DATA_DIR)
    }
}

impl FieldsConfig {
    /// Default file names under `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir:        data_dir.into(),
            boundaries_file: DEFAULT_BOUNDARIES_FILE.into(),
            centroids_file:  DEFAULT_CENTROIDS_FILE.into(),
        }
    }

    /// Load from a JSON file. Missing keys take their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: FieldsConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?;
        Ok(config)
    }

    pub fn boundaries_path(&self) -> PathBuf {
        self.data_dir.join(&self.boundaries_file)
    }

    pub fn centroids_path(&self) -> PathBuf {
        self.data_dir.join(&self.centroids_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_wwwroot_data() {
        let config = FieldsConfig::default();
        assert_eq!(config.boundaries_path(), PathBuf::from("wwwroot/Data/fields.kml"));
        assert_eq!(config.centroids_path(), PathBuf::from("wwwroot/Data/centroids.kml"));
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: FieldsConfig =
            serde_json::from_str(r#"{ "data_dir": "/srv/fields", "centroids_file": "centers.kml" }"#)
                .expect("parse");
        assert_eq!(config.boundaries_path(), PathBuf::from("/srv/fields/fields.kml"));
        assert_eq!(config.centroids_path(), PathBuf::from("/srv/fields/centers.kml"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = FieldsConfig::load(Path::new("/nonexistent/fields.json")).unwrap_err();
        assert!(err.to_string().contains("Cannot read /nonexistent/fields.json"), "{err}");
    }
}
