use crate::error::{PhotoAnnotateError, Result};
use photo_annotate_common::{GeoCoordinate, MapRegion, MapSpan, TextHistory, DEFAULT_HISTORY_LIMIT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 注記履歴の上限
    pub history_limit: usize,
    /// 起動直後の地図中心
    pub default_map_center: GeoCoordinate,
    /// 起動直後の地図スパン
    pub default_map_span: MapSpan,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PhotoAnnotateError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("photo-annotate").join("config.json"))
    }

    fn validate(&self) -> Result<()> {
        TextHistory::with_capacity(self.history_limit)?;
        MapSpan::new(
            self.default_map_span.latitude_delta,
            self.default_map_span.longitude_delta,
        )?;
        Ok(())
    }

    /// 空の履歴を設定上限で作成
    pub fn new_history(&self) -> Result<TextHistory> {
        Ok(TextHistory::with_capacity(self.history_limit)?)
    }

    pub fn initial_map_region(&self) -> MapRegion {
        MapRegion {
            center: self.default_map_center,
            span: self.default_map_span,
        }
    }

    pub fn set_history_limit(&mut self, limit: usize) -> Result<()> {
        TextHistory::with_capacity(limit)?;
        self.history_limit = limit;
        self.save()
    }
}

impl Default for Config {
    fn default() -> Self {
        let region = MapRegion::default();
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            default_map_center: region.center,
            default_map_span: region.span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PhotoAnnotateError;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.history_limit, 200);
        assert_eq!(config.default_map_center, GeoCoordinate::new(45.0, -90.0));
        assert_eq!(config.default_map_span, MapSpan::default());
    }

    #[test]
    fn test_load_missing_file_uses_default() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = Config::load_from(&dir.path().join("none.json")).unwrap();
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            history_limit: 50,
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.history_limit, 50);
        assert_eq!(loaded.new_history().unwrap().capacity(), 50);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "history_limit": 10 }"#).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.history_limit, 10);
        assert_eq!(loaded.initial_map_region(), MapRegion::default());
    }

    #[test]
    fn test_invalid_limit_rejected() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "history_limit": 0 }"#).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, PhotoAnnotateError::Common(_)));
    }

    #[test]
    fn test_broken_json_is_error() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ broken").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, PhotoAnnotateError::JsonParse(_)));
    }
}
