use std::path::Path;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use osusume_api::anilist::AniListClient;
use osusume_api::jikan::JikanClient;
use osusume_api::Catalog;

use crate::error::CoreError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub anilist_url: String,
    pub jikan_url: String,
    pub page_size: u32,
    pub trending_limit: u32,
    /// Query Jikan when AniList fails or has nothing.
    pub fallback: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    pub weekly_cap: usize,
}

/// Timing of the random-search progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressConfig {
    pub tick_ms: u64,
    pub step: u8,
    pub cap: u8,
    pub hold_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        AppConfig::default().catalog
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        AppConfig::default().selection
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        AppConfig::default().progress
    }
}

impl ProgressConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn hold(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }
}

impl CatalogConfig {
    /// Build the catalog these settings describe.
    pub fn build_catalog(&self) -> Result<Catalog, CoreError> {
        let fallback = if self.fallback {
            Some(
                JikanClient::with_base_url(&self.jikan_url)
                    .map_err(|e| CoreError::Config(e.to_string()))?,
            )
        } else {
            None
        };
        Ok(
            Catalog::with_sources(AniListClient::with_endpoint(self.anilist_url.clone()), fallback)
                .with_page_size(self.page_size)
                .with_trending_limit(self.trending_limit),
        )
    }
}

impl AppConfig {
    /// Parse a TOML document; sections it omits keep their defaults.
    pub fn from_toml(s: &str) -> Result<Self, CoreError> {
        let config: AppConfig = toml::from_str(s).map_err(|e| CoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a specific file.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load config: user file (if exists) over built-in defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self, CoreError> {
        let user_path = Self::config_path();
        if user_path.exists() {
            tracing::debug!(path = %user_path.display(), "Loading user config");
            Self::load_from(&user_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Directory for log files.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn log_dir() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_local_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("", "", "osusume")
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.catalog.page_size == 0 {
            return Err(CoreError::Config("catalog.page_size must be at least 1".into()));
        }
        if self.selection.weekly_cap == 0 {
            return Err(CoreError::Config("selection.weekly_cap must be at least 1".into()));
        }
        let p = &self.progress;
        if p.step == 0 || p.cap >= 100 || p.tick_ms == 0 {
            return Err(CoreError::Config(
                "progress needs step > 0, cap < 100 and tick_ms > 0".into(),
            ));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        #[derive(Deserialize)]
        struct Defaults {
            catalog: CatalogConfig,
            selection: SelectionConfig,
            progress: ProgressConfig,
        }
        let d: Defaults =
            toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML");
        Self {
            catalog: d.catalog,
            selection: d.selection,
            progress: d.progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::default();
        assert_eq!(config.catalog.page_size, 9);
        assert_eq!(config.catalog.trending_limit, 10);
        assert!(config.catalog.fallback);
        assert_eq!(config.selection.weekly_cap, 3);
        assert_eq!(config.progress.tick_interval(), Duration::from_millis(200));
        assert_eq!(config.progress.hold(), Duration::from_millis(300));
        assert_eq!(config.progress.step, 10);
        assert_eq!(config.progress.cap, 90);
    }

    #[test]
    fn test_partial_file_keeps_other_sections() {
        let config = AppConfig::from_toml(
            r#"
            [selection]
            weekly_cap = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.selection.weekly_cap, 5);
        assert_eq!(config.catalog, CatalogConfig::default());
        assert_eq!(config.progress, ProgressConfig::default());
    }

    #[test]
    fn test_roundtrip() {
        let config = AppConfig::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized = AppConfig::from_toml(&serialized).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let err = AppConfig::from_toml(
            r#"
            [catalog]
            anilist_url = "https://graphql.anilist.co"
            jikan_url = "https://api.jikan.moe/v4/"
            page_size = 0
            trending_limit = 10
            fallback = false
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn test_rejects_progress_cap_at_completion() {
        let err = AppConfig::from_toml(
            r#"
            [progress]
            tick_ms = 200
            step = 10
            cap = 100
            hold_ms = 300
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("cap < 100"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [catalog]
            anilist_url = "http://localhost:9000"
            jikan_url = "http://localhost:9001/v4"
            page_size = 6
            trending_limit = 12
            fallback = false
            "#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.catalog.page_size, 6);
        assert!(!config.catalog.fallback);

        let catalog = config.catalog.build_catalog().unwrap();
        assert_eq!(catalog.page_size(), 6);
        assert_eq!(catalog.trending_limit(), 12);
        assert!(!catalog.has_fallback());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AppConfig::load_from(Path::new("/nonexistent/osusume.toml")).unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
