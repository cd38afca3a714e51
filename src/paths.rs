use anyhow::{Context, Result};
use etcetera::app_strategy::{AppStrategy, AppStrategyArgs};
use std::fs;
use std::path::{Path, PathBuf};

// Choose the Strategy based on OS
// Windows -> AppData\Roaming\vidmark
#[cfg(target_os = "windows")]
use etcetera::app_strategy::Windows as Strategy;

// Mac & Linux -> ~/.config/vidmark
#[cfg(not(target_os = "windows"))]
use etcetera::app_strategy::Xdg as Strategy;

/// Overrides both the config and data directories with a single root.
pub const HOME_ENV: &str = "VIDMARK_HOME";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_file: PathBuf,
    pub store_file: PathBuf,
    pub lock_file: PathBuf,
    pub log_file: PathBuf,
}

impl AppPaths {
    pub fn init() -> Result<Self> {
        if let Some(root) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            let root = PathBuf::from(root);
            return Self::in_dirs(&root, &root);
        }

        let args = AppStrategyArgs {
            top_level_domain: "com".to_string(),
            author: "vidmark".to_string(),
            app_name: "vidmark".to_string(),
        };

        let strategy =
            Strategy::new(args).map_err(|_| anyhow::anyhow!("Could not determine system paths"))?;

        Self::in_dirs(&strategy.config_dir(), &strategy.data_dir())
    }

    /// Builds the paths under explicit directories, creating them if needed.
    pub fn in_dirs(config_dir: &Path, data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(config_dir)
            .with_context(|| format!("failed to create config dir: {}", config_dir.display()))?;

        fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data dir: {}", data_dir.display()))?;

        Ok(Self {
            config_file: config_dir.join("config.json"),
            store_file: data_dir.join("bookmarks.json"),
            lock_file: data_dir.join("bookmarks.lock"),
            log_file: data_dir.join("vidmark.log"),
        })
    }
}
