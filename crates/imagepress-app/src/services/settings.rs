// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings file — JSON-serialised `AppConfig` in the data directory.

use std::path::{Path, PathBuf};

use imagepress_core::AppConfig;
use imagepress_core::error::Result;
use tracing::{debug, info, warn};

use super::data_dir;

const CONFIG_FILE: &str = "settings.json";

/// Location of the default settings file.
pub fn default_path() -> PathBuf {
    data_dir::data_dir().join(CONFIG_FILE)
}

/// Load settings from an explicit file. Errors are returned to the caller.
pub fn load_from(path: &Path) -> Result<AppConfig> {
    let data = std::fs::read_to_string(path)?;
    let config = serde_json::from_str(&data)?;
    debug!(path = %path.display(), "Settings loaded");
    Ok(config)
}

/// Load the default settings file, falling back to defaults when it is
/// missing or unreadable.
pub fn load_or_default(path: &Path) -> AppConfig {
    if !path.exists() {
        return AppConfig::default();
    }
    match load_from(path) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable settings file");
            AppConfig::default()
        }
    }
}

/// Write settings as pretty-printed JSON.
pub fn persist(path: &Path, config: &AppConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), "Settings saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use imagepress_core::{FilterKind, PipelineConfig};
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn settings_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let config = AppConfig {
            defaults: PipelineConfig::new()
                .with_quality(60)
                .with_watermark("COPY")
                .with_filter(FilterKind::Blur),
            document_title: Some("Receipts".into()),
        };

        persist(&path, &config).unwrap();
        assert_eq!(load_from(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_or_default(&dir.path().join("absent.json"));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn corrupt_file_gives_defaults_but_explicit_load_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(load_or_default(&path), AppConfig::default());
        assert!(load_from(&path).is_err());
    }
}
