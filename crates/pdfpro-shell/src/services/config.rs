// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Loading `config.json` from the data directory.

use std::path::Path;

use pdfpro_core::config::ShellConfig;
use pdfpro_core::error::Result;

use super::data_dir::default_asset_dir;

const CONFIG_FILE: &str = "config.json";

/// Load the shell configuration, falling back to defaults when the file is
/// missing or unusable. `asset_dir` is always resolved on return.
pub fn load_config(data_dir: &Path) -> ShellConfig {
    let path = data_dir.join(CONFIG_FILE);
    let mut config = match std::fs::read_to_string(&path) {
        Ok(text) => match ShellConfig::from_json(&text) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "configuration loaded");
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "configuration unusable; using defaults");
                ShellConfig::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no configuration file; writing defaults");
            let config = ShellConfig::default();
            if let Err(e) = persist_config(data_dir, &config) {
                tracing::warn!(error = %e, "could not write default configuration");
            }
            config
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "configuration unreadable; using defaults");
            ShellConfig::default()
        }
    };
    if config.asset_dir.is_none() {
        config.asset_dir = Some(default_asset_dir());
    }
    config
}

/// Write `config` back to the data directory.
pub fn persist_config(data_dir: &Path, config: &ShellConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(data_dir.join(CONFIG_FILE), json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path());
        assert_eq!(config.bridge_name, "Android");
        assert!(config.asset_dir.is_some());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn broken_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        assert_eq!(load_config(dir.path()).window_title, "PDFPro");
    }

    #[test]
    fn persisted_config_is_loaded_back() {
        let dir = TempDir::new().unwrap();
        let config = ShellConfig {
            window_title: "Editor".into(),
            back_hook_timeout_ms: Some(750),
            asset_dir: Some(dir.path().join("web")),
            ..ShellConfig::default()
        };
        persist_config(dir.path(), &config).unwrap();
        assert_eq!(load_config(dir.path()), config);
    }
}
