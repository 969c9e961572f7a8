// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shell configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{PdfProError, Result};

/// Default cap on a single bridge message (base64 payloads included).
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 64 * 1024 * 1024;

/// Persistent shell settings, read from `config.json` in the data directory.
///
/// Unknown or missing fields fall back to their defaults so that an old
/// config file never prevents the shell from starting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Title of the host window.
    pub window_title: String,
    /// Directory holding the bundled web application.
    pub asset_dir: Option<PathBuf>,
    /// Entry document inside `asset_dir` loaded at startup.
    pub entry_point: String,
    /// Global name of the bridge object injected into hosted content.
    pub bridge_name: String,
    /// Content-defined function consulted on back navigation.
    pub back_hook_function: String,
    /// Give up on the back hook after this many milliseconds (`None` waits).
    pub back_hook_timeout_ms: Option<u64>,
    /// Override for the shared downloads directory (desktop only).
    pub downloads_dir: Option<PathBuf>,
    /// Bridge messages larger than this are dropped.
    pub max_message_bytes: usize,
    /// Enable the webview inspector.
    pub devtools: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            window_title: "PDFPro".into(),
            asset_dir: None,
            entry_point: "index.html".into(),
            bridge_name: "Android".into(),
            back_hook_function: "handleBackPress".into(),
            back_hook_timeout_ms: None,
            downloads_dir: None,
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
            devtools: false,
        }
    }
}

impl ShellConfig {
    /// Parse a JSON config document and check it is usable.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: ShellConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn back_hook_timeout(&self) -> Option<Duration> {
        self.back_hook_timeout_ms.map(Duration::from_millis)
    }

    /// Reject values that would break script injection or asset loading.
    pub fn validate(&self) -> Result<()> {
        if !is_js_identifier(&self.bridge_name) {
            return Err(PdfProError::Config(format!(
                "bridge_name {:?} is not a JavaScript identifier",
                self.bridge_name
            )));
        }
        if !is_js_identifier(&self.back_hook_function) {
            return Err(PdfProError::Config(format!(
                "back_hook_function {:?} is not a JavaScript identifier",
                self.back_hook_function
            )));
        }
        if self.entry_point.is_empty() || self.entry_point.split('/').any(|part| part == "..") {
            return Err(PdfProError::Config(format!(
                "entry_point {:?} must be a relative path inside the asset directory",
                self.entry_point
            )));
        }
        if self.max_message_bytes == 0 {
            return Err(PdfProError::Config("max_message_bytes must be positive".into()));
        }
        Ok(())
    }
}

fn is_js_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_hosted_content_contract() {
        let config = ShellConfig::default();
        assert_eq!(config.bridge_name, "Android");
        assert_eq!(config.back_hook_function, "handleBackPress");
        assert_eq!(config.back_hook_timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ShellConfig::from_json(r#"{"back_hook_timeout_ms": 1500}"#).unwrap();
        assert_eq!(config.back_hook_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(config.entry_point, "index.html");
    }

    #[test]
    fn rejects_script_breaking_bridge_name() {
        let err = ShellConfig::from_json(r#"{"bridge_name": "x; alert(1)"}"#).unwrap_err();
        assert!(matches!(err, PdfProError::Config(_)));
    }

    #[test]
    fn rejects_entry_point_escaping_assets() {
        let err = ShellConfig::from_json(r#"{"entry_point": "../secret.html"}"#).unwrap_err();
        assert!(matches!(err, PdfProError::Config(_)));
    }
}
