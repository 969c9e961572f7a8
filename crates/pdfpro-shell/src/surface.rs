// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The embedded content surface as seen by the bridge host.

use pdfpro_core::error::Result;
use pdfpro_core::types::{FileHandle, Notice};

/// Receives the serialised result of a script evaluated in hosted content.
pub type ScriptCallback = Box<dyn FnOnce(Result<String>) + Send + 'static>;

/// Surface configuration fixed at initialisation.
///
/// Mixed content and caching have no switch here: content served from the
/// asset scheme may always fetch secure remote resources, and bundled files
/// carry no cache headers, so the engine's default policy applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSettings {
    pub javascript: bool,
    /// localStorage / IndexedDB survive restarts.
    pub persistent_storage: bool,
    /// Picked local documents are exposed to content through the asset scheme.
    pub file_access: bool,
    pub overscroll_glow: bool,
    pub scrollbars: bool,
}

impl SurfaceSettings {
    /// The only configuration the shell runs with.
    pub const fn fixed() -> Self {
        Self {
            javascript: true,
            persistent_storage: true,
            file_access: true,
            overscroll_glow: false,
            scrollbars: false,
        }
    }

    /// Stylesheet injected at document start for settings that webviews only
    /// expose through CSS.
    pub fn stylesheet(&self) -> String {
        let mut css = String::new();
        if !self.overscroll_glow {
            css.push_str("html, body { overscroll-behavior: none; }\n");
        }
        if !self.scrollbars {
            css.push_str("html { scrollbar-width: none; }\n::-webkit-scrollbar { display: none; }\n");
        }
        css
    }
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self::fixed()
    }
}

/// Operations the bridge host performs on the content surface.
///
/// All methods are called on the UI context.
pub trait ContentSurface {
    /// Evaluate `script` in hosted content and report its serialised result.
    ///
    /// An `Err` return means the script was never started and `on_result`
    /// will not be called.
    fn evaluate_with_result(&self, script: &str, on_result: ScriptCallback) -> Result<()>;

    /// Deliver a file-selection resolution to hosted content.
    fn deliver_selection(&self, request_id: u64, selection: Option<&FileHandle>) -> Result<()>;

    /// Display a transient notification.
    fn show_notice(&self, notice: &Notice) -> Result<()>;

    /// Abort any in-flight load.
    fn stop_loading(&mut self);

    /// Withdraw the bridge object from hosted content and stop accepting
    /// bridge messages.
    fn remove_bridge(&mut self, bridge_name: &str);

    /// Release the underlying surface. No other method is called afterwards.
    fn release(&mut self);
}
