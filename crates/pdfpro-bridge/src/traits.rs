// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.

use std::io::Write;

use pdfpro_core::error::Result;
use pdfpro_core::types::{ChooserRequest, DownloadEntry, FileHandle};

/// Capabilities the bridge host needs from the platform, shared between the
/// UI context and background workers.
pub trait PlatformBridge: NativeFileChooser + NativeDownloads + Send + Sync {
    /// Human-readable platform name (e.g. "Desktop").
    fn platform_name(&self) -> &str;
}

/// Pick a single document with the OS chooser.
pub trait NativeFileChooser {
    /// Show the chooser described by `request`.
    ///
    /// Returns once the chooser is on screen; the outcome arrives later
    /// through `reply`. An `Err` means nothing was launched, and the caller
    /// must treat the request as resolved with no selection.
    fn launch_chooser(&self, request: ChooserRequest, reply: ChooserReply) -> Result<()>;
}

/// The shared downloads area, reached through content registration rather
/// than raw paths so it keeps working under storage sandboxing.
pub trait NativeDownloads {
    /// Register a named, typed entry. The returned entry may carry a
    /// different display name if the platform resolved a collision.
    fn create_entry(&self, display_name: &str, mime_type: &str) -> Result<DownloadEntry>;

    /// Open a byte stream that replaces the entry's content.
    fn open_stream(&self, entry: &DownloadEntry) -> Result<Box<dyn Write + Send>>;

    /// Remove an entry whose content could not be written.
    fn discard_entry(&self, entry: &DownloadEntry) -> Result<()>;
}

/// System chrome around the content surface. Must be called on the UI
/// context.
pub trait NativeChrome {
    /// Show or hide the status bar. When hidden it can be revealed
    /// transiently with a swipe.
    fn set_status_bar_visible(&self, visible: bool) -> Result<()>;
}

/// One-shot receiver for a chooser outcome.
///
/// Platforms call [`ChooserReply::send`] exactly once. If a platform drops
/// the reply without sending (dialog task cancelled, activity recreated),
/// the reply reports "no selection" on drop so a request can never hang.
pub struct ChooserReply {
    deliver: Option<Box<dyn FnOnce(Option<FileHandle>) + Send + 'static>>,
}

impl ChooserReply {
    pub fn new(deliver: impl FnOnce(Option<FileHandle>) + Send + 'static) -> Self {
        Self {
            deliver: Some(Box::new(deliver)),
        }
    }

    pub fn send(mut self, selection: Option<FileHandle>) {
        if let Some(deliver) = self.deliver.take() {
            deliver(selection);
        }
    }
}

impl Drop for ChooserReply {
    fn drop(&mut self) {
        if let Some(deliver) = self.deliver.take() {
            tracing::debug!("chooser reply dropped without a result; reporting no selection");
            deliver(None);
        }
    }
}

impl std::fmt::Debug for ChooserReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChooserReply")
            .field("pending", &self.deliver.is_some())
            .finish()
    }
}
