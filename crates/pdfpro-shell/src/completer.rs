// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// File Selection Completer — the one-shot handle behind a "select a file"
// request from hosted content.

use pdfpro_core::types::FileHandle;
use tokio::sync::oneshot;

type Resolve = Box<dyn FnOnce(Option<FileHandle>) + Send + 'static>;

/// Resolves one file-selection request exactly once.
///
/// `resolve` consumes the completer, so a second resolution does not
/// type-check. A completer dropped while still pending resolves itself with
/// "no selection" rather than leaving hosted content waiting forever.
pub struct FileSelectionCompleter {
    resolve: Option<Resolve>,
}

impl FileSelectionCompleter {
    pub fn new(resolve: impl FnOnce(Option<FileHandle>) + Send + 'static) -> Self {
        Self {
            resolve: Some(Box::new(resolve)),
        }
    }

    /// A completer paired with a receiver that yields the resolution.
    pub fn channel() -> (Self, oneshot::Receiver<Option<FileHandle>>) {
        let (tx, rx) = oneshot::channel();
        let completer = Self::new(move |selection| {
            // The receiver may be gone; resolution still counts as done.
            let _ = tx.send(selection);
        });
        (completer, rx)
    }

    /// Resolve with the picked document, or `None` for no selection.
    pub fn resolve(mut self, selection: Option<FileHandle>) {
        if let Some(resolve) = self.resolve.take() {
            resolve(selection);
        }
    }

    /// Resolve with no selection.
    pub fn cancel(self) {
        self.resolve(None);
    }
}

impl Drop for FileSelectionCompleter {
    fn drop(&mut self) {
        if let Some(resolve) = self.resolve.take() {
            tracing::warn!("file selection completer dropped unresolved; resolving with no selection");
            resolve(None);
        }
    }
}

impl std::fmt::Debug for FileSelectionCompleter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSelectionCompleter")
            .field("pending", &self.resolve.is_some())
            .finish()
    }
}
