// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the PDFPro shell.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The only document type the shell picks or persists.
pub const PDF_MIME: &str = "application/pdf";

/// File extension matching [`PDF_MIME`], used by desktop choosers.
pub const PDF_EXTENSION: &str = "pdf";

/// Opaque handle to a document the user picked in the native chooser.
///
/// Usually a `file://` URI with the local path kept alongside, so the shell
/// can expose the document to hosted content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    uri: String,
    display_name: Option<String>,
    #[serde(skip)]
    local_path: Option<PathBuf>,
}

impl FileHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            display_name: None,
            local_path: None,
        }
    }

    /// Build a handle for a file on the local filesystem.
    pub fn from_path(path: &Path) -> Self {
        let display_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        Self {
            uri: format!("file://{}", path.display()),
            display_name,
            local_path: Some(path.to_path_buf()),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn local_path(&self) -> Option<&Path> {
        self.local_path.as_deref()
    }
}

/// Monotonic identifier of one native chooser launch.
///
/// A chooser result is only accepted while its ticket matches the
/// outstanding selection; anything else is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChooserTicket(pub u64);

impl std::fmt::Display for ChooserTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Parameters handed to the native file chooser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChooserRequest {
    pub ticket: ChooserTicket,
    pub mime_type: &'static str,
    pub allow_multiple: bool,
}

impl ChooserRequest {
    /// Single-document PDF picker; the only shape the shell ever launches.
    pub fn pdf(ticket: ChooserTicket) -> Self {
        Self {
            ticket,
            mime_type: PDF_MIME,
            allow_multiple: false,
        }
    }
}

/// A request from hosted content to persist a base64 payload as a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    /// Base64 text exactly as received over the bridge.
    pub payload: String,
    /// Desired display name in the downloads area.
    pub file_name: String,
}

impl SaveRequest {
    pub fn new(payload: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            file_name: file_name.into(),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        PDF_MIME
    }
}

/// A registered, typed entry in the shared downloads area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadEntry {
    /// Platform URI of the entry (`file://…` for the desktop directory).
    pub uri: String,
    /// Name the platform actually assigned (may differ on collision).
    pub display_name: String,
    pub mime_type: String,
}

/// Outcome of a completed save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDocument {
    pub entry: DownloadEntry,
    pub bytes: usize,
    /// Lowercase hex SHA-256 of the bytes written.
    pub sha256: String,
}

/// Visibility of the host window's status bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChromeVisibility {
    #[default]
    Shown,
    Hidden,
}

impl ChromeVisibility {
    pub fn is_shown(self) -> bool {
        matches!(self, ChromeVisibility::Shown)
    }
}

impl From<bool> for ChromeVisibility {
    fn from(show: bool) -> Self {
        if show {
            ChromeVisibility::Shown
        } else {
            ChromeVisibility::Hidden
        }
    }
}

/// What a transient notification is reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Progress,
    Success,
    Failure,
}

/// How long a notification stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeDuration {
    Short,
    Long,
}

/// A fire-and-forget, toast-style message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub duration: NoticeDuration,
}

impl Notice {
    pub fn progress(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Progress,
            message: message.into(),
            duration: NoticeDuration::Short,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
            duration: NoticeDuration::Long,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Failure,
            message: message.into(),
            duration: NoticeDuration::Long,
        }
    }
}
