// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop bridge: rfd for the document chooser, a plain directory for the
// downloads area. Status-bar visibility belongs to the shell window and is
// implemented there.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use pdfpro_core::error::{PdfProError, Result};
use pdfpro_core::types::{ChooserRequest, DownloadEntry, FileHandle, PDF_EXTENSION, PDF_MIME};
use tracing::{debug, info, warn};

use crate::traits::*;

/// Give up on finding a free name after this many numbered candidates.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Resolve the user's downloads directory.
///
/// Tries `XDG_DOWNLOAD_DIR`, then `~/Downloads` (`HOME` or `USERPROFILE`),
/// and finally the system temp directory.
pub fn default_downloads_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DOWNLOAD_DIR") {
        if !xdg.is_empty() {
            return PathBuf::from(xdg);
        }
    }
    for var in ["HOME", "USERPROFILE"] {
        if let Ok(home) = std::env::var(var) {
            if !home.is_empty() {
                return PathBuf::from(home).join("Downloads");
            }
        }
    }
    std::env::temp_dir()
}

/// Bridge backed by rfd and a downloads directory.
pub struct DesktopBridge {
    downloads: DesktopDownloads,
    runtime: tokio::runtime::Handle,
}

impl DesktopBridge {
    pub fn new(downloads_dir: PathBuf, runtime: tokio::runtime::Handle) -> Self {
        info!(dir = %downloads_dir.display(), "desktop bridge using downloads directory");
        Self {
            downloads: DesktopDownloads::new(downloads_dir),
            runtime,
        }
    }
}

impl PlatformBridge for DesktopBridge {
    fn platform_name(&self) -> &str {
        "Desktop"
    }
}

impl NativeFileChooser for DesktopBridge {
    fn launch_chooser(&self, request: ChooserRequest, reply: ChooserReply) -> Result<()> {
        if request.mime_type != PDF_MIME {
            return Err(PdfProError::ChooserLaunch(format!(
                "desktop chooser only filters {PDF_MIME}, got {}",
                request.mime_type
            )));
        }
        let ticket = request.ticket;
        debug!(%ticket, "desktop: opening document chooser");

        // rfd's async dialog hands control back to the UI event loop while
        // the native panel is up; the reply fires from the runtime.
        self.runtime.spawn(async move {
            let picked = rfd::AsyncFileDialog::new()
                .set_title("Open PDF")
                .add_filter("PDF documents", &[PDF_EXTENSION])
                .pick_file()
                .await;
            let selection = picked.map(|file| FileHandle::from_path(file.path()));
            debug!(%ticket, picked = selection.is_some(), "desktop: chooser closed");
            reply.send(selection);
        });
        Ok(())
    }
}

impl NativeDownloads for DesktopBridge {
    fn create_entry(&self, display_name: &str, mime_type: &str) -> Result<DownloadEntry> {
        self.downloads.create_entry(display_name, mime_type)
    }

    fn open_stream(&self, entry: &DownloadEntry) -> Result<Box<dyn Write + Send>> {
        self.downloads.open_stream(entry)
    }

    fn discard_entry(&self, entry: &DownloadEntry) -> Result<()> {
        self.downloads.discard_entry(entry)
    }
}

/// Downloads area backed by a directory on disk.
///
/// Entry creation reserves the name atomically (`create_new`), so two saves
/// racing for the same name end up as `name.pdf` and `name (1).pdf`.
#[derive(Debug, Clone)]
pub struct DesktopDownloads {
    dir: PathBuf,
}

impl DesktopDownloads {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn create_entry(&self, display_name: &str, mime_type: &str) -> Result<DownloadEntry> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            PdfProError::EntryCreation(format!("{}: {e}", self.dir.display()))
        })?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = numbered_name(display_name, attempt);
            let path = self.dir.join(&name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => {
                    debug!(path = %path.display(), "desktop: reserved download entry");
                    return Ok(DownloadEntry {
                        uri: format!("file://{}", path.display()),
                        display_name: name,
                        mime_type: mime_type.to_owned(),
                    });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(PdfProError::EntryCreation(format!("{}: {e}", path.display())));
                }
            }
        }
        Err(PdfProError::EntryCreation(format!(
            "no free name for {display_name:?} after {MAX_NAME_ATTEMPTS} attempts"
        )))
    }

    pub fn open_stream(&self, entry: &DownloadEntry) -> Result<Box<dyn Write + Send>> {
        let path = self.entry_path(entry)?;
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| PdfProError::StreamUnavailable(format!("{}: {e}", path.display())))?;
        Ok(Box::new(BufWriter::new(file)))
    }

    pub fn discard_entry(&self, entry: &DownloadEntry) -> Result<()> {
        let path = self.entry_path(entry)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "desktop: could not discard entry");
                Err(PdfProError::Io(e))
            }
        }
    }

    /// Map an entry back to its path, refusing anything outside our directory.
    fn entry_path(&self, entry: &DownloadEntry) -> Result<PathBuf> {
        let name = Path::new(&entry.display_name);
        let plain = name.components().count() == 1 && name.file_name().is_some();
        if !plain {
            return Err(PdfProError::StreamUnavailable(format!(
                "entry {:?} is not a plain file name",
                entry.display_name
            )));
        }
        Ok(self.dir.join(name))
    }
}

/// `report.pdf` → `report.pdf`, `report (1).pdf`, `report (2).pdf`, …
fn numbered_name(name: &str, attempt: u32) -> String {
    if attempt == 0 {
        return name.to_owned();
    }
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{} ({attempt}){}", &name[..dot], &name[dot..]),
        _ => format!("{name} ({attempt})"),
    }
}
