// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory stand-ins for the platform and the content surface.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pdfpro_bridge::traits::{
    ChooserReply, NativeChrome, NativeDownloads, NativeFileChooser, PlatformBridge,
};
use pdfpro_core::error::{PdfProError, Result};
use pdfpro_core::types::{ChooserRequest, ChooserTicket, DownloadEntry, FileHandle, Notice};

use crate::surface::{ContentSurface, ScriptCallback};

// ---------------------------------------------------------------------------
// Downloads
// ---------------------------------------------------------------------------

type Buffer = Arc<Mutex<Vec<u8>>>;

/// Downloads area kept in memory, with switchable failures.
#[derive(Debug, Default)]
pub struct MemoryDownloads {
    entries: Mutex<BTreeMap<String, Buffer>>,
    created: AtomicUsize,
    create_error: Mutex<Option<String>>,
    stream_error: Mutex<Option<String>>,
    failing_writes: AtomicBool,
}

impl MemoryDownloads {
    pub fn contents(&self, name: &str) -> Option<Vec<u8>> {
        let entries = self.entries.lock().unwrap();
        entries.get(name).map(|buf| buf.lock().unwrap().clone())
    }

    /// Names of entries that currently exist.
    pub fn names(&self) -> Vec<String> {
        self.entries.lock().unwrap().keys().cloned().collect()
    }

    /// How many entries were ever created, discarded ones included.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn fail_create(&self, cause: &str) {
        *self.create_error.lock().unwrap() = Some(cause.to_string());
    }

    pub fn fail_stream(&self, cause: &str) {
        *self.stream_error.lock().unwrap() = Some(cause.to_string());
    }

    pub fn fail_writes(&self) {
        self.failing_writes.store(true, Ordering::SeqCst);
    }
}

impl NativeDownloads for MemoryDownloads {
    fn create_entry(&self, display_name: &str, mime_type: &str) -> Result<DownloadEntry> {
        if let Some(cause) = self.create_error.lock().unwrap().clone() {
            return Err(PdfProError::EntryCreation(cause));
        }
        self.entries
            .lock()
            .unwrap()
            .insert(display_name.to_string(), Buffer::default());
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(DownloadEntry {
            uri: format!("memory://downloads/{display_name}"),
            display_name: display_name.to_string(),
            mime_type: mime_type.to_string(),
        })
    }

    fn open_stream(&self, entry: &DownloadEntry) -> Result<Box<dyn Write + Send>> {
        if let Some(cause) = self.stream_error.lock().unwrap().clone() {
            return Err(PdfProError::StreamUnavailable(cause));
        }
        let buffer = self
            .entries
            .lock()
            .unwrap()
            .get(&entry.display_name)
            .cloned()
            .ok_or_else(|| PdfProError::StreamUnavailable("no such entry".into()))?;
        buffer.lock().unwrap().clear();
        Ok(Box::new(MemoryStream {
            buffer,
            failing: self.failing_writes.load(Ordering::SeqCst),
        }))
    }

    fn discard_entry(&self, entry: &DownloadEntry) -> Result<()> {
        self.entries.lock().unwrap().remove(&entry.display_name);
        Ok(())
    }
}

struct MemoryStream {
    buffer: Buffer,
    failing: bool,
}

impl Write for MemoryStream {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if self.failing {
            return Err(io::Error::other("disk full"));
        }
        self.buffer.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// Platform whose chooser never shows anything: tests answer its replies.
#[derive(Debug, Default)]
pub struct FakePlatform {
    pub downloads: MemoryDownloads,
    launches: Mutex<Vec<ChooserRequest>>,
    replies: Mutex<Vec<(ChooserTicket, ChooserReply)>>,
    launch_fails: AtomicBool,
}

impl FakePlatform {
    pub fn fail_launches(&self) {
        self.launch_fails.store(true, Ordering::SeqCst);
    }

    pub fn launches(&self) -> Vec<ChooserRequest> {
        self.launches.lock().unwrap().clone()
    }

    /// Take the reply for the chooser launched with `ticket`.
    pub fn reply_for(&self, ticket: ChooserTicket) -> ChooserReply {
        let mut replies = self.replies.lock().unwrap();
        let index = replies
            .iter()
            .position(|(t, _)| *t == ticket)
            .unwrap_or_else(|| panic!("no chooser launched with ticket {ticket}"));
        replies.remove(index).1
    }

    /// Reply to the most recent launch.
    pub fn latest_reply(&self) -> ChooserReply {
        let ticket = self.launches().last().expect("a chooser was launched").ticket;
        self.reply_for(ticket)
    }
}

impl NativeFileChooser for FakePlatform {
    fn launch_chooser(&self, request: ChooserRequest, reply: ChooserReply) -> Result<()> {
        if self.launch_fails.load(Ordering::SeqCst) {
            return Err(PdfProError::ChooserLaunch("no activity handles ACTION_OPEN_DOCUMENT".into()));
        }
        self.replies.lock().unwrap().push((request.ticket, reply));
        self.launches.lock().unwrap().push(request);
        Ok(())
    }
}

impl NativeDownloads for FakePlatform {
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

impl PlatformBridge for FakePlatform {
    fn platform_name(&self) -> &str {
        "Fake"
    }
}

/// Records every status-bar change.
#[derive(Debug, Clone, Default)]
pub struct FakeChrome {
    applied: Arc<Mutex<Vec<bool>>>,
}

impl FakeChrome {
    pub fn applied(&self) -> Vec<bool> {
        self.applied.lock().unwrap().clone()
    }
}

impl NativeChrome for FakeChrome {
    fn set_status_bar_visible(&self, visible: bool) -> Result<()> {
        self.applied.lock().unwrap().push(visible);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Content surface
// ---------------------------------------------------------------------------

/// One observable call on the fake surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Script(String),
    Notice(Notice),
    Delivered {
        request_id: u64,
        selection: Option<FileHandle>,
    },
    StopLoading,
    RemoveBridge(String),
    Release,
}

/// How the fake content answers an evaluated script.
#[derive(Debug, Clone)]
pub enum ScriptReply {
    /// Complete immediately with this serialised value.
    Value(String),
    /// Complete immediately with an evaluation error.
    Throw(String),
    /// Refuse to start the evaluation at all.
    Refuse,
    /// Never complete until [`FakeSurface::complete_held`] is called.
    Hold,
}

#[derive(Default)]
struct SurfaceState {
    calls: Vec<SurfaceCall>,
    reply: Option<ScriptReply>,
    held: Vec<ScriptCallback>,
}

/// Content surface that records what the host does to it.
///
/// Clones share state, so a test keeps one clone and hands the other to the
/// host.
#[derive(Clone, Default)]
pub struct FakeSurface {
    state: Rc<RefCell<SurfaceState>>,
}

impl FakeSurface {
    /// Content without a back hook: every script evaluates to `false`.
    pub fn new() -> Self {
        Self::answering(ScriptReply::Value("false".into()))
    }

    pub fn answering(reply: ScriptReply) -> Self {
        let surface = Self::default();
        surface.state.borrow_mut().reply = Some(reply);
        surface
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.state.borrow().calls.clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::Notice(notice) => Some(notice),
                _ => None,
            })
            .collect()
    }

    pub fn deliveries(&self) -> Vec<(u64, Option<FileHandle>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::Delivered {
                    request_id,
                    selection,
                } => Some((request_id, selection)),
                _ => None,
            })
            .collect()
    }

    /// Finish every held evaluation with `value`.
    pub fn complete_held(&self, value: &str) {
        let held = std::mem::take(&mut self.state.borrow_mut().held);
        for callback in held {
            callback(Ok(value.to_string()));
        }
    }

    fn record(&self, call: SurfaceCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl ContentSurface for FakeSurface {
    fn evaluate_with_result(&self, script: &str, on_result: ScriptCallback) -> Result<()> {
        self.record(SurfaceCall::Script(script.to_string()));
        let reply = self.state.borrow().reply.clone();
        match reply.unwrap_or(ScriptReply::Value("null".into())) {
            ScriptReply::Value(value) => on_result(Ok(value)),
            ScriptReply::Throw(message) => on_result(Err(PdfProError::BackHook(message))),
            ScriptReply::Refuse => return Err(PdfProError::Surface("surface is not ready".into())),
            ScriptReply::Hold => self.state.borrow_mut().held.push(on_result),
        }
        Ok(())
    }

    fn deliver_selection(&self, request_id: u64, selection: Option<&FileHandle>) -> Result<()> {
        self.record(SurfaceCall::Delivered {
            request_id,
            selection: selection.cloned(),
        });
        Ok(())
    }

    fn show_notice(&self, notice: &Notice) -> Result<()> {
        self.record(SurfaceCall::Notice(notice.clone()));
        Ok(())
    }

    fn stop_loading(&mut self) {
        self.record(SurfaceCall::StopLoading);
    }

    fn remove_bridge(&mut self, bridge_name: &str) {
        self.record(SurfaceCall::RemoveBridge(bridge_name.to_string()));
    }

    fn release(&mut self) {
        self.record(SurfaceCall::Release);
    }
}
