// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Marshalling onto the UI-owning context.
//
// Background work never touches the host directly. It posts a `UiEvent`
// through a `UiHandle`; the UI context drains the `UiQueue` and hands each
// event to the bridge host in order.

use std::sync::Arc;

use pdfpro_core::error::Result;
use pdfpro_core::types::{ChooserTicket, ChromeVisibility, FileHandle, Notice, SavedDocument};
use tokio::sync::mpsc;

use crate::back_nav::BackPressId;

/// Everything the bridge host reacts to.
#[derive(Debug)]
pub enum UiEvent {
    /// Raw bridge message posted by hosted content.
    Bridge(String),
    /// The native chooser launched with `ticket` closed.
    ChooserFinished {
        ticket: ChooserTicket,
        selection: Option<FileHandle>,
    },
    /// A selection completer resolved; tell hosted content.
    SelectionResolved {
        request_id: u64,
        selection: Option<FileHandle>,
    },
    /// A background save finished.
    SaveCompleted {
        file_name: String,
        outcome: Result<SavedDocument>,
    },
    /// Show a transient notification.
    Notify(Notice),
    /// Apply status-bar visibility.
    SetChrome(ChromeVisibility),
    /// The user asked to go back.
    BackPressed,
    /// The content-defined back hook answered.
    BackHookAnswered {
        press: BackPressId,
        outcome: Result<String>,
    },
    /// The back hook did not answer in time.
    BackHookExpired { press: BackPressId },
    /// A navigation inside the content surface failed.
    LoadFailed { url: String, reason: String },
}

/// Cloneable, thread-safe sender onto the UI context.
#[derive(Clone)]
pub struct UiHandle {
    tx: mpsc::UnboundedSender<UiEvent>,
    wake: Arc<dyn Fn() + Send + Sync>,
}

impl UiHandle {
    /// A handle whose `wake` nudges the UI event loop after every post.
    pub fn new(wake: impl Fn() + Send + Sync + 'static) -> (Self, UiQueue) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = Self {
            tx,
            wake: Arc::new(wake),
        };
        (handle, UiQueue { rx })
    }

    /// A handle for a UI context that polls its queue itself.
    pub fn detached() -> (Self, UiQueue) {
        Self::new(|| {})
    }

    /// Queue `event` for the UI context. Returns `false` once the UI
    /// context has gone away; the event is dropped in that case.
    pub fn post(&self, event: UiEvent) -> bool {
        if self.tx.send(event).is_err() {
            tracing::debug!("UI context gone; dropping event");
            return false;
        }
        (self.wake)();
        true
    }

    /// Request a status-bar change from any thread.
    pub fn set_chrome_visibility(&self, show: bool) -> bool {
        self.post(UiEvent::SetChrome(show.into()))
    }

    /// Show a notice from any thread.
    pub fn notify(&self, notice: Notice) -> bool {
        self.post(UiEvent::Notify(notice))
    }
}

impl std::fmt::Debug for UiHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiHandle")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

/// The UI context's end of the event channel.
#[derive(Debug)]
pub struct UiQueue {
    rx: mpsc::UnboundedReceiver<UiEvent>,
}

impl UiQueue {
    /// Take every event queued so far, in posting order.
    pub fn drain(&mut self) -> Vec<UiEvent> {
        std::iter::from_fn(|| self.rx.try_recv().ok()).collect()
    }

    /// Wait for the next event.
    pub async fn next(&mut self) -> Option<UiEvent> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn drain_preserves_order() {
        let (ui, mut queue) = UiHandle::detached();
        ui.post(UiEvent::BackPressed);
        ui.set_chrome_visibility(false);
        let events = queue.drain();
        assert!(matches!(events[0], UiEvent::BackPressed));
        assert!(matches!(events[1], UiEvent::SetChrome(ChromeVisibility::Hidden)));
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn post_wakes_ui_loop() {
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&wakes);
        let (ui, _queue) = UiHandle::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        ui.notify(Notice::progress("Saving…"));
        ui.post(UiEvent::BackPressed);
        assert_eq!(wakes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn post_after_queue_dropped_is_refused() {
        let (ui, queue) = UiHandle::detached();
        drop(queue);
        assert!(!ui.post(UiEvent::BackPressed));
    }

    #[test]
    fn posting_from_worker_thread() {
        let (ui, mut queue) = UiHandle::detached();
        let worker = ui.clone();
        std::thread::spawn(move || worker.set_chrome_visibility(false))
            .join()
            .unwrap();
        assert!(matches!(
            queue.drain().as_slice(),
            [UiEvent::SetChrome(ChromeVisibility::Hidden)]
        ));
    }
}
