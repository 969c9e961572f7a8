// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge host: owns the content surface and answers everything hosted
// content asks of the platform.
//
// The host lives on the UI context and is driven one `UiEvent` at a time.
// Anything that finishes elsewhere (chooser, save worker, script callback,
// timer) comes back as another event, so host state is never touched
// concurrently and never re-entered from inside a callback.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use pdfpro_bridge::traits::{ChooserReply, NativeChrome, PlatformBridge};
use pdfpro_core::config::ShellConfig;
use pdfpro_core::human_errors::save_failure_notice;
use pdfpro_core::types::{ChooserRequest, ChromeVisibility, Notice, SaveRequest};
use tracing::{debug, error, info, warn};

use crate::back_nav::{BackDecision, BackNavigator, hook_script};
use crate::completer::FileSelectionCompleter;
use crate::dispatch::{UiEvent, UiHandle};
use crate::ipc::{BridgeMessage, claimed_kind};
use crate::persistence::{spawn_save, validate_file_name};
use crate::selection::{Begun, SelectionSlot};
use crate::surface::{ContentSurface, ScriptCallback};

/// Host behaviour taken from [`ShellConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostOptions {
    pub bridge_name: String,
    pub back_hook_function: String,
    pub back_hook_timeout: Option<Duration>,
    pub max_message_bytes: usize,
}

impl From<&ShellConfig> for HostOptions {
    fn from(config: &ShellConfig) -> Self {
        Self {
            bridge_name: config.bridge_name.clone(),
            back_hook_function: config.back_hook_function.clone(),
            back_hook_timeout: config.back_hook_timeout(),
            max_message_bytes: config.max_message_bytes,
        }
    }
}

impl Default for HostOptions {
    fn default() -> Self {
        Self::from(&ShellConfig::default())
    }
}

/// Everything a [`BridgeHost`] is built from.
pub struct HostParts {
    /// Surface already loaded with the bridge installed.
    pub surface: Box<dyn ContentSurface>,
    pub platform: Arc<dyn PlatformBridge>,
    pub chrome: Box<dyn NativeChrome>,
    pub ui: UiHandle,
    /// Runtime for blocking saves and back-hook timers.
    pub workers: tokio::runtime::Handle,
    pub options: HostOptions,
}

/// What the UI loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostControl {
    Continue,
    /// Default back navigation: close the shell.
    Exit,
}

pub struct BridgeHost {
    surface: Box<dyn ContentSurface>,
    platform: Arc<dyn PlatformBridge>,
    chrome: Box<dyn NativeChrome>,
    ui: UiHandle,
    workers: tokio::runtime::Handle,
    options: HostOptions,
    selection: SelectionSlot,
    back: BackNavigator,
    chrome_state: ChromeVisibility,
    finishing: Arc<AtomicBool>,
    bridge_attached: bool,
    torn_down: bool,
}

impl BridgeHost {
    pub fn new(parts: HostParts) -> Self {
        info!(
            platform = parts.platform.platform_name(),
            bridge = %parts.options.bridge_name,
            "bridge host ready"
        );
        Self {
            back: BackNavigator::new(parts.options.back_hook_timeout),
            surface: parts.surface,
            platform: parts.platform,
            chrome: parts.chrome,
            ui: parts.ui,
            workers: parts.workers,
            options: parts.options,
            selection: SelectionSlot::new(),
            chrome_state: ChromeVisibility::default(),
            finishing: Arc::new(AtomicBool::new(false)),
            bridge_attached: true,
            torn_down: false,
        }
    }

    pub fn chrome_visibility(&self) -> ChromeVisibility {
        self.chrome_state
    }

    pub fn has_pending_selection(&self) -> bool {
        !self.selection.is_idle()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// React to one event from the UI queue.
    pub fn handle(&mut self, event: UiEvent) -> HostControl {
        if self.torn_down {
            debug!("event after teardown dropped");
            return HostControl::Continue;
        }
        match event {
            UiEvent::Bridge(raw) => return self.on_bridge_message(&raw),
            UiEvent::ChooserFinished { ticket, selection } => match self.selection.finish(ticket) {
                Some(completer) => {
                    debug!(%ticket, picked = selection.is_some(), "chooser finished");
                    completer.resolve(selection);
                }
                None => debug!(%ticket, "stale chooser result ignored"),
            },
            UiEvent::SelectionResolved {
                request_id,
                selection,
            } => {
                if let Err(e) = self.surface.deliver_selection(request_id, selection.as_ref()) {
                    warn!(request_id, error = %e, "could not deliver file selection");
                }
            }
            UiEvent::SaveCompleted { file_name, outcome } => {
                let notice = match outcome {
                    Ok(saved) => Notice::success(format!(
                        "Saved to Downloads: {}",
                        saved.entry.display_name
                    )),
                    Err(e) => {
                        debug!(%file_name, "reporting failed save");
                        save_failure_notice(&e)
                    }
                };
                self.show_notice(&notice);
            }
            UiEvent::Notify(notice) => self.show_notice(&notice),
            UiEvent::SetChrome(visibility) => self.apply_chrome(visibility),
            UiEvent::BackPressed => return self.on_back_pressed(),
            UiEvent::BackHookAnswered { press, outcome } => {
                if let Some(decision) = self.back.answer(press, &outcome) {
                    return self.decide(decision);
                }
                debug!(%press, "late back hook answer ignored");
            }
            UiEvent::BackHookExpired { press } => {
                if let Some(decision) = self.back.expire(press) {
                    warn!(%press, "back hook timed out");
                    return self.decide(decision);
                }
            }
            UiEvent::LoadFailed { url, reason } => {
                error!(%url, %reason, "content failed to load");
            }
        }
        HostControl::Continue
    }

    fn on_bridge_message(&mut self, raw: &str) -> HostControl {
        if !self.bridge_attached {
            debug!("bridge message after deregistration ignored");
            return HostControl::Continue;
        }
        let message = match BridgeMessage::parse(raw, self.options.max_message_bytes) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "rejected bridge message");
                if claimed_kind(raw).as_deref() == Some("saveBinaryPayload") {
                    self.show_notice(&save_failure_notice(&e));
                }
                return HostControl::Continue;
            }
        };
        debug!(kind = message.kind(), "bridge message");

        match message {
            BridgeMessage::SaveBinaryPayload { payload, file_name } => {
                self.save_binary_payload(SaveRequest::new(payload, file_name));
            }
            BridgeMessage::SetChromeVisibility { show } => self.set_chrome_visibility(show),
            BridgeMessage::RequestFileSelection { request_id } => {
                let ui = self.ui.clone();
                let completer = FileSelectionCompleter::new(move |selection| {
                    ui.post(UiEvent::SelectionResolved {
                        request_id,
                        selection,
                    });
                });
                self.request_file_selection(completer);
            }
            BridgeMessage::BackNavigation => return self.on_back_pressed(),
        }
        HostControl::Continue
    }

    /// Launch the PDF chooser on behalf of `completer`.
    ///
    /// A selection already in flight is resolved with no selection before
    /// the new chooser starts. Returns `false` if the chooser could not be
    /// launched; `completer` has then already been resolved with `None`.
    pub fn request_file_selection(&mut self, completer: FileSelectionCompleter) -> bool {
        if self.finishing.load(Ordering::Acquire) {
            completer.cancel();
            return false;
        }

        let Begun { ticket, superseded } = self.selection.begin(completer);
        if let Some(previous) = superseded {
            debug!(%ticket, "new selection supersedes the pending one");
            previous.cancel();
        }

        let ui = self.ui.clone();
        let reply = ChooserReply::new(move |selection| {
            ui.post(UiEvent::ChooserFinished { ticket, selection });
        });
        match self.platform.launch_chooser(ChooserRequest::pdf(ticket), reply) {
            Ok(()) => {
                info!(%ticket, "file chooser launched");
                true
            }
            Err(e) => {
                error!(%ticket, error = %e, "file chooser could not be launched");
                if let Some(completer) = self.selection.finish(ticket) {
                    completer.cancel();
                }
                false
            }
        }
    }

    /// Accept a save: show progress now and persist on a worker.
    pub fn save_binary_payload(&mut self, request: SaveRequest) {
        if self.finishing.load(Ordering::Acquire) {
            debug!(file_name = %request.file_name, "save ignored while finishing");
            return;
        }
        if let Err(e) = validate_file_name(&request.file_name) {
            warn!(error = %e, "save rejected");
            self.show_notice(&save_failure_notice(&e));
            return;
        }

        info!(file_name = %request.file_name, encoded = request.payload.len(), "save requested");
        self.show_notice(&Notice::progress("Saving…"));
        spawn_save(
            &self.workers,
            Arc::clone(&self.platform),
            request,
            Arc::clone(&self.finishing),
            self.ui.clone(),
        );
    }

    pub fn set_chrome_visibility(&mut self, show: bool) {
        self.apply_chrome(ChromeVisibility::from(show));
    }

    fn apply_chrome(&mut self, visibility: ChromeVisibility) {
        match self.chrome.set_status_bar_visible(visibility.is_shown()) {
            Ok(()) => {
                debug!(?visibility, "status bar updated");
                self.chrome_state = visibility;
            }
            Err(e) => warn!(?visibility, error = %e, "could not change status bar"),
        }
    }

    /// Offer the back press to hosted content.
    pub fn on_back_pressed(&mut self) -> HostControl {
        let press = self.back.begin();
        let ui = self.ui.clone();
        let on_result: ScriptCallback = Box::new(move |outcome| {
            ui.post(UiEvent::BackHookAnswered { press, outcome });
        });

        let script = hook_script(&self.options.back_hook_function);
        if let Err(e) = self.surface.evaluate_with_result(&script, on_result) {
            warn!(%press, error = %e, "back hook could not be evaluated");
            return match self.back.answer(press, &Err(e)) {
                Some(decision) => self.decide(decision),
                None => HostControl::Continue,
            };
        }

        if let Some(timeout) = self.back.timeout() {
            let ui = self.ui.clone();
            self.workers.spawn(async move {
                tokio::time::sleep(timeout).await;
                ui.post(UiEvent::BackHookExpired { press });
            });
        }
        HostControl::Continue
    }

    fn decide(&self, decision: BackDecision) -> HostControl {
        match decision {
            BackDecision::Suppress => {
                debug!("back press handled by content");
                HostControl::Continue
            }
            BackDecision::Default => {
                info!("back press not handled; closing shell");
                HostControl::Exit
            }
        }
    }

    fn show_notice(&self, notice: &Notice) {
        if let Err(e) = self.surface.show_notice(notice) {
            warn!(message = %notice.message, error = %e, "could not show notice");
        }
    }

    /// Release the surface. Safe to call more than once.
    ///
    /// A pending selection is resolved with no selection first. Content is
    /// not told about it, since the surface is gone by the time that
    /// resolution would be delivered.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        if let Some(completer) = self.selection.abandon() {
            debug!("resolving pending selection before teardown");
            completer.cancel();
        }
        self.finishing.store(true, Ordering::Release);
        self.back.clear();

        self.surface.stop_loading();
        if self.bridge_attached {
            self.surface.remove_bridge(&self.options.bridge_name);
            self.bridge_attached = false;
        }
        self.surface.release();
        self.torn_down = true;
        info!("content surface released");
    }
}

impl Drop for BridgeHost {
    fn drop(&mut self) {
        self.teardown();
    }
}
