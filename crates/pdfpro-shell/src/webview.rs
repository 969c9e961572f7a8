// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// wry-backed content surface.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use pdfpro_core::config::ShellConfig;
use pdfpro_core::error::{PdfProError, Result};
use pdfpro_core::types::{FileHandle, Notice};
use tao::window::Window;
use tracing::{debug, info};
use wry::http::{Request, StatusCode};
use wry::{PageLoadEvent, WebView, WebViewBuilder};

use crate::assets::{ASSET_SCHEME, AssetServer, entry_url};
use crate::dispatch::{UiEvent, UiHandle};
use crate::ipc::{bridge_script, removal_script, selection_script, toast_script};
use crate::surface::{ContentSurface, ScriptCallback, SurfaceSettings};

/// The hosted web application inside a wry webview.
pub struct WrySurface {
    webview: Option<WebView>,
    assets: Arc<AssetServer>,
    settings: SurfaceSettings,
    bridge_open: Arc<AtomicBool>,
}

impl WrySurface {
    /// Build the webview inside `window`, install the bridge and start
    /// loading the entry point.
    pub fn build(
        window: &Window,
        config: &ShellConfig,
        assets: Arc<AssetServer>,
        ui: UiHandle,
    ) -> Result<Self> {
        let settings = SurfaceSettings::fixed();
        let bridge_open = Arc::new(AtomicBool::new(true));
        let start_url = entry_url(&config.entry_point);

        let ipc_ui = ui.clone();
        let ipc_open = Arc::clone(&bridge_open);

        let protocol_assets = Arc::clone(&assets);
        let protocol_ui = ui.clone();
        let entry_path = format!("/{}", config.entry_point.trim_start_matches('/'));

        let builder = WebViewBuilder::new()
            .with_devtools(config.devtools)
            .with_incognito(!settings.persistent_storage)
            .with_initialization_script(&bridge_script(&config.bridge_name, &settings))
            .with_ipc_handler(move |request: Request<String>| {
                if !ipc_open.load(Ordering::Acquire) {
                    debug!("bridge withdrawn; IPC message ignored");
                    return;
                }
                // Size limits are enforced by the host so rejected saves
                // still produce a failure notice.
                ipc_ui.post(UiEvent::Bridge(request.into_body()));
            })
            .with_custom_protocol(ASSET_SCHEME.into(), move |_webview_id, request| {
                let path = request.uri().path().to_string();
                let response = protocol_assets.respond(&path);
                if response.status() == StatusCode::NOT_FOUND && path == entry_path {
                    protocol_ui.post(UiEvent::LoadFailed {
                        url: request.uri().to_string(),
                        reason: "entry point not found".into(),
                    });
                }
                response
            })
            .with_on_page_load_handler(|event, url| match event {
                PageLoadEvent::Started => debug!(%url, "page load started"),
                PageLoadEvent::Finished => info!(%url, "page loaded"),
            })
            .with_url(&start_url);

        let builder = if settings.javascript {
            builder
        } else {
            builder.with_javascript_disabled()
        };

        #[cfg(target_os = "windows")]
        let builder = {
            use wry::WebViewBuilderExtWindows;
            builder.with_https_scheme(true)
        };

        #[cfg(target_os = "linux")]
        let webview = {
            use tao::platform::unix::WindowExtUnix;
            use wry::WebViewBuilderExtUnix;
            builder.build_gtk(window.gtk_window())
        };
        #[cfg(not(target_os = "linux"))]
        let webview = builder.build(window);

        let webview = webview.map_err(|e| PdfProError::Surface(e.to_string()))?;
        info!(url = %start_url, root = %assets.root().display(), "content surface created");

        Ok(Self {
            webview: Some(webview),
            assets,
            settings,
            bridge_open,
        })
    }

    fn webview(&self) -> Result<&WebView> {
        self.webview
            .as_ref()
            .ok_or_else(|| PdfProError::Surface("surface already released".into()))
    }

    fn run(&self, script: &str) -> Result<()> {
        self.webview()?
            .evaluate_script(script)
            .map_err(|e| PdfProError::Surface(e.to_string()))
    }
}

impl ContentSurface for WrySurface {
    fn evaluate_with_result(&self, script: &str, on_result: ScriptCallback) -> Result<()> {
        // wry wants a reusable callback; the result arrives at most once.
        let slot = Mutex::new(Some(on_result));
        self.webview()?
            .evaluate_script_with_callback(script, move |value: String| {
                if let Some(callback) = slot.lock().ok().and_then(|mut s| s.take()) {
                    callback(Ok(value));
                }
            })
            .map_err(|e| PdfProError::Surface(e.to_string()))
    }

    fn deliver_selection(&self, request_id: u64, selection: Option<&FileHandle>) -> Result<()> {
        let script = match selection {
            None => selection_script(request_id, None),
            Some(handle) => {
                let uri = match handle.local_path() {
                    Some(path) if self.settings.file_access => self.assets.grant(path),
                    _ => handle.uri().to_string(),
                };
                let name = handle.display_name().unwrap_or("document.pdf");
                selection_script(request_id, Some((&uri, name)))
            }
        };
        self.run(&script)
    }

    fn show_notice(&self, notice: &Notice) -> Result<()> {
        self.run(&toast_script(notice))
    }

    fn stop_loading(&mut self) {
        if let Err(e) = self.run("window.stop();") {
            debug!(error = %e, "stop loading failed");
        }
    }

    fn remove_bridge(&mut self, bridge_name: &str) {
        self.bridge_open.store(false, Ordering::Release);
        if let Err(e) = self.run(&removal_script(bridge_name)) {
            debug!(error = %e, "bridge removal script failed");
        }
    }

    fn release(&mut self) {
        if self.webview.take().is_some() {
            debug!("webview dropped");
        }
    }
}
