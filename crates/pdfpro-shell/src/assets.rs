// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Asset protocol: serves the bundled web application, plus any documents the
// user granted through the chooser, under a single custom scheme.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};
use uuid::Uuid;
use wry::http::header::{CACHE_CONTROL, CONTENT_TYPE, HeaderValue};
use wry::http::{Response, StatusCode};

/// Custom scheme registered with the webview.
pub const ASSET_SCHEME: &str = "app";

/// Origin hosted content is loaded from.
///
/// WebView2 maps custom schemes onto `https://<scheme>.localhost`.
#[cfg(target_os = "windows")]
pub const ASSET_ORIGIN: &str = "https://app.localhost";
#[cfg(not(target_os = "windows"))]
pub const ASSET_ORIGIN: &str = "app://localhost";

/// Path prefix under which granted documents are exposed.
pub const GRANTED_PREFIX: &str = "/__granted/";

/// URL of `entry_point` inside the bundled application.
pub fn entry_url(entry_point: &str) -> String {
    format!("{ASSET_ORIGIN}/{}", entry_point.trim_start_matches('/'))
}

/// Content type for a served file, by extension.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("json" | "map") => "application/json",
        Some("wasm") => "application/wasm",
        Some("pdf") => "application/pdf",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("woff2") => "font/woff2",
        Some("woff") => "font/woff",
        Some("ttf") => "font/ttf",
        Some("ftl" | "txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Map a request path onto a relative file path, refusing anything that
/// could leave the asset root.
pub fn sanitize(request_path: &str) -> Option<PathBuf> {
    let relative = request_path.trim_start_matches('/');
    if relative.is_empty() {
        return None;
    }
    let mut clean = PathBuf::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    (!clean.as_os_str().is_empty()).then_some(clean)
}

/// A response as the protocol handler hands it to wry.
pub type AssetResponse = Response<Cow<'static, [u8]>>;

/// Bundled application files and granted documents.
#[derive(Debug)]
pub struct AssetServer {
    root: PathBuf,
    granted: Mutex<HashMap<Uuid, PathBuf>>,
}

impl AssetServer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            granted: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Expose `path` to hosted content; returns the URL to fetch it from.
    ///
    /// Only the latest grant stays reachable. Content fetches a picked
    /// document once when the selection resolves, so earlier grants are
    /// revoked here.
    pub fn grant(&self, path: &Path) -> String {
        let id = Uuid::new_v4();
        if let Ok(mut granted) = self.granted.lock() {
            granted.clear();
            granted.insert(id, path.to_path_buf());
        }
        debug!(%id, path = %path.display(), "document granted to content");
        format!("{ASSET_ORIGIN}{GRANTED_PREFIX}{id}")
    }

    fn granted_path(&self, id: &str) -> Option<PathBuf> {
        let id = Uuid::parse_str(id).ok()?;
        self.granted.lock().ok()?.get(&id).cloned()
    }

    /// Locate the file behind `request_path`.
    pub fn locate(&self, request_path: &str) -> Option<PathBuf> {
        if let Some(id) = request_path.strip_prefix(GRANTED_PREFIX) {
            return self.granted_path(id);
        }
        sanitize(request_path).map(|relative| self.root.join(relative))
    }

    /// Answer one protocol request.
    pub fn respond(&self, request_path: &str) -> AssetResponse {
        let Some(path) = self.locate(request_path) else {
            warn!(path = request_path, "asset request refused");
            return status_only(StatusCode::NOT_FOUND);
        };
        match std::fs::read(&path) {
            Ok(bytes) => {
                let mut response = Response::new(Cow::Owned(bytes));
                let headers = response.headers_mut();
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(mime_for(&path)));
                if request_path.starts_with(GRANTED_PREFIX) {
                    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
                }
                response
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "asset not readable");
                status_only(StatusCode::NOT_FOUND)
            }
        }
    }
}

fn status_only(status: StatusCode) -> AssetResponse {
    let mut response = Response::new(Cow::Borrowed(&[][..]));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    response
}
