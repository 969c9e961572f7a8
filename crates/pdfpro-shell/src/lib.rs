// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDFPro shell — hosts the web PDF editor and answers its native-bridge
// requests. The protocol modules are independent of the webview; `webview`,
// `assets` and `chrome` bind them to wry and tao.

pub mod assets;
pub mod back_nav;
pub mod chrome;
pub mod completer;
pub mod dispatch;
pub mod host;
pub mod ipc;
pub mod persistence;
pub mod selection;
pub mod surface;
pub mod webview;

#[cfg(test)]
pub(crate) mod testing;

pub use completer::FileSelectionCompleter;
pub use dispatch::{UiEvent, UiHandle, UiQueue};
pub use host::{BridgeHost, HostControl, HostOptions, HostParts};
pub use surface::{ContentSurface, SurfaceSettings};
