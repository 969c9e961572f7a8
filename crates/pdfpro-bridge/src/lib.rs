// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! PDFPro — Native platform bridge abstractions.
//!
//! The shell reaches host-only capabilities (document picking, the shared
//! downloads area, status-bar visibility) through the traits in [`traits`].
//! The desktop backend in [`desktop`] implements them with rfd and a
//! downloads directory.

pub mod desktop;
pub mod traits;

use std::path::PathBuf;
use std::sync::Arc;

/// Inputs the platform backends need at construction time.
#[derive(Debug, Clone)]
pub struct BridgeOptions {
    /// Override for the downloads directory.
    pub downloads_dir: Option<PathBuf>,
    /// Runtime used for asynchronous native dialogs.
    pub runtime: tokio::runtime::Handle,
}

/// Build the bridge implementation for this host.
pub fn platform_bridge(options: BridgeOptions) -> Arc<dyn traits::PlatformBridge> {
    let downloads_dir = options
        .downloads_dir
        .unwrap_or_else(desktop::default_downloads_dir);
    Arc::new(desktop::DesktopBridge::new(downloads_dir, options.runtime))
}
