// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for PDFPro.

use thiserror::Error;

/// Top-level error type for all PDFPro operations.
#[derive(Debug, Error)]
pub enum PdfProError {
    // -- File selection --
    #[error("file chooser could not be launched: {0}")]
    ChooserLaunch(String),

    // -- Payload persistence --
    #[error("invalid base64 payload: {0}")]
    PayloadDecode(String),

    #[error("invalid file name: {0}")]
    InvalidFileName(String),

    #[error("could not create download entry: {0}")]
    EntryCreation(String),

    #[error("could not open output stream: {0}")]
    StreamUnavailable(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    // -- Bridge boundary --
    #[error("malformed bridge message: {0}")]
    BridgeMessage(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Content surface --
    #[error("content surface error: {0}")]
    Surface(String),

    #[error("back-press hook failed: {0}")]
    BackHook(String),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PdfProError>;
