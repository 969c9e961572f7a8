// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Binary payload persistence: base64 from hosted content → a PDF entry in
// the shared downloads area.
//
// The flow is decode → create entry → open stream → write → flush. Decoding
// happens before anything is registered, so a malformed payload never
// leaves a file behind. A failure after registration discards the entry.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use pdfpro_bridge::traits::NativeDownloads;
use pdfpro_core::error::{PdfProError, Result};
use pdfpro_core::types::{SaveRequest, SavedDocument};
use sha2::{Digest, Sha256};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::dispatch::{UiEvent, UiHandle};

/// Standard alphabet; trailing `=` padding may be present or left off.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode a base64 payload, ignoring ASCII whitespace (wrapped lines).
pub fn decode_payload(encoded: &str) -> Result<Vec<u8>> {
    let compact: Vec<u8> = encoded
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    PAYLOAD_ENGINE
        .decode(&compact)
        .map_err(|e| PdfProError::PayloadDecode(e.to_string()))
}

/// Reject names that are empty or would escape the downloads area.
pub fn validate_file_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(PdfProError::InvalidFileName("file name is empty".into()));
    }
    if trimmed == "." || trimmed == ".." {
        return Err(PdfProError::InvalidFileName(format!("{name:?} is not a file name")));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(PdfProError::InvalidFileName(format!(
            "{name:?} contains a path separator"
        )));
    }
    Ok(())
}

/// Compute the SHA-256 of `data` as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Register `file_name` as `mime_type` and stream `bytes` into it.
pub fn persist<S>(store: &S, file_name: &str, mime_type: &str, bytes: &[u8]) -> Result<SavedDocument>
where
    S: NativeDownloads + ?Sized,
{
    let entry = store.create_entry(file_name, mime_type)?;

    let written = store.open_stream(&entry).and_then(|mut stream| {
        stream.write_all(bytes)?;
        stream.flush()?;
        Ok(())
    });

    if let Err(e) = written {
        if let Err(discard) = store.discard_entry(&entry) {
            warn!(uri = %entry.uri, error = %discard, "could not discard partially written entry");
        }
        return Err(e);
    }

    Ok(SavedDocument {
        bytes: bytes.len(),
        sha256: hash_bytes(bytes),
        entry,
    })
}

/// Run the whole save synchronously. Call from a blocking worker.
pub fn save<S>(store: &S, request: &SaveRequest) -> Result<SavedDocument>
where
    S: NativeDownloads + ?Sized,
{
    validate_file_name(&request.file_name)?;
    let bytes = decode_payload(&request.payload)?;
    debug!(file_name = %request.file_name, bytes = bytes.len(), "payload decoded");
    persist(store, &request.file_name, request.mime_type(), &bytes)
}

/// Run [`save`] on the blocking pool and post the outcome to the UI context.
///
/// Skipped without a notice when `finishing` is already set, since the
/// shell is being torn down and nobody is left to see it.
pub fn spawn_save<S>(
    workers: &tokio::runtime::Handle,
    store: Arc<S>,
    request: SaveRequest,
    finishing: Arc<AtomicBool>,
    ui: UiHandle,
) -> JoinHandle<()>
where
    S: NativeDownloads + Send + Sync + ?Sized + 'static,
{
    workers.spawn_blocking(move || {
        if finishing.load(Ordering::Acquire) {
            debug!(file_name = %request.file_name, "shell finishing; save skipped");
            return;
        }
        let outcome = save(store.as_ref(), &request);
        match &outcome {
            Ok(saved) => info!(
                uri = %saved.entry.uri,
                bytes = saved.bytes,
                sha256 = %saved.sha256,
                "document saved to downloads"
            ),
            Err(e) => error!(file_name = %request.file_name, error = %e, "saving document failed"),
        }
        ui.post(UiEvent::SaveCompleted {
            file_name: request.file_name,
            outcome,
        });
    })
}
