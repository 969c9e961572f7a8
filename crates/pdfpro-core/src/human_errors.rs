// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for transient notifications.
//
// Every technical error is mapped to a plain sentence plus a suggestion. The
// technical cause is still appended to the notice so users can report it.

use crate::error::PdfProError;
use crate::types::Notice;

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    pub message: String,
    pub suggestion: String,
}

/// Convert a `PdfProError` into something a non-technical user can act on.
pub fn humanize_error(err: &PdfProError) -> HumanError {
    match err {
        PdfProError::PayloadDecode(_) => HumanError {
            message: "The document data was damaged and could not be saved.".into(),
            suggestion: "Export the document again, then save it.".into(),
        },

        PdfProError::InvalidFileName(_) => HumanError {
            message: "That file name can't be used.".into(),
            suggestion: "Choose a name without slashes and try again.".into(),
        },

        PdfProError::EntryCreation(_) => HumanError {
            message: "The file could not be created in Downloads.".into(),
            suggestion: "Check that storage is not full, then try again.".into(),
        },

        PdfProError::StreamUnavailable(_) | PdfProError::Io(_) => HumanError {
            message: "Writing the file failed.".into(),
            suggestion: "Free up some space and try saving again.".into(),
        },

        PdfProError::ChooserLaunch(_) => HumanError {
            message: "No app is available to pick a PDF.".into(),
            suggestion: "Install a file manager, then try again.".into(),
        },

        PdfProError::BridgeMessage(_)
        | PdfProError::Serialization(_)
        | PdfProError::Surface(_)
        | PdfProError::BackHook(_)
        | PdfProError::Bridge(_)
        | PdfProError::Config(_) => HumanError {
            message: "Something went wrong inside the app.".into(),
            suggestion: "Try again. If it keeps happening, restart the app.".into(),
        },
    }
}

/// Failure notice for a save: plain message, what to do about it, then the
/// technical cause.
pub fn save_failure_notice(err: &PdfProError) -> Notice {
    let human = humanize_error(err);
    Notice::failure(format!(
        "Save failed: {} {} ({err})",
        human.message, human.suggestion
    ))
}
