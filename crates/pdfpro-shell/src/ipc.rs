// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge wire protocol.
//
// Hosted content talks to the host by posting JSON strings over the webview
// IPC channel; the host answers by evaluating small scripts against the
// `window.__pdfpro` object installed by `bridge_script`.

use serde::{Deserialize, Serialize};
use serde_json::json;

use pdfpro_core::error::{PdfProError, Result};
use pdfpro_core::types::{Notice, NoticeDuration};

use crate::persistence::validate_file_name;
use crate::surface::SurfaceSettings;

/// A message posted by hosted content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BridgeMessage {
    /// `saveBase64Pdf(payload, fileName)`
    SaveBinaryPayload { payload: String, file_name: String },
    /// `toggleStatusBar(show)`
    SetChromeVisibility { show: bool },
    /// Content activated a file input.
    RequestFileSelection { request_id: u64 },
    /// Escape or the mouse back button, when content did not consume it.
    BackNavigation,
}

impl BridgeMessage {
    /// Parse and validate one raw IPC message.
    pub fn parse(raw: &str, max_bytes: usize) -> Result<Self> {
        if raw.len() > max_bytes {
            return Err(PdfProError::BridgeMessage(format!(
                "message of {} bytes exceeds the {max_bytes} byte limit",
                raw.len()
            )));
        }
        let message: BridgeMessage =
            serde_json::from_str(raw).map_err(|e| PdfProError::BridgeMessage(e.to_string()))?;
        if let BridgeMessage::SaveBinaryPayload { file_name, .. } = &message {
            validate_file_name(file_name).map_err(|e| PdfProError::BridgeMessage(e.to_string()))?;
        }
        Ok(message)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BridgeMessage::SaveBinaryPayload { .. } => "saveBinaryPayload",
            BridgeMessage::SetChromeVisibility { .. } => "setChromeVisibility",
            BridgeMessage::RequestFileSelection { .. } => "requestFileSelection",
            BridgeMessage::BackNavigation => "backNavigation",
        }
    }
}

/// The `kind` a rejected message claimed to be, if it was readable JSON.
///
/// Other fields are skipped without being buffered, so this stays cheap on
/// an oversized save payload.
pub fn claimed_kind(raw: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct Claimed {
        kind: String,
    }
    serde_json::from_str::<Claimed>(raw).ok().map(|c| c.kind)
}

/// Encode a Rust string as a JavaScript string literal.
fn js_string(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}

/// Script that resolves selection `request_id` in hosted content.
///
/// `granted` is the `(uri, name)` content may fetch the picked bytes from.
pub fn selection_script(request_id: u64, granted: Option<(&str, &str)>) -> String {
    let handle = match granted {
        Some((uri, name)) => json!({ "uri": uri, "name": name }),
        None => serde_json::Value::Null,
    };
    format!("window.__pdfpro && window.__pdfpro.resolveSelection({request_id}, {handle});")
}

/// Script that shows `notice` as an in-page toast.
pub fn toast_script(notice: &Notice) -> String {
    let kind = serde_json::to_value(notice.kind)
        .map(|v| v.to_string())
        .unwrap_or_else(|_| "\"progress\"".into());
    let long = notice.duration == NoticeDuration::Long;
    format!(
        "window.__pdfpro && window.__pdfpro.toast({kind}, {}, {long});",
        js_string(&notice.message)
    )
}

const BRIDGE_TEMPLATE: &str = r#"(function () {
  if (window.__pdfpro) { return; }
  var post = function (message) { window.ipc.postMessage(JSON.stringify(message)); };

  window[__BRIDGE_NAME__] = {
    saveBase64Pdf: function (payload, fileName) {
      post({ kind: 'saveBinaryPayload', payload: String(payload), fileName: String(fileName) });
    },
    toggleStatusBar: function (show) {
      post({ kind: 'setChromeVisibility', show: show === true });
    }
  };

  var pending = {};
  var nextRequest = 1;

  window.__pdfpro = {
    resolveSelection: function (id, handle) {
      var input = pending[id];
      delete pending[id];
      if (!input) { return; }
      if (!handle) {
        input.dispatchEvent(new Event('cancel', { bubbles: true }));
        return;
      }
      fetch(handle.uri)
        .then(function (response) { return response.blob(); })
        .then(function (blob) {
          var file = new File([blob], handle.name || 'document.pdf', { type: 'application/pdf' });
          var transfer = new DataTransfer();
          transfer.items.add(file);
          input.files = transfer.files;
          input.dispatchEvent(new Event('input', { bubbles: true }));
          input.dispatchEvent(new Event('change', { bubbles: true }));
        })
        .catch(function () {
          input.dispatchEvent(new Event('cancel', { bubbles: true }));
        });
    },
    toast: function (kind, message, long) {
      var el = document.createElement('div');
      el.textContent = message;
      el.setAttribute('role', 'status');
      el.dataset.kind = kind;
      el.style.cssText = 'position:fixed;left:50%;bottom:48px;transform:translateX(-50%);' +
        'max-width:80%;padding:10px 16px;border-radius:20px;z-index:2147483647;' +
        'font:14px sans-serif;color:#fff;pointer-events:none;' +
        'background:' + (kind === 'failure' ? 'rgba(176,0,32,.9)' : 'rgba(40,40,40,.9)');
      (document.body || document.documentElement).appendChild(el);
      setTimeout(function () { el.remove(); }, long ? 3500 : 2000);
    }
  };

  document.addEventListener('click', function (event) {
    var input = event.target;
    if (!(input instanceof HTMLInputElement) || input.type !== 'file') { return; }
    event.preventDefault();
    var id = nextRequest++;
    pending[id] = input;
    post({ kind: 'requestFileSelection', requestId: id });
  }, true);

  window.addEventListener('keydown', function (event) {
    if (event.key === 'Escape' && !event.defaultPrevented) { post({ kind: 'backNavigation' }); }
  });
  window.addEventListener('mouseup', function (event) {
    if (event.button === 3 && !event.defaultPrevented) { post({ kind: 'backNavigation' }); }
  });

  var style = document.createElement('style');
  style.textContent = __STYLESHEET__;
  document.addEventListener('DOMContentLoaded', function () { document.head.appendChild(style); });
})();"#;

/// Initialisation script installing the bridge object named `bridge_name`
/// and the host → content helpers.
pub fn bridge_script(bridge_name: &str, settings: &SurfaceSettings) -> String {
    BRIDGE_TEMPLATE
        .replace("__BRIDGE_NAME__", &js_string(bridge_name))
        .replace("__STYLESHEET__", &js_string(&settings.stylesheet()))
}

/// Script that withdraws the bridge object from the current document.
pub fn removal_script(bridge_name: &str) -> String {
    format!(
        "try {{ delete window[{name}]; delete window.__pdfpro; }} catch (e) {{}}",
        name = js_string(bridge_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfpro_core::config::DEFAULT_MAX_MESSAGE_BYTES;

    #[test]
    fn parses_save_request() {
        let raw = r#"{"kind":"saveBinaryPayload","payload":"JVBERg==","fileName":"report.pdf"}"#;
        let message = BridgeMessage::parse(raw, DEFAULT_MAX_MESSAGE_BYTES).unwrap();
        assert_eq!(
            message,
            BridgeMessage::SaveBinaryPayload {
                payload: "JVBERg==".into(),
                file_name: "report.pdf".into(),
            }
        );
    }

    #[test]
    fn parses_remaining_kinds() {
        let max = DEFAULT_MAX_MESSAGE_BYTES;
        assert_eq!(
            BridgeMessage::parse(r#"{"kind":"setChromeVisibility","show":false}"#, max).unwrap(),
            BridgeMessage::SetChromeVisibility { show: false }
        );
        assert_eq!(
            BridgeMessage::parse(r#"{"kind":"requestFileSelection","requestId":3}"#, max).unwrap(),
            BridgeMessage::RequestFileSelection { request_id: 3 }
        );
        assert_eq!(
            BridgeMessage::parse(r#"{"kind":"backNavigation"}"#, max).unwrap(),
            BridgeMessage::BackNavigation
        );
    }

    #[test]
    fn rejects_bad_messages() {
        let max = DEFAULT_MAX_MESSAGE_BYTES;
        for raw in [
            "not json",
            r#"{"kind":"launchMissiles"}"#,
            r#"{"kind":"setChromeVisibility","show":"yes"}"#,
            r#"{"kind":"saveBinaryPayload","payload":"JVBERg=="}"#,
            r#"{"kind":"saveBinaryPayload","payload":"JVBERg==","fileName":"../x.pdf"}"#,
            r#"{"kind":"saveBinaryPayload","payload":"JVBERg==","fileName":""}"#,
        ] {
            let err = BridgeMessage::parse(raw, max).unwrap_err();
            assert!(matches!(err, PdfProError::BridgeMessage(_)), "{raw}: {err}");
        }
    }

    #[test]
    fn oversized_message_is_refused() {
        let raw = r#"{"kind":"backNavigation"}"#;
        assert!(BridgeMessage::parse(raw, 8).is_err());
    }

    #[test]
    fn claimed_kind_survives_rejection() {
        let raw = r#"{"kind":"saveBinaryPayload","payload":"x","fileName":"a/b"}"#;
        assert_eq!(claimed_kind(raw).as_deref(), Some("saveBinaryPayload"));
        assert_eq!(claimed_kind("garbage"), None);
    }

    #[test]
    fn selection_script_escapes_names() {
        let script = selection_script(7, Some(("app://localhost/__granted/x", "a \"b\".pdf")));
        assert!(script.contains("resolveSelection(7, {"));
        assert!(script.contains(r#"a \"b\".pdf"#));
        assert_eq!(
            selection_script(2, None),
            "window.__pdfpro && window.__pdfpro.resolveSelection(2, null);"
        );
    }

    #[test]
    fn toast_script_carries_duration() {
        let script = toast_script(&Notice::success("Saved to Downloads: a.pdf"));
        assert_eq!(
            script,
            r#"window.__pdfpro && window.__pdfpro.toast("success", "Saved to Downloads: a.pdf", true);"#
        );
        assert!(toast_script(&Notice::progress("Saving…")).ends_with("false);"));
    }

    #[test]
    fn bridge_script_names_the_bridge() {
        let script = bridge_script("Android", &SurfaceSettings::fixed());
        assert!(script.contains(r#"window["Android"] = {"#));
        assert!(script.contains("saveBase64Pdf"));
        assert!(script.contains("overscroll-behavior: none"));
        assert!(!script.contains("__BRIDGE_NAME__"));
    }
}
