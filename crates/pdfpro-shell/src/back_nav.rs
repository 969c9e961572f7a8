// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Back-navigation delegation.
//
// Hosted content gets first refusal on every back press through an optional
// content-defined function. Each press is decided exactly once: by the
// hook's answer, by an evaluation failure, or by the optional timeout,
// whichever reaches the UI context first.

use std::collections::HashSet;
use std::time::Duration;

use pdfpro_core::error::Result;

/// Identifies one back press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BackPressId(pub u64);

impl std::fmt::Display for BackPressId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "back#{}", self.0)
    }
}

/// What the host does with a back press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackDecision {
    /// Hosted content handled it.
    Suppress,
    /// Perform the host's own back navigation.
    Default,
}

/// Script evaluated in hosted content on a back press.
///
/// Evaluates to `false` when the hook is absent, so a missing hook can never
/// block navigation.
pub fn hook_script(function_name: &str) -> String {
    format!(
        "(function() {{ return typeof {function_name} === 'function' ? {function_name}() : false; }})()"
    )
}

/// Whether the serialised hook result means "handled".
///
/// The result is the JSON serialisation of the returned value, so only a
/// literal `true` counts; `"true"` (a string), `1` and `null` do not.
pub fn hook_handled(serialised: &str) -> bool {
    serialised.trim() == "true"
}

/// Tracks back presses whose outcome is still open.
#[derive(Debug, Default)]
pub struct BackNavigator {
    issued: u64,
    open: HashSet<BackPressId>,
    timeout: Option<Duration>,
}

impl BackNavigator {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Open a new press awaiting the hook.
    pub fn begin(&mut self) -> BackPressId {
        self.issued += 1;
        let press = BackPressId(self.issued);
        self.open.insert(press);
        press
    }

    /// Decide `press` from the hook's answer. `None` if it was already decided.
    pub fn answer(&mut self, press: BackPressId, outcome: &Result<String>) -> Option<BackDecision> {
        if !self.open.remove(&press) {
            return None;
        }
        let handled = match outcome {
            Ok(serialised) => hook_handled(serialised),
            Err(e) => {
                tracing::debug!(%press, error = %e, "back hook evaluation failed; treating as not handled");
                false
            }
        };
        Some(if handled {
            BackDecision::Suppress
        } else {
            BackDecision::Default
        })
    }

    /// Decide `press` after the timeout. `None` if it was already decided.
    pub fn expire(&mut self, press: BackPressId) -> Option<BackDecision> {
        self.open.remove(&press).then_some(BackDecision::Default)
    }

    /// Forget every open press (teardown).
    pub fn clear(&mut self) {
        self.open.clear();
    }
}
