// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The single PendingSelection slot.
//
// The slot is owned by the bridge host and only touched on the UI context,
// so it needs no lock. Every transition hands the completer it removes back
// to the caller; the slot is already in its new state by the time anything
// is resolved, which keeps a resolution callback from observing (or
// re-entering) a half-updated slot.

use pdfpro_core::types::ChooserTicket;

use crate::completer::FileSelectionCompleter;

/// State of the outstanding file-chooser request.
#[derive(Debug, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    AwaitingResult {
        ticket: ChooserTicket,
        completer: FileSelectionCompleter,
    },
}

/// Result of starting a new selection.
#[derive(Debug)]
pub struct Begun {
    /// Ticket to launch the chooser with.
    pub ticket: ChooserTicket,
    /// The request this one replaced; resolve it with no selection.
    pub superseded: Option<FileSelectionCompleter>,
}

/// Holds at most one outstanding selection.
#[derive(Debug, Default)]
pub struct SelectionSlot {
    state: SelectionState,
    issued: u64,
}

impl SelectionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, SelectionState::Idle)
    }

    /// Ticket of the outstanding selection, if any.
    pub fn outstanding(&self) -> Option<ChooserTicket> {
        match &self.state {
            SelectionState::Idle => None,
            SelectionState::AwaitingResult { ticket, .. } => Some(*ticket),
        }
    }

    /// Idle | AwaitingResult → AwaitingResult with a fresh ticket.
    pub fn begin(&mut self, completer: FileSelectionCompleter) -> Begun {
        self.issued += 1;
        let ticket = ChooserTicket(self.issued);
        let previous = std::mem::replace(
            &mut self.state,
            SelectionState::AwaitingResult { ticket, completer },
        );
        Begun {
            ticket,
            superseded: into_completer(previous),
        }
    }

    /// AwaitingResult(ticket) → Idle.
    ///
    /// Returns `None` when `ticket` is not the outstanding one (a stale
    /// chooser result); the slot is left untouched in that case.
    pub fn finish(&mut self, ticket: ChooserTicket) -> Option<FileSelectionCompleter> {
        if self.outstanding() != Some(ticket) {
            return None;
        }
        into_completer(std::mem::take(&mut self.state))
    }

    /// Any → Idle, regardless of ticket.
    pub fn abandon(&mut self) -> Option<FileSelectionCompleter> {
        into_completer(std::mem::take(&mut self.state))
    }
}

fn into_completer(state: SelectionState) -> Option<FileSelectionCompleter> {
    match state {
        SelectionState::Idle => None,
        SelectionState::AwaitingResult { completer, .. } => Some(completer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfpro_core::types::FileHandle;

    #[test]
    fn begin_from_idle_supersedes_nothing() {
        let mut slot = SelectionSlot::new();
        let (completer, _rx) = FileSelectionCompleter::channel();
        let begun = slot.begin(completer);
        assert!(begun.superseded.is_none());
        assert_eq!(slot.outstanding(), Some(begun.ticket));
    }

    #[test]
    fn second_begin_hands_back_first() {
        let mut slot = SelectionSlot::new();
        let (first, first_rx) = FileSelectionCompleter::channel();
        let (second, _second_rx) = FileSelectionCompleter::channel();

        let a = slot.begin(first);
        let b = slot.begin(second);
        assert_ne!(a.ticket, b.ticket);
        assert_eq!(slot.outstanding(), Some(b.ticket));

        b.superseded.expect("first request returned").cancel();
        assert_eq!(first_rx.blocking_recv().unwrap(), None);
    }

    #[test]
    fn stale_ticket_does_not_finish() {
        let mut slot = SelectionSlot::new();
        let (first, _rx1) = FileSelectionCompleter::channel();
        let (second, rx2) = FileSelectionCompleter::channel();
        let a = slot.begin(first);
        let b = slot.begin(second);

        assert!(slot.finish(a.ticket).is_none());
        assert_eq!(slot.outstanding(), Some(b.ticket));

        let current = slot.finish(b.ticket).expect("current ticket finishes");
        assert!(slot.is_idle());
        current.resolve(Some(FileHandle::new("content://doc")));
        assert!(rx2.blocking_recv().unwrap().is_some());
    }

    #[test]
    fn slot_is_idle_before_resolution_runs() {
        let mut slot = SelectionSlot::new();
        let (completer, _rx) = FileSelectionCompleter::channel();
        let begun = slot.begin(completer);
        let taken = slot.finish(begun.ticket);
        assert!(slot.is_idle());
        assert!(taken.is_some());
    }

    #[test]
    fn abandon_empties_slot() {
        let mut slot = SelectionSlot::new();
        assert!(slot.abandon().is_none());
        let (completer, _rx) = FileSelectionCompleter::channel();
        slot.begin(completer);
        assert!(slot.abandon().is_some());
        assert!(slot.is_idle());
    }
}
