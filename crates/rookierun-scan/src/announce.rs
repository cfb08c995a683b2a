// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Announce-once policy for spoken card intros.
//
// Speech is decoupled from rendering: the gate invokes this policy on the
// display transition, so re-renders of the same card can never repeat the
// announcement.

use rookierun_core::types::CardIdentifier;

/// Text-to-speech output seam.  The engine only ever hands over plain text.
pub trait Speaker: Send {
    fn speak(&self, text: &str);
}

/// Tracks which card was last announced so each card speaks at most once.
#[derive(Debug)]
pub struct AnnouncePolicy {
    enabled: bool,
    last_announced: Option<CardIdentifier>,
}

impl AnnouncePolicy {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            last_announced: None,
        }
    }

    /// Whether this card should be announced now.  Marks the card as
    /// announced when returning true.
    pub fn should_announce(&mut self, id: &CardIdentifier) -> bool {
        if !self.enabled {
            return false;
        }
        if self.last_announced.as_ref() == Some(id) {
            return false;
        }
        self.last_announced = Some(id.clone());
        true
    }

    /// Clear the marker (end of game); the next card will announce again.
    pub fn reset(&mut self) {
        self.last_announced = None;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
