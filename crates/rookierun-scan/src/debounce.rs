// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Duplicate-scan suppression.
//
// A physical card held in front of the camera decodes many times per second;
// without this filter every frame would trigger a redundant lookup.  The
// debouncer suppresses only immediate repeats of the last accepted card — a
// different card always passes straight through.

use std::time::{Duration, Instant};

use rookierun_core::types::CardIdentifier;

/// Stateful filter over accepted card identifiers.
///
/// The last-accepted identifier and timestamp are owned exclusively here;
/// nothing else in the pipeline tracks scan history.
#[derive(Debug)]
pub struct ScanDebouncer {
    window: Duration,
    last: Option<(CardIdentifier, Instant)>,
}

impl ScanDebouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Decide whether a decoded identifier should pass downstream.
    ///
    /// A distinct identifier is accepted unconditionally.  A repeat of the
    /// immediately-preceding identifier is rejected inside the window and
    /// accepted (with a refreshed timestamp) once the window has elapsed.
    pub fn should_accept(&mut self, id: &CardIdentifier, now: Instant) -> bool {
        if let Some((last_id, last_at)) = &self.last {
            if last_id == id && now.duration_since(*last_at) < self.window {
                return false;
            }
        }
        self.last = Some((id.clone(), now));
        true
    }

    /// Forget the last scan, e.g. when a session restarts.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
