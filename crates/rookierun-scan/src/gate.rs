// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Result gate: coordinates debounced scans with the card lookup.
//
// Exactly one lookup may be in flight.  A newer scan aborts the older task,
// but abort is cooperative — the generation counter on each posted outcome
// is the guard that actually prevents a slow stale response from
// overwriting a newer card.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use rookierun_core::error::{Result, RookieError};
use rookierun_core::human_errors::{HumanError, humanize_error};
use rookierun_core::lookup::CardLookup;
use rookierun_core::types::{CardIdentifier, CardRecord};

use crate::announce::{AnnouncePolicy, Speaker};

/// What the gate wants the capture session to do after a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureDirective {
    /// A card (or an error card) is on screen — stop forwarding decodes.
    Pause,
    /// The overlay was dismissed — forward decodes again.
    Resume,
}

/// What the scan screen should currently show.
#[derive(Debug, Clone)]
pub enum GateView {
    /// Nothing resolved; the camera preview fills the screen.
    Scanning,
    /// A lookup is in flight for this card.
    Loading(CardIdentifier),
    /// The resolved athlete card.
    Card(CardRecord),
    /// The lookup failed; dismissible.
    Failed {
        id: CardIdentifier,
        error: HumanError,
    },
}

/// Internal message from a lookup task back to the gate.
type Outcome = (u64, CardIdentifier, Result<CardRecord>);

/// Single-flight lookup coordinator.
pub struct ResultGate<L: CardLookup> {
    lookup: Arc<L>,
    lookup_timeout: Duration,
    generation: u64,
    inflight: Option<JoinHandle<()>>,
    outcomes_tx: mpsc::UnboundedSender<Outcome>,
    outcomes_rx: mpsc::UnboundedReceiver<Outcome>,
    view: GateView,
    announcer: AnnouncePolicy,
    speaker: Option<Box<dyn Speaker>>,
}

impl<L: CardLookup> ResultGate<L> {
    pub fn new(lookup: Arc<L>, lookup_timeout: Duration, announcer: AnnouncePolicy) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            lookup,
            lookup_timeout,
            generation: 0,
            inflight: None,
            outcomes_tx,
            outcomes_rx,
            view: GateView::Scanning,
            announcer,
            speaker: None,
        }
    }

    /// Attach a text-to-speech sink for spoken card intros.
    pub fn with_speaker(mut self, speaker: Box<dyn Speaker>) -> Self {
        self.speaker = Some(speaker);
        self
    }

    pub fn view(&self) -> &GateView {
        &self.view
    }

    /// Start a lookup for a freshly scanned card.
    ///
    /// Any in-flight lookup is cancelled first; its eventual result (if the
    /// abort loses the race) is discarded by generation comparison.
    pub fn submit(&mut self, id: CardIdentifier) {
        if let Some(handle) = self.inflight.take() {
            debug!("superseding in-flight lookup");
            handle.abort();
        }

        self.generation += 1;
        let generation = self.generation;
        self.view = GateView::Loading(id.clone());

        let lookup = Arc::clone(&self.lookup);
        let tx = self.outcomes_tx.clone();
        let deadline = self.lookup_timeout;

        let handle = tokio::spawn(async move {
            let outcome = match tokio::time::timeout(deadline, lookup.fetch(id.clone())).await {
                Ok(result) => result,
                Err(_) => Err(RookieError::LookupTimeout),
            };
            // The gate dropping mid-teardown is not an error.
            let _ = tx.send((generation, id, outcome));
        });
        self.inflight = Some(handle);

        info!(generation, "card lookup started");
    }

    /// Wait for the next lookup outcome that is still current, apply it, and
    /// return the capture directive.
    ///
    /// Stale outcomes (superseded by a newer `submit`) are discarded
    /// silently — cancellation is expected, not failure.  Returns `None` if
    /// the gate is torn down while waiting.
    pub async fn next_directive(&mut self) -> Option<CaptureDirective> {
        while let Some((generation, id, outcome)) = self.outcomes_rx.recv().await {
            if generation != self.generation {
                debug!(generation, current = self.generation, "discarding superseded lookup result");
                continue;
            }
            self.inflight = None;

            match outcome {
                Ok(record) => {
                    info!(id = %record.id, "card resolved");
                    self.announce(&record);
                    self.view = GateView::Card(record);
                }
                Err(err) => {
                    warn!(id = %id, error = %err, "card lookup failed");
                    self.view = GateView::Failed {
                        id,
                        error: humanize_error(&err),
                    };
                }
            }
            // Either way something is on screen; the camera keeps its
            // device but stops forwarding decodes.
            return Some(CaptureDirective::Pause);
        }
        None
    }

    /// Player dismissed the card or error overlay.
    pub fn dismiss(&mut self) -> CaptureDirective {
        if let Some(handle) = self.inflight.take() {
            handle.abort();
        }
        // Anything still in flight is now stale.
        self.generation += 1;
        self.view = GateView::Scanning;
        CaptureDirective::Resume
    }

    /// End of game: clear the display and let the next card speak again
    /// even if it was the last one shown.
    pub fn end_session(&mut self) {
        self.dismiss();
        self.announcer.reset();
    }

    fn announce(&mut self, record: &CardRecord) {
        let Some(text) = record.spoken_intro.as_deref().map(str::trim) else {
            return;
        };
        // An empty intro does not consume the card's announcement.
        if text.is_empty() {
            return;
        }
        if self.announcer.should_announce(&record.id) {
            if let Some(speaker) = &self.speaker {
                speaker.speak(text);
            }
        }
    }
}
