// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// rookierun-store — SQLite-backed card record store.
//
// Persists the deck's card records locally and exposes both the synchronous
// store (used by the print tooling) and the async lookup implementation the
// scan pipeline resolves cards through.

pub mod lookup;
pub mod store;

pub use lookup::StoreLookup;
pub use store::CardStore;
