// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contract between the scan pipeline and the card record store.

use std::future::Future;

use crate::error::Result;
use crate::types::{CardIdentifier, CardRecord};

/// Fetch a single card record by identifier.
///
/// The fetch must be idempotent and safe to abandon mid-flight: the scan
/// pipeline cancels an in-flight lookup whenever a newer scan supersedes it,
/// and discards late results it no longer trusts.  A missing card is
/// reported as [`RookieError::CardNotFound`], not an empty success.
///
/// [`RookieError::CardNotFound`]: crate::error::RookieError::CardNotFound
pub trait CardLookup: Send + Sync + 'static {
    fn fetch(&self, id: CardIdentifier) -> impl Future<Output = Result<CardRecord>> + Send;
}
