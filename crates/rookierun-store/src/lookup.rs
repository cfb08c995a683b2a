// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Async lookup over the synchronous store.
//
// rusqlite is blocking, so each fetch hops to the blocking thread pool.  The
// scan pipeline aborts abandoned lookups at the task level; a blocking query
// that has already started simply finishes and its result is discarded.

use std::sync::{Arc, Mutex};

use tokio::task;
use tracing::debug;

use rookierun_core::error::{Result, RookieError};
use rookierun_core::lookup::CardLookup;
use rookierun_core::types::{CardIdentifier, CardRecord};

use crate::store::CardStore;

/// [`CardLookup`] implementation backed by the local SQLite store.
#[derive(Clone)]
pub struct StoreLookup {
    store: Arc<Mutex<CardStore>>,
}

impl StoreLookup {
    pub fn new(store: CardStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Shared handle to the underlying store, for callers that also need
    /// synchronous access (imports, sheet generation).
    pub fn store(&self) -> Arc<Mutex<CardStore>> {
        Arc::clone(&self.store)
    }
}

impl CardLookup for StoreLookup {
    fn fetch(&self, id: CardIdentifier) -> impl Future<Output = Result<CardRecord>> + Send {
        let store = Arc::clone(&self.store);
        async move {
            let found = task::spawn_blocking(move || {
                let guard = store
                    .lock()
                    .map_err(|_| RookieError::Database("store mutex poisoned".into()))?;
                guard.get_card(&id).map(|card| (id, card))
            })
            .await
            .map_err(|e| RookieError::LookupFailed(format!("lookup task: {e}")))??;

            let (id, card) = found;
            match card {
                Some(record) => {
                    debug!(id = %id, "card resolved");
                    Ok(record)
                }
                None => Err(RookieError::CardNotFound(id)),
            }
        }
    }
}
