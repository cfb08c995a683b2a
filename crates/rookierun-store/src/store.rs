// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Persistent card record store backed by SQLite.
//
// Card text fields are stored as plain columns so the deck can be inspected
// with any SQLite tool; only the optional fields use NULL.  Records import
// idempotently: re-running an import upserts by identifier.

use rusqlite::{Connection, params};
use tracing::{debug, info, instrument};

use rookierun_core::error::{Result, RookieError};
use rookierun_core::types::{CardIdentifier, CardRecord};

/// SQLite schema for the cards table.
const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS cards (
        id TEXT PRIMARY KEY,
        deck TEXT NOT NULL,
        sport TEXT NOT NULL,
        athlete_name TEXT NOT NULL,
        athlete_blurb TEXT,
        rookie_year INTEGER NOT NULL,
        event_label TEXT,
        league TEXT,
        source_url TEXT,
        spoken_intro TEXT
    )
"#;

const SELECT_COLUMNS: &str = "id, deck, sport, athlete_name, athlete_blurb, rookie_year,
         event_label, league, source_url, spoken_intro";

/// Persistent card store backed by a SQLite database.
///
/// All methods are synchronous because `rusqlite` does not support async
/// natively.  In an async context, wrap calls in `tokio::task::spawn_blocking`
/// (see [`crate::lookup::StoreLookup`]).
pub struct CardStore {
    conn: Connection,
}

impl CardStore {
    /// Open (or create) the card database at the given path.
    ///
    /// Applies WAL journal mode for better concurrent-read behaviour and
    /// creates the `cards` table if it does not exist.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| RookieError::Database(format!("open: {e}")))?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| RookieError::Database(format!("WAL pragma: {e}")))?;

        conn.execute_batch(CREATE_TABLE_SQL)
            .map_err(|e| RookieError::Database(format!("create table: {e}")))?;

        info!("card database opened");
        Ok(Self { conn })
    }

    /// Open an in-memory database (useful for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| RookieError::Database(format!("open in-memory: {e}")))?;

        conn.execute_batch(CREATE_TABLE_SQL)
            .map_err(|e| RookieError::Database(format!("create table: {e}")))?;

        debug!("in-memory card database opened");
        Ok(Self { conn })
    }

    /// Insert or replace a single card record.
    #[instrument(skip(self, card), fields(id = %card.id))]
    pub fn upsert_card(&self, card: &CardRecord) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO cards (id, deck, sport, athlete_name, athlete_blurb,
                 rookie_year, event_label, league, source_url, spoken_intro)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    card.id.as_str(),
                    card.deck,
                    card.sport,
                    card.athlete_name,
                    card.athlete_blurb,
                    card.rookie_year,
                    card.event_label,
                    card.league,
                    card.source_url,
                    card.spoken_intro,
                ],
            )
            .map_err(|e| RookieError::Database(format!("upsert card: {e}")))?;

        debug!(id = %card.id, "card upserted");
        Ok(())
    }

    /// Import a batch of cards in a single transaction.
    ///
    /// Returns the number of records written.  All-or-nothing: a failure
    /// partway through rolls the whole batch back.
    #[instrument(skip(self, cards), fields(count = cards.len()))]
    pub fn import_cards(&mut self, cards: &[CardRecord]) -> Result<usize> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| RookieError::Database(format!("begin import: {e}")))?;

        for card in cards {
            tx.execute(
                "INSERT OR REPLACE INTO cards (id, deck, sport, athlete_name, athlete_blurb,
                 rookie_year, event_label, league, source_url, spoken_intro)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    card.id.as_str(),
                    card.deck,
                    card.sport,
                    card.athlete_name,
                    card.athlete_blurb,
                    card.rookie_year,
                    card.event_label,
                    card.league,
                    card.source_url,
                    card.spoken_intro,
                ],
            )
            .map_err(|e| RookieError::Database(format!("import {}: {e}", card.id)))?;
        }

        tx.commit()
            .map_err(|e| RookieError::Database(format!("commit import: {e}")))?;

        info!(count = cards.len(), "cards imported");
        Ok(cards.len())
    }

    /// Retrieve a single card by identifier.  Returns `None` if absent.
    #[instrument(skip(self), fields(id = %id))]
    pub fn get_card(&self, id: &CardIdentifier) -> Result<Option<CardRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {SELECT_COLUMNS} FROM cards WHERE id = ?1"))
            .map_err(|e| RookieError::Database(format!("prepare get_card: {e}")))?;

        let mut rows = stmt
            .query_map(params![id.as_str()], row_to_card)
            .map_err(|e| RookieError::Database(format!("query get_card: {e}")))?;

        match rows.next() {
            Some(Ok(card)) => Ok(Some(card)),
            Some(Err(e)) => Err(RookieError::Database(format!("row parse: {e}"))),
            None => Ok(None),
        }
    }

    /// Retrieve a batch of cards by identifier.
    ///
    /// Rows come back in database order, not request order; identifiers with
    /// no matching row are simply absent from the result.  Callers that need
    /// request order re-sort afterwards.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub fn get_many(&self, ids: &[CardIdentifier]) -> Result<Vec<CardRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders: Vec<String> = (1..=ids.len()).map(|n| format!("?{n}")).collect();
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM cards WHERE id IN ({}) ORDER BY id",
            placeholders.join(", ")
        );

        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| RookieError::Database(format!("prepare get_many: {e}")))?;

        let param_values: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        let cards = stmt
            .query_map(rusqlite::params_from_iter(param_values), row_to_card)
            .map_err(|e| RookieError::Database(format!("query get_many: {e}")))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| RookieError::Database(format!("collect rows: {e}")))?;

        debug!(requested = ids.len(), found = cards.len(), "batch retrieved");
        Ok(cards)
    }

    /// List a deck's cards in stable identifier order, paginated.
    #[instrument(skip(self))]
    pub fn list_deck(&self, deck: &str, limit: usize, offset: usize) -> Result<Vec<CardRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM cards WHERE deck = ?1
                 ORDER BY id LIMIT ?2 OFFSET ?3"
            ))
            .map_err(|e| RookieError::Database(format!("prepare list_deck: {e}")))?;

        let cards = stmt
            .query_map(params![deck, limit as i64, offset as i64], row_to_card)
            .map_err(|e| RookieError::Database(format!("query list_deck: {e}")))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| RookieError::Database(format!("collect rows: {e}")))?;

        debug!(deck, count = cards.len(), "deck page listed");
        Ok(cards)
    }

    /// Number of cards in the store.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))
            .map_err(|e| RookieError::Database(format!("count: {e}")))?;
        Ok(count as usize)
    }

    /// Delete a card.  Idempotent: deleting an absent card succeeds.
    #[instrument(skip(self), fields(id = %id))]
    pub fn delete_card(&self, id: &CardIdentifier) -> Result<()> {
        self.conn
            .execute("DELETE FROM cards WHERE id = ?1", params![id.as_str()])
            .map_err(|e| RookieError::Database(format!("delete card: {e}")))?;

        info!(id = %id, "card deleted");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

/// Map a SQLite row to a `CardRecord`.
///
/// Column indices must match the SELECT order used in the query methods above.
fn row_to_card(row: &rusqlite::Row<'_>) -> rusqlite::Result<CardRecord> {
    let id_str: String = row.get(0)?;
    let id = CardIdentifier::parse(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(CardRecord {
        id,
        deck: row.get(1)?,
        sport: row.get(2)?,
        athlete_name: row.get(3)?,
        athlete_blurb: row.get(4)?,
        rookie_year: row.get(5)?,
        event_label: row.get(6)?,
        league: row.get(7)?,
        source_url: row.get(8)?,
        spoken_intro: row.get(9)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> CardIdentifier {
        CardIdentifier::parse(s).expect("valid id")
    }

    fn test_card(token: &str) -> CardRecord {
        CardRecord {
            id: id(token),
            deck: "Rookie Run".into(),
            sport: "Baseball".into(),
            athlete_name: "Ken Griffey Jr.".into(),
            athlete_blurb: Some("Sweetest swing in the game.".into()),
            rookie_year: 1989,
            event_label: None,
            league: Some("MLB".into()),
            source_url: None,
            spoken_intro: Some("Rookie year nineteen eighty-nine.".into()),
        }
    }

    #[test]
    fn upsert_and_retrieve_card() {
        let store = CardStore::open_in_memory().expect("open in-memory db");
        let card = test_card("RR-MLB-002");
        store.upsert_card(&card).expect("upsert");

        let found = store.get_card(&card.id).expect("get_card").expect("found");
        assert_eq!(found, card);
    }

    #[test]
    fn upsert_replaces_by_identifier() {
        let store = CardStore::open_in_memory().expect("open in-memory db");
        let mut card = test_card("RR-MLB-002");
        store.upsert_card(&card).expect("first upsert");

        card.athlete_name = "Corrected Name".into();
        store.upsert_card(&card).expect("second upsert");

        assert_eq!(store.count().expect("count"), 1);
        let found = store.get_card(&card.id).expect("get_card").expect("found");
        assert_eq!(found.athlete_name, "Corrected Name");
    }

    #[test]
    fn import_is_transactional_and_idempotent() {
        let mut store = CardStore::open_in_memory().expect("open in-memory db");
        let cards = vec![test_card("RR-MLB-002"), test_card("RR-NHL-014")];

        assert_eq!(store.import_cards(&cards).expect("import"), 2);
        // Re-import upserts rather than duplicating.
        assert_eq!(store.import_cards(&cards).expect("re-import"), 2);
        assert_eq!(store.count().expect("count"), 2);
    }

    #[test]
    fn get_nonexistent_card_returns_none() {
        let store = CardStore::open_in_memory().expect("open in-memory db");
        let result = store.get_card(&id("RR-MLB-099")).expect("get_card");
        assert!(result.is_none());
    }

    #[test]
    fn get_many_skips_missing_identifiers() {
        let mut store = CardStore::open_in_memory().expect("open in-memory db");
        store
            .import_cards(&[test_card("RR-MLB-002"), test_card("RR-NHL-014")])
            .expect("import");

        let found = store
            .get_many(&[id("RR-MLB-002"), id("RR-MLB-099"), id("RR-NHL-014")])
            .expect("get_many");
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn get_many_with_empty_request_is_empty() {
        let store = CardStore::open_in_memory().expect("open in-memory db");
        assert!(store.get_many(&[]).expect("get_many").is_empty());
    }

    #[test]
    fn list_deck_paginates_in_identifier_order() {
        let mut store = CardStore::open_in_memory().expect("open in-memory db");
        let cards: Vec<CardRecord> = (1..=12)
            .map(|n| test_card(&format!("RR-MLB-{n:03}")))
            .collect();
        store.import_cards(&cards).expect("import");

        let page1 = store.list_deck("Rookie Run", 9, 0).expect("page 1");
        let page2 = store.list_deck("Rookie Run", 9, 9).expect("page 2");

        assert_eq!(page1.len(), 9);
        assert_eq!(page2.len(), 3);
        assert_eq!(page1[0].id.as_str(), "RR-MLB-001");
        assert_eq!(page2[0].id.as_str(), "RR-MLB-010");
    }

    #[test]
    fn list_deck_filters_by_deck_name() {
        let store = CardStore::open_in_memory().expect("open in-memory db");
        let mut other = test_card("RR-NFL-001");
        other.deck = "Expansion".into();
        store.upsert_card(&test_card("RR-MLB-002")).expect("upsert");
        store.upsert_card(&other).expect("upsert");

        let rookie_run = store.list_deck("Rookie Run", 100, 0).expect("list");
        assert_eq!(rookie_run.len(), 1);
        assert_eq!(rookie_run[0].id.as_str(), "RR-MLB-002");
    }

    #[test]
    fn delete_card_is_idempotent() {
        let store = CardStore::open_in_memory().expect("open in-memory db");
        let card = test_card("RR-MLB-002");
        store.upsert_card(&card).expect("upsert");

        store.delete_card(&card.id).expect("delete first time");
        store.delete_card(&card.id).expect("delete second time");
        assert!(store.get_card(&card.id).expect("get_card").is_none());
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cards.db");

        {
            let store = CardStore::open(&path).expect("open");
            store.upsert_card(&test_card("RR-MLB-002")).expect("upsert");
        }

        let store = CardStore::open(&path).expect("reopen");
        assert_eq!(store.count().expect("count"), 1);
    }
}
