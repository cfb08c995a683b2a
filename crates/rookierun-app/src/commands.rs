// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommand dispatch for the `rookierun` binary.
//
// No CLI framework: three subcommands with positional arguments.  All state
// lives in the current directory — `rookierun.json` for configuration (written
// with defaults on first run) and `rookierun.db` for the card store.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use rookierun_core::config::AppConfig;
use rookierun_core::error::{Result, RookieError};
use rookierun_core::types::{CardIdentifier, CardRecord};
use rookierun_print::layout::{DuplexLayoutEngine, order_by_requested, page_slice};
use rookierun_print::qr::export_qr_pngs;
use rookierun_print::sheet::SheetRenderer;
use rookierun_store::CardStore;

const CONFIG_FILE: &str = "rookierun.json";
const DB_FILE: &str = "rookierun.db";
const DEFAULT_DECK: &str = "Rookie Run";

const USAGE: &str = "usage: rookierun <command>

commands:
  import <cards.json>              load card records into the local store
  sheets <out_dir> [page] [id ...] render duplex front/back sheet PDFs
                                   (page defaults to 1; with explicit card ids
                                   the sheet follows the given order instead
                                   of deck order)
  qr <out_dir>                     export one QR PNG per stored card";

pub fn dispatch(args: &[String]) -> Result<()> {
    let config = load_or_init_config(Path::new(CONFIG_FILE))?;

    match args {
        [cmd, path] if cmd == "import" => import_cards(&config, Path::new(path)),
        [cmd, out, rest @ ..] if cmd == "sheets" => {
            // An optional page number may precede the id list; card ids never
            // parse as integers so the forms cannot collide.
            let (page, id_args) = match rest.first().map(|a| a.parse::<usize>()) {
                Some(Ok(page)) => (page, &rest[1..]),
                _ => (1, rest),
            };
            let explicit = parse_ids(id_args)?;
            render_sheets(&config, Path::new(out), page, &explicit)
        }
        [cmd, out] if cmd == "qr" => export_qr(&config, Path::new(out)),
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }
}

/// Load configuration, writing the defaults to disk on first run so the file
/// exists for users to edit.
fn load_or_init_config(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        let raw = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&raw)?;
        Ok(config)
    } else {
        let config = AppConfig::default();
        std::fs::write(path, serde_json::to_string_pretty(&config)?)?;
        info!(path = %path.display(), "default configuration written");
        Ok(config)
    }
}

/// Validate a list of card id arguments through the shared validator.
fn parse_ids(args: &[String]) -> Result<Vec<CardIdentifier>> {
    args.iter().map(|arg| CardIdentifier::parse(arg)).collect()
}

/// `import <cards.json>` — load card records from a JSON array into the store.
#[instrument(skip(_config))]
fn import_cards(_config: &AppConfig, path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(path)?;
    let cards: Vec<CardRecord> = serde_json::from_str(&raw)?;

    let mut store = CardStore::open(db_path())?;
    let written = store.import_cards(&cards)?;

    info!(written, from = %path.display(), "import complete");
    println!("imported {written} cards");
    Ok(())
}

/// Pick the cards for one sheet: a capacity-sized page of the deck in
/// identifier order, or — when an explicit id list is given — the matching
/// page of that list, in the caller's order, with unknown ids dropped.
fn select_page_cards(
    store: &CardStore,
    capacity: usize,
    page: usize,
    explicit: &[CardIdentifier],
) -> Result<Vec<CardRecord>> {
    if explicit.is_empty() {
        let offset = page.max(1).saturating_sub(1) * capacity;
        return store.list_deck(DEFAULT_DECK, capacity, offset);
    }

    let requested = page_slice(explicit, page, capacity);
    let rows = store.get_many(requested)?;
    Ok(order_by_requested(requested, rows))
}

/// `sheets <out_dir> [page] [id ...]` — lay out one page of cards and render
/// the duplex pair to `sheet-<page>-front.pdf` / `sheet-<page>-back.pdf`.
#[instrument(skip(config, explicit), fields(explicit = explicit.len()))]
fn render_sheets(
    config: &AppConfig,
    out_dir: &Path,
    page: usize,
    explicit: &[CardIdentifier],
) -> Result<()> {
    let store = CardStore::open(db_path())?;

    let cards = select_page_cards(&store, config.sheet.capacity(), page, explicit)?;
    if cards.is_empty() {
        return Err(RookieError::Layout(format!("no cards on page {page}")));
    }

    let engine = DuplexLayoutEngine::new(&config.sheet)?;
    let pair = engine.layout(cards);

    let renderer = SheetRenderer::new(config.sheet.clone());
    let (front, back) = renderer.render_pair(&pair, &config.base_url)?;

    std::fs::create_dir_all(out_dir)?;
    let front_path = out_dir.join(format!("sheet-{page}-front.pdf"));
    let back_path = out_dir.join(format!("sheet-{page}-back.pdf"));
    std::fs::write(&front_path, &front)?;
    std::fs::write(&back_path, &back)?;

    info!(front = %front_path.display(), back = %back_path.display(), "sheet pair written");
    println!("wrote {} and {}", front_path.display(), back_path.display());
    Ok(())
}

/// `qr <out_dir>` — export a standalone QR PNG for every stored card.
#[instrument(skip(config))]
fn export_qr(config: &AppConfig, out_dir: &Path) -> Result<()> {
    let store = CardStore::open(db_path())?;
    let total = store.count()?;
    let cards = store.list_deck(DEFAULT_DECK, total.max(1), 0)?;

    export_qr_pngs(&cards, &config.base_url, out_dir, config.sheet.qr_module_pixels)?;
    println!("exported {} QR codes to {}", cards.len(), out_dir.display());
    Ok(())
}

fn db_path() -> PathBuf {
    PathBuf::from(DB_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> CardIdentifier {
        CardIdentifier::parse(s).expect("valid id")
    }

    fn card(n: usize) -> CardRecord {
        CardRecord {
            id: id(&format!("RR-MLB-{n:03}")),
            deck: DEFAULT_DECK.into(),
            sport: "Baseball".into(),
            athlete_name: format!("Athlete {n}"),
            athlete_blurb: None,
            rookie_year: 1980 + n as i32,
            event_label: None,
            league: None,
            source_url: None,
            spoken_intro: None,
        }
    }

    fn seeded_store(count: usize) -> CardStore {
        let mut store = CardStore::open_in_memory().expect("open in-memory db");
        let cards: Vec<CardRecord> = (1..=count).map(card).collect();
        store.import_cards(&cards).expect("seed");
        store
    }

    #[test]
    fn missing_config_is_created_with_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rookierun.json");

        let config = load_or_init_config(&path).expect("init");
        assert_eq!(config.debounce_window_ms, 1500);
        assert!(path.exists());

        // Second load reads the file it just wrote.
        let reloaded = load_or_init_config(&path).expect("reload");
        assert_eq!(reloaded.base_url, config.base_url);
    }

    #[test]
    fn malformed_config_is_an_error_not_a_silent_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rookierun.json");
        std::fs::write(&path, "{ not json").expect("write");

        assert!(load_or_init_config(&path).is_err());
    }

    #[test]
    fn parse_ids_rejects_malformed_arguments() {
        assert!(parse_ids(&["RR-MLB-002".into(), "garbage".into()]).is_err());
        let ids = parse_ids(&["rr-mlb-002".into()]).expect("parse");
        assert_eq!(ids[0].as_str(), "RR-MLB-002");
    }

    #[test]
    fn deck_order_page_selection_paginates_by_capacity() {
        let store = seeded_store(12);

        let page1 = select_page_cards(&store, 9, 1, &[]).expect("page 1");
        let page2 = select_page_cards(&store, 9, 2, &[]).expect("page 2");

        assert_eq!(page1.len(), 9);
        assert_eq!(page1[0].id.as_str(), "RR-MLB-001");
        assert_eq!(page2.len(), 3);
        assert_eq!(page2[0].id.as_str(), "RR-MLB-010");
    }

    #[test]
    fn explicit_ids_preserve_requested_order_over_store_order() {
        let store = seeded_store(5);
        let requested = vec![id("RR-MLB-003"), id("RR-MLB-001"), id("RR-MLB-002")];

        let cards = select_page_cards(&store, 9, 1, &requested).expect("select");
        let ids: Vec<_> = cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["RR-MLB-003", "RR-MLB-001", "RR-MLB-002"]);
    }

    #[test]
    fn explicit_ids_paginate_and_drop_unknown_cards() {
        let store = seeded_store(4);
        // 5 requested ids, one unknown; capacity 3 puts the unknown id and
        // the last card on page 2.
        let requested = vec![
            id("RR-MLB-004"),
            id("RR-MLB-003"),
            id("RR-MLB-002"),
            id("RR-MLB-099"),
            id("RR-MLB-001"),
        ];

        let page1 = select_page_cards(&store, 3, 1, &requested).expect("page 1");
        let ids: Vec<_> = page1.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["RR-MLB-004", "RR-MLB-003", "RR-MLB-002"]);

        let page2 = select_page_cards(&store, 3, 2, &requested).expect("page 2");
        let ids: Vec<_> = page2.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["RR-MLB-001"]);
    }

    #[test]
    fn out_of_range_page_is_empty_for_both_paths() {
        let store = seeded_store(4);
        assert!(select_page_cards(&store, 9, 5, &[]).expect("deck").is_empty());
        let requested = vec![id("RR-MLB-001")];
        assert!(
            select_page_cards(&store, 9, 5, &requested)
                .expect("explicit")
                .is_empty()
        );
    }
}
