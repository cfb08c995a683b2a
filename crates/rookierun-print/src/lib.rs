// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// rookierun-print — card production for physical decks.
//
// Lays out batches of card records onto duplex-registered front/back sheets,
// encodes the QR payloads printed on card fronts, and renders both sheets to
// print-ready PDFs.

pub mod layout;
pub mod qr;
pub mod sheet;

pub use layout::{DuplexLayoutEngine, DuplexSheetPair, PrintGridSlot, SheetGeometry};
pub use sheet::SheetRenderer;
