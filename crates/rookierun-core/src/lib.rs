// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rookie Run — Core types and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod lookup;
pub mod types;

pub use config::{AppConfig, SheetSpec, card_url};
pub use error::RookieError;
pub use lookup::CardLookup;
pub use types::*;
