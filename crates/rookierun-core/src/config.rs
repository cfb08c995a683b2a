// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};

use crate::types::{CardIdentifier, PageSize};

/// Persistent application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL encoded into card QR payloads (`{base_url}/cards/{id}`).
    pub base_url: String,
    /// Minimum interval before the same card is accepted again (milliseconds).
    pub debounce_window_ms: u64,
    /// How long a card lookup may run before it is failed (milliseconds).
    pub lookup_timeout_ms: u64,
    /// Whether a card's spoken intro is read aloud when first shown.
    pub announce_enabled: bool,
    /// Print sheet geometry.
    pub sheet: SheetSpec,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".into(),
            debounce_window_ms: 1500,
            lookup_timeout_ms: 5000,
            announce_enabled: true,
            sheet: SheetSpec::default(),
        }
    }
}

/// Physical geometry of a duplex print sheet.
///
/// Everything here is externally configurable — the layout engine hardcodes
/// no dimension.  Other grid sizes (e.g. 4×3 for 12-up sheets) are plain
/// configuration, not separate algorithms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetSpec {
    pub columns: usize,
    pub rows: usize,
    pub card_width_in: f64,
    pub card_height_in: f64,
    /// Gap between adjacent cards.  Cut lines fall at each gutter midpoint.
    pub gutter_in: f64,
    pub page: PageSize,
    /// Built-in scale so sheets print at 100% and still fit.
    pub print_scale: f64,
    /// Rendered pixel size of one QR module edge.
    pub qr_module_pixels: u32,
}

impl SheetSpec {
    /// Number of card slots on one sheet.
    pub fn capacity(&self) -> usize {
        self.columns * self.rows
    }
}

impl Default for SheetSpec {
    fn default() -> Self {
        // The canonical 9-slot sheet: 3×3 on Letter with 2.5 in cards.
        Self {
            columns: 3,
            rows: 3,
            card_width_in: 2.5,
            card_height_in: 2.45,
            gutter_in: 0.125,
            page: PageSize::Letter,
            print_scale: 0.9,
            qr_module_pixels: 8,
        }
    }
}

/// Absolute URL encoded into a card's QR code.
///
/// A trailing slash on the base is tolerated so configuration typos don't
/// produce double-slash payloads.
pub fn card_url(base_url: &str, id: &CardIdentifier) -> String {
    format!("{}/cards/{}", base_url.trim_end_matches('/'), id)
}
