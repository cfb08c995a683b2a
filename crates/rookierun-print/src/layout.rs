// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Duplex sheet layout.
//
// Long-edge duplex printing physically flips the sheet left-to-right, so the
// back sheet must reverse item order within each row or a card's back lands
// behind a different card's front.  Padding to a full grid happens BEFORE
// mirroring: mirroring a short final row and padding afterwards would shift
// its empties into the wrong physical columns.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use rookierun_core::config::SheetSpec;
use rookierun_core::error::{Result, RookieError};
use rookierun_core::types::{CardIdentifier, CardRecord};

/// Tolerance for floating-point geometry checks.
const GEOMETRY_EPSILON: f64 = 1e-9;

/// One position in a print grid.  Emptiness is an explicit value, not
/// absence — the mirroring transform needs every slot to participate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PrintGridSlot {
    Card(CardRecord),
    Empty,
}

impl PrintGridSlot {
    pub fn card(&self) -> Option<&CardRecord> {
        match self {
            Self::Card(record) => Some(record),
            Self::Empty => None,
        }
    }
}

/// Physical placement of a sheet's grid, computed once per spec.
///
/// All lengths are in inches.  Cut lines sit at the midpoint of each
/// internal gutter: `margin + k·card + (k−1)·gutter + gutter/2` for the
/// k-th internal boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetGeometry {
    pub columns: usize,
    pub rows: usize,
    pub card_width_in: f64,
    pub card_height_in: f64,
    pub gutter_in: f64,
    pub page_width_in: f64,
    pub page_height_in: f64,
    pub margin_x_in: f64,
    pub margin_y_in: f64,
    /// X positions of vertical cut lines, left to right.
    pub vertical_cut_lines_in: Vec<f64>,
    /// Y positions of horizontal cut lines, top to bottom.
    pub horizontal_cut_lines_in: Vec<f64>,
}

impl SheetGeometry {
    /// Compute the geometry for a sheet spec, centring the grid on the page.
    pub fn from_spec(spec: &SheetSpec) -> Result<Self> {
        if spec.columns == 0 || spec.rows == 0 {
            return Err(RookieError::Layout("grid must have at least one column and row".into()));
        }
        if spec.card_width_in <= 0.0 || spec.card_height_in <= 0.0 || spec.gutter_in < 0.0 {
            return Err(RookieError::Layout("card dimensions must be positive".into()));
        }

        let (page_width_in, page_height_in) = spec.page.dimensions_in();
        let usable_width =
            spec.columns as f64 * spec.card_width_in + (spec.columns - 1) as f64 * spec.gutter_in;
        let usable_height =
            spec.rows as f64 * spec.card_height_in + (spec.rows - 1) as f64 * spec.gutter_in;

        if usable_width > page_width_in + GEOMETRY_EPSILON
            || usable_height > page_height_in + GEOMETRY_EPSILON
        {
            return Err(RookieError::Layout(format!(
                "{}x{} grid of {}x{} in cards does not fit a {}x{} in page",
                spec.columns,
                spec.rows,
                spec.card_width_in,
                spec.card_height_in,
                page_width_in,
                page_height_in,
            )));
        }

        let margin_x_in = (page_width_in - usable_width) / 2.0;
        let margin_y_in = (page_height_in - usable_height) / 2.0;

        let cut_positions = |margin: f64, card: f64, count: usize| -> Vec<f64> {
            (1..count)
                .map(|k| {
                    margin
                        + k as f64 * card
                        + (k - 1) as f64 * spec.gutter_in
                        + spec.gutter_in / 2.0
                })
                .collect()
        };

        Ok(Self {
            columns: spec.columns,
            rows: spec.rows,
            card_width_in: spec.card_width_in,
            card_height_in: spec.card_height_in,
            gutter_in: spec.gutter_in,
            page_width_in,
            page_height_in,
            margin_x_in,
            margin_y_in,
            vertical_cut_lines_in: cut_positions(margin_x_in, spec.card_width_in, spec.columns),
            horizontal_cut_lines_in: cut_positions(margin_y_in, spec.card_height_in, spec.rows),
        })
    }

    /// Top-left corner of the slot at (row, col), in inches from the page's
    /// top-left corner.
    pub fn slot_origin_in(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.margin_x_in + col as f64 * (self.card_width_in + self.gutter_in),
            self.margin_y_in + row as f64 * (self.card_height_in + self.gutter_in),
        )
    }

    pub fn capacity(&self) -> usize {
        self.columns * self.rows
    }
}

/// Front and back sheets in physical registration.
///
/// Both slot sequences are row-major and exactly rows×columns long; the back
/// is a deterministic permutation of the padded front
/// (`back[r][c] = front[r][columns−1−c]`), never a re-sort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplexSheetPair {
    pub front: Vec<PrintGridSlot>,
    pub back: Vec<PrintGridSlot>,
    pub geometry: SheetGeometry,
}

impl DuplexSheetPair {
    /// Slot at (row, col) on the front sheet, or `None` out of range.
    pub fn front_slot(&self, row: usize, col: usize) -> Option<&PrintGridSlot> {
        if col >= self.geometry.columns {
            return None;
        }
        self.front.get(row * self.geometry.columns + col)
    }

    /// Slot at (row, col) on the back sheet, or `None` out of range.
    pub fn back_slot(&self, row: usize, col: usize) -> Option<&PrintGridSlot> {
        if col >= self.geometry.columns {
            return None;
        }
        self.back.get(row * self.geometry.columns + col)
    }
}

/// Lays out ordered card batches onto duplex-registered sheet pairs.
pub struct DuplexLayoutEngine {
    geometry: SheetGeometry,
}

impl DuplexLayoutEngine {
    pub fn new(spec: &SheetSpec) -> Result<Self> {
        Ok(Self {
            geometry: SheetGeometry::from_spec(spec)?,
        })
    }

    pub fn geometry(&self) -> &SheetGeometry {
        &self.geometry
    }

    /// Produce one sheet pair from an ordered batch.
    ///
    /// Items beyond the sheet's capacity are truncated (callers paginate
    /// with [`page_slice`]); the remainder is padded with explicit empties
    /// before the back sheet is mirrored.
    pub fn layout(&self, items: Vec<CardRecord>) -> DuplexSheetPair {
        let capacity = self.geometry.capacity();

        let mut front: Vec<PrintGridSlot> = items
            .into_iter()
            .take(capacity)
            .map(PrintGridSlot::Card)
            .collect();
        let filled = front.len();
        while front.len() < capacity {
            front.push(PrintGridSlot::Empty);
        }

        let back = mirror_rows(&front, self.geometry.columns);
        debug!(filled, capacity, "sheet pair laid out");

        DuplexSheetPair {
            front,
            back,
            geometry: self.geometry.clone(),
        }
    }
}

/// Reverse item order within each row of a row-major grid.
fn mirror_rows(slots: &[PrintGridSlot], columns: usize) -> Vec<PrintGridSlot> {
    let mut out = Vec::with_capacity(slots.len());
    for row in slots.chunks(columns) {
        out.extend(row.iter().rev().cloned());
    }
    out
}

/// Re-sort store results into the caller's requested order.
///
/// The batch query returns rows in arbitrary order; the physical sheet must
/// follow the order the caller asked for.  Identifiers the store did not
/// return are dropped, not null-padded.
pub fn order_by_requested(
    requested: &[CardIdentifier],
    rows: Vec<CardRecord>,
) -> Vec<CardRecord> {
    let mut by_id: HashMap<CardIdentifier, CardRecord> =
        rows.into_iter().map(|r| (r.id.clone(), r)).collect();
    requested
        .iter()
        .filter_map(|id| by_id.remove(id))
        .collect()
}

/// The slice of an explicit identifier list belonging to one sheet.
/// Pages are 1-indexed; out-of-range pages yield an empty slice.
pub fn page_slice(requested: &[CardIdentifier], page: usize, per_page: usize) -> &[CardIdentifier] {
    let offset = page.max(1).saturating_sub(1).saturating_mul(per_page);
    if offset >= requested.len() || per_page == 0 {
        return &[];
    }
    let end = (offset + per_page).min(requested.len());
    &requested[offset..end]
}
