// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Rookie Run engine.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RookieError};

/// The structured token printed into a physical card's QR code.
///
/// Shape: `<prefix>-<category>-<sequence>` where prefix and category are
/// 2–5 ASCII letters and the sequence is exactly 3 digits, e.g. `RR-MLB-002`.
/// Always stored uppercase — [`CardIdentifier::parse`] is the single
/// validator shared by the scan pipeline and the print generators, so an
/// identifier that survives printing is guaranteed to survive scanning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardIdentifier(String);

impl CardIdentifier {
    /// Validate and normalise a raw token.
    pub fn parse(raw: &str) -> Result<Self> {
        let candidate = raw.trim();
        let parts: Vec<&str> = candidate.split('-').collect();
        if parts.len() != 3 {
            return Err(RookieError::InvalidIdentifier(candidate.to_string()));
        }

        let letters_ok = |s: &str| {
            (2..=5).contains(&s.len()) && s.chars().all(|c| c.is_ascii_alphabetic())
        };
        let digits_ok =
            |s: &str| s.len() == 3 && s.chars().all(|c| c.is_ascii_digit());

        if letters_ok(parts[0]) && letters_ok(parts[1]) && digits_ok(parts[2]) {
            Ok(Self(candidate.to_ascii_uppercase()))
        } else {
            Err(RookieError::InvalidIdentifier(candidate.to_string()))
        }
    }

    /// The normalised (uppercase) token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CardIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CardIdentifier {
    type Err = RookieError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CardIdentifier {
    type Error = RookieError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CardIdentifier> for String {
    fn from(id: CardIdentifier) -> Self {
        id.0
    }
}

/// An athlete card as stored in the record store.
///
/// Field names follow the camelCase shape used by the card data files and
/// the lookup API, so records deserialise directly from either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub id: CardIdentifier,
    /// Which physical deck the card belongs to.
    #[serde(default = "default_deck")]
    pub deck: String,
    pub sport: String,
    pub athlete_name: String,
    #[serde(default)]
    pub athlete_blurb: Option<String>,
    /// The year used to place this card on the timeline.
    pub rookie_year: i32,
    #[serde(default)]
    pub event_label: Option<String>,
    #[serde(default)]
    pub league: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    /// Read aloud once when the card is first shown.
    #[serde(default)]
    pub spoken_intro: Option<String>,
}

fn default_deck() -> String {
    "Rookie Run".to_string()
}

/// Map a sport name onto the icon slug printed on card backs.
///
/// Unknown sports fall back to the generic `sports` icon.
pub fn sport_icon_slug(sport: &str) -> &'static str {
    match sport.trim().to_ascii_uppercase().as_str() {
        "BASEBALL" => "baseball",
        "FOOTBALL" => "football",
        "BASKETBALL" => "basketball",
        "HOCKEY" => "hockey",
        "OLYMPICS" => "olympics",
        "TENNIS" => "tennis",
        "GOLF" => "golf",
        _ => "sports",
    }
}

/// One raw decode attempt from the camera.  Produced per frame and consumed
/// immediately by the capture session's decode pipeline; never persisted.
#[derive(Debug, Clone)]
pub struct ScanEvent {
    pub raw_text: String,
    pub at: Instant,
}

/// Physical page sizes for print sheets.
///
/// Dimensions are in inches because the card geometry (2.5 in cards,
/// fractional-inch gutters) is specified in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    Letter,
    A4,
    Legal,
    Custom { width_in: f64, height_in: f64 },
}

impl PageSize {
    /// Dimensions in inches (width, height), portrait orientation.
    pub fn dimensions_in(&self) -> (f64, f64) {
        match self {
            Self::Letter => (8.5, 11.0),
            Self::A4 => (8.27, 11.69),
            Self::Legal => (8.5, 14.0),
            Self::Custom { width_in, height_in } => (*width_in, *height_in),
        }
    }
}
