// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Card identifier extraction from raw QR decode text.
//
// Accepted payload shapes:
//   1) Full URL:      https://rookie-run.example.com/cards/RR-MLB-002
//   2) Relative path: /cards/RR-MLB-002
//   3) Raw id:        RR-MLB-002
//
// Pure and total — malformed input yields `None`, never an error or a panic,
// so the camera keeps scanning through stray QR codes on the table.

use rookierun_core::types::CardIdentifier;

/// Path prefix that marks a card URL.
const CARDS_SEGMENT: &str = "/cards/";

/// Extract a validated card identifier from raw decoded text.
///
/// If the text contains a `/cards/<token>` path segment the token is the
/// candidate; otherwise the whole trimmed text is.  Either way the candidate
/// must pass [`CardIdentifier::parse`], the same validator the print
/// generators use.
pub fn extract(raw: &str) -> Option<CardIdentifier> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let candidate = path_token(trimmed).unwrap_or(trimmed);
    CardIdentifier::parse(candidate).ok()
}

/// Find the token after a case-insensitive `/cards/` segment.
/// The token ends at the next `/`, `?`, or `#`.
fn path_token(text: &str) -> Option<&str> {
    // ASCII lowering preserves byte offsets, so indices found in the
    // lowered copy are valid in the original.
    let lowered = text.to_ascii_lowercase();
    let start = lowered.find(CARDS_SEGMENT)? + CARDS_SEGMENT.len();
    let rest = &text[start..];
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let token = &rest[..end];
    if token.is_empty() { None } else { Some(token) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_full_url_with_query() {
        let id = extract("https://host/cards/rr-mlb-002?x=1").expect("extracted");
        assert_eq!(id.as_str(), "RR-MLB-002");
    }

    #[test]
    fn extracts_from_relative_path() {
        let id = extract("/cards/RR-NHL-014").expect("extracted");
        assert_eq!(id.as_str(), "RR-NHL-014");
    }

    #[test]
    fn extracts_from_raw_identifier() {
        let id = extract("  rr-nba-007  ").expect("extracted");
        assert_eq!(id.as_str(), "RR-NBA-007");
    }

    #[test]
    fn path_segment_is_case_insensitive() {
        let id = extract("https://HOST/CARDS/rr-mlb-002#frag").expect("extracted");
        assert_eq!(id.as_str(), "RR-MLB-002");
    }

    #[test]
    fn token_ends_at_following_slash() {
        let id = extract("https://host/cards/RR-MLB-002/extra").expect("extracted");
        assert_eq!(id.as_str(), "RR-MLB-002");
    }

    #[test]
    fn rejects_non_card_text() {
        assert!(extract("not a card").is_none());
        assert!(extract("").is_none());
        assert!(extract("   ").is_none());
        assert!(extract("https://host/other/RR-MLB-002").is_none());
    }

    #[test]
    fn rejects_url_with_malformed_token() {
        assert!(extract("https://host/cards/garbage").is_none());
        assert!(extract("https://host/cards/").is_none());
    }

    #[test]
    fn output_always_matches_pattern_uppercased() {
        // Anything that comes out must re-parse through the shared validator.
        for input in [
            "rr-mlb-002",
            "/cards/ab-cd-123",
            "https://x/cards/abcde-fghij-999?a=b",
            "junk",
            "/cards/%20",
        ] {
            if let Some(id) = extract(input) {
                assert!(CardIdentifier::parse(id.as_str()).is_ok());
                assert_eq!(id.as_str(), id.as_str().to_ascii_uppercase());
            }
        }
    }
}
