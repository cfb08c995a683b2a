// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the scan screen.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Each failure ends in a retry or dismiss action that restores the scanner
// to a known good state — errors never silently disappear.

use crate::error::RookieError;

/// Severity of an error from the player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Network blip, timeout — retrying is likely to succeed.
    Transient,
    /// The player must do something (grant permission, close another app).
    ActionRequired,
    /// Cannot be fixed by retrying — bad card, unsupported device.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the player should try (shown as body text).
    pub suggestion: String,
    /// Whether a retry button should be offered.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `RookieError` into a `HumanError` anyone at the game table can act on.
pub fn humanize_error(err: &RookieError) -> HumanError {
    match err {
        // -- Camera errors --
        RookieError::PermissionDenied => HumanError {
            message: "Camera permission denied.".into(),
            suggestion: "Allow camera access in your browser or system settings, then tap Try Again.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        RookieError::NoDeviceFound => HumanError {
            message: "No camera found on this device.".into(),
            suggestion: "Try a phone or tablet with a camera, or type the card ID in by hand.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        RookieError::DeviceBusy => HumanError {
            message: "The camera is already in use by another app.".into(),
            suggestion: "Close any other app using the camera, then tap Try Again.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        RookieError::UnsupportedConstraints => HumanError {
            message: "This camera can't run in the mode we need.".into(),
            suggestion: "Try again — we'll fall back to the default camera settings.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        RookieError::UnknownCamera(detail) => HumanError {
            message: "The camera had a problem starting.".into(),
            suggestion: format!("Try again. If this keeps happening, restart the app. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Scan pipeline --
        RookieError::InvalidIdentifier(raw) => HumanError {
            message: "That QR code isn't a Rookie Run card.".into(),
            suggestion: format!(
                "Expected something like RR-MLB-002, got: {}",
                truncate(raw, 80)
            ),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Lookup --
        RookieError::LookupFailed(detail) => HumanError {
            message: "We couldn't load that card.".into(),
            suggestion: format!("Check your connection and scan the card again. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        RookieError::LookupTimeout => HumanError {
            message: "Loading the card took too long.".into(),
            suggestion: "Check your connection, then scan the card again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        RookieError::CardNotFound(id) => HumanError {
            message: format!("Card {id} isn't in the deck."),
            suggestion: "The card may be from a different edition. Try another card.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        // -- Print --
        RookieError::Layout(detail) => HumanError {
            message: "The print sheet doesn't fit the page.".into(),
            suggestion: format!("Check the card size, gutter, and page settings. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        RookieError::Qr(detail) => HumanError {
            message: "We couldn't generate a QR code.".into(),
            suggestion: format!("Try again. If this keeps happening, please report it. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        RookieError::Pdf(detail) => HumanError {
            message: "We couldn't create the print file.".into(),
            suggestion: format!("Try again. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Storage --
        RookieError::Database(_) => HumanError {
            message: "The card library had a problem.".into(),
            suggestion: "Try closing and reopening the app. Your cards should still be there.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        RookieError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "A file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        RookieError::Serialization(_) => HumanError {
            message: "The app had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}

/// Truncate long decoded payloads so they don't overflow the error card.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{cut}...")
    }
}
