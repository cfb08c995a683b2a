// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the Rookie Run engine.

use thiserror::Error;

use crate::types::CardIdentifier;

/// Top-level error type for all Rookie Run operations.
#[derive(Debug, Error)]
pub enum RookieError {
    // -- Camera / capture errors --
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("no camera found on this device")]
    NoDeviceFound,

    #[error("camera is already in use by another app")]
    DeviceBusy,

    #[error("camera does not support the requested constraints")]
    UnsupportedConstraints,

    #[error("camera error: {0}")]
    UnknownCamera(String),

    // -- Scan pipeline errors --
    #[error("not a valid card identifier: {0}")]
    InvalidIdentifier(String),

    // -- Lookup errors --
    #[error("card lookup failed: {0}")]
    LookupFailed(String),

    #[error("card lookup timed out")]
    LookupTimeout,

    #[error("no card found for {0}")]
    CardNotFound(CardIdentifier),

    // -- Print errors --
    #[error("sheet layout error: {0}")]
    Layout(String),

    #[error("QR encoding failed: {0}")]
    Qr(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    // -- Storage / persistence --
    #[error("database error: {0}")]
    Database(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RookieError>;

/// Classify a platform camera failure by its reported error name or message.
///
/// Camera stacks report acquisition failures as named exceptions
/// (`NotAllowedError`, `NotReadableError`, ...).  Mapping happens on the
/// string because the names are the only stable part of the contract across
/// platforms.  Anything unrecognised becomes `UnknownCamera` and is still
/// surfaced — device failures are never silently swallowed.
pub fn classify_camera_failure(detail: &str) -> RookieError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("notallowederror") || lower.contains("permissiondeniederror") {
        RookieError::PermissionDenied
    } else if lower.contains("notfounderror") || lower.contains("devicesnotfounderror") {
        RookieError::NoDeviceFound
    } else if lower.contains("notreadableerror") || lower.contains("trackstarterror") {
        RookieError::DeviceBusy
    } else if lower.contains("overconstrainederror") || lower.contains("constraintnotsatisfied") {
        RookieError::UnsupportedConstraints
    } else {
        RookieError::UnknownCamera(detail.to_string())
    }
}
