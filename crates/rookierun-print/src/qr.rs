// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// QR payload encoding for card fronts.
//
// Each card front carries a QR code whose payload is the card's absolute URL
// (`{base_url}/cards/{id}`).  The scanner extracts the identifier from the
// path, so the payload must round-trip through the shared identifier rules.

use std::path::Path;

use image::{GrayImage, Luma};
use qrcode::QrCode;
use tracing::{debug, info, instrument};

use rookierun_core::config::card_url;
use rookierun_core::error::{Result, RookieError};
use rookierun_core::types::CardRecord;

/// Encode one card URL as a grayscale QR image.
///
/// `module_pixels` is the rendered edge length of a single QR module; the
/// overall image size follows from the payload's QR version plus quiet zone.
pub fn encode_card_qr(url: &str, module_pixels: u32) -> Result<GrayImage> {
    let code = QrCode::new(url.as_bytes())
        .map_err(|err| RookieError::Qr(format!("failed to encode {url:?}: {err}")))?;
    let image = code
        .render::<Luma<u8>>()
        .module_dimensions(module_pixels, module_pixels)
        .build();
    debug!(url, width = image.width(), "QR encoded");
    Ok(image)
}

/// Export one PNG per card into `out_dir`, named `{ID}.png`.
///
/// Used to produce standalone QR assets for external sheet tooling; the PDF
/// renderer embeds the same images directly and does not read these files.
#[instrument(skip(cards), fields(count = cards.len()))]
pub fn export_qr_pngs(
    cards: &[CardRecord],
    base_url: &str,
    out_dir: &Path,
    module_pixels: u32,
) -> Result<()> {
    std::fs::create_dir_all(out_dir)?;

    for card in cards {
        let url = card_url(base_url, &card.id);
        let image = encode_card_qr(&url, module_pixels)?;
        let path = out_dir.join(format!("{}.png", card.id));
        image
            .save(&path)
            .map_err(|err| RookieError::Qr(format!("failed to write {}: {err}", path.display())))?;
    }

    info!(count = cards.len(), dir = %out_dir.display(), "QR assets exported");
    Ok(())
}
