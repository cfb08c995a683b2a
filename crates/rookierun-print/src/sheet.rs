// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sheet rendering — duplex sheet pairs to print-ready PDFs using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: pages are `Vec<Op>` operation lists
// assembled up front and serialised via `PdfDocument::save()`.  Geometry is
// computed in inches (top-left origin) and converted to printpdf's Pt
// (bottom-left origin) at the last moment.

use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, RawImage,
    RawImageData, RawImageFormat, TextItem, XObjectTransform,
};
use tracing::{debug, info, instrument};

use rookierun_core::config::{SheetSpec, card_url};
use rookierun_core::error::Result;
use rookierun_core::types::{CardRecord, sport_icon_slug};

use crate::layout::{DuplexSheetPair, PrintGridSlot, SheetGeometry};
use crate::qr::encode_card_qr;

const PT_PER_IN: f64 = 72.0;
const MM_PER_IN: f32 = 25.4;

/// Fraction of the card width occupied by the QR code on the front.
const QR_FRACTION: f64 = 0.62;

/// Renders laid-out sheet pairs to PDF bytes.
pub struct SheetRenderer {
    spec: SheetSpec,
}

impl SheetRenderer {
    pub fn new(spec: SheetSpec) -> Self {
        Self { spec }
    }

    /// Render one sheet pair to (front, back) PDF byte buffers.
    ///
    /// The configured print scale is applied about the page's top-left corner
    /// so both sheets shrink identically and cut registration survives.
    #[instrument(skip(self, pair), fields(slots = pair.front.len()))]
    pub fn render_pair(&self, pair: &DuplexSheetPair, base_url: &str) -> Result<(Vec<u8>, Vec<u8>)> {
        let front =
            self.render_side(&pair.geometry, &pair.front, base_url, "Rookie Run Fronts", true)?;
        let back =
            self.render_side(&pair.geometry, &pair.back, base_url, "Rookie Run Backs", false)?;
        info!(
            front_bytes = front.len(),
            back_bytes = back.len(),
            "sheet pair rendered"
        );
        Ok((front, back))
    }

    fn render_side(
        &self,
        geometry: &SheetGeometry,
        slots: &[PrintGridSlot],
        base_url: &str,
        title: &str,
        is_front: bool,
    ) -> Result<Vec<u8>> {
        let mut doc = PdfDocument::new(title);
        let mut ops: Vec<Op> = Vec::new();

        for (index, slot) in slots.iter().enumerate() {
            let record = match slot.card() {
                Some(record) => record,
                None => continue,
            };
            let row = index / geometry.columns;
            let col = index % geometry.columns;
            let (x_in, y_in) = geometry.slot_origin_in(row, col);

            if is_front {
                self.push_front_slot(&mut doc, &mut ops, geometry, record, base_url, x_in, y_in)?;
            } else {
                self.push_back_slot(&mut ops, geometry, record, x_in, y_in);
            }
        }

        let page_w = Mm(geometry.page_width_in as f32 * MM_PER_IN);
        let page_h = Mm(geometry.page_height_in as f32 * MM_PER_IN);
        doc.with_pages(vec![PdfPage::new(page_w, page_h, ops)]);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
    }

    /// Card front: QR code centred in the slot with the identifier captioned
    /// beneath it.
    fn push_front_slot(
        &self,
        doc: &mut PdfDocument,
        ops: &mut Vec<Op>,
        geometry: &SheetGeometry,
        record: &CardRecord,
        base_url: &str,
        x_in: f64,
        y_in: f64,
    ) -> Result<()> {
        let url = card_url(base_url, &record.id);
        let qr_image = encode_card_qr(&url, self.spec.qr_module_pixels)?;
        let qr_px = qr_image.width() as usize;

        // printpdf wants RGB8 pixel data.
        let rgb = image::DynamicImage::ImageLuma8(qr_image).to_rgb8();
        let raw = RawImage {
            pixels: RawImageData::U8(rgb.into_raw()),
            width: qr_px,
            height: qr_px,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let xobject_id = doc.add_image(&raw);

        let qr_side_in = geometry.card_width_in * QR_FRACTION;
        let qr_x_in = x_in + (geometry.card_width_in - qr_side_in) / 2.0;
        let qr_y_in = y_in + geometry.card_height_in * 0.08;

        // At dpi 72 the image's native size in Pt equals its pixel count, so
        // the transform scale maps pixels straight to the target edge length.
        let dpi: f32 = 72.0;
        let scale = (qr_side_in * PT_PER_IN * self.spec.print_scale) as f32 / qr_px as f32;
        let (x_pt, y_pt) = self.to_page_pt(geometry, qr_x_in, qr_y_in + qr_side_in);

        ops.push(Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(x_pt)),
                translate_y: Some(Pt(y_pt)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(dpi),
                rotate: None,
            },
        });
        debug!(id = %record.id, qr_px, "front slot placed");

        let caption_y_in = qr_y_in + qr_side_in + 0.22;
        self.push_centred_text(
            ops,
            geometry,
            record.id.as_str(),
            BuiltinFont::Helvetica,
            10.0,
            x_in,
            caption_y_in,
        );
        Ok(())
    }

    /// Card back: the rookie year dominates, with the athlete and identifier
    /// beneath it.
    fn push_back_slot(
        &self,
        ops: &mut Vec<Op>,
        geometry: &SheetGeometry,
        record: &CardRecord,
        x_in: f64,
        y_in: f64,
    ) {
        let year = record.rookie_year.to_string();
        self.push_centred_text(
            ops,
            geometry,
            &year,
            BuiltinFont::HelveticaBold,
            42.0,
            x_in,
            y_in + geometry.card_height_in * 0.42,
        );
        self.push_centred_text(
            ops,
            geometry,
            &record.athlete_name,
            BuiltinFont::Helvetica,
            11.0,
            x_in,
            y_in + geometry.card_height_in * 0.62,
        );
        self.push_centred_text(
            ops,
            geometry,
            record.id.as_str(),
            BuiltinFont::Helvetica,
            8.0,
            x_in,
            y_in + geometry.card_height_in * 0.74,
        );
        self.push_centred_text(
            ops,
            geometry,
            sport_icon_slug(&record.sport),
            BuiltinFont::HelveticaOblique,
            8.0,
            x_in,
            y_in + geometry.card_height_in * 0.86,
        );
    }

    /// Emit a line of text horizontally centred within a card slot.
    ///
    /// Built-in fonts expose no metrics here, so centring uses the same
    /// average-glyph-width estimate as the rest of the Helvetica layout
    /// (roughly 0.5 × size per character).
    fn push_centred_text(
        &self,
        ops: &mut Vec<Op>,
        geometry: &SheetGeometry,
        text: &str,
        font: BuiltinFont,
        size_pt: f64,
        slot_x_in: f64,
        baseline_y_in: f64,
    ) {
        let est_width_in = text.chars().count() as f64 * 0.5 * size_pt / PT_PER_IN;
        let text_x_in = slot_x_in + (geometry.card_width_in - est_width_in).max(0.0) / 2.0;
        let (x_pt, y_pt) = self.to_page_pt(geometry, text_x_in, baseline_y_in);

        ops.push(Op::StartTextSection);
        ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(x_pt),
                y: Pt(y_pt),
            },
        });
        ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt((size_pt * self.spec.print_scale) as f32),
            font,
        });
        ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.to_string())],
            font,
        });
        ops.push(Op::EndTextSection);
    }

    /// Convert top-left-origin inches to printpdf's bottom-left-origin Pt,
    /// applying the print scale about the page's top-left corner.
    fn to_page_pt(&self, geometry: &SheetGeometry, x_in: f64, y_top_in: f64) -> (f32, f32) {
        let s = self.spec.print_scale;
        let x_pt = x_in * s * PT_PER_IN;
        let y_pt = (geometry.page_height_in - y_top_in * s) * PT_PER_IN;
        (x_pt as f32, y_pt as f32)
    }
}
