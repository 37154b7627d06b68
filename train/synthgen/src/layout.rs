//! Text measurement and per-glyph boxes.
//!
//! Glyph advances inside a string depend on their neighbours (kerning), so
//! glyph boxes are placed by measuring growing prefixes of the rendered text
//! rather than by summing single-glyph widths.

use ab_glyph::{Font, GlyphId, PxScale, Rect, ScaleFont, point};

use crate::geom::{GlyphBox, PixelBox};

/// Box of `text` drawn with its top-left anchor at the origin.
pub trait TextMeasure {
    fn measure(&self, text: &str) -> PixelBox;
}

/// Scale at which one em of `font` spans `em_px` pixels.
pub fn font_scale(font: &impl Font, em_px: u32) -> PxScale {
    let px = em_px as f32;
    // pt_to_px_scale assumes 96 dpi
    font.pt_to_px_scale(px * 72.0 / 96.0).unwrap_or(PxScale::from(px))
}

/// Measures with the glyph placement of `imageproc::drawing::draw_text_mut`:
/// baseline at the ascent, each glyph placed at the caret before its own
/// advance, kerning against the previous outlined glyph added afterwards.
pub struct FontMeasure<'a, F> {
    font: &'a F,
    scale: PxScale,
}

impl<'a, F: Font> FontMeasure<'a, F> {
    pub fn new(font: &'a F, scale: PxScale) -> Self {
        Self { font, scale }
    }
}

impl<F: Font> TextMeasure for FontMeasure<'_, F> {
    fn measure(&self, text: &str) -> PixelBox {
        let scaled = self.font.as_scaled(self.scale);
        let mut caret = 0.0f32;
        let mut last: Option<GlyphId> = None;
        let mut ink: Option<Rect> = None;

        for c in text.chars() {
            let id = scaled.glyph_id(c);
            let glyph = id.with_scale_and_position(self.scale, point(caret, scaled.ascent()));
            caret += scaled.h_advance(id);

            if let Some(outlined) = self.font.outline_glyph(glyph) {
                if let Some(prev) = last {
                    caret += scaled.kern(id, prev);
                }
                last = Some(id);

                let b = outlined.px_bounds();
                ink = Some(match ink {
                    None => b,
                    Some(acc) => Rect {
                        min: point(acc.min.x.min(b.min.x), acc.min.y.min(b.min.y)),
                        max: point(acc.max.x.max(b.max.x), acc.max.y.max(b.max.y)),
                    },
                });
            }
        }

        // the right edge covers trailing advance so spaces still move the cursor
        let advance = caret.ceil() as i32;
        match ink {
            Some(r) => PixelBox::new(
                r.min.x.floor() as i32,
                r.min.y.floor() as i32,
                (r.max.x.ceil() as i32).max(advance),
                r.max.y.ceil() as i32,
            ),
            None => PixelBox::new(0, 0, advance, 0),
        }
    }
}

/// Boxes of the non-space glyphs of `text` drawn at `origin`.
///
/// Folds over the characters carrying the box of the prefix before the
/// current one: the glyph is measured at the cursor `origin.x + prefix right`
/// (the prefix's caret, since a measured right edge covers the advance), then
/// the prefix including it becomes the new state.
pub fn glyph_boxes(measure: &impl TextMeasure, text: &str, origin: (i32, i32)) -> Vec<GlyphBox> {
    let mut buf = [0u8; 4];
    let (_, glyphs) = text.char_indices().fold(
        (PixelBox::default(), Vec::new()),
        |(prev_prefix, mut glyphs), (i, ch)| {
            if ch != ' ' {
                let single = measure.measure(ch.encode_utf8(&mut buf));
                let bbox = single.translate(origin.0 + prev_prefix.right, origin.1);
                glyphs.push(GlyphBox { ch, bbox });
            }
            let prefix = measure.measure(&text[..i + ch.len_utf8()]);
            (prefix, glyphs)
        },
    );
    glyphs
}
