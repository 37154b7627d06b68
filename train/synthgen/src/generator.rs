use image::{Rgb, RgbImage};
use imageproc::{
    drawing::{draw_hollow_rect_mut, draw_text_mut},
    rect::Rect,
};
use labels::{Alphabet, LabelError, NormalizedBox};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::debug;

use crate::{
    background::TextureSet,
    fonts::FontCache,
    geom::{GlyphBox, PixelBox},
    io::OutputSink,
    layout::{FontMeasure, TextMeasure, font_scale, glyph_boxes},
    render::{ComposeConfig, OutputMode},
    text::random_text,
};

const OUTLINE: Rgb<u8> = Rgb([255, 0, 0]);

/// One rendered image with the boxes of its glyphs.
pub struct Scene {
    pub image: RgbImage,
    pub text: String,
    pub origin: (i32, i32),
    pub glyphs: Vec<GlyphBox>,
}

impl Scene {
    pub fn labels(&self, alphabet: &Alphabet, padding: i32) -> Result<Vec<NormalizedBox>, LabelError> {
        let size = self.image.dimensions();
        self.glyphs
            .iter()
            .map(|g| Ok(g.bbox.padded(padding).normalize(alphabet.class_id(g.ch)?, size)))
            .collect()
    }

    pub fn outline_glyphs(&mut self, padding: i32) {
        for g in &self.glyphs {
            let b = g.bbox.padded(padding);
            let rect = Rect::at(b.left, b.top).of_size(b.width().max(1) as u32, b.height().max(1) as u32);
            draw_hollow_rect_mut(&mut self.image, rect, OUTLINE);
        }
    }
}

/// Top-left anchor such that the text plus margin stays inside the canvas.
pub fn place_text(
    cfg: &ComposeConfig,
    text_box: PixelBox,
    rng: &mut SmallRng,
) -> anyhow::Result<(i32, i32)> {
    let margin = cfg.margin as i32;
    let lo = margin / 5;
    let x_hi = cfg.width as i32 - text_box.width() - margin;
    let y_hi = cfg.height as i32 - text_box.height() - margin;
    anyhow::ensure!(
        x_hi > lo && y_hi > lo,
        "text of {}x{} px does not fit into {}x{} with margin {}",
        text_box.width(),
        text_box.height(),
        cfg.width,
        cfg.height,
        cfg.margin
    );
    Ok((rng.random_range(lo..x_hi), rng.random_range(lo..y_hi)))
}

pub struct DatasetItemGenerator<'a> {
    pub config: &'a ComposeConfig,
    pub mode: OutputMode,
    alphabet: Alphabet,
    textures: TextureSet,
    fonts: FontCache,
    sink: OutputSink,
}

impl<'a> DatasetItemGenerator<'a> {
    pub fn new(
        config: &'a ComposeConfig,
        textures: TextureSet,
        fonts: FontCache,
        sink: OutputSink,
        mode: OutputMode,
    ) -> Self {
        Self {
            config,
            mode,
            alphabet: Alphabet::generator(),
            textures,
            fonts,
            sink,
        }
    }

    pub fn compose(&self, rng: &mut SmallRng) -> anyhow::Result<Scene> {
        let mut image = self.textures.sample(self.config, rng)?;

        let font = self.fonts.get_random(rng);
        let em_px = (image.width().min(image.height()) / self.config.font_divisor).max(1);
        let scale = font_scale(&font, em_px);
        let measure = FontMeasure::new(&font, scale);

        let text = random_text(&self.alphabet, self.config.letter_num, rng);
        let origin = place_text(self.config, measure.measure(&text), rng)?;
        let color = Rgb([
            rng.random_range(0..255),
            rng.random_range(0..255),
            rng.random_range(0..255),
        ]);
        draw_text_mut(&mut image, color, origin.0, origin.1, scale, &font, &text);

        let glyphs = glyph_boxes(&measure, &text, origin);
        debug!("{text:?} at {origin:?}, {} glyphs", glyphs.len());
        Ok(Scene { image, text, origin, glyphs })
    }

    pub fn generate_with_seed(&mut self, seed: u64) -> anyhow::Result<Scene> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut scene = self.compose(&mut rng)?;
        let padding = self.config.bbox_padding;

        match self.mode {
            OutputMode::Show => scene.outline_glyphs(padding),
            OutputMode::Save => {
                let labels = scene.labels(&self.alphabet, padding)?;
                self.sink.save(&scene, &labels, seed)?;
            }
            OutputMode::Discard => {}
        }
        Ok(scene)
    }

    pub fn finalize_output(&mut self) -> std::io::Result<()> {
        self.sink.finalize_output()
    }
}
