pub struct ComposeConfig {
    pub width: u32,
    pub height: u32,
    pub margin: u32,        // textures must exceed the canvas by this much to be cropped
    pub letter_num: usize,  // upper bound (exclusive) of glyphs per image
    pub bbox_padding: i32,
    pub font_divisor: u32,  // em size = min(width, height) / font_divisor
    pub filter_chance: f64,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            width: 240,
            height: 240,
            margin: 50,
            letter_num: 8,
            bbox_padding: 1,
            font_divisor: 13,
            filter_chance: 0.5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    /// Outline the glyph boxes, write nothing.
    Show,
    Save,
    Discard,
}

impl OutputMode {
    pub fn from_flags(show: bool, save: bool) -> Self {
        match (show, save) {
            (true, _) => OutputMode::Show,
            (false, true) => OutputMode::Save,
            (false, false) => OutputMode::Discard,
        }
    }
}
