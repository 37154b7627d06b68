use serde::Serialize;

/// One line of `manifest.jsonl`.
#[derive(Serialize, Debug)]
pub struct JsonRecord<'a> {
    pub schema: &'static str,
    pub image: String,
    pub label: String,
    pub text: &'a str,
    pub glyphs: usize,
    pub size: (u32, u32),
    pub seed: u64,
}
