use crate::error::LabelError;

const GENERATOR_HEAD: [char; 12] = ['1', '0', '2', '3', '4', '5', '6', '7', '8', '9', '-', '/'];
const CYRILLIC_UPPER: &str = "АБВГДЕЁЖЗИЙКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯ";
const CYRILLIC_LOWER: &str = "абвгдеёжзийклмнопрстуфхцчшщъыьэюя";

/// Ordered class vocabulary. The index of a symbol is its class id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    pub fn new(symbols: Vec<char>) -> Self {
        Self { symbols }
    }

    /// SVHN class space, `0..=9`.
    pub fn digits() -> Self {
        Self::new(('0'..='9').collect())
    }

    /// Vocabulary of the synthetic generator: digits (with `1` ahead of `0`),
    /// `-` and `/`, Latin upper and lower case, Cyrillic upper and lower case.
    pub fn generator() -> Self {
        let symbols = GENERATOR_HEAD
            .into_iter()
            .chain('A'..='Z')
            .chain('a'..='z')
            .chain(CYRILLIC_UPPER.chars())
            .chain(CYRILLIC_LOWER.chars())
            .collect();
        Self::new(symbols)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn get(&self, class_id: usize) -> Option<char> {
        self.symbols.get(class_id).copied()
    }

    pub fn class_id(&self, ch: char) -> Result<usize, LabelError> {
        self.symbols
            .iter()
            .position(|&s| s == ch)
            .ok_or(LabelError::UnknownSymbol(ch))
    }
}
