use labels::Alphabet;
use rand::{Rng, rngs::SmallRng};

/// Random symbols of `alphabet`, separated by single spaces. The symbol count
/// is uniform in `[letter_num / 2, letter_num)`.
pub fn random_text(alphabet: &Alphabet, letter_num: usize, rng: &mut SmallRng) -> String {
    let letter_num = letter_num.max(1);
    let len = rng.random_range(letter_num / 2..letter_num);
    let symbols = alphabet.symbols();

    let mut text = String::with_capacity(len * 3);
    for i in 0..len {
        if i > 0 {
            text.push(' ');
        }
        text.push(symbols[rng.random_range(0..symbols.len())]);
    }
    text
}
