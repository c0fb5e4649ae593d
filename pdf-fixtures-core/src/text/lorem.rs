//! Word sources feeding the layout engine.
//!
//! The layout engine only needs a finite `Iterator<Item = String>`. Seeded
//! [`LoremWords`] produces pseudo-random filler; [`FixedTokens`] replays a
//! known text for fixtures whose content must be predictable word by word.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seed used when the caller does not pick one.
pub const DEFAULT_SEED: u64 = 0x5EED_F1C5;

pub const LOREM_WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit",
    "sed", "do", "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore",
    "magna", "aliqua", "enim", "ad", "minim", "veniam", "quis", "nostrud",
    "exercitation", "ullamco", "laboris", "nisi", "aliquip", "ex", "ea", "commodo",
    "consequat", "duis", "aute", "irure", "in", "reprehenderit", "voluptate",
    "velit", "esse", "cillum", "fugiat", "nulla", "pariatur", "excepteur", "sint",
    "occaecat", "cupidatat", "non", "proident", "sunt", "culpa", "qui", "officia",
    "deserunt", "mollit", "anim", "id", "est", "laborum", "at", "vero", "eos",
    "accusamus", "accusantium", "doloremque", "laudantium", "totam", "rem",
    "aperiam", "eaque", "ipsa", "quae", "ab", "illo", "inventore", "veritatis",
    "quasi", "architecto", "beatae", "vitae", "dicta", "explicabo", "nemo",
    "ipsam", "quia", "voluptas", "aspernatur", "odit", "aut", "fugit", "magni",
    "dolores", "ratione", "sequi", "nesciunt", "neque", "porro", "quisquam",
    "dolorem", "adipisci", "numquam", "eius", "modi", "tempora", "incidunt",
    "magnam", "quaerat", "voluptatem", "fuga", "harum", "quidem", "rerum",
    "facilis", "expedita", "distinctio", "nam", "libero", "tempore", "cum",
    "soluta", "nobis", "eligendi", "optio", "cumque", "nihil", "impedit",
    "quo", "minus", "maxime", "placeat", "facere", "possimus", "omnis",
    "assumenda", "repellendus", "temporibus", "autem", "officiis", "debitis",
    "saepe", "eveniet", "voluptates", "repudiandae", "recusandae", "itaque",
    "earum", "hic", "tenetur", "sapiente", "delectus", "reiciendis", "maiores",
    "alias", "perferendis", "doloribus", "asperiores", "repellat",
];

/// Seeded lorem ipsum words with sentence punctuation.
///
/// Sentences start capitalized, periods and commas are sprinkled at random
/// intervals of 8 to 20 words, and the final word always ends with a period.
/// The same seed and count always yield the same words.
#[derive(Debug, Clone)]
pub struct LoremWords {
    rng: StdRng,
    total: usize,
    index: usize,
    capitalize_next: bool,
}

impl LoremWords {
    pub fn new(count: usize, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            total: count,
            index: 0,
            capitalize_next: true,
        }
    }
}

impl Iterator for LoremWords {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.index >= self.total {
            return None;
        }
        let i = self.index;
        self.index += 1;
        let is_last = self.index == self.total;

        let base = LOREM_WORDS[self.rng.gen_range(0..LOREM_WORDS.len())];
        let mut word = if self.capitalize_next {
            capitalize(base)
        } else {
            base.to_string()
        };

        let interval = self.rng.gen_range(8..=20);
        if (i + 1) % interval == 0 && !is_last {
            if self.rng.gen_bool(0.7) {
                word.push('.');
            } else if self.rng.gen_bool(0.5) {
                word.push(',');
            }
        }
        if is_last && !word.ends_with('.') {
            word.push('.');
        }

        self.capitalize_next = word.ends_with('.');
        Some(word)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LoremWords {}

/// A fixed, whitespace-separated token stream.
#[derive(Debug, Clone)]
pub struct FixedTokens {
    tokens: std::vec::IntoIter<String>,
}

impl FixedTokens {
    pub fn new(text: &str) -> Self {
        let tokens: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        Self {
            tokens: tokens.into_iter(),
        }
    }
}

impl Iterator for FixedTokens {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.tokens.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tokens.size_hint()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
