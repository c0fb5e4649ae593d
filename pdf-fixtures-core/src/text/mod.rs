//! Text sources, literal escaping and content stream operators.

mod content;
mod escape;
mod lorem;

pub use content::ContentStream;
pub use escape::escape_literal;
pub use lorem::{FixedTokens, LoremWords, DEFAULT_SEED, LOREM_WORDS};
