//! Minimal PDF object parser used to check generated fixtures.
//!
//! Only what the validators need: tokens, direct objects and the text
//! operators of content streams. Stream payloads are never tokenized.

pub mod content;
pub mod lexer;
pub mod value;

pub use content::extract_text_lines;
pub use lexer::{Lexer, Token};
pub use value::{parse_value, Dictionary, ObjectRef, Value};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("unexpected end of file at byte {position}")]
    UnexpectedEof { position: usize },

    #[error("syntax error at byte {position}: {message}")]
    Syntax { position: usize, message: String },

    #[error("unterminated dictionary at byte {position}: found {found} where a key or '>>' belongs")]
    UnterminatedDictionary { position: usize, found: String },
}

pub type ParseResult<T> = Result<T, ParseError>;
