//! Tokenizer over an in-memory PDF.
//!
//! Works directly on a byte slice so callers can jump to any offset taken
//! from the cross-reference table.

use super::{ParseError, ParseResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(Vec<u8>),
    Name(String),
    ArrayStart,
    ArrayEnd,
    DictStart,
    DictEnd,
    Null,
    /// Bare word: `obj`, `endobj`, `stream`, `R`, content operators.
    Keyword(String),
    Eof,
}

pub struct Lexer<'a> {
    data: &'a [u8],
    position: usize,
}

fn is_delimiter(ch: u8) -> bool {
    matches!(
        ch,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn is_whitespace(ch: u8) -> bool {
    matches!(ch, b' ' | b'\t' | b'\n' | b'\r' | b'\x0C' | b'\0')
}

impl<'a> Lexer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::at(data, 0)
    }

    /// Lexer starting at `position`.
    pub fn at(data: &'a [u8], position: usize) -> Self {
        Self { data, position }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn seek(&mut self, position: usize) {
        self.position = position;
    }

    pub fn remaining(&self) -> &'a [u8] {
        self.data.get(self.position..).unwrap_or_default()
    }

    fn peek_byte(&self) -> Option<u8> {
        self.data.get(self.position).copied()
    }

    fn next_byte(&mut self) -> ParseResult<u8> {
        let ch = self.peek_byte().ok_or(ParseError::UnexpectedEof {
            position: self.position,
        })?;
        self.position += 1;
        Ok(ch)
    }

    fn syntax(&self, message: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            position: self.position,
            message: message.into(),
        }
    }

    /// Skips whitespace and comments.
    pub fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_byte() {
            if is_whitespace(ch) {
                self.position += 1;
            } else if ch == b'%' {
                while let Some(ch) = self.peek_byte() {
                    if ch == b'\n' || ch == b'\r' {
                        break;
                    }
                    self.position += 1;
                }
            } else {
                break;
            }
        }
    }

    /// Returns the next token without consuming it.
    pub fn peek_token(&mut self) -> ParseResult<Token> {
        let saved = self.position;
        let token = self.next_token();
        self.position = saved;
        token
    }

    pub fn next_token(&mut self) -> ParseResult<Token> {
        self.skip_whitespace();
        let Some(ch) = self.peek_byte() else {
            return Ok(Token::Eof);
        };

        match ch {
            b'/' => self.read_name(),
            b'(' => self.read_literal_string(),
            b'<' => self.read_angle_bracket(),
            b'>' => {
                self.position += 1;
                if self.next_byte()? == b'>' {
                    Ok(Token::DictEnd)
                } else {
                    Err(self.syntax("expected '>>'"))
                }
            }
            b'[' => {
                self.position += 1;
                Ok(Token::ArrayStart)
            }
            b']' => {
                self.position += 1;
                Ok(Token::ArrayEnd)
            }
            b'+' | b'-' | b'.' | b'0'..=b'9' => self.read_number(),
            b')' | b'{' | b'}' => Err(self.syntax(format!("unexpected '{}'", ch as char))),
            _ => Ok(self.read_word()),
        }
    }

    fn read_word(&mut self) -> Token {
        let start = self.position;
        while let Some(ch) = self.peek_byte() {
            if is_whitespace(ch) || is_delimiter(ch) {
                break;
            }
            self.position += 1;
        }
        let word = String::from_utf8_lossy(&self.data[start..self.position]).into_owned();
        match word.as_str() {
            "true" => Token::Boolean(true),
            "false" => Token::Boolean(false),
            "null" => Token::Null,
            _ => Token::Keyword(word),
        }
    }

    fn read_name(&mut self) -> ParseResult<Token> {
        self.position += 1;
        let mut name = String::new();
        while let Some(ch) = self.peek_byte() {
            if is_whitespace(ch) || is_delimiter(ch) {
                break;
            }
            self.position += 1;
            if ch == b'#' {
                let high = self.next_byte()?;
                let low = self.next_byte()?;
                let hex = [high, low];
                let value = std::str::from_utf8(&hex)
                    .ok()
                    .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                    .ok_or_else(|| self.syntax("invalid hex code in name"))?;
                name.push(value as char);
            } else {
                name.push(ch as char);
            }
        }
        Ok(Token::Name(name))
    }

    fn read_literal_string(&mut self) -> ParseResult<Token> {
        self.position += 1;
        let mut string = Vec::new();
        let mut depth = 1;

        loop {
            let ch = self.next_byte()?;
            match ch {
                b'\\' => {
                    let escaped = self.next_byte()?;
                    match escaped {
                        b'n' => string.push(b'\n'),
                        b'r' => string.push(b'\r'),
                        b't' => string.push(b'\t'),
                        b'b' => string.push(b'\x08'),
                        b'f' => string.push(b'\x0C'),
                        b'0'..=b'7' => {
                            let mut value = u32::from(escaped - b'0');
                            for _ in 0..2 {
                                match self.peek_byte() {
                                    Some(digit @ b'0'..=b'7') => {
                                        self.position += 1;
                                        value = value * 8 + u32::from(digit - b'0');
                                    }
                                    _ => break,
                                }
                            }
                            string.push((value & 0xFF) as u8);
                        }
                        // Line continuation
                        b'\n' => {}
                        b'\r' => {
                            if self.peek_byte() == Some(b'\n') {
                                self.position += 1;
                            }
                        }
                        other => string.push(other),
                    }
                }
                b'(' => {
                    depth += 1;
                    string.push(ch);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(Token::String(string));
                    }
                    string.push(ch);
                }
                _ => string.push(ch),
            }
        }
    }

    fn read_angle_bracket(&mut self) -> ParseResult<Token> {
        self.position += 1;
        if self.peek_byte() == Some(b'<') {
            self.position += 1;
            return Ok(Token::DictStart);
        }

        let mut digits = Vec::new();
        loop {
            let ch = self.next_byte()?;
            match ch {
                b'>' => break,
                _ if ch.is_ascii_hexdigit() => digits.push(ch),
                _ if is_whitespace(ch) => {}
                _ => return Err(self.syntax("invalid character in hex string")),
            }
        }
        if digits.len() % 2 != 0 {
            digits.push(b'0');
        }

        let bytes = digits
            .chunks(2)
            .map(|pair| {
                std::str::from_utf8(pair)
                    .ok()
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                    .ok_or_else(|| self.syntax("invalid hex string"))
            })
            .collect::<ParseResult<Vec<u8>>>()?;
        Ok(Token::String(bytes))
    }

    fn read_number(&mut self) -> ParseResult<Token> {
        let start = self.position;
        if matches!(self.peek_byte(), Some(b'+' | b'-')) {
            self.position += 1;
        }
        let mut has_dot = false;
        while let Some(ch) = self.peek_byte() {
            match ch {
                b'0'..=b'9' => self.position += 1,
                b'.' if !has_dot => {
                    has_dot = true;
                    self.position += 1;
                }
                _ => break,
            }
        }

        let text = std::str::from_utf8(&self.data[start..self.position])
            .map_err(|_| self.syntax("invalid number"))?;
        if has_dot {
            text.parse::<f64>()
                .map(Token::Real)
                .map_err(|_| self.syntax(format!("invalid real '{text}'")))
        } else {
            text.parse::<i64>()
                .map(Token::Integer)
                .map_err(|_| self.syntax(format!("invalid integer '{text}'")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(input: &[u8]) -> Vec<Token> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            if token == Token::Eof {
                return tokens;
            }
            tokens.push(token);
        }
    }

    #[test]
    fn test_object_introducer() {
        assert_eq!(
            tokens(b"12 0 obj\n<< /Type /Page >>\nendobj"),
            vec![
                Token::Integer(12),
                Token::Integer(0),
                Token::Keyword("obj".to_string()),
                Token::DictStart,
                Token::Name("Type".to_string()),
                Token::Name("Page".to_string()),
                Token::DictEnd,
                Token::Keyword("endobj".to_string()),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokens(b"-1 +7 612.0 .5 -13.5"),
            vec![
                Token::Integer(-1),
                Token::Integer(7),
                Token::Real(612.0),
                Token::Real(0.5),
                Token::Real(-13.5),
            ]
        );
    }

    #[test]
    fn test_literal_string_escapes() {
        assert_eq!(
            tokens(br"(a \(b\) \\c\n\101 (nested))"),
            vec![Token::String(b"a (b) \\c\nA (nested)".to_vec())]
        );
    }

    #[test]
    fn test_hex_string_and_names() {
        assert_eq!(
            tokens(b"<00ab1> /A#20B"),
            vec![
                Token::String(vec![0x00, 0xAB, 0x10]),
                Token::Name("A B".to_string()),
            ]
        );
    }

    #[test]
    fn test_comments_and_keywords() {
        assert_eq!(
            tokens(b"%PDF-1.4\n%comment\ntrue null BT T* ET"),
            vec![
                Token::Boolean(true),
                Token::Null,
                Token::Keyword("BT".to_string()),
                Token::Keyword("T*".to_string()),
                Token::Keyword("ET".to_string()),
            ]
        );
    }

    #[test]
    fn test_unterminated_string_is_eof() {
        let err = Lexer::new(b"(never closed").next_token().unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { position: 13 }));
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut lexer = Lexer::new(b"5 0 R");
        assert_eq!(lexer.peek_token().unwrap(), Token::Integer(5));
        assert_eq!(lexer.next_token().unwrap(), Token::Integer(5));
        assert_eq!(lexer.position(), 1);
    }
}
