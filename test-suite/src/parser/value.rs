use super::{Lexer, ParseError, ParseResult, Token};
use std::collections::BTreeMap;
use std::fmt;

/// Indirect reference `number generation R`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef {
    pub number: u32,
    pub generation: u16,
}

impl ObjectRef {
    pub const fn new(number: u32, generation: u16) -> Self {
        Self { number, generation }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.number, self.generation)
    }
}

pub type Dictionary = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(Vec<u8>),
    Name(String),
    Array(Vec<Value>),
    Dictionary(Dictionary),
    Reference(ObjectRef),
}

impl Value {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Value::Name(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<ObjectRef> {
        match self {
            Value::Reference(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Value::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// Every reference reachable without following references.
    pub fn references(&self) -> Vec<ObjectRef> {
        let mut found = Vec::new();
        self.collect_references(&mut found);
        found
    }

    fn collect_references(&self, found: &mut Vec<ObjectRef>) {
        match self {
            Value::Reference(id) => found.push(*id),
            Value::Array(items) => items.iter().for_each(|item| item.collect_references(found)),
            Value::Dictionary(dict) => dict.values().for_each(|item| item.collect_references(found)),
            _ => {}
        }
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Integer(i) => format!("integer {i}"),
        Token::Real(r) => format!("number {r}"),
        Token::Keyword(word) => format!("'{word}'"),
        Token::Eof => "end of file".to_string(),
        other => format!("{other:?}"),
    }
}

/// Parses one direct object, folding `n g R` into a reference.
pub fn parse_value(lexer: &mut Lexer<'_>) -> ParseResult<Value> {
    let start = lexer.position();
    let token = lexer.next_token()?;
    parse_from_token(lexer, token, start)
}

fn parse_from_token(lexer: &mut Lexer<'_>, token: Token, start: usize) -> ParseResult<Value> {
    match token {
        Token::Null => Ok(Value::Null),
        Token::Boolean(b) => Ok(Value::Boolean(b)),
        Token::Real(r) => Ok(Value::Real(r)),
        Token::String(bytes) => Ok(Value::String(bytes)),
        Token::Name(name) => Ok(Value::Name(name)),
        Token::Integer(number) => {
            let after_number = lexer.position();
            if let Some(reference) = try_reference(lexer, number)? {
                return Ok(Value::Reference(reference));
            }
            lexer.seek(after_number);
            Ok(Value::Integer(number))
        }
        Token::ArrayStart => {
            let mut items = Vec::new();
            loop {
                let item_start = lexer.position();
                match lexer.next_token()? {
                    Token::ArrayEnd => return Ok(Value::Array(items)),
                    Token::Eof => {
                        return Err(ParseError::UnexpectedEof {
                            position: lexer.position(),
                        })
                    }
                    token => items.push(parse_from_token(lexer, token, item_start)?),
                }
            }
        }
        Token::DictStart => {
            let mut dict = Dictionary::new();
            loop {
                let key_start = lexer.position();
                match lexer.next_token()? {
                    Token::DictEnd => return Ok(Value::Dictionary(dict)),
                    Token::Name(key) => {
                        let value = parse_value(lexer)?;
                        dict.insert(key, value);
                    }
                    Token::Eof => {
                        return Err(ParseError::UnexpectedEof {
                            position: lexer.position(),
                        })
                    }
                    other => {
                        lexer.skip_whitespace();
                        return Err(ParseError::UnterminatedDictionary {
                            position: key_start.max(start),
                            found: describe(&other),
                        });
                    }
                }
            }
        }
        Token::Eof => Err(ParseError::UnexpectedEof { position: start }),
        other => Err(ParseError::Syntax {
            position: start,
            message: format!("expected an object, found {}", describe(&other)),
        }),
    }
}

fn try_reference(lexer: &mut Lexer<'_>, number: i64) -> ParseResult<Option<ObjectRef>> {
    let Ok(Token::Integer(generation)) = lexer.next_token() else {
        return Ok(None);
    };
    if lexer.next_token().ok() != Some(Token::Keyword("R".to_string())) {
        return Ok(None);
    }
    match (u32::try_from(number), u16::try_from(generation)) {
        (Ok(number), Ok(generation)) => Ok(Some(ObjectRef::new(number, generation))),
        _ => Err(ParseError::Syntax {
            position: lexer.position(),
            message: format!("reference {number} {generation} R is out of range"),
        }),
    }
}
