//! Text extraction from content streams.

use super::{parse_value, Lexer, ParseResult, Token, Value};

fn decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Returns the text shown by each `Tj`, `TJ`, `'` or `"` operator, one
/// entry per operator, in stream order.
pub fn extract_text_lines(content: &[u8]) -> ParseResult<Vec<String>> {
    let mut lexer = Lexer::new(content);
    let mut operands: Vec<Value> = Vec::new();
    let mut lines = Vec::new();

    loop {
        match lexer.peek_token()? {
            Token::Eof => return Ok(lines),
            Token::Keyword(operator) => {
                lexer.next_token()?;
                match operator.as_str() {
                    "Tj" | "'" | "\"" => {
                        if let Some(Value::String(bytes)) = operands.last() {
                            lines.push(decode(bytes));
                        }
                    }
                    "TJ" => {
                        if let Some(Value::Array(items)) = operands.last() {
                            let text = items
                                .iter()
                                .filter_map(|item| match item {
                                    Value::String(bytes) => Some(decode(bytes)),
                                    _ => None,
                                })
                                .collect::<String>();
                            lines.push(text);
                        }
                    }
                    _ => {}
                }
                operands.clear();
            }
            _ => operands.push(parse_value(&mut lexer)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extracts_shown_strings() {
        let content = b"BT\n/F1 12 Tf\n72 720 Td\n(Hello) Tj\n0 -14 Td\n() Tj\n(a \\(b\\)) Tj\nET\n";
        assert_eq!(
            extract_text_lines(content).unwrap(),
            vec!["Hello".to_string(), String::new(), "a (b)".to_string()]
        );
    }

    #[test]
    fn test_tj_array_and_quote_operators() {
        let content = b"BT [(Hel) -20 (lo)] TJ (next) ' 1 2 (last) \" ET";
        assert_eq!(
            extract_text_lines(content).unwrap(),
            vec!["Hello".to_string(), "next".to_string(), "last".to_string()]
        );
    }

    #[test]
    fn test_operators_without_text_are_ignored() {
        assert!(extract_text_lines(b"q 1 0 0 1 0 0 cm Q").unwrap().is_empty());
    }
}
