/// Escapes text for use inside a `( )` literal string.
///
/// Backslash and both parentheses delimit literals and must always be
/// escaped. Line breaks and tabs use their named escapes; any other control
/// or non-ASCII byte is written as a three-digit octal escape so the literal
/// stays on one 7-bit line.
pub fn escape_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'(' => escaped.push_str("\\("),
            b')' => escaped.push_str("\\)"),
            b'\\' => escaped.push_str("\\\\"),
            b'\n' => escaped.push_str("\\n"),
            b'\r' => escaped.push_str("\\r"),
            b'\t' => escaped.push_str("\\t"),
            0x20..=0x7E => escaped.push(byte as char),
            _ => escaped.push_str(&format!("\\{byte:03o}")),
        }
    }
    escaped
}
