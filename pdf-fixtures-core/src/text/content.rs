use super::escape_literal;
use crate::writer::format_number;

/// Builder for page content stream operators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentStream {
    operations: String,
}

impl ContentStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_text(&mut self) -> &mut Self {
        self.operations.push_str("BT\n");
        self
    }

    pub fn end_text(&mut self) -> &mut Self {
        self.operations.push_str("ET\n");
        self
    }

    /// `/<resource> <size> Tf`
    pub fn set_font(&mut self, resource: &str, size: f64) -> &mut Self {
        self.operations
            .push_str(&format!("/{resource} {} Tf\n", format_number(size)));
        self
    }

    /// `<dx> <dy> Td`, relative to the start of the current line.
    pub fn move_text(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.operations.push_str(&format!(
            "{} {} Td\n",
            format_number(dx),
            format_number(dy)
        ));
        self
    }

    /// `(<text>) Tj` with the literal escaped.
    pub fn show_text(&mut self, text: &str) -> &mut Self {
        self.operations.push('(');
        self.operations.push_str(&escape_literal(text));
        self.operations.push_str(") Tj\n");
        self
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.operations.as_bytes()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.operations.into_bytes()
    }
}
