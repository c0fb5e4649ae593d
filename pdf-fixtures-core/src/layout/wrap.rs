use std::collections::VecDeque;

/// Greedy line filler over a token stream.
///
/// Lines are produced lazily as tokens are pulled, so the wrapper can sit
/// on top of an arbitrarily long word source without buffering it. A token
/// ending in `.` closes the current paragraph; consecutive paragraphs are
/// separated by exactly one blank line and no blank line ever leads or
/// trails the output. Tokens wider than a whole line are split across
/// lines.
pub struct LineWrapper<I> {
    tokens: I,
    width: usize,
    sentence_breaks: bool,
    current: String,
    current_len: usize,
    ready: VecDeque<String>,
    separator_pending: bool,
    exhausted: bool,
}

impl<I> LineWrapper<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    pub fn new(tokens: I, width: usize) -> Self {
        Self {
            tokens,
            width: width.max(1),
            sentence_breaks: true,
            current: String::new(),
            current_len: 0,
            ready: VecDeque::new(),
            separator_pending: false,
            exhausted: false,
        }
    }

    /// Treats the whole token stream as one paragraph.
    pub fn without_sentence_breaks(mut self) -> Self {
        self.sentence_breaks = false;
        self
    }

    fn place(&mut self, word: &str) {
        let word_len = word.chars().count();
        if self.current_len > 0 {
            if self.current_len + 1 + word_len <= self.width {
                self.current.push(' ');
                self.current.push_str(word);
                self.current_len += 1 + word_len;
                return;
            }
            self.close_line();
        }

        if word_len <= self.width {
            self.current.push_str(word);
            self.current_len = word_len;
            return;
        }

        let chars: Vec<char> = word.chars().collect();
        let mut chunks = chars.chunks(self.width).peekable();
        while let Some(chunk) = chunks.next() {
            let piece: String = chunk.iter().collect();
            if chunks.peek().is_some() {
                self.ready.push_back(piece);
            } else {
                self.current_len = chunk.len();
                self.current = piece;
            }
        }
    }

    fn close_line(&mut self) {
        if self.current_len > 0 {
            self.ready.push_back(std::mem::take(&mut self.current));
            self.current_len = 0;
        }
    }
}

impl<I> Iterator for LineWrapper<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(line) = self.ready.pop_front() {
                return Some(line);
            }
            if self.exhausted {
                return None;
            }

            match self.tokens.next() {
                None => {
                    self.exhausted = true;
                    self.close_line();
                }
                Some(token) => {
                    let word = token.as_ref().trim();
                    if word.is_empty() {
                        continue;
                    }
                    if self.separator_pending {
                        self.ready.push_back(String::new());
                        self.separator_pending = false;
                    }
                    self.place(word);
                    if self.sentence_breaks && word.ends_with('.') {
                        self.close_line();
                        self.separator_pending = true;
                    }
                }
            }
        }
    }
}

/// Wraps a single paragraph of text into lines of at most `width` characters.
pub fn wrap_paragraph(text: &str, width: usize) -> Vec<String> {
    LineWrapper::new(text.split_whitespace(), width)
        .without_sentence_breaks()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::FixedTokens;
    use pretty_assertions::assert_eq;

    fn wrap(text: &str, width: usize) -> Vec<String> {
        LineWrapper::new(FixedTokens::new(text), width).collect()
    }

    #[test]
    fn test_greedy_fill() {
        let lines = wrap("aa bb cc dd ee", 5);
        assert_eq!(lines, vec!["aa bb", "cc dd", "ee"]);
    }

    #[test]
    fn test_exact_fit() {
        let lines = wrap("abc def", 7);
        assert_eq!(lines, vec!["abc def"]);
    }

    #[test]
    fn test_paragraphs_separated_by_one_blank_line() {
        let lines = wrap("One two. Three four. Five", 20);
        assert_eq!(lines, vec!["One two.", "", "Three four.", "", "Five"]);
    }

    #[test]
    fn test_no_trailing_blank_line() {
        let lines = wrap("Done. Over.", 20);
        assert_eq!(lines, vec!["Done.", "", "Over."]);
        assert_ne!(lines.last().map(String::as_str), Some(""));
    }

    #[test]
    fn test_long_words_are_split() {
        let lines = wrap("ab abcdefghij cd", 4);
        assert_eq!(lines, vec!["ab", "abcd", "efgh", "ij", "cd"]);
        assert!(lines.iter().all(|line| line.chars().count() <= 4));
    }

    #[test]
    fn test_empty_input() {
        assert!(wrap("", 10).is_empty());
        assert!(wrap("   ", 10).is_empty());
    }

    #[test]
    fn test_without_sentence_breaks() {
        let lines = wrap_paragraph("First sentence. Second sentence.", 40);
        assert_eq!(lines, vec!["First sentence. Second sentence."]);
    }

    #[test]
    fn test_lazy_consumption() {
        let mut pulled = 0;
        let tokens = std::iter::repeat("word").inspect(|_| pulled += 1).take(1_000);
        let first: Vec<String> = LineWrapper::new(tokens, 9).take(1).collect();
        assert_eq!(first, vec!["word word"]);
        assert!(pulled < 10);
    }

    #[test]
    fn test_zero_width_is_clamped() {
        let lines = wrap("ab", 0);
        assert_eq!(lines, vec!["a", "b"]);
    }
}
