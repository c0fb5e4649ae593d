//! Overwrite confirmation for existing output files.

use crate::error::Result;
use std::io::{BufRead, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputDecision {
    /// Path is free, or the user agreed to replace it
    Proceed,
    /// User kept the existing file; nothing is written
    Declined,
}

pub fn overwrite_prompt(path: &Path) -> String {
    format!("File '{}' already exists. Overwrite? (y/N): ", path.display())
}

/// `y` or `yes` in any case; everything else, including an empty line or
/// end of input, declines.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Asks before replacing an existing file.
///
/// Nothing is read or printed when `path` does not exist or when
/// `assume_yes` is set.
pub fn check_overwrite<R, W>(
    path: &Path,
    assume_yes: bool,
    input: &mut R,
    prompt: &mut W,
) -> Result<OutputDecision>
where
    R: BufRead,
    W: Write,
{
    if assume_yes || !path.exists() {
        return Ok(OutputDecision::Proceed);
    }

    write!(prompt, "{}", overwrite_prompt(path))?;
    prompt.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    if is_affirmative(&answer) {
        Ok(OutputDecision::Proceed)
    } else {
        tracing::debug!(path = %path.display(), "overwrite declined");
        Ok(OutputDecision::Declined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn ask(path: &Path, assume_yes: bool, answer: &str) -> (OutputDecision, String) {
        let mut input = Cursor::new(answer.as_bytes().to_vec());
        let mut prompt = Vec::new();
        let decision = check_overwrite(path, assume_yes, &mut input, &mut prompt).unwrap();
        (decision, String::from_utf8(prompt).unwrap())
    }

    #[test]
    fn test_missing_file_proceeds_silently() {
        let dir = TempDir::new().unwrap();
        let (decision, prompt) = ask(&dir.path().join("new.pdf"), false, "");
        assert_eq!(decision, OutputDecision::Proceed);
        assert!(prompt.is_empty());
    }

    #[test]
    fn test_existing_file_prompts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("existing.pdf");
        std::fs::write(&path, b"old").unwrap();

        let (decision, prompt) = ask(&path, false, "y\n");
        assert_eq!(decision, OutputDecision::Proceed);
        assert_eq!(prompt, overwrite_prompt(&path));
        assert!(prompt.ends_with("already exists. Overwrite? (y/N): "));

        assert_eq!(ask(&path, false, "YES\n").0, OutputDecision::Proceed);
        assert_eq!(ask(&path, false, "n\n").0, OutputDecision::Declined);
        assert_eq!(ask(&path, false, "\n").0, OutputDecision::Declined);
        assert_eq!(ask(&path, false, "").0, OutputDecision::Declined);
        assert_eq!(ask(&path, false, "yep\n").0, OutputDecision::Declined);
    }

    #[test]
    fn test_assume_yes_skips_prompt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("existing.pdf");
        std::fs::write(&path, b"old").unwrap();

        let (decision, prompt) = ask(&path, true, "n\n");
        assert_eq!(decision, OutputDecision::Proceed);
        assert!(prompt.is_empty());
    }
}
