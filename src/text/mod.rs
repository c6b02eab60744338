//! Sentence segmentation.
//!
//! The rest of the system treats this as a pure collaborator:
//! `split(text) -> ordered list of non-empty trimmed sentences`. Empty or
//! whitespace-only input yields an empty list; non-empty text with no
//! sentence-ending punctuation yields the whole trimmed string as a single
//! sentence.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Split text into sentences at terminal punctuation (`.`, `!`, `?`).
///
/// Runs of whitespace are collapsed first, so multi-line input is handled
/// uniformly. A punctuation run followed by whitespace closes a sentence;
/// trailing text without terminal punctuation is returned as a final
/// sentence of its own.
pub fn split_into_sentences(text: &str) -> Vec<String> {
    let normalized = WHITESPACE.replace_all(text.trim(), " ");
    if normalized.is_empty() {
        return Vec::new();
    }

    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut after_terminal = false;

    for ch in normalized.chars() {
        match ch {
            '.' | '!' | '?' => {
                current.push(ch);
                after_terminal = true;
            }
            c if c.is_whitespace() && after_terminal => {
                flush(&mut current, &mut sentences);
                after_terminal = false;
            }
            c => {
                current.push(c);
                after_terminal = false;
            }
        }
    }
    flush(&mut current, &mut sentences);

    sentences
}

fn flush(current: &mut String, sentences: &mut Vec<String>) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_basic() {
        let sentences = split_into_sentences("This is one. This is two. This is three.");
        assert_eq!(sentences, vec!["This is one.", "This is two.", "This is three."]);
    }

    #[test]
    fn test_split_mixed_punctuation() {
        let sentences = split_into_sentences("Really? Yes! Good.");
        assert_eq!(sentences, vec!["Really?", "Yes!", "Good."]);
    }

    #[test]
    fn test_empty_input() {
        assert!(split_into_sentences("").is_empty());
        assert!(split_into_sentences("   \n\t  ").is_empty());
    }

    #[test]
    fn test_no_terminal_punctuation_is_single_sentence() {
        let sentences = split_into_sentences("just a fragment with no ending");
        assert_eq!(sentences, vec!["just a fragment with no ending"]);
    }

    #[test]
    fn test_whitespace_normalized() {
        let sentences = split_into_sentences("First  sentence.\n\nSecond\tsentence.");
        assert_eq!(sentences, vec!["First sentence.", "Second sentence."]);
    }

    #[test]
    fn test_trailing_fragment_kept() {
        let sentences = split_into_sentences("Complete sentence. trailing fragment");
        assert_eq!(sentences, vec!["Complete sentence.", "trailing fragment"]);
    }
}
