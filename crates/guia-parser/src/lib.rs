//! Guia Parser - Segmentation of free-form restaurant descriptions
//!
//! Input files are plain UTF-8 prose: one paragraph per restaurant,
//! paragraphs separated by one or more blank lines, each one starting
//! by convention with `"<Name>: "`.
//!
//! - [`split_paragraphs`] turns raw text into [`RawDescription`]s
//! - [`split_sentences`] segments a paragraph body for the pattern extractor
//! - [`load_text`] reads an input file with typed errors

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while reading description files
#[derive(Error, Debug)]
pub enum ParserError {
    /// IO error while reading the file
    #[error("IO error reading file: {path}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid UTF-8
    #[error("Text encoding error in {path}: {message}")]
    EncodingError { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, ParserError>;

// ============================================================================
// Raw Descriptions
// ============================================================================

/// One paragraph of free text plus where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDescription {
    /// Zero-based position among the non-empty paragraphs of the input
    pub index: usize,

    /// Originating file identity (path, `<stdin>`, ...)
    pub source: String,

    /// Trimmed paragraph text
    pub text: String,
}

impl RawDescription {
    /// Create a new raw description
    pub fn new(index: usize, source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            index,
            source: source.into(),
            text: text.into(),
        }
    }
}

/// Split raw text into one description per blank-line-delimited block
///
/// Lines holding only whitespace count as blank. A fully blank input yields
/// an empty vector.
pub fn split_paragraphs(raw_text: &str, source: &str) -> Vec<RawDescription> {
    let mut paragraphs = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in raw_text.lines() {
        if line.trim().is_empty() {
            flush_block(&mut block, &mut paragraphs, source);
        } else {
            block.push(line);
        }
    }
    flush_block(&mut block, &mut paragraphs, source);

    paragraphs
}

fn flush_block(block: &mut Vec<&str>, paragraphs: &mut Vec<RawDescription>, source: &str) {
    if block.is_empty() {
        return;
    }

    let text = block.join("\n");
    let text = text.trim();
    if !text.is_empty() {
        paragraphs.push(RawDescription::new(paragraphs.len(), source, text));
    }
    block.clear();
}

// ============================================================================
// Sentence Segmentation
// ============================================================================

/// Abbreviations that end with a period without ending the sentence
const ABBREVIATIONS: &[&str] = &[
    "av", "r", "al", "dr", "dra", "pça", "pca", "n", "nº", "sr", "sra", "prof", "tv", "est",
];

/// Segment prose into sentences
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace or the end of
/// the text. Periods closing address abbreviations (`Av.`, `R.`, `Al.`...)
/// do not end a sentence. Returned sentences are trimmed and keep their
/// closing punctuation.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }

        let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
        if !at_boundary {
            continue;
        }

        if c == '.' && ends_with_abbreviation(&text[start..pos]) {
            continue;
        }

        let end = pos + c.len_utf8();
        push_sentence(&text[start..end], &mut sentences);
        start = end;
    }

    if start < text.len() {
        push_sentence(&text[start..], &mut sentences);
    }

    sentences
}

fn ends_with_abbreviation(fragment: &str) -> bool {
    fragment
        .split_whitespace()
        .last()
        .map(|word| {
            let word = word.trim_start_matches(|c: char| !c.is_alphanumeric());
            ABBREVIATIONS.contains(&word.to_lowercase().as_str())
        })
        .unwrap_or(false)
}

fn push_sentence(fragment: &str, sentences: &mut Vec<String>) {
    let sentence = fragment.trim();
    if !sentence.is_empty() {
        sentences.push(sentence.to_string());
    }
}

// ============================================================================
// File Loading
// ============================================================================

/// Read a UTF-8 description file
pub fn load_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| ParserError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    String::from_utf8(bytes).map_err(|e| ParserError::EncodingError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_split_on_blank_lines() {
        let text = "Momokuri: Restaurante japonês.\n\n\n   \nOtoshi Izakaya: Izakaya.\nAceita vale-refeição.\n";
        let paragraphs = split_paragraphs(text, "input.txt");

        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].index, 0);
        assert_eq!(paragraphs[0].text, "Momokuri: Restaurante japonês.");
        assert_eq!(paragraphs[1].index, 1);
        assert_eq!(paragraphs[1].source, "input.txt");
        assert_eq!(
            paragraphs[1].text,
            "Otoshi Izakaya: Izakaya.\nAceita vale-refeição."
        );
    }

    #[test]
    fn test_blank_input_is_empty() {
        assert!(split_paragraphs("", "x").is_empty());
        assert!(split_paragraphs("  \n\n\t\n", "x").is_empty());
    }

    #[test]
    fn test_crlf_input() {
        let paragraphs = split_paragraphs("A: um.\r\n\r\nB: dois.\r\n", "x");
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[1].text, "B: dois.");
    }

    #[test]
    fn test_split_sentences() {
        let sentences =
            split_sentences("Bar descolado. Fica na Av. Faria Lima, 2000! Aceita vale-refeição");

        assert_eq!(
            sentences,
            vec![
                "Bar descolado.",
                "Fica na Av. Faria Lima, 2000!",
                "Aceita vale-refeição",
            ]
        );
    }

    #[test]
    fn test_split_sentences_keeps_decimal_and_price_tokens() {
        let sentences = split_sentences("Prato a R$ 45.90 em média. Faixa de preço: $$.");
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[1], "Faixa de preço: $$.");
    }

    #[test]
    fn test_load_text() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Jojo Ramen: Ramen.").unwrap();

        let text = load_text(file.path()).unwrap();
        assert_eq!(text, "Jojo Ramen: Ramen.");
    }

    #[test]
    fn test_load_text_rejects_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00]).unwrap();

        assert!(matches!(
            load_text(file.path()),
            Err(ParserError::EncodingError { .. })
        ));
    }
}
