//! Text annotation — the linguistic parser boundary.
//!
//! The matching pipeline only ever sees an [`Annotation`]: a token stream with
//! POS tags, stop-word/punctuation flags and dependency arcs, plus noun-chunk
//! spans. How that stream is produced is up to the [`TextAnnotator`] backend:
//!
//! - `RuleAnnotator` (default): offline lexicon + heuristics, deterministic.
//! - `RemoteAnnotator`: JSON over HTTP to an external parser service.
//!
//! `AppState` holds an `Arc<dyn TextAnnotator>`, chosen at startup via config.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod lexicon;
pub mod remote;
pub mod rules;

pub use remote::RemoteAnnotator;
pub use rules::RuleAnnotator;

#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Annotator API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Malformed annotation: {0}")]
    Malformed(String),
}

/// Coarse part-of-speech class. Only `Noun`/`Propn` drive extraction; the
/// rest exist so backends can report what they saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartOfSpeech {
    #[serde(rename = "NOUN")]
    Noun,
    #[serde(rename = "PROPN")]
    Propn,
    #[serde(rename = "VERB")]
    Verb,
    #[serde(rename = "ADJ")]
    Adj,
    #[serde(rename = "ADV")]
    Adv,
    #[serde(rename = "NUM")]
    Num,
    #[serde(other)]
    Other,
}

impl PartOfSpeech {
    pub fn is_nominal(self) -> bool {
        matches!(self, PartOfSpeech::Noun | PartOfSpeech::Propn)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedToken {
    pub text: String,
    pub lower: String,
    pub pos: PartOfSpeech,
    pub is_stop: bool,
    pub is_punct: bool,
    /// Dependency label (spaCy/ClearNLP label set: `dobj`, `attr`, `nsubj`, ...).
    pub dep: String,
    /// Index of the syntactic head. The sentence root points to itself.
    pub head: usize,
    pub is_title: bool,
    /// Byte offset of the token in the source text.
    pub idx: usize,
}

impl AnnotatedToken {
    /// Number of characters in the surface form.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NounChunk {
    /// Token span, end-exclusive.
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl NounChunk {
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Annotation {
    pub tokens: Vec<AnnotatedToken>,
    pub noun_chunks: Vec<NounChunk>,
}

impl Annotation {
    /// Direct dependents of token `i`.
    pub fn children(&self, i: usize) -> impl Iterator<Item = &AnnotatedToken> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .filter(move |(j, t)| *j != i && t.head == i)
            .map(|(_, t)| t)
    }

    /// Builds the chunk text from token offsets so it mirrors the source slice.
    pub(crate) fn span_text(text: &str, tokens: &[AnnotatedToken], start: usize, end: usize) -> String {
        match (tokens.get(start), end.checked_sub(1).and_then(|e| tokens.get(e))) {
            (Some(first), Some(last)) if start < end => {
                let from = first.idx;
                last.idx
                    .checked_add(last.text.len())
                    .and_then(|to| text.get(from..to))
                    .map(str::to_string)
                    .unwrap_or_else(|| join_tokens(&tokens[start..end]))
            }
            _ => String::new(),
        }
    }
}

fn join_tokens(tokens: &[AnnotatedToken]) -> String {
    tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The annotator trait. Implement this to plug in a different parser backend
/// without touching the extractors.
#[async_trait]
pub trait TextAnnotator: Send + Sync {
    /// Backend label, reported by `/health`.
    fn name(&self) -> &'static str;

    async fn annotate(&self, text: &str) -> Result<Annotation, AnnotateError>;
}

/// Title-case test with the same rules as Python's `str.istitle()`:
/// at least one cased character, uppercase only after an uncased character,
/// lowercase only after a cased one.
pub fn is_title_case(s: &str) -> bool {
    let mut seen_cased = false;
    let mut prev_cased = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_cased {
                return false;
            }
            prev_cased = true;
            seen_cased = true;
        } else if c.is_lowercase() {
            if !prev_cased {
                return false;
            }
            prev_cased = true;
            seen_cased = true;
        } else {
            prev_cased = false;
        }
    }

    seen_cased
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_title_case_matches_python_istitle() {
        assert!(is_title_case("Python"));
        assert!(is_title_case("Node.Js"));
        assert!(is_title_case("A"));
        assert!(is_title_case("Google Analytics"));
        assert!(!is_title_case("SQL"));
        assert!(!is_title_case("PowerBI"));
        assert!(!is_title_case("python"));
        assert!(!is_title_case("3"));
        assert!(!is_title_case(""));
        assert!(!is_title_case("Google analytics"));
    }

    #[test]
    fn test_children_excludes_self_loop() {
        let ann = annotation(
            vec![
                tok("experience", PartOfSpeech::Noun).arc("ROOT", 0),
                tok("Flask", PartOfSpeech::Propn).arc("dobj", 0),
            ],
            &[],
        );
        let kids: Vec<&str> = ann.children(0).map(|t| t.text.as_str()).collect();
        assert_eq!(kids, vec!["Flask"]);
        assert_eq!(ann.children(1).count(), 0);
    }

    #[test]
    fn test_span_text_uses_source_slice() {
        let ann = annotation(
            vec![
                stop("a"),
                tok("Python", PartOfSpeech::Propn),
                tok("developer", PartOfSpeech::Noun),
            ],
            &[(0, 3)],
        );
        assert_eq!(ann.noun_chunks[0].text, "a Python developer");
        assert_eq!(ann.noun_chunks[0].word_count(), 3);
    }

    #[test]
    fn test_span_text_falls_back_when_offsets_overflow() {
        let mut ann = annotation(
            vec![
                tok("Python", PartOfSpeech::Propn),
                tok("developer", PartOfSpeech::Noun),
            ],
            &[],
        );
        ann.tokens[1].idx = usize::MAX;
        let text = Annotation::span_text("Python developer", &ann.tokens, 0, 2);
        assert_eq!(text, "Python developer");
    }

    #[test]
    fn test_pos_deserializes_unknown_as_other() {
        let pos: PartOfSpeech = serde_json::from_str(r#""CCONJ""#).unwrap();
        assert_eq!(pos, PartOfSpeech::Other);
        let pos: PartOfSpeech = serde_json::from_str(r#""PROPN""#).unwrap();
        assert!(pos.is_nominal());
    }
}
