//! RemoteAnnotator — delegates parsing to an external service (e.g. a spaCy
//! model behind a small HTTP wrapper).
//!
//! Wire format (response):
//! ```json
//! {"tokens": [{"text": "Python", "pos": "PROPN", "is_stop": false,
//!              "is_punct": false, "dep": "compound", "head": 1, "idx": 0}],
//!  "noun_chunks": [{"start": 0, "end": 2}]}
//! ```
//! `lower`, `is_title` and chunk text are derived locally; `idx` is optional.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::nlp::{
    is_title_case, AnnotateError, AnnotatedToken, Annotation, NounChunk, PartOfSpeech,
    TextAnnotator,
};

#[derive(Debug, Serialize)]
struct AnnotateRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct WireAnnotation {
    tokens: Vec<WireToken>,
    #[serde(default)]
    noun_chunks: Vec<WireChunk>,
}

#[derive(Debug, Deserialize)]
struct WireToken {
    text: String,
    pos: PartOfSpeech,
    #[serde(default)]
    is_stop: bool,
    #[serde(default)]
    is_punct: bool,
    #[serde(default)]
    dep: String,
    head: usize,
    idx: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct WireChunk {
    start: usize,
    end: usize,
}

#[derive(Clone)]
pub struct RemoteAnnotator {
    client: Client,
    url: String,
}

impl RemoteAnnotator {
    pub fn new(url: String) -> Result<Self, AnnotateError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl TextAnnotator for RemoteAnnotator {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn annotate(&self, text: &str) -> Result<Annotation, AnnotateError> {
        let response = self
            .client
            .post(&self.url)
            .json(&AnnotateRequest { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AnnotateError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let wire: WireAnnotation = serde_json::from_str(&body)?;
        let annotation = from_wire(text, wire)?;

        debug!(
            tokens = annotation.tokens.len(),
            chunks = annotation.noun_chunks.len(),
            "remote annotation received"
        );

        Ok(annotation)
    }
}

fn from_wire(text: &str, wire: WireAnnotation) -> Result<Annotation, AnnotateError> {
    let len = wire.tokens.len();
    let mut tokens = Vec::with_capacity(len);
    let mut cursor = 0;

    for (i, t) in wire.tokens.into_iter().enumerate() {
        if t.head >= len {
            return Err(AnnotateError::Malformed(format!(
                "token {i} has head {} but only {len} tokens",
                t.head
            )));
        }
        let idx = match t.idx {
            Some(idx) => {
                let end = idx
                    .checked_add(t.text.len())
                    .filter(|end| *end <= text.len())
                    .filter(|end| text.is_char_boundary(idx) && text.is_char_boundary(*end))
                    .ok_or_else(|| {
                        AnnotateError::Malformed(format!(
                            "token {i} offset {idx} does not fit a {}-byte text",
                            text.len()
                        ))
                    })?;
                cursor = end;
                idx
            }
            // Services that omit offsets get them recovered by a forward scan.
            None => match text.get(cursor..).and_then(|rest| rest.find(&t.text)) {
                Some(off) => {
                    let idx = cursor + off;
                    cursor = idx + t.text.len();
                    idx
                }
                None => cursor,
            },
        };

        tokens.push(AnnotatedToken {
            lower: t.text.to_lowercase(),
            is_title: is_title_case(&t.text),
            text: t.text,
            pos: t.pos,
            is_stop: t.is_stop,
            is_punct: t.is_punct,
            dep: t.dep,
            head: t.head,
            idx,
        });
    }

    let mut noun_chunks = Vec::with_capacity(wire.noun_chunks.len());
    for c in wire.noun_chunks {
        if c.start >= c.end || c.end > len {
            return Err(AnnotateError::Malformed(format!(
                "noun chunk {}..{} out of range for {len} tokens",
                c.start, c.end
            )));
        }
        noun_chunks.push(NounChunk {
            start: c.start,
            end: c.end,
            text: Annotation::span_text(text, &tokens, c.start, c.end),
        });
    }

    Ok(Annotation {
        tokens,
        noun_chunks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> WireAnnotation {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_from_wire_derives_local_fields() {
        let text = "Senior Data Analyst";
        let wire = parse(
            r#"{"tokens": [
                {"text": "Senior", "pos": "ADJ", "dep": "amod", "head": 2},
                {"text": "Data", "pos": "PROPN", "dep": "compound", "head": 2},
                {"text": "Analyst", "pos": "PROPN", "dep": "ROOT", "head": 2}
            ], "noun_chunks": [{"start": 0, "end": 3}]}"#,
        );

        let ann = from_wire(text, wire).unwrap();
        assert_eq!(ann.tokens[1].idx, 7);
        assert_eq!(ann.tokens[2].lower, "analyst");
        assert!(ann.tokens[2].is_title);
        assert_eq!(ann.noun_chunks[0].text, "Senior Data Analyst");
        assert_eq!(ann.children(2).count(), 2);
    }

    #[test]
    fn test_from_wire_rejects_dangling_head() {
        let wire = parse(r#"{"tokens": [{"text": "x", "pos": "NOUN", "head": 4}]}"#);
        let err = from_wire("x", wire).unwrap_err();
        assert!(matches!(err, AnnotateError::Malformed(_)));
    }

    #[test]
    fn test_from_wire_rejects_out_of_range_offsets() {
        let huge = format!(
            r#"{{"tokens": [{{"text": "xy", "pos": "NOUN", "head": 0, "idx": {}}}],
                "noun_chunks": [{{"start": 0, "end": 1}}]}}"#,
            usize::MAX
        );
        let err = from_wire("xy", parse(&huge)).unwrap_err();
        assert!(matches!(err, AnnotateError::Malformed(_)));

        let past_end = parse(r#"{"tokens": [{"text": "xy", "pos": "NOUN", "head": 0, "idx": 1}]}"#);
        assert!(matches!(
            from_wire("xy", past_end).unwrap_err(),
            AnnotateError::Malformed(_)
        ));

        // Byte 1 falls inside the two-byte 'é'.
        let split_char = parse(r#"{"tokens": [{"text": "x", "pos": "NOUN", "head": 0, "idx": 1}]}"#);
        assert!(from_wire("éx", split_char).is_err());
    }

    #[test]
    fn test_from_wire_tolerates_tokens_missing_from_text() {
        let wire = parse(
            r#"{"tokens": [
                {"text": "do", "pos": "VERB", "head": 0},
                {"text": "n't", "pos": "ADV", "head": 0}
            ], "noun_chunks": [{"start": 0, "end": 2}]}"#,
        );
        let ann = from_wire("do", wire).unwrap();
        assert_eq!(ann.tokens[1].idx, 2);
        assert_eq!(ann.noun_chunks[0].text, "do n't");
    }

    #[test]
    fn test_from_wire_rejects_bad_chunk() {
        let wire = parse(
            r#"{"tokens": [{"text": "x", "pos": "NOUN", "head": 0}],
                "noun_chunks": [{"start": 0, "end": 2}]}"#,
        );
        assert!(from_wire("x", wire).is_err());
    }

    #[test]
    fn test_unknown_pos_tags_map_to_other() {
        let wire = parse(r#"{"tokens": [{"text": "and", "pos": "CCONJ", "head": 0}]}"#);
        let ann = from_wire("and", wire).unwrap();
        assert_eq!(ann.tokens[0].pos, PartOfSpeech::Other);
        assert!(ann.noun_chunks.is_empty());
    }
}
