//! RuleAnnotator — offline English annotator built from closed-class
//! lexicons and suffix heuristics.
//!
//! Pipeline per text:
//! 1. Tokenize on whitespace, peeling leading/trailing punctuation and
//!    possessive `'s` into their own tokens (`C++`, `Node.js`, `CI/CD` stay whole).
//! 2. Tag coarse POS: lexicon first, then casing and suffix rules.
//! 3. Chunk: optional determiner + run of ADJ/NUM/NOUN/PROPN ending in a nominal.
//! 4. Shallow dependency attachment inside each sentence: chunk modifiers to the
//!    chunk root, objects and attributes to the preceding predicate, `pobj` to
//!    prepositions, the nearest chunk before the first predicate as `nsubj`.
//!
//! Good enough for keyword/role extraction on resumes and JDs; it is not a
//! general-purpose parser.

use async_trait::async_trait;

use crate::nlp::lexicon::{
    has_adjective_suffix, is_copula, is_determiner, is_known_adjective, is_known_noun,
    is_known_verb, is_light_verb, is_modal, is_preposition, is_punct_char, is_stop_word,
};
use crate::nlp::{
    is_title_case, AnnotateError, AnnotatedToken, Annotation, NounChunk, PartOfSpeech,
    TextAnnotator,
};

const LEADING_PUNCT: &[char] = &['(', '[', '{', '"', '\'', '“', '‘', '•', '*'];
const TRAILING_PUNCT: &[char] = &[
    ')', ']', '}', '"', '\'', '”', '’', '.', ',', ';', ':', '!', '?',
];
const SENTENCE_END: &[&str] = &[".", "!", "?", ";"];
const COORDINATORS: &[&str] = &["and", "or", ","];

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleAnnotator;

#[async_trait]
impl TextAnnotator for RuleAnnotator {
    fn name(&self) -> &'static str {
        "rules"
    }

    async fn annotate(&self, text: &str) -> Result<Annotation, AnnotateError> {
        Ok(annotate_text(text))
    }
}

#[derive(Debug, Clone, Copy)]
struct RawToken<'a> {
    text: &'a str,
    idx: usize,
    starts_line: bool,
}

/// Runs the full rule pipeline over `text`.
pub fn annotate_text(text: &str) -> Annotation {
    let raw = tokenize(text);
    if raw.is_empty() {
        return Annotation::default();
    }

    let sentences = split_sentences(&raw);
    let mut tokens: Vec<AnnotatedToken> = Vec::with_capacity(raw.len());

    for range in &sentences {
        let mut initial = true;
        for r in &raw[range.clone()] {
            let lower = r.text.to_lowercase();
            let is_punct = r.text.chars().all(is_punct_char);
            let pos = tag(r.text, &lower, is_punct, initial);
            if !is_punct {
                initial = false;
            }
            tokens.push(AnnotatedToken {
                text: r.text.to_string(),
                is_stop: is_stop_word(&lower),
                lower,
                pos,
                is_punct,
                dep: String::new(),
                head: tokens.len(),
                is_title: is_title_case(r.text),
                idx: r.idx,
            });
        }
    }

    let mut chunks: Vec<(usize, usize)> = Vec::new();
    for range in &sentences {
        chunks.extend(chunk_sentence(&tokens, range.start, range.end));
    }
    for range in &sentences {
        attach_sentence(&mut tokens, &chunks, range.start, range.end);
    }

    let noun_chunks = chunks
        .into_iter()
        .map(|(start, end)| NounChunk {
            start,
            end,
            text: Annotation::span_text(text, &tokens, start, end),
        })
        .collect();

    Annotation {
        tokens,
        noun_chunks,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tokenization
// ────────────────────────────────────────────────────────────────────────────

fn tokenize(text: &str) -> Vec<RawToken<'_>> {
    let mut out = Vec::new();
    let mut line_break = true;
    let mut word_start: Option<usize> = None;

    let sentinel = std::iter::once((text.len(), ' '));
    for (i, c) in text.char_indices().chain(sentinel) {
        if c.is_whitespace() {
            if let Some(start) = word_start.take() {
                split_word(text, start, i, line_break, &mut out);
                line_break = false;
            }
            if c == '\n' {
                line_break = true;
            }
        } else if word_start.is_none() {
            word_start = Some(i);
        }
    }

    out
}

fn split_word<'a>(
    text: &'a str,
    start: usize,
    end: usize,
    starts_line: bool,
    out: &mut Vec<RawToken<'a>>,
) {
    let word = &text[start..end];
    let mut lo = 0;
    let mut hi = word.len();
    let mut pieces: Vec<(usize, usize)> = Vec::new();

    while let Some(c) = word[lo..hi].chars().next() {
        if LEADING_PUNCT.contains(&c) && word[lo..hi].chars().count() > 1 {
            pieces.push((lo, lo + c.len_utf8()));
            lo += c.len_utf8();
        } else {
            break;
        }
    }

    let mut trailing: Vec<(usize, usize)> = Vec::new();
    while let Some(c) = word[lo..hi].chars().next_back() {
        if TRAILING_PUNCT.contains(&c) && word[lo..hi].chars().count() > 1 {
            hi -= c.len_utf8();
            trailing.push((hi, hi + c.len_utf8()));
        } else {
            break;
        }
    }

    let core = &word[lo..hi];
    let possessive = ["'s", "’s"]
        .iter()
        .find(|suffix| core.len() > suffix.len() && core.to_lowercase().ends_with(*suffix));
    match possessive {
        Some(suffix) => {
            let split = hi - suffix.len();
            pieces.push((lo, split));
            pieces.push((split, hi));
        }
        None => pieces.push((lo, hi)),
    }

    pieces.extend(trailing.into_iter().rev());

    for (n, (a, b)) in pieces.into_iter().enumerate() {
        out.push(RawToken {
            text: &text[start + a..start + b],
            idx: start + a,
            starts_line: starts_line && n == 0,
        });
    }
}

/// Sentence ranges: break after `. ! ? ;` and at every new line.
fn split_sentences(raw: &[RawToken<'_>]) -> Vec<std::ops::Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;

    for (i, t) in raw.iter().enumerate() {
        if i > start && t.starts_line {
            ranges.push(start..i);
            start = i;
        }
        if SENTENCE_END.contains(&t.text) {
            ranges.push(start..i + 1);
            start = i + 1;
        }
    }
    if start < raw.len() {
        ranges.push(start..raw.len());
    }

    ranges
}

// ────────────────────────────────────────────────────────────────────────────
// POS tagging
// ────────────────────────────────────────────────────────────────────────────

fn tag(text: &str, lower: &str, is_punct: bool, sentence_initial: bool) -> PartOfSpeech {
    if is_punct {
        return PartOfSpeech::Other;
    }
    if is_numeric(lower) {
        return PartOfSpeech::Num;
    }
    if is_stop_word(lower) {
        return PartOfSpeech::Other;
    }
    if is_known_noun(lower) {
        return PartOfSpeech::Noun;
    }
    if is_known_verb(lower) {
        return PartOfSpeech::Verb;
    }
    if is_known_adjective(lower) {
        return PartOfSpeech::Adj;
    }

    let inner_upper = text.chars().skip(1).any(char::is_uppercase);
    let has_digit = text.chars().any(|c| c.is_ascii_digit());
    let has_alpha = text.chars().any(char::is_alphabetic);
    if inner_upper || (has_digit && has_alpha) {
        return PartOfSpeech::Propn;
    }

    let title = is_title_case(text);
    if title && !sentence_initial {
        return PartOfSpeech::Propn;
    }

    let len = lower.chars().count();
    if lower.contains('-') && (lower.ends_with("ing") || lower.ends_with("ed")) {
        // problem-solving, data-driven
        PartOfSpeech::Adj
    } else if len > 4 && lower.ends_with("ly") {
        PartOfSpeech::Adv
    } else if len > 5 && lower.ends_with("ing") {
        PartOfSpeech::Verb
    } else if len > 4 && lower.ends_with("ed") {
        PartOfSpeech::Verb
    } else if has_adjective_suffix(lower) {
        PartOfSpeech::Adj
    } else if title {
        PartOfSpeech::Propn
    } else {
        PartOfSpeech::Noun
    }
}

fn is_numeric(lower: &str) -> bool {
    lower.chars().any(|c| c.is_ascii_digit())
        && lower
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '.' | ',' | '%' | '$' | '-'))
}

// ────────────────────────────────────────────────────────────────────────────
// Noun chunks
// ────────────────────────────────────────────────────────────────────────────

fn chunkable(t: &AnnotatedToken) -> bool {
    !t.is_punct
        && !t.is_stop
        && matches!(
            t.pos,
            PartOfSpeech::Adj | PartOfSpeech::Num | PartOfSpeech::Noun | PartOfSpeech::Propn
        )
}

fn chunk_sentence(tokens: &[AnnotatedToken], start: usize, end: usize) -> Vec<(usize, usize)> {
    let mut chunks = Vec::new();
    let mut i = start;

    while i < end {
        let body = if is_determiner(&tokens[i].lower) { i + 1 } else { i };
        let mut j = body;
        let mut last_nominal = None;
        while j < end && chunkable(&tokens[j]) {
            if tokens[j].pos.is_nominal() {
                last_nominal = Some(j);
            }
            j += 1;
        }

        match last_nominal {
            Some(root) => {
                chunks.push((i, root + 1));
                i = root + 1;
            }
            None => i += 1,
        }
    }

    chunks
}

// ────────────────────────────────────────────────────────────────────────────
// Dependency attachment
// ────────────────────────────────────────────────────────────────────────────

fn is_predicate(t: &AnnotatedToken) -> bool {
    t.pos == PartOfSpeech::Verb || is_copula(&t.lower) || is_light_verb(&t.lower)
}

fn attach_sentence(
    tokens: &mut [AnnotatedToken],
    chunks: &[(usize, usize)],
    start: usize,
    end: usize,
) {
    let n = end - start;
    if n == 0 {
        return;
    }
    let mut heads: Vec<Option<usize>> = vec![None; n];
    let mut deps: Vec<&'static str> = vec!["dep"; n];
    let local = |i: usize| i - start;

    let sentence_chunks: Vec<(usize, usize)> = chunks
        .iter()
        .copied()
        .filter(|&(s, e)| s >= start && e <= end)
        .collect();
    let chunk_root_at = |i: usize| -> Option<usize> {
        sentence_chunks
            .iter()
            .find(|&&(s, _)| s == i)
            .map(|&(_, e)| e - 1)
    };
    let is_chunk_root = |i: usize| sentence_chunks.iter().any(|&(_, e)| e - 1 == i);

    // Chunk-internal modifiers hang off the chunk root.
    for &(s, e) in &sentence_chunks {
        let root = e - 1;
        for k in s..root {
            let t = &tokens[k];
            deps[local(k)] = if is_determiner(&t.lower) && t.is_stop {
                "det"
            } else {
                match t.pos {
                    PartOfSpeech::Adj => "amod",
                    PartOfSpeech::Num => "nummod",
                    _ => "compound",
                }
            };
            heads[local(k)] = Some(root);
        }
    }

    let predicates: Vec<usize> = (start..end)
        .filter(|&i| is_predicate(&tokens[i]) && heads[local(i)].is_none())
        .collect();

    // Modals attach to the next predicate.
    for i in start..end {
        if is_modal(&tokens[i].lower) {
            if let Some(&p) = predicates.iter().find(|&&p| p > i) {
                heads[local(i)] = Some(p);
                deps[local(i)] = "aux";
            }
        }
    }

    // Objects and attributes.
    for &p in &predicates {
        let mut j = p + 1;
        while j < end && (tokens[j].pos == PartOfSpeech::Adv || tokens[j].lower == "not") {
            j += 1;
        }
        if j >= end {
            continue;
        }
        let copula = is_copula(&tokens[p].lower);
        if let Some(root) = chunk_root_at(j) {
            if heads[local(root)].is_none() {
                heads[local(root)] = Some(p);
                deps[local(root)] = if copula { "attr" } else { "dobj" };
            }
        } else if copula && tokens[j].pos == PartOfSpeech::Adj && heads[local(j)].is_none() {
            heads[local(j)] = Some(p);
            deps[local(j)] = "acomp";
        }
    }

    // Prepositional phrases.
    for q in start..end {
        if !is_preposition(&tokens[q].lower) || heads[local(q)].is_some() {
            continue;
        }
        if let Some(root) = chunk_root_at(q + 1).filter(|_| q + 1 < end) {
            if heads[local(root)].is_none() {
                heads[local(root)] = Some(q);
                deps[local(root)] = "pobj";
            }
        }
        let governor = (start..q).rev().find(|&r| {
            is_chunk_root(r) || is_predicate(&tokens[r]) || tokens[r].pos == PartOfSpeech::Adj
        });
        if let Some(g) = governor {
            heads[local(q)] = Some(g);
            deps[local(q)] = "prep";
        }
    }

    // Subject: nearest free chunk root before the first predicate.
    if let Some(&first) = predicates.first() {
        let subject = (start..first)
            .rev()
            .find(|&i| is_chunk_root(i) && heads[local(i)].is_none());
        if let Some(s) = subject {
            heads[local(s)] = Some(first);
            deps[local(s)] = "nsubj";
        }
    }

    // Coordination between chunks.
    for i in start..end {
        if !is_chunk_root(i) || heads[local(i)].is_some() {
            continue;
        }
        let chunk_start = sentence_chunks
            .iter()
            .find(|&&(_, e)| e - 1 == i)
            .map(|&(s, _)| s)
            .unwrap_or(i);
        let coordinated = chunk_start > start
            && COORDINATORS.contains(&tokens[chunk_start - 1].lower.as_str());
        if !coordinated {
            continue;
        }
        let previous = (start..chunk_start - 1)
            .rev()
            .find(|&r| is_chunk_root(r));
        if let Some(prev) = previous {
            heads[local(i)] = Some(prev);
            deps[local(i)] = "conj";
            let cc = chunk_start - 1;
            if heads[local(cc)].is_none() {
                heads[local(cc)] = Some(prev);
                deps[local(cc)] = if tokens[cc].is_punct { "punct" } else { "cc" };
            }
        }
    }

    let root = predicates
        .iter()
        .copied()
        .find(|&p| heads[local(p)].is_none())
        .or_else(|| (start..end).find(|&i| is_chunk_root(i) && heads[local(i)].is_none()))
        .or_else(|| (start..end).find(|&i| heads[local(i)].is_none()))
        .unwrap_or(start);

    for i in start..end {
        let t = &mut tokens[i];
        if i == root {
            t.head = i;
            t.dep = "ROOT".to_string();
            continue;
        }
        match heads[local(i)] {
            Some(h) => {
                t.head = h;
                t.dep = deps[local(i)].to_string();
            }
            None => {
                t.head = root;
                t.dep = if t.is_punct {
                    "punct".to_string()
                } else if predicates.contains(&i) {
                    "conj".to_string()
                } else {
                    "dep".to_string()
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(ann: &Annotation) -> Vec<&str> {
        ann.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    fn chunk_texts(ann: &Annotation) -> Vec<&str> {
        ann.noun_chunks.iter().map(|c| c.text.as_str()).collect()
    }

    fn find<'a>(ann: &'a Annotation, text: &str) -> &'a AnnotatedToken {
        ann.tokens
            .iter()
            .find(|t| t.text == text)
            .unwrap_or_else(|| panic!("token {text:?} missing"))
    }

    #[test]
    fn test_tokenizer_peels_punctuation_but_keeps_tech_terms() {
        let ann = annotate_text("Skilled in C++, Node.js (CI/CD) and Python.");
        assert_eq!(
            texts(&ann),
            vec!["Skilled", "in", "C++", ",", "Node.js", "(", "CI/CD", ")", "and", "Python", "."]
        );
    }

    #[test]
    fn test_tokenizer_splits_possessive() {
        let ann = annotate_text("the company's platform");
        assert_eq!(texts(&ann), vec!["the", "company", "'s", "platform"]);
        assert!(find(&ann, "'s").is_stop);
    }

    #[test]
    fn test_token_offsets_point_into_source() {
        let text = "Python developer, Flask.";
        let ann = annotate_text(text);
        for t in &ann.tokens {
            assert_eq!(&text[t.idx..t.idx + t.text.len()], t.text);
        }
    }

    #[test]
    fn test_pos_tags_for_typical_jd() {
        let ann = annotate_text("Looking for a Python developer with experience in Flask.");
        assert_eq!(find(&ann, "Looking").pos, PartOfSpeech::Verb);
        assert_eq!(find(&ann, "Python").pos, PartOfSpeech::Propn);
        assert_eq!(find(&ann, "developer").pos, PartOfSpeech::Noun);
        assert_eq!(find(&ann, "experience").pos, PartOfSpeech::Noun);
        assert_eq!(find(&ann, "Flask").pos, PartOfSpeech::Propn);
        assert!(find(&ann, "for").is_stop);
        assert!(find(&ann, ".").is_punct);
    }

    #[test]
    fn test_acronyms_and_mixed_case_are_proper_nouns() {
        let ann = annotate_text("Built REST APIs with PowerBI and S3");
        assert_eq!(find(&ann, "REST").pos, PartOfSpeech::Propn);
        assert_eq!(find(&ann, "PowerBI").pos, PartOfSpeech::Propn);
        assert_eq!(find(&ann, "S3").pos, PartOfSpeech::Propn);
    }

    #[test]
    fn test_noun_chunks_include_leading_determiner() {
        let ann = annotate_text("Looking for a Python developer with experience in Flask.");
        assert_eq!(
            chunk_texts(&ann),
            vec!["a Python developer", "experience", "Flask"]
        );
    }

    #[test]
    fn test_noun_chunks_split_on_commas() {
        let ann = annotate_text("Experience in Python, JavaScript, and cloud technologies.");
        let chunks = chunk_texts(&ann);
        assert!(chunks.contains(&"Python"));
        assert!(chunks.contains(&"JavaScript"));
        assert!(chunks.contains(&"cloud technologies"));
    }

    #[test]
    fn test_prepositional_object_attaches_to_preposition() {
        let ann = annotate_text("Python developer with 3 years of experience in Flask.");
        let flask = find(&ann, "Flask");
        assert_eq!(flask.dep, "pobj");
        assert_eq!(ann.tokens[flask.head].text, "in");
        let years = find(&ann, "years");
        assert_eq!(years.dep, "pobj");
        assert_eq!(find(&ann, "3").dep, "nummod");
    }

    #[test]
    fn test_direct_object_attaches_to_verb() {
        let ann = annotate_text("Must have strong problem-solving skills.");
        let skills = find(&ann, "skills");
        assert_eq!(skills.dep, "dobj");
        assert_eq!(ann.tokens[skills.head].text, "have");
        assert_eq!(find(&ann, "Must").dep, "aux");
        assert_eq!(find(&ann, "have").dep, "ROOT");
    }

    #[test]
    fn test_subject_before_copula() {
        let ann = annotate_text("Experience is a plus.");
        let exp = find(&ann, "Experience");
        assert_eq!(exp.dep, "nsubj");
        assert_eq!(find(&ann, "plus").dep, "attr");
    }

    #[test]
    fn test_every_sentence_has_one_root() {
        let ann = annotate_text("Python developer.\nJava engineer; Go lead");
        let roots = ann.tokens.iter().filter(|t| t.dep == "ROOT").count();
        assert_eq!(roots, 3);
        for t in &ann.tokens {
            assert!(t.head < ann.tokens.len());
        }
    }

    #[test]
    fn test_empty_text_yields_empty_annotation() {
        let ann = annotate_text("   \n ");
        assert!(ann.tokens.is_empty());
        assert!(ann.noun_chunks.is_empty());
    }

    #[tokio::test]
    async fn test_trait_impl_delegates() {
        let ann = RuleAnnotator.annotate("Data analyst").await.unwrap();
        assert_eq!(chunk_texts(&ann), vec!["Data analyst"]);
        assert_eq!(RuleAnnotator.name(), "rules");
    }
}
