//! Keyword and skill extraction, and the keyword/skill overlap score.
//!
//! Keywords are broad: nouns, title-cased terms, short noun chunks that look
//! technical or name a role, and adjacent noun pairs. Skills are narrow: catalog
//! hits plus the objects of skill-indicator words ("experience ... X").
//! Skill overlap is the stronger signal and carries 70% of the score.

use std::collections::HashSet;

use crate::matching::vocabulary::Vocabulary;
use crate::nlp::{is_title_case, AnnotateError, Annotation, TextAnnotator};

pub type KeywordSet = HashSet<String>;
pub type SkillSet = HashSet<String>;

const MIN_KEYWORD_CHARS: usize = 3;
const MAX_CHUNK_WORDS: usize = 4;
const SKILL_DEPS: &[&str] = &["dobj", "attr", "nsubj"];

pub const GENERIC_KEYWORD_WEIGHT: f64 = 0.3;
pub const SKILL_WEIGHT: f64 = 0.7;

pub fn keywords_from(ann: &Annotation, vocab: &Vocabulary) -> KeywordSet {
    let mut keywords = KeywordSet::new();

    for token in &ann.tokens {
        if token.is_stop || token.is_punct || token.char_len() < MIN_KEYWORD_CHARS {
            continue;
        }
        if token.pos.is_nominal() || token.is_title {
            keywords.insert(token.lower.clone());
        }
    }

    for chunk in &ann.noun_chunks {
        if chunk.word_count() > MAX_CHUNK_WORDS {
            continue;
        }
        let lower = chunk.text.to_lowercase();
        let technical = chunk.text.split_whitespace().any(is_title_case);
        let role = vocab.keyword_role_indicators().any(|r| lower.contains(r));
        if technical || role {
            keywords.insert(lower);
        }
    }

    for pair in ann.tokens.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if a.pos.is_nominal() && b.pos.is_nominal() && !a.is_stop && !b.is_stop {
            keywords.insert(format!("{} {}", a.lower, b.lower));
        }
    }

    keywords
}

pub fn skills_from(ann: &Annotation, vocab: &Vocabulary) -> SkillSet {
    let mut skills = SkillSet::new();

    for (i, token) in ann.tokens.iter().enumerate() {
        if !vocab.is_skill_indicator(&token.lower) {
            continue;
        }
        for child in ann.children(i) {
            if SKILL_DEPS.contains(&child.dep.as_str()) {
                skills.insert(child.lower.clone());
            }
        }
    }

    // The last token is only ever seen as the second half of a pair.
    for pair in ann.tokens.windows(2) {
        let compound = format!("{} {}", pair[0].lower, pair[1].lower);
        if vocab.in_skill_catalog(&compound) {
            skills.insert(compound);
        } else if vocab.in_skill_catalog(&pair[0].lower) {
            skills.insert(pair[0].lower.clone());
        }
    }

    skills
}

/// |resume ∩ jd| / |jd|, or 0.0 when the JD set is empty.
pub fn overlap_ratio(resume: &HashSet<String>, jd: &HashSet<String>) -> f64 {
    if jd.is_empty() {
        return 0.0;
    }
    resume.intersection(jd).count() as f64 / jd.len() as f64
}

/// Combines keyword and skill overlap: 0.3·keywords + 0.7·skills, capped at 1.0.
/// Returns 0.0 when the JD yields neither keywords nor skills.
pub fn combine_keyword_score(
    resume_keywords: &KeywordSet,
    resume_skills: &SkillSet,
    jd_keywords: &KeywordSet,
    jd_skills: &SkillSet,
) -> f64 {
    if jd_keywords.is_empty() && jd_skills.is_empty() {
        return 0.0;
    }
    let keyword_ratio = overlap_ratio(resume_keywords, jd_keywords);
    let skill_ratio = overlap_ratio(resume_skills, jd_skills);
    (GENERIC_KEYWORD_WEIGHT * keyword_ratio + SKILL_WEIGHT * skill_ratio).min(1.0)
}

#[allow(dead_code)]
pub async fn extract_keywords(
    annotator: &dyn TextAnnotator,
    vocab: &Vocabulary,
    text: &str,
) -> Result<KeywordSet, AnnotateError> {
    let ann = annotator.annotate(text).await?;
    Ok(keywords_from(&ann, vocab))
}

#[allow(dead_code)]
pub async fn extract_skills(
    annotator: &dyn TextAnnotator,
    vocab: &Vocabulary,
    text: &str,
) -> Result<SkillSet, AnnotateError> {
    let ann = annotator.annotate(text).await?;
    Ok(skills_from(&ann, vocab))
}

#[allow(dead_code)]
pub async fn keyword_score(
    annotator: &dyn TextAnnotator,
    vocab: &Vocabulary,
    resume_text: &str,
    jd_text: &str,
) -> Result<f64, AnnotateError> {
    let resume = annotator.annotate(resume_text).await?;
    let jd = annotator.annotate(jd_text).await?;
    Ok(combine_keyword_score(
        &keywords_from(&resume, vocab),
        &skills_from(&resume, vocab),
        &keywords_from(&jd, vocab),
        &skills_from(&jd, vocab),
    ))
}
