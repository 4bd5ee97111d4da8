//! Role extraction and role-match scoring.
//!
//! A role set mixes whole noun-chunk phrases ("senior data analyst") with the
//! bare indicator words found in the text ("analyst"), so a resume saying
//! "analyst" still partially matches a JD asking for "data analyst".

use std::collections::HashSet;

use crate::matching::vocabulary::Vocabulary;
use crate::nlp::{AnnotateError, Annotation, TextAnnotator};

pub type RoleSet = HashSet<String>;

pub fn roles_from(ann: &Annotation, vocab: &Vocabulary) -> RoleSet {
    let mut roles = RoleSet::new();

    for chunk in &ann.noun_chunks {
        let lower = chunk.text.to_lowercase();
        if vocab.role_extraction_indicators().any(|r| lower.contains(r)) {
            roles.insert(lower);
        }
    }

    for token in &ann.tokens {
        if vocab.is_role_indicator(&token.lower) {
            roles.insert(token.lower.clone());
        }
    }

    roles
}

/// Scores resume roles against JD roles.
///
/// - exact: |resume ∩ jd| / |jd|
/// - partial: pairs `(jd, resume)` where either contains the other, over `2·|jd|`
///
/// Returns the larger of the two, 0.0 when the JD names no role. An exact hit
/// is also a containment pair, so it counts toward `partial` too. Several
/// resume phrases can contain the same JD role, so the result is capped at 1.0.
pub fn compare_roles(resume_roles: &RoleSet, jd_roles: &RoleSet) -> f64 {
    if jd_roles.is_empty() {
        return 0.0;
    }

    let jd_count = jd_roles.len() as f64;
    let exact = resume_roles.intersection(jd_roles).count() as f64 / jd_count;

    let partial_pairs = jd_roles
        .iter()
        .flat_map(|jd| resume_roles.iter().map(move |r| (jd, r)))
        .filter(|(jd, r)| r.contains(jd.as_str()) || jd.contains(r.as_str()))
        .count();
    let partial = partial_pairs as f64 / (2.0 * jd_count);

    // Uncapped, pairs are double counted: JD {developer} against
    // {developer, python developer, senior developer} would score 1.5.
    // Clamped here so role_score stays in [0, 1] like the other components.
    exact.max(partial).min(1.0)
}

#[allow(dead_code)]
pub async fn extract_role_keywords(
    annotator: &dyn TextAnnotator,
    vocab: &Vocabulary,
    text: &str,
) -> Result<RoleSet, AnnotateError> {
    let ann = annotator.annotate(text).await?;
    Ok(roles_from(&ann, vocab))
}

#[allow(dead_code)]
pub async fn role_score(
    annotator: &dyn TextAnnotator,
    vocab: &Vocabulary,
    resume_text: &str,
    jd_text: &str,
) -> Result<f64, AnnotateError> {
    let jd_roles = extract_role_keywords(annotator, vocab, jd_text).await?;
    if jd_roles.is_empty() {
        return Ok(0.0);
    }
    let resume_roles = extract_role_keywords(annotator, vocab, resume_text).await?;
    Ok(compare_roles(&resume_roles, &jd_roles))
}
