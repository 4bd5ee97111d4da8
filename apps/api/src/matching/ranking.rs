//! Ranking — scores many resumes against one job description.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::fusion::{MatchEngine, WeightConfig};

/// A resume as submitted. `id` and `name` are opaque and passed through.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "ResumeInput")]
pub struct ResumeRecord {
    pub id: Option<Value>,
    pub name: Option<Value>,
    pub text: String,
}

/// Accepts either `{"id", "name", "text"}` or a bare string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResumeInput {
    Text(String),
    Record {
        #[serde(default)]
        id: Option<Value>,
        #[serde(default)]
        name: Option<Value>,
        #[serde(default)]
        text: Option<String>,
    },
}

impl From<ResumeInput> for ResumeRecord {
    fn from(input: ResumeInput) -> Self {
        match input {
            ResumeInput::Text(text) => ResumeRecord {
                text,
                ..Default::default()
            },
            ResumeInput::Record { id, name, text } => ResumeRecord {
                id,
                name,
                text: text.unwrap_or_default(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMatch {
    pub index: usize,
    /// The fused final score.
    pub similarity: f64,
    pub semantic_score: f64,
    pub keyword_score: f64,
    pub role_score: f64,
    pub id: Option<Value>,
    pub name: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub matches: Vec<RankedMatch>,
    pub total_resumes: usize,
    pub has_role_requirement: bool,
}

fn validate_input(jd_text: &str, records: &[ResumeRecord]) -> Result<(), AppError> {
    if jd_text.trim().is_empty() || records.is_empty() {
        return Err(AppError::Validation(
            "Missing required fields: jd and resumes".to_string(),
        ));
    }
    Ok(())
}

/// Stable sort, highest similarity first. Incomparable scores keep input order.
pub fn sort_by_similarity(matches: &mut [RankedMatch]) {
    matches.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });
}

impl MatchEngine {
    /// Scores every record against `jd_text` and returns them best-first.
    ///
    /// Input is validated before any collaborator is called. A failure on any
    /// record fails the whole call.
    pub async fn rank(
        &self,
        jd_text: &str,
        records: &[ResumeRecord],
        weights: &WeightConfig,
    ) -> Result<Ranking, AppError> {
        validate_input(jd_text, records)?;

        let run_id = Uuid::new_v4();
        let span = info_span!("rank", %run_id, resumes = records.len());
        self.rank_validated(jd_text, records, weights)
            .instrument(span)
            .await
    }

    async fn rank_validated(
        &self,
        jd_text: &str,
        records: &[ResumeRecord],
        weights: &WeightConfig,
    ) -> Result<Ranking, AppError> {
        let job = self.analyze_job(jd_text).await?;
        let has_role_requirement = job.has_role_requirement();

        let mut matches = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let scores = self.score_against(&job, &record.text, weights).await?;
            matches.push(RankedMatch {
                index,
                similarity: scores.final_score,
                semantic_score: scores.semantic_score,
                keyword_score: scores.keyword_score,
                role_score: scores.role_score,
                id: record.id.clone(),
                name: record.name.clone(),
            });
        }

        sort_by_similarity(&mut matches);

        info!(
            has_role_requirement,
            top_score = matches.first().map(|m| m.similarity).unwrap_or(0.0),
            "ranking complete"
        );

        Ok(Ranking {
            matches,
            total_resumes: records.len(),
            has_role_requirement,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::embedding::testing::FixedEmbedder;
    use crate::matching::fusion::tests::rule_engine;
    use crate::matching::vocabulary::Vocabulary;
    use crate::nlp::testing::{annotation, tok, StaticAnnotator};
    use crate::nlp::PartOfSpeech::Noun;

    fn ranked(index: usize, similarity: f64) -> RankedMatch {
        RankedMatch {
            index,
            similarity,
            semantic_score: 0.0,
            keyword_score: 0.0,
            role_score: 0.0,
            id: None,
            name: None,
        }
    }

    fn record(text: &str) -> ResumeRecord {
        ResumeRecord {
            text: text.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_sort_is_stable_and_descending() {
        let mut matches = vec![ranked(0, 0.9), ranked(1, 0.3), ranked(2, 0.9), ranked(3, 0.1)];
        sort_by_similarity(&mut matches);
        let order: Vec<usize> = matches.iter().map(|m| m.index).collect();
        assert_eq!(order, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_resume_record_accepts_object_and_string() {
        let records: Vec<ResumeRecord> = serde_json::from_value(json!([
            {"id": 7, "name": "Ada", "text": "Rust engineer"},
            "Plain resume text",
            {"id": "r-2"}
        ]))
        .unwrap();

        assert_eq!(records[0].id, Some(json!(7)));
        assert_eq!(records[0].name, Some(json!("Ada")));
        assert_eq!(records[0].text, "Rust engineer");
        assert_eq!(records[1].text, "Plain resume text");
        assert_eq!(records[1].id, None);
        assert_eq!(records[2].text, "");
    }

    #[tokio::test]
    async fn test_validation_happens_before_any_collaborator_call() {
        let annotator = Arc::new(StaticAnnotator::new(vec![]));
        let embedder = Arc::new(FixedEmbedder::new(vec![], vec![1.0]));
        let engine = MatchEngine::new(
            embedder.clone(),
            annotator.clone(),
            Arc::new(Vocabulary::default()),
        );
        let w = WeightConfig::default();

        let err = engine.rank("", &[record("x")], &w).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = engine.rank("   ", &[record("x")], &w).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = engine.rank("Rust engineer", &[], &w).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert_eq!(annotator.call_count(), 0);
        assert_eq!(embedder.call_count(), 0);
    }

    #[tokio::test]
    async fn test_one_failing_resume_fails_the_batch() {
        let good = annotation(vec![tok("engineer", Noun)], &[(0, 1)]);
        let annotator = Arc::new(StaticAnnotator::new(vec![
            ("engineer", good.clone()),
            ("good resume", good),
        ]));
        let engine = MatchEngine::new(
            Arc::new(FixedEmbedder::new(vec![], vec![1.0])),
            annotator,
            Arc::new(Vocabulary::default()),
        );

        let err = engine
            .rank(
                "engineer",
                &[record("good resume"), record("unannotatable")],
                &WeightConfig::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Annotator(_)));
    }

    #[tokio::test]
    async fn test_rank_orders_and_passes_identity_through() {
        let engine = rule_engine();
        let jd = "Looking for a Python developer with experience in Flask and machine learning. \
                  Must have strong problem-solving skills and experience with REST APIs.";
        let records = vec![
            ResumeRecord {
                id: Some(json!("java")),
                name: Some(json!("Java Dev")),
                text: "Java developer with 5 years of experience in Spring Boot and microservices."
                    .to_string(),
            },
            ResumeRecord {
                id: Some(json!("py")),
                name: Some(json!("Py Dev")),
                text: "Python developer with 3 years of experience in Flask and machine learning. \
                       Strong problem-solving skills and REST API development."
                    .to_string(),
            },
        ];

        let ranking = engine
            .rank(jd, &records, &WeightConfig::default())
            .await
            .unwrap();

        assert_eq!(ranking.total_resumes, 2);
        assert!(ranking.has_role_requirement);
        assert_eq!(ranking.matches[0].id, Some(json!("py")));
        assert_eq!(ranking.matches[0].index, 1);
        assert_eq!(ranking.matches[0].name, Some(json!("Py Dev")));
        assert!(ranking.matches[0].similarity >= ranking.matches[1].similarity);
        for m in &ranking.matches {
            assert!((0.0..=1.0).contains(&m.keyword_score));
            assert!((0.0..=1.0).contains(&m.role_score));
        }
    }
}
