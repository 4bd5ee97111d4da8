//! Score fusion — semantic similarity + keyword/skill overlap + role overlap.
//!
//! `MatchEngine` bundles the collaborators (embedder, annotator, vocabulary)
//! that every score needs. It is built once at startup and cloned cheaply into
//! handlers; nothing in it is mutated after construction.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::embedding::{cosine_similarity, Embedder};
use crate::errors::AppError;
use crate::matching::keywords::{
    combine_keyword_score, keywords_from, skills_from, KeywordSet, SkillSet,
};
use crate::matching::roles::{compare_roles, roles_from, RoleSet};
use crate::matching::vocabulary::Vocabulary;
use crate::nlp::{Annotation, TextAnnotator};

// ────────────────────────────────────────────────────────────────────────────
// Weights
// ────────────────────────────────────────────────────────────────────────────

/// Fusion weights. The with-role group applies when the JD names a role, the
/// no-role group otherwise. Each group is meant to sum to 1.0, but the fuser
/// uses the values as given; see [`WeightConfig::normalized`].
///
/// Deserialization requires all five keys: a partial object is rejected, never
/// merged with defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    pub semantic_weight_with_role: f64,
    pub keyword_weight_with_role: f64,
    pub role_weight: f64,
    pub semantic_weight_no_role: f64,
    pub keyword_weight_no_role: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            semantic_weight_with_role: 0.1,
            keyword_weight_with_role: 0.7,
            role_weight: 0.2,
            semantic_weight_no_role: 0.2,
            keyword_weight_no_role: 0.8,
        }
    }
}

impl WeightConfig {
    fn values(&self) -> [(&'static str, f64); 5] {
        [
            ("semantic_weight_with_role", self.semantic_weight_with_role),
            ("keyword_weight_with_role", self.keyword_weight_with_role),
            ("role_weight", self.role_weight),
            ("semantic_weight_no_role", self.semantic_weight_no_role),
            ("keyword_weight_no_role", self.keyword_weight_no_role),
        ]
    }

    /// Rejects negative or non-finite weights.
    pub fn validate(&self) -> Result<(), AppError> {
        for (name, value) in self.values() {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::Validation(format!(
                    "weight '{name}' must be a finite, non-negative number (got {value})"
                )));
            }
        }
        Ok(())
    }

    /// Rescales each group to sum to 1.0. A group summing to zero is left as is.
    pub fn normalized(self) -> Self {
        let with_role =
            self.semantic_weight_with_role + self.keyword_weight_with_role + self.role_weight;
        let no_role = self.semantic_weight_no_role + self.keyword_weight_no_role;

        let mut w = self;
        if with_role > 0.0 {
            w.semantic_weight_with_role /= with_role;
            w.keyword_weight_with_role /= with_role;
            w.role_weight /= with_role;
        }
        if no_role > 0.0 {
            w.semantic_weight_no_role /= no_role;
            w.keyword_weight_no_role /= no_role;
        }
        w
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub final_score: f64,
    pub semantic_score: f64,
    pub keyword_score: f64,
    pub role_score: f64,
    pub has_role_requirement: bool,
}

/// Everything the extractors pull out of one text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextFeatures {
    pub keywords: KeywordSet,
    pub skills: SkillSet,
    pub roles: RoleSet,
}

impl TextFeatures {
    pub fn from_annotation(ann: &Annotation, vocab: &Vocabulary) -> Self {
        Self {
            keywords: keywords_from(ann, vocab),
            skills: skills_from(ann, vocab),
            roles: roles_from(ann, vocab),
        }
    }
}

/// A job description analyzed once and scored against many resumes.
#[derive(Debug, Clone)]
pub struct JobProfile {
    pub embedding: Vec<f32>,
    pub features: TextFeatures,
}

impl JobProfile {
    pub fn has_role_requirement(&self) -> bool {
        !self.features.roles.is_empty()
    }
}

/// Pure fusion step over already-extracted signals.
pub fn fuse(
    semantic: f64,
    keyword: f64,
    role: f64,
    has_role_requirement: bool,
    weights: &WeightConfig,
) -> ScoreBreakdown {
    if has_role_requirement {
        ScoreBreakdown {
            final_score: weights.semantic_weight_with_role * semantic
                + weights.keyword_weight_with_role * keyword
                + weights.role_weight * role,
            semantic_score: semantic,
            keyword_score: keyword,
            role_score: role,
            has_role_requirement,
        }
    } else {
        ScoreBreakdown {
            final_score: weights.semantic_weight_no_role * semantic
                + weights.keyword_weight_no_role * keyword,
            semantic_score: semantic,
            keyword_score: keyword,
            role_score: 0.0,
            has_role_requirement,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MatchEngine {
    embedder: Arc<dyn Embedder>,
    annotator: Arc<dyn TextAnnotator>,
    vocabulary: Arc<Vocabulary>,
}

impl MatchEngine {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        annotator: Arc<dyn TextAnnotator>,
        vocabulary: Arc<Vocabulary>,
    ) -> Self {
        Self {
            embedder,
            annotator,
            vocabulary,
        }
    }

    pub fn embedder_name(&self) -> &'static str {
        self.embedder.name()
    }

    pub fn annotator_name(&self) -> &'static str {
        self.annotator.name()
    }

    #[allow(dead_code)]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[allow(dead_code)]
    pub fn annotator(&self) -> &dyn TextAnnotator {
        self.annotator.as_ref()
    }

    async fn features(&self, text: &str) -> Result<TextFeatures, AppError> {
        let ann = self.annotator.annotate(text).await?;
        Ok(TextFeatures::from_annotation(&ann, &self.vocabulary))
    }

    /// Embeds and extracts the job description once.
    pub async fn analyze_job(&self, jd_text: &str) -> Result<JobProfile, AppError> {
        let embedding = self.embedder.embed(jd_text).await?;
        let features = self.features(jd_text).await?;
        Ok(JobProfile {
            embedding,
            features,
        })
    }

    /// Scores one resume against an analyzed job description.
    pub async fn score_against(
        &self,
        job: &JobProfile,
        resume_text: &str,
        weights: &WeightConfig,
    ) -> Result<ScoreBreakdown, AppError> {
        let embedding = self.embedder.embed(resume_text).await?;
        let semantic = cosine_similarity(&embedding, &job.embedding);

        let resume = self.features(resume_text).await?;
        let keyword = combine_keyword_score(
            &resume.keywords,
            &resume.skills,
            &job.features.keywords,
            &job.features.skills,
        );

        let has_role = job.has_role_requirement();
        let role = if has_role {
            compare_roles(&resume.roles, &job.features.roles)
        } else {
            0.0
        };

        let breakdown = fuse(semantic, keyword, role, has_role, weights);
        debug!(
            semantic = breakdown.semantic_score,
            keyword = breakdown.keyword_score,
            role = breakdown.role_score,
            final_score = breakdown.final_score,
            "resume scored"
        );
        Ok(breakdown)
    }

    /// Hybrid score of a single resume/JD pair.
    #[allow(dead_code)]
    pub async fn hybrid_score(
        &self,
        resume_text: &str,
        jd_text: &str,
        weights: &WeightConfig,
    ) -> Result<ScoreBreakdown, AppError> {
        let job = self.analyze_job(jd_text).await?;
        self.score_against(&job, resume_text, weights).await
    }
}
