//! Vocabulary tables that drive extraction.
//!
//! Built-in lists are the defaults; a JSON file (`VOCABULARY_PATH`) can replace
//! any of them. Missing keys in the file keep the built-in list.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role words used by keyword extraction to keep role-bearing noun chunks.
pub const ROLE_INDICATORS: &[&str] = &[
    "developer",
    "engineer",
    "analyst",
    "architect",
    "manager",
    "specialist",
    "consultant",
    "lead",
    "director",
    "expert",
    "scientist",
];

/// Added on top of [`ROLE_INDICATORS`] for role extraction.
pub const EXTRA_ROLE_INDICATORS: &[&str] = &["programmer", "designer", "administrator", "coordinator"];

/// Words whose direct objects/attributes/subjects name a skill.
pub const SKILL_INDICATORS: &[&str] = &[
    "proficient",
    "knowledge",
    "understanding",
    "experience",
    "skills",
    "expertise",
    "ability",
    "capable",
    "familiar",
];

pub const SKILL_CATALOG: &[&str] = &[
    "sql",
    "python",
    "r",
    "qlikview",
    "powerbi",
    "google analytics",
    "firebase",
    "bi tools",
    "analytics",
];

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("Failed to read vocabulary file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid vocabulary file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub role_indicators: Vec<String>,
    pub extra_role_indicators: Vec<String>,
    pub skill_indicators: Vec<String>,
    pub skill_catalog: Vec<String>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            role_indicators: owned(ROLE_INDICATORS),
            extra_role_indicators: owned(EXTRA_ROLE_INDICATORS),
            skill_indicators: owned(SKILL_INDICATORS),
            skill_catalog: owned(SKILL_CATALOG),
        }
    }
}

impl Vocabulary {
    pub fn from_json(json: &str) -> Result<Self, VocabularyError> {
        let vocab: Vocabulary = serde_json::from_str(json)?;
        Ok(vocab.lowercased())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, VocabularyError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Catalog membership is case-insensitive; store everything lowercased.
    fn lowercased(mut self) -> Self {
        for list in [
            &mut self.role_indicators,
            &mut self.extra_role_indicators,
            &mut self.skill_indicators,
            &mut self.skill_catalog,
        ] {
            for w in list.iter_mut() {
                *w = w.to_lowercase();
            }
        }
        self
    }

    /// The indicator list used by keyword extraction.
    pub fn keyword_role_indicators(&self) -> impl Iterator<Item = &str> {
        self.role_indicators.iter().map(String::as_str)
    }

    /// The extended list used by role extraction.
    pub fn role_extraction_indicators(&self) -> impl Iterator<Item = &str> {
        self.role_indicators
            .iter()
            .chain(&self.extra_role_indicators)
            .map(String::as_str)
    }

    pub fn is_role_indicator(&self, lower: &str) -> bool {
        self.role_extraction_indicators().any(|r| r == lower)
    }

    pub fn is_skill_indicator(&self, lower: &str) -> bool {
        self.skill_indicators.iter().any(|s| s == lower)
    }

    pub fn in_skill_catalog(&self, lower: &str) -> bool {
        self.skill_catalog.iter().any(|s| s == lower)
    }
}
