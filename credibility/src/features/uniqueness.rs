// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Lexical uniqueness and duplicate fingerprinting

use crate::text::{NormalizeOptions, Normalizer};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UniquenessMetrics {
    /// Unique / total normalized tokens, in [0, 1]
    pub lexical_diversity: f64,
    pub unique_words_ratio: f64,
    /// Share of tokens longer than three characters
    pub content_density: f64,
    /// `0.6 * lexical_diversity + 0.4 * content_density`
    pub uniqueness_score: f64,
    pub unique_word_count: usize,
    pub total_words: usize,
    /// SHA-256 of the raw text, hex encoded
    pub content_hash: String,
}

/// Stable digest used for duplicate detection
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn analyze_uniqueness(text: &str) -> UniquenessMetrics {
    let tokens = Normalizer::new(NormalizeOptions::lexical()).tokens(text);
    let content_hash = content_hash(text);
    if tokens.is_empty() {
        return UniquenessMetrics {
            content_hash,
            ..Default::default()
        };
    }

    let total = tokens.len();
    let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
    let long = tokens.iter().filter(|t| t.chars().count() > 3).count();

    let lexical_diversity = unique.len() as f64 / total as f64;
    let content_density = long as f64 / total as f64;

    UniquenessMetrics {
        lexical_diversity,
        unique_words_ratio: lexical_diversity,
        content_density,
        uniqueness_score: 0.6 * lexical_diversity + 0.4 * content_density,
        unique_word_count: unique.len(),
        total_words: total,
        content_hash,
    }
}
