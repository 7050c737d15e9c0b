// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Word usage patterns

use crate::text::{ngram_frequencies, words};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const TOP_N: usize = 10;

pub const EMOTIONAL_WORDS: &[&str] = &[
    "shocking", "outrageous", "amazing", "incredible", "terrifying", "alarming", "devastating",
    "horrific", "scandalous", "appalling",
];

pub const SCIENTIFIC_WORDS: &[&str] = &[
    "study", "research", "analysis", "evidence", "data", "experiment", "statistics", "journal",
    "publication", "conclusion",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordUsage {
    /// Most frequent words, most frequent first
    pub top_words: Vec<(String, usize)>,
    pub top_bigrams: Vec<(String, usize)>,
    pub emotional_language_count: usize,
    pub scientific_language_count: usize,
}

fn top(freq: BTreeMap<String, usize>, n: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = freq.into_iter().collect();
    // stable: ties stay alphabetical
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

pub fn analyze_word_usage(text: &str) -> WordUsage {
    let lower = text.to_lowercase();
    let tokens = words(&lower);
    if tokens.is_empty() {
        return WordUsage::default();
    }

    let mut unigrams = BTreeMap::new();
    for token in &tokens {
        *unigrams.entry(token.to_string()).or_insert(0) += 1;
    }

    WordUsage {
        top_words: top(unigrams, TOP_N),
        top_bigrams: top(ngram_frequencies(text, 2), TOP_N),
        emotional_language_count: tokens.iter().filter(|t| EMOTIONAL_WORDS.contains(t)).count(),
        scientific_language_count: tokens.iter().filter(|t| SCIENTIFIC_WORDS.contains(t)).count(),
    }
}
