// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Writing-style features: readability, word complexity, hedging and exaggeration

use super::readability::{analyze_readability, count_syllables};
use crate::text::{words, PhraseMatcher};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub const HEDGING_PHRASES: &[&str] = &[
    "may",
    "might",
    "could",
    "allegedly",
    "reportedly",
    "some people say",
    "sources say",
    "it is claimed",
    "it is believed",
    "possibly",
    "perhaps",
];

pub const EXAGGERATION_PHRASES: &[&str] = &[
    "all",
    "none",
    "every",
    "always",
    "never",
    "everyone",
    "nobody",
    "definitely",
    "absolutely",
    "undoubtedly",
    "completely",
];

static HEDGING: Lazy<PhraseMatcher> = Lazy::new(|| PhraseMatcher::new(HEDGING_PHRASES));
static EXAGGERATION: Lazy<PhraseMatcher> = Lazy::new(|| PhraseMatcher::new(EXAGGERATION_PHRASES));

/// Style profile of a text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WritingStyle {
    /// Flesch Reading Ease, in [0, 100]
    pub reading_ease: f64,
    /// Mean syllables per word
    pub avg_word_complexity: f64,
    pub hedging_phrases: usize,
    pub exaggeration_phrases: usize,
}

pub fn analyze_style(text: &str) -> WritingStyle {
    let tokens: Vec<&str> = words(text)
        .into_iter()
        .filter(|w| w.chars().any(|c| c.is_alphabetic()))
        .collect();
    if tokens.is_empty() {
        return WritingStyle::default();
    }

    let syllables: usize = tokens.iter().map(|t| count_syllables(t)).sum();
    WritingStyle {
        reading_ease: analyze_readability(text).flesch_reading_ease,
        avg_word_complexity: syllables as f64 / tokens.len() as f64,
        hedging_phrases: HEDGING.count(text),
        exaggeration_phrases: EXAGGERATION.count(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(analyze_style(""), WritingStyle::default());
    }

    #[test]
    fn test_hedging_and_exaggeration() {
        let style = analyze_style(
            "Everyone knows this always works. It may be true, sources say it could possibly help.",
        );
        assert_eq!(style.exaggeration_phrases, 2);
        assert_eq!(style.hedging_phrases, 4);
        assert!(style.avg_word_complexity >= 1.0);
    }

    #[test]
    fn test_whole_word_matching() {
        let style = analyze_style("The mayor recalled a small ball.");
        assert_eq!(style.hedging_phrases, 0);
        assert_eq!(style.exaggeration_phrases, 0);
    }
}
