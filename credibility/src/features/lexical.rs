// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Surface-level lexical features

use super::sentiment::analyze_sentiment;
use crate::text::{is_all_caps, sentences, substring_hits, words};
use serde::{Deserialize, Serialize};

/// Sensationalist phrases counted by [`TextFeatures::clickbait_score`]
pub const CLICKBAIT_PHRASES: &[&str] = &[
    "you won't believe",
    "shocking",
    "mind blowing",
    "amazing",
    "unbelievable",
    "incredible",
    "won't believe your eyes",
    "shocking truth",
    "what happens next",
    "secret",
    "reveal",
    "exclusive",
    "the truth about",
    "they don't want you to know",
    "conspiracy",
];

const PERSONAL_PRONOUNS: &[&str] = &[
    "i", "me", "my", "mine", "myself", "we", "us", "our", "ours", "ourselves", "you", "your",
    "yours", "yourself", "yourselves",
];

/// Counts, ratios and sentiment of a text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextFeatures {
    pub word_count: usize,
    pub avg_word_length: f64,
    pub sentence_count: usize,
    pub avg_sentence_length: f64,
    pub exclamation_count: usize,
    pub question_count: usize,
    /// Share of words written in ALL CAPS, in [0, 1]
    pub capitalized_ratio: f64,
    /// Number of clickbait phrases present
    pub clickbait_score: usize,
    pub polarity: f64,
    pub subjectivity: f64,
    pub personal_pronouns: usize,
    /// Share of characters that are ASCII punctuation, in [0, 1]
    pub punctuation_ratio: f64,
}

/// Extract [`TextFeatures`]; empty input gives the zeroed struct
pub fn extract_features(text: &str) -> TextFeatures {
    let tokens = words(text);
    if tokens.is_empty() {
        return TextFeatures::default();
    }

    let word_count = tokens.len();
    let total_len: usize = tokens.iter().map(|w| w.chars().count()).sum();
    let sentence_count = sentences(text).len();

    let caps = text
        .split_whitespace()
        .filter(|w| w.chars().count() > 1 && is_all_caps(w))
        .count();

    let lower = text.to_lowercase();
    let personal_pronouns = words(&lower)
        .into_iter()
        .filter(|w| PERSONAL_PRONOUNS.contains(w))
        .count();

    let char_count = text.chars().count();
    let punctuation = text.chars().filter(|c| c.is_ascii_punctuation()).count();

    let sentiment = analyze_sentiment(text);

    TextFeatures {
        word_count,
        avg_word_length: total_len as f64 / word_count as f64,
        sentence_count,
        avg_sentence_length: if sentence_count > 0 {
            word_count as f64 / sentence_count as f64
        } else {
            0.0
        },
        exclamation_count: text.matches('!').count(),
        question_count: text.matches('?').count(),
        capitalized_ratio: (caps as f64 / word_count as f64).min(1.0),
        clickbait_score: substring_hits(text, CLICKBAIT_PHRASES).len(),
        polarity: sentiment.polarity,
        subjectivity: sentiment.subjectivity,
        personal_pronouns,
        punctuation_ratio: punctuation as f64 / char_count as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        assert_eq!(extract_features(""), TextFeatures::default());
        assert_eq!(extract_features("  !!! "), TextFeatures::default());
    }

    #[test]
    fn test_sensational_headline() {
        let f = extract_features(
            "BREAKING!!! Scientists find SHOCKING link, doctors don't want you to know!",
        );
        assert_eq!(f.word_count, 11);
        assert_eq!(f.exclamation_count, 4);
        assert!(f.clickbait_score >= 1);
        assert!(f.capitalized_ratio > 0.1);
        assert_eq!(f.personal_pronouns, 1);
        assert_eq!(f.sentence_count, 2);
    }

    #[test]
    fn test_sober_sentence() {
        let f = extract_features("A study published in a peer-reviewed journal found a 2% increase in efficiency.");
        assert_eq!(f.clickbait_score, 0);
        assert_eq!(f.capitalized_ratio, 0.0);
        assert_eq!(f.sentence_count, 1);
        assert!(f.punctuation_ratio > 0.0 && f.punctuation_ratio < 1.0);
    }
}
