// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Readability indices
//!
//! Implements six closed-form indices over word, sentence, syllable and letter counts:
//! - Flesch Reading Ease (clamped to [0, 100])
//! - Flesch-Kincaid Grade
//! - Gunning Fog
//! - SMOG
//! - Coleman-Liau
//! - Automated Readability Index
//!
//! Grade indices are clamped at zero. All values are rounded to two decimals.

use crate::text::{sentences, words};
use serde::{Deserialize, Serialize};

/// Readability indices of a text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityMetrics {
    pub flesch_reading_ease: f64,
    pub flesch_kincaid_grade: f64,
    pub gunning_fog: f64,
    pub smog_index: f64,
    pub coleman_liau_index: f64,
    pub automated_readability_index: f64,
    /// Mean of the five grade-level indices
    pub average_grade_level: f64,
}

/// Approximate syllable count of a single word, at least 1
pub fn count_syllables(word: &str) -> usize {
    let word: String = word
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect();
    if word.chars().count() <= 3 {
        return 1;
    }
    let word = word.strip_suffix('e').unwrap_or(&word);

    let mut count = 0;
    let mut prev_vowel = false;
    for c in word.chars() {
        let vowel = "aeiouy".contains(c);
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }
    count.max(1)
}

/// Words of three or more syllables
pub fn is_complex_word(word: &str) -> bool {
    count_syllables(word) >= 3
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute every index; text without words or sentences gives the zeroed struct
pub fn analyze_readability(text: &str) -> ReadabilityMetrics {
    let tokens: Vec<&str> = words(text)
        .into_iter()
        .filter(|w| w.chars().any(|c| c.is_alphabetic()))
        .collect();
    let sentence_count = sentences(text).len();
    if tokens.is_empty() || sentence_count == 0 {
        return ReadabilityMetrics::default();
    }

    let w = tokens.len() as f64;
    let s = sentence_count as f64;
    let syllables: usize = tokens.iter().map(|t| count_syllables(t)).sum();
    let syl = syllables as f64;
    let complex = tokens.iter().filter(|t| is_complex_word(t)).count() as f64;
    let letters = tokens
        .iter()
        .flat_map(|t| t.chars())
        .filter(|c| c.is_alphabetic())
        .count() as f64;
    let characters = tokens
        .iter()
        .flat_map(|t| t.chars())
        .filter(|c| c.is_alphanumeric())
        .count() as f64;

    let words_per_sentence = w / s;
    let syllables_per_word = syl / w;

    let flesch_reading_ease =
        (206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word).clamp(0.0, 100.0);
    let flesch_kincaid_grade =
        (0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59).max(0.0);
    let gunning_fog = (0.4 * (words_per_sentence + 100.0 * complex / w)).max(0.0);
    let smog_index = (1.043 * (complex * 30.0 / s).sqrt() + 3.1291).max(0.0);
    let l = letters / w * 100.0;
    let s100 = s / w * 100.0;
    let coleman_liau_index = (0.0588 * l - 0.296 * s100 - 15.8).max(0.0);
    let automated_readability_index =
        (4.71 * characters / w + 0.5 * words_per_sentence - 21.43).max(0.0);

    let average_grade_level = (flesch_kincaid_grade
        + gunning_fog
        + smog_index
        + coleman_liau_index
        + automated_readability_index)
        / 5.0;

    ReadabilityMetrics {
        flesch_reading_ease: round2(flesch_reading_ease),
        flesch_kincaid_grade: round2(flesch_kincaid_grade),
        gunning_fog: round2(gunning_fog),
        smog_index: round2(smog_index),
        coleman_liau_index: round2(coleman_liau_index),
        automated_readability_index: round2(automated_readability_index),
        average_grade_level: round2(average_grade_level),
    }
}
