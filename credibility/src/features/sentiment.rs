// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Lexicon-based polarity and subjectivity
//!
//! Each opinion word carries a (polarity, subjectivity) pair. Intensifiers scale the
//! next opinion word, negations flip and dampen it. Document scores are the mean
//! over matched opinion words.

use crate::text::words;
use serde::{Deserialize, Serialize};

/// Sentiment of a text
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    /// Negative to positive, in [-1, 1]
    pub polarity: f64,
    /// Objective to subjective, in [0, 1]
    pub subjectivity: f64,
}

const LEXICON: &[(&str, f64, f64)] = &[
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("excellent", 1.0, 1.0),
    ("amazing", 0.6, 0.9),
    ("incredible", 0.9, 0.9),
    ("wonderful", 1.0, 1.0),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("happy", 0.8, 1.0),
    ("love", 0.5, 0.6),
    ("beautiful", 0.85, 1.0),
    ("perfect", 1.0, 1.0),
    ("positive", 0.23, 0.55),
    ("safe", 0.5, 0.5),
    ("effective", 0.6, 0.8),
    ("important", 0.4, 1.0),
    ("successful", 0.75, 0.95),
    ("brilliant", 0.9, 1.0),
    ("fantastic", 0.4, 0.9),
    ("true", 0.35, 0.65),
    ("bad", -0.7, 0.67),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
    ("terrible", -1.0, 1.0),
    ("horrible", -1.0, 1.0),
    ("awful", -1.0, 1.0),
    ("shocking", -1.0, 1.0),
    ("outrageous", -0.9, 1.0),
    ("terrifying", -1.0, 1.0),
    ("horrific", -1.0, 1.0),
    ("devastating", -0.8, 0.9),
    ("disgusting", -1.0, 1.0),
    ("dangerous", -0.6, 0.9),
    ("evil", -1.0, 1.0),
    ("corrupt", -0.5, 0.5),
    ("stupid", -0.8, 1.0),
    ("sad", -0.5, 1.0),
    ("angry", -0.5, 1.0),
    ("wrong", -0.5, 0.9),
    ("false", -0.4, 0.6),
    ("fake", -0.5, 1.0),
    ("negative", -0.3, 0.4),
    ("crazy", -0.6, 0.9),
    ("insane", -1.0, 1.0),
    ("alarming", -0.6, 0.9),
    ("unbelievable", -0.5, 0.9),
    ("ridiculous", -0.33, 1.0),
    ("poor", -0.4, 0.6),
    ("failure", -0.3, 0.5),
    ("disaster", -0.7, 0.8),
    ("secret", -0.4, 0.7),
    ("new", 0.14, 0.45),
    ("real", 0.2, 0.3),
    ("clear", 0.1, 0.38),
    ("significant", 0.38, 0.88),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.2),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("so", 1.2),
    ("absolutely", 1.4),
    ("totally", 1.3),
    ("completely", 1.3),
    ("highly", 1.3),
];

const NEGATIONS: &[&str] = &["not", "no", "never", "nothing", "neither", "nor", "none"];

const NEGATION_WINDOW: usize = 3;

fn lookup(word: &str) -> Option<(f64, f64)> {
    LEXICON
        .iter()
        .find(|(w, _, _)| *w == word)
        .map(|(_, p, s)| (*p, *s))
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.ends_with("n't")
}

/// Score the polarity and subjectivity of `text`
pub fn analyze_sentiment(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    let tokens = words(&lower);

    let mut polarities = Vec::new();
    let mut subjectivities = Vec::new();
    let mut intensity = 1.0;
    let mut negated_for = 0usize;

    for token in tokens {
        if is_negation(token) {
            negated_for = NEGATION_WINDOW;
            continue;
        }
        if let Some((_, factor)) = INTENSIFIERS.iter().find(|(w, _)| *w == token) {
            intensity *= factor;
            continue;
        }

        if let Some((polarity, subjectivity)) = lookup(token) {
            let mut p = polarity * intensity;
            if negated_for > 0 {
                p *= -0.5;
            }
            polarities.push(p.clamp(-1.0, 1.0));
            subjectivities.push((subjectivity * intensity).clamp(0.0, 1.0));
            negated_for = 0;
        } else {
            negated_for = negated_for.saturating_sub(1);
        }
        intensity = 1.0;
    }

    if polarities.is_empty() {
        return Sentiment::default();
    }
    let n = polarities.len() as f64;
    Sentiment {
        polarity: (polarities.iter().sum::<f64>() / n).clamp(-1.0, 1.0),
        subjectivity: (subjectivities.iter().sum::<f64>() / n).clamp(0.0, 1.0),
    }
}
