// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Propaganda technique detection
//!
//! Eight techniques, each a fixed list of whole-word cues matched case-insensitively.
//! Testimonial additionally counts quoted passages.

use crate::text::PhraseMatcher;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Technique names with their cue lists, in reporting order
pub const TECHNIQUES: &[(&str, &[&str])] = &[
    (
        "name_calling",
        &[
            "fake", "phony", "corrupt", "radical", "traitor", "conspiracy", "disgrace", "stupid",
            "idiot", "dumb", "failure", "dangerous",
        ],
    ),
    (
        "glittering_generality",
        &[
            "freedom", "patriot", "justice", "truth", "love", "peace", "hope", "change",
            "progress", "unity", "best", "greatest",
        ],
    ),
    (
        "transfer",
        &[
            "flag", "nation", "country", "constitution", "founding fathers", "god", "bible",
            "faith", "science", "expert", "studies",
        ],
    ),
    ("testimonial", &["according to", "said that"]),
    (
        "plain_folks",
        &[
            "ordinary", "common", "everyday", "working class", "average joe", "regular people",
            "folks", "community", "neighbor", "family values",
        ],
    ),
    (
        "bandwagon",
        &["everyone", "people are", "most people", "many", "crowd", "majority", "trend"],
    ),
    (
        "fear",
        &[
            "threat", "danger", "crisis", "fear", "urgent", "emergency", "catastrophe",
            "disaster", "collapse", "invasion", "attack",
        ],
    ),
    (
        "loaded_language",
        &[
            "shocking", "outrageous", "explosive", "bombshell", "devastating", "dramatic",
            "terrifying", "horrific", "astonishing", "unbelievable",
        ],
    ),
];

static QUOTATION: Lazy<Regex> = Lazy::new(|| Regex::new(r#""[^"]*""#).unwrap());

static MATCHERS: Lazy<Vec<(&'static str, PhraseMatcher)>> = Lazy::new(|| {
    TECHNIQUES
        .iter()
        .map(|(name, cues)| (*name, PhraseMatcher::new(cues)))
        .collect()
});

/// Per-technique cue counts and a density score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropagandaAnalysis {
    pub techniques: BTreeMap<String, usize>,
    pub total_techniques: usize,
    /// `min(100, 100 * total / word_count)`
    pub propaganda_score: f64,
}

impl Default for PropagandaAnalysis {
    fn default() -> Self {
        Self {
            techniques: TECHNIQUES.iter().map(|(name, _)| (name.to_string(), 0)).collect(),
            total_techniques: 0,
            propaganda_score: 0.0,
        }
    }
}

impl PropagandaAnalysis {
    /// Techniques with at least one match, most frequent first (ties keep reporting order)
    pub fn top_techniques(&self, n: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = TECHNIQUES
            .iter()
            .map(|(name, _)| (*name, self.techniques.get(*name).copied().unwrap_or(0)))
            .filter(|(_, count)| *count > 0)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

pub fn detect_propaganda(text: &str) -> PropagandaAnalysis {
    let word_count = text.split_whitespace().count();
    if word_count == 0 {
        return PropagandaAnalysis::default();
    }

    let mut techniques = BTreeMap::new();
    for (name, matcher) in MATCHERS.iter() {
        let mut count = matcher.count(text);
        if *name == "testimonial" {
            count += QUOTATION.find_iter(text).count();
        }
        techniques.insert(name.to_string(), count);
    }

    let total_techniques: usize = techniques.values().sum();
    let propaganda_score = (total_techniques as f64 / word_count as f64 * 100.0).min(100.0);

    PropagandaAnalysis {
        techniques,
        total_techniques,
        propaganda_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_all_keys() {
        let analysis = detect_propaganda("");
        assert_eq!(analysis.techniques.len(), 8);
        assert_eq!(analysis.total_techniques, 0);
        assert_eq!(analysis.propaganda_score, 0.0);
    }

    #[test]
    fn test_loaded_language_headline() {
        let analysis = detect_propaganda(
            "BREAKING!!! Scientists find SHOCKING link, doctors don't want you to know!",
        );
        assert!(analysis.techniques["loaded_language"] >= 1);
        assert!(analysis.propaganda_score > 0.0);
    }

    #[test]
    fn test_neutral_report() {
        let analysis = detect_propaganda(
            "A study published in a peer-reviewed journal found a 2% increase in efficiency.",
        );
        assert_eq!(analysis.total_techniques, 0);
        assert!(analysis.propaganda_score < 10.0);
    }

    #[test]
    fn test_testimonial_quotes_and_score_cap() {
        let analysis = detect_propaganda(r#"He said "trust me" and "it works""#);
        assert_eq!(analysis.techniques["testimonial"], 2);

        let capped = detect_propaganda("fear crisis danger threat");
        assert_eq!(capped.propaganda_score, 100.0);
    }

    #[test]
    fn test_top_techniques_order() {
        let analysis = detect_propaganda("A crisis, a threat, a fake disaster and shocking news");
        let top = analysis.top_techniques(2);
        assert_eq!(top[0], ("fear", 3));
        assert_eq!(top[1], ("name_calling", 1));
    }
}
