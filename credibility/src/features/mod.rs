// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Feature extractors
//!
//! Every extractor is a pure `&str -> struct` function with no shared state:
//! - [`lexical`]: counts, ratios, clickbait phrases, sentiment
//! - [`style`]: reading ease, word complexity, hedging, exaggeration
//! - [`readability`]: six readability indices
//! - [`propaganda`]: eight propaganda techniques
//! - [`uniqueness`]: lexical diversity and content hash
//! - [`language`]: heuristic language identification
//! - [`entities`]: entity counts by type
//! - [`warnings`]: misinformation warning signs and clickbait detail
//! - [`usage`]: frequent words and bigrams
//!
//! Empty input always yields the zeroed/default struct.

pub mod entities;
pub mod language;
pub mod lexical;
pub mod propaganda;
pub mod readability;
pub mod sentiment;
pub mod style;
pub mod uniqueness;
pub mod usage;
pub mod warnings;

pub use entities::{extract_entities, EntityInfo};
pub use language::{detect_language, LanguageInfo};
pub use lexical::{extract_features, TextFeatures};
pub use propaganda::{detect_propaganda, PropagandaAnalysis};
pub use readability::{analyze_readability, ReadabilityMetrics};
pub use sentiment::{analyze_sentiment, Sentiment};
pub use style::{analyze_style, WritingStyle};
pub use uniqueness::{analyze_uniqueness, UniquenessMetrics};
pub use usage::{analyze_word_usage, WordUsage};
pub use warnings::{detect_clickbait, detect_warning_signs, ClickbaitDetail, WarningSigns};

use serde::{Deserialize, Serialize};

/// Extractor outputs consumed by the scorer and the explanation generator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreFeatures {
    pub features: TextFeatures,
    pub style: WritingStyle,
    pub readability: ReadabilityMetrics,
    pub propaganda: PropagandaAnalysis,
    pub uniqueness: UniquenessMetrics,
}

/// Run the core extractors in parallel
pub fn extract_core(text: &str) -> CoreFeatures {
    let ((features, style), (readability, (propaganda, uniqueness))) = rayon::join(
        || rayon::join(|| extract_features(text), || analyze_style(text)),
        || {
            rayon::join(
                || analyze_readability(text),
                || rayon::join(|| detect_propaganda(text), || analyze_uniqueness(text)),
            )
        },
    );
    CoreFeatures {
        features,
        style,
        readability,
        propaganda,
        uniqueness,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_core_matches_individual_extractors() {
        let text = "Experts warn of a crisis. Everyone must act now!";
        let core = extract_core(text);
        assert_eq!(core.features, extract_features(text));
        assert_eq!(core.readability, analyze_readability(text));
        assert_eq!(core.propaganda, detect_propaganda(text));
        assert_eq!(core, extract_core(text));
    }

    #[test]
    fn test_extract_core_empty() {
        let core = extract_core("");
        assert_eq!(core.features, TextFeatures::default());
        assert_eq!(core.style, WritingStyle::default());
        assert_eq!(core.propaganda.total_techniques, 0);
    }
}
