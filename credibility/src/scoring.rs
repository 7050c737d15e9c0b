// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Credibility scoring
//!
//! Two variants share the same base score derived from the classifier's FAKE probability:
//! - [`CredibilityScorer::score`]: weighted penalties from clickbait, subjectivity,
//!   exaggeration, propaganda, readability and lexical diversity
//! - [`CredibilityScorer::indicator_score`]: reliability bonus and flat penalties per
//!   warning sign
//!
//! Both clamp to [0, 100] and round to one decimal.

use crate::config::BaseScale;
use crate::features::{
    ReadabilityMetrics, PropagandaAnalysis, TextFeatures, UniquenessMetrics, WarningSigns,
    WritingStyle,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct CredibilityScorer {
    scale: BaseScale,
}

fn finish(score: f64) -> f64 {
    (score.clamp(0.0, 100.0) * 10.0).round() / 10.0
}

/// Penalty for reading ease outside [30, 70]
pub fn readability_penalty(reading_ease: f64) -> f64 {
    if (30.0..=70.0).contains(&reading_ease) {
        0.0
    } else {
        ((reading_ease - 50.0).abs() * 0.2).min(10.0)
    }
}

/// Penalty for lexical diversity outside [0.3, 0.8]
pub fn diversity_penalty(diversity: f64) -> f64 {
    if (0.3..=0.8).contains(&diversity) {
        0.0
    } else {
        ((diversity - 0.5).abs() * 20.0).min(10.0)
    }
}

impl CredibilityScorer {
    pub fn new(scale: BaseScale) -> Self {
        Self { scale }
    }

    /// Base score before any adjustment
    pub fn base_score(&self, p_fake: f64) -> f64 {
        let p = p_fake.clamp(0.0, 1.0);
        match self.scale {
            BaseScale::Continuous => (1.0 - p) * 100.0,
            BaseScale::Legacy if p <= 0.5 => (1.0 - p) * 100.0,
            BaseScale::Legacy => (1.0 - p) * 200.0,
        }
    }

    /// Weighted-penalty score used for detailed analysis
    pub fn score(
        &self,
        p_fake: f64,
        features: &TextFeatures,
        style: &WritingStyle,
        readability: &ReadabilityMetrics,
        uniqueness: &UniquenessMetrics,
        propaganda: &PropagandaAnalysis,
    ) -> f64 {
        let mut score = self.base_score(p_fake);

        score -= features.clickbait_score as f64 * 5.0;
        score -= features.subjectivity * 10.0;
        score -= style.exaggeration_phrases as f64 * 2.0;
        score -= propaganda.propaganda_score * 0.5;
        score -= readability_penalty(readability.flesch_reading_ease);
        score -= diversity_penalty(uniqueness.lexical_diversity);

        let score = finish(score);
        tracing::debug!(p_fake, score, "weighted credibility score");
        score
    }

    /// Indicator-based score used for comprehensive analysis
    pub fn indicator_score(
        &self,
        p_fake: f64,
        features: &TextFeatures,
        style: &WritingStyle,
        warnings: &WarningSigns,
    ) -> f64 {
        let mut score = self.base_score(p_fake);

        score += warnings.reliability_indicators.len() as f64 * 3.0;
        score -= warnings.misinformation_indicators.len() as f64 * 5.0;
        if warnings.excessive_punctuation {
            score -= 10.0;
        }
        if warnings.excessive_capitalization {
            score -= 10.0;
        }
        if warnings.social_media_callout {
            score -= 15.0;
        }
        if warnings.source_credibility_issues {
            score -= 20.0;
        }
        if style.reading_ease > 60.0 {
            score += 5.0;
        }
        if features.subjectivity > 0.7 {
            score -= 10.0;
        }
        if features.polarity.abs() > 0.7 {
            score -= 10.0;
        }

        let score = finish(score);
        tracing::debug!(p_fake, score, "indicator credibility score");
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::extract_core;
    use approx::assert_relative_eq;

    #[test]
    fn test_base_scales() {
        let continuous = CredibilityScorer::new(BaseScale::Continuous);
        let legacy = CredibilityScorer::new(BaseScale::Legacy);
        assert_relative_eq!(continuous.base_score(0.2), 80.0);
        assert_relative_eq!(continuous.base_score(0.8), 20.0, epsilon = 1e-9);
        assert_relative_eq!(legacy.base_score(0.2), 80.0);
        assert_relative_eq!(legacy.base_score(0.8), 40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_penalties() {
        assert_eq!(readability_penalty(50.0), 0.0);
        assert_eq!(readability_penalty(30.0), 0.0);
        assert_relative_eq!(readability_penalty(20.0), 6.0, epsilon = 1e-9);
        assert_eq!(readability_penalty(100.0), 10.0);
        assert_eq!(diversity_penalty(0.5), 0.0);
        assert_relative_eq!(diversity_penalty(0.9), 8.0, epsilon = 1e-9);
        assert_eq!(diversity_penalty(1.0), 10.0);
    }

    #[test]
    fn test_clean_text_keeps_base() {
        let scorer = CredibilityScorer::default();
        let core = extract_core("");
        let score = scorer.score(
            0.1,
            &core.features,
            &core.style,
            &ReadabilityMetrics {
                flesch_reading_ease: 50.0,
                ..Default::default()
            },
            &UniquenessMetrics {
                lexical_diversity: 0.5,
                ..Default::default()
            },
            &core.propaganda,
        );
        assert_eq!(score, 90.0);
    }

    #[test]
    fn test_score_is_clamped() {
        let scorer = CredibilityScorer::default();
        let features = TextFeatures {
            clickbait_score: 30,
            subjectivity: 1.0,
            ..Default::default()
        };
        let score = scorer.score(
            0.99,
            &features,
            &WritingStyle::default(),
            &ReadabilityMetrics::default(),
            &UniquenessMetrics::default(),
            &PropagandaAnalysis::default(),
        );
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_indicator_score() {
        let scorer = CredibilityScorer::default();
        let warnings = WarningSigns {
            reliability_indicators: vec!["according to".into(), "percent".into()],
            misinformation_indicators: vec!["shocking".into()],
            excessive_capitalization: true,
            ..Default::default()
        };
        let style = WritingStyle {
            reading_ease: 65.0,
            ..Default::default()
        };
        let score = scorer.indicator_score(0.5, &TextFeatures::default(), &style, &warnings);
        // 50 + 6 - 5 - 10 + 5
        assert_eq!(score, 46.0);
    }
}
