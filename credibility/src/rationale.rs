// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Natural-language rationale for a prediction
//!
//! Clauses are appended in a fixed order, each only when its threshold is exceeded,
//! so identical inputs always produce identical text.

use crate::corpus::Label;
use crate::features::{
    PropagandaAnalysis, ReadabilityMetrics, TextFeatures, WarningSigns, WritingStyle,
};
use serde::{Deserialize, Serialize};

/// Coarse credibility bucket derived from the predicted label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredibilityLevel {
    Low,
    Medium,
    High,
}

impl CredibilityLevel {
    pub fn from_prediction(prediction: Option<Label>) -> Self {
        match prediction {
            Some(Label::Fake) => CredibilityLevel::Low,
            Some(Label::Real) => CredibilityLevel::High,
            None => CredibilityLevel::Medium,
        }
    }

    fn summary(self) -> &'static str {
        match self {
            CredibilityLevel::Low => {
                "Overall, this content displays multiple characteristics commonly associated with fake news and should be treated with skepticism."
            }
            CredibilityLevel::Medium => {
                "This content shows some concerning characteristics and should be verified with trusted sources."
            }
            CredibilityLevel::High => {
                "This content appears to follow journalistic standards, but critical reading is always recommended."
            }
        }
    }
}

/// Explanation for detailed analysis
pub fn explain(
    prediction: Option<Label>,
    confidence: f64,
    features: &TextFeatures,
    style: &WritingStyle,
    propaganda: &PropagandaAnalysis,
    readability: &ReadabilityMetrics,
) -> String {
    let level = CredibilityLevel::from_prediction(prediction);
    let mut out = match level {
        CredibilityLevel::Low => format!("This text appears to be fake news (confidence: {:.2}). ", confidence),
        CredibilityLevel::High => format!("This text appears to be real news (confidence: {:.2}). ", confidence),
        CredibilityLevel::Medium => format!(
            "The credibility of this text is uncertain (confidence: {:.2}). ",
            confidence
        ),
    };

    if features.clickbait_score > 2 {
        out.push_str(&format!(
            "It contains {} clickbait phrases, which is characteristic of sensationalized content. ",
            features.clickbait_score
        ));
    }
    if features.capitalized_ratio > 0.1 {
        out.push_str(&format!(
            "It has an unusually high proportion of CAPITALIZED words ({:.2}), often used for emphasis in misleading content. ",
            features.capitalized_ratio
        ));
    }
    if features.exclamation_count > 3 {
        out.push_str(&format!(
            "The text uses {} exclamation marks, which can indicate emotional manipulation. ",
            features.exclamation_count
        ));
    }
    if style.hedging_phrases > 2 {
        out.push_str(&format!(
            "It contains {} hedging phrases (like 'allegedly', 'reportedly'), which can indicate uncertainty. ",
            style.hedging_phrases
        ));
    }
    if style.exaggeration_phrases > 2 {
        out.push_str(&format!(
            "It uses {} exaggeration phrases, which may indicate overstatement of facts. ",
            style.exaggeration_phrases
        ));
    }
    if propaganda.propaganda_score > 20.0 {
        out.push_str(&format!(
            "The text shows strong indicators of propaganda techniques ({:.1}% score). ",
            propaganda.propaganda_score
        ));
        let top = propaganda.top_techniques(2);
        if !top.is_empty() {
            let list: Vec<String> = top
                .iter()
                .map(|(name, count)| format!("{} ({})", name, count))
                .collect();
            out.push_str(&format!("Most common techniques: {}. ", list.join(", ")));
        }
    }

    let ease = readability.flesch_reading_ease;
    if ease < 30.0 {
        out.push_str(&format!(
            "The text is very difficult to read (grade level {:.1}), which can obscure critical assessment. ",
            readability.average_grade_level
        ));
    } else if ease > 70.0 {
        out.push_str(&format!(
            "The text is very easy to read (grade level {:.1}), which is common in simplified propaganda. ",
            readability.average_grade_level
        ));
    }

    out.push_str(level.summary());
    out
}

/// Explanation for comprehensive analysis, driven by warning signs
pub fn explain_indicators(
    prediction: Label,
    confidence: f64,
    features: &TextFeatures,
    style: &WritingStyle,
    warnings: &WarningSigns,
) -> String {
    let mut parts = Vec::new();

    parts.push(match prediction {
        Label::Fake => format!(
            "This text appears to be potentially misleading or fake news (model confidence: {:.1}%).",
            confidence * 100.0
        ),
        Label::Real => format!(
            "This text appears to be potentially reliable or real news (model confidence: {:.1}%).",
            confidence * 100.0
        ),
    });

    let misinformation = &warnings.misinformation_indicators;
    if !misinformation.is_empty() {
        parts.push(format!(
            "Found {} indicators of potential misinformation, including: {}.",
            misinformation.len(),
            first_three(misinformation)
        ));
    }
    let reliability = &warnings.reliability_indicators;
    if !reliability.is_empty() {
        parts.push(format!(
            "Found {} indicators of potential reliability, including: {}.",
            reliability.len(),
            first_three(reliability)
        ));
    }

    if warnings.excessive_punctuation {
        parts.push("The text contains excessive punctuation, which is common in sensationalized content.".into());
    }
    if warnings.excessive_capitalization {
        parts.push("The text contains excessive capitalization, which is common in sensationalized content.".into());
    }
    if warnings.social_media_callout {
        parts.push("The text contains calls to share on social media, which is common in viral misinformation.".into());
    }
    if warnings.source_credibility_issues {
        parts.push("The text references anonymous or vague sources, which reduces credibility.".into());
    }

    if features.subjectivity > 0.7 {
        parts.push(format!(
            "The text is highly subjective (score: {:.2}), which may indicate opinion rather than fact-based reporting.",
            features.subjectivity
        ));
    }
    if features.polarity.abs() > 0.7 {
        parts.push(format!(
            "The text has extreme sentiment (polarity: {:.2}), which may indicate emotional language rather than balanced reporting.",
            features.polarity
        ));
    }
    if style.exaggeration_phrases > 2 {
        parts.push(format!(
            "The text contains {} exaggeration phrases, which may indicate overstatement.",
            style.exaggeration_phrases
        ));
    }
    if style.hedging_phrases > 2 {
        parts.push(format!(
            "The text contains {} hedging phrases, which may indicate uncertainty.",
            style.hedging_phrases
        ));
    }

    parts.join(" ")
}

fn first_three(items: &[String]) -> String {
    items.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::extract_core;

    #[test]
    fn test_plain_template() {
        let text = explain(
            Some(Label::Real),
            0.87,
            &TextFeatures::default(),
            &WritingStyle::default(),
            &PropagandaAnalysis::default(),
            &ReadabilityMetrics {
                flesch_reading_ease: 50.0,
                ..Default::default()
            },
        );
        assert_eq!(
            text,
            "This text appears to be real news (confidence: 0.87). \
             This content appears to follow journalistic standards, but critical reading is always recommended."
        );
    }

    #[test]
    fn test_clauses_in_order() {
        let features = TextFeatures {
            clickbait_score: 3,
            capitalized_ratio: 0.25,
            exclamation_count: 5,
            ..Default::default()
        };
        let style = WritingStyle {
            exaggeration_phrases: 4,
            ..Default::default()
        };
        let mut propaganda = PropagandaAnalysis::default();
        propaganda.propaganda_score = 30.0;
        propaganda.techniques.insert("fear".into(), 4);
        propaganda.techniques.insert("bandwagon".into(), 2);
        let readability = ReadabilityMetrics {
            flesch_reading_ease: 20.0,
            average_grade_level: 14.26,
            ..Default::default()
        };

        let text = explain(Some(Label::Fake), 0.92, &features, &style, &propaganda, &readability);
        assert!(text.starts_with("This text appears to be fake news (confidence: 0.92). "));
        assert!(text.contains("(0.25)"));
        assert!(text.contains("Most common techniques: fear (4), bandwagon (2). "));
        assert!(text.contains("grade level 14.3"));
        let clickbait = text.find("clickbait phrases").unwrap();
        let caps = text.find("CAPITALIZED").unwrap();
        let exaggeration = text.find("exaggeration phrases").unwrap();
        let propaganda_at = text.find("propaganda techniques").unwrap();
        assert!(clickbait < caps && caps < exaggeration && exaggeration < propaganda_at);
        assert!(text.ends_with("should be treated with skepticism."));
    }

    #[test]
    fn test_uncertain_and_deterministic() {
        let core = extract_core("Shocking news! Everyone is talking about it!");
        let a = explain(None, 0.5, &core.features, &core.style, &core.propaganda, &core.readability);
        let b = explain(None, 0.5, &core.features, &core.style, &core.propaganda, &core.readability);
        assert_eq!(a, b);
        assert!(a.starts_with("The credibility of this text is uncertain (confidence: 0.50). "));
        assert!(a.ends_with("should be verified with trusted sources."));
    }

    #[test]
    fn test_indicator_template() {
        let warnings = WarningSigns {
            misinformation_indicators: vec!["shocking".into(), "breaking".into(), "secret".into(), "cure".into()],
            social_media_callout: true,
            ..Default::default()
        };
        let text = explain_indicators(
            Label::Fake,
            0.915,
            &TextFeatures::default(),
            &WritingStyle::default(),
            &warnings,
        );
        assert!(text.starts_with("This text appears to be potentially misleading or fake news (model confidence: 91.5%)."));
        assert!(text.contains("Found 4 indicators of potential misinformation, including: shocking, breaking, secret."));
        assert!(text.contains("calls to share on social media"));
        assert!(!text.contains("reliability"));
    }
}
