// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Warning signs of misinformation and a normalized clickbait detector

use crate::text::{is_all_caps, substring_hits};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Phrases common in misleading content
pub const MISINFORMATION_INDICATORS: &[&str] = &[
    // clickbait
    "you won't believe",
    "shocking",
    "mind blowing",
    "incredible",
    "unbelievable",
    // sensationalism
    "shocking truth",
    "what they don't want you to know",
    "secret",
    "conspiracy",
    // generalized claims
    "everyone knows",
    "studies show",
    "scientists say",
    "doctors reveal",
    // urgency
    "urgent",
    "breaking",
    "alert",
    "warning",
    "must read",
    "share now",
    // sourcing
    "according to anonymous sources",
    "insider reveals",
    "leaked information",
    // extreme claims
    "miracle",
    "cure",
    "perfect",
    "revolutionary",
    "guaranteed",
    "proven",
];

/// Phrases common in careful reporting
pub const RELIABILITY_INDICATORS: &[&str] = &[
    "according to",
    "cited in",
    "published in",
    "researchers at",
    "suggests",
    "indicates",
    "appears to",
    "may",
    "could",
    "professor",
    "Dr.",
    "spokesperson",
    "report by",
    "analysis shows",
    "percent",
    "proportion",
    "survey found",
    "study shows",
    "data indicates",
    "however",
    "on the other hand",
    "critics say",
    "proponents argue",
];

const SOCIAL_CALLOUTS: &[&str] = &["share this", "like and share", "retweet", "spread the word"];

const SOURCE_ISSUES: &[&str] = &[
    "anonymous sources",
    "unnamed sources",
    "sources say",
    "someone told me",
    "they don't want you to know",
];

/// Phrases scored by [`detect_clickbait`]
pub const CLICKBAIT_PATTERNS: &[&str] = &[
    "you won't believe",
    "shocking",
    "amazing",
    "incredible",
    "mind blowing",
    "you'll never guess",
    "unbelievable",
    "jaw-dropping",
    "secret",
    "insane",
    "revealed",
    "top 10",
    "what happens next",
    "this is why",
    "will shock you",
];

static REPEATED_MARKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[!?]{2,}").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WarningSigns {
    pub misinformation_indicators: Vec<String>,
    pub reliability_indicators: Vec<String>,
    /// More `!`, `?` and `.` than 20% of the word count
    pub excessive_punctuation: bool,
    /// More ALL-CAPS words than 10% of the word count
    pub excessive_capitalization: bool,
    pub social_media_callout: bool,
    pub source_credibility_issues: bool,
}

impl WarningSigns {
    /// Number of raised boolean flags
    pub fn flag_count(&self) -> usize {
        [
            self.excessive_punctuation,
            self.excessive_capitalization,
            self.social_media_callout,
            self.source_credibility_issues,
        ]
        .iter()
        .filter(|f| **f)
        .count()
    }
}

pub fn detect_warning_signs(text: &str) -> WarningSigns {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return WarningSigns::default();
    }
    let word_count = words.len() as f64;

    let punctuation = text.chars().filter(|c| matches!(c, '!' | '?' | '.')).count() as f64;
    let caps = words
        .iter()
        .filter(|w| w.chars().count() > 1 && is_all_caps(w))
        .count() as f64;

    WarningSigns {
        misinformation_indicators: substring_hits(text, MISINFORMATION_INDICATORS),
        reliability_indicators: substring_hits(text, RELIABILITY_INDICATORS),
        excessive_punctuation: punctuation > word_count * 0.2,
        excessive_capitalization: caps > word_count * 0.1,
        social_media_callout: !substring_hits(text, SOCIAL_CALLOUTS).is_empty(),
        source_credibility_issues: !substring_hits(text, SOURCE_ISSUES).is_empty(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClickbaitDetail {
    /// In [0, 1]
    pub clickbait_score: f64,
    pub matched_patterns: Vec<String>,
    pub caps_count: usize,
    pub is_likely_clickbait: bool,
}

/// Weighted clickbait estimate from phrase matches, capitalization and repeated `!`/`?`
pub fn detect_clickbait(text: &str) -> ClickbaitDetail {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return ClickbaitDetail::default();
    }

    let matched_patterns = substring_hits(text, CLICKBAIT_PATTERNS);
    let caps_count = words
        .iter()
        .filter(|w| w.chars().count() > 2 && is_all_caps(w))
        .count();
    let caps_ratio = caps_count as f64 / words.len() as f64;
    let repeated = REPEATED_MARKS.find_iter(text).count() as f64;

    let score = (0.2 * matched_patterns.len() as f64 + 0.4 * caps_ratio + 0.4 * repeated).min(1.0);

    ClickbaitDetail {
        clickbait_score: score,
        matched_patterns,
        caps_count,
        is_likely_clickbait: score > 0.3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADLINE: &str = "BREAKING!!! Scientists find SHOCKING link, doctors don't want you to know!";

    #[test]
    fn test_headline_warning_signs() {
        let signs = detect_warning_signs(HEADLINE);
        assert!(signs.excessive_capitalization);
        assert!(signs.excessive_punctuation);
        assert!(signs.misinformation_indicators.contains(&"shocking".to_string()));
        assert!(signs.misinformation_indicators.contains(&"breaking".to_string()));
        assert!(!signs.social_media_callout);
        assert_eq!(signs.flag_count(), 2);
    }

    #[test]
    fn test_reliable_text() {
        let signs = detect_warning_signs(
            "According to a survey found by researchers at the university, 40 percent agreed; however, critics say more data is needed.",
        );
        assert!(signs.reliability_indicators.len() >= 4);
        assert!(!signs.excessive_capitalization);
        assert!(!signs.excessive_punctuation);
    }

    #[test]
    fn test_callouts_and_sources() {
        let signs = detect_warning_signs("Anonymous sources confirm it. Share this before it is gone");
        assert!(signs.social_media_callout);
        assert!(signs.source_credibility_issues);
        assert_eq!(detect_warning_signs(""), WarningSigns::default());
    }

    #[test]
    fn test_clickbait_detail() {
        let detail = detect_clickbait(HEADLINE);
        assert_eq!(detail.matched_patterns, vec!["shocking".to_string()]);
        assert_eq!(detail.caps_count, 2);
        assert!(detail.is_likely_clickbait);
        assert!(detail.clickbait_score <= 1.0);

        let calm = detect_clickbait("The council approved the budget on Monday.");
        assert_eq!(calm.clickbait_score, 0.0);
        assert!(!calm.is_likely_clickbait);
    }
}
