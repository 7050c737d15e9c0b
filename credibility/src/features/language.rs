// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Heuristic language identification
//!
//! Each candidate language is scored against three tables:
//! - common function words (10 points per occurrence)
//! - characters unique to the language (5 points per occurrence)
//! - frequent letter bigrams (1 point per occurrence)
//!
//! The word lists are disjoint so that shared function words do not split the vote.
//! Bigram counts give running prose a baseline, so a lone proper noun such as
//! "Los Angeles" cannot outvote an English sentence.
//! Confidence is the winner's share of the total score.

use crate::text::words;
use serde::{Deserialize, Serialize};

const MIN_CHARS: usize = 10;

struct LanguageProfile {
    code: &'static str,
    name: &'static str,
    common_words: &'static [&'static str],
    unique_chars: &'static str,
    bigrams: &'static [&'static str],
}

const PROFILES: &[LanguageProfile] = &[
    LanguageProfile {
        code: "en",
        name: "English",
        common_words: &[
            "the", "and", "is", "of", "to", "that", "was", "for", "with", "this", "have", "are",
            "be", "from", "they", "by", "which", "were", "their", "has", "been", "will", "would",
            "it", "in", "on", "at",
        ],
        unique_chars: "",
        bigrams: &["th", "he", "in", "er", "an", "re", "on", "at", "en", "nd"],
    },
    LanguageProfile {
        code: "es",
        name: "Spanish",
        common_words: &[
            "el", "los", "las", "y", "por", "con", "para", "del", "se", "al", "lo", "como", "más",
            "pero", "sus", "este", "una", "muy", "también", "está", "hay", "fue", "son", "entre",
            "cuando", "todo", "sobre", "la", "que", "hoy", "según", "un",
        ],
        unique_chars: "ñáíóú¿¡",
        bigrams: &["de", "en", "la", "el", "qu", "es", "ar", "ue", "os", "as"],
    },
    LanguageProfile {
        code: "fr",
        name: "French",
        common_words: &[
            "le", "les", "et", "est", "une", "des", "du", "qui", "dans", "pour", "pas", "sur",
            "au", "avec", "ce", "il", "elle", "sont", "mais", "nous", "vous", "été", "aux", "ont",
            "cette", "leur",
        ],
        unique_chars: "çâêîôûëïèà",
        bigrams: &["le", "de", "es", "en", "on", "nt", "qu", "re", "an", "la"],
    },
    LanguageProfile {
        code: "de",
        name: "German",
        common_words: &[
            "der", "die", "das", "und", "ist", "nicht", "ein", "eine", "zu", "den", "von", "mit",
            "sich", "auf", "für", "im", "dem", "des", "es", "auch", "wird", "sind", "werden", "bei",
            "oder", "wie",
        ],
        unique_chars: "äöüß",
        bigrams: &["en", "er", "ch", "de", "ei", "in", "te", "nd", "ie", "ge"],
    },
];

/// Detected language of a text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
    /// Winner's share of the total score, in [0, 1]
    pub confidence: f64,
}

impl LanguageInfo {
    pub fn unknown() -> Self {
        Self {
            code: "un".to_string(),
            name: "Unknown".to_string(),
            confidence: 0.0,
        }
    }

    pub fn is_english(&self) -> bool {
        self.code == "en"
    }
}

impl Default for LanguageInfo {
    fn default() -> Self {
        Self::unknown()
    }
}

fn profile_score(profile: &LanguageProfile, lower: &str, tokens: &[&str]) -> f64 {
    let word_hits = tokens
        .iter()
        .filter(|t| profile.common_words.iter().any(|w| w == *t))
        .count() as f64;
    let char_hits = lower
        .chars()
        .filter(|c| profile.unique_chars.contains(*c))
        .count() as f64;
    let bigram_hits: usize = profile.bigrams.iter().map(|b| lower.matches(*b).count()).sum();
    10.0 * word_hits + 5.0 * char_hits + bigram_hits as f64
}

pub fn detect_language(text: &str) -> LanguageInfo {
    if text.trim().chars().count() < MIN_CHARS {
        return LanguageInfo::unknown();
    }

    let lower = text.to_lowercase();
    let tokens = words(&lower);

    let scores: Vec<(&LanguageProfile, f64)> = PROFILES
        .iter()
        .map(|p| (p, profile_score(p, &lower, &tokens)))
        .collect();
    let total: f64 = scores.iter().map(|(_, s)| s).sum();

    let best = scores
        .iter()
        .fold(None::<&(&LanguageProfile, f64)>, |best, candidate| match best {
            Some(b) if b.1 >= candidate.1 => Some(b),
            _ => Some(candidate),
        });

    match best {
        Some((profile, score)) if total > 0.0 && *score > 0.0 => LanguageInfo {
            code: profile.code.to_string(),
            name: profile.name.to_string(),
            confidence: score / total,
        },
        _ => LanguageInfo::unknown(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_unknown() {
        assert_eq!(detect_language("hola"), LanguageInfo::unknown());
        assert_eq!(detect_language(""), LanguageInfo::unknown());
    }

    #[test]
    fn test_english() {
        let info = detect_language("The committee said that the report was published in the journal.");
        assert_eq!(info.code, "en");
        assert!(info.is_english());
        assert!(info.confidence > 0.8);
    }

    #[test]
    fn test_spanish_confident() {
        let info = detect_language(
            "El gobierno anunció hoy nuevas medidas para combatir la inflación en todo el país, \
             pero los expertos dicen que no son suficientes.",
        );
        assert_eq!(info.code, "es");
        assert_eq!(info.name, "Spanish");
        assert!(info.confidence > 0.8);
    }

    #[test]
    fn test_french_and_german() {
        assert_eq!(
            detect_language("Le président a déclaré que les mesures sont nécessaires pour le pays.").code,
            "fr"
        );
        assert_eq!(
            detect_language("Die Regierung hat gesagt, dass die Maßnahmen nicht ausreichen und für alle gelten.").code,
            "de"
        );
    }

    #[test]
    fn test_place_names_do_not_outvote_english() {
        for headline in [
            "Los Angeles wildfire forces evacuations",
            "Las Vegas casino reports record quarterly revenue",
            "Del Monte recalls canned peaches nationwide after contamination fears",
        ] {
            let info = detect_language(headline);
            assert!(info.is_english() || info.confidence <= 0.8, "{}: {:?}", headline, info);
        }
    }

    #[test]
    fn test_repeated_function_words_count() {
        let once = profile_score(&PROFILES[0], "the cat", &["the", "cat"]);
        let twice = profile_score(&PROFILES[0], "the the", &["the", "the"]);
        assert!(twice > once);
    }

    #[test]
    fn test_no_signal_is_unknown() {
        assert_eq!(detect_language("xyzzy qwrtp zzkkv").code, "un");
    }
}
