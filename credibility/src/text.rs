// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Text normalization and tokenization primitives
//!
//! Provides:
//! - Word and sentence tokenization shared by every extractor
//! - A configurable [`Normalizer`] producing classifier-ready token streams
//! - Negation scoping (`not good` -> `not not_good`)
//! - Whole-word phrase matching, n-gram counting and token-set similarity

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use unicode_segmentation::UnicodeSegmentation;

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+|www\.\S+").unwrap());
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+").unwrap());
static HTML_TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*?>").unwrap());
static DIGIT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());
static SENTENCE_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

/// Words that open a negation scope
pub const NEGATION_TRIGGERS: &[&str] = &["not", "no", "never", "none", "neither", "nor", "nothing"];

/// Number of tokens rewritten after a negation trigger
pub const NEGATION_SCOPE: usize = 3;

const SCOPE_END: &[&str] = &[".", ",", ":", ";", "!", "?"];

/// Terms that survive stopword removal no matter what
pub const DEFAULT_KEEP_WORDS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "nowhere", "fake", "hoax", "lie",
    "conspiracy", "truth", "false", "real", "allegedly", "reportedly", "supposedly", "claim",
    "source",
];

const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

// Words ending in "s" that are not plural nouns.
const LEMMA_SKIP: &[&str] = &[
    "always", "perhaps", "was", "has", "is", "this", "its", "his", "hers", "ours", "yours",
    "theirs", "does", "less", "unless", "across", "towards", "afterwards", "sometimes", "news",
    "series", "species", "politics", "economics", "physics", "mathematics", "ethics", "thanks",
    "lens", "yes", "us", "whereas", "besides", "alas",
];

const LEMMA_IRREGULAR: &[(&str, &str)] = &[
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("data", "datum"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
];

/// Independent toggles for [`Normalizer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    pub lowercase: bool,
    /// Replace URLs with the `url` placeholder
    pub strip_urls: bool,
    /// Replace e-mail addresses with the `email` placeholder
    pub strip_emails: bool,
    pub strip_html: bool,
    /// Replace digit runs with the `number` placeholder
    pub replace_numbers: bool,
    pub lemmatize: bool,
    /// Rewrite tokens following a negation trigger as `not_<token>`
    pub negation_scope: bool,
    pub remove_stopwords: bool,
    pub strip_punctuation: bool,
}

impl NormalizeOptions {
    /// Everything on: the form the classifier is trained and queried with
    pub fn model_input() -> Self {
        Self {
            lowercase: true,
            strip_urls: true,
            strip_emails: true,
            strip_html: true,
            replace_numbers: true,
            lemmatize: true,
            negation_scope: true,
            remove_stopwords: true,
            strip_punctuation: true,
        }
    }

    /// Lowercased content words without markup or punctuation
    pub fn lexical() -> Self {
        Self {
            lowercase: true,
            strip_urls: true,
            strip_emails: false,
            strip_html: true,
            replace_numbers: false,
            lemmatize: false,
            negation_scope: false,
            remove_stopwords: true,
            strip_punctuation: true,
        }
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self::model_input()
    }
}

/// Text normalizer with its own stopword set
#[derive(Debug, Clone)]
pub struct Normalizer {
    options: NormalizeOptions,
    stopwords: HashSet<String>,
}

impl Normalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        let keep: HashSet<&str> = DEFAULT_KEEP_WORDS.iter().copied().collect();
        let stopwords = ENGLISH_STOPWORDS
            .iter()
            .filter(|w| !keep.contains(*w))
            .map(|w| w.to_string())
            .collect();
        Self { options, stopwords }
    }

    /// Exempt additional words from stopword removal
    pub fn with_keep_words(mut self, words: &[&str]) -> Self {
        for word in words {
            self.stopwords.remove(&word.to_lowercase());
        }
        self
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Normalize into a token sequence; empty input yields no tokens
    pub fn tokens(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let opts = &self.options;

        let mut text = if opts.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        if opts.strip_urls {
            text = URL_PATTERN.replace_all(&text, " url ").into_owned();
        }
        if opts.strip_emails {
            text = EMAIL_PATTERN.replace_all(&text, " email ").into_owned();
        }
        if opts.strip_html {
            text = HTML_TAG_PATTERN.replace_all(&text, " ").into_owned();
        }
        if opts.replace_numbers {
            text = DIGIT_PATTERN.replace_all(&text, " number ").into_owned();
        }

        let mut tokens: Vec<String> = raw_tokens(&text).into_iter().map(str::to_string).collect();

        if opts.lemmatize {
            tokens = tokens.into_iter().map(|t| lemmatize(&t)).collect();
        }
        if opts.negation_scope {
            tokens = apply_negation_scope(tokens);
        }
        if opts.remove_stopwords {
            tokens.retain(|t| !self.stopwords.contains(t.as_str()));
        }
        if opts.strip_punctuation {
            tokens.retain(|t| !is_punctuation(t));
        }
        tokens
    }

    /// Normalize into a single space-joined string
    pub fn normalize(&self, text: &str) -> String {
        self.tokens(text).join(" ")
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizeOptions::default())
    }
}

/// Normalize `text` with the given options and the default stopword set
pub fn normalize(text: &str, options: NormalizeOptions) -> Vec<String> {
    Normalizer::new(options).tokens(text)
}

/// Rewrite up to [`NEGATION_SCOPE`] tokens after each trigger as `not_<token>`.
///
/// Scope-ending punctuation closes the scope and is kept as-is.
pub fn apply_negation_scope(tokens: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut remaining = 0usize;

    for token in tokens {
        if NEGATION_TRIGGERS.contains(&token.as_str()) {
            remaining = NEGATION_SCOPE;
            out.push(token);
        } else if SCOPE_END.contains(&token.as_str()) {
            remaining = 0;
            out.push(token);
        } else if remaining > 0 {
            remaining -= 1;
            out.push(format!("not_{}", token));
        } else {
            out.push(token);
        }
    }
    out
}

/// Rule-based noun lemmatizer (plural folding)
pub fn lemmatize(token: &str) -> String {
    if let Some((_, lemma)) = LEMMA_IRREGULAR.iter().find(|(form, _)| *form == token) {
        return lemma.to_string();
    }
    if token.chars().count() <= 3
        || !token.chars().all(|c| c.is_alphabetic())
        || LEMMA_SKIP.contains(&token)
    {
        return token.to_string();
    }

    if let Some(stem) = token.strip_suffix("ies") {
        if stem.len() > 1 {
            return format!("{}y", stem);
        }
    }
    for suffix in ["sses", "ches", "shes", "xes", "zzes"] {
        if token.ends_with(suffix) {
            return token[..token.len() - 2].to_string();
        }
    }
    if token.ends_with('s') && !token.ends_with("ss") && !token.ends_with("us") && !token.ends_with("is") {
        return token[..token.len() - 1].to_string();
    }
    token.to_string()
}

/// Non-whitespace segments at Unicode word boundaries (words and punctuation marks)
pub fn raw_tokens(text: &str) -> Vec<&str> {
    text.split_word_bounds()
        .filter(|s| !s.trim().is_empty())
        .collect()
}

/// Word tokens (letters/digits, apostrophes kept inside words)
pub fn words(text: &str) -> Vec<&str> {
    text.unicode_words().collect()
}

/// Sentences split on runs of terminal punctuation, empty pieces dropped
pub fn sentences(text: &str) -> Vec<&str> {
    SENTENCE_SPLIT
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Token made only of punctuation/symbols
pub fn is_punctuation(token: &str) -> bool {
    !token.is_empty() && !token.chars().any(|c| c.is_alphanumeric())
}

/// ALL-CAPS test: at least one cased letter and no lowercase letters
pub fn is_all_caps(token: &str) -> bool {
    token.chars().any(|c| c.is_uppercase()) && !token.chars().any(|c| c.is_lowercase())
}

/// Case-insensitive whole-word matcher over a fixed phrase list
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    phrases: Vec<(String, Regex)>,
}

impl PhraseMatcher {
    pub fn new(phrases: &[&str]) -> Self {
        let phrases = phrases
            .iter()
            .map(|p| {
                let lower = p.to_lowercase();
                let re = Regex::new(&word_bounded(&lower)).expect("escaped phrase is a valid regex");
                (lower, re)
            })
            .collect();
        Self { phrases }
    }

    /// Total occurrences of every phrase in `text`
    pub fn count(&self, text: &str) -> usize {
        let lower = text.to_lowercase();
        self.phrases.iter().map(|(_, re)| re.find_iter(&lower).count()).sum()
    }

    /// Phrases occurring at least once, in list order
    pub fn matches(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        self.phrases
            .iter()
            .filter(|(_, re)| re.is_match(&lower))
            .map(|(p, _)| p.clone())
            .collect()
    }
}

/// Escape `phrase` and anchor it on word boundaries where it starts/ends with a word character
pub fn word_bounded(phrase: &str) -> String {
    let escaped = regex::escape(phrase);
    let starts_word = phrase.chars().next().map_or(false, is_word_char);
    let ends_word = phrase.chars().last().map_or(false, is_word_char);
    format!(
        "{}{}{}",
        if starts_word { r"\b" } else { "" },
        escaped,
        if ends_word { r"\b" } else { "" }
    )
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Count phrases appearing as lowercase substrings (one hit per phrase)
pub fn substring_hits(text: &str, phrases: &[&str]) -> Vec<String> {
    let lower = text.to_lowercase();
    phrases
        .iter()
        .filter(|p| lower.contains(&p.to_lowercase()))
        .map(|p| p.to_string())
        .collect()
}

/// N-gram frequencies over lowercased word tokens, joined with spaces
pub fn ngram_frequencies(text: &str, n: usize) -> BTreeMap<String, usize> {
    let mut freq = BTreeMap::new();
    if n == 0 {
        return freq;
    }
    let lower = text.to_lowercase();
    let tokens = words(&lower);
    for window in tokens.windows(n) {
        *freq.entry(window.join(" ")).or_insert(0) += 1;
    }
    freq
}

/// Jaccard similarity of the normalized token sets of two texts
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let normalizer = Normalizer::new(NormalizeOptions::lexical());
    let set_a: BTreeSet<String> = normalizer.tokens(a).into_iter().filter(|t| t.len() >= 2).collect();
    let set_b: BTreeSet<String> = normalizer.tokens(b).into_iter().filter(|t| t.len() >= 2).collect();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    set_a.intersection(&set_b).count() as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_nothing() {
        let normalizer = Normalizer::default();
        assert!(normalizer.tokens("").is_empty());
        assert!(normalizer.tokens("   \n\t").is_empty());
        assert_eq!(normalizer.normalize(""), "");
    }

    #[test]
    fn test_placeholders() {
        let normalizer = Normalizer::new(NormalizeOptions {
            remove_stopwords: false,
            lemmatize: false,
            negation_scope: false,
            ..NormalizeOptions::model_input()
        });
        let tokens = normalizer.tokens("Visit https://example.com or mail me@example.com <b>now</b> 2024");
        assert!(tokens.contains(&"url".to_string()));
        assert!(tokens.contains(&"email".to_string()));
        assert!(tokens.contains(&"number".to_string()));
        assert!(!tokens.iter().any(|t| t.contains('<')));
        assert!(!tokens.iter().any(|t| t.contains("example")));
    }

    #[test]
    fn test_negation_scope() {
        let tokens: Vec<String> = ["this", "is", "not", "a", "good", "idea", "at", "all"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let scoped = apply_negation_scope(tokens);
        assert_eq!(
            scoped,
            vec!["this", "is", "not", "not_a", "not_good", "not_idea", "at", "all"]
        );
    }

    #[test]
    fn test_negation_scope_ends_at_punctuation() {
        let tokens: Vec<String> = ["never", "true", ",", "really"].iter().map(|s| s.to_string()).collect();
        assert_eq!(apply_negation_scope(tokens), vec!["never", "not_true", ",", "really"]);
    }

    #[test]
    fn test_keep_words_survive_stopword_removal() {
        let normalizer = Normalizer::new(NormalizeOptions {
            negation_scope: false,
            ..NormalizeOptions::model_input()
        });
        let tokens = normalizer.tokens("This is not the truth");
        assert_eq!(tokens, vec!["not", "truth"]);
    }

    #[test]
    fn test_custom_keep_words() {
        let normalizer = Normalizer::new(NormalizeOptions::lexical()).with_keep_words(&["against"]);
        assert!(normalizer.tokens("they are against it").contains(&"against".to_string()));
    }

    #[test]
    fn test_lemmatize() {
        assert_eq!(lemmatize("stories"), "story");
        assert_eq!(lemmatize("doctors"), "doctor");
        assert_eq!(lemmatize("churches"), "church");
        assert_eq!(lemmatize("news"), "news");
        assert_eq!(lemmatize("virus"), "virus");
        assert_eq!(lemmatize("children"), "child");
        assert_eq!(lemmatize("gas"), "gas");
    }

    #[test]
    fn test_model_input_pipeline() {
        let normalizer = Normalizer::default();
        let out = normalizer.normalize("Doctors do NOT want you to know the secrets!");
        assert_eq!(out, "doctor not not_want not_you not_to know secret");
    }

    #[test]
    fn test_tokenization_helpers() {
        assert_eq!(words("Cats like warm, sunny windows."), vec!["Cats", "like", "warm", "sunny", "windows"]);
        assert_eq!(sentences("One. Two!! Three?"), vec!["One", "Two", "Three"]);
        assert!(sentences("...").is_empty());
        assert!(is_all_caps("BREAKING!!!"));
        assert!(!is_all_caps("Breaking"));
        assert!(!is_all_caps("!!!"));
        assert!(is_punctuation("!!"));
        assert!(!is_punctuation("a!"));
    }

    #[test]
    fn test_phrase_matcher_whole_words() {
        let matcher = PhraseMatcher::new(&["fear", "doctors recommend"]);
        assert_eq!(matcher.count("Fear and fearless FEAR"), 2);
        assert_eq!(matcher.matches("Most doctors recommend it"), vec!["doctors recommend"]);
    }

    #[test]
    fn test_ngrams_and_similarity() {
        let grams = ngram_frequencies("the cat saw the cat", 2);
        assert_eq!(grams.get("the cat"), Some(&2));
        assert_eq!(grams.get("cat saw"), Some(&1));
        assert!(ngram_frequencies("one", 2).is_empty());

        assert!((jaccard_similarity("Solar panels work", "solar panels work") - 1.0).abs() < 1e-12);
        assert_eq!(jaccard_similarity("", ""), 0.0);
        let partial = jaccard_similarity("solar panels work well", "wind turbines work well");
        assert!(partial > 0.0 && partial < 1.0);
    }
}
