// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Classifier capability interface and reference classifiers
//!
//! Implements:
//! - [`Classifier`]: batch probabilities over ordered classes, plus an optional vector
//!   feature space used by the model explainer
//! - [`TfIdfClassifier`]: TF-IDF weighted naive Bayes, fit from labeled text, JSON-persistable
//! - [`KeywordClassifier`]: hand-crafted indicator keywords through a scaled sigmoid
//!
//! Capabilities are declared by the implementation once; callers never probe for them.

use crate::corpus::{Label, LabeledText};
use crate::error::{Error, Result};
use crate::text::{NormalizeOptions, Normalizer};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// How a classifier's decision decomposes over its features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFamily {
    /// Log-odds are a sum of per-feature terms; attributions are exact
    Additive,
    /// No closed-form decomposition; attributions must be sampled
    Opaque,
}

/// Single-text prediction
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: Label,
    /// Probability of the predicted label
    pub confidence: f64,
    /// Probability of [`Label::Fake`]
    pub p_fake: f64,
}

/// Trait for every classifier the detector can drive
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    /// Output order of [`Classifier::predict_proba`] columns
    fn classes(&self) -> &[Label];

    /// Class probabilities for each text, aligned with [`Classifier::classes`]
    fn predict_proba(&self, texts: &[&str]) -> Vec<Vec<f64>>;

    /// Normalization applied to raw text before prediction; `None` means raw text
    fn normalization(&self) -> Option<NormalizeOptions> {
        Some(NormalizeOptions::model_input())
    }

    /// Raw text in the form [`Classifier::predict_proba`] expects
    fn prepare(&self, text: &str) -> String {
        match self.normalization() {
            Some(options) => Normalizer::new(options).normalize(text),
            None => text.to_string(),
        }
    }

    fn family(&self) -> ModelFamily {
        ModelFamily::Opaque
    }

    /// Names of the vector features, if the classifier exposes a feature space
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Map a (normalized) text into the feature space
    fn vectorize(&self, _text: &str) -> Option<Vec<f64>> {
        None
    }

    /// Class probabilities for a feature vector
    fn predict_proba_vector(&self, _x: &[f64]) -> Option<Vec<f64>> {
        None
    }

    /// Exact per-feature attributions toward `class_index`, for [`ModelFamily::Additive`] models
    fn attribute(&self, _x: &[f64], _class_index: usize) -> Option<Vec<f64>> {
        None
    }

    /// Column of `label` in the probability output
    fn class_index(&self, label: Label) -> Option<usize> {
        self.classes().iter().position(|c| *c == label)
    }

    /// Predict a single (already normalized) text
    fn predict(&self, text: &str) -> Prediction {
        let probs = self.predict_proba(&[text]).into_iter().next().unwrap_or_default();
        let p_fake = self
            .class_index(Label::Fake)
            .and_then(|i| probs.get(i).copied())
            .unwrap_or(0.5);
        let label = if p_fake > 0.5 { Label::Fake } else { Label::Real };
        Prediction {
            label,
            confidence: if label == Label::Fake { p_fake } else { 1.0 - p_fake },
            p_fake,
        }
    }
}

const CLASSES: [Label; 2] = [Label::Fake, Label::Real];

/// Additive smoothing applied to class term counts
const ALPHA: f64 = 1.0;

/// TF-IDF weighted naive Bayes
///
/// Term weights are `tf * idf` with `idf = ln(n_docs / df) + 1`; each class scores
/// `ln prior + sum(weight * ln P(term | class))` over in-vocabulary terms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TfIdfClassifier {
    /// Sorted vocabulary, the feature space
    vocab: Vec<String>,
    /// Smoothed P(term | FAKE), aligned with `vocab`
    fake_likelihood: Vec<f64>,
    /// Smoothed P(term | REAL), aligned with `vocab`
    real_likelihood: Vec<f64>,
    /// Document frequencies, aligned with `vocab`
    df: Vec<usize>,
    n_docs: usize,
    prior_fake: f64,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl TfIdfClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|s| s.chars().count() > 2)
            .map(|s| s.to_string())
            .collect()
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .vocab
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
    }

    /// Fit on already-normalized texts
    pub fn fit(samples: &[LabeledText]) -> Result<Self> {
        let mut fake_counts: HashMap<String, usize> = HashMap::new();
        let mut real_counts: HashMap<String, usize> = HashMap::new();
        let mut df: HashMap<String, usize> = HashMap::new();
        let mut n_fake = 0usize;
        let mut n_real = 0usize;

        for sample in samples {
            let tokens = Self::tokenize(&sample.text);
            let unique: HashSet<&String> = tokens.iter().collect();
            for token in unique {
                *df.entry(token.clone()).or_insert(0) += 1;
            }

            let counts = match sample.label {
                Label::Fake => {
                    n_fake += 1;
                    &mut fake_counts
                }
                Label::Real => {
                    n_real += 1;
                    &mut real_counts
                }
            };
            for token in tokens {
                *counts.entry(token).or_insert(0) += 1;
            }
        }

        if n_fake == 0 || n_real == 0 {
            return Err(Error::InvalidInput(format!(
                "training data needs both labels (got {} fake, {} real)",
                n_fake, n_real
            )));
        }

        let mut vocab: Vec<String> = df.keys().cloned().collect();
        vocab.sort();

        let fake_total: usize = fake_counts.values().sum();
        let real_total: usize = real_counts.values().sum();
        let v = vocab.len() as f64;
        let likelihood = |counts: &HashMap<String, usize>, total: usize, term: &String| {
            (counts.get(term).copied().unwrap_or(0) as f64 + ALPHA) / (total as f64 + ALPHA * v)
        };

        let mut model = Self {
            fake_likelihood: vocab.iter().map(|t| likelihood(&fake_counts, fake_total, t)).collect(),
            real_likelihood: vocab.iter().map(|t| likelihood(&real_counts, real_total, t)).collect(),
            df: vocab.iter().map(|t| df[t]).collect(),
            n_docs: n_fake + n_real,
            prior_fake: n_fake as f64 / (n_fake + n_real) as f64,
            vocab,
            index: HashMap::new(),
        };
        model.rebuild_index();

        tracing::info!(
            "Fitted TF-IDF classifier: {} documents, {} terms, P(FAKE) prior {:.3}",
            model.n_docs,
            model.vocab.len(),
            model.prior_fake
        );
        Ok(model)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocab.len()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let mut model: Self = serde_json::from_str(&raw)?;
        let n = model.vocab.len();
        if model.fake_likelihood.len() != n || model.real_likelihood.len() != n || model.df.len() != n {
            return Err(Error::ModelUnavailable(format!(
                "{} is not a consistent TF-IDF model",
                path.display()
            )));
        }
        if model.n_docs == 0 || !(0.0 < model.prior_fake && model.prior_fake < 1.0) {
            return Err(Error::ModelUnavailable(format!("{} was never fitted", path.display())));
        }
        model.rebuild_index();
        Ok(model)
    }

    fn log_ratio(&self, i: usize) -> f64 {
        self.fake_likelihood[i].ln() - self.real_likelihood[i].ln()
    }

    fn tfidf_vector(&self, text: &str) -> Vec<f64> {
        let tokens = Self::tokenize(text);
        let mut x = vec![0.0; self.vocab.len()];
        if tokens.is_empty() {
            return x;
        }
        let doc_len = tokens.len() as f64;
        for token in &tokens {
            if let Some(&i) = self.index.get(token) {
                x[i] += 1.0 / doc_len;
            }
        }
        for (i, value) in x.iter_mut().enumerate() {
            if *value > 0.0 {
                let idf = (self.n_docs as f64 / self.df[i].max(1) as f64).ln() + 1.0;
                *value *= idf;
            }
        }
        x
    }

    fn probabilities(&self, x: &[f64]) -> Vec<f64> {
        let mut fake_score = self.prior_fake.ln();
        let mut real_score = (1.0 - self.prior_fake).ln();
        for (i, weight) in x.iter().enumerate() {
            if *weight != 0.0 {
                fake_score += weight * self.fake_likelihood[i].ln();
                real_score += weight * self.real_likelihood[i].ln();
            }
        }
        let max = fake_score.max(real_score);
        let fake_exp = (fake_score - max).exp();
        let real_exp = (real_score - max).exp();
        let total = fake_exp + real_exp;
        vec![fake_exp / total, real_exp / total]
    }
}

impl Classifier for TfIdfClassifier {
    fn name(&self) -> &str {
        "TF-IDF"
    }

    fn classes(&self) -> &[Label] {
        &CLASSES
    }

    fn predict_proba(&self, texts: &[&str]) -> Vec<Vec<f64>> {
        texts
            .iter()
            .map(|t| self.probabilities(&self.tfidf_vector(t)))
            .collect()
    }

    fn family(&self) -> ModelFamily {
        ModelFamily::Additive
    }

    fn feature_names(&self) -> Option<&[String]> {
        Some(&self.vocab)
    }

    fn vectorize(&self, text: &str) -> Option<Vec<f64>> {
        Some(self.tfidf_vector(text))
    }

    fn predict_proba_vector(&self, x: &[f64]) -> Option<Vec<f64>> {
        (x.len() == self.vocab.len()).then(|| self.probabilities(x))
    }

    fn attribute(&self, x: &[f64], class_index: usize) -> Option<Vec<f64>> {
        if x.len() != self.vocab.len() || class_index >= CLASSES.len() {
            return None;
        }
        let sign = if CLASSES[class_index] == Label::Fake { 1.0 } else { -1.0 };
        Some(
            x.iter()
                .enumerate()
                .map(|(i, w)| if *w == 0.0 { 0.0 } else { sign * w * self.log_ratio(i) })
                .collect(),
        )
    }
}

/// Keyword-based classifier using hand-crafted indicators
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    /// Fake indicators first, then authentic indicators
    keywords: Vec<String>,
    n_fake_keywords: usize,
    /// Weight per keyword match
    keyword_weight: f64,
}

impl KeywordClassifier {
    pub fn new() -> Self {
        let fake = [
            // sensationalism
            "breaking", "shocking", "unbelievable", "urgent", "exclusive",
            // conspiracy language
            "conspiracy", "coverup", "secret", "hidden", "exposed",
            // manipulative
            "miracle", "cure", "doctors hate", "one weird trick",
            // emotional manipulation
            "outraged", "horrifying", "terrifying",
            // urgency
            "before it's deleted", "share now", "viral",
        ];
        let authentic = [
            // attribution
            "according to", "study shows", "research", "peer-reviewed", "published",
            // sourcing
            "official", "spokesperson", "confirmed", "verified",
            // nuance
            "however", "although", "experts say", "evidence suggests",
            // institutions
            "university", "institute", "journal",
        ];
        Self {
            keywords: fake.iter().chain(authentic.iter()).map(|k| k.to_string()).collect(),
            n_fake_keywords: fake.len(),
            keyword_weight: 0.1,
        }
    }

    fn presence(&self, text: &str) -> Vec<f64> {
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .map(|k| if lower.contains(k.as_str()) { 1.0 } else { 0.0 })
            .collect()
    }

    fn probabilities(&self, x: &[f64]) -> Vec<f64> {
        let fake: f64 = x[..self.n_fake_keywords].iter().sum();
        let authentic: f64 = x[self.n_fake_keywords..].iter().sum();
        let diff = (fake - authentic) * self.keyword_weight;
        let p_fake = 1.0 / (1.0 + (-diff * 5.0).exp());
        vec![p_fake, 1.0 - p_fake]
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for KeywordClassifier {
    fn name(&self) -> &str {
        "Keyword"
    }

    fn classes(&self) -> &[Label] {
        &CLASSES
    }

    fn predict_proba(&self, texts: &[&str]) -> Vec<Vec<f64>> {
        texts.iter().map(|t| self.probabilities(&self.presence(t))).collect()
    }

    fn normalization(&self) -> Option<NormalizeOptions> {
        None
    }

    fn feature_names(&self) -> Option<&[String]> {
        Some(&self.keywords)
    }

    fn vectorize(&self, text: &str) -> Option<Vec<f64>> {
        Some(self.presence(text))
    }

    fn predict_proba_vector(&self, x: &[f64]) -> Option<Vec<f64>> {
        (x.len() == self.keywords.len()).then(|| self.probabilities(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::seed_corpus;
    use crate::text::Normalizer;
    use approx::assert_relative_eq;

    fn fitted() -> TfIdfClassifier {
        let normalizer = Normalizer::default();
        let samples: Vec<LabeledText> = seed_corpus()
            .into_iter()
            .map(|s| LabeledText::new(normalizer.normalize(&s.text), s.label))
            .collect();
        TfIdfClassifier::fit(&samples).unwrap()
    }

    #[test]
    fn test_fit_requires_both_labels() {
        let only_fake = vec![LabeledText::new("shocking secret", Label::Fake)];
        assert!(matches!(TfIdfClassifier::fit(&only_fake), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_tfidf_separates_seed_corpus() {
        let model = fitted();
        assert!(model.vocabulary_size() > 0);
        let normalizer = Normalizer::default();

        let fake = model.predict(&normalizer.normalize("Shocking secret cure they are hiding, share this!"));
        assert_eq!(fake.label, Label::Fake);
        assert!(fake.p_fake > 0.5);

        let real = model.predict(&normalizer.normalize(
            "Researchers published the survey results in a peer-reviewed journal, the spokesperson confirmed.",
        ));
        assert_eq!(real.label, Label::Real);
        assert_relative_eq!(real.confidence, 1.0 - real.p_fake);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let model = fitted();
        for probs in model.predict_proba(&["budget council", "", "zzzz qqqq"]) {
            assert_eq!(probs.len(), 2);
            assert_relative_eq!(probs[0] + probs[1], 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_vector_path_matches_text_path() {
        let model = fitted();
        let text = "secret cure exposed council budget";
        let x = model.vectorize(text).unwrap();
        let via_vector = model.predict_proba_vector(&x).unwrap();
        let via_text = &model.predict_proba(&[text])[0];
        assert_relative_eq!(via_vector[0], via_text[0], epsilon = 1e-12);
        assert!(model.predict_proba_vector(&[1.0]).is_none());
    }

    #[test]
    fn test_attributions_explain_log_odds() {
        let model = fitted();
        let x = model.vectorize("secret cure council budget").unwrap();
        let phi = model.attribute(&x, 0).unwrap();
        let probs = model.predict_proba_vector(&x).unwrap();
        let empty = model.predict_proba_vector(&vec![0.0; x.len()]).unwrap();

        let log_odds = (probs[0] / probs[1]).ln();
        let base = (empty[0] / empty[1]).ln();
        assert_relative_eq!(phi.iter().sum::<f64>(), log_odds - base, epsilon = 1e-9);

        let phi_real = model.attribute(&x, 1).unwrap();
        assert_relative_eq!(phi_real.iter().sum::<f64>(), -(log_odds - base), epsilon = 1e-9);
    }

    #[test]
    fn test_save_and_load() {
        let model = fitted();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        model.save(&path).unwrap();

        let loaded = TfIdfClassifier::load(&path).unwrap();
        let text = "secret cure council";
        assert_eq!(loaded.vocabulary_size(), model.vocabulary_size());
        assert_relative_eq!(
            model.predict_proba(&[text])[0][0],
            loaded.predict_proba(&[text])[0][0],
            epsilon = 1e-9
        );

        std::fs::write(&path, "{}").unwrap();
        assert!(TfIdfClassifier::load(&path).is_err());
    }

    #[test]
    fn test_keyword_classifier() {
        let model = KeywordClassifier::new();
        assert!(model.normalization().is_none());
        assert_eq!(model.family(), ModelFamily::Opaque);

        let fake = model.predict("BREAKING: Shocking new discovery scientists don't want you to know");
        assert_eq!(fake.label, Label::Fake);
        let real = model.predict("According to a peer-reviewed study published in Nature, researchers found evidence");
        assert_eq!(real.label, Label::Real);

        assert_eq!(model.prepare("SHOCKING, see https://x.io"), "SHOCKING, see https://x.io");

        let neutral = model.predict("The cat sat on the mat");
        assert_relative_eq!(neutral.p_fake, 0.5);
        assert_eq!(neutral.label, Label::Real);
    }
}
