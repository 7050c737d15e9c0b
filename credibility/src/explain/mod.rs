// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Model explanations
//!
//! Provides:
//! - Token-level explanation structures for a classifier decision
//! - LIME (perturbation) and SHAP (attribution) explainers
//! - Highlighted renderings of the attributed tokens
//! - Structured `{error}` outcomes when an explanation cannot be produced

pub mod highlight;
pub mod lime;
pub mod linalg;
pub mod shap;

pub use highlight::{highlight, HighlightMode};
pub use lime::{LimeExplainer, LimeResult};
pub use shap::{ShapExplainer, ShapResult};

use crate::classifier::Classifier;
use crate::config::AnalysisConfig;
use crate::corpus::Label;
use crate::error::{Error, Result};
use crate::text::Normalizer;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sample budget used by LIME when SHAP has no feature space to work with
const FALLBACK_LIME_SAMPLES: usize = 100;

/// Which explainer(s) to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExplanationMethod {
    Lime,
    Shap,
    #[default]
    Both,
}

impl ExplanationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExplanationMethod::Lime => "lime",
            ExplanationMethod::Shap => "shap",
            ExplanationMethod::Both => "both",
        }
    }

    pub fn includes_lime(&self) -> bool {
        matches!(self, ExplanationMethod::Lime | ExplanationMethod::Both)
    }

    pub fn includes_shap(&self) -> bool {
        matches!(self, ExplanationMethod::Shap | ExplanationMethod::Both)
    }
}

impl fmt::Display for ExplanationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExplanationMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lime" => Ok(ExplanationMethod::Lime),
            "shap" => Ok(ExplanationMethod::Shap),
            "both" => Ok(ExplanationMethod::Both),
            other => Err(format!("unknown explanation method '{}' (expected lime, shap or both)", other)),
        }
    }
}

/// Direction of a token's contribution to the predicted class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Positive,
    Negative,
}

/// A single attributed token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
    pub sign: Sign,
}

/// Ranked token attributions for one prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelExplanation {
    /// Explainer that produced the attributions
    pub method: ExplanationMethod,
    /// Class the attributions point towards
    pub prediction: Label,
    /// Probability of that class
    pub probability: f64,
    /// Tokens sorted by absolute importance
    pub features: Vec<FeatureImportance>,
    pub positive_words: Vec<String>,
    pub negative_words: Vec<String>,
    /// Local surrogate fit (LIME only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intercept: Option<f64>,
    /// Expected model output on the background (SHAP only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl ModelExplanation {
    /// Get the top N tokens by absolute importance
    pub fn top_features(&self, n: usize) -> Vec<&FeatureImportance> {
        self.features.iter().take(n).collect()
    }

    /// Render the attributed tokens inside `text` with ANSI colors
    pub fn console(&self, text: &str) -> String {
        highlight(text, &self.positive_words, &self.negative_words, HighlightMode::Console)
    }
}

/// Builder for constructing explanations
pub struct ExplanationBuilder {
    explanation: ModelExplanation,
}

impl ExplanationBuilder {
    pub fn new(method: ExplanationMethod, prediction: Label, probability: f64) -> Self {
        Self {
            explanation: ModelExplanation {
                method,
                prediction,
                probability,
                features: Vec::new(),
                positive_words: Vec::new(),
                negative_words: Vec::new(),
                score: None,
                intercept: None,
                base_value: None,
                html: None,
            },
        }
    }

    /// Add `(token, weight)` pairs, already sorted by absolute weight.
    /// Zero weights stay in `features` but are never highlighted.
    pub fn with_weights(mut self, weights: &[(String, f64)]) -> Self {
        for (token, weight) in weights {
            let sign = if *weight >= 0.0 { Sign::Positive } else { Sign::Negative };
            if *weight > 0.0 {
                self.explanation.positive_words.push(token.clone());
            } else if *weight < 0.0 {
                self.explanation.negative_words.push(token.clone());
            }
            self.explanation.features.push(FeatureImportance {
                feature: token.clone(),
                importance: *weight,
                sign,
            });
        }
        self
    }

    pub fn with_fit(mut self, score: f64, intercept: f64) -> Self {
        self.explanation.score = Some(score);
        self.explanation.intercept = Some(intercept);
        self
    }

    pub fn with_base_value(mut self, base_value: f64) -> Self {
        self.explanation.base_value = Some(base_value);
        self
    }

    /// Attach the HTML highlighting of `text`
    pub fn with_html(mut self, text: &str) -> Self {
        self.explanation.html = Some(highlight(
            text,
            &self.explanation.positive_words,
            &self.explanation.negative_words,
            HighlightMode::Html,
        ));
        self
    }

    pub fn build(self) -> ModelExplanation {
        self.explanation
    }
}

/// Either a value or a structured `{"error": "..."}` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome<T> {
    Ok(T),
    Err { error: String },
}

impl<T> Outcome<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Outcome::Err { error: message.into() }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Ok(v) => Some(v),
            Outcome::Err { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::Err { error } => Some(error),
        }
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(v) => Outcome::Ok(v),
            Err(e) => Outcome::Err { error: e.to_string() },
        }
    }
}

/// Explanations requested for one text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelExplanations {
    pub method: ExplanationMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lime: Option<Outcome<ModelExplanation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shap: Option<Outcome<ModelExplanation>>,
    /// HTML highlighting from LIME, else from SHAP
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlighted_text: Option<String>,
}

impl ModelExplanations {
    /// Every requested method reports `error`
    pub fn unavailable(method: ExplanationMethod, error: &Error) -> Self {
        let message = error.to_string();
        Self {
            method,
            lime: method.includes_lime().then(|| Outcome::error(message.clone())),
            shap: method.includes_shap().then(|| Outcome::error(message.clone())),
            highlighted_text: None,
        }
    }
}

/// LIME and SHAP explainers around a classifier
#[derive(Debug, Clone)]
pub struct Explainer {
    lime: LimeExplainer,
    shap: ShapExplainer,
    fallback_lime: LimeExplainer,
    default_num_features: usize,
}

impl Explainer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            lime: LimeExplainer::new(config.lime_num_samples, config.lime_kernel_width, config.seed),
            shap: ShapExplainer::new(config.shap_num_samples, config.seed),
            fallback_lime: LimeExplainer::new(FALLBACK_LIME_SAMPLES, config.lime_kernel_width, config.seed),
            default_num_features: config.default_num_features,
        }
    }

    fn run_lime(
        lime: &LimeExplainer,
        classifier: &dyn Classifier,
        text: &str,
        num_features: usize,
    ) -> Result<ModelExplanation> {
        let normalizer = classifier.normalization().map(Normalizer::new);
        let predict = |texts: &[String]| -> Vec<Vec<f64>> {
            let prepared: Vec<String> = texts
                .par_iter()
                .map(|t| match &normalizer {
                    Some(n) => n.normalize(t),
                    None => t.clone(),
                })
                .collect();
            let refs: Vec<&str> = prepared.iter().map(String::as_str).collect();
            classifier.predict_proba(&refs)
        };

        let result = lime.explain(text, num_features, predict)?;
        let prediction = class_label(classifier, result.class_index)?;
        Ok(ExplanationBuilder::new(ExplanationMethod::Lime, prediction, result.probability)
            .with_weights(&result.weights)
            .with_fit(result.score, result.intercept)
            .with_html(text)
            .build())
    }

    /// Explain with LIME over the words of the raw text
    pub fn explain_with_lime(
        &self,
        classifier: &dyn Classifier,
        text: &str,
        num_features: Option<usize>,
    ) -> Result<ModelExplanation> {
        let k = num_features.unwrap_or(self.default_num_features);
        tracing::info!("Generating LIME explanation ({} features)", k);
        Self::run_lime(&self.lime, classifier, text, k)
    }

    /// Explain with SHAP over the classifier's feature space.
    ///
    /// Classifiers without a feature space get a small LIME explanation instead.
    pub fn explain_with_shap(
        &self,
        classifier: &dyn Classifier,
        text: &str,
        num_features: Option<usize>,
    ) -> Result<ModelExplanation> {
        let k = num_features.unwrap_or(self.default_num_features);
        if classifier.feature_names().is_none() {
            tracing::warn!(
                "{} exposes no feature space, falling back to LIME for SHAP request",
                classifier.name()
            );
            return Self::run_lime(&self.fallback_lime, classifier, text, k);
        }

        tracing::info!("Generating SHAP explanation ({} features)", k);
        let prepared = classifier.prepare(text);
        let result = self.shap.explain(classifier, &prepared, None, k)?;
        let prediction = class_label(classifier, result.class_index)?;
        Ok(ExplanationBuilder::new(ExplanationMethod::Shap, prediction, result.probability)
            .with_weights(&result.values)
            .with_base_value(result.base_value)
            .with_html(text)
            .build())
    }

    /// Run the requested explainers; failures become `{error}` outcomes
    pub fn explain(
        &self,
        classifier: &dyn Classifier,
        text: &str,
        method: ExplanationMethod,
        num_features: Option<usize>,
    ) -> ModelExplanations {
        let capture = |name: &str, result: Result<ModelExplanation>| {
            if let Err(ref e) = result {
                tracing::error!("{} explanation failed: {}", name, e);
            }
            Outcome::from(result)
        };

        let lime = method
            .includes_lime()
            .then(|| capture("LIME", self.explain_with_lime(classifier, text, num_features)));
        let shap = method
            .includes_shap()
            .then(|| capture("SHAP", self.explain_with_shap(classifier, text, num_features)));

        let highlighted_text = [&lime, &shap]
            .into_iter()
            .flatten()
            .find_map(|o| o.value().and_then(|e| e.html.clone()));

        ModelExplanations {
            method,
            lime,
            shap,
            highlighted_text,
        }
    }
}

fn class_label(classifier: &dyn Classifier, index: usize) -> Result<Label> {
    classifier
        .classes()
        .get(index)
        .copied()
        .ok_or_else(|| Error::ExplanationFailure(format!("class index {} out of range", index)))
}
