// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Credibility analysis pipeline
//!
//! Orchestrates:
//! - Input and language checks
//! - Classifier inference on normalized text
//! - Feature extraction, scoring and rationale at the requested depth
//! - Optional LIME/SHAP model explanations
//!
//! Every failure ends up in the result's `error` field; `analyze` never fails.

use crate::classifier::{Classifier, TfIdfClassifier};
use crate::config::AnalysisConfig;
use crate::corpus::Label;
use crate::error::Error;
use crate::explain::{ExplanationMethod, Explainer, ModelExplanations};
use crate::features::{
    detect_clickbait, detect_language, detect_warning_signs, extract_core, extract_entities,
    analyze_word_usage, ClickbaitDetail, EntityInfo, LanguageInfo, PropagandaAnalysis,
    ReadabilityMetrics, TextFeatures, UniquenessMetrics, WarningSigns, WordUsage, WritingStyle,
};
use crate::rationale::{self, CredibilityLevel};
use crate::scoring::CredibilityScorer;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

/// How much analysis to run beyond the prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisDepth {
    /// Prediction and confidence only
    #[default]
    Basic,
    /// Weighted-penalty score, linguistic features and rationale
    Detailed,
    /// Indicator score, warning signs and word usage on top of the detailed features
    Comprehensive,
}

impl AnalysisDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisDepth::Basic => "basic",
            AnalysisDepth::Detailed => "detailed",
            AnalysisDepth::Comprehensive => "comprehensive",
        }
    }
}

impl fmt::Display for AnalysisDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisDepth {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(AnalysisDepth::Basic),
            "detailed" => Ok(AnalysisDepth::Detailed),
            "comprehensive" => Ok(AnalysisDepth::Comprehensive),
            other => Err(format!(
                "unknown analysis depth '{}' (expected basic, detailed or comprehensive)",
                other
            )),
        }
    }
}

/// What to compute for one text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisRequest {
    pub depth: AnalysisDepth,
    /// Attach LIME/SHAP explanations
    pub explain: bool,
    pub method: ExplanationMethod,
    /// Tokens per explanation; the configured default when absent
    pub num_features: Option<usize>,
}

impl AnalysisRequest {
    pub fn new(depth: AnalysisDepth) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    pub fn with_explanations(mut self, method: ExplanationMethod, num_features: Option<usize>) -> Self {
        self.explain = true;
        self.method = method;
        self.num_features = num_features;
        self
    }
}

/// Reported prediction, including the sentinels used when analysis stops early
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "FAKE")]
    Fake,
    #[serde(rename = "REAL")]
    Real,
    Unknown,
    #[serde(rename = "Unsupported Language")]
    UnsupportedLanguage,
    Error,
}

impl Verdict {
    /// Sentinel reported when analysis stops on `error`
    pub fn sentinel(error: &Error) -> Self {
        match error {
            Error::InvalidInput(_) | Error::ModelUnavailable(_) => Verdict::Unknown,
            Error::UnsupportedLanguage { .. } => Verdict::UnsupportedLanguage,
            _ => Verdict::Error,
        }
    }

    pub fn label(&self) -> Option<Label> {
        match self {
            Verdict::Fake => Some(Label::Fake),
            Verdict::Real => Some(Label::Real),
            _ => None,
        }
    }
}

impl From<Label> for Verdict {
    fn from(label: Label) -> Self {
        match label {
            Label::Fake => Verdict::Fake,
            Label::Real => Verdict::Real,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::Fake => "FAKE",
            Verdict::Real => "REAL",
            Verdict::Unknown => "Unknown",
            Verdict::UnsupportedLanguage => "Unsupported Language",
            Verdict::Error => "Error",
        };
        f.write_str(s)
    }
}

/// Extractor outputs reported for detailed and comprehensive analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    pub text_features: TextFeatures,
    pub writing_style: WritingStyle,
    pub readability: ReadabilityMetrics,
    pub propaganda: PropagandaAnalysis,
    pub uniqueness: UniquenessMetrics,
    pub entities: EntityInfo,
    pub credibility_level: CredibilityLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning_signs: Option<WarningSigns>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clickbait: Option<ClickbaitDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_usage: Option<WordUsage>,
    /// Classifier input after normalization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_text: Option<String>,
}

/// Result of analyzing one text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub prediction: Verdict,
    /// Probability of the predicted label; 0 for sentinels
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credibility_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_analysis: Option<DetailedAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_explanations: Option<ModelExplanations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<LanguageInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AnalysisResult {
    fn new(prediction: Verdict, confidence: f64) -> Self {
        Self {
            prediction,
            confidence,
            credibility_score: None,
            explanation: None,
            detailed_analysis: None,
            model_explanations: None,
            language: None,
            error: None,
            timestamp: Utc::now(),
        }
    }

    fn failed(error: &Error) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::new(Verdict::sentinel(error), 0.0)
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Classifier handle plus explainer and configuration
///
/// The classifier is shared read-only; one detector can serve concurrent analyses.
#[derive(Clone)]
pub struct Detector {
    classifier: Option<Arc<dyn Classifier>>,
    explainer: Option<Explainer>,
    scorer: CredibilityScorer,
    config: AnalysisConfig,
}

impl fmt::Debug for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Detector")
            .field("classifier", &self.classifier.as_ref().map(|c| c.name().to_string()))
            .field("explainer_available", &self.explainer_available())
            .field("config", &self.config)
            .finish()
    }
}

impl Detector {
    pub fn new(classifier: Arc<dyn Classifier>, config: AnalysisConfig) -> Self {
        tracing::info!("Detector ready with {} classifier", classifier.name());
        Self {
            classifier: Some(classifier),
            explainer: config.explainers_enabled.then(|| Explainer::new(&config)),
            scorer: CredibilityScorer::new(config.base_scale),
            config,
        }
    }

    /// A detector without a model; every analysis returns the `Unknown` sentinel
    pub fn unloaded(config: AnalysisConfig) -> Self {
        Self {
            classifier: None,
            explainer: None,
            scorer: CredibilityScorer::new(config.base_scale),
            config,
        }
    }

    /// Load a JSON TF-IDF model, degrading to an unloaded detector on failure
    pub fn load(path: &Path, config: AnalysisConfig) -> Self {
        match TfIdfClassifier::load(path) {
            Ok(model) => {
                tracing::info!(
                    "Loaded model from {} ({} terms)",
                    path.display(),
                    model.vocabulary_size()
                );
                Self::new(Arc::new(model), config)
            }
            Err(e) => {
                tracing::error!("Error loading model from {}: {}", path.display(), e);
                Self::unloaded(config)
            }
        }
    }

    pub fn without_explainer(mut self) -> Self {
        self.explainer = None;
        self
    }

    pub fn is_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn explainer_available(&self) -> bool {
        self.classifier.is_some() && self.explainer.is_some()
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Prediction and confidence only
    pub fn predict(&self, text: &str) -> AnalysisResult {
        self.analyze(text, &AnalysisRequest::default())
    }

    pub fn analyze(&self, text: &str, request: &AnalysisRequest) -> AnalysisResult {
        if text.trim().is_empty() {
            return AnalysisResult::failed(&Error::InvalidInput("text is empty".into()));
        }
        let Some(classifier) = self.classifier.as_deref() else {
            return AnalysisResult::failed(&Error::ModelUnavailable("no classifier loaded".into()));
        };

        let language = detect_language(text);
        if !language.is_english() && language.confidence > self.config.language_confidence_threshold {
            tracing::warn!(
                "Skipping analysis of {} text (confidence {:.2})",
                language.name,
                language.confidence
            );
            let error = Error::UnsupportedLanguage {
                code: language.code.clone(),
                name: language.name.clone(),
            };
            return AnalysisResult {
                language: Some(language),
                ..AnalysisResult::failed(&error)
            };
        }

        let processed = classifier.prepare(text);
        let prediction = classifier.predict(&processed);
        tracing::debug!(
            label = %prediction.label,
            confidence = prediction.confidence,
            depth = %request.depth,
            "classified text"
        );

        let mut result = AnalysisResult::new(prediction.label.into(), prediction.confidence);
        result.language = Some(language);
        if request.depth != AnalysisDepth::Basic {
            let core = extract_core(text);
            let entities = extract_entities(text);
            let mut detailed = DetailedAnalysis {
                credibility_level: CredibilityLevel::from_prediction(Some(prediction.label)),
                text_features: core.features,
                writing_style: core.style,
                readability: core.readability,
                propaganda: core.propaganda,
                uniqueness: core.uniqueness,
                entities,
                warning_signs: None,
                clickbait: None,
                word_usage: None,
                processed_text: None,
            };

            if request.depth == AnalysisDepth::Detailed {
                result.credibility_score = Some(self.scorer.score(
                    prediction.p_fake,
                    &detailed.text_features,
                    &detailed.writing_style,
                    &detailed.readability,
                    &detailed.uniqueness,
                    &detailed.propaganda,
                ));
                result.explanation = Some(rationale::explain(
                    Some(prediction.label),
                    prediction.confidence,
                    &detailed.text_features,
                    &detailed.writing_style,
                    &detailed.propaganda,
                    &detailed.readability,
                ));
            } else {
                let warnings = detect_warning_signs(text);
                result.credibility_score = Some(self.scorer.indicator_score(
                    prediction.p_fake,
                    &detailed.text_features,
                    &detailed.writing_style,
                    &warnings,
                ));
                result.explanation = Some(rationale::explain_indicators(
                    prediction.label,
                    prediction.confidence,
                    &detailed.text_features,
                    &detailed.writing_style,
                    &warnings,
                ));
                detailed.warning_signs = Some(warnings);
                detailed.clickbait = Some(detect_clickbait(text));
                detailed.word_usage = Some(analyze_word_usage(text));
                detailed.processed_text = Some(processed);
            }
            result.detailed_analysis = Some(detailed);
        }

        if request.explain {
            result.model_explanations = Some(match &self.explainer {
                Some(explainer) => explainer.explain(classifier, text, request.method, request.num_features),
                None => {
                    tracing::warn!("Explanation requested but no explainer is available");
                    ModelExplanations::unavailable(
                        request.method,
                        &Error::ExplainerUnavailable("model explanations are disabled".into()),
                    )
                }
            });
        }

        result
    }

    /// Analyze independent texts in parallel, preserving input order
    pub fn analyze_batch<S: AsRef<str> + Sync>(&self, texts: &[S], request: &AnalysisRequest) -> Vec<AnalysisResult> {
        tracing::info!("Analyzing batch of {} texts", texts.len());
        texts
            .par_iter()
            .map(|t| self.analyze(t.as_ref(), request))
            .collect()
    }
}
