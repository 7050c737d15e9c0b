// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! News credibility analysis
//!
//! This crate provides:
//! - Text normalization (URL/HTML stripping, lemmatization, negation scoping, stopwords)
//! - Rule-based linguistic feature extractors (clickbait, propaganda, readability, entities, language)
//! - Credibility scoring and a templated natural-language rationale
//! - A classifier capability interface with TF-IDF and keyword reference classifiers
//! - LIME and SHAP model explanations with highlighted text
//! - A detector that runs all of the above at a chosen analysis depth

pub mod classifier;
pub mod config;
pub mod corpus;
pub mod error;
pub mod explain;
pub mod features;
pub mod pipeline;
pub mod rationale;
pub mod report;
pub mod scoring;
pub mod text;

pub use classifier::{Classifier, KeywordClassifier, ModelFamily, Prediction, TfIdfClassifier};
pub use config::{AnalysisConfig, BaseScale};
pub use corpus::{Label, LabeledText};
pub use error::{Error, Result};
pub use explain::{Explainer, ExplanationMethod, ModelExplanation, ModelExplanations, Outcome};
pub use pipeline::{AnalysisDepth, AnalysisRequest, AnalysisResult, DetailedAnalysis, Detector, Verdict};
pub use rationale::CredibilityLevel;
pub use report::{save_report, Report};
pub use scoring::CredibilityScorer;
pub use text::{NormalizeOptions, Normalizer};
