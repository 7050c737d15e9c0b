// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! End-to-end behaviour through the public API

use approx::assert_relative_eq;
use credibility::features::{
    analyze_readability, analyze_style, analyze_uniqueness, detect_propaganda, detect_warning_signs,
    extract_core, extract_entities, extract_features,
};
use credibility::rationale;
use credibility::{
    AnalysisConfig, AnalysisDepth, AnalysisRequest, CredibilityScorer, Detector, ExplanationMethod,
    KeywordClassifier, Label, LabeledText, Normalizer, TfIdfClassifier, Verdict,
};
use std::sync::Arc;

const SENSATIONAL: &str = "BREAKING!!! Scientists find SHOCKING link, doctors don't want you to know!";
const SOBER: &str = "A study published in a peer-reviewed journal found a 2% increase in efficiency.";
const SPANISH: &str = "El gobierno anunció hoy nuevas medidas para combatir la inflación en todo el país, \
                       pero los expertos dicen que no son suficientes.";

fn keyword_detector() -> Detector {
    let config = AnalysisConfig {
        lime_num_samples: 200,
        ..AnalysisConfig::default()
    };
    Detector::new(Arc::new(KeywordClassifier::new()), config)
}

fn tfidf_detector() -> Detector {
    let normalizer = Normalizer::default();
    let samples: Vec<LabeledText> = credibility::corpus::seed_corpus()
        .into_iter()
        .map(|s| LabeledText::new(normalizer.normalize(&s.text), s.label))
        .collect();
    let model = TfIdfClassifier::fit(&samples).unwrap();
    let config = AnalysisConfig {
        lime_num_samples: 300,
        ..AnalysisConfig::default()
    };
    Detector::new(Arc::new(model), config)
}

#[test]
fn test_sensational_headline_signals() {
    let features = extract_features(SENSATIONAL);
    assert!(features.clickbait_score >= 1);

    let warnings = detect_warning_signs(SENSATIONAL);
    assert!(warnings.excessive_capitalization);

    let propaganda = detect_propaganda(SENSATIONAL);
    let fear = propaganda.techniques["fear"];
    let loaded = propaganda.techniques["loaded_language"];
    assert!(fear + loaded >= 1);
}

#[test]
fn test_sober_sentence_scores_higher_at_equal_confidence() {
    let sober = extract_core(SOBER);
    assert_eq!(sober.features.clickbait_score, 0);
    assert!(sober.propaganda.propaganda_score < 10.0);

    let sensational = extract_core(SENSATIONAL);
    let scorer = CredibilityScorer::default();
    let score = |core: &credibility::features::CoreFeatures| {
        scorer.score(
            0.5,
            &core.features,
            &core.style,
            &core.readability,
            &core.uniqueness,
            &core.propaganda,
        )
    };
    assert!(score(&sober) > score(&sensational));
}

#[test]
fn test_short_input_readability_is_finite() {
    let metrics = analyze_readability("Cats like warm sunny windows.");
    let values = [
        metrics.flesch_reading_ease,
        metrics.flesch_kincaid_grade,
        metrics.gunning_fog,
        metrics.smog_index,
        metrics.coleman_liau_index,
        metrics.automated_readability_index,
        metrics.average_grade_level,
    ];
    for value in values {
        assert!(value.is_finite());
        assert!(value >= 0.0);
    }
    assert!(metrics.flesch_reading_ease <= 100.0);
}

#[test]
fn test_spanish_text_is_rejected() {
    let result = keyword_detector().analyze(SPANISH, &AnalysisRequest::new(AnalysisDepth::Comprehensive));
    assert_eq!(result.prediction, Verdict::UnsupportedLanguage);
    assert_eq!(result.confidence, 0.0);
    assert!(result.error.as_deref().unwrap().contains("Spanish"));
    assert!(result.detailed_analysis.is_none());
    assert!(result.credibility_score.is_none());
    assert_eq!(result.language.unwrap().code, "es");
}

#[test]
fn test_place_names_stay_english() {
    let detector = keyword_detector();
    for headline in [
        "Los Angeles wildfire forces evacuations",
        "Las Vegas casino reports record quarterly revenue",
        "Del Monte recalls canned peaches nationwide after contamination fears",
    ] {
        let result = detector.analyze(headline, &AnalysisRequest::new(AnalysisDepth::Detailed));
        assert_ne!(result.prediction, Verdict::UnsupportedLanguage, "{}", headline);
        assert!(result.error.is_none());
        assert!(result.detailed_analysis.is_some());
        assert!(result.language.is_some());
    }

    let spanish = detector.analyze(SPANISH, &AnalysisRequest::new(AnalysisDepth::Detailed));
    assert_eq!(spanish.prediction, Verdict::UnsupportedLanguage);
}

#[test]
fn test_both_explanations_unavailable() {
    let request = AnalysisRequest::new(AnalysisDepth::Detailed).with_explanations(ExplanationMethod::Both, None);
    let detector = keyword_detector().without_explainer();
    assert!(!detector.explainer_available());

    let result = detector.analyze(SENSATIONAL, &request);
    assert!(result.error.is_none());
    assert!(result.credibility_score.is_some());

    let json = serde_json::to_value(&result).unwrap();
    assert!(json["model_explanations"]["lime"]["error"].is_string());
    assert!(json["model_explanations"]["shap"]["error"].is_string());
}

#[test]
fn test_explainers_disabled_by_config() {
    let config = AnalysisConfig {
        explainers_enabled: false,
        ..AnalysisConfig::default()
    };
    let detector = Detector::new(Arc::new(KeywordClassifier::new()), config);
    let request = AnalysisRequest::new(AnalysisDepth::Basic).with_explanations(ExplanationMethod::Lime, None);
    let explanations = detector.analyze(SENSATIONAL, &request).model_explanations.unwrap();
    assert!(explanations.lime.unwrap().error_message().unwrap().contains("Explainer not available"));
    assert!(explanations.shap.is_none());
}

#[test]
fn test_extractors_stay_in_range() {
    let inputs = ["", "   ", "!!!", SENSATIONAL, SOBER, SPANISH, "word", "ALL CAPS ONLY HERE"];
    for text in inputs {
        let core = extract_core(text);
        assert!((0.0..=1.0).contains(&core.features.capitalized_ratio), "{:?}", text);
        assert!((-1.0..=1.0).contains(&core.features.polarity));
        assert!((0.0..=1.0).contains(&core.features.subjectivity));
        assert!((0.0..=100.0).contains(&core.readability.flesch_reading_ease));
        assert!((0.0..=100.0).contains(&core.propaganda.propaganda_score));
        assert!((0.0..=1.0).contains(&core.uniqueness.lexical_diversity));
        assert_eq!(core.propaganda.techniques.len(), 8);
        assert_eq!(extract_entities(text).entities.len(), 5);

        let scorer = CredibilityScorer::default();
        for p_fake in [0.0, 0.3, 0.5, 0.51, 1.0] {
            let score = scorer.score(
                p_fake,
                &core.features,
                &core.style,
                &core.readability,
                &core.uniqueness,
                &core.propaganda,
            );
            assert!((0.0..=100.0).contains(&score));
        }
    }
}

#[test]
fn test_extractors_are_idempotent() {
    for text in [SENSATIONAL, SOBER, ""] {
        assert_eq!(extract_features(text), extract_features(text));
        assert_eq!(analyze_style(text), analyze_style(text));
        assert_eq!(analyze_uniqueness(text), analyze_uniqueness(text));
        assert_eq!(extract_entities(text), extract_entities(text));
    }
}

#[test]
fn test_rationale_is_deterministic() {
    let core = extract_core(SENSATIONAL);
    let render = || {
        rationale::explain(
            Some(Label::Fake),
            0.92,
            &core.features,
            &core.style,
            &core.propaganda,
            &core.readability,
        )
    };
    let first = render();
    assert_eq!(first, render());
    assert!(first.starts_with("This text appears to be fake news (confidence: 0.92)."));
}

#[test]
fn test_tfidf_detector_end_to_end() {
    let detector = tfidf_detector();
    let request = AnalysisRequest::new(AnalysisDepth::Detailed).with_explanations(ExplanationMethod::Both, Some(4));
    let result = detector.analyze(
        "Shocking secret cure exposed! Doctors are hiding this miracle, share before it is deleted!",
        &request,
    );
    assert_eq!(result.prediction, Verdict::Fake);
    assert!(result.confidence > 0.5);

    let explanations = result.model_explanations.unwrap();
    let shap = explanations.shap.unwrap();
    let shap = shap.value().unwrap();
    assert!(shap.features.len() <= 4);
    assert!(shap.base_value.is_some());
    let lime = explanations.lime.unwrap();
    assert!(lime.value().unwrap().score.is_some());
    assert!(explanations.highlighted_text.unwrap().starts_with("<div"));
}

#[test]
fn test_legacy_scale_is_harsher_for_fake_side() {
    let core = extract_core(SOBER);
    let continuous = CredibilityScorer::new(credibility::BaseScale::Continuous);
    let legacy = CredibilityScorer::new(credibility::BaseScale::Legacy);
    assert_relative_eq!(continuous.base_score(0.3), legacy.base_score(0.3));
    assert_relative_eq!(legacy.base_score(0.6), 80.0, epsilon = 1e-9);
    assert_relative_eq!(continuous.base_score(0.6), 40.0, epsilon = 1e-9);

    let warnings = detect_warning_signs(SOBER);
    let score = continuous.indicator_score(0.2, &core.features, &core.style, &warnings);
    assert!((0.0..=100.0).contains(&score));
}

#[test]
fn test_batch_analysis() {
    let texts = [SENSATIONAL, SOBER, "", SPANISH];
    let results = keyword_detector().analyze_batch(&texts, &AnalysisRequest::new(AnalysisDepth::Detailed));
    let verdicts: Vec<Verdict> = results.iter().map(|r| r.prediction).collect();
    assert_eq!(
        verdicts,
        vec![Verdict::Fake, Verdict::Real, Verdict::Unknown, Verdict::UnsupportedLanguage]
    );
}
