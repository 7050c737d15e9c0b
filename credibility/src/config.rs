// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Runtime configuration for analysis, scoring and explanation

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the classifier's fake-probability is turned into a base credibility score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BaseScale {
    /// `(1 - p_fake) * 100` on both sides of the decision boundary
    #[default]
    Continuous,
    /// `(1 - p_fake) * 100` when `p_fake <= 0.5`, otherwise `(1 - p_fake) * 200`
    Legacy,
}

/// Configuration for a [`crate::pipeline::Detector`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Non-English input above this detection confidence skips analysis
    pub language_confidence_threshold: f64,
    /// Number of tokens reported by explanations when the caller gives none
    pub default_num_features: usize,
    /// Perturbed samples drawn by LIME
    pub lime_num_samples: usize,
    /// Exponential kernel width for LIME sample weighting
    pub lime_kernel_width: f64,
    /// Coalition budget for Kernel SHAP
    pub shap_num_samples: usize,
    /// Seed for every random perturbation
    pub seed: u64,
    /// Base score formula
    pub base_scale: BaseScale,
    /// Whether model explanations may be produced at all
    pub explainers_enabled: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            language_confidence_threshold: 0.8,
            default_num_features: 10,
            lime_num_samples: 3000,
            lime_kernel_width: 25.0,
            shap_num_samples: 100,
            seed: 42,
            base_scale: BaseScale::Continuous,
            explainers_enabled: true,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file; missing keys take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        tracing::debug!("Loaded analysis config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"base_scale": "legacy", "lime_num_samples": 200}"#).unwrap();
        assert_eq!(config.base_scale, BaseScale::Legacy);
        assert_eq!(config.lime_num_samples, 200);
        assert_eq!(config.shap_num_samples, 100);
        assert!((config.language_confidence_threshold - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"seed": 7, "explainers_enabled": false}"#).unwrap();

        let config = AnalysisConfig::from_file(&path).unwrap();
        assert_eq!(config.seed, 7);
        assert!(!config.explainers_enabled);
        assert_eq!(config.default_num_features, 10);
    }
}
