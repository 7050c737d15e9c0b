// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! LIME for text
//!
//! The distinct words of the input are the interpretable features. Each sample masks a
//! random subset of them (every occurrence of a masked word is dropped), the classifier
//! scores the perturbed texts, and a weighted ridge surrogate is fit around the original.

use super::linalg::{weighted_r2, weighted_ridge};
use crate::error::{Error, Result};
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use unicode_segmentation::UnicodeSegmentation;

/// Regularization of the feature-selection fit
const SELECTION_ALPHA: f64 = 0.01;
/// Regularization of the final surrogate
const SURROGATE_ALPHA: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct LimeExplainer {
    pub num_samples: usize,
    pub kernel_width: f64,
    pub seed: u64,
}

/// Local surrogate for one class
#[derive(Debug, Clone)]
pub struct LimeResult {
    /// Column of the explained class in the probability output
    pub class_index: usize,
    /// Probability of the explained class for the unmasked text
    pub probability: f64,
    /// `(word, weight)` sorted by absolute weight
    pub weights: Vec<(String, f64)>,
    /// Weighted R^2 of the surrogate
    pub score: f64,
    pub intercept: f64,
}

impl LimeExplainer {
    pub fn new(num_samples: usize, kernel_width: f64, seed: u64) -> Self {
        Self {
            num_samples,
            kernel_width,
            seed,
        }
    }

    fn kernel(&self, distance: f64) -> f64 {
        (-(distance * distance) / (self.kernel_width * self.kernel_width)).exp().sqrt()
    }

    /// Explain the class the classifier assigns to the unmasked `text`.
    ///
    /// `predict` maps raw texts to class probabilities.
    pub fn explain<F>(&self, text: &str, num_features: usize, predict: F) -> Result<LimeResult>
    where
        F: Fn(&[String]) -> Vec<Vec<f64>>,
    {
        let segments: Vec<&str> = text.split_word_bounds().collect();
        let mut vocab: Vec<&str> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        let segment_feature: Vec<Option<usize>> = segments
            .iter()
            .map(|&seg| {
                if !seg.chars().any(char::is_alphanumeric) {
                    return None;
                }
                Some(*index.entry(seg).or_insert_with(|| {
                    vocab.push(seg);
                    vocab.len() - 1
                }))
            })
            .collect();

        let d = vocab.len();
        if d == 0 {
            return Err(Error::ExplanationFailure("text has no words to perturb".into()));
        }

        let n = self.num_samples.max(2);
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut data = vec![vec![1.0; d]; n];
        for row in data.iter_mut().skip(1) {
            let k = rng.gen_range(1..=d);
            for i in sample(&mut rng, d, k) {
                row[i] = 0.0;
            }
        }

        let texts: Vec<String> = data
            .iter()
            .map(|row| {
                segments
                    .iter()
                    .zip(&segment_feature)
                    .filter(|(_, f)| f.map_or(true, |i| row[i] > 0.0))
                    .map(|(s, _)| *s)
                    .collect()
            })
            .collect();

        let probs = predict(&texts);
        if probs.len() != n || probs[0].is_empty() {
            return Err(Error::ExplanationFailure(format!(
                "classifier returned {} rows for {} samples",
                probs.len(),
                n
            )));
        }

        let class_index = probs[0]
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let y: Vec<f64> = probs
            .iter()
            .map(|p| p.get(class_index).copied().unwrap_or(0.0))
            .collect();

        let sample_weights: Vec<f64> = data
            .iter()
            .map(|row| {
                let active: f64 = row.iter().sum();
                let cosine = if active > 0.0 { (active / d as f64).sqrt() } else { 0.0 };
                self.kernel((1.0 - cosine) * 100.0)
            })
            .collect();

        let selected: Vec<usize> = if d <= num_features {
            (0..d).collect()
        } else {
            let full = weighted_ridge(&data, &y, &sample_weights, SELECTION_ALPHA)
                .ok_or_else(|| Error::ExplanationFailure("feature selection fit failed".into()))?;
            let mut order: Vec<usize> = (0..d).collect();
            order.sort_by(|&a, &b| {
                full.coef[b]
                    .abs()
                    .partial_cmp(&full.coef[a].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            order.truncate(num_features);
            order
        };

        let reduced: Vec<Vec<f64>> = data
            .iter()
            .map(|row| selected.iter().map(|&i| row[i]).collect())
            .collect();
        let fit = weighted_ridge(&reduced, &y, &sample_weights, SURROGATE_ALPHA)
            .ok_or_else(|| Error::ExplanationFailure("surrogate fit failed".into()))?;
        let score = weighted_r2(&fit, &reduced, &y, &sample_weights);

        let mut weights: Vec<(String, f64)> = selected
            .iter()
            .zip(&fit.coef)
            .map(|(&i, &c)| (vocab[i].to_string(), c))
            .collect();
        weights.sort_by(|a, b| b.1.abs().partial_cmp(&a.1.abs()).unwrap_or(std::cmp::Ordering::Equal));
        weights.truncate(num_features);

        tracing::debug!(samples = n, features = d, score, "LIME surrogate fitted");

        Ok(LimeResult {
            class_index,
            probability: y[0],
            weights,
            score,
            intercept: fit.intercept,
        })
    }
}
