// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! SHAP attributions over a classifier's vector feature space
//!
//! - Additive classifiers report exact attributions directly.
//! - Opaque classifiers go through Kernel SHAP restricted to the features present in
//!   the input, with absent features drawn from a background vector.

use super::linalg::weighted_least_squares;
use crate::classifier::{Classifier, ModelFamily};
use crate::error::{Error, Result};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::index::sample;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Largest feature count for which every coalition may be enumerated
const MAX_ENUMERATED_FEATURES: usize = 20;

#[derive(Debug, Clone)]
pub struct ShapExplainer {
    /// Coalition budget for Kernel SHAP
    pub num_samples: usize,
    pub seed: u64,
}

/// Attributions toward one class
#[derive(Debug, Clone)]
pub struct ShapResult {
    pub class_index: usize,
    /// Probability of the explained class for the input
    pub probability: f64,
    /// Probability of the explained class for the background
    pub base_value: f64,
    /// `(feature, value)` for non-zero attributions, sorted by absolute value
    pub values: Vec<(String, f64)>,
}

fn binomial(n: usize, k: usize) -> f64 {
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// Shapley kernel weight of a coalition of size `s` out of `m`
fn shapley_kernel(m: usize, s: usize) -> f64 {
    (m - 1) as f64 / (binomial(m, s) * s as f64 * (m - s) as f64)
}

impl ShapExplainer {
    pub fn new(num_samples: usize, seed: u64) -> Self {
        Self { num_samples, seed }
    }

    /// Attribute the prediction for an already-normalized text.
    ///
    /// The classifier must expose a feature space.
    pub fn explain(
        &self,
        classifier: &dyn Classifier,
        normalized: &str,
        background: Option<&[f64]>,
        num_features: usize,
    ) -> Result<ShapResult> {
        let names = classifier
            .feature_names()
            .ok_or_else(|| Error::ExplainerUnavailable(format!("{} has no feature space", classifier.name())))?;
        let x = classifier
            .vectorize(normalized)
            .ok_or_else(|| Error::ExplanationFailure("vectorization failed".into()))?;
        let background = match background {
            Some(b) if b.len() == x.len() => b.to_vec(),
            Some(b) => {
                return Err(Error::ExplanationFailure(format!(
                    "background has {} features, expected {}",
                    b.len(),
                    x.len()
                )))
            }
            None => classifier.vectorize("").unwrap_or_else(|| vec![0.0; x.len()]),
        };

        let proba = |v: &[f64]| -> Result<Vec<f64>> {
            classifier
                .predict_proba_vector(v)
                .ok_or_else(|| Error::ExplanationFailure("classifier rejected feature vector".into()))
        };
        let input_probs = proba(&x)?;
        let class_index = input_probs
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let probability = input_probs[class_index];
        let base_value = proba(&background)?[class_index];

        let attributions: Vec<(usize, f64)> = match classifier.family() {
            ModelFamily::Additive => {
                let phi = classifier
                    .attribute(&x, class_index)
                    .ok_or_else(|| Error::ExplanationFailure("additive attribution unavailable".into()))?;
                phi.into_iter().enumerate().collect()
            }
            ModelFamily::Opaque => {
                let present: Vec<usize> = (0..x.len()).filter(|&i| x[i] != 0.0).collect();
                let f = |z: &[bool]| -> Result<f64> {
                    let mut v = background.clone();
                    for (&i, &on) in present.iter().zip(z) {
                        if on {
                            v[i] = x[i];
                        }
                    }
                    Ok(proba(&v)?[class_index])
                };
                let phi = self.kernel_shap(present.len(), probability, base_value, f)?;
                present.into_iter().zip(phi).collect()
            }
        };

        let mut values: Vec<(String, f64)> = attributions
            .into_iter()
            .filter(|(i, v)| *v != 0.0 && x[*i] != 0.0)
            .map(|(i, v)| (names[i].clone(), v))
            .collect();
        values.sort_by(|a, b| b.1.abs().partial_cmp(&a.1.abs()).unwrap_or(std::cmp::Ordering::Equal));
        values.truncate(num_features);

        Ok(ShapResult {
            class_index,
            probability,
            base_value,
            values,
        })
    }

    /// Kernel SHAP with the efficiency constraint `sum(phi) = fx - f0` enforced exactly
    fn kernel_shap<F>(&self, m: usize, fx: f64, f0: f64, f: F) -> Result<Vec<f64>>
    where
        F: Fn(&[bool]) -> Result<f64>,
    {
        match m {
            0 => return Ok(Vec::new()),
            1 => return Ok(vec![fx - f0]),
            _ => {}
        }

        let budget = self.num_samples.max(2 * m + 2);
        let coalitions = self.coalitions(m, budget)?;

        let delta = fx - f0;
        let mut rows = Vec::with_capacity(coalitions.len());
        let mut targets = Vec::with_capacity(coalitions.len());
        let mut weights = Vec::with_capacity(coalitions.len());
        for (z, weight) in &coalitions {
            let last = if z[m - 1] { 1.0 } else { 0.0 };
            let value = f(z)?;
            rows.push(
                z[..m - 1]
                    .iter()
                    .map(|&on| if on { 1.0 } else { 0.0 } - last)
                    .collect::<Vec<f64>>(),
            );
            targets.push(value - f0 - last * delta);
            weights.push(*weight);
        }

        let mut phi = weighted_least_squares(&rows, &targets, &weights, 0.0)
            .ok_or_else(|| Error::ExplanationFailure("singular coalition system".into()))?;
        let rest: f64 = phi.iter().sum();
        phi.push(delta - rest);
        Ok(phi)
    }

    fn coalitions(&self, m: usize, budget: usize) -> Result<Vec<(Vec<bool>, f64)>> {
        if m <= MAX_ENUMERATED_FEATURES && (1usize << m) - 2 <= budget {
            return Ok((1..(1usize << m) - 1)
                .map(|mask| {
                    let z: Vec<bool> = (0..m).map(|i| mask & (1 << i) != 0).collect();
                    let s = z.iter().filter(|b| **b).count();
                    (z, shapley_kernel(m, s))
                })
                .collect());
        }

        let size_weights: Vec<f64> = (1..m).map(|s| (m - 1) as f64 / (s * (m - s)) as f64).collect();
        let sizes = WeightedIndex::new(&size_weights)
            .map_err(|e| Error::ExplanationFailure(format!("coalition sampling: {}", e)))?;
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);

        Ok((0..budget)
            .map(|_| {
                let s = sizes.sample(&mut rng) + 1;
                let mut z = vec![false; m];
                for i in sample(&mut rng, m, s) {
                    z[i] = true;
                }
                (z, 1.0)
            })
            .collect())
    }
}
