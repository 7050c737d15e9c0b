// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Fit the reference TF-IDF classifier and save it as JSON
//!
//! Usage:
//!   train-model --data news.csv --output models/model.json
//!   train-model --fake-true-dir ./datasets/isot
//!   train-model --seed-corpus

use anyhow::{bail, Context, Result};
use clap::Parser;
use credibility::classifier::{Classifier, TfIdfClassifier};
use credibility::corpus::{self, Label, LabeledText};
use credibility::text::Normalizer;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "train-model")]
#[command(about = "Train the TF-IDF credibility classifier")]
#[command(version)]
struct Args {
    /// CSV file with `text` and `label` columns
    #[arg(short, long, conflicts_with_all = ["fake_true_dir", "seed_corpus"])]
    data: Option<PathBuf>,

    /// Directory holding Fake.csv and True.csv
    #[arg(long, conflicts_with = "seed_corpus")]
    fake_true_dir: Option<PathBuf>,

    /// Train on the small built-in corpus
    #[arg(long)]
    seed_corpus: bool,

    /// Where to write the fitted model
    #[arg(short, long, default_value = "models/credibility_model.json")]
    output: PathBuf,

    /// Share of samples held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    test_fraction: f64,

    /// Random seed for the train/test split
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let raw = if let Some(ref path) = args.data {
        corpus::load_csv(path).with_context(|| format!("loading {}", path.display()))?
    } else if let Some(ref dir) = args.fake_true_dir {
        corpus::load_fake_true_dir(dir).with_context(|| format!("loading {}", dir.display()))?
    } else {
        if !args.seed_corpus {
            tracing::warn!("No training data given, using the built-in seed corpus");
        }
        corpus::seed_corpus()
    };
    if raw.is_empty() {
        bail!("no labeled samples found");
    }
    if !(0.0..1.0).contains(&args.test_fraction) {
        bail!("--test-fraction must be in [0, 1), got {}", args.test_fraction);
    }

    println!("\nLoaded {} samples", raw.len());
    for (label, count) in sorted_distribution(&raw) {
        println!("  {}: {} ({:.1}%)", label, count, count as f64 / raw.len() as f64 * 100.0);
    }

    let normalizer = Normalizer::default();
    let samples: Vec<LabeledText> = raw
        .into_iter()
        .map(|s| LabeledText::new(normalizer.normalize(&s.text), s.label))
        .filter(|s| !s.text.is_empty())
        .collect();

    let (train, test) = corpus::train_test_split(samples, args.test_fraction, args.seed);
    println!("  Train samples: {}", train.len());
    println!("  Test samples: {}", test.len());

    let model = TfIdfClassifier::fit(&train).context("fitting TF-IDF classifier")?;

    println!("\n{}", "=".repeat(50));
    println!("EVALUATION");
    println!("{}", "=".repeat(50));
    if test.is_empty() {
        println!("No held-out samples");
    } else {
        print_evaluation(&model, &test);
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    model
        .save(&args.output)
        .with_context(|| format!("saving model to {}", args.output.display()))?;
    println!("\nModel ({} terms) saved to: {}", model.vocabulary_size(), args.output.display());

    Ok(())
}

fn sorted_distribution(samples: &[LabeledText]) -> Vec<(Label, usize)> {
    let mut dist: Vec<(Label, usize)> = corpus::label_distribution(samples).into_iter().collect();
    dist.sort();
    dist
}

fn print_evaluation(model: &TfIdfClassifier, test: &[LabeledText]) {
    let predicted: Vec<Label> = test.iter().map(|s| model.predict(&s.text).label).collect();
    let correct = predicted.iter().zip(test).filter(|(p, s)| **p == s.label).count();
    println!("Accuracy: {:.4}", correct as f64 / test.len() as f64);

    println!("{:<8} {:>10} {:>10} {:>10}", "Label", "Precision", "Recall", "Support");
    for label in [Label::Fake, Label::Real] {
        let tp = predicted
            .iter()
            .zip(test)
            .filter(|(p, s)| **p == label && s.label == label)
            .count() as f64;
        let predicted_n = predicted.iter().filter(|p| **p == label).count() as f64;
        let support = test.iter().filter(|s| s.label == label).count();
        let precision = if predicted_n > 0.0 { tp / predicted_n } else { 0.0 };
        let recall = if support > 0 { tp / support as f64 } else { 0.0 };
        println!("{:<8} {:>10.4} {:>10.4} {:>10}", label.as_str(), precision, recall, support);
    }
}
