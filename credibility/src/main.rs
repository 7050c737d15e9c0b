// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! News credibility analysis CLI
//!
//! Usage:
//!   credibility "Text to analyze" --depth detailed
//!   credibility --file article.txt --model models/model.json --explain --method lime
//!   cat article.txt | credibility --depth comprehensive --json

use anyhow::{Context, Result};
use clap::Parser;
use credibility::classifier::KeywordClassifier;
use credibility::config::{AnalysisConfig, BaseScale};
use credibility::explain::{ExplanationMethod, ModelExplanation, Outcome};
use credibility::pipeline::{AnalysisDepth, AnalysisRequest, AnalysisResult, Detector};
use credibility::report::save_report;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "credibility")]
#[command(about = "Assess the credibility of news text")]
#[command(version)]
struct Args {
    /// Text to analyze (reads --file or stdin when absent)
    text: Option<String>,

    /// Read the text from a file
    #[arg(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// JSON model written by train-model (keyword indicators when absent)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// JSON analysis configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Analysis depth (basic, detailed, comprehensive)
    #[arg(short, long, default_value = "detailed")]
    depth: AnalysisDepth,

    /// Attach model explanations
    #[arg(short, long)]
    explain: bool,

    /// Explanation method (lime, shap, both)
    #[arg(long, default_value = "both")]
    method: ExplanationMethod,

    /// Tokens per explanation
    #[arg(short, long)]
    num_features: Option<usize>,

    /// Perturbed samples for LIME
    #[arg(long)]
    lime_samples: Option<usize>,

    /// Use the asymmetric base-score scale
    #[arg(long)]
    legacy_scale: bool,

    /// Save a JSON report into this directory
    #[arg(short, long)]
    report_dir: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn read_input(args: &Args) -> Result<String> {
    if let Some(ref text) = args.text {
        return Ok(text.clone());
    }
    if let Some(ref path) = args.file {
        return std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()));
    }
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
    Ok(buf)
}

fn print_explanation(name: &str, outcome: &Outcome<ModelExplanation>, text: &str) {
    match outcome {
        Outcome::Ok(explanation) => {
            println!(
                "\n{} explanation ({} {:.2}):",
                name, explanation.prediction, explanation.probability
            );
            for feature in &explanation.features {
                println!("  {:<24} {:>+9.4}", feature.feature, feature.importance);
            }
            println!("  {}", explanation.console(text));
        }
        Outcome::Err { error } => println!("\n{} explanation unavailable: {}", name, error),
    }
}

fn print_result(result: &AnalysisResult, text: &str) {
    println!("Prediction: {} (confidence {:.2})", result.prediction, result.confidence);
    if let Some(ref error) = result.error {
        println!("Error: {}", error);
    }
    if let Some(ref language) = result.language {
        println!("Language: {} ({:.2})", language.name, language.confidence);
    }
    if let Some(score) = result.credibility_score {
        println!("Credibility score: {:.1}/100", score);
    }
    if let Some(ref explanation) = result.explanation {
        println!("\n{}", explanation);
    }

    if let Some(ref detailed) = result.detailed_analysis {
        let features = &detailed.text_features;
        println!("\n{:-<50}", "");
        println!("Words: {}, sentences: {}", features.word_count, features.sentence_count);
        println!(
            "Clickbait phrases: {}, exclamations: {}, caps ratio: {:.2}",
            features.clickbait_score, features.exclamation_count, features.capitalized_ratio
        );
        println!(
            "Sentiment: polarity {:.2}, subjectivity {:.2}",
            features.polarity, features.subjectivity
        );
        println!(
            "Reading ease: {:.1}, grade level: {:.1}",
            detailed.readability.flesch_reading_ease, detailed.readability.average_grade_level
        );
        println!("Propaganda score: {:.1}", detailed.propaganda.propaganda_score);
        for (technique, count) in detailed.propaganda.top_techniques(3) {
            if count > 0 {
                println!("  {}: {}", technique, count);
            }
        }
        println!("Lexical diversity: {:.2}", detailed.uniqueness.lexical_diversity);
        if let Some(ref warnings) = detailed.warning_signs {
            println!("Warning flags raised: {}", warnings.flag_count());
        }
        println!("{:-<50}", "");
    }

    if let Some(ref explanations) = result.model_explanations {
        if let Some(ref lime) = explanations.lime {
            print_explanation("LIME", lime, text);
        }
        if let Some(ref shap) = explanations.shap {
            print_explanation("SHAP", shap, text);
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match args.config {
        Some(ref path) => {
            AnalysisConfig::from_file(path).with_context(|| format!("loading config {}", path.display()))?
        }
        None => AnalysisConfig::default(),
    };
    if let Some(n) = args.lime_samples {
        config.lime_num_samples = n;
    }
    if args.legacy_scale {
        config.base_scale = BaseScale::Legacy;
    }

    let detector = match args.model {
        Some(ref path) => Detector::load(path, config),
        None => Detector::new(Arc::new(KeywordClassifier::new()), config),
    };

    let text = read_input(&args)?;
    let request = AnalysisRequest {
        depth: args.depth,
        explain: args.explain,
        method: args.method,
        num_features: args.num_features,
    };
    let result = detector.analyze(&text, &request);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result, &text);
    }

    if let Some(ref dir) = args.report_dir {
        let path = save_report(dir, &text, &result, None)
            .with_context(|| format!("saving report to {}", dir.display()))?;
        if !args.json {
            println!("\nReport saved to: {}", path.display());
        }
    }

    Ok(())
}
