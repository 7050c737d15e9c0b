// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Labeled news text for fitting the reference classifier
//!
//! Supported sources:
//! - a generic CSV with `text` and `label` columns (`title` is prepended when present)
//! - the two-file layout with `Fake.csv` and `True.csv` side by side
//! - a small built-in seed corpus

use crate::error::{Error, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::path::Path;

/// Binary news label, serialized as `"FAKE"` / `"REAL"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Fake,
    Real,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Fake => "FAKE",
            Label::Real => "REAL",
        }
    }

    /// Parse common spellings of the two labels
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "fake" | "false" | "unreliable" | "pants-fire" => Some(Label::Fake),
            "real" | "true" | "reliable" => Some(Label::Real),
            _ => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single labeled text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledText {
    pub text: String,
    pub label: Label,
}

impl LabeledText {
    pub fn new(text: impl Into<String>, label: Label) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// Load a CSV with `text` and `label` columns; rows with an unknown label or no text are skipped
pub fn load_csv(path: &Path) -> Result<Vec<LabeledText>> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(file);

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
    let text_col = column("text")
        .ok_or_else(|| Error::InvalidInput(format!("{} has no 'text' column", path.display())))?;
    let label_col = column("label")
        .ok_or_else(|| Error::InvalidInput(format!("{} has no 'label' column", path.display())))?;
    let title_col = column("title");

    let mut samples = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let Some(label) = record.get(label_col).and_then(Label::parse) else {
            tracing::warn!("Skipping row {} in {}: unrecognized label", idx, path.display());
            continue;
        };
        let text = combine(title_col.and_then(|c| record.get(c)), record.get(text_col));
        if text.is_empty() {
            continue;
        }
        samples.push(LabeledText { text, label });
    }

    tracing::info!("Loaded {} labeled texts from {}", samples.len(), path.display());
    Ok(samples)
}

/// Load `Fake.csv` and `True.csv` from `dir`, labeling each file's rows wholesale
pub fn load_fake_true_dir(dir: &Path) -> Result<Vec<LabeledText>> {
    let mut samples = load_unlabeled(&dir.join("Fake.csv"), Label::Fake)?;
    let fake = samples.len();
    samples.extend(load_unlabeled(&dir.join("True.csv"), Label::Real)?);
    tracing::info!(
        "Loaded {} articles ({} fake, {} real) from {}",
        samples.len(),
        fake,
        samples.len() - fake,
        dir.display()
    );
    Ok(samples)
}

fn load_unlabeled(path: &Path, label: Label) -> Result<Vec<LabeledText>> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(file);

    let headers = reader.headers()?.clone();
    let title_col = headers.iter().position(|h| h.trim().eq_ignore_ascii_case("title"));
    let text_col = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("text"))
        .unwrap_or(if title_col == Some(0) { 1 } else { 0 });

    let mut samples = Vec::new();
    for record in reader.records() {
        let record = record?;
        let text = combine(title_col.and_then(|c| record.get(c)), record.get(text_col));
        if !text.is_empty() {
            samples.push(LabeledText { text, label });
        }
    }
    Ok(samples)
}

fn combine(title: Option<&str>, body: Option<&str>) -> String {
    let title = title.unwrap_or("").trim();
    let body = body.unwrap_or("").trim();
    match (title.is_empty(), body.is_empty()) {
        (true, _) => body.to_string(),
        (false, true) => title.to_string(),
        (false, false) => format!("{} {}", title, body),
    }
}

/// Small built-in corpus used when no data is supplied
pub fn seed_corpus() -> Vec<LabeledText> {
    let fake = [
        "BREAKING: Scientist discovers that vaccines cause autism! Government hiding the truth!",
        "You won't believe what this celebrity did! Shocking revelation changes everything!",
        "SECRET NASA images reveal alien structures on Mars! Cover-up exposed!",
        "CONFIRMED: Politician caught in massive fraud scheme worth billions!",
        "Doctors don't want you to know this one simple trick to cure all diseases!",
        "Miracle cure the elites are hiding from you, share this before it is deleted!",
        "Shocking secret conspiracy exposed: they are lying to everyone about the water!",
        "Anonymous sources reveal the unbelievable truth the media refuses to report!",
    ];
    let real = [
        "New study shows correlation between exercise and improved mental health.",
        "City council approves budget for infrastructure improvements starting next month.",
        "Scientists publish findings on climate change effects in peer-reviewed journal.",
        "Stock market shows modest gains following Federal Reserve announcement.",
        "Local community organizes food drive to support families affected by recent storm.",
        "According to the university report, researchers found a modest decline in emissions.",
        "The ministry spokesperson confirmed the survey results published on Tuesday.",
        "Officials said the bridge repairs are expected to finish later this year, according to the agency.",
    ];

    fake.iter()
        .map(|t| LabeledText::new(*t, Label::Fake))
        .chain(real.iter().map(|t| LabeledText::new(*t, Label::Real)))
        .collect()
}

/// Shuffle deterministically and split off `test_fraction` of the samples
pub fn train_test_split(
    mut samples: Vec<LabeledText>,
    test_fraction: f64,
    seed: u64,
) -> (Vec<LabeledText>, Vec<LabeledText>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    samples.shuffle(&mut rng);
    let n_test = (samples.len() as f64 * test_fraction.clamp(0.0, 1.0)).round() as usize;
    let test = samples.split_off(samples.len() - n_test);
    (samples, test)
}

pub fn label_distribution(samples: &[LabeledText]) -> HashMap<Label, usize> {
    let mut dist = HashMap::new();
    for sample in samples {
        *dist.entry(sample.label).or_insert(0) += 1;
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_label_parsing_and_serde() {
        assert_eq!(Label::parse("FAKE"), Some(Label::Fake));
        assert_eq!(Label::parse(" real "), Some(Label::Real));
        assert_eq!(Label::parse("maybe"), None);
        assert_eq!(serde_json::to_string(&Label::Fake).unwrap(), "\"FAKE\"");
        assert_eq!(Label::Real.to_string(), "REAL");
    }

    #[test]
    fn test_load_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("news.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "title,text,label").unwrap();
        writeln!(file, "Shock,\"Aliens, again\",FAKE").unwrap();
        writeln!(file, ",Budget approved,REAL").unwrap();
        writeln!(file, ",Unclear,satire").unwrap();
        drop(file);

        let samples = load_csv(&path).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0], LabeledText::new("Shock Aliens, again", Label::Fake));
        assert_eq!(samples[1].label, Label::Real);
    }

    #[test]
    fn test_load_csv_requires_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "body,verdict\nfoo,FAKE\n").unwrap();
        assert!(matches!(load_csv(&path), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_fake_true_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Fake.csv"), "title,text,subject,date\nWow,Aliens landed,news,2017\n").unwrap();
        std::fs::write(dir.path().join("True.csv"), "title,text,subject,date\nVote,Senate passed bill,politics,2017\n").unwrap();

        let samples = load_fake_true_dir(dir.path()).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0], LabeledText::new("Wow Aliens landed", Label::Fake));
        assert_eq!(samples[1], LabeledText::new("Vote Senate passed bill", Label::Real));
    }

    #[test]
    fn test_seed_corpus_and_split() {
        let corpus = seed_corpus();
        let dist = label_distribution(&corpus);
        assert_eq!(dist[&Label::Fake], dist[&Label::Real]);

        let (train, test) = train_test_split(corpus.clone(), 0.25, 42);
        assert_eq!(train.len() + test.len(), corpus.len());
        assert_eq!(test.len(), 4);
        let (train_again, _) = train_test_split(corpus, 0.25, 42);
        assert_eq!(train, train_again);
    }
}
