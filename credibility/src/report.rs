// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! JSON analysis reports

use crate::error::Result;
use crate::pipeline::AnalysisResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// An analyzed text together with its result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub original_text: String,
    pub prediction: AnalysisResult,
    pub timestamp: DateTime<Utc>,
}

impl Report {
    pub fn new(text: &str, result: &AnalysisResult) -> Self {
        Self {
            original_text: text.to_string(),
            prediction: result.clone(),
            timestamp: Utc::now(),
        }
    }

    /// Default file name, `report_<YYYYmmdd_HHMMSS>.json`
    pub fn file_name(&self) -> String {
        format!("report_{}.json", self.timestamp.format("%Y%m%d_%H%M%S"))
    }
}

/// Write a report into `dir` and return its path
pub fn save_report(dir: &Path, text: &str, result: &AnalysisResult, name: Option<&str>) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let report = Report::new(text, result);
    let path = dir.join(name.map_or_else(|| report.file_name(), str::to_string));
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&path, json)?;
    tracing::info!("Report saved to {}", path.display());
    Ok(path)
}

/// Read a report written by [`save_report`]
pub fn load_report(path: &Path) -> Result<Report> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::pipeline::{Detector, Verdict};

    #[test]
    fn test_save_report_default_name() {
        let dir = tempfile::tempdir().unwrap();
        let result = Detector::unloaded(AnalysisConfig::default()).predict("some text here");
        let path = save_report(dir.path(), "some text here", &result, None).unwrap();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("report_") && name.ends_with(".json"));
        assert_eq!(name.len(), "report_20240101_120000.json".len());

        let report = load_report(&path).unwrap();
        assert_eq!(report.original_text, "some text here");
        assert_eq!(report.prediction.prediction, Verdict::Unknown);
    }

    #[test]
    fn test_save_report_named_in_new_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("reports");
        let result = Detector::unloaded(AnalysisConfig::default()).predict("");
        let path = save_report(&nested, "", &result, Some("mine.json")).unwrap();
        assert_eq!(path, nested.join("mine.json"));

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["prediction"]["prediction"], "Unknown");
        assert!(json["timestamp"].is_string());
    }
}
