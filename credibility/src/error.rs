// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Error types for the credibility analysis library

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library
///
/// Analysis entry points on [`crate::pipeline::Detector`] never hand these back to the caller;
/// they are rendered into the `error` field of the result instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Empty or unusable input text
    #[error("Invalid input text: {0}")]
    InvalidInput(String),

    /// No classifier could be loaded
    #[error("Model not available: {0}")]
    ModelUnavailable(String),

    /// Input detected as a language the model was not trained on
    #[error("Non-English text detected ({name}). Current model only supports English.")]
    UnsupportedLanguage { code: String, name: String },

    /// Explainers are disabled or the classifier cannot be explained
    #[error("Explainer not available: {0}")]
    ExplainerUnavailable(String),

    /// Runtime failure inside LIME or SHAP
    #[error("Failed to generate explanation: {0}")]
    ExplanationFailure(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let lang = Error::UnsupportedLanguage {
            code: "es".into(),
            name: "Spanish".into(),
        };
        assert_eq!(
            lang.to_string(),
            "Non-English text detected (Spanish). Current model only supports English."
        );
        assert_eq!(
            Error::ExplanationFailure("singular".into()).to_string(),
            "Failed to generate explanation: singular"
        );
        let io: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(io, Error::Io(_)));
    }
}
