// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Highlight attributed tokens inside the original text
//!
//! All tokens go into one case-insensitive alternation (longest first) so a single pass
//! never re-matches inside markup it has already inserted, and word boundaries keep
//! `cure` from lighting up inside `secure`.

use crate::text::word_bounded;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const HTML_POSITIVE: &str = r#"<span style="background-color: #c6ecc6; font-weight: bold;">"#;
const HTML_NEGATIVE: &str = r#"<span style="background-color: #ffcccb; font-weight: bold;">"#;
const HTML_WRAPPER_OPEN: &str = r#"<div style="font-family: Arial, sans-serif; line-height: 1.6; padding: 10px;">"#;

const ANSI_POSITIVE: &str = "\x1b[42m";
const ANSI_NEGATIVE: &str = "\x1b[41m";
const ANSI_RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightMode {
    Html,
    Console,
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn display_token(token: &str) -> &str {
    token.strip_prefix("not_").unwrap_or(token)
}

/// Wrap `positive` and `negative` tokens found in `text`.
///
/// A token listed on both sides is treated as positive.
pub fn highlight(text: &str, positive: &[String], negative: &[String], mode: HighlightMode) -> String {
    let positive_set: HashSet<String> = positive
        .iter()
        .map(|t| display_token(t).to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    let negative_set: HashSet<String> = negative
        .iter()
        .map(|t| display_token(t).to_lowercase())
        .filter(|t| !t.is_empty() && !positive_set.contains(t))
        .collect();

    let mut tokens: Vec<&String> = positive_set.iter().chain(negative_set.iter()).collect();
    tokens.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b)));

    let escape = |s: &str| match mode {
        HighlightMode::Html => escape_html(s),
        HighlightMode::Console => s.to_string(),
    };

    let pattern = (!tokens.is_empty())
        .then(|| {
            let alternation: Vec<String> = tokens.iter().map(|t| word_bounded(t)).collect();
            Regex::new(&format!("(?i)(?:{})", alternation.join("|"))).ok()
        })
        .flatten();

    let mut body = String::with_capacity(text.len() * 2);
    let mut last = 0;
    if let Some(re) = pattern {
        for m in re.find_iter(text) {
            body.push_str(&escape(&text[last..m.start()]));
            let matched = m.as_str();
            let is_positive = positive_set.contains(&matched.to_lowercase());
            let (open, close) = match (mode, is_positive) {
                (HighlightMode::Html, true) => (HTML_POSITIVE, "</span>"),
                (HighlightMode::Html, false) => (HTML_NEGATIVE, "</span>"),
                (HighlightMode::Console, true) => (ANSI_POSITIVE, ANSI_RESET),
                (HighlightMode::Console, false) => (ANSI_NEGATIVE, ANSI_RESET),
            };
            body.push_str(open);
            body.push_str(&escape(matched));
            body.push_str(close);
            last = m.end();
        }
    }
    body.push_str(&escape(&text[last..]));

    match mode {
        HighlightMode::Html => format!("{}{}</div>", HTML_WRAPPER_OPEN, body),
        HighlightMode::Console => body,
    }
}
