// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Heuristic named-entity counting
//!
//! Only counts per entity type leave this module:
//! - PERSON: capitalized words that do not open a sentence
//! - ORGANIZATION: acronyms of two or more capitals
//! - LOCATION: capitalized words following in/at/near/from
//! - DATE: numeric and month-name dates
//! - MONEY: dollar amounts

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub const ENTITY_TYPES: &[&str] = &["PERSON", "ORGANIZATION", "LOCATION", "DATE", "MONEY"];

const MONTHS: &str = "January|February|March|April|May|June|July|August|September|October|November|December";

static CAPITALIZED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-z]+$").unwrap());
static ACRONYM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z]{2,}\b").unwrap());
static LOCATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:in|at|near|from) ([A-Z][a-z]+)\b").unwrap());
static DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b\d{{1,2}}[/-]\d{{1,2}}[/-]\d{{2,4}}\b|\b\d{{4}}-\d{{2}}-\d{{2}}\b|\b(?:{months})\s+\d{{1,2}}(?:,\s*\d{{4}})?\b",
        months = MONTHS
    ))
    .unwrap()
});
static MONEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\d+(?:[,.]\d+)?|\b\d+ dollars\b").unwrap());

/// Entity counts by coarse type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityInfo {
    pub entities: BTreeMap<String, usize>,
    pub total_entities: usize,
}

impl Default for EntityInfo {
    fn default() -> Self {
        Self {
            entities: ENTITY_TYPES.iter().map(|t| (t.to_string(), 0)).collect(),
            total_entities: 0,
        }
    }
}

impl EntityInfo {
    pub fn count(&self, entity_type: &str) -> usize {
        self.entities.get(entity_type).copied().unwrap_or(0)
    }
}

fn count_people(text: &str, locations: &HashSet<&str>) -> usize {
    let months: HashSet<&str> = MONTHS.split('|').collect();
    let mut sentence_start = true;
    let mut count = 0;

    for raw in text.split_whitespace() {
        let word = raw.trim_matches(|c: char| !c.is_alphanumeric());
        if !sentence_start
            && CAPITALIZED.is_match(word)
            && !months.contains(word)
            && !locations.contains(word)
        {
            count += 1;
        }
        sentence_start = raw.ends_with(['.', '!', '?']);
    }
    count
}

pub fn extract_entities(text: &str) -> EntityInfo {
    if text.trim().is_empty() {
        return EntityInfo::default();
    }

    let locations: Vec<&str> = LOCATION
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    let location_set: HashSet<&str> = locations.iter().copied().collect();

    let mut info = EntityInfo::default();
    info.entities.insert("PERSON".into(), count_people(text, &location_set));
    info.entities.insert("ORGANIZATION".into(), ACRONYM.find_iter(text).count());
    info.entities.insert("LOCATION".into(), locations.len());
    info.entities.insert("DATE".into(), DATE.find_iter(text).count());
    info.entities.insert("MONEY".into(), MONEY.find_iter(text).count());
    info.total_entities = info.entities.values().sum();
    info
}
