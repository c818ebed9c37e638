// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! WCAG success criteria catalog.
//!
//! The catalog is an immutable dataset of every WCAG 2.0, 2.1 and 2.2
//! success criterion, embedded at compile time from
//! `data/wcag_criteria.json` and parsed once per process. Entries are kept
//! in numeric id order (`1.4.9` before `1.4.10`), which is the order every
//! query returns.
//!
//! The dataset is validated when it is loaded. A malformed dataset is a
//! packaging defect, so [`global`] reports it as [`WcagError::Catalog`]
//! instead of panicking.

pub mod topics;

use crate::error::{Result, WcagError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

const CRITERIA_JSON: &str = include_str!("../../data/wcag_criteria.json");

static CATALOG: LazyLock<std::result::Result<Catalog, String>> =
    LazyLock::new(|| Catalog::from_json(CRITERIA_JSON).map_err(|e| e.to_string()));

/// Shared process-wide catalog, loaded on first use
pub fn global() -> Result<&'static Catalog> {
    CATALOG
        .as_ref()
        .map_err(|reason| WcagError::Catalog(reason.clone()))
}

/// WCAG conformance level. Levels are cumulative: AA includes A.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Level A - minimum conformance
    A,
    /// Level AA - standard conformance
    AA,
    /// Level AAA - enhanced conformance
    AAA,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::A, Level::AA, Level::AAA];
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::A => write!(f, "A"),
            Level::AA => write!(f, "AA"),
            Level::AAA => write!(f, "AAA"),
        }
    }
}

impl std::str::FromStr for Level {
    type Err = WcagError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(Level::A),
            "AA" => Ok(Level::AA),
            "AAA" => Ok(Level::AAA),
            _ => Err(WcagError::InvalidLevel(s.to_string())),
        }
    }
}

/// The four POUR principles
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Principle {
    Perceivable,
    Operable,
    Understandable,
    Robust,
}

impl Principle {
    pub const ALL: [Principle; 4] = [
        Principle::Perceivable,
        Principle::Operable,
        Principle::Understandable,
        Principle::Robust,
    ];

    /// Leading segment of every criterion id under this principle
    pub fn number(&self) -> u32 {
        match self {
            Principle::Perceivable => 1,
            Principle::Operable => 2,
            Principle::Understandable => 3,
            Principle::Robust => 4,
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Principle::Perceivable => {
                "Information and user interface components must be presentable to users in ways they can perceive."
            }
            Principle::Operable => "User interface components and navigation must be operable.",
            Principle::Understandable => {
                "Information and the operation of user interface must be understandable."
            }
            Principle::Robust => {
                "Content must be robust enough that it can be interpreted by a wide variety of user agents, including assistive technologies."
            }
        }
    }
}

impl std::fmt::Display for Principle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Principle::Perceivable => write!(f, "Perceivable"),
            Principle::Operable => write!(f, "Operable"),
            Principle::Understandable => write!(f, "Understandable"),
            Principle::Robust => write!(f, "Robust"),
        }
    }
}

impl std::str::FromStr for Principle {
    type Err = WcagError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "perceivable" => Ok(Principle::Perceivable),
            "operable" => Ok(Principle::Operable),
            "understandable" => Ok(Principle::Understandable),
            "robust" => Ok(Principle::Robust),
            _ => Err(WcagError::InvalidPrinciple(s.to_string())),
        }
    }
}

/// WCAG release that introduced a criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WcagVersion {
    #[serde(rename = "2.0")]
    V2_0,
    #[serde(rename = "2.1")]
    V2_1,
    #[serde(rename = "2.2")]
    V2_2,
}

impl std::fmt::Display for WcagVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WcagVersion::V2_0 => write!(f, "2.0"),
            WcagVersion::V2_1 => write!(f, "2.1"),
            WcagVersion::V2_2 => write!(f, "2.2"),
        }
    }
}

/// A single WCAG success criterion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    /// Dotted numeric id, e.g. "1.4.3"
    pub id: String,
    /// Understanding-document anchor, e.g. "contrast-minimum"
    pub slug: String,
    pub title: String,
    pub level: Level,
    pub version: WcagVersion,
    pub principle: Principle,
    /// Parent guideline, e.g. "1.4 Distinguishable"
    pub guideline: String,
    pub description: String,
    #[serde(default)]
    pub exceptions: Vec<String>,
}

impl Criterion {
    /// Link to the W3C "Understanding" document for this criterion
    pub fn understanding_url(&self) -> String {
        format!(
            "https://www.w3.org/WAI/WCAG22/Understanding/{}.html",
            self.slug
        )
    }

    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.guideline.to_lowercase().contains(needle)
    }
}

/// Dataset header from the embedded JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogMetadata {
    pub title: String,
    pub dataset_version: String,
    pub versions: Vec<String>,
    pub total_criteria: usize,
    pub source: String,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    metadata: CatalogMetadata,
    criteria: Vec<Criterion>,
}

/// Criteria count per conformance level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelCounts {
    pub a: usize,
    pub aa: usize,
    pub aaa: usize,
}

/// Immutable, validated set of success criteria
#[derive(Debug, Clone)]
pub struct Catalog {
    metadata: CatalogMetadata,
    criteria: Vec<Criterion>,
    index: HashMap<String, usize>,
}

/// Parse "1.4.10" into [1, 4, 10]. Anything other than three numeric
/// segments is rejected.
pub fn numeric_id(id: &str) -> Option<[u32; 3]> {
    let mut parts = id.split('.');
    let mut out = [0u32; 3];
    for slot in out.iter_mut() {
        *slot = parts.next()?.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}

impl Catalog {
    /// Parse and validate a catalog from its JSON representation
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)
            .map_err(|e| WcagError::Catalog(format!("malformed dataset: {}", e)))?;

        let mut keyed = Vec::with_capacity(file.criteria.len());
        for criterion in file.criteria {
            let key = numeric_id(&criterion.id).ok_or_else(|| {
                WcagError::Catalog(format!("invalid criterion id: {:?}", criterion.id))
            })?;
            if key[0] != criterion.principle.number() {
                return Err(WcagError::Catalog(format!(
                    "criterion {} is filed under {} but its id belongs to principle {}",
                    criterion.id, criterion.principle, key[0]
                )));
            }
            keyed.push((key, criterion));
        }
        keyed.sort_by_key(|(key, _)| *key);

        let criteria: Vec<Criterion> = keyed.into_iter().map(|(_, c)| c).collect();

        let mut index = HashMap::with_capacity(criteria.len());
        for (pos, criterion) in criteria.iter().enumerate() {
            if index.insert(criterion.id.clone(), pos).is_some() {
                return Err(WcagError::Catalog(format!(
                    "duplicate criterion id: {}",
                    criterion.id
                )));
            }
        }

        if criteria.len() != file.metadata.total_criteria {
            return Err(WcagError::Catalog(format!(
                "dataset declares {} criteria but contains {}",
                file.metadata.total_criteria,
                criteria.len()
            )));
        }

        debug!(
            "Loaded {} criteria (dataset {})",
            criteria.len(),
            file.metadata.dataset_version
        );

        Ok(Self {
            metadata: file.metadata,
            criteria,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn metadata(&self) -> &CatalogMetadata {
        &self.metadata
    }

    /// Every criterion in numeric id order
    pub fn all(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Exact lookup by dotted id
    pub fn get(&self, id: &str) -> Result<&Criterion> {
        self.index
            .get(id.trim())
            .map(|&pos| &self.criteria[pos])
            .ok_or_else(|| WcagError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Case-insensitive substring search over title, description and
    /// guideline. A blank term matches every criterion.
    pub fn search(&self, term: &str) -> Vec<&Criterion> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.criteria.iter().collect();
        }
        self.criteria.iter().filter(|c| c.matches(&needle)).collect()
    }

    /// Exact-level and principle filter; `None` means unconstrained
    pub fn filter(&self, level: Option<Level>, principle: Option<Principle>) -> Vec<&Criterion> {
        self.criteria
            .iter()
            .filter(|c| level.map_or(true, |l| c.level == l))
            .filter(|c| principle.map_or(true, |p| c.principle == p))
            .collect()
    }

    /// Criteria that a target level requires (cumulative)
    pub fn applicable(&self, target: Level) -> Vec<&Criterion> {
        self.criteria.iter().filter(|c| c.level <= target).collect()
    }

    pub fn principles(&self) -> &'static [Principle] {
        &Principle::ALL
    }

    /// Guideline names under a principle, in catalog order
    pub fn guidelines(&self, principle: Principle) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for c in self.criteria.iter().filter(|c| c.principle == principle) {
            if !out.contains(&c.guideline.as_str()) {
                out.push(&c.guideline);
            }
        }
        out
    }

    pub fn level_counts(&self) -> LevelCounts {
        let count = |level| self.criteria.iter().filter(|c| c.level == level).count();
        LevelCounts {
            a: count(Level::A),
            aa: count(Level::AA),
            aaa: count(Level::AAA),
        }
    }

    /// Criteria relevant to a topic such as "forms" or "keyboard"
    pub fn for_topic(&self, topic: &str) -> Result<Vec<&Criterion>> {
        let ids = topics::criteria_for(topic)
            .ok_or_else(|| WcagError::UnknownTopic(topic.to_string()))?;
        Ok(ids.iter().filter_map(|id| self.get(id).ok()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> &'static Catalog {
        global().expect("embedded catalog is valid")
    }

    #[test]
    fn test_catalog_size_matches_metadata() {
        let cat = catalog();
        assert_eq!(cat.len(), 87);
        assert_eq!(cat.metadata().total_criteria, 87);
    }

    #[test]
    fn test_level_counts() {
        let counts = catalog().level_counts();
        assert_eq!(counts, LevelCounts { a: 32, aa: 24, aaa: 31 });
    }

    #[test]
    fn test_get_returns_requested_id() {
        let cat = catalog();
        for c in cat.all() {
            assert_eq!(cat.get(&c.id).unwrap().id, c.id);
        }
    }

    #[test]
    fn test_get_unknown_id() {
        let err = catalog().get("9.9.9").unwrap_err();
        assert!(matches!(err, WcagError::NotFound(ref id) if id == "9.9.9"));
    }

    #[test]
    fn test_numeric_ordering() {
        let ids: Vec<&str> = catalog().all().iter().map(|c| c.id.as_str()).collect();
        let pos = |id| ids.iter().position(|x| *x == id).unwrap();
        assert!(pos("1.4.9") < pos("1.4.10"));
        assert!(pos("1.4.13") < pos("2.1.1"));
        assert_eq!(ids.first(), Some(&"1.1.1"));
        assert_eq!(ids.last(), Some(&"4.1.3"));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let cat = catalog();
        let lower: Vec<&str> = cat.search("contrast").iter().map(|c| c.id.as_str()).collect();
        let upper: Vec<&str> = cat.search("CONTRAST").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(lower, upper);
        assert!(lower.contains(&"1.4.3"));
        assert!(lower.contains(&"1.4.6"));
        assert!(lower.contains(&"1.4.11"));
    }

    #[test]
    fn test_search_matches_guideline() {
        let results = catalog().search("input modalities");
        assert!(results.iter().all(|c| c.id.starts_with("2.5.")));
        assert_eq!(results.len(), 8);
    }

    #[test]
    fn test_blank_search_returns_everything() {
        assert_eq!(catalog().search("").len(), 87);
        assert_eq!(catalog().search("   ").len(), 87);
    }

    #[test]
    fn test_search_without_match() {
        assert!(catalog().search("blockchain").is_empty());
    }

    #[test]
    fn test_filter_exact_level() {
        let aa = catalog().filter(Some(Level::AA), None);
        assert_eq!(aa.len(), 24);
        assert!(aa.iter().all(|c| c.level == Level::AA));
    }

    #[test]
    fn test_filter_conjunctive() {
        let results = catalog().filter(Some(Level::A), Some(Principle::Robust));
        let ids: Vec<&str> = results.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["4.1.1", "4.1.2"]);
        assert_eq!(catalog().filter(None, None).len(), 87);
    }

    #[test]
    fn test_applicable_is_cumulative() {
        let cat = catalog();
        assert_eq!(cat.applicable(Level::A).len(), 32);
        assert_eq!(cat.applicable(Level::AA).len(), 56);
        assert_eq!(cat.applicable(Level::AAA).len(), 87);
    }

    #[test]
    fn test_guidelines_for_principle() {
        let guidelines = catalog().guidelines(Principle::Robust);
        assert_eq!(guidelines, vec!["4.1 Compatible"]);
        assert_eq!(catalog().guidelines(Principle::Operable).len(), 5);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!("aa".parse::<Level>().unwrap(), Level::AA);
        assert_eq!(" AAA ".parse::<Level>().unwrap(), Level::AAA);
        assert!(matches!("AAAA".parse::<Level>(), Err(WcagError::InvalidLevel(_))));
        assert!(Level::A < Level::AA && Level::AA < Level::AAA);
    }

    #[test]
    fn test_principle_parse() {
        assert_eq!("OPERABLE".parse::<Principle>().unwrap(), Principle::Operable);
        assert!(matches!(
            "usable".parse::<Principle>(),
            Err(WcagError::InvalidPrinciple(_))
        ));
    }

    #[test]
    fn test_numeric_id() {
        assert_eq!(numeric_id("1.4.10"), Some([1, 4, 10]));
        assert_eq!(numeric_id("1.4"), None);
        assert_eq!(numeric_id("1.4.3.1"), None);
        assert_eq!(numeric_id("a.b.c"), None);
    }

    fn dataset(total: usize, entries: &[(&str, &str)]) -> String {
        let criteria: Vec<serde_json::Value> = entries
            .iter()
            .map(|(id, principle)| {
                serde_json::json!({
                    "id": id,
                    "slug": "x",
                    "title": "X",
                    "level": "A",
                    "version": "2.0",
                    "principle": principle,
                    "guideline": "1.1 Text Alternatives",
                    "description": "x",
                })
            })
            .collect();
        serde_json::json!({
            "metadata": {
                "title": "t",
                "dataset_version": "test",
                "versions": ["2.0"],
                "total_criteria": total,
                "source": "test",
            },
            "criteria": criteria,
        })
        .to_string()
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let json = dataset(2, &[("1.1.1", "Perceivable"), ("1.1.1", "Perceivable")]);
        let err = Catalog::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_rejects_count_mismatch() {
        let json = dataset(3, &[("1.1.1", "Perceivable")]);
        assert!(matches!(Catalog::from_json(&json), Err(WcagError::Catalog(_))));
    }

    #[test]
    fn test_rejects_principle_mismatch() {
        let json = dataset(1, &[("2.1.1", "Perceivable")]);
        assert!(matches!(Catalog::from_json(&json), Err(WcagError::Catalog(_))));
    }

    #[test]
    fn test_rejects_malformed_id() {
        let json = dataset(1, &[("1.1", "Perceivable")]);
        assert!(matches!(Catalog::from_json(&json), Err(WcagError::Catalog(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(Catalog::from_json("{"), Err(WcagError::Catalog(_))));
    }

    #[test]
    fn test_understanding_url() {
        let c = catalog().get("1.4.3").unwrap();
        assert_eq!(
            c.understanding_url(),
            "https://www.w3.org/WAI/WCAG22/Understanding/contrast-minimum.html"
        );
    }
}
