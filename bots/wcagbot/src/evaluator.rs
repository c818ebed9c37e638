// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Compliance evaluation against a target conformance level.
//!
//! For a target level the evaluator partitions the applicable criteria:
//!
//! - **automatable**: at least one registered rule; each ends up passed
//!   (no violations) or failed (any violation)
//! - **manual review**: no rule, or every rule for it panicked during this
//!   call; never counted as passed and excluded from the score
//!
//! Score is `100 * passed / automatable`, or 100 when nothing is
//! automatable.

use crate::catalog::{Catalog, Level};
use crate::markup::Document;
use crate::rules::{Confidence, RuleFailure, RuleRegistry, Violation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// Where a single criterion ended up in a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CriterionStatus {
    Passed,
    Failed,
    ManualReview,
    NotApplicable,
}

impl std::fmt::Display for CriterionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CriterionStatus::Passed => write!(f, "PASS"),
            CriterionStatus::Failed => write!(f, "FAIL"),
            CriterionStatus::ManualReview => write!(f, "MANUAL"),
            CriterionStatus::NotApplicable => write!(f, "N/A"),
        }
    }
}

/// Level-scoped compliance verdict for one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub target_level: Level,
    /// Criteria at or below the target level, catalog order
    pub applicable_criteria: Vec<String>,
    /// Applicable criteria that were checked by at least one rule
    pub automatable_criteria: Vec<String>,
    pub passed: Vec<String>,
    pub failed: Vec<String>,
    pub manual_review: Vec<String>,
    pub violations: Vec<Violation>,
    /// Percentage of automatable criteria that passed
    pub score: f64,
    pub parse_warnings: usize,
    /// Failed criteria backed only by heuristic findings
    pub low_confidence: Vec<String>,
    pub rule_failures: Vec<RuleFailure>,
    pub generated_at: DateTime<Utc>,
}

impl ComplianceReport {
    pub fn status_of(&self, id: &str) -> CriterionStatus {
        let has = |set: &[String]| set.iter().any(|c| c == id);
        if has(&self.failed) {
            CriterionStatus::Failed
        } else if has(&self.passed) {
            CriterionStatus::Passed
        } else if has(&self.manual_review) {
            CriterionStatus::ManualReview
        } else {
            CriterionStatus::NotApplicable
        }
    }

    /// No automatable criterion failed
    pub fn is_compliant(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn violations_for<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations.iter().filter(move |v| v.criterion_id == id)
    }
}

/// Runs a rule registry over documents against a catalog
pub struct Evaluator<'a> {
    catalog: &'a Catalog,
    rules: &'a RuleRegistry,
}

impl<'a> Evaluator<'a> {
    pub fn new(catalog: &'a Catalog, rules: &'a RuleRegistry) -> Self {
        Self { catalog, rules }
    }

    pub fn evaluate(&self, doc: &Document, target: Level) -> ComplianceReport {
        let applicable: Vec<String> = self
            .catalog
            .applicable(target)
            .into_iter()
            .map(|c| c.id.clone())
            .collect();
        let applicable_set: HashSet<&str> = applicable.iter().map(String::as_str).collect();

        let outcome = self
            .rules
            .run_where(doc, |rule| applicable_set.contains(rule.criterion));

        let broken: HashSet<&str> = outcome
            .failures
            .iter()
            .map(|f| f.criterion_id.as_str())
            .collect();

        let mut automatable = Vec::new();
        let mut passed = Vec::new();
        let mut failed = Vec::new();
        let mut manual_review = Vec::new();
        let mut low_confidence = Vec::new();

        for id in &applicable {
            if !self.rules.has_rules_for(id) || broken.contains(id.as_str()) {
                manual_review.push(id.clone());
                continue;
            }
            automatable.push(id.clone());

            let found: Vec<&Violation> = outcome
                .violations
                .iter()
                .filter(|v| &v.criterion_id == id)
                .collect();
            if found.is_empty() {
                passed.push(id.clone());
            } else {
                if found.iter().all(|v| v.confidence == Confidence::Low) {
                    low_confidence.push(id.clone());
                }
                failed.push(id.clone());
            }
        }

        let score = if automatable.is_empty() {
            100.0
        } else {
            100.0 * passed.len() as f64 / automatable.len() as f64
        };

        debug!(
            "Level {}: {} applicable, {} automatable, {} manual review",
            target,
            applicable.len(),
            automatable.len(),
            manual_review.len()
        );
        info!(
            "Compliance at level {}: score {:.1}, {} passed, {} failed",
            target,
            score,
            passed.len(),
            failed.len()
        );

        ComplianceReport {
            target_level: target,
            applicable_criteria: applicable,
            automatable_criteria: automatable,
            passed,
            failed,
            manual_review,
            violations: outcome.violations,
            score,
            parse_warnings: doc.parse_warnings,
            low_confidence,
            rule_failures: outcome.failures,
            generated_at: Utc::now(),
        }
    }
}
