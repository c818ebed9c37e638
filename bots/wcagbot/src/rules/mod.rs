// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Detection rules for automatable WCAG success criteria.
//!
//! A rule is a pure function from an analysed [`Document`] to the
//! violations it finds, tagged with exactly one criterion id. A criterion
//! may have several rules; a criterion with none is manual-review only.
//!
//! Rules never share state. The registry runs each one under
//! [`std::panic::catch_unwind`] so a defective rule costs only its own
//! contribution to a report.
//!
//! ## Built-in rules
//!
//! - **Alt Text** (1.1.1): missing or empty alternatives, placeholder alt text
//! - **Headings** (1.3.1): skipped levels when descending
//! - **Contrast** (1.4.3/1.4.6): literal colour pairs against AA and AAA thresholds
//! - **Keyboard** (2.1.1): custom controls unreachable by keyboard
//! - **Navigation** (2.4.1/2.4.3): bypass blocks, positive tabindex
//! - **Links** (2.4.4): generic or empty link text
//! - **Focus** (2.4.7): focus indicator removed without replacement
//! - **Language** (3.1.1): missing page language
//! - **Forms** (3.3.2/4.1.2): unlabelled form controls
//! - **ARIA** (4.1.2): unknown roles

pub mod alt_text;
pub mod aria;
pub mod contrast;
pub mod focus;
pub mod forms;
pub mod headings;
pub mod keyboard;
pub mod language;
pub mod links;
pub mod navigation;

use crate::markup::Document;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::LazyLock;
use tracing::{debug, error};

/// Severity of a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Definite failure of the criterion
    Error,
    /// Likely failure, or a pattern a reviewer should confirm
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

/// How far a rule's verdict can be trusted without a human look
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    /// Heuristic rule; findings are flagged for review
    Low,
}

/// A single detected problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Criterion id, e.g. "1.1.1"
    pub criterion_id: String,
    /// Name of the rule that produced this violation
    pub rule: String,
    pub severity: Severity,
    pub confidence: Confidence,
    pub message: String,
    /// Fact index, `None` for page-level findings
    pub element_ref: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Violation {
    /// Create a violation; the registry stamps the criterion and rule name
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            criterion_id: String::new(),
            rule: String::new(),
            severity,
            confidence: Confidence::High,
            message: message.into(),
            element_ref: None,
            suggestion: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Point at the fact with this position
    pub fn at(mut self, position: usize) -> Self {
        self.element_ref = Some(position);
        self
    }

    pub fn at_opt(mut self, position: Option<usize>) -> Self {
        self.element_ref = position;
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }
}

/// Signature shared by every rule body
pub type Check = fn(&Document) -> Vec<Violation>;

/// A detection rule bound to one criterion
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub criterion: &'static str,
    pub description: &'static str,
    pub confidence: Confidence,
    check: Check,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("criterion", &self.criterion)
            .field("confidence", &self.confidence)
            .finish()
    }
}

impl Rule {
    pub const fn new(
        name: &'static str,
        criterion: &'static str,
        description: &'static str,
        check: Check,
    ) -> Self {
        Self {
            name,
            criterion,
            description,
            confidence: Confidence::High,
            check,
        }
    }

    /// Mark the rule as a heuristic
    pub const fn heuristic(mut self) -> Self {
        self.confidence = Confidence::Low;
        self
    }

    /// Run the rule, tagging each violation with this rule's identity
    pub fn run(&self, doc: &Document) -> Vec<Violation> {
        (self.check)(doc)
            .into_iter()
            .map(|mut v| {
                v.criterion_id = self.criterion.to_string();
                v.rule = self.name.to_string();
                if self.confidence == Confidence::Low {
                    v.confidence = Confidence::Low;
                }
                v
            })
            .collect()
    }

    /// Run the rule, converting a panic into a [`RuleFailure`]
    pub fn run_isolated(&self, doc: &Document) -> Result<Vec<Violation>, RuleFailure> {
        panic::catch_unwind(AssertUnwindSafe(|| self.run(doc))).map_err(|payload| {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!(
                "Rule {} ({}) failed: {}",
                self.name, self.criterion, reason
            );
            RuleFailure {
                rule: self.name.to_string(),
                criterion_id: self.criterion.to_string(),
                reason,
            }
        })
    }
}

/// A rule that panicked during one evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFailure {
    pub rule: String,
    pub criterion_id: String,
    pub reason: String,
}

/// Everything produced by running a registry over one document
#[derive(Debug, Clone, Default)]
pub struct RuleOutcome {
    pub violations: Vec<Violation>,
    pub failures: Vec<RuleFailure>,
}

/// Built-in rules, ordered by criterion id
static BUILTIN_RULES: &[Rule] = &[
    alt_text::MISSING_ALT,
    alt_text::PLACEHOLDER_ALT,
    headings::HEADING_ORDER,
    contrast::CONTRAST_MINIMUM,
    contrast::CONTRAST_ENHANCED,
    keyboard::KEYBOARD_ACCESS,
    navigation::BYPASS_BLOCKS,
    navigation::FOCUS_ORDER,
    links::GENERIC_LINK_TEXT,
    links::EMPTY_LINK,
    focus::FOCUS_VISIBLE,
    language::PAGE_LANGUAGE,
    forms::INPUT_LABEL,
    forms::INPUT_NAME,
    aria::VALID_ROLE,
];

static BUILTIN: LazyLock<RuleRegistry> = LazyLock::new(|| RuleRegistry {
    rules: BUILTIN_RULES.to_vec(),
});

/// Registry of built-in rules shared by the whole process
pub fn builtin() -> &'static RuleRegistry {
    &BUILTIN
}

/// An ordered set of rules
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
}

impl RuleRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn for_criterion<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules.iter().filter(move |r| r.criterion == id)
    }

    pub fn has_rules_for(&self, id: &str) -> bool {
        self.rules.iter().any(|r| r.criterion == id)
    }

    /// Distinct criterion ids with at least one rule, in registry order
    pub fn criteria(&self) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = Vec::new();
        for rule in &self.rules {
            if !out.contains(&rule.criterion) {
                out.push(rule.criterion);
            }
        }
        out
    }

    /// Run the given rules in registry order, isolating each one
    pub fn run_where(&self, doc: &Document, mut include: impl FnMut(&Rule) -> bool) -> RuleOutcome {
        let mut outcome = RuleOutcome::default();
        for rule in &self.rules {
            if !include(rule) {
                continue;
            }
            match rule.run_isolated(doc) {
                Ok(found) => {
                    debug!("Rule {} found {} violation(s)", rule.name, found.len());
                    outcome.violations.extend(found);
                }
                Err(failure) => outcome.failures.push(failure),
            }
        }
        outcome
    }

    /// Run every rule
    pub fn run(&self, doc: &Document) -> RuleOutcome {
        self.run_where(doc, |_| true)
    }
}
