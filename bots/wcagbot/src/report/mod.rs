// SPDX-License-Identifier: PMPL-1.0-or-later
//! Report generation for rule findings and compliance verdicts.
//!
//! Supports multiple output formats:
//! - Text: human-readable findings with WCAG criterion references
//! - JSON: structured findings for programmatic consumption
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration
//!
//! Catalog lookups and contrast assessments render as text or JSON only.

mod sarif;

use crate::catalog::{self, Catalog, Criterion};
use crate::markup::Document;
use crate::rules::contrast::ContrastAssessment;
use crate::rules::{Severity, Violation};
use crate::scanner::{CheckedFile, FileReport};
use serde::Serialize;
use serde_json::json;
use std::path::Path;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
    /// SARIF for IDE/CI integration
    Sarif,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Sarif => write!(f, "sarif"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "sarif" => Ok(OutputFormat::Sarif),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Pretty JSON, or an error object if serialization fails
pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize report: {}\"}}", e))
}

fn visible(violations: &[Violation], include_warnings: bool) -> Vec<&Violation> {
    violations
        .iter()
        .filter(|v| include_warnings || v.severity == Severity::Error)
        .collect()
}

/// Render the findings of a `check` run
pub fn check_report(checked: &CheckedFile, format: OutputFormat, include_warnings: bool) -> String {
    let shown = visible(&checked.violations, include_warnings);
    match format {
        OutputFormat::Text => check_text(checked, &shown),
        OutputFormat::Json => to_json(&json!({
            "path": checked.path,
            "violations": shown,
            "rule_failures": checked.rule_failures,
            "parse_warnings": checked.parse_warnings,
        })),
        OutputFormat::Sarif => sarif::generate(&[(checked.path.as_path(), shown)]),
    }
}

/// Render the verdicts of a `validate` run over one or more files
pub fn compliance_report(files: &[FileReport], format: OutputFormat, include_warnings: bool) -> String {
    match format {
        OutputFormat::Text => compliance_text(files, include_warnings),
        OutputFormat::Json => {
            let entries: Vec<_> = files
                .iter()
                .map(|f| {
                    let mut report = f.report.clone();
                    if !include_warnings {
                        report.violations.retain(|v| v.severity == Severity::Error);
                    }
                    json!({ "path": f.path, "report": report })
                })
                .collect();
            to_json(&json!({
                "compliant": files.iter().all(|f| f.report.is_compliant()),
                "files": entries,
            }))
        }
        OutputFormat::Sarif => {
            let entries: Vec<_> = files
                .iter()
                .map(|f| (f.path.as_path(), visible(&f.report.violations, include_warnings)))
                .collect();
            sarif::generate(&entries)
        }
    }
}

fn wcag_reference(id: &str) -> String {
    match catalog::global().and_then(|c| c.get(id)) {
        Ok(c) => format!("{} {} (Level {})", c.id, c.title, c.level),
        Err(_) => id.to_string(),
    }
}

fn push_violations(output: &mut String, path: &Path, doc: &Document, violations: &[&Violation]) {
    for severity in [Severity::Error, Severity::Warning] {
        let group: Vec<_> = violations.iter().filter(|v| v.severity == severity).collect();
        if group.is_empty() {
            continue;
        }

        output.push_str(&format!("--- {} ({}) ---\n", severity, group.len()));

        for v in group {
            output.push_str(&format!("[WCAG-{}-{}] {}\n", v.criterion_id, v.rule, v.message));

            match v.element_ref.and_then(|pos| doc.fact(pos)) {
                Some(fact) => output.push_str(&format!(
                    "  Location: {} {}\n",
                    path.display(),
                    fact.describe()
                )),
                None => output.push_str(&format!("  Location: {}\n", path.display())),
            }
            output.push_str(&format!("  WCAG: {}\n", wcag_reference(&v.criterion_id)));

            if let Some(ref suggestion) = v.suggestion {
                output.push_str(&format!("  Fix: {}\n", suggestion));
            }
            output.push('\n');
        }
    }
}

fn check_text(checked: &CheckedFile, shown: &[&Violation]) -> String {
    let mut output = String::new();

    output.push_str("=== wcagbot Accessibility Check ===\n\n");
    output.push_str(&format!("File: {}\n", checked.path.display()));
    if checked.parse_warnings > 0 {
        output.push_str(&format!("Parse warnings: {}\n", checked.parse_warnings));
    }
    output.push('\n');

    for failure in &checked.rule_failures {
        output.push_str(&format!(
            "Rule {} ({}) failed and was skipped: {}\n\n",
            failure.rule, failure.criterion_id, failure.reason
        ));
    }

    if shown.is_empty() {
        output.push_str("No accessibility issues found by automated checks.\n");
        output.push_str("RESULT: PASS\n");
        return output;
    }

    let errors = shown.iter().filter(|v| v.severity == Severity::Error).count();
    let warnings = shown.len() - errors;
    output.push_str(&format!(
        "Found {} issue(s): {} error(s), {} warning(s)\n\n",
        shown.len(),
        errors,
        warnings
    ));

    push_violations(&mut output, &checked.path, &checked.document, shown);

    if errors > 0 {
        output.push_str("RESULT: FAIL (errors found)\n");
    } else {
        output.push_str("RESULT: PASS WITH WARNINGS\n");
    }

    output
}

fn compliance_text(files: &[FileReport], include_warnings: bool) -> String {
    let mut output = String::new();

    output.push_str("=== wcagbot WCAG Compliance Report ===\n\n");

    if files.is_empty() {
        output.push_str("No markup files found.\n");
        return output;
    }

    if let Some(first) = files.first() {
        output.push_str(&format!("Target level: {}\n", first.report.target_level));
    }
    output.push_str(&format!("Files: {}\n\n", files.len()));

    for file in files {
        let report = &file.report;
        output.push_str(&format!("### {}\n", file.path.display()));
        output.push_str(&format!(
            "Score: {:.1}% ({}/{} automatable criteria passed)\n",
            report.score,
            report.passed.len(),
            report.automatable_criteria.len()
        ));
        if !report.failed.is_empty() {
            let failed: Vec<String> = report
                .failed
                .iter()
                .map(|id| {
                    if report.low_confidence.contains(id) {
                        format!("{} (review)", id)
                    } else {
                        id.clone()
                    }
                })
                .collect();
            output.push_str(&format!("Failed: {}\n", failed.join(", ")));
        }
        output.push_str(&format!(
            "Manual review: {} criteria\n",
            report.manual_review.len()
        ));
        if report.parse_warnings > 0 {
            output.push_str(&format!("Parse warnings: {}\n", report.parse_warnings));
        }
        for failure in &report.rule_failures {
            output.push_str(&format!(
                "Rule {} ({}) failed; criterion moved to manual review: {}\n",
                failure.rule, failure.criterion_id, failure.reason
            ));
        }
        output.push('\n');

        push_violations(
            &mut output,
            &file.path,
            &file.document,
            &visible(&report.violations, include_warnings),
        );
    }

    let failing = files.iter().filter(|f| !f.report.is_compliant()).count();
    if failing == 0 {
        output.push_str("RESULT: PASS (automated checks only; manual review still required)\n");
    } else {
        output.push_str(&format!(
            "RESULT: FAIL ({} of {} file(s) non-compliant)\n",
            failing,
            files.len()
        ));
    }

    output
}

/// One criterion in full
pub fn criterion_text(c: &Criterion) -> String {
    let mut output = String::new();
    output.push_str(&format!("{} {}\n", c.id, c.title));
    output.push_str(&format!("Level {} (WCAG {})\n", c.level, c.version));
    output.push_str(&format!("Principle: {}\n", c.principle));
    output.push_str(&format!("Guideline: {}\n\n", c.guideline));
    output.push_str(&format!("{}\n", c.description));
    if !c.exceptions.is_empty() {
        output.push_str("\nExceptions:\n");
        for exception in &c.exceptions {
            output.push_str(&format!("  - {}\n", exception));
        }
    }
    output.push_str(&format!("\nUnderstanding: {}\n", c.understanding_url()));
    output
}

/// One line per criterion
pub fn criteria_list_text(criteria: &[&Criterion]) -> String {
    if criteria.is_empty() {
        return "No matching criteria.\n".to_string();
    }
    let mut output = String::new();
    for c in criteria {
        output.push_str(&format!("{:<7} {:<4} {}\n", c.id, c.level.to_string(), c.title));
    }
    output.push_str(&format!("\n{} criteria\n", criteria.len()));
    output
}

/// The four principles with their guidelines and catalog totals
pub fn principles_text(catalog: &Catalog) -> String {
    let mut output = String::new();
    for principle in catalog.principles() {
        let count = catalog.filter(None, Some(*principle)).len();
        output.push_str(&format!(
            "{}. {} ({} criteria)\n",
            principle.number(),
            principle,
            count
        ));
        output.push_str(&format!("   {}\n", principle.summary()));
        for guideline in catalog.guidelines(*principle) {
            output.push_str(&format!("   - {}\n", guideline));
        }
        output.push('\n');
    }
    let counts = catalog.level_counts();
    output.push_str(&format!(
        "{} criteria: {} A, {} AA, {} AAA (dataset {})\n",
        catalog.len(),
        counts.a,
        counts.aa,
        counts.aaa,
        catalog.metadata().dataset_version
    ));
    output
}

pub fn contrast_text(a: &ContrastAssessment) -> String {
    let verdict = |passes: bool| if passes { "pass" } else { "fail" };
    let mut output = String::new();
    output.push_str(&format!(
        "Foreground {} on background {} ({} text)\n",
        a.foreground, a.background, a.text_size
    ));
    output.push_str(&format!("Contrast ratio: {:.2}:1\n", a.ratio));
    output.push_str(&format!(
        "  AA  (1.4.3, needs {}:1): {}\n",
        a.aa.required,
        verdict(a.aa.passes)
    ));
    output.push_str(&format!(
        "  AAA (1.4.6, needs {}:1): {}\n",
        a.aaa.required,
        verdict(a.aaa.passes)
    ));
    output.push_str(&format!("Grade: {}\n", a.grade));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Level;
    use crate::evaluator::Evaluator;
    use crate::markup::{analyze, Rgb, TextSize};
    use crate::rules;
    use crate::rules::contrast;
    use std::path::PathBuf;

    const HTML: &str = r#"<img src="logo.png"><h1>A</h1><h3>B</h3><div tabindex="2">x</div>"#;

    fn checked() -> CheckedFile {
        let document = analyze(HTML);
        let outcome = rules::builtin().run(&document);
        CheckedFile {
            path: PathBuf::from("index.html"),
            parse_warnings: document.parse_warnings,
            document,
            violations: outcome.violations,
            rule_failures: outcome.failures,
        }
    }

    fn file_report(html: &str, level: Level) -> FileReport {
        let document = analyze(html);
        let report = Evaluator::new(catalog::global().unwrap(), rules::builtin()).evaluate(&document, level);
        FileReport {
            path: PathBuf::from("page.html"),
            document,
            report,
        }
    }

    #[test]
    fn test_text_report_with_findings() {
        let report = check_report(&checked(), OutputFormat::Text, true);
        assert!(report.contains("[WCAG-1.1.1-missing-alt]"));
        assert!(report.contains("Location: index.html <img src=\"logo.png\">"));
        assert!(report.contains("WCAG: 1.1.1 Non-text Content (Level A)"));
        assert!(report.contains("--- WARNING (1) ---"));
        assert!(report.contains("RESULT: FAIL"));
    }

    #[test]
    fn test_text_report_hides_warnings() {
        let report = check_report(&checked(), OutputFormat::Text, false);
        assert!(!report.contains("WARNING"));
        assert!(!report.contains("positive-tabindex"));
    }

    #[test]
    fn test_text_report_empty() {
        let document = analyze("<p>fine</p>");
        let clean = CheckedFile {
            path: PathBuf::from("ok.html"),
            document,
            violations: Vec::new(),
            rule_failures: Vec::new(),
            parse_warnings: 0,
        };
        let report = check_report(&clean, OutputFormat::Text, true);
        assert!(report.contains("No accessibility issues found"));
        assert!(report.contains("RESULT: PASS"));
    }

    #[test]
    fn test_json_check_report() {
        let report = check_report(&checked(), OutputFormat::Json, true);
        let parsed: serde_json::Value = serde_json::from_str(&report).expect("valid JSON");
        assert_eq!(parsed["path"], "index.html");
        assert_eq!(parsed["violations"].as_array().unwrap().len(), 3);
        assert_eq!(parsed["violations"][0]["criterion_id"], "1.1.1");
    }

    #[test]
    fn test_sarif_report() {
        let report = check_report(&checked(), OutputFormat::Sarif, true);
        let parsed: serde_json::Value = serde_json::from_str(&report).expect("valid JSON");
        assert_eq!(parsed["version"], "2.1.0");
        let results = parsed["runs"][0]["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["ruleId"], "WCAG-1.1.1-missing-alt");
        assert_eq!(results[0]["level"], "error");
        assert_eq!(
            results[0]["locations"][0]["physicalLocation"]["artifactLocation"]["uri"],
            "index.html"
        );
    }

    #[test]
    fn test_compliance_text() {
        let files = vec![file_report(HTML, Level::A)];
        let report = compliance_report(&files, OutputFormat::Text, true);
        assert!(report.contains("Target level: A"));
        assert!(report.contains("Failed: 1.1.1, 1.3.1, 2.4.3"));
        assert!(report.contains("RESULT: FAIL (1 of 1 file(s) non-compliant)"));
    }

    #[test]
    fn test_compliance_text_marks_review_findings() {
        let html = r#"<style>a:focus{outline:none}</style><a href="/">Home</a>"#;
        let report = compliance_report(&[file_report(html, Level::AA)], OutputFormat::Text, true);
        assert!(report.contains("Failed: 2.4.7 (review)"));
    }

    #[test]
    fn test_compliance_json() {
        let files = vec![file_report("<p>fine</p>", Level::AA)];
        let report = compliance_report(&files, OutputFormat::Json, true);
        let parsed: serde_json::Value = serde_json::from_str(&report).expect("valid JSON");
        assert_eq!(parsed["compliant"], true);
        assert_eq!(parsed["files"][0]["report"]["target_level"], "AA");
        assert_eq!(parsed["files"][0]["report"]["score"], 100.0);
    }

    #[test]
    fn test_criterion_text() {
        let c = catalog::global().unwrap().get("1.4.3").unwrap();
        let text = criterion_text(c);
        assert!(text.starts_with("1.4.3 Contrast (Minimum)"));
        assert!(text.contains("Level AA"));
        assert!(text.contains("Exceptions:"));
        assert!(text.contains("Understanding: https://www.w3.org/WAI/WCAG22/Understanding/contrast-minimum.html"));
    }

    #[test]
    fn test_criteria_list_text() {
        let cat = catalog::global().unwrap();
        let text = criteria_list_text(&cat.filter(Some(Level::A), None));
        assert!(text.contains("1.1.1"));
        assert!(text.ends_with("32 criteria\n"));
        assert_eq!(criteria_list_text(&[]), "No matching criteria.\n");
    }

    #[test]
    fn test_principles_text() {
        let text = principles_text(catalog::global().unwrap());
        assert!(text.starts_with("1. Perceivable"));
        assert!(text.contains("   - 2.4 Navigable\n"));
        assert!(text.contains("87 criteria: 32 A, 24 AA, 31 AAA"));
    }

    #[test]
    fn test_contrast_text() {
        let text = contrast_text(&contrast::evaluate(Rgb::BLACK, Rgb::WHITE, TextSize::Normal));
        assert!(text.contains("Contrast ratio: 21.00:1"));
        assert!(text.contains("Grade: AAA"));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("sarif".parse::<OutputFormat>().unwrap(), OutputFormat::Sarif);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
