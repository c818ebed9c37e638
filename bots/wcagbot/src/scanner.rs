// SPDX-License-Identifier: PMPL-1.0-or-later
//! File and directory scanner.
//!
//! Reads markup files from disk, runs them through the analyzer and either
//! the full rule set (`check`) or the compliance evaluator (`validate`).

use crate::catalog::{self, Level};
use crate::config::Config;
use crate::evaluator::{ComplianceReport, Evaluator};
use crate::markup::{self, Document};
use crate::rules::{self, RuleFailure, Violation};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Rule findings for one file, independent of any target level
#[derive(Debug, Clone, Serialize)]
pub struct CheckedFile {
    pub path: PathBuf,
    #[serde(skip)]
    pub document: Document,
    pub violations: Vec<Violation>,
    pub rule_failures: Vec<RuleFailure>,
    pub parse_warnings: usize,
}

/// Compliance verdict for one file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(skip)]
    pub document: Document,
    pub report: ComplianceReport,
}

/// Run every built-in rule over a single file
pub fn check_file(path: &Path) -> anyhow::Result<CheckedFile> {
    let content = std::fs::read_to_string(path)?;
    let document = markup::analyze(&content);
    let outcome = rules::builtin().run(&document);
    info!(
        "Checked {}: {} violation(s)",
        path.display(),
        outcome.violations.len()
    );
    Ok(CheckedFile {
        path: path.to_path_buf(),
        parse_warnings: document.parse_warnings,
        document,
        violations: outcome.violations,
        rule_failures: outcome.failures,
    })
}

/// Evaluate a single file against a target level
pub fn validate_file(path: &Path, level: Level) -> anyhow::Result<FileReport> {
    let content = std::fs::read_to_string(path)?;
    let document = markup::analyze(&content);
    let report = Evaluator::new(catalog::global()?, rules::builtin()).evaluate(&document, level);
    Ok(FileReport {
        path: path.to_path_buf(),
        document,
        report,
    })
}

/// Evaluate every matching file under a directory
pub fn validate_directory(dir: &Path, level: Level, config: &Config) -> anyhow::Result<Vec<FileReport>> {
    let mut reports = Vec::new();

    info!("Scanning directory: {}", dir.display());

    for entry in WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_str().unwrap_or("");
            if e.depth() > 0 && e.file_type().is_dir() {
                return !config.exclude.iter().any(|x| x == name) && !name.starts_with('.');
            }
            true
        })
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() || !has_extension(entry.path(), &config.extensions) {
            continue;
        }

        match validate_file(entry.path(), level) {
            Ok(report) => reports.push(report),
            Err(e) => warn!("Skipping {}: {}", entry.path().display(), e),
        }
    }

    info!(
        "Validated {} file(s), {} non-compliant",
        reports.len(),
        reports.iter().filter(|r| !r.report.is_compliant()).count()
    );

    Ok(reports)
}

/// Validate a file or, for a directory, every matching file beneath it
pub fn validate_path(path: &Path, level: Level, config: &Config) -> anyhow::Result<Vec<FileReport>> {
    if path.is_dir() {
        validate_directory(path, level, config)
    } else {
        Ok(vec![validate_file(path, level)?])
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const BROKEN: &str = r#"<img src="logo.png">"#;
    const CLEAN: &str = r#"<!DOCTYPE html><html lang="en"><body><main><h1>Hi</h1></main></body></html>"#;

    #[test]
    fn test_scan_nonexistent_dir() {
        let result = validate_directory(Path::new("/nonexistent/path"), Level::AA, &Config::default());
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn test_directory_respects_extensions_and_excludes() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), CLEAN).unwrap();
        fs::write(dir.path().join("broken.htm"), BROKEN).unwrap();
        fs::write(dir.path().join("notes.txt"), BROKEN).unwrap();
        fs::create_dir(dir.path().join("node_modules")).unwrap();
        fs::write(dir.path().join("node_modules/dep.html"), BROKEN).unwrap();
        fs::create_dir(dir.path().join(".cache")).unwrap();
        fs::write(dir.path().join(".cache/page.html"), BROKEN).unwrap();

        let reports = validate_directory(dir.path(), Level::AA, &Config::default()).unwrap();
        let names: Vec<_> = reports
            .iter()
            .map(|r| r.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["broken.htm", "index.html"]);
        assert!(!reports[0].report.is_compliant());
        assert!(reports[1].report.is_compliant());
    }

    #[test]
    fn test_validate_path_single_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("page.html");
        fs::write(&file, BROKEN).unwrap();
        let reports = validate_path(&file, Level::A, &Config::default()).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].report.failed, vec!["1.1.1".to_string()]);
    }

    #[test]
    fn test_check_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("page.html");
        fs::write(&file, BROKEN).unwrap();
        let checked = check_file(&file).unwrap();
        assert_eq!(checked.violations.len(), 1);
        assert_eq!(checked.violations[0].rule, "missing-alt");
        assert!(checked.rule_failures.is_empty());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(check_file(Path::new("/nonexistent/page.html")).is_err());
        assert!(validate_path(Path::new("/nonexistent/page.html"), Level::A, &Config::default()).is_err());
    }
}
