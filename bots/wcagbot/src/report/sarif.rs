// SPDX-License-Identifier: PMPL-1.0-or-later
//! SARIF 2.1.0 output for GitHub Code Scanning and IDE integration.

use super::to_json;
use crate::catalog;
use crate::rules::{self, Severity, Violation};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Serialize)]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: String,
    version: String,
    runs: Vec<SarifRun>,
}

#[derive(Debug, Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Debug, Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifDriver {
    name: String,
    version: String,
    information_uri: String,
    rules: Vec<SarifRule>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRule {
    id: String,
    short_description: SarifMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    help_uri: Option<String>,
    default_configuration: SarifDefaultConfig,
}

#[derive(Debug, Serialize)]
struct SarifDefaultConfig {
    level: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifResult {
    rule_id: String,
    level: String,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Debug, Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLocation {
    physical_location: SarifPhysicalLocation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifPhysicalLocation {
    artifact_location: SarifArtifactLocation,
}

#[derive(Debug, Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

fn severity_to_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    }
}

fn rule_id(v: &Violation) -> String {
    format!("WCAG-{}-{}", v.criterion_id, v.rule)
}

fn describe_rule(v: &Violation) -> SarifRule {
    let description = rules::builtin()
        .for_criterion(&v.criterion_id)
        .find(|r| r.name == v.rule)
        .map(|r| r.description.to_string())
        .unwrap_or_else(|| v.rule.clone());
    let help_uri = catalog::global()
        .and_then(|c| c.get(&v.criterion_id))
        .map(|c| c.understanding_url())
        .ok();

    SarifRule {
        id: rule_id(v),
        short_description: SarifMessage { text: description },
        help_uri,
        default_configuration: SarifDefaultConfig {
            level: severity_to_level(v.severity).to_string(),
        },
    }
}

/// One SARIF run covering the violations of every given file
pub(super) fn generate(files: &[(&Path, Vec<&Violation>)]) -> String {
    let mut rules_map = BTreeMap::new();
    let mut results = Vec::new();

    for (path, violations) in files {
        for v in violations {
            rules_map.entry(rule_id(v)).or_insert_with(|| describe_rule(v));
            results.push(SarifResult {
                rule_id: rule_id(v),
                level: severity_to_level(v.severity).to_string(),
                message: SarifMessage {
                    text: v.message.clone(),
                },
                locations: vec![SarifLocation {
                    physical_location: SarifPhysicalLocation {
                        artifact_location: SarifArtifactLocation {
                            uri: path.display().to_string(),
                        },
                    },
                }],
            });
        }
    }

    let report = SarifReport {
        schema: "https://json.schemastore.org/sarif-2.1.0.json".to_string(),
        version: "2.1.0".to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: "wcagbot".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    information_uri: "https://github.com/hyperpolymath/gitbot-fleet".to_string(),
                    rules: rules_map.into_values().collect(),
                },
            },
            results,
        }],
    };

    to_json(&report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(criterion: &str, rule: &str, severity: Severity) -> Violation {
        let mut v = Violation::new(severity, "problem");
        v.criterion_id = criterion.to_string();
        v.rule = rule.to_string();
        v
    }

    #[test]
    fn test_generate_sarif_empty() {
        let parsed: serde_json::Value = serde_json::from_str(&generate(&[])).unwrap();
        assert_eq!(parsed["runs"][0]["tool"]["driver"]["name"], "wcagbot");
        assert!(parsed["runs"][0]["results"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_rules_deduplicated_with_help_uri() {
        let a = violation("1.1.1", "missing-alt", Severity::Error);
        let b = violation("1.1.1", "missing-alt", Severity::Error);
        let c = violation("2.4.3", "positive-tabindex", Severity::Warning);
        let out = generate(&[
            (Path::new("a.html"), vec![&a, &c]),
            (Path::new("b.html"), vec![&b]),
        ]);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        let rules = parsed["runs"][0]["tool"]["driver"]["rules"].as_array().unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0]["id"], "WCAG-1.1.1-missing-alt");
        assert_eq!(
            rules[0]["helpUri"],
            "https://www.w3.org/WAI/WCAG22/Understanding/non-text-content.html"
        );
        assert_eq!(rules[1]["defaultConfiguration"]["level"], "warning");
        assert_eq!(parsed["runs"][0]["results"].as_array().unwrap().len(), 3);
    }
}
