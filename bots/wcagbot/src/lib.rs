// SPDX-License-Identifier: PMPL-1.0-or-later
//! Wcagbot - WCAG success-criteria catalog and conformance evaluator
//!
//! Part of the gitbot-fleet ecosystem. Wcagbot parses imperfect markup into
//! structural facts, runs independent detection rules tied to specific WCAG
//! success criteria, and reports level-scoped compliance with a score over
//! the criteria that can be checked automatically.
//!
//! ## Layers
//!
//! - **Catalog**: all 87 WCAG 2.0/2.1/2.2 success criteria, embedded
//! - **Markup**: HTML to element facts, colour pairs and focus styles
//! - **Rules**: one pure detector per check, each bound to a criterion
//! - **Evaluator**: applicable, automatable and manual-review partitioning
//!
//! Passing every automated check is not conformance. Criteria without a
//! rule always need a human reviewer.

pub mod catalog;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod markup;
pub mod report;
pub mod rules;
pub mod scanner;

pub use catalog::{Catalog, Criterion, Level, Principle, WcagVersion};
pub use error::{Result, WcagError};
pub use evaluator::{ComplianceReport, CriterionStatus, Evaluator};
pub use markup::{analyze as analyze_markup, Document, ElementFact, Rgb, TextSize};
pub use rules::contrast::ContrastAssessment;
pub use rules::{Rule, RuleRegistry, Severity, Violation};

/// Look up a criterion by its dotted id
pub fn get_criterion(id: &str) -> Result<&'static Criterion> {
    catalog::global()?.get(id)
}

/// Case-insensitive substring search over title, description and
/// guideline. A blank term returns every criterion.
pub fn search_criteria(term: &str) -> Result<Vec<&'static Criterion>> {
    Ok(catalog::global()?.search(term))
}

pub fn list_criteria(level: Option<Level>, principle: Option<Principle>) -> Result<Vec<&'static Criterion>> {
    Ok(catalog::global()?.filter(level, principle))
}

/// Criteria relevant to a topic such as "forms" or "color"
pub fn guidance_for(topic: &str) -> Result<Vec<&'static Criterion>> {
    catalog::global()?.for_topic(topic)
}

/// Run every built-in rule, regardless of level
pub fn check_accessibility(html: &str) -> Vec<Violation> {
    let doc = markup::analyze(html);
    rules::builtin().run(&doc).violations
}

/// Evaluate markup against a target conformance level
pub fn validate_compliance(html: &str, level: Level) -> Result<ComplianceReport> {
    let catalog = catalog::global()?;
    let doc = markup::analyze(html);
    Ok(Evaluator::new(catalog, rules::builtin()).evaluate(&doc, level))
}

pub fn evaluate_contrast(foreground: Rgb, background: Rgb, text_size: TextSize) -> ContrastAssessment {
    rules::contrast::evaluate(foreground, background, text_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_surface() {
        assert_eq!(get_criterion("2.4.7").unwrap().title, "Focus Visible");
        assert!(matches!(get_criterion("9.9.9"), Err(WcagError::NotFound(_))));
        assert_eq!(search_criteria("").unwrap().len(), 87);
        assert_eq!(list_criteria(Some(Level::AA), None).unwrap().len(), 24);
        assert!(matches!(guidance_for("dance"), Err(WcagError::UnknownTopic(_))));
    }

    #[test]
    fn test_level_string_validated_before_evaluation() {
        let level: std::result::Result<Level, _> = "AAAA".parse();
        assert!(matches!(level, Err(WcagError::InvalidLevel(_))));
    }

    #[test]
    fn test_concurrent_validation_shares_catalog() {
        let pages = [
            (r#"<img src="a.png">"#, vec!["1.1.1".to_string()]),
            ("<h1>a</h1><h3>b</h3>", vec!["1.3.1".to_string()]),
            ("<p>fine</p>", Vec::new()),
            (r#"<input type="email">"#, vec!["3.3.2".to_string(), "4.1.2".to_string()]),
        ];

        std::thread::scope(|scope| {
            let handles: Vec<_> = pages
                .iter()
                .flat_map(|page| std::iter::repeat(page).take(4))
                .map(|(html, expected)| {
                    scope.spawn(move || {
                        let report = validate_compliance(html, Level::AA).unwrap();
                        assert_eq!(&report.failed, expected);
                        assert!(std::ptr::eq(
                            get_criterion("1.1.1").unwrap(),
                            catalog::global().unwrap().get("1.1.1").unwrap()
                        ));
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
        });
    }

    #[test]
    fn test_check_accessibility_is_level_independent() {
        let html = r#"<p style="color:#767676;background:#ffffff">muted</p>"#;
        let found = check_accessibility(html);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].criterion_id, "1.4.6");
    }
}
