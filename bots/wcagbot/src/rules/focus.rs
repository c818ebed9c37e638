// SPDX-License-Identifier: PMPL-1.0-or-later
//! Focus indicator - WCAG 2.4.7 Focus Visible (Level AA)
//!
//! Heuristic. Flags `outline: none` / `outline: 0` with no replacement
//! indicator in the same declaration block. A replacement may live in
//! another rule or in script, so findings are warnings for review, never
//! a claim that focus is invisible.

use super::{Rule, Violation};
use crate::markup::{Document, FocusSuppression};

pub const FOCUS_VISIBLE: Rule = Rule::new(
    "focus-visible",
    "2.4.7",
    "Focus outlines are not removed without a replacement",
    check_focus_visible,
)
.heuristic();

fn check_focus_visible(doc: &Document) -> Vec<Violation> {
    doc.focus_suppressions
        .iter()
        .map(|suppression| match suppression {
            FocusSuppression::Inline { tag, element_ref } => Violation::warning(format!(
                "Inline style on <{}> removes the focus outline with no replacement; flagged for review.",
                tag
            ))
            .at_opt(*element_ref),
            FocusSuppression::Stylesheet { selector } => Violation::warning(format!(
                "Style rule \"{}\" removes the focus outline with no replacement; flagged for review.",
                selector
            )),
        })
        .map(|v| {
            v.with_suggestion(
                "Keep the outline, or replace it with a visible :focus-visible style such as outline: 2px solid #005fcc",
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::analyze;
    use crate::rules::{Confidence, Severity};

    #[test]
    fn test_outline_none_flagged_for_review() {
        let html = r#"<style>button:focus { outline: none; }</style><button>Go</button>"#;
        let found = FOCUS_VISIBLE.run(&analyze(html));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, Severity::Warning);
        assert_eq!(found[0].confidence, Confidence::Low);
        assert!(found[0].message.contains("flagged for review"));
    }

    #[test]
    fn test_replacement_indicator_passes() {
        let html = r#"<style>a:focus { outline: none; box-shadow: 0 0 0 3px #005fcc; }</style>"#;
        assert!(FOCUS_VISIBLE.run(&analyze(html)).is_empty());
    }

    #[test]
    fn test_inline_suppression_points_at_element() {
        let found = FOCUS_VISIBLE.run(&analyze(r#"<a href="/" style="outline:none">x</a>"#));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].element_ref, Some(0));
    }
}
