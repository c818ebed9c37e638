// SPDX-License-Identifier: PMPL-1.0-or-later
//! Navigation - WCAG 2.4.1 Bypass Blocks (Level A), 2.4.3 Focus Order (Level A)
//!
//! - Pages with a navigation block need a main landmark or a skip link
//! - Positive tabindex values override document order and usually
//!   scramble the tab sequence

use super::{Rule, Violation};
use crate::markup::{Document, ElementKind, FactKind};

pub const BYPASS_BLOCKS: Rule = Rule::new(
    "bypass-blocks",
    "2.4.1",
    "Repeated navigation can be skipped",
    check_bypass_blocks,
);

pub const FOCUS_ORDER: Rule = Rule::new(
    "positive-tabindex",
    "2.4.3",
    "No element forces its own tab position with a positive tabindex",
    check_positive_tabindex,
);

fn landmark_role(doc: &Document, wanted: &str) -> bool {
    doc.facts
        .iter()
        .any(|f| matches!(&f.kind, FactKind::Landmark { role } if role == wanted))
}

fn has_skip_link(doc: &Document) -> bool {
    doc.of_kind(ElementKind::Link).any(|f| match &f.kind {
        FactKind::Link { href, .. } => href.starts_with('#') && href.len() > 1,
        _ => false,
    })
}

fn check_bypass_blocks(doc: &Document) -> Vec<Violation> {
    if !landmark_role(doc, "navigation") || landmark_role(doc, "main") || has_skip_link(doc) {
        return Vec::new();
    }
    vec![Violation::warning(
        "Page has a navigation block but no <main> landmark or skip link to bypass it.",
    )
    .with_suggestion("Wrap the primary content in <main>, or add <a href=\"#content\">Skip to content</a> as the first focusable element")]
}

fn check_positive_tabindex(doc: &Document) -> Vec<Violation> {
    doc.facts
        .iter()
        .filter_map(|fact| {
            let value: i32 = fact.attr("tabindex")?.trim().parse().ok()?;
            (value > 0).then(|| {
                Violation::warning(format!(
                    "{} has tabindex=\"{}\"; positive values disrupt the natural tab order.",
                    fact.describe(),
                    value
                ))
                .at(fact.position)
                .with_suggestion("Use tabindex=\"0\" and order the markup the way it should be navigated")
            })
        })
        .collect()
}
