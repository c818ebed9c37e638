// SPDX-License-Identifier: PMPL-1.0-or-later
//! Heading hierarchy - WCAG 1.3.1 Info and Relationships (Level A)
//!
//! The first heading may be any level. After that, going deeper by more
//! than one level (h1 to h3) is a violation; going back up by any amount
//! is fine.

use super::{Rule, Violation};
use crate::markup::{Document, FactKind};

pub const HEADING_ORDER: Rule = Rule::new(
    "heading-order",
    "1.3.1",
    "Headings do not skip levels when descending",
    check_heading_order,
);

fn check_heading_order(doc: &Document) -> Vec<Violation> {
    let headings = doc.facts.iter().filter_map(|f| match f.kind {
        FactKind::Heading { level } => Some((f, level)),
        _ => None,
    });

    let mut found = Vec::new();
    let mut previous: Option<u8> = None;

    for (fact, level) in headings {
        if let Some(prev) = previous {
            if level > prev + 1 {
                found.push(
                    Violation::error(format!(
                        "Heading level skipped: <h{}> follows <h{}> (\"{}\").",
                        level, prev, fact.text_content
                    ))
                    .at(fact.position)
                    .with_suggestion(&format!(
                        "Use <h{}> here, or add the missing intermediate heading",
                        prev + 1
                    )),
                );
            }
        }
        previous = Some(level);
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::analyze;

    #[test]
    fn test_skipped_level() {
        let found = HEADING_ORDER.run(&analyze("<h1>A</h1><h3>B</h3>"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].criterion_id, "1.3.1");
        assert_eq!(found[0].element_ref, Some(1));
    }

    #[test]
    fn test_first_heading_any_level() {
        assert!(HEADING_ORDER.run(&analyze("<h3>A</h3><h4>B</h4>")).is_empty());
    }

    #[test]
    fn test_ascending_is_fine() {
        let html = "<h1>A</h1><h2>B</h2><h3>C</h3><h2>D</h2><h1>E</h1><h2>F</h2>";
        assert!(HEADING_ORDER.run(&analyze(html)).is_empty());
    }

    #[test]
    fn test_each_skip_reported() {
        let found = HEADING_ORDER.run(&analyze("<h1>A</h1><h3>B</h3><h2>C</h2><h6>D</h6>"));
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_no_headings() {
        assert!(HEADING_ORDER.run(&analyze("<p>text</p>")).is_empty());
    }
}
