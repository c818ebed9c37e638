// SPDX-License-Identifier: PMPL-1.0-or-later
//! Page language - WCAG 3.1.1 Language of Page (Level A)
//!
//! Needs a root fact, so fragments are never flagged.

use super::{Rule, Violation};
use crate::markup::{Document, FactKind};

pub const PAGE_LANGUAGE: Rule = Rule::new(
    "page-language",
    "3.1.1",
    "The <html> element declares the page language",
    check_page_language,
);

fn check_page_language(doc: &Document) -> Vec<Violation> {
    let Some(root) = doc.root() else {
        return Vec::new();
    };
    let missing = match &root.kind {
        FactKind::Root { lang } => lang.as_deref().map_or(true, |l| l.trim().is_empty()),
        _ => false,
    };
    if !missing {
        return Vec::new();
    }
    vec![
        Violation::error("<html> element has no lang attribute; screen readers cannot pick a pronunciation.")
            .with_suggestion("Add the page language, e.g. <html lang=\"en\">"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::analyze;

    #[test]
    fn test_missing_lang() {
        let found = PAGE_LANGUAGE.run(&analyze("<!DOCTYPE html><html><body><p>x</p></body></html>"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].criterion_id, "3.1.1");
        assert_eq!(found[0].element_ref, None);
    }

    #[test]
    fn test_blank_lang() {
        let found = PAGE_LANGUAGE.run(&analyze(r#"<html lang=" "><body></body></html>"#));
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_lang_present() {
        assert!(PAGE_LANGUAGE.run(&analyze(r#"<html lang="en-GB"></html>"#)).is_empty());
    }

    #[test]
    fn test_fragment_not_flagged() {
        assert!(PAGE_LANGUAGE.run(&analyze("<p>hello</p>")).is_empty());
    }
}
