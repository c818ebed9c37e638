// SPDX-License-Identifier: PMPL-1.0-or-later
//! Link purpose - WCAG 2.4.4 Link Purpose (In Context) (Level A)
//!
//! Detects two things:
//! - Generic link text ("click here", "read more") with no extra
//!   accessible context from `aria-label`, `aria-labelledby`,
//!   `aria-describedby` or `title`
//! - Links with no accessible name at all
//!
//! Whether surrounding prose makes a link's purpose clear is left to a
//! human reviewer.

use super::{Rule, Violation};
use crate::markup::{Document, ElementFact, FactKind};

pub const GENERIC_LINK_TEXT: Rule = Rule::new(
    "generic-link-text",
    "2.4.4",
    "Link text is not a generic phrase like \"click here\"",
    check_generic_link_text,
);

pub const EMPTY_LINK: Rule = Rule::new(
    "empty-link",
    "2.4.4",
    "Links have an accessible name",
    check_empty_link,
);

/// Link texts that say nothing about the destination
const GENERIC_LINK_TEXTS: &[&str] = &["click here", "read more", "learn more", "here", "more", "link"];

/// Attributes that can carry the context a generic link text lacks
const CONTEXT_ATTRIBUTES: &[&str] = &["aria-label", "aria-labelledby", "aria-describedby", "title"];

fn has_context(fact: &ElementFact) -> bool {
    CONTEXT_ATTRIBUTES.iter().any(|a| fact.has_value(a))
}

fn links(doc: &Document) -> impl Iterator<Item = (&ElementFact, &str)> {
    doc.facts.iter().filter_map(|f| match &f.kind {
        FactKind::Link { name, .. } => Some((f, name.as_str())),
        _ => None,
    })
}

fn check_generic_link_text(doc: &Document) -> Vec<Violation> {
    links(doc)
        .filter(|(fact, name)| {
            let normalised = name.trim().to_lowercase();
            GENERIC_LINK_TEXTS.contains(&normalised.as_str()) && !has_context(fact)
        })
        .map(|(fact, name)| {
            Violation::error(format!(
                "Link text \"{}\" does not describe where {} goes.",
                name.trim(),
                fact.describe()
            ))
            .at(fact.position)
            .with_suggestion("Use text that names the destination, e.g. \"Read the 2024 annual report\"")
        })
        .collect()
}

fn check_empty_link(doc: &Document) -> Vec<Violation> {
    links(doc)
        .filter(|(fact, name)| {
            name.trim().is_empty() && !fact.has_value("aria-label") && !fact.has_value("aria-labelledby") && !fact.has_value("title")
        })
        .map(|(fact, _)| {
            Violation::error(format!("{} has no accessible name.", fact.describe()))
                .at(fact.position)
                .with_suggestion("Add link text, alt text on the linked image, or an aria-label")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::analyze;

    #[test]
    fn test_generic_text_flagged() {
        let html = r#"<a href="/a">Click Here</a><a href="/b">  read more </a><a href="/c">Annual report</a>"#;
        let found = GENERIC_LINK_TEXT.run(&analyze(html));
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|v| v.criterion_id == "2.4.4"));
    }

    #[test]
    fn test_generic_text_with_context_passes() {
        let html = r#"
            <a href="/a" aria-label="Read more about pricing">Read more</a>
            <a href="/b" aria-describedby="desc">here</a>
            <a href="/c" title="Contact form">link</a>
        "#;
        assert!(GENERIC_LINK_TEXT.run(&analyze(html)).is_empty());
    }

    #[test]
    fn test_text_containing_generic_phrase_passes() {
        let html = r#"<a href="/docs">Read more about installation</a>"#;
        assert!(GENERIC_LINK_TEXT.run(&analyze(html)).is_empty());
    }

    #[test]
    fn test_empty_link() {
        let html = r#"<a href="/x"></a><a href="/y"><img src="i.png" alt="Settings"></a><a href="/z" aria-label="Close"></a>"#;
        let found = EMPTY_LINK.run(&analyze(html));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].element_ref, Some(0));
    }
}
