// SPDX-License-Identifier: PMPL-1.0-or-later
//! Image alternatives - WCAG 1.1.1 Non-text Content (Level A)
//!
//! - Every image needs a non-empty `alt` unless it is marked decorative
//!   with `role="presentation"` or `role="none"`
//! - A missing attribute is an error; an empty one without a decorative
//!   role is a warning
//! - Non-empty alt text that is a placeholder word or a file name is
//!   flagged as a heuristic

use super::{Rule, Violation};
use crate::markup::{Document, ElementKind, FactKind};

pub const MISSING_ALT: Rule = Rule::new(
    "missing-alt",
    "1.1.1",
    "Images have a text alternative or are marked decorative",
    check_missing_alt,
);

pub const PLACEHOLDER_ALT: Rule = Rule::new(
    "placeholder-alt",
    "1.1.1",
    "Alt text describes the image rather than naming it",
    check_placeholder_alt,
)
.heuristic();

/// Alt values that say nothing about the image
const GENERIC_ALT_VALUES: &[&str] = &[
    "image",
    "photo",
    "picture",
    "icon",
    "graphic",
    "img",
    "banner",
    "logo",
    "untitled",
    "screenshot",
    "thumbnail",
    "placeholder",
];

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".avif"];

fn is_decorative(role: Option<&str>) -> bool {
    matches!(role, Some("presentation") | Some("none"))
}

fn check_missing_alt(doc: &Document) -> Vec<Violation> {
    let mut found = Vec::new();

    for fact in &doc.facts {
        let FactKind::Image { alt, role } = &fact.kind else {
            continue;
        };
        if is_decorative(role.as_deref()) {
            continue;
        }
        let in_link = fact.is_inside(ElementKind::Link);

        match alt.as_deref().map(str::trim) {
            None => {
                let message = if in_link {
                    format!(
                        "{} inside a link has no alt attribute; the link has no text alternative for its image.",
                        fact.describe()
                    )
                } else {
                    format!("{} has no alt attribute.", fact.describe())
                };
                found.push(
                    Violation::error(message)
                        .at(fact.position)
                        .with_suggestion(
                            "Add alt=\"description\" for informative images or alt=\"\" with role=\"presentation\" for decorative ones",
                        ),
                );
            }
            Some("") => {
                let message = if in_link {
                    format!(
                        "{} inside a link has empty alt text; describe where the link goes.",
                        fact.describe()
                    )
                } else {
                    format!(
                        "{} has empty alt text but is not marked decorative.",
                        fact.describe()
                    )
                };
                found.push(
                    Violation::warning(message)
                        .at(fact.position)
                        .with_suggestion(
                            "Describe the image, or add role=\"presentation\" if it is purely decorative",
                        ),
                );
            }
            Some(_) => {}
        }
    }

    found
}

fn check_placeholder_alt(doc: &Document) -> Vec<Violation> {
    let mut found = Vec::new();

    for fact in &doc.facts {
        let FactKind::Image { alt: Some(alt), role } = &fact.kind else {
            continue;
        };
        if is_decorative(role.as_deref()) {
            continue;
        }
        let lowered = alt.trim().to_lowercase();
        if lowered.is_empty() {
            continue;
        }

        if GENERIC_ALT_VALUES.contains(&lowered.as_str()) {
            found.push(
                Violation::warning(format!(
                    "Image has generic alt text \"{}\". Alt text should be descriptive.",
                    alt.trim()
                ))
                .at(fact.position)
                .with_suggestion("Replace with a meaningful description of the image content"),
            );
        } else if IMAGE_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext)) {
            found.push(
                Violation::warning(format!(
                    "Image alt text appears to be a filename: \"{}\".",
                    alt.trim()
                ))
                .at(fact.position)
                .with_suggestion(
                    "Replace the filename with a meaningful description of what the image shows",
                ),
            );
        }
    }

    found
}
