// SPDX-License-Identifier: PMPL-1.0-or-later
//! Form control labels - WCAG 3.3.2 Labels or Instructions (Level A),
//! 4.1.2 Name, Role, Value (Level A)
//!
//! An unlabelled control fails both criteria: the user sees no
//! instruction, and assistive technology gets no accessible name. One
//! detector feeds two rules so each criterion is scored on its own.

use super::{Rule, Violation};
use crate::markup::{Document, ElementFact, FactKind};

pub const INPUT_LABEL: Rule = Rule::new(
    "input-label",
    "3.3.2",
    "Form controls have a visible label or instructions",
    check_input_label,
);

pub const INPUT_NAME: Rule = Rule::new(
    "input-name",
    "4.1.2",
    "Form controls expose an accessible name",
    check_input_name,
);

/// Input types that do not need a label
const EXEMPT_INPUT_TYPES: &[&str] = &["hidden", "submit", "reset", "button", "image"];

/// Controls without any label association, with their placeholder if any
fn unlabelled_controls(doc: &Document) -> impl Iterator<Item = (&ElementFact, Option<&str>)> {
    doc.facts.iter().filter_map(|fact| match &fact.kind {
        FactKind::Input {
            input_type,
            label,
            placeholder,
            ..
        } if !label.is_labelled() && !EXEMPT_INPUT_TYPES.contains(&input_type.as_str()) => {
            Some((fact, placeholder.as_deref()))
        }
        _ => None,
    })
}

fn check_input_label(doc: &Document) -> Vec<Violation> {
    unlabelled_controls(doc)
        .map(|(fact, placeholder)| {
            let message = match placeholder {
                Some(_) => format!(
                    "{} relies only on a placeholder for labelling. Placeholders disappear when typing and are not reliable labels.",
                    fact.describe()
                ),
                None => format!(
                    "{} has no associated label. Every form control needs a <label>, aria-label, or aria-labelledby.",
                    fact.describe()
                ),
            };
            Violation::error(message)
                .at(fact.position)
                .with_suggestion("Add a <label for=\"control-id\"> element or wrap the control in a <label>")
        })
        .collect()
}

fn check_input_name(doc: &Document) -> Vec<Violation> {
    unlabelled_controls(doc)
        .map(|(fact, _)| {
            Violation::error(format!(
                "{} has no accessible name; screen readers announce it by role only.",
                fact.describe()
            ))
            .at(fact.position)
            .with_suggestion("Associate a <label>, or add aria-label / aria-labelledby")
        })
        .collect()
}
