// SPDX-License-Identifier: PMPL-1.0-or-later
//! Keyboard access - WCAG 2.1.1 Keyboard (Level A)
//!
//! A custom control (click-like role or `onclick` handler on an element
//! that is not natively interactive) must be in the tab order through an
//! explicit `tabindex` of zero or more.

use super::{Rule, Violation};
use crate::markup::{Document, FactKind, CLICK_ROLES};

pub const KEYBOARD_ACCESS: Rule = Rule::new(
    "keyboard-access",
    "2.1.1",
    "Custom controls are reachable with the keyboard",
    check_keyboard_access,
);

fn check_keyboard_access(doc: &Document) -> Vec<Violation> {
    let mut found = Vec::new();

    for fact in &doc.facts {
        let FactKind::Interactive {
            role,
            native,
            tabindex,
        } = &fact.kind
        else {
            continue;
        };
        if *native {
            continue;
        }

        let click_role = role.as_deref().is_some_and(|r| CLICK_ROLES.contains(&r));
        let has_onclick = fact.attr("onclick").is_some();
        if !click_role && !has_onclick {
            continue;
        }
        if tabindex.is_some_and(|t| t >= 0) {
            continue;
        }

        let what = match role {
            Some(r) if click_role => format!("role=\"{}\"", r),
            _ => "an onclick handler".to_string(),
        };
        let reason = match tabindex {
            Some(t) => format!("tabindex=\"{}\" removes it from the tab order", t),
            None => "it has no tabindex".to_string(),
        };

        found.push(
            Violation::error(format!(
                "<{}> with {} cannot be reached by keyboard: {}.",
                fact.tag, what, reason
            ))
            .at(fact.position)
            .with_suggestion(&format!(
                "Use a <button> instead of <{}>, or add tabindex=\"0\" and a keydown handler for Enter and Space",
                fact.tag
            )),
        );
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::analyze;

    #[test]
    fn test_onclick_div_without_tabindex() {
        let found = KEYBOARD_ACCESS.run(&analyze(r#"<div onclick="go()">Go</div>"#));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].criterion_id, "2.1.1");
        assert!(found[0].message.contains("onclick"));
    }

    #[test]
    fn test_role_button_without_tabindex() {
        let found = KEYBOARD_ACCESS.run(&analyze(r#"<span role="button">Ok</span>"#));
        assert_eq!(found.len(), 1);
        assert!(found[0].message.contains("role=\"button\""));
    }

    #[test]
    fn test_negative_tabindex_fails() {
        let found = KEYBOARD_ACCESS.run(&analyze(r#"<div role="tab" tabindex="-1">One</div>"#));
        assert_eq!(found.len(), 1);
        assert!(found[0].message.contains("-1"));
    }

    #[test]
    fn test_focusable_custom_control_passes() {
        let html = r#"<div role="button" tabindex="0" onclick="go()">Go</div>"#;
        assert!(KEYBOARD_ACCESS.run(&analyze(html)).is_empty());
    }

    #[test]
    fn test_native_controls_pass() {
        let html = r#"<button onclick="go()">Go</button><a href="/" onclick="x()">Home</a>"#;
        assert!(KEYBOARD_ACCESS.run(&analyze(html)).is_empty());
    }

    #[test]
    fn test_presentational_role_with_onclick() {
        let found = KEYBOARD_ACCESS.run(&analyze(r#"<div role="none" onclick="go()">x</div>"#));
        assert_eq!(found.len(), 1);
        assert!(found[0].message.contains("onclick"));
    }

    #[test]
    fn test_non_click_role_ignored() {
        assert!(KEYBOARD_ACCESS.run(&analyze(r#"<div role="status">Saved</div>"#)).is_empty());
    }
}
