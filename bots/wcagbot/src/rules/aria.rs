// SPDX-License-Identifier: PMPL-1.0-or-later
//! ARIA roles - WCAG 4.1.2 Name, Role, Value (Level A)
//!
//! A `role` that is not defined by WAI-ARIA gives assistive technology
//! nothing to announce. Only the first token of a role list is checked;
//! later tokens are fallbacks.

use super::{Rule, Violation};
use crate::markup::Document;

pub const VALID_ROLE: Rule = Rule::new(
    "valid-role",
    "4.1.2",
    "Explicit roles are defined WAI-ARIA roles",
    check_valid_role,
);

/// WAI-ARIA 1.2 roles, abstract roles excluded
const ARIA_ROLES: &[&str] = &[
    "alert", "alertdialog", "application", "article", "banner", "blockquote", "button",
    "caption", "cell", "checkbox", "code", "columnheader", "combobox", "complementary",
    "contentinfo", "definition", "deletion", "dialog", "directory", "document", "emphasis",
    "feed", "figure", "form", "generic", "grid", "gridcell", "group", "heading", "img",
    "insertion", "link", "list", "listbox", "listitem", "log", "main", "marquee", "math",
    "menu", "menubar", "menuitem", "menuitemcheckbox", "menuitemradio", "meter", "navigation",
    "none", "note", "option", "paragraph", "presentation", "progressbar", "radio",
    "radiogroup", "region", "row", "rowgroup", "rowheader", "scrollbar", "search",
    "searchbox", "separator", "slider", "spinbutton", "status", "strong", "subscript",
    "superscript", "switch", "tab", "table", "tablist", "tabpanel", "term", "textbox", "time",
    "timer", "toolbar", "tooltip", "tree", "treegrid", "treeitem",
];

pub fn is_known_role(role: &str) -> bool {
    ARIA_ROLES.contains(&role)
}

fn check_valid_role(doc: &Document) -> Vec<Violation> {
    doc.facts
        .iter()
        .filter_map(|fact| {
            let role = fact.role()?;
            (!is_known_role(&role)).then(|| {
                Violation::error(format!(
                    "<{}> has role=\"{}\", which is not a WAI-ARIA role.",
                    fact.tag, role
                ))
                .at(fact.position)
                .with_suggestion("Use a defined role such as button, link, dialog or navigation, or remove the attribute")
            })
        })
        .collect()
}
