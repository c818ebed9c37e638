// SPDX-License-Identifier: PMPL-1.0-or-later
//! Inline style and `<style>` block inspection.
//!
//! Declarations are read literally; nothing is cascaded or inherited.

use super::color::{self, Rgb, TextSize};
use regex::Regex;
use std::sync::LazyLock;

static OUTLINE_NONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[;{\s])outline\s*:\s*(?:none|0(?:px)?)\s*(?:!important\s*)?(?:;|}|$)")
        .expect("valid regex")
});

static CSS_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^{}]+)\{([^}]*)\}").expect("valid regex"));

static CSS_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"));

/// Border properties that can draw a focus indicator: `border`, a side or
/// logical edge, optionally narrowed to its width, style or colour
static BORDER_PROPERTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^border(?:-(?:top|right|bottom|left|block|inline)(?:-(?:start|end))?)?(?:-(?:width|style|color))?$")
        .expect("valid regex")
});

/// A `property: value` pair with the property lowercased
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

/// Split a declaration list (`a: b; c: d`) into its declarations
pub fn parse_declarations(style: &str) -> Vec<Declaration> {
    style
        .split(';')
        .filter_map(|decl| {
            let (property, value) = decl.split_once(':')?;
            let property = property.trim().to_lowercase();
            let value = value.trim();
            if property.is_empty() || value.is_empty() {
                return None;
            }
            Some(Declaration {
                property,
                value: value.to_string(),
            })
        })
        .collect()
}

fn find<'a>(decls: &'a [Declaration], property: &str) -> Option<&'a Declaration> {
    decls.iter().rev().find(|d| d.property == property)
}

/// Outcome of reading the colours out of one inline style
#[derive(Debug, Default)]
pub struct StyleColors {
    pub pair: Option<(Rgb, Rgb, TextSize)>,
    /// Colour declarations that could not be read as a literal colour
    pub unparseable: usize,
}

/// Extract a literal foreground/background pair from an inline style
pub fn colors_from_declarations(decls: &[Declaration]) -> StyleColors {
    let mut out = StyleColors::default();

    let foreground = find(decls, "color").and_then(|d| {
        let parsed = color::parse_color(&d.value);
        if parsed.is_none() {
            out.unparseable += 1;
        }
        parsed
    });

    let background = find(decls, "background-color")
        .or_else(|| find(decls, "background"))
        .and_then(|d| {
            let parsed = if d.property == "background" {
                color::parse_background(&d.value)
            } else {
                color::parse_color(&d.value)
            };
            if parsed.is_none() {
                out.unparseable += 1;
            }
            parsed
        });

    if let (Some(fg), Some(bg)) = (foreground, background) {
        let points = find(decls, "font-size")
            .and_then(|d| color::font_size_points(&d.value))
            .unwrap_or(12.0);
        let bold = find(decls, "font-weight").is_some_and(|d| color::is_bold(&d.value));
        out.pair = Some((fg, bg, TextSize::classify(points, bold)));
    }

    out
}

/// True when the declarations hide the outline and add nothing in its place
pub fn suppresses_focus(declarations: &str) -> bool {
    if !OUTLINE_NONE_RE.is_match(declarations) {
        return false;
    }
    !parse_declarations(declarations)
        .iter()
        .any(is_focus_replacement)
}

/// A declaration that draws its own indicator in place of the outline
fn is_focus_replacement(decl: &Declaration) -> bool {
    let value = decl.value.trim().to_lowercase();
    if matches!(value.as_str(), "none" | "0" | "0px" | "transparent") {
        return false;
    }
    decl.property == "box-shadow" || BORDER_PROPERTY_RE.is_match(&decl.property)
}

/// Selectors of stylesheet blocks that suppress the focus indicator
pub fn focus_suppressing_selectors(stylesheet: &str) -> Vec<String> {
    let stripped = CSS_COMMENT_RE.replace_all(stylesheet, "");
    CSS_BLOCK_RE
        .captures_iter(&stripped)
        .filter_map(|caps| {
            let outer = caps.get(1)?.as_str();
            let body = caps.get(2)?.as_str();
            // Inside an at-rule the innermost block is the style rule.
            let (selector, declarations) = body.rsplit_once('{').unwrap_or((outer, body));
            suppresses_focus(declarations).then(|| selector.trim().to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_declarations() {
        let decls = parse_declarations("Color: #000; background-color : white;; font-size:");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].property, "color");
        assert_eq!(decls[1].value, "white");
    }

    #[test]
    fn test_colors_from_inline_style() {
        let decls = parse_declarations("color: #000; background: #fff; font-size: 24px");
        let colors = colors_from_declarations(&decls);
        assert_eq!(colors.pair, Some((Rgb::BLACK, Rgb::WHITE, TextSize::Large)));
        assert_eq!(colors.unparseable, 0);
    }

    #[test]
    fn test_bold_fourteen_point_is_large() {
        let decls = parse_declarations("color:#777;background-color:#fff;font-size:14pt;font-weight:bold");
        let (_, _, size) = colors_from_declarations(&decls).pair.unwrap();
        assert_eq!(size, TextSize::Large);
    }

    #[test]
    fn test_unparseable_colour_is_counted() {
        let decls = parse_declarations("color: var(--fg); background-color: #fff");
        let colors = colors_from_declarations(&decls);
        assert!(colors.pair.is_none());
        assert_eq!(colors.unparseable, 1);
    }

    #[test]
    fn test_single_colour_yields_no_pair() {
        let colors = colors_from_declarations(&parse_declarations("color: red"));
        assert!(colors.pair.is_none());
        assert_eq!(colors.unparseable, 0);
    }

    #[test]
    fn test_suppresses_focus() {
        assert!(suppresses_focus("outline: none"));
        assert!(suppresses_focus("color: red; outline:0;"));
        assert!(!suppresses_focus("outline: none; box-shadow: 0 0 0 3px #005fcc"));
        assert!(!suppresses_focus("outline: 2px solid #005fcc"));
        assert!(!suppresses_focus("outline-offset: 0"));
    }

    #[test]
    fn test_replacement_matches_whole_property() {
        assert!(suppresses_focus("outline: none; border-radius: 4px"));
        assert!(suppresses_focus("outline: none; background-color: #eee"));
        assert!(suppresses_focus("outline: none; box-shadow: none"));
        assert!(!suppresses_focus("outline: none; border-bottom: 2px solid #005fcc"));
        assert!(!suppresses_focus("outline: none; border-inline-start-color: #005fcc"));
    }

    #[test]
    fn test_focus_suppressing_selectors() {
        let css = r#"
            /* reset */
            a:focus { outline: none; }
            button:focus { outline: none; border: 2px solid #000; }
            @media screen { input:focus { outline: 0 } }
        "#;
        let selectors = focus_suppressing_selectors(css);
        assert_eq!(selectors, vec!["a:focus".to_string(), "input:focus".to_string()]);
    }
}
