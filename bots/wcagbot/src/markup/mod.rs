// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Markup analysis: raw HTML to an ordered sequence of element facts.
//!
//! [`analyze`] never fails. Input goes through html5ever (via `scraper`),
//! which recovers from unclosed tags, stray end tags and truncated input
//! the way a browser would. Every recovery it performs is counted as a
//! parse warning, together with values the analyzer could not read
//! (non-numeric `tabindex`, colour declarations that are not literal).
//!
//! Input that declares itself a document (`<!doctype` or `<html`) is parsed
//! as one and yields a root fact carrying the page language. Anything else
//! is treated as a fragment and has no root fact.
//!
//! Only elements of interest become facts: images, headings, links, form
//! controls, custom or native interactive controls, elements carrying an
//! explicit ARIA role, and landmarks. Facts are numbered in document order
//! and that number is what [`Violation::element_ref`](crate::rules::Violation)
//! points at.

pub mod color;
pub mod style;

pub use color::{Rgb, TextSize};

use regex::Regex;
use scraper::{ElementRef, Html, Node};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;
use tracing::debug;

static DOCUMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!doctype|<html[\s>/]").expect("valid regex"));

/// Roles that make an element a landmark
pub const LANDMARK_ROLES: &[&str] = &[
    "banner",
    "navigation",
    "main",
    "contentinfo",
    "complementary",
    "search",
    "form",
    "region",
];

/// Roles a user activates by clicking
pub const CLICK_ROLES: &[&str] = &[
    "button",
    "link",
    "checkbox",
    "radio",
    "switch",
    "tab",
    "menuitem",
    "menuitemcheckbox",
    "menuitemradio",
    "option",
    "treeitem",
];

/// Tags the browser already makes focusable and operable
const NATIVE_INTERACTIVE: &[&str] = &["button", "summary"];

/// Discriminant of [`FactKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Root,
    Image,
    Heading,
    Link,
    Input,
    Interactive,
    Landmark,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ElementKind::Root => "root",
            ElementKind::Image => "image",
            ElementKind::Heading => "heading",
            ElementKind::Link => "link",
            ElementKind::Input => "input",
            ElementKind::Interactive => "interactive",
            ElementKind::Landmark => "landmark",
        };
        write!(f, "{}", name)
    }
}

/// How a form control gets its accessible name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelSource {
    /// `<label for>` pointing at the control's id
    Explicit,
    /// Control nested inside a `<label>`
    Wrapped,
    AriaLabelledBy,
    AriaLabel,
    Title,
    Missing,
}

impl LabelSource {
    pub fn is_labelled(&self) -> bool {
        !matches!(self, LabelSource::Missing)
    }
}

/// Kind-specific payload of an element fact
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FactKind {
    Root {
        lang: Option<String>,
    },
    Image {
        /// `None` when the attribute is absent, `Some("")` when empty
        alt: Option<String>,
        role: Option<String>,
    },
    Heading {
        level: u8,
    },
    Link {
        href: String,
        /// Visible text plus the alt text of any images inside the link
        name: String,
    },
    Input {
        /// `input`, `select` or `textarea`
        control: String,
        /// Lowercased `type` for inputs, the tag name otherwise
        input_type: String,
        label: LabelSource,
        placeholder: Option<String>,
    },
    Interactive {
        role: Option<String>,
        native: bool,
        tabindex: Option<i32>,
    },
    Landmark {
        role: String,
    },
}

impl FactKind {
    pub fn element_kind(&self) -> ElementKind {
        match self {
            FactKind::Root { .. } => ElementKind::Root,
            FactKind::Image { .. } => ElementKind::Image,
            FactKind::Heading { .. } => ElementKind::Heading,
            FactKind::Link { .. } => ElementKind::Link,
            FactKind::Input { .. } => ElementKind::Input,
            FactKind::Interactive { .. } => ElementKind::Interactive,
            FactKind::Landmark { .. } => ElementKind::Landmark,
        }
    }
}

/// One analysed element of interest
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementFact {
    /// Document-order index within [`Document::facts`]
    pub position: usize,
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    /// Descendant text with whitespace collapsed
    pub text_content: String,
    /// Kinds of the enclosing facts, outermost first
    pub ancestry: Vec<ElementKind>,
    #[serde(flatten)]
    pub kind: FactKind,
}

impl ElementFact {
    pub fn kind(&self) -> ElementKind {
        self.kind.element_kind()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Attribute present with a non-blank value
    pub fn has_value(&self, name: &str) -> bool {
        self.attr(name).is_some_and(|v| !v.trim().is_empty())
    }

    /// First token of the `role` attribute, lowercased
    pub fn role(&self) -> Option<String> {
        self.attr("role").and_then(first_role)
    }

    pub fn is_inside(&self, kind: ElementKind) -> bool {
        self.ancestry.contains(&kind)
    }

    /// Short `<tag attr="..">` description for messages
    pub fn describe(&self) -> String {
        let key = ["id", "src", "href", "name", "type", "role"]
            .iter()
            .find_map(|k| self.attr(k).map(|v| (k, v)));
        match key {
            Some((k, v)) => format!("<{} {}=\"{}\">", self.tag, k, truncate(v, 40)),
            None => format!("<{}>", self.tag),
        }
    }
}

/// A literal foreground/background colour pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorPair {
    pub foreground: Rgb,
    pub background: Rgb,
    pub text_size: TextSize,
    /// Fact the inline style belongs to, `None` for caller-supplied pairs
    pub element_ref: Option<usize>,
}

impl ColorPair {
    pub fn new(foreground: Rgb, background: Rgb, text_size: TextSize) -> Self {
        Self {
            foreground,
            background,
            text_size,
            element_ref: None,
        }
    }
}

/// Where a focus-indicator suppression was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum FocusSuppression {
    /// `style="outline: none"` on an element
    Inline { tag: String, element_ref: Option<usize> },
    /// A rule in a `<style>` block
    Stylesheet { selector: String },
}

/// Result of analysing one markup string
#[derive(Debug, Clone, Default, Serialize)]
pub struct Document {
    /// Input was parsed as a full document
    pub is_document: bool,
    pub facts: Vec<ElementFact>,
    pub color_pairs: Vec<ColorPair>,
    pub focus_suppressions: Vec<FocusSuppression>,
    pub parse_warnings: usize,
}

impl Document {
    /// Add a caller-supplied colour pair
    pub fn with_color_pair(mut self, pair: ColorPair) -> Self {
        self.color_pairs.push(pair);
        self
    }

    pub fn fact(&self, position: usize) -> Option<&ElementFact> {
        self.facts.get(position)
    }

    pub fn root(&self) -> Option<&ElementFact> {
        self.facts.iter().find(|f| f.kind() == ElementKind::Root)
    }

    pub fn of_kind(&self, kind: ElementKind) -> impl Iterator<Item = &ElementFact> {
        self.facts.iter().filter(move |f| f.kind() == kind)
    }
}

/// Analyse a markup string. Never fails.
pub fn analyze(source: &str) -> Document {
    let is_document = DOCUMENT_RE.is_match(source);
    let html = if is_document {
        Html::parse_document(source)
    } else {
        Html::parse_fragment(source)
    };

    let mut walker = Walker::new(&html, is_document);
    walker.walk(html.root_element());

    let doc = Document {
        is_document,
        parse_warnings: html.errors.len() + walker.warnings,
        facts: walker.facts,
        color_pairs: walker.color_pairs,
        focus_suppressions: walker.focus_suppressions,
    };

    debug!(
        "Analysed markup: {} facts, {} colour pairs, {} parse warnings",
        doc.facts.len(),
        doc.color_pairs.len(),
        doc.parse_warnings
    );

    doc
}

enum Step<'a> {
    Enter(ElementRef<'a>, bool),
    /// Leave a fact-producing element
    Exit,
}

struct Walker {
    is_document: bool,
    label_targets: HashSet<String>,
    facts: Vec<ElementFact>,
    color_pairs: Vec<ColorPair>,
    focus_suppressions: Vec<FocusSuppression>,
    warnings: usize,
}

impl Walker {
    fn new(html: &Html, is_document: bool) -> Self {
        let label_targets = html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "label")
            .filter_map(|el| el.value().attr("for"))
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();

        Self {
            is_document,
            label_targets,
            facts: Vec::new(),
            color_pairs: Vec::new(),
            focus_suppressions: Vec::new(),
            warnings: 0,
        }
    }

    /// Depth-first walk driven by an explicit stack, so nesting depth is
    /// bounded by the heap and not the thread stack.
    fn walk(&mut self, root: ElementRef<'_>) {
        let mut ancestry: Vec<ElementKind> = Vec::new();
        let mut stack = vec![Step::Enter(root, false)];

        while let Some(step) = stack.pop() {
            let (element, in_label) = match step {
                Step::Enter(element, in_label) => (element, in_label),
                Step::Exit => {
                    ancestry.pop();
                    continue;
                }
            };

            let tag = element.value().name();
            match tag {
                "script" | "template" => continue,
                "style" => {
                    self.read_stylesheet(element);
                    continue;
                }
                _ => {}
            }

            let position = self.classify(element, in_label).map(|kind| {
                let position = self.facts.len();
                self.facts.push(ElementFact {
                    position,
                    tag: tag.to_string(),
                    attributes: element
                        .value()
                        .attrs()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                    text_content: collapse_whitespace(element.text()),
                    ancestry: ancestry.clone(),
                    kind,
                });
                position
            });

            if let Some(style) = element.value().attr("style") {
                self.read_inline_style(tag, style, position);
            }

            if let Some(pos) = position {
                ancestry.push(self.facts[pos].kind());
                stack.push(Step::Exit);
            }
            let in_label = in_label || tag == "label";
            let children: Vec<ElementRef<'_>> =
                element.children().filter_map(ElementRef::wrap).collect();
            stack.extend(children.into_iter().rev().map(|c| Step::Enter(c, in_label)));
        }
    }

    fn classify(&mut self, element: ElementRef<'_>, in_label: bool) -> Option<FactKind> {
        let el = element.value();
        let tag = el.name();
        let role = el.attr("role").and_then(first_role);

        let kind = match tag {
            "html" if self.is_document => FactKind::Root {
                lang: el
                    .attr("lang")
                    .or_else(|| el.attr("xml:lang"))
                    .map(|l| l.trim().to_string()),
            },
            "html" => return None,
            "img" => FactKind::Image {
                alt: el.attr("alt").map(str::to_string),
                role,
            },
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => FactKind::Heading {
                level: tag[1..].parse().unwrap_or(1),
            },
            "a" | "area" if el.attr("href").is_some() => FactKind::Link {
                href: el.attr("href").unwrap_or_default().to_string(),
                name: link_name(element),
            },
            "input" | "select" | "textarea" => {
                let input_type = if tag == "input" {
                    el.attr("type").unwrap_or("text").trim().to_lowercase()
                } else {
                    tag.to_string()
                };
                FactKind::Input {
                    control: tag.to_string(),
                    input_type,
                    label: self.label_source(element, in_label),
                    placeholder: el.attr("placeholder").map(str::to_string),
                }
            }
            _ => {
                let tabindex = self.tabindex(element);
                let native = NATIVE_INTERACTIVE.contains(&tag);
                match role.as_deref() {
                    Some(r) if LANDMARK_ROLES.contains(&r) => FactKind::Landmark {
                        role: r.to_string(),
                    },
                    Some("presentation") | Some("none")
                        if !native
                            && el.attr("onclick").is_none()
                            && el.attr("tabindex").is_none() =>
                    {
                        return None
                    }
                    Some(r) => FactKind::Interactive {
                        role: Some(r.to_string()),
                        native,
                        tabindex,
                    },
                    None if native
                        || el.attr("onclick").is_some()
                        || el.attr("tabindex").is_some() =>
                    {
                        FactKind::Interactive {
                            role: None,
                            native,
                            tabindex,
                        }
                    }
                    None => FactKind::Landmark {
                        role: implicit_landmark(tag)?.to_string(),
                    },
                }
            }
        };

        Some(kind)
    }

    fn tabindex(&mut self, element: ElementRef<'_>) -> Option<i32> {
        let raw = element.value().attr("tabindex")?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                debug!("Ignoring non-numeric tabindex {:?}", raw);
                self.warnings += 1;
                None
            }
        }
    }

    fn label_source(&self, element: ElementRef<'_>, in_label: bool) -> LabelSource {
        let el = element.value();
        let non_blank = |name: &str| el.attr(name).is_some_and(|v| !v.trim().is_empty());

        if el
            .attr("id")
            .is_some_and(|id| self.label_targets.contains(id.trim()))
        {
            LabelSource::Explicit
        } else if in_label {
            LabelSource::Wrapped
        } else if non_blank("aria-labelledby") {
            LabelSource::AriaLabelledBy
        } else if non_blank("aria-label") {
            LabelSource::AriaLabel
        } else if non_blank("title") {
            LabelSource::Title
        } else {
            LabelSource::Missing
        }
    }

    fn read_inline_style(&mut self, tag: &str, style_attr: &str, element_ref: Option<usize>) {
        let decls = style::parse_declarations(style_attr);
        let colors = style::colors_from_declarations(&decls);
        self.warnings += colors.unparseable;

        if let Some((foreground, background, text_size)) = colors.pair {
            self.color_pairs.push(ColorPair {
                foreground,
                background,
                text_size,
                element_ref,
            });
        }

        if style::suppresses_focus(style_attr) {
            self.focus_suppressions.push(FocusSuppression::Inline {
                tag: tag.to_string(),
                element_ref,
            });
        }
    }

    fn read_stylesheet(&mut self, element: ElementRef<'_>) {
        let css: String = element.text().collect();
        for selector in style::focus_suppressing_selectors(&css) {
            self.focus_suppressions
                .push(FocusSuppression::Stylesheet { selector });
        }
    }
}

fn first_role(value: &str) -> Option<String> {
    value
        .split_whitespace()
        .next()
        .map(|r| r.to_lowercase())
}

fn implicit_landmark(tag: &str) -> Option<&'static str> {
    match tag {
        "header" => Some("banner"),
        "nav" => Some("navigation"),
        "main" => Some("main"),
        "footer" => Some("contentinfo"),
        "aside" => Some("complementary"),
        "form" => Some("form"),
        "search" => Some("search"),
        _ => None,
    }
}

/// Text content plus alt text of nested images, whitespace collapsed
fn link_name(element: ElementRef<'_>) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(text) => parts.push(text),
            Node::Element(el) if el.name() == "img" => {
                if let Some(alt) = el.attr("alt") {
                    parts.push(alt);
                }
            }
            _ => {}
        }
    }
    collapse_whitespace(parts.into_iter())
}

fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for word in parts.flat_map(str::split_whitespace) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let cut: String = value.chars().take(max).collect();
        format!("{}...", cut)
    }
}
