// SPDX-License-Identifier: PMPL-1.0-or-later
//! Colour contrast - WCAG 1.4.3 Contrast Minimum (AA), 1.4.6 Contrast Enhanced (AAA)
//!
//! Works on literal colour pairs only: inline `color` + `background`
//! declarations picked up by the analyzer, or pairs supplied by the caller.
//! - AA: 4.5:1 for normal text, 3:1 for large text
//! - AAA: 7:1 for normal text, 4.5:1 for large text

use super::{Rule, Violation};
use crate::markup::{ColorPair, Document, Rgb, TextSize};
use serde::Serialize;

pub const CONTRAST_MINIMUM: Rule = Rule::new(
    "contrast-minimum",
    "1.4.3",
    "Text colour pairs reach the AA contrast ratio",
    check_contrast_aa,
);

pub const CONTRAST_ENHANCED: Rule = Rule::new(
    "contrast-enhanced",
    "1.4.6",
    "Text colour pairs reach the AAA contrast ratio",
    check_contrast_aaa,
);

/// Relative luminance of an sRGB colour
/// <https://www.w3.org/TR/WCAG21/#dfn-relative-luminance>
pub fn relative_luminance(color: Rgb) -> f64 {
    let linear = [color.r, color.g, color.b].map(|c| {
        let v = c as f64 / 255.0;
        if v <= 0.03928 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    });
    0.2126 * linear[0] + 0.7152 * linear[1] + 0.0722 * linear[2]
}

/// Contrast ratio between two colours, always >= 1.0
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let l1 = relative_luminance(a);
    let l2 = relative_luminance(b);
    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

/// AA minimum for a text size
pub fn aa_threshold(size: TextSize) -> f64 {
    match size {
        TextSize::Normal => 4.5,
        TextSize::Large => 3.0,
    }
}

/// AAA minimum for a text size
pub fn aaa_threshold(size: TextSize) -> f64 {
    match size {
        TextSize::Normal => 7.0,
        TextSize::Large => 4.5,
    }
}

/// Verdict against one conformance threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdCheck {
    pub required: f64,
    pub passes: bool,
}

/// Overall grade of a colour pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContrastGrade {
    AAA,
    AA,
    #[serde(rename = "FAIL")]
    Fail,
}

impl std::fmt::Display for ContrastGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContrastGrade::AAA => write!(f, "AAA"),
            ContrastGrade::AA => write!(f, "AA"),
            ContrastGrade::Fail => write!(f, "FAIL"),
        }
    }
}

/// Full contrast verdict for one foreground/background pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContrastAssessment {
    pub foreground: Rgb,
    pub background: Rgb,
    pub ratio: f64,
    pub text_size: TextSize,
    pub aa: ThresholdCheck,
    pub aaa: ThresholdCheck,
    pub grade: ContrastGrade,
}

/// Assess a colour pair against both thresholds
pub fn evaluate(foreground: Rgb, background: Rgb, text_size: TextSize) -> ContrastAssessment {
    let ratio = contrast_ratio(foreground, background);
    let aa = ThresholdCheck {
        required: aa_threshold(text_size),
        passes: ratio >= aa_threshold(text_size),
    };
    let aaa = ThresholdCheck {
        required: aaa_threshold(text_size),
        passes: ratio >= aaa_threshold(text_size),
    };
    let grade = if aaa.passes {
        ContrastGrade::AAA
    } else if aa.passes {
        ContrastGrade::AA
    } else {
        ContrastGrade::Fail
    };
    ContrastAssessment {
        foreground,
        background,
        ratio,
        text_size,
        aa,
        aaa,
        grade,
    }
}

fn check_pairs(doc: &Document, threshold: fn(TextSize) -> f64, level: &str) -> Vec<Violation> {
    doc.color_pairs
        .iter()
        .filter_map(|pair: &ColorPair| {
            let ratio = contrast_ratio(pair.foreground, pair.background);
            let required = threshold(pair.text_size);
            if ratio >= required {
                return None;
            }
            Some(
                Violation::error(format!(
                    "Contrast ratio {:.2}:1 between {} on {} is below the {} minimum of {}:1 for {} text.",
                    ratio, pair.foreground, pair.background, level, required, pair.text_size
                ))
                .at_opt(pair.element_ref)
                .with_suggestion(&format!(
                    "Darken the text or lighten the background to reach at least {}:1",
                    required
                )),
            )
        })
        .collect()
}

fn check_contrast_aa(doc: &Document) -> Vec<Violation> {
    check_pairs(doc, aa_threshold, "AA")
}

fn check_contrast_aaa(doc: &Document) -> Vec<Violation> {
    check_pairs(doc, aaa_threshold, "AAA")
}
