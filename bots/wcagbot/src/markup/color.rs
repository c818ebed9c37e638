// SPDX-License-Identifier: PMPL-1.0-or-later
//! Literal CSS colour and font-size values.
//!
//! Only literal values are understood: hex, `rgb()`/`rgba()` and the
//! basic named colours. Custom properties, `currentcolor` and anything
//! else that needs the cascade resolve to `None`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static RGB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"rgba?\(\s*(\d{1,3})\s*[,\s]\s*(\d{1,3})\s*[,\s]\s*(\d{1,3})").expect("valid regex")
});

static FONT_SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?|\.\d+)\s*(pt|px|em|rem|%)?$").expect("valid regex")
});

/// An sRGB colour with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::str::FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color(s).ok_or_else(|| format!("Unrecognised colour: {}", s))
    }
}

/// Text size class for contrast thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    #[default]
    Normal,
    /// At least 18pt, or at least 14pt bold
    Large,
}

impl TextSize {
    pub fn classify(points: f64, bold: bool) -> Self {
        if points >= 18.0 || (bold && points >= 14.0) {
            TextSize::Large
        } else {
            TextSize::Normal
        }
    }
}

impl std::fmt::Display for TextSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextSize::Normal => write!(f, "normal"),
            TextSize::Large => write!(f, "large"),
        }
    }
}

/// Parse a CSS hex colour (#rgb, #rrggbb, alpha digits ignored)
pub fn parse_hex_color(hex: &str) -> Option<Rgb> {
    let hex = hex.trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 | 4 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 1].repeat(2), 16).ok();
            Some(Rgb::new(channel(0)?, channel(1)?, channel(2)?))
        }
        6 | 8 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
        }
        _ => None,
    }
}

/// Parse an rgb() or rgba() colour; the alpha channel is ignored
pub fn parse_rgb_color(value: &str) -> Option<Rgb> {
    let caps = RGB_RE.captures(value)?;
    let r: u8 = caps[1].parse().ok()?;
    let g: u8 = caps[2].parse().ok()?;
    let b: u8 = caps[3].parse().ok()?;
    Some(Rgb::new(r, g, b))
}

/// Parse a named CSS colour
pub fn parse_named_color(name: &str) -> Option<Rgb> {
    let (r, g, b) = match name {
        "white" => (255, 255, 255),
        "black" => (0, 0, 0),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "gray" | "grey" => (128, 128, 128),
        "darkgray" | "darkgrey" => (169, 169, 169),
        "lightgray" | "lightgrey" => (211, 211, 211),
        "silver" => (192, 192, 192),
        "maroon" => (128, 0, 0),
        "olive" => (128, 128, 0),
        "lime" => (0, 255, 0),
        "aqua" | "cyan" => (0, 255, 255),
        "teal" => (0, 128, 128),
        "navy" => (0, 0, 128),
        "fuchsia" | "magenta" => (255, 0, 255),
        "purple" => (128, 0, 128),
        "orange" => (255, 165, 0),
        _ => return None,
    };
    Some(Rgb::new(r, g, b))
}

/// Parse any literal CSS colour value
pub fn parse_color(value: &str) -> Option<Rgb> {
    let trimmed = value
        .trim()
        .trim_end_matches("!important")
        .trim()
        .to_lowercase();
    if trimmed.starts_with('#') {
        parse_hex_color(&trimmed)
    } else if trimmed.starts_with("rgb") {
        parse_rgb_color(&trimmed)
    } else {
        parse_named_color(&trimmed)
    }
}

/// Colour out of a `background` shorthand such as `url(a.png) #fff no-repeat`
pub fn parse_background(value: &str) -> Option<Rgb> {
    parse_color(value).or_else(|| {
        value
            .split_whitespace()
            .find_map(|token| parse_color(token.trim_end_matches(',')))
    })
}

/// Font size in points. Relative units assume a 16px (12pt) root size.
pub fn font_size_points(value: &str) -> Option<f64> {
    let lowered = value.trim().to_lowercase();
    let caps = FONT_SIZE_RE.captures(&lowered)?;
    let number: f64 = caps[1].parse().ok()?;
    let points = match caps.get(2).map(|m| m.as_str()) {
        Some("pt") => number,
        Some("px") | None => number * 0.75,
        Some("em") | Some("rem") => number * 12.0,
        Some("%") => number / 100.0 * 12.0,
        Some(_) => return None,
    };
    Some(points)
}

/// Whether a `font-weight` value is bold
pub fn is_bold(value: &str) -> bool {
    let lowered = value.trim().to_lowercase();
    match lowered.as_str() {
        "bold" | "bolder" => true,
        other => other.parse::<u16>().map(|w| w >= 700).unwrap_or(false),
    }
}
