//! Band style settings and the drawing directives they resolve to.

use serde::{Deserialize, Serialize};

const TRANSPARENT: &str = "transparent";

fn default_true() -> bool {
    true
}

fn default_basis_color() -> String {
    "#0066ff".into()
}

fn default_upper_color() -> String {
    "#ff3333".into()
}

fn default_lower_color() -> String {
    "#009688".into()
}

fn default_line_width() -> u32 {
    2
}

fn default_background_opacity() -> f64 {
    0.12
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

/// User-facing style settings for the three band lines and the fill between
/// upper and lower.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BandStyle {
    #[serde(default = "default_true")]
    pub show_basis: bool,
    #[serde(default = "default_true")]
    pub show_upper: bool,
    #[serde(default = "default_true")]
    pub show_lower: bool,
    #[serde(default)]
    pub show_background: bool,
    #[serde(default = "default_basis_color")]
    pub basis_color: String,
    #[serde(default = "default_upper_color")]
    pub upper_color: String,
    #[serde(default = "default_lower_color")]
    pub lower_color: String,
    #[serde(default = "default_line_width")]
    pub line_width: u32,
    #[serde(default)]
    pub line_style: LineStyle,
    pub background_color: Option<String>,
    /// Accepted range: `0.0..=1.0`
    #[serde(default = "default_background_opacity")]
    pub background_opacity: f64,
}

impl Default for BandStyle {
    fn default() -> Self {
        Self {
            show_basis: true,
            show_upper: true,
            show_lower: true,
            show_background: false,
            basis_color: default_basis_color(),
            upper_color: default_upper_color(),
            lower_color: default_lower_color(),
            line_width: default_line_width(),
            line_style: LineStyle::Solid,
            background_color: None,
            background_opacity: default_background_opacity(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineDirective {
    pub color: String,
    pub width: u32,
    pub style: LineStyle,
}

/// Resolved styling for one render pass. Hidden lines come out transparent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleDirectives {
    pub basis: LineDirective,
    pub upper: LineDirective,
    pub lower: LineDirective,
    pub band_fill: String,
}

impl BandStyle {
    pub fn resolve(&self) -> StyleDirectives {
        let line = |visible: bool, color: &str| LineDirective {
            color: if visible { color.to_string() } else { TRANSPARENT.to_string() },
            width: self.line_width,
            style: self.line_style,
        };

        let band_fill = match (&self.background_color, self.show_background) {
            (Some(color), true) => rgba(color, self.background_opacity),
            _ => TRANSPARENT.to_string(),
        };

        StyleDirectives {
            basis: line(self.show_basis, &self.basis_color),
            upper: line(self.show_upper, &self.upper_color),
            lower: line(self.show_lower, &self.lower_color),
            band_fill,
        }
    }
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#').unwrap_or(color);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// `true` for `#rrggbb` (the leading `#` is optional).
pub fn is_hex_color(color: &str) -> bool {
    parse_hex(color).is_some()
}

/// Convert a hex color to a CSS `rgba()` string; unparseable colors fall
/// back to white.
pub fn rgba(color: &str, opacity: f64) -> String {
    let (r, g, b) = parse_hex(color).unwrap_or((255, 255, 255));
    format!("rgba({r}, {g}, {b}, {opacity})")
}
