//! Equation modifiers: styles, colors and restriction fragments.
//!
//! Each `|`-separated segment after an expression is classified by
//! [`classify`] into exactly one [`Modifier`]. Styles take precedence over
//! colors, and anything that is neither becomes a restriction fragment.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[A-Za-z0-9]+$").expect("hex color pattern is valid")
});

/// Line or point style of a plotted equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Style {
    Solid,
    Dashed,
    Dotted,
    Point,
    Open,
    Cross,
}

impl Style {
    pub const ALL: [Self; 6] =
        [Self::Solid, Self::Dashed, Self::Dotted, Self::Point, Self::Open, Self::Cross];

    /// Canonical token for this style.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Solid => "SOLID",
            Self::Dashed => "DASHED",
            Self::Dotted => "DOTTED",
            Self::Point => "POINT",
            Self::Open => "OPEN",
            Self::Cross => "CROSS",
        }
    }

    /// Case-insensitive match against the style names.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|style| style.name().eq_ignore_ascii_case(token))
    }

    /// Whether the style applies to points rather than lines.
    #[must_use]
    pub const fn is_point_style(self) -> bool {
        matches!(self, Self::Point | Self::Open | Self::Cross)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A color with a canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NamedColor {
    Red,
    Blue,
    Green,
    Purple,
    Orange,
    Black,
}

impl NamedColor {
    pub const ALL: [Self; 6] =
        [Self::Red, Self::Blue, Self::Green, Self::Purple, Self::Orange, Self::Black];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Blue => "BLUE",
            Self::Green => "GREEN",
            Self::Purple => "PURPLE",
            Self::Orange => "ORANGE",
            Self::Black => "BLACK",
        }
    }

    /// Hex value the renderer uses for this color.
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Red => "#c74440",
            Self::Blue => "#2d70b3",
            Self::Green => "#388c46",
            Self::Purple => "#6042a6",
            Self::Orange => "#fa7e19",
            Self::Black => "#000000",
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|color| color.name().eq_ignore_ascii_case(token))
    }
}

/// Color of a plotted equation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Color {
    /// One of the named colors, normalized to its canonical constant
    Named(NamedColor),
    /// A `#`-prefixed hex color, casing preserved as written
    Hex(String),
}

impl Color {
    /// Hex value handed to the renderer.
    #[must_use]
    pub fn hex(&self) -> &str {
        match self {
            Self::Named(named) => named.hex(),
            Self::Hex(hex) => hex,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(named) => f.write_str(named.name()),
            Self::Hex(hex) => f.write_str(hex),
        }
    }
}

/// A classified modifier segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modifier {
    Style(Style),
    Color(Color),
    /// Raw restriction fragment, not yet wrapped in braces
    Restriction(String),
}

/// Classify a trimmed modifier segment.
///
/// Precedence is style, then color (named or hex), then restriction.
#[must_use]
pub fn classify(token: &str) -> Modifier {
    if let Some(style) = Style::from_token(token) {
        return Modifier::Style(style);
    }
    if let Some(named) = NamedColor::from_token(token) {
        return Modifier::Color(Color::Named(named));
    }
    if HEX_COLOR.is_match(token) {
        return Modifier::Color(Color::Hex(token.to_string()));
    }
    Modifier::Restriction(token.to_string())
}
