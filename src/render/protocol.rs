//! Messages exchanged with the external renderer.
//!
//! Outbound, a [`PlotRequest`] carries one [`PlotCommand`] per equation plus the
//! viewport. Inbound, a [`CompletionMessage`] names the origin it came from and
//! the fingerprint it answers, and carries a [`RenderOutcome`].

use bytes::Bytes;
use serde::Serialize;

use crate::dsl::{Equation, Spec, Style};

/// Line style understood by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

/// Point style understood by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PointStyle {
    Point,
    Open,
    Cross,
}

/// A single plotting command, derived 1:1 from an equation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotCommand {
    /// Expression text with the restriction string appended
    pub latex: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_style: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_style: Option<PointStyle>,
}

impl From<&Equation> for PlotCommand {
    fn from(equation: &Equation) -> Self {
        let mut latex = equation.expression().to_string();
        if let Some(restriction) = equation.restriction() {
            latex.push_str(&restriction);
        }

        let (line_style, point_style) = match equation.style() {
            None => (None, None),
            Some(Style::Solid) => (Some(LineStyle::Solid), None),
            Some(Style::Dashed) => (Some(LineStyle::Dashed), None),
            Some(Style::Dotted) => (Some(LineStyle::Dotted), None),
            Some(Style::Point) => (None, Some(PointStyle::Point)),
            Some(Style::Open) => (None, Some(PointStyle::Open)),
            Some(Style::Cross) => (None, Some(PointStyle::Cross)),
        };

        Self {
            latex,
            color: equation.color().map(|color| color.hex().to_string()),
            line_style,
            point_style,
        }
    }
}

/// Viewport bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bounds {
    pub left: i64,
    pub right: i64,
    pub bottom: i64,
    pub top: i64,
}

/// Everything the renderer needs to draw one spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlotRequest {
    /// Correlation key; the completion message must echo it
    pub fingerprint: String,
    pub width: i64,
    pub height: i64,
    pub bounds: Bounds,
    pub commands: Vec<PlotCommand>,
}

impl From<&Spec> for PlotRequest {
    fn from(spec: &Spec) -> Self {
        let fields = spec.fields();
        Self {
            fingerprint: spec.fingerprint().to_string(),
            width: fields.width(),
            height: fields.height(),
            bounds: Bounds {
                left: fields.left(),
                right: fields.right(),
                bottom: fields.bottom(),
                top: fields.top(),
            },
            commands: spec.equations().iter().map(PlotCommand::from).collect(),
        }
    }
}

/// Result reported by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Rendered PNG bytes
    Success(Bytes),
    /// Renderer-supplied error message
    Error(String),
}

/// A completion signal from the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionMessage {
    /// Origin of the sender; must match the trusted origin
    pub origin: String,
    /// Fingerprint of the request being answered
    pub fingerprint: String,
    pub outcome: RenderOutcome,
}

impl CompletionMessage {
    pub fn success(origin: impl Into<String>, fingerprint: impl Into<String>, image: Bytes) -> Self {
        Self {
            origin: origin.into(),
            fingerprint: fingerprint.into(),
            outcome: RenderOutcome::Success(image),
        }
    }

    pub fn error(
        origin: impl Into<String>,
        fingerprint: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            fingerprint: fingerprint.into(),
            outcome: RenderOutcome::Error(message.into()),
        }
    }
}
