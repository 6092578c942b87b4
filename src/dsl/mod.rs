//! Graph specification language.
//!
//! A graph specification is plain text: an optional settings block, a `---`
//! separator, then one equation per line. Each equation line is an expression
//! followed by `|`-separated modifiers.
//!
//! ```text
//! width=800; height=400
//! left=-5; right=5
//! ---
//! y=x^2|dashed|red
//! y=\sin(x)|#00aa88|x>0|x<6
//! ```
//!
//! [`parse`] compiles such text into an immutable [`Spec`] whose
//! [`fingerprint`](Spec::fingerprint) is computed once and used as the render
//! cache key.
//!
//! # Modifiers
//!
//! Modifiers are matched case-insensitively, in this order:
//! 1. a style name (`solid`, `dashed`, `dotted`, `point`, `open`, `cross`)
//! 2. a color name (`red`, `blue`, `green`, `purple`, `orange`, `black`) or a
//!    `#`-prefixed hex color
//! 3. anything else is a restriction fragment; fragments accumulate as
//!    `{fragment}` in the order written

pub mod error;
pub mod fields;
pub mod fingerprint;
pub mod modifier;
mod parser;

use std::fmt;

use serde::Serialize;

pub use error::ParseError;
pub use fields::{FieldKey, Fields};
pub use modifier::{Color, Modifier, NamedColor, Style, classify};
pub use parser::{BANNED_CHARACTERS, SEGMENT_SEPARATOR, check_banned, parse};

/// One plotted expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Equation {
    pub(crate) expression: String,
    pub(crate) style: Option<Style>,
    pub(crate) color: Option<Color>,
    pub(crate) restrictions: Vec<String>,
}

impl Equation {
    pub(crate) fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            style: None,
            color: None,
            restrictions: Vec::new(),
        }
    }

    /// Expression text exactly as written, trimmed.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    #[must_use]
    pub fn style(&self) -> Option<Style> {
        self.style
    }

    #[must_use]
    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }

    /// Restriction fragments in the order they were written, without braces.
    #[must_use]
    pub fn restrictions(&self) -> &[String] {
        &self.restrictions
    }

    /// Accumulated restriction string, each fragment wrapped in `{}`.
    ///
    /// `None` when the equation has no restriction fragments.
    #[must_use]
    pub fn restriction(&self) -> Option<String> {
        if self.restrictions.is_empty() {
            return None;
        }
        Some(self.restrictions.iter().map(|fragment| format!("{{{fragment}}}")).collect())
    }
}

impl fmt::Display for Equation {
    /// Writes the equation back as a DSL line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)?;
        if let Some(style) = self.style {
            write!(f, "|{style}")?;
        }
        if let Some(color) = &self.color {
            write!(f, "|{color}")?;
        }
        for fragment in &self.restrictions {
            write!(f, "|{fragment}")?;
        }
        Ok(())
    }
}

/// A validated graph specification.
///
/// Immutable once constructed; the fingerprint is computed in the constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Spec {
    equations: Vec<Equation>,
    fields: Fields,
    fingerprint: String,
}

impl Spec {
    pub(crate) fn new(equations: Vec<Equation>, fields: Fields) -> Self {
        let fingerprint = fingerprint::compute(&equations, &fields);
        Self {
            equations,
            fields,
            fingerprint,
        }
    }

    /// Equations in render order.
    #[must_use]
    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    #[must_use]
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Lowercase hex SHA-256 content fingerprint; the cache key for this spec.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Serialize back to DSL text.
    ///
    /// The output always carries a full settings block in schema order, so
    /// parsing it yields a spec with the same fingerprint.
    #[must_use]
    pub fn to_source(&self) -> String {
        let settings: Vec<String> = FieldKey::ALL
            .iter()
            .map(|key| format!("{}={}", key.name(), self.fields.get(*key)))
            .collect();

        let mut source = settings.join("; ");
        source.push('\n');
        source.push_str(SEGMENT_SEPARATOR);
        source.push('\n');
        for equation in &self.equations {
            source.push_str(&equation.to_string());
            source.push('\n');
        }
        source
    }
}
