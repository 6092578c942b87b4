//! Errors produced while compiling a graph specification.

use thiserror::Error;

/// A graph specification that could not be compiled.
///
/// Every variant carries the offending key, value, or segment so the caller can
/// render a precise message in place of the graph. Parsing stops at the first
/// error; there is no partial result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// More than one `---` separator was found.
    #[error("Too many segments: expected at most one '---' separator, found {found} segments")]
    TooManySegments {
        /// Number of segments the source split into
        found: usize,
    },

    /// A settings entry had no `=` or an empty value.
    #[error("Field '{key}' is missing a value")]
    MissingFieldValue {
        /// The settings entry as written
        key: String,
    },

    /// A settings value did not match the field's type.
    #[error("Field '{key}' expects an integer, got '{value}'")]
    InvalidFieldType {
        /// Field name
        key: String,
        /// The rejected value
        value: String,
    },

    /// A settings key is not part of the field schema.
    #[error("Unrecognized field '{key}'")]
    UnrecognizedField {
        /// The unknown key
        key: String,
    },

    /// An expression or restriction contains a quote or backtick.
    #[error("Banned character {character:?} in '{value}'")]
    BannedCharacter {
        /// The first banned character found
        character: char,
        /// The segment that contained it
        value: String,
    },

    /// An equation carries two style tokens.
    #[error("Equation '{expression}' has more than one style: '{first}' and '{second}'")]
    DuplicateStyle {
        /// Expression of the offending equation
        expression: String,
        /// Style that was already set
        first: String,
        /// Style token that conflicted with it
        second: String,
    },

    /// An equation carries two color tokens.
    #[error("Equation '{expression}' has more than one color: '{first}' and '{second}'")]
    DuplicateColor {
        /// Expression of the offending equation
        expression: String,
        /// Color that was already set
        first: String,
        /// Color token that conflicted with it
        second: String,
    },

    /// A lower bound is not strictly below its upper bound.
    #[error("Invalid boundary: {lower_name} ({lower}) must be less than {upper_name} ({upper})")]
    InvalidBoundary {
        /// Name of the lower bound field (`left` or `bottom`)
        lower_name: &'static str,
        /// Value of the lower bound
        lower: i64,
        /// Name of the upper bound field (`right` or `top`)
        upper_name: &'static str,
        /// Value of the upper bound
        upper: i64,
    },

    /// An equation line starts with `|`, leaving no expression.
    #[error("Equation line '{line}' has no expression")]
    EmptyExpression {
        /// The equation line as written
        line: String,
    },
}

impl ParseError {
    /// Short, stable name of the error kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TooManySegments { .. } => "TooManySegments",
            Self::MissingFieldValue { .. } => "MissingFieldValue",
            Self::InvalidFieldType { .. } => "InvalidFieldType",
            Self::UnrecognizedField { .. } => "UnrecognizedField",
            Self::BannedCharacter { .. } => "BannedCharacter",
            Self::DuplicateStyle { .. } => "DuplicateStyle",
            Self::DuplicateColor { .. } => "DuplicateColor",
            Self::InvalidBoundary { .. } => "InvalidBoundary",
            Self::EmptyExpression { .. } => "EmptyExpression",
        }
    }
}
