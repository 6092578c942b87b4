//! Text to [`Spec`] compilation.

use super::error::ParseError;
use super::fields::{FieldKey, Fields};
use super::modifier::{Modifier, classify};
use super::{Equation, Spec};

/// Separator between the settings block and the equation body.
pub const SEGMENT_SEPARATOR: &str = "---";

/// Characters that may not appear in expressions, restrictions or text values.
pub const BANNED_CHARACTERS: [char; 3] = ['"', '\'', '`'];

/// Compile a graph specification.
///
/// The source is either a body of equation lines, or a settings block and a
/// body separated by `---`. The parser is total: any input yields either a
/// fully validated [`Spec`] or the first [`ParseError`] encountered.
///
/// # Errors
///
/// See [`ParseError`] for the individual failure kinds.
///
/// # Examples
///
/// ```rust
/// use plotmark::dsl::parse;
///
/// let spec = parse("width=10;height=20---y=x").unwrap();
/// assert_eq!(spec.fields().width(), 10);
/// assert_eq!(spec.equations()[0].expression(), "y=x");
/// ```
pub fn parse(source: &str) -> Result<Spec, ParseError> {
    let segments: Vec<&str> = source.split(SEGMENT_SEPARATOR).collect();
    let (settings, body) = match segments.as_slice() {
        [body] => (None, *body),
        [settings, body] => (Some(*settings), *body),
        _ => {
            return Err(ParseError::TooManySegments {
                found: segments.len(),
            });
        }
    };

    let fields = match settings {
        Some(block) => parse_fields(block)?,
        None => Fields::default(),
    };

    let equations = body
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_equation)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Spec::new(equations, fields))
}

fn parse_fields(block: &str) -> Result<Fields, ParseError> {
    let mut overrides = Vec::new();

    for entry in block.split([';', '\n']).map(str::trim).filter(|entry| !entry.is_empty()) {
        let Some((key, value)) = entry.split_once('=') else {
            return Err(ParseError::MissingFieldValue {
                key: entry.to_string(),
            });
        };
        let (key, value) = (key.trim(), value.trim());

        let field = FieldKey::from_name(key).ok_or_else(|| ParseError::UnrecognizedField {
            key: key.to_string(),
        })?;

        if value.is_empty() {
            return Err(ParseError::MissingFieldValue {
                key: key.to_string(),
            });
        }

        let parsed = value.parse::<i64>().map_err(|_| ParseError::InvalidFieldType {
            key: key.to_string(),
            value: value.to_string(),
        })?;
        overrides.push((field, parsed));
    }

    Fields::with_overrides(overrides)
}

fn parse_equation(line: &str) -> Result<Equation, ParseError> {
    let mut segments = line.split('|').map(str::trim);
    let expression = segments.next().unwrap_or_default();
    if expression.is_empty() {
        return Err(ParseError::EmptyExpression {
            line: line.to_string(),
        });
    }
    check_banned(expression)?;

    let mut equation = Equation::new(expression);
    for token in segments.filter(|token| !token.is_empty()) {
        match classify(token) {
            Modifier::Style(style) => {
                if let Some(first) = equation.style {
                    return Err(ParseError::DuplicateStyle {
                        expression: equation.expression,
                        first: first.to_string(),
                        second: token.to_string(),
                    });
                }
                equation.style = Some(style);
            }
            Modifier::Color(color) => {
                if let Some(first) = &equation.color {
                    return Err(ParseError::DuplicateColor {
                        first: first.to_string(),
                        expression: equation.expression,
                        second: token.to_string(),
                    });
                }
                equation.color = Some(color);
            }
            Modifier::Restriction(fragment) => {
                check_banned(&fragment)?;
                equation.restrictions.push(fragment);
            }
        }
    }

    Ok(equation)
}

/// Reject values containing any of [`BANNED_CHARACTERS`].
///
/// # Errors
///
/// Returns [`ParseError::BannedCharacter`] naming the first banned character.
pub fn check_banned(value: &str) -> Result<(), ParseError> {
    match value.chars().find(|c| BANNED_CHARACTERS.contains(c)) {
        Some(character) => Err(ParseError::BannedCharacter {
            character,
            value: value.to_string(),
        }),
        None => Ok(()),
    }
}
