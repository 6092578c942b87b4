//! Error handling for plotmark
//!
//! Library components return their own strongly-typed errors:
//! [`ParseError`] from the DSL compiler, [`CacheError`] from cache backends and
//! [`RenderError`] from the render coordinator. At the application boundary
//! they are collected into [`PlotmarkError`] and wrapped in an
//! [`ErrorContext`], which adds an actionable suggestion and details for the
//! terminal.
//!
//! # Examples
//!
//! ```rust,no_run
//! use plotmark::core::user_friendly_error;
//! use plotmark::dsl::parse;
//!
//! if let Err(e) = parse("x=1|SOLID|SOLID") {
//!     let ctx = user_friendly_error(anyhow::Error::from(e));
//!     ctx.display(); // error, details and suggestion in color
//! }
//! ```

use std::fmt;

use colored::Colorize;
use thiserror::Error;

use crate::cache::CacheError;
use crate::dsl::{FieldKey, ParseError};
use crate::render::RenderError;

/// Top-level error for plotmark operations.
#[derive(Error, Debug)]
pub enum PlotmarkError {
    /// The graph specification did not compile
    #[error("Invalid graph specification: {0}")]
    Parse(#[from] ParseError),

    /// The external renderer failed or could not be reached
    #[error(transparent)]
    Render(#[from] RenderError),

    /// A cache entry could not be read or written
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Input file missing or unreadable
    #[error("Cannot read graph specification from {path}")]
    InputUnreadable {
        /// The path that was requested
        path: String,
        /// Why it could not be read
        reason: String,
    },

    /// Configuration file invalid
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Anything not covered above
    #[error("{message}")]
    Other {
        /// Error message, including its cause chain
        message: String,
    },
}

/// An error with an optional suggestion and details for display.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: PlotmarkError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub fn new(error: PlotmarkError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print to stderr with colored labels.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// An error and its sources joined with `": "`.
#[must_use]
pub fn display_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Convert any error into an [`ErrorContext`] with suggestions.
///
/// Known plotmark errors get tailored suggestions; I/O and TOML errors are
/// mapped to their closest category; anything else keeps its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<PlotmarkError>() {
        Ok(error) => return create_error_context(error),
        Err(error) => error,
    };
    let error = match error.downcast::<ParseError>() {
        Ok(error) => return create_error_context(PlotmarkError::Parse(error)),
        Err(error) => error,
    };
    let error = match error.downcast::<RenderError>() {
        Ok(error) => return create_error_context(PlotmarkError::Render(error)),
        Err(error) => error,
    };
    let error = match error.downcast::<CacheError>() {
        Ok(error) => return create_error_context(PlotmarkError::Cache(error)),
        Err(error) => error,
    };

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(PlotmarkError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion(
            "Check the TOML syntax of your plotmark config. Valid cache locations are \"memory\" and \"filesystem\"",
        )
        .with_details("Run 'plotmark config show' to see the effective configuration");
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(PlotmarkError::Other {
                    message: format_with_chain(&error),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(PlotmarkError::Other {
                    message: format_with_chain(&error),
                })
                .with_suggestion("Check the file permissions or run from a directory you can write to");
            }
            _ => {}
        }
    }

    ErrorContext::new(PlotmarkError::Other {
        message: format_with_chain(&error),
    })
}

fn format_with_chain(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }
    message
}

fn field_names() -> String {
    FieldKey::ALL.iter().map(|key| key.name()).collect::<Vec<_>>().join(", ")
}

fn create_error_context(error: PlotmarkError) -> ErrorContext {
    match &error {
        PlotmarkError::Parse(parse_error) => {
            let kind = parse_error.kind();
            let (suggestion, details) = match parse_error {
                ParseError::TooManySegments { .. } => (
                    "Use a single '---' line between the settings block and the equations".to_string(),
                    "A graph is either equation lines only, or settings, '---', then equation lines".to_string(),
                ),
                ParseError::MissingFieldValue { .. } => (
                    "Write settings as key=value pairs separated by ';' or new lines, e.g. width=600; height=400".to_string(),
                    "Every settings entry needs a key, an '=' and a value".to_string(),
                ),
                ParseError::InvalidFieldType { key, .. } => (
                    format!("Use a whole number for '{key}', e.g. {key}=10"),
                    "All settings fields are integers".to_string(),
                ),
                ParseError::UnrecognizedField { .. } => (
                    format!("Recognized fields are: {}", field_names()),
                    "Field names are case-sensitive".to_string(),
                ),
                ParseError::BannedCharacter { .. } => (
                    "Remove quotes (\" and ') and backticks from expressions and restrictions".to_string(),
                    "These characters cannot be passed safely to the renderer".to_string(),
                ),
                ParseError::DuplicateStyle { .. } | ParseError::DuplicateColor { .. } => (
                    "Keep at most one style and one color per equation".to_string(),
                    "Styles are solid, dashed, dotted, point, open and cross; colors are red, blue, green, purple, orange, black or a #hex value".to_string(),
                ),
                ParseError::InvalidBoundary { lower_name, upper_name, .. } => (
                    format!("Make '{lower_name}' smaller than '{upper_name}'"),
                    "The viewport needs left < right and bottom < top".to_string(),
                ),
                ParseError::EmptyExpression { .. } => (
                    "Start each equation line with an expression before any '|' modifiers".to_string(),
                    "Modifiers apply to the expression that precedes them".to_string(),
                ),
            };
            ErrorContext::new(error)
                .with_suggestion(suggestion)
                .with_details(format!("{kind}: {details}"))
        }

        PlotmarkError::Render(RenderError::RenderFailed { .. }) => ErrorContext::new(error)
            .with_suggestion("Check the equations for expressions the renderer cannot plot")
            .with_details("The message above is reported by the renderer verbatim"),

        PlotmarkError::Render(RenderError::RendererUnavailable { .. }) => ErrorContext::new(error)
            .with_suggestion("Make sure the rendering surface is loaded and reachable"),

        PlotmarkError::Cache(CacheError::DirectoryMissing { .. }) => ErrorContext::new(error)
            .with_suggestion("Create the cache directory or change cache.directory in your config")
            .with_details("plotmark never creates the cache directory itself"),

        PlotmarkError::InputUnreadable { reason, .. } => {
            let reason = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Pass the path to a graph file, or '-' to read from stdin")
                .with_details(reason)
        }

        _ => ErrorContext::new(error),
    }
}
