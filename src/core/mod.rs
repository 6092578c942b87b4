//! Core error handling for plotmark
//!
//! Library modules define their own error enums close to the code that
//! raises them. This module ties them together for the command line:
//!
//! - [`PlotmarkError`] collects every failure mode behind one type
//! - [`ErrorContext`] pairs an error with a suggestion and details
//! - [`user_friendly_error`] turns any [`anyhow::Error`] into an [`ErrorContext`]
//! - [`display_chain`] flattens an error and its sources into one line for logs

pub mod error;

pub use error::{ErrorContext, PlotmarkError, display_chain, user_friendly_error};
