//! Plotmark - graph blocks compiled into cached images
//!
//! Plotmark turns a small text DSL describing a 2-D plot into a validated,
//! canonical specification, fingerprints it, and produces a PNG for it either
//! from a cache or by asking an external renderer that answers asynchronously.
//!
//! # Architecture Overview
//!
//! ```text
//! source text ─ dsl::parse ─→ Spec ─┬─ fingerprint ─→ cache lookup ─ hit ─→ image
//!                                   └─ PlotRequest ─→ Renderer ··· CompletionMessage
//!                                                                      │
//!                                         CompletionRouter ←───────────┘
//! ```
//!
//! - Parsing is pure and synchronous. Every failure is a typed [`dsl::ParseError`].
//! - The fingerprint is a SHA-256 over a canonical encoding of the graph, so
//!   equivalent sources share it and it is stable across runs.
//! - The cache is keyed only by fingerprint. It lives in memory or as
//!   `<prefix>-graph-<fingerprint>.png` files in a directory.
//! - The renderer is external. Completions arrive unordered and are routed to
//!   pending requests by fingerprint; completions from an untrusted origin are
//!   dropped.
//!
//! # Modules
//!
//! - [`dsl`] - DSL parser, field schema, modifiers and fingerprinting
//! - [`cache`] - In-memory and filesystem image caches
//! - [`render`] - Render coordinator, renderer protocol and completion routing
//! - [`config`] - User settings (`~/.plotmark/config.toml`)
//! - [`cli`] - Command-line interface
//! - [`core`] - Error aggregation and user-facing error display
//!
//! # DSL Example
//!
//! ```text
//! width=600; height=400
//! left=-5; right=5
//! ---
//! y=x^2|dashed|red
//! y=sin(x)|#00aa00|0<x|x<6
//! (1,2)|cross
//! ```
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Validate a graph block and print its fingerprint
//! plotmark check graph.txt
//!
//! # Print the renderer commands as JSON
//! plotmark commands graph.txt
//!
//! # Where would this graph be cached?
//! plotmark cache path graph.txt --root ~/notes
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod dsl;
pub mod render;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
