//! Test utilities for plotmark
//!
//! Shared by unit tests and the integration suite (enable the `test-utils`
//! feature outside `cfg(test)`):
//! - [`init_test_logging`] installs a test-writer subscriber once
//! - [`FakeRenderer`] stands in for the external renderer and answers through a
//!   [`CompletionRouter`](crate::render::CompletionRouter)
//!
//! # Example
//!
//! ```rust,no_run
//! use bytes::Bytes;
//! use plotmark::render::CompletionRouter;
//! use plotmark::test_utils::FakeRenderer;
//!
//! let router = CompletionRouter::new("app://test");
//! let renderer = FakeRenderer::succeeding(&router, Bytes::from_static(b"png"));
//! assert_eq!(renderer.submissions(), 0);
//! ```

mod renderer;

pub use renderer::{FakeMode, FakeRenderer};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests, once per process.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=plotmark=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true) // Show module targets like "plotmark::render"
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
