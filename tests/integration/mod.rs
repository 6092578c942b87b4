//! Integration test suite for plotmark
//!
//! End-to-end tests for the public API and the `plotmark` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **dsl**: Parsing, canonical serialization and fingerprint stability
//! - **cache**: Cache service backends and directory resolution
//! - **render**: Render coordinator against a fake renderer
//! - **cli**: The `plotmark` binary

mod dsl;
mod render;
