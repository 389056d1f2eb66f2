//! Shared test fixtures for GridForge crates.
//!
//! This crate only holds input data. It does NOT depend on any other
//! GridForge crate, so every crate can use it as a dev-dependency without
//! creating a cycle.
//!
//! - [`documents`] - constraint documents with known parse results or solutions
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! gridforge-test = { workspace = true }
//! ```
//!
//! ```ignore
//! use gridforge_test::documents::PINNED_CORNER;
//! ```

pub mod documents;

pub use documents::{CONTRADICTION, PINNED_CORNER};
