//! Common utilities for the wren parser crates.
//!
//! This crate provides shared infrastructure used by the DOM and HTML crates:
//! - **Warning System** - de-duplicated diagnostics routed through `tracing`

pub mod warning;
