//! Use case orchestration for envdelta.
//!
//! This crate provides the application layer: it resolves configuration,
//! runs classification and validation, and renders the outcome. It does not
//! read config trees from disk; callers hand it file contents.

#![forbid(unsafe_code)]

mod compare;
mod render;

pub use compare::{
    CompareInput, CompareOutput, RunMode, exit_code, run_compare, validate_changes,
};
pub use render::{CompareReport, render_markdown, serialize_report};
