//! Stable DTOs and IDs used across the envdelta workspace.
//!
//! This crate is intentionally boring:
//! - stop-rule definitions as they appear in user config
//! - emitted violation / validation result types
//! - stable string IDs
//! - canonical repo-relative path handling

#![forbid(unsafe_code)]

pub mod ids;
pub mod path;
pub mod receipt;
pub mod rules;

pub use path::RepoPath;
pub use receipt::{StopRuleViolation, ValidationResult};
pub use rules::{FixedValueRule, StopRule, TransformRule, VPrefix};
