//! Pure structural diff and stop-rule evaluation (no filesystem IO).
//!
//! Input: raw file text for two config trees plus compiled rules.
//! Output: a [`DiffResult`] and a [`ValidationResult`](envdelta_types::ValidationResult).

#![forbid(unsafe_code)]

pub mod canonical;
pub mod classify;
pub mod error;
pub mod model;
pub mod path_expr;
pub mod policy;
pub mod stop_rules;
pub mod yaml;

mod engine;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use classify::{DiffOptions, classify};
pub use engine::validate;
pub use error::{DiffError, RuleError, Side};
pub use model::{AddedFile, ChangedFile, DiffResult, FileBody, ValueTree};
pub use path_expr::{Location, PathEngine, PathExpression};
pub use policy::{PatternRuleSet, PatternSource, RuleSets, StopRuleSet, compile_stop_rules};
