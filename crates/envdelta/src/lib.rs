//! Structural diff and promotion-safety checks for YAML config trees.
//!
//! ```
//! use envdelta::{DiffOptions, PathEngine, RuleSets, classify};
//! use std::collections::BTreeMap;
//!
//! let source = BTreeMap::from([("app.yaml".to_string(), "items: [2, 1]\n".to_string())]);
//! let dest = BTreeMap::from([("app.yaml".to_string(), "items: [1, 2]\n".to_string())]);
//! let diff = classify(
//!     &PathEngine::new(),
//!     &source,
//!     &dest,
//!     &RuleSets::default(),
//!     &DiffOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(diff.unchanged_files.len(), 1);
//! ```

#![forbid(unsafe_code)]

pub use envdelta_domain::canonical::{equal, normalize};
pub use envdelta_domain::policy::{CompiledStopRule, InMemoryPatternSource};
pub use envdelta_domain::{
    AddedFile, ChangedFile, DiffError, DiffOptions, DiffResult, FileBody, Location, PathEngine,
    PathExpression, PatternRuleSet, PatternSource, RuleError, RuleSets, Side, StopRuleSet,
    ValueTree, classify, compile_stop_rules, validate,
};
pub use envdelta_types::{
    FixedValueRule, RepoPath, StopRule, StopRuleViolation, TransformRule, VPrefix,
    ValidationResult, ids,
};
