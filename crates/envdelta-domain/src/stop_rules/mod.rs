//! Stop rules: one module per rule type, each pushing violations into a
//! shared output vector.

use crate::model::ValueTree;
use crate::path_expr::PathEngine;
use crate::policy::CompiledStopRule;
use envdelta_types::{RepoPath, StopRule, StopRuleViolation};

mod numeric;
mod regex_match;
mod semver;
mod semver_downgrade;
mod semver_major_upgrade;
mod utils;
mod version_format;


pub use version_format::check_version_format;

/// The two sides of one changed file, as seen by every rule.
pub(crate) struct RuleInput<'a> {
    pub engine: &'a PathEngine,
    pub file: &'a RepoPath,
    /// Deployed (destination) tree.
    pub old_tree: &'a ValueTree,
    /// Incoming (processed source) tree.
    pub new_tree: &'a ValueTree,
}

pub(crate) fn run(input: &RuleInput<'_>, compiled: &CompiledStopRule, out: &mut Vec<StopRuleViolation>) {
    match &compiled.rule {
        StopRule::SemverMajorUpgrade { path } => {
            semver_major_upgrade::run(input, &compiled.rule, path, out)
        }
        StopRule::SemverDowngrade { path } => semver_downgrade::run(input, &compiled.rule, path, out),
        StopRule::Numeric { path, min, max } => {
            numeric::run(input, &compiled.rule, path, *min, *max, out)
        }
        StopRule::VersionFormat { path, v_prefix } => {
            version_format::run(input, &compiled.rule, path, *v_prefix, out)
        }
        StopRule::Regex { path, .. }
        | StopRule::RegexFile { path, .. }
        | StopRule::RegexFileKey { path, .. } => {
            regex_match::run(input, compiled, path.as_deref(), out)
        }
    }
}
