use crate::model::{DiffResult, FileBody};
use crate::path_expr::PathEngine;
use crate::policy::StopRuleSet;
use crate::stop_rules::{self, RuleInput};
use envdelta_types::{StopRuleViolation, ValidationResult};

/// Evaluate stop rules against every changed file.
///
/// Added, deleted and unchanged files are not inspected, nor are files
/// compared as text. Violations come out grouped by file, then in rule
/// declaration order.
pub fn validate(engine: &PathEngine, diff: &DiffResult, stop_rules: &StopRuleSet) -> ValidationResult {
    let mut violations: Vec<StopRuleViolation> = Vec::new();

    for changed in &diff.changed_files {
        let rules = stop_rules.rules_for(changed.path.as_str());
        if rules.is_empty() {
            continue;
        }
        let (FileBody::Structured(new_tree), FileBody::Structured(old_tree)) =
            (&changed.processed_source_content, &changed.processed_dest_content)
        else {
            tracing::trace!(file = %changed.path, "skipping stop rules for text file");
            continue;
        };

        let input = RuleInput {
            engine,
            file: &changed.path,
            old_tree,
            new_tree,
        };
        for rule in rules {
            stop_rules::run(&input, rule, &mut violations);
        }
    }

    // Stable: keeps rule order within a file.
    violations.sort_by(|a, b| a.file.cmp(&b.file));

    tracing::debug!(violations = violations.len(), "validated changed files");
    ValidationResult::from_violations(violations)
}
