use super::RuleInput;
use super::utils::{collect_leaves, resolve_pair, violation};
use crate::canonical::scalar_text;
use crate::policy::CompiledStopRule;
use envdelta_types::StopRuleViolation;
use envdelta_types::ids::GLOBAL_SCAN_PATH;
use regex::Regex;

/// Shared by `regex`, `regexFile` and `regexFileKey`; they differ only in
/// where their patterns came from.
pub fn run(
    input: &RuleInput<'_>,
    compiled: &CompiledStopRule,
    path: Option<&str>,
    out: &mut Vec<StopRuleViolation>,
) {
    match path {
        Some(path) => check_path(input, compiled, path, out),
        None => scan_leaves(input, compiled, out),
    }
}

fn check_path(
    input: &RuleInput<'_>,
    compiled: &CompiledStopRule,
    path: &str,
    out: &mut Vec<StopRuleViolation>,
) {
    let Some((old, new)) = resolve_pair(input, path) else {
        return;
    };
    let Some(text) = new.or(old).and_then(scalar_text) else {
        return;
    };
    if let Some(pattern) = first_match(&compiled.patterns, &text) {
        out.push(violation(
            input,
            &compiled.rule,
            path,
            old,
            new,
            message(&text, pattern),
        ));
    }
}

fn scan_leaves(input: &RuleInput<'_>, compiled: &CompiledStopRule, out: &mut Vec<StopRuleViolation>) {
    let mut leaves = Vec::new();
    collect_leaves(input.new_tree, &mut leaves);
    for leaf in leaves {
        let Some(text) = scalar_text(leaf) else {
            continue;
        };
        if let Some(pattern) = first_match(&compiled.patterns, &text) {
            out.push(violation(
                input,
                &compiled.rule,
                GLOBAL_SCAN_PATH,
                None,
                Some(leaf),
                message(&text, pattern),
            ));
        }
    }
}

fn first_match<'p>(patterns: &'p [Regex], text: &str) -> Option<&'p Regex> {
    patterns.iter().find(|re| re.is_match(text))
}

fn message(text: &str, pattern: &Regex) -> String {
    format!("Value '{text}' matches forbidden pattern {}", pattern.as_str())
}
