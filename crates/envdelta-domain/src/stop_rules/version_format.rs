use super::RuleInput;
use super::utils::{resolve_pair, violation};
use crate::canonical::scalar_text;
use crate::model::ValueTree;
use envdelta_types::{StopRule, StopRuleViolation, VPrefix};

/// Validate a strict `major.minor.patch` version.
///
/// Checks run in a fixed order and the first failure wins:
/// empty, `v` prefix policy, pre-release/build suffix, part count,
/// non-numeric part, leading zeros.
pub fn check_version_format(text: &str, v_prefix: VPrefix) -> Result<(), &'static str> {
    if text.trim().is_empty() {
        return Err("version is empty");
    }

    let has_prefix = text.starts_with('v');
    match v_prefix {
        VPrefix::Required if !has_prefix => return Err("missing required 'v' prefix"),
        VPrefix::Forbidden if has_prefix => return Err("'v' prefix is not allowed"),
        _ => {}
    }
    let core = if has_prefix { &text[1..] } else { text };

    if core.contains(['-', '+']) {
        return Err("pre-release and build suffixes are not allowed");
    }

    let parts: Vec<&str> = core.split('.').collect();
    if parts.len() != 3 {
        return Err("expected exactly three parts (major.minor.patch)");
    }
    if parts
        .iter()
        .any(|part| part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()))
    {
        return Err("every part must be numeric");
    }
    if parts.iter().any(|part| part.len() > 1 && part.starts_with('0')) {
        return Err("leading zeros are not allowed");
    }
    Ok(())
}

/// Only the incoming value is checked.
pub fn run(
    input: &RuleInput<'_>,
    rule: &StopRule,
    path: &str,
    v_prefix: VPrefix,
    out: &mut Vec<StopRuleViolation>,
) {
    let Some((old, Some(new))) = resolve_pair(input, path) else {
        return;
    };
    if matches!(new, ValueTree::Null) {
        return;
    }
    let Some(text) = scalar_text(new) else {
        return;
    };

    if let Err(reason) = check_version_format(&text, v_prefix) {
        out.push(violation(
            input,
            rule,
            path,
            old,
            Some(new),
            format!("Invalid version format '{text}': {reason}"),
        ));
    }
}
