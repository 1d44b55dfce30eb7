use super::RuleInput;
use super::semver::leading_triple;
use super::utils::{display_value, resolve_pair, violation};
use envdelta_types::{StopRule, StopRuleViolation};

pub fn run(input: &RuleInput<'_>, rule: &StopRule, path: &str, out: &mut Vec<StopRuleViolation>) {
    let Some((Some(old), Some(new))) = resolve_pair(input, path) else {
        return;
    };
    let (old_text, new_text) = (display_value(old), display_value(new));
    let (Some(old_version), Some(new_version)) =
        (leading_triple(&old_text), leading_triple(&new_text))
    else {
        return;
    };

    // Tuple comparison is lexicographic: major, then minor, then patch.
    if new_version < old_version {
        out.push(violation(
            input,
            rule,
            path,
            Some(old),
            Some(new),
            format!("Version downgrade not allowed: {old_text} → {new_text}"),
        ));
    }
}
