use super::RuleInput;
use super::semver::leading_major;
use super::utils::{display_value, resolve_pair, violation};
use envdelta_types::{StopRule, StopRuleViolation};

pub fn run(input: &RuleInput<'_>, rule: &StopRule, path: &str, out: &mut Vec<StopRuleViolation>) {
    let Some((Some(old), Some(new))) = resolve_pair(input, path) else {
        return;
    };
    let (old_text, new_text) = (display_value(old), display_value(new));
    let (Some(old_major), Some(new_major)) = (leading_major(&old_text), leading_major(&new_text))
    else {
        return;
    };

    if new_major > old_major {
        out.push(violation(
            input,
            rule,
            path,
            Some(old),
            Some(new),
            format!("Major version upgrade not allowed: {old_text} → {new_text}"),
        ));
    }
}
