use super::RuleInput;
use super::utils::{as_number, resolve_pair, violation};
use envdelta_types::{StopRule, StopRuleViolation};

pub fn run(
    input: &RuleInput<'_>,
    rule: &StopRule,
    path: &str,
    min: Option<f64>,
    max: Option<f64>,
    out: &mut Vec<StopRuleViolation>,
) {
    let Some((old, new)) = resolve_pair(input, path) else {
        return;
    };
    let Some(value) = new.or(old).and_then(as_number) else {
        return;
    };

    let message = match (min, max) {
        (Some(min), _) if value < min => format!("Value {value} is below minimum {min}"),
        (_, Some(max)) if value > max => format!("Value {value} exceeds maximum {max}"),
        _ => return,
    };
    out.push(violation(input, rule, path, old, new, message));
}
