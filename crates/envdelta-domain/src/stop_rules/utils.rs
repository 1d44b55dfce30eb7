use super::RuleInput;
use crate::canonical::scalar_text;
use crate::model::ValueTree;
use envdelta_types::{StopRule, StopRuleViolation};

/// Old and new value at `path`. `None` when neither side has one.
pub fn resolve_pair<'a>(
    input: &RuleInput<'a>,
    path: &str,
) -> Option<(Option<&'a ValueTree>, Option<&'a ValueTree>)> {
    let old = input.engine.resolve_first(input.old_tree, path);
    let new = input.engine.resolve_first(input.new_tree, path);
    if old.is_none() && new.is_none() {
        return None;
    }
    Some((old, new))
}

/// Text form used in messages and pattern tests. Composites render as JSON.
pub fn display_value(value: &ValueTree) -> String {
    scalar_text(value).unwrap_or_else(|| value.to_string())
}

pub fn violation(
    input: &RuleInput<'_>,
    rule: &StopRule,
    path: &str,
    old: Option<&ValueTree>,
    new: Option<&ValueTree>,
    message: String,
) -> StopRuleViolation {
    tracing::debug!(
        file = %input.file,
        rule = rule.id(),
        path,
        %message,
        "stop rule fired"
    );
    StopRuleViolation {
        file: input.file.clone(),
        rule: rule.clone(),
        path: path.to_string(),
        old_value: old.cloned(),
        updated_value: new.cloned(),
        message,
    }
}

/// Non-null scalar leaves, depth-first, in document order. Keys are not
/// visited.
pub fn collect_leaves<'a>(tree: &'a ValueTree, out: &mut Vec<&'a ValueTree>) {
    match tree {
        ValueTree::Null => {}
        ValueTree::Array(items) => {
            for item in items {
                collect_leaves(item, out);
            }
        }
        ValueTree::Object(map) => {
            for value in map.values() {
                collect_leaves(value, out);
            }
        }
        scalar => out.push(scalar),
    }
}

/// Coerce a scalar to a number: numbers as-is, strings when they parse.
pub fn as_number(value: &ValueTree) -> Option<f64> {
    match value {
        ValueTree::Number(n) => n.as_f64(),
        ValueTree::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
        }
        _ => None,
    }
}
