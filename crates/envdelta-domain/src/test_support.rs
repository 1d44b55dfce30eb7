use crate::model::{ChangedFile, FileBody, ValueTree};
use crate::policy::{
    InMemoryPatternSource, PatternRuleSet, RuleSets, StopRuleSet,
    compile_stop_rules,
};
use envdelta_types::{FixedValueRule, RepoPath, StopRule, TransformRule};
use std::collections::BTreeMap;

pub fn files(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(path, text)| (path.to_string(), text.to_string()))
        .collect()
}

pub fn transform(find: &str, replace: &str) -> TransformRule {
    TransformRule {
        find: find.to_string(),
        replace: replace.to_string(),
    }
}

pub fn fixed_value(path: &str, value: ValueTree) -> FixedValueRule {
    FixedValueRule {
        path: path.to_string(),
        value,
    }
}

pub fn skip(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|p| p.to_string()).collect()
}

fn rule_set<T>(entries: Vec<(&str, Vec<T>)>) -> PatternRuleSet<T> {
    entries
        .into_iter()
        .map(|(pattern, rules)| (pattern.to_string(), rules))
        .collect()
}

pub fn rule_sets(
    transforms: Vec<(&str, Vec<TransformRule>)>,
    fixed_values: Vec<(&str, Vec<FixedValueRule>)>,
    skip_path: Vec<(&str, Vec<String>)>,
) -> RuleSets {
    RuleSets::compile(
        &rule_set(transforms),
        &rule_set(fixed_values),
        &rule_set(skip_path),
    )
    .expect("test rules compile")
}

pub fn stop_rule_set(entries: Vec<(&str, Vec<StopRule>)>) -> StopRuleSet {
    stop_rule_set_with(entries, &InMemoryPatternSource::default())
}

pub fn stop_rule_set_with(
    entries: Vec<(&str, Vec<StopRule>)>,
    source: &InMemoryPatternSource,
) -> StopRuleSet {
    compile_stop_rules(&rule_set(entries), source).expect("test stop rules compile")
}

/// A changed structured file. `new` is the processed source, `old` the
/// destination.
pub fn changed_file(path: &str, new: ValueTree, old: ValueTree) -> ChangedFile {
    ChangedFile {
        path: RepoPath::new(path),
        raw_parsed_source: Some(FileBody::Structured(new.clone())),
        raw_parsed_dest: Some(FileBody::Structured(old.clone())),
        processed_source_content: FileBody::Structured(new),
        processed_dest_content: FileBody::Structured(old),
        original_path: None,
    }
}

pub fn text_changed_file(path: &str, new: &str, old: &str) -> ChangedFile {
    ChangedFile {
        path: RepoPath::new(path),
        raw_parsed_source: None,
        raw_parsed_dest: None,
        processed_source_content: FileBody::Text(new.to_string()),
        processed_dest_content: FileBody::Text(old.to_string()),
        original_path: None,
    }
}
