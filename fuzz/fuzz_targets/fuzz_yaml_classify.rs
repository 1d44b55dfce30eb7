//! Fuzz target for single-file classification.
//!
//! Goal: classifying arbitrary text with arbitrary skip paths and fixed
//! values should **never panic**. Parse errors are fine.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_yaml_classify
//! ```

#![no_main]

use arbitrary::Arbitrary;
use envdelta_domain::{DiffOptions, PathEngine, PatternRuleSet, RuleSets, classify};
use envdelta_types::FixedValueRule;
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeMap;

#[derive(Arbitrary, Debug)]
struct ClassifyInput {
    source: String,
    dest: String,
    skip_paths: Vec<String>,
    fixed_paths: Vec<String>,
}

fuzz_target!(|input: ClassifyInput| {
    if input.source.len() > 4096
        || input.dest.len() > 4096
        || input.skip_paths.len() > 8
        || input.fixed_paths.len() > 8
    {
        return;
    }

    let mut skip_path = PatternRuleSet::new();
    skip_path.insert("**".to_string(), input.skip_paths);
    let mut fixed_values = PatternRuleSet::new();
    fixed_values.insert(
        "**".to_string(),
        input
            .fixed_paths
            .into_iter()
            .map(|path| FixedValueRule {
                path,
                value: serde_json::Value::from("fixed"),
            })
            .collect(),
    );
    let Ok(rules) = RuleSets::compile(&PatternRuleSet::new(), &fixed_values, &skip_path) else {
        return;
    };

    let source = BTreeMap::from([("values.yaml".to_string(), input.source)]);
    let dest = BTreeMap::from([("values.yaml".to_string(), input.dest)]);
    let engine = PathEngine::new();
    if let Ok(diff) = classify(&engine, &source, &dest, &rules, &DiffOptions::default()) {
        assert_eq!(
            diff.changed_files.len() + diff.unchanged_files.len(),
            1,
            "a file on both sides is either changed or unchanged"
        );
    }
});
