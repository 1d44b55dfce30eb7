//! Per-file diff classification.
//!
//! For a file present on both sides:
//! 1. transforms rewrite the raw source text (regex over the whole file)
//! 2. both sides are parsed (YAML) or kept as text
//! 3. fixed values overwrite every addressed location in the source tree
//! 4. skip paths null out addressed locations in throwaway copies of both trees
//! 5. the masked copies are normalized and compared
//!
//! Reported content is never masked. A source that stops parsing after its
//! transforms aborts the whole run.

use crate::canonical::{equal, normalize};
use crate::error::{DiffError, Side};
use crate::model::{AddedFile, ChangedFile, DiffResult, FileBody, ValueTree};
use crate::path_expr::PathEngine;
use crate::policy::{CompiledTransform, RuleSets};
use crate::yaml::parse_yaml;
use envdelta_types::{FixedValueRule, RepoPath};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, Default)]
pub struct DiffOptions {
    /// Report destination-only files as deleted.
    pub prune: bool,

    /// Source path -> destination path, for files that live under a
    /// different name in the destination tree.
    pub renames: BTreeMap<String, String>,
}

/// Classify every file of a source/destination pair.
///
/// Rules are looked up by the destination-side path.
pub fn classify(
    engine: &PathEngine,
    source_files: &BTreeMap<String, String>,
    dest_files: &BTreeMap<String, String>,
    rules: &RuleSets,
    options: &DiffOptions,
) -> Result<DiffResult, DiffError> {
    let targets = rename_targets(source_files, &options.renames)?;
    let mut result = DiffResult::default();
    let mut claimed: BTreeSet<&str> = BTreeSet::new();

    for ((source_path, source_text), target) in source_files.iter().zip(targets) {
        let path = RepoPath::new(target);
        let original_path = (target != source_path).then(|| RepoPath::new(source_path));
        claimed.insert(target);

        let Some(dest_text) = dest_files.get(target) else {
            tracing::debug!(file = %path, "added");
            result.added_files.push(AddedFile {
                processed_content: process_source(engine, &path, source_text, rules)?,
                path,
                original_path,
            });
            continue;
        };

        match compare_file(engine, &path, source_text, dest_text, rules)? {
            Some(mut changed) => {
                tracing::debug!(file = %path, "changed");
                changed.original_path = original_path;
                result.changed_files.push(changed);
            }
            None => {
                tracing::trace!(file = %path, "unchanged");
                result.unchanged_files.push(path);
            }
        }
    }

    if options.prune {
        for dest_path in dest_files.keys() {
            if !claimed.contains(dest_path.as_str()) {
                tracing::debug!(file = %dest_path, "deleted");
                result.deleted_files.push(RepoPath::new(dest_path));
            }
        }
    }

    result.added_files.sort_by(|a, b| a.path.cmp(&b.path));
    result.deleted_files.sort();
    result.changed_files.sort_by(|a, b| a.path.cmp(&b.path));
    result.unchanged_files.sort();

    tracing::debug!(
        added = result.added_files.len(),
        deleted = result.deleted_files.len(),
        changed = result.changed_files.len(),
        unchanged = result.unchanged_files.len(),
        "classified files"
    );
    Ok(result)
}

/// Destination path of every source file, in source order. Each destination
/// may be claimed by one source only.
fn rename_targets<'a>(
    source_files: &'a BTreeMap<String, String>,
    renames: &'a BTreeMap<String, String>,
) -> Result<Vec<&'a str>, DiffError> {
    let targets: Vec<&str> = source_files
        .keys()
        .map(|source| renames.get(source).unwrap_or(source).as_str())
        .collect();

    let mut claims: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (source, &target) in source_files.keys().zip(&targets) {
        claims.entry(target).or_default().push(source.as_str());
    }
    if let Some((target, sources)) = claims.into_iter().find(|(_, sources)| sources.len() > 1) {
        return Err(DiffError::RenameConflict {
            target: RepoPath::new(target),
            sources: sources.into_iter().map(RepoPath::new).collect(),
        });
    }
    Ok(targets)
}

/// `None` when the processed sides are equal after masking.
fn compare_file(
    engine: &PathEngine,
    path: &RepoPath,
    source_text: &str,
    dest_text: &str,
    rules: &RuleSets,
) -> Result<Option<ChangedFile>, DiffError> {
    let processed_source = process_source(engine, path, source_text, rules)?;
    let processed_dest = parse_side(path, dest_text, Side::Destination)?;

    let same = match (&processed_source, &processed_dest) {
        (FileBody::Structured(source), FileBody::Structured(dest)) => {
            let skip_paths = rules.skip_path.rules_for(path.as_str());
            let source = comparison_copy(engine, source, &skip_paths);
            let dest = comparison_copy(engine, dest, &skip_paths);
            equal(&normalize(source), &normalize(dest))
        }
        (FileBody::Text(source), FileBody::Text(dest)) => source == dest,
        _ => false,
    };
    if same {
        return Ok(None);
    }

    Ok(Some(ChangedFile {
        path: path.clone(),
        raw_parsed_source: parse_side(path, source_text, Side::Source).ok(),
        raw_parsed_dest: Some(processed_dest.clone()),
        processed_source_content: processed_source,
        processed_dest_content: processed_dest,
        original_path: None,
    }))
}

/// Transforms, then parse, then fixed values.
fn process_source(
    engine: &PathEngine,
    path: &RepoPath,
    text: &str,
    rules: &RuleSets,
) -> Result<FileBody, DiffError> {
    let transforms = rules.transforms.rules_for(path.as_str());
    let transformed = apply_transforms(text, &transforms);
    if !path.is_yaml() {
        return Ok(FileBody::Text(transformed));
    }

    let mut tree = parse_yaml(&transformed).map_err(|e| {
        if transforms.is_empty() {
            DiffError::Parse {
                file: path.clone(),
                side: Side::Source,
                message: e.to_string(),
            }
        } else {
            DiffError::TransformedParse {
                file: path.clone(),
                message: e.to_string(),
            }
        }
    })?;

    apply_fixed_values(engine, &mut tree, &rules.fixed_values.rules_for(path.as_str()));
    Ok(FileBody::Structured(tree))
}

fn parse_side(path: &RepoPath, text: &str, side: Side) -> Result<FileBody, DiffError> {
    if !path.is_yaml() {
        return Ok(FileBody::Text(text.to_string()));
    }
    parse_yaml(text)
        .map(FileBody::Structured)
        .map_err(|e| DiffError::Parse {
            file: path.clone(),
            side,
            message: e.to_string(),
        })
}

/// Each rule sees the previous rule's output.
pub fn apply_transforms(text: &str, transforms: &[&CompiledTransform]) -> String {
    let mut current = text.to_string();
    for transform in transforms {
        current = transform.apply(&current);
    }
    current
}

/// Overwrite every location each rule addresses. Rules that address nothing
/// are no-ops.
pub fn apply_fixed_values(engine: &PathEngine, tree: &mut ValueTree, rules: &[&FixedValueRule]) {
    for rule in rules {
        for location in engine.resolve_all(tree, &rule.path) {
            location.set(tree, rule.value.clone());
        }
    }
}

/// Null out every location each skip path addresses.
pub fn mask_skip_paths(engine: &PathEngine, tree: &mut ValueTree, skip_paths: &[&String]) {
    for path in skip_paths {
        for location in engine.resolve_all(tree, path) {
            location.set(tree, ValueTree::Null);
        }
    }
}

/// Masked copy used only for the equality decision.
pub fn comparison_copy(
    engine: &PathEngine,
    tree: &ValueTree,
    skip_paths: &[&String],
) -> ValueTree {
    let mut copy = tree.clone();
    mask_skip_paths(engine, &mut copy, skip_paths);
    copy
}
