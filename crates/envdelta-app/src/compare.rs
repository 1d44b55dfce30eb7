//! The `compare` use case: classify two config trees and validate the
//! changes.

use anyhow::Context;
use camino::Utf8Path;
use envdelta_domain::{DiffOptions, DiffResult, PathEngine, PatternRuleSet};
use envdelta_settings::{Overrides, ResolvedConfig};
use envdelta_types::{StopRule, ValidationResult};
use std::collections::BTreeMap;

/// Input for the compare use case.
#[derive(Clone, Debug)]
pub struct CompareInput<'a> {
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// Directory pattern files in the config are relative to.
    pub config_dir: &'a Utf8Path,
    /// Caller overrides.
    pub overrides: Overrides,
    /// Relative path -> raw text, for the tree being promoted.
    pub source_files: &'a BTreeMap<String, String>,
    /// Relative path -> raw text, for the tree currently deployed.
    pub dest_files: &'a BTreeMap<String, String>,
    /// Source path -> destination path for files that change name.
    pub renames: BTreeMap<String, String>,
}

/// Output from the compare use case.
#[derive(Clone, Debug)]
pub struct CompareOutput {
    pub diff: DiffResult,
    pub validation: ValidationResult,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the compare use case: parse config, compile rules, classify, validate.
pub fn run_compare(input: CompareInput<'_>) -> anyhow::Result<CompareOutput> {
    let cfg = envdelta_settings::parse_config_yaml(input.config_text).context("parse config")?;
    let resolved = envdelta_settings::resolve_config(cfg, input.overrides.clone(), input.config_dir)
        .context("resolve config")?;

    let engine = PathEngine::new();
    let options = DiffOptions {
        prune: resolved.prune,
        renames: input.renames.clone(),
    };
    let diff = envdelta_domain::classify(
        &engine,
        input.source_files,
        input.dest_files,
        &resolved.rules,
        &options,
    )
    .context("classify files")?;

    let validation = envdelta_domain::validate(&engine, &diff, &resolved.stop_rules);
    tracing::debug!(
        changed = diff.changed_files.len(),
        violations = validation.violations.len(),
        "compare finished"
    );

    Ok(CompareOutput {
        diff,
        validation,
        resolved_config: resolved,
    })
}

/// Validate an existing diff against stop rules that have not been compiled
/// yet. Pattern files are read from `config_dir`; a missing or malformed one
/// fails here, before any rule is evaluated.
pub fn validate_changes(
    diff: &DiffResult,
    stop_rules: &PatternRuleSet<StopRule>,
    config_dir: &Utf8Path,
) -> anyhow::Result<ValidationResult> {
    let compiled = envdelta_settings::compile_stop_rules_in(stop_rules, config_dir)?;
    Ok(envdelta_domain::validate(&PathEngine::new(), diff, &compiled))
}

/// How the caller intends to act on the result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunMode {
    /// Report only; nothing will be applied.
    pub dry_run: bool,
    /// Apply even when stop rules fire.
    pub force: bool,
    /// Make a dry run fail when stop rules fire.
    pub strict: bool,
}

/// Map a validation result to an exit code: 0 = proceed, 2 = blocked.
pub fn exit_code(validation: &ValidationResult, mode: RunMode) -> i32 {
    if validation.is_valid || mode.force {
        return 0;
    }
    if mode.dry_run && !mode.strict {
        return 0;
    }
    2
}
