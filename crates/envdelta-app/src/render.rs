//! Render use cases: markdown summary and JSON report from a compare run.

use crate::compare::CompareOutput;
use anyhow::Context;
use envdelta_domain::DiffResult;
use envdelta_types::ValidationResult;
use serde::Serialize;

/// Serializable view of a compare run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareReport<'a> {
    pub diff: &'a DiffResult,
    pub validation: &'a ValidationResult,
}

impl<'a> From<&'a CompareOutput> for CompareReport<'a> {
    fn from(output: &'a CompareOutput) -> Self {
        Self {
            diff: &output.diff,
            validation: &output.validation,
        }
    }
}

pub fn serialize_report(output: &CompareOutput) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(&CompareReport::from(output)).context("serialize compare report")
}

pub fn render_markdown(output: &CompareOutput) -> String {
    let diff = &output.diff;
    let validation = &output.validation;
    let mut out = String::new();

    out.push_str("# Envdelta report\n\n");
    let verdict = if validation.is_valid { "SAFE" } else { "BLOCKED" };
    out.push_str(&format!(
        "- Verdict: **{}**\n- Files: {} added, {} changed, {} deleted, {} unchanged\n\n",
        verdict,
        diff.added_files.len(),
        diff.changed_files.len(),
        diff.deleted_files.len(),
        diff.unchanged_files.len()
    ));

    if diff.has_changes() {
        out.push_str("## Files\n\n");
        for added in &diff.added_files {
            out.push_str(&format!("- added `{}`\n", added.path));
        }
        for changed in &diff.changed_files {
            match &changed.original_path {
                Some(original) => out.push_str(&format!(
                    "- changed `{}` (from `{}`)\n",
                    changed.path, original
                )),
                None => out.push_str(&format!("- changed `{}`\n", changed.path)),
            }
        }
        for deleted in &diff.deleted_files {
            out.push_str(&format!("- deleted `{}`\n", deleted));
        }
        out.push('\n');
    } else {
        out.push_str("No changes.\n\n");
    }

    if validation.violations.is_empty() {
        out.push_str("No stop rule violations.\n");
        return out;
    }

    out.push_str("## Stop rule violations\n\n");
    for violation in &validation.violations {
        out.push_str(&format!(
            "- [{}] `{}` at `{}`: {}\n",
            violation.rule.id(),
            violation.file,
            violation.path,
            violation.message
        ));
    }

    out
}
