use envdelta_types::{FixedValueRule, StopRule, TransformRule};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `envdelta.yaml` schema v1.
///
/// This is a *user-facing* config model: every section is optional. Each rule
/// section maps a file glob to a list of rules; globs are kept in the order
/// they are written.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvdeltaConfigV1 {
    /// Optional schema string for tooling (`envdelta.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Report destination-only files as deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prune: Option<bool>,

    /// Regex rewrites applied to raw source text before parsing.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub transforms: IndexMap<String, Vec<TransformRule>>,

    /// Values forced into the source tree after parsing.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fixed_values: IndexMap<String, Vec<FixedValueRule>>,

    /// Paths ignored when deciding whether a file changed.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub skip_path: IndexMap<String, Vec<String>>,

    /// Policy checks run against changed files.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub stop_rules: IndexMap<String, Vec<StopRule>>,
}
