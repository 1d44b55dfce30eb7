//! Rule definitions as they appear in user config.
//!
//! These are plain data. Compilation (globs, regexes, external pattern files)
//! happens in `envdelta-settings` / `envdelta-domain`.

use crate::ids;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Regex substitution applied to the raw text of a source file before parsing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TransformRule {
    pub find: String,
    #[serde(default)]
    pub replace: String,
}

/// Forces a value at every location a path addresses in the source tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FixedValueRule {
    pub path: String,
    #[serde(default)]
    pub value: JsonValue,
}

/// Policy for a leading `v` in `versionFormat` checks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VPrefix {
    Required,
    #[default]
    Allowed,
    Forbidden,
}

/// A named policy check guarding a changed value.
///
/// `path` is optional for the regex family; without it the rule scans every
/// leaf value of the file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StopRule {
    SemverMajorUpgrade {
        path: String,
    },
    SemverDowngrade {
        path: String,
    },
    Numeric {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Regex {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
        regex: String,
    },
    RegexFile {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
        file: String,
    },
    RegexFileKey {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
        file: String,
    },
    VersionFormat {
        path: String,
        #[serde(rename = "vPrefix", default)]
        v_prefix: VPrefix,
    },
}

impl StopRule {
    pub fn id(&self) -> &'static str {
        match self {
            StopRule::SemverMajorUpgrade { .. } => ids::RULE_SEMVER_MAJOR_UPGRADE,
            StopRule::SemverDowngrade { .. } => ids::RULE_SEMVER_DOWNGRADE,
            StopRule::Numeric { .. } => ids::RULE_NUMERIC,
            StopRule::Regex { .. } => ids::RULE_REGEX,
            StopRule::RegexFile { .. } => ids::RULE_REGEX_FILE,
            StopRule::RegexFileKey { .. } => ids::RULE_REGEX_FILE_KEY,
            StopRule::VersionFormat { .. } => ids::RULE_VERSION_FORMAT,
        }
    }

    /// The addressed path, or `None` for a global scan.
    pub fn path(&self) -> Option<&str> {
        match self {
            StopRule::SemverMajorUpgrade { path }
            | StopRule::SemverDowngrade { path }
            | StopRule::Numeric { path, .. }
            | StopRule::VersionFormat { path, .. } => Some(path),
            StopRule::Regex { path, .. }
            | StopRule::RegexFile { path, .. }
            | StopRule::RegexFileKey { path, .. } => path.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_rules_deserialize_from_tagged_yaml() {
        let yaml = r#"
- type: semverMajorUpgrade
  path: image.tag
- type: numeric
  path: replicas
  min: 1
  max: 10
- type: regex
  regex: "^latest$"
- type: versionFormat
  path: version
  vPrefix: forbidden
- type: regexFileKey
  path: image.repository
  file: patterns.yaml
"#;
        let rules: Vec<StopRule> = serde_yaml_ng::from_str(yaml).expect("parse rules");
        assert_eq!(rules.len(), 5);
        assert_eq!(
            rules[1],
            StopRule::Numeric {
                path: "replicas".to_string(),
                min: Some(1.0),
                max: Some(10.0),
            }
        );
        assert_eq!(rules[2].path(), None);
        assert_eq!(rules[3].id(), ids::RULE_VERSION_FORMAT);
        assert_eq!(
            rules[3],
            StopRule::VersionFormat {
                path: "version".to_string(),
                v_prefix: VPrefix::Forbidden,
            }
        );
        assert_eq!(rules[4].path(), Some("image.repository"));
    }

    #[test]
    fn version_format_defaults_to_allowed_prefix() {
        let rule: StopRule =
            serde_yaml_ng::from_str("type: versionFormat\npath: v\n").expect("parse rule");
        assert_eq!(
            rule,
            StopRule::VersionFormat {
                path: "v".to_string(),
                v_prefix: VPrefix::Allowed,
            }
        );
    }

    #[test]
    fn unknown_rule_type_is_rejected() {
        let res: Result<StopRule, _> = serde_yaml_ng::from_str("type: nope\npath: a\n");
        assert!(res.is_err());
    }
}
