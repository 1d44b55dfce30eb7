use crate::{RepoPath, StopRule};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One fired stop rule.
///
/// Violations are data: deciding whether one blocks, warns, or is overridden
/// belongs to the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StopRuleViolation {
    pub file: RepoPath,
    pub rule: StopRule,

    /// The rule's path expression, or [`crate::ids::GLOBAL_SCAN_PATH`].
    pub path: String,

    /// Value currently deployed (destination side).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<JsonValue>,

    /// Value about to be promoted (source side).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_value: Option<JsonValue>,

    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub violations: Vec<StopRuleViolation>,
    pub is_valid: bool,
}

impl ValidationResult {
    pub fn from_violations(violations: Vec<StopRuleViolation>) -> Self {
        let is_valid = violations.is_empty();
        Self {
            violations,
            is_valid,
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::from_violations(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validity_follows_violations() {
        assert!(ValidationResult::default().is_valid);

        let violation = StopRuleViolation {
            file: RepoPath::new("a.yaml"),
            rule: StopRule::Regex {
                path: None,
                regex: "^latest$".to_string(),
            },
            path: crate::ids::GLOBAL_SCAN_PATH.to_string(),
            old_value: None,
            updated_value: Some(json!("latest")),
            message: "Value 'latest' matches forbidden pattern ^latest$".to_string(),
        };
        let result = ValidationResult::from_violations(vec![violation]);
        assert!(!result.is_valid);

        let value = serde_json::to_value(&result).expect("serialize");
        assert_eq!(value["isValid"], json!(false));
        assert_eq!(value["violations"][0]["updatedValue"], json!("latest"));
        assert!(value["violations"][0].get("oldValue").is_none());
        assert_eq!(value["violations"][0]["path"], json!("(global scan)"));
    }
}
