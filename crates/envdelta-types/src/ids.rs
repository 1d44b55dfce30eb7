//! Stable identifiers for stop rules and report sentinels.
//!
//! Rule ids match the `type` tag used in `stopRules` config entries.

// Stop rules
pub const RULE_SEMVER_MAJOR_UPGRADE: &str = "semverMajorUpgrade";
pub const RULE_SEMVER_DOWNGRADE: &str = "semverDowngrade";
pub const RULE_NUMERIC: &str = "numeric";
pub const RULE_REGEX: &str = "regex";
pub const RULE_REGEX_FILE: &str = "regexFile";
pub const RULE_REGEX_FILE_KEY: &str = "regexFileKey";
pub const RULE_VERSION_FORMAT: &str = "versionFormat";

/// Location reported for regex rules that scan every leaf of a file.
pub const GLOBAL_SCAN_PATH: &str = "(global scan)";
