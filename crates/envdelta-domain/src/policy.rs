//! Compiled rule sets.
//!
//! User config keys every rule list by a glob. A file picks up the lists of
//! every glob it matches, concatenated in declaration order. Globs and regexes
//! are compiled here once, so a bad pattern fails before any file is compared.

use crate::error::RuleError;
use camino::{Utf8Path, Utf8PathBuf};
use envdelta_types::{FixedValueRule, StopRule, TransformRule};
use globset::{GlobBuilder, GlobMatcher};
use indexmap::IndexMap;
use regex::Regex;
use std::collections::BTreeMap;

/// Glob pattern -> rules, in declaration order.
pub type PatternRuleSet<T> = IndexMap<String, Vec<T>>;

#[derive(Clone, Debug)]
struct RuleEntry<T> {
    matcher: GlobMatcher,
    rules: Vec<T>,
}

#[derive(Clone, Debug)]
pub struct CompiledRuleSet<T> {
    entries: Vec<RuleEntry<T>>,
}

impl<T> Default for CompiledRuleSet<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> CompiledRuleSet<T> {
    pub fn compile_with<U>(
        set: &PatternRuleSet<U>,
        mut convert: impl FnMut(&U) -> Result<T, RuleError>,
    ) -> Result<Self, RuleError> {
        let mut entries = Vec::with_capacity(set.len());
        for (pattern, rules) in set {
            let matcher = compile_glob(pattern)?;
            let rules = rules
                .iter()
                .map(&mut convert)
                .collect::<Result<Vec<_>, _>>()?;
            entries.push(RuleEntry { matcher, rules });
        }
        Ok(Self { entries })
    }

    /// Every rule whose pattern matches `path`.
    pub fn rules_for(&self, path: &str) -> Vec<&T> {
        self.entries
            .iter()
            .filter(|entry| entry.matcher.is_match(path))
            .flat_map(|entry| entry.rules.iter())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|entry| entry.rules.is_empty())
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.matcher.glob().glob())
    }
}

impl<T: Clone> CompiledRuleSet<T> {
    pub fn compile(set: &PatternRuleSet<T>) -> Result<Self, RuleError> {
        Self::compile_with(set, |rule| Ok(rule.clone()))
    }
}

/// `*` stays within one path segment; `**` crosses segments.
pub fn compile_glob(pattern: &str) -> Result<GlobMatcher, RuleError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| RuleError::InvalidGlob {
            pattern: pattern.to_string(),
            source,
        })
}

pub fn compile_regex(pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(pattern).map_err(|source| RuleError::InvalidRegex {
        pattern: pattern.to_string(),
        source,
    })
}

#[derive(Clone, Debug)]
pub struct CompiledTransform {
    pub find: Regex,
    pub replace: String,
}

impl CompiledTransform {
    pub fn compile(rule: &TransformRule) -> Result<Self, RuleError> {
        Ok(Self {
            find: compile_regex(&rule.find)?,
            replace: rule.replace.clone(),
        })
    }

    /// Replace every match. `$1` / `${name}` in the replacement refer to
    /// capture groups.
    pub fn apply(&self, text: &str) -> String {
        self.find.replace_all(text, self.replace.as_str()).into_owned()
    }
}

/// Rule sets driving classification.
#[derive(Clone, Debug, Default)]
pub struct RuleSets {
    pub transforms: CompiledRuleSet<CompiledTransform>,
    pub fixed_values: CompiledRuleSet<FixedValueRule>,
    pub skip_path: CompiledRuleSet<String>,
}

impl RuleSets {
    pub fn compile(
        transforms: &PatternRuleSet<TransformRule>,
        fixed_values: &PatternRuleSet<FixedValueRule>,
        skip_path: &PatternRuleSet<String>,
    ) -> Result<Self, RuleError> {
        Ok(Self {
            transforms: CompiledRuleSet::compile_with(transforms, CompiledTransform::compile)?,
            fixed_values: CompiledRuleSet::compile(fixed_values)?,
            skip_path: CompiledRuleSet::compile(skip_path)?,
        })
    }
}

// ============================================================================
// Stop rules
// ============================================================================

/// A stop rule with its regex patterns ready. Non-regex rules carry none.
#[derive(Clone, Debug)]
pub struct CompiledStopRule {
    pub rule: StopRule,
    pub patterns: Vec<Regex>,
}

pub type StopRuleSet = CompiledRuleSet<CompiledStopRule>;

/// Supplies the text of files referenced by `regexFile` / `regexFileKey`.
///
/// `file` is exactly as written in the rule; implementations decide what it
/// is relative to.
pub trait PatternSource {
    fn read(&self, file: &str) -> Result<String, RuleError>;

    /// Path used in error messages.
    fn display_path(&self, file: &str) -> Utf8PathBuf {
        Utf8PathBuf::from(file)
    }
}

/// Pattern files held in memory, keyed by the name rules use.
#[derive(Clone, Debug, Default)]
pub struct InMemoryPatternSource {
    pub files: BTreeMap<String, String>,
}

impl InMemoryPatternSource {
    pub fn with_file(mut self, name: &str, text: &str) -> Self {
        self.files.insert(name.to_string(), text.to_string());
        self
    }
}

impl PatternSource for InMemoryPatternSource {
    fn read(&self, file: &str) -> Result<String, RuleError> {
        self.files
            .get(file)
            .cloned()
            .ok_or_else(|| RuleError::RuleFileRead {
                file: self.display_path(file),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such pattern file"),
            })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum PatternFileKind {
    List,
    Keys,
}

/// Compile every stop rule, loading each referenced pattern file once.
pub fn compile_stop_rules(
    set: &PatternRuleSet<StopRule>,
    source: &dyn PatternSource,
) -> Result<StopRuleSet, RuleError> {
    let mut loaded: BTreeMap<(PatternFileKind, String), Vec<String>> = BTreeMap::new();
    let mut load = |kind: PatternFileKind, file: &str| -> Result<Vec<String>, RuleError> {
        if let Some(hit) = loaded.get(&(kind, file.to_string())) {
            return Ok(hit.clone());
        }
        let text = source.read(file)?;
        let display = source.display_path(file);
        let patterns = match kind {
            PatternFileKind::List => parse_pattern_list(&display, &text)?,
            PatternFileKind::Keys => parse_pattern_keys(&display, &text)?,
        };
        loaded.insert((kind, file.to_string()), patterns.clone());
        Ok(patterns)
    };

    let compiled = CompiledRuleSet::compile_with(set, |rule| {
        let sources = match rule {
            StopRule::Regex { regex, .. } => vec![regex.clone()],
            StopRule::RegexFile { file, .. } => load(PatternFileKind::List, file)?,
            StopRule::RegexFileKey { file, .. } => load(PatternFileKind::Keys, file)?,
            _ => Vec::new(),
        };
        let patterns = sources
            .iter()
            .map(|p| compile_regex(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CompiledStopRule {
            rule: rule.clone(),
            patterns,
        })
    })?;

    tracing::debug!(patterns = set.len(), "compiled stop rules");
    Ok(compiled)
}

/// A `regexFile`: a YAML sequence of patterns.
pub fn parse_pattern_list(file: &Utf8Path, text: &str) -> Result<Vec<String>, RuleError> {
    let doc = parse_pattern_file(file, text)?;
    let shape = || shape_error(file, "a list of regex patterns");
    let items = doc.as_array().ok_or_else(shape)?;
    items
        .iter()
        .map(|item| crate::canonical::scalar_text(item).ok_or_else(shape))
        .collect()
}

/// A `regexFileKey`: the find side of a find/replace file. Either a mapping
/// of pattern -> replacement or a list of `{find, replace}` entries.
pub fn parse_pattern_keys(file: &Utf8Path, text: &str) -> Result<Vec<String>, RuleError> {
    let doc = parse_pattern_file(file, text)?;
    let shape = || shape_error(file, "a find/replace mapping or a list of {find, replace}");
    match &doc {
        serde_json::Value::Object(map) => Ok(map.keys().cloned().collect()),
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| {
                item.get("find")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(shape)
            })
            .collect(),
        _ => Err(shape()),
    }
}

fn shape_error(file: &Utf8Path, expected: &'static str) -> RuleError {
    RuleError::RuleFileShape {
        file: file.to_path_buf(),
        expected,
    }
}

fn parse_pattern_file(file: &Utf8Path, text: &str) -> Result<serde_json::Value, RuleError> {
    crate::yaml::parse_yaml(text).map_err(|e| RuleError::RuleFileParse {
        file: file.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use envdelta_types::VPrefix;

    fn set<T>(entries: Vec<(&str, Vec<T>)>) -> PatternRuleSet<T> {
        entries
            .into_iter()
            .map(|(pattern, rules)| (pattern.to_string(), rules))
            .collect()
    }

    #[test]
    fn matching_patterns_concatenate_in_declaration_order() {
        let rules = set(vec![
            ("**/*.yaml", vec!["all-a".to_string(), "all-b".to_string()]),
            ("apps/*/values.yaml", vec!["values".to_string()]),
            ("other/**", vec!["other".to_string()]),
        ]);
        let compiled = CompiledRuleSet::compile(&rules).expect("compile");
        let hit: Vec<&String> = compiled.rules_for("apps/web/values.yaml");
        assert_eq!(hit, ["all-a", "all-b", "values"]);
        assert!(compiled.rules_for("README.md").is_empty());
    }

    #[test]
    fn single_star_does_not_cross_directories() {
        let rules = set(vec![("apps/*.yaml", vec![1])]);
        let compiled = CompiledRuleSet::compile(&rules).expect("compile");
        assert_eq!(compiled.rules_for("apps/a.yaml").len(), 1);
        assert!(compiled.rules_for("apps/nested/a.yaml").is_empty());
    }

    #[test]
    fn invalid_glob_is_reported() {
        let rules = set(vec![("apps/[", vec![1])]);
        let err = CompiledRuleSet::compile(&rules).expect_err("bad glob");
        assert!(matches!(err, RuleError::InvalidGlob { ref pattern, .. } if pattern == "apps/["));
    }

    #[test]
    fn transforms_use_capture_groups() {
        let rule = TransformRule {
            find: r"staging-(\w+)".to_string(),
            replace: "prod-$1".to_string(),
        };
        let compiled = CompiledTransform::compile(&rule).expect("compile");
        assert_eq!(
            compiled.apply("host: staging-db\nother: staging-cache\n"),
            "host: prod-db\nother: prod-cache\n"
        );
    }

    #[test]
    fn invalid_transform_regex_is_reported() {
        let transforms = set(vec![(
            "*.yaml",
            vec![TransformRule {
                find: "(".to_string(),
                replace: String::new(),
            }],
        )]);
        let err = RuleSets::compile(&transforms, &PatternRuleSet::new(), &PatternRuleSet::new())
            .expect_err("bad regex");
        assert!(matches!(err, RuleError::InvalidRegex { ref pattern, .. } if pattern == "("));
    }

    #[test]
    fn stop_rules_load_pattern_files_once() {
        let source = InMemoryPatternSource::default()
            .with_file("deny.yaml", "- ^latest$\n- -SNAPSHOT$\n")
            .with_file("transforms.yaml", "'staging\\.': 'prod.'\n'-dev$': ''\n");
        let rules = set(vec![
            (
                "**/*.yaml",
                vec![
                    StopRule::RegexFile {
                        path: Some("image.tag".to_string()),
                        file: "deny.yaml".to_string(),
                    },
                    StopRule::RegexFileKey {
                        path: None,
                        file: "transforms.yaml".to_string(),
                    },
                ],
            ),
            (
                "apps/**",
                vec![StopRule::VersionFormat {
                    path: "version".to_string(),
                    v_prefix: VPrefix::Allowed,
                }],
            ),
        ]);
        let compiled = compile_stop_rules(&rules, &source).expect("compile");
        let hit = compiled.rules_for("apps/a.yaml");
        assert_eq!(hit.len(), 3);
        assert_eq!(hit[0].patterns.len(), 2);
        assert_eq!(hit[1].patterns[0].as_str(), "staging\\.");
        assert!(hit[2].patterns.is_empty());
    }

    #[test]
    fn missing_pattern_file_is_a_read_error() {
        let rules = set(vec![(
            "*.yaml",
            vec![StopRule::RegexFile {
                path: None,
                file: "absent.yaml".to_string(),
            }],
        )]);
        let err = compile_stop_rules(&rules, &InMemoryPatternSource::default())
            .expect_err("missing file");
        assert!(matches!(err, RuleError::RuleFileRead { .. }));
    }

    #[test]
    fn pattern_file_shapes_are_checked() {
        let file = Utf8Path::new("p.yaml");
        assert!(matches!(
            parse_pattern_list(file, "a: b\n"),
            Err(RuleError::RuleFileShape { .. })
        ));
        assert!(matches!(
            parse_pattern_list(file, "[unclosed\n"),
            Err(RuleError::RuleFileParse { .. })
        ));
        assert!(matches!(
            parse_pattern_keys(file, "just a string\n"),
            Err(RuleError::RuleFileShape { .. })
        ));
        assert_eq!(
            parse_pattern_keys(file, "- find: a+\n  replace: b\n- find: c\n").expect("keys"),
            ["a+", "c"]
        );
    }

    #[test]
    fn invalid_regex_in_pattern_file_is_reported() {
        let source = InMemoryPatternSource::default().with_file("bad.yaml", "- '(unclosed'\n");
        let rules = set(vec![(
            "*.yaml",
            vec![StopRule::RegexFile {
                path: None,
                file: "bad.yaml".to_string(),
            }],
        )]);
        let err = compile_stop_rules(&rules, &source).expect_err("bad regex");
        assert!(matches!(err, RuleError::InvalidRegex { .. }));
    }
}
