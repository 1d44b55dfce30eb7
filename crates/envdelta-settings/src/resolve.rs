use crate::model::EnvdeltaConfigV1;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use envdelta_domain::policy::{InMemoryPatternSource, PatternSource};
use envdelta_domain::{PatternRuleSet, RuleError, RuleSets, StopRuleSet, compile_stop_rules};
use envdelta_types::StopRule;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub prune: Option<bool>,
}

/// Config with every glob, regex and pattern file compiled.
#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub prune: bool,
    pub rules: RuleSets,
    pub stop_rules: StopRuleSet,
    /// Directory `regexFile` / `regexFileKey` paths were resolved against.
    pub config_dir: Utf8PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            prune: false,
            rules: RuleSets::default(),
            stop_rules: StopRuleSet::default(),
            config_dir: Utf8PathBuf::from("."),
        }
    }
}

/// Reads pattern files relative to the directory holding the config.
#[derive(Clone, Debug)]
pub struct DirPatternSource {
    root: Utf8PathBuf,
}

impl DirPatternSource {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PatternSource for DirPatternSource {
    fn read(&self, file: &str) -> Result<String, RuleError> {
        let path = self.display_path(file);
        std::fs::read_to_string(&path).map_err(|source| RuleError::RuleFileRead {
            file: path,
            source,
        })
    }

    fn display_path(&self, file: &str) -> Utf8PathBuf {
        self.root.join(file)
    }
}

pub fn resolve_config(
    cfg: EnvdeltaConfigV1,
    overrides: Overrides,
    config_dir: &Utf8Path,
) -> anyhow::Result<ResolvedConfig> {
    let prune = overrides.prune.or(cfg.prune).unwrap_or(false);

    let rules = RuleSets::compile(&cfg.transforms, &cfg.fixed_values, &cfg.skip_path)
        .context("invalid transforms, fixedValues or skipPath rules")?;
    let stop_rules = compile_stop_rules_in(&cfg.stop_rules, config_dir)?;

    tracing::debug!(
        prune,
        transforms = cfg.transforms.len(),
        fixed_values = cfg.fixed_values.len(),
        skip_path = cfg.skip_path.len(),
        stop_rules = cfg.stop_rules.len(),
        %config_dir,
        "resolved config"
    );

    Ok(ResolvedConfig {
        prune,
        rules,
        stop_rules,
        config_dir: config_dir.to_path_buf(),
    })
}

/// Compile stop rules, loading pattern files from `config_dir`.
pub fn compile_stop_rules_in(
    stop_rules: &PatternRuleSet<StopRule>,
    config_dir: &Utf8Path,
) -> anyhow::Result<StopRuleSet> {
    compile_stop_rules(stop_rules, &DirPatternSource::new(config_dir))
        .context("invalid stopRules")
}

/// Compile stop rules against pattern files supplied in memory.
pub fn compile_stop_rules_with(
    stop_rules: &PatternRuleSet<StopRule>,
    files: &InMemoryPatternSource,
) -> anyhow::Result<StopRuleSet> {
    compile_stop_rules(stop_rules, files).context("invalid stopRules")
}
