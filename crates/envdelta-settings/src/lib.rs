//! Config parsing and rule compilation.
//!
//! Parsing is IO-free. Resolution reads only the pattern files named by
//! `regexFile` / `regexFileKey` stop rules, relative to the config directory.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::EnvdeltaConfigV1;
pub use resolve::{
    DirPatternSource, Overrides, ResolvedConfig, compile_stop_rules_in, compile_stop_rules_with,
};

use camino::Utf8Path;

/// Parse `envdelta.yaml` (or equivalent) into a typed model. Blank input
/// yields the defaults.
pub fn parse_config_yaml(input: &str) -> anyhow::Result<EnvdeltaConfigV1> {
    if input.trim().is_empty() {
        return Ok(EnvdeltaConfigV1::default());
    }
    let cfg: EnvdeltaConfigV1 = serde_yaml_ng::from_str(input)?;
    Ok(cfg)
}

/// Compile every rule in the config. Pattern files are read from
/// `config_dir`.
pub fn resolve_config(
    cfg: EnvdeltaConfigV1,
    overrides: Overrides,
    config_dir: &Utf8Path,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides, config_dir)
}

/// JSON schema of the config file.
pub fn config_schema() -> schemars::Schema {
    schemars::schema_for!(EnvdeltaConfigV1)
}
