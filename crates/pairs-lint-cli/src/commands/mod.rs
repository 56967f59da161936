//! Subcommand implementations and the pieces they share.

pub mod check;
pub mod check_facts;
pub mod init;
pub mod list_rules;
pub mod output;

use anyhow::{Context, Result};
use pairs_lint_core::{AnalyzerBuilder, Config};

use crate::config_resolver::ConfigSource;

/// Rule and whitelist specs given on the command line.
///
/// They are registered after the config file's, so they win on conflict.
#[derive(Debug, Default, clap::Args)]
pub struct RuleArgs {
    /// Pair rule, `[pkg[.type]].<func>=<offset>` (repeatable)
    #[arg(long = "pair-func", value_name = "SPEC")]
    pub pair_funcs: Vec<String>,

    /// Trusted pair container type, `<pkg>.<type>` (repeatable)
    #[arg(long = "assume-pair", value_name = "SPEC")]
    pub assume_pairs: Vec<String>,
}

impl RuleArgs {
    /// Adds the specs to `builder`.
    pub fn apply(&self, builder: AnalyzerBuilder) -> AnalyzerBuilder {
        let builder = self
            .pair_funcs
            .iter()
            .fold(builder, |b, spec| b.pair_func(spec.as_str()));
        self.assume_pairs
            .iter()
            .fold(builder, |b, spec| b.assume_pair(spec.as_str()))
    }
}

/// Loads the configuration a resolved source points at.
pub fn load_config(source: &ConfigSource) -> Result<Config> {
    let Some(path) = source.path() else {
        return Ok(Config::default());
    };
    if source.is_global() {
        tracing::info!("Using global config: {}", path.display());
    }
    Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
}
