//! Check command implementation.

use anyhow::{Context, Result};
use pairs_lint_core::Analyzer;
use pairs_lint_syn::RustFrontend;
use std::path::Path;

use super::RuleArgs;
use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Flags of the check command besides the rule specs.
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Extra exclude globs.
    pub exclude: Vec<String>,
    /// Abort on unparseable files.
    pub fail_on_parse_error: bool,
}

/// Runs the check command.
pub fn run(
    path: &Path,
    rules: &RuleArgs,
    options: CheckOptions,
    source: &ConfigSource,
) -> Result<()> {
    let config = super::load_config(source)?;

    let mut builder = Analyzer::builder()
        .root(path)
        .config(config)
        .frontend(RustFrontend::new())
        .fail_on_parse_error(options.fail_on_parse_error);

    for pattern in options.exclude {
        builder = builder.exclude(pattern);
    }

    let analyzer = rules.apply(builder).build()?;

    if analyzer.registry().rules().is_empty() {
        tracing::warn!("No pair rules configured; nothing will be reported");
    }

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, options.format, Some(analyzer.root()))?;

    if result.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}
