//! Check-facts command implementation.

use anyhow::{Context, Result};
use pairs_lint_core::{Analyzer, Facts};
use std::path::Path;

use super::RuleArgs;
use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check-facts command.
pub fn run(
    file: &Path,
    rules: &RuleArgs,
    format: OutputFormat,
    source: &ConfigSource,
) -> Result<()> {
    let config = super::load_config(source)?;
    let facts = Facts::from_file(file)
        .with_context(|| format!("Failed to load facts: {}", file.display()))?;

    let analyzer = rules.apply(Analyzer::builder().config(config)).build()?;
    let result = analyzer.analyze_facts(&facts);

    // Facts carry no source text to render snippets against.
    super::output::print(&result, format, None)?;

    if result.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}
