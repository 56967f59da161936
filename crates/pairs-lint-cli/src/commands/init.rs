//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# pairs-lint configuration

# Functions that take alternating key/value arguments.
# Form: [pkg[.type]].<func>=<offset>, where offset is the number of leading
# arguments that are not pairs.
pair_funcs = [
    # ".log=0",                    # any method named `log`
    # "crate::log.Logger.with=0",  # one method of one type
    # "crate::errors.wrap=1",      # a function
    # "tracing.info=1",            # a macro
]

# Types trusted to hold well-formed pairs. Form: <pkg>.<type>
assume_pairs = [
    # "crate::kv.Pairs",
]

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./src"

# Glob patterns to exclude from analysis
exclude = [
    "**/target/**",
    "**/vendor/**",
]

# Respect .gitignore files
respect_gitignore = true

# Worker threads (default: one per core)
# parallelism = 4

# Stop at the first file that does not parse (default: skip it with a warning)
# fail_on_parse_error = false

# Each diagnostic can be disabled or have its severity overridden.

[rules.odd-pair-count]
enabled = true

[rules.non-string-key]
enabled = true
# severity = "warning"

[rules.mixed-whitelisted-pairs]
enabled = true
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("pairs-lint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created pairs-lint.toml");
    println!("\nNext steps:");
    println!("  1. List your pair-taking functions in pair_funcs");
    println!("  2. Run: pairs-lint check");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairs_lint_core::{Config, Registry};

    #[test]
    fn default_config_parses_and_builds() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert!(config.pair_funcs.is_empty());
        assert!(config.is_rule_enabled("non-string-key"));
        assert!(Registry::from_config(&config).is_ok());
    }
}
