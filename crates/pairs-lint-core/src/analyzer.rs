//! Core analyzer for orchestrating pair validation.

use crate::call::CallSite;
use crate::config::Config;
use crate::context::FileContext;
use crate::facts::Facts;
use crate::frontend::{Frontend, FrontendBox};
use crate::matcher::Matcher;
use crate::registry::Registry;
use crate::selector::ConfigurationError;
use crate::types::{LintResult, Violation};
use crate::utils::allowance::check_allow_with_reason;
use crate::validator::Validator;

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing Rust source file.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// Error walking the source tree.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Malformed rule or whitelist specification.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Worker pool could not be created.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    frontends: Vec<FrontendBox>,
    exclude_patterns: Vec<String>,
    pair_funcs: Vec<String>,
    assume_pairs: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a front end.
    #[must_use]
    pub fn frontend<F: Frontend + 'static>(mut self, frontend: F) -> Self {
        self.frontends.push(Box::new(frontend));
        self
    }

    /// Adds a rule specification on top of the configured ones.
    #[must_use]
    pub fn pair_func(mut self, spec: impl Into<String>) -> Self {
        self.pair_funcs.push(spec.into());
        self
    }

    /// Adds a whitelist specification on top of the configured ones.
    #[must_use]
    pub fn assume_pair(mut self, spec: impl Into<String>) -> Self {
        self.assume_pairs.push(spec.into());
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Fails on parse errors even when the config does not ask to.
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer, parsing every rule and whitelist specification.
    ///
    /// Configured specs are registered first, so specs added on the builder
    /// override them.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Configuration`] for a malformed spec, or an
    /// error if the current directory cannot be determined.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();

        let registry = Registry::builder()
            .pair_funcs(config.pair_funcs.iter().cloned())
            .pair_funcs(self.pair_funcs)
            .assume_pairs(config.assume_pairs.iter().cloned())
            .assume_pairs(self.assume_pairs)
            .build()?;

        let root = self.root.unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());

        Ok(Analyzer {
            root,
            registry,
            frontends: self.frontends,
            exclude_patterns,
            fail_on_parse_error: self.fail_on_parse_error || config.analyzer.fail_on_parse_error,
            config,
        })
    }
}

/// The main analyzer: discovers files, runs front ends, validates pair calls.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    registry: Registry,
    frontends: Vec<FrontendBox>,
    exclude_patterns: Vec<String>,
    config: Config,
    fail_on_parse_error: bool,
}

/// Outcome of analyzing one file.
struct FileOutcome {
    violations: Vec<Violation>,
    calls_checked: usize,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the immutable rule and whitelist tables.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Analyzes all Rust files under the root and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails, or if a file fails to parse
    /// and `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!(
            "Starting analysis at {:?} with {} rule(s)",
            self.root,
            self.registry.rules().len()
        );

        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());

        let outcomes: Vec<Result<FileOutcome, AnalyzerError>> =
            match self.config.analyzer.parallelism {
                Some(threads) => {
                    let pool = rayon::ThreadPoolBuilder::new()
                        .num_threads(threads)
                        .build()?;
                    pool.install(|| files.par_iter().map(|f| self.analyze_file(f)).collect())
                }
                None => files.par_iter().map(|f| self.analyze_file(f)).collect(),
            };

        let mut result = LintResult::new();
        for outcome in outcomes {
            match outcome {
                Ok(outcome) => {
                    result.violations.extend(outcome.violations);
                    result.calls_checked += outcome.calls_checked;
                    result.files_checked += 1;
                }
                Err(AnalyzerError::Parse { path, message }) => {
                    warn!("Failed to parse {}: {}", path.display(), message);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Parse { path, message });
                    }
                }
                Err(e) => return Err(e),
            }
        }

        result.sort();
        info!(
            "Analysis complete: {} violations in {} pair calls across {} files",
            result.violations.len(),
            result.calls_checked,
            result.files_checked
        );

        Ok(result)
    }

    /// Validates call sites exported by an external front end.
    #[must_use]
    pub fn analyze_facts(&self, facts: &Facts) -> LintResult {
        info!("Checking {} call sites from facts", facts.call_count());

        let mut result = LintResult::new();
        for file in &facts.files {
            let outcome = self.check_calls(&file.calls, None);
            result.violations.extend(outcome.violations);
            result.calls_checked += outcome.calls_checked;
            result.files_checked += 1;
        }

        result.sort();
        result
    }

    /// Analyzes a single file and returns its violations.
    fn analyze_file(&self, path: &Path) -> Result<FileOutcome, AnalyzerError> {
        debug!("Analyzing: {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let ast = syn::parse_file(&content).map_err(|e| AnalyzerError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let ctx = FileContext::new(path, &content, &self.root);
        let calls: Vec<CallSite> = self
            .frontends
            .iter()
            .flat_map(|frontend| {
                let calls = frontend.call_sites(&ctx, &ast);
                debug!("{}: {} call site(s) from {}", path.display(), calls.len(), frontend.name());
                calls
            })
            .collect();

        Ok(self.check_calls(&calls, Some(&ctx)))
    }

    /// Runs matcher and validator over `calls`.
    ///
    /// With a file context, byte spans are filled in and allow comments are
    /// honored.
    fn check_calls(&self, calls: &[CallSite], ctx: Option<&FileContext>) -> FileOutcome {
        let matcher = Matcher::new(&self.registry);
        let validator = Validator::new(&self.registry);

        let mut outcome = FileOutcome {
            violations: Vec::new(),
            calls_checked: 0,
        };

        for call in calls {
            let Some(found) = matcher.matches(call) else {
                continue;
            };
            outcome.calls_checked += 1;

            for diagnostic in validator.validate_match(call, &found) {
                let rule = diagnostic.kind.name();
                if !self.config.is_rule_enabled(rule) {
                    debug!("Skipping disabled rule: {}", rule);
                    continue;
                }

                let mut location = diagnostic.location;
                if let Some(ctx) = ctx {
                    if check_allow_with_reason(ctx.content, location.line, rule).is_allowed() {
                        debug!(
                            "{}:{}: {} allowed by comment",
                            ctx.path.display(),
                            location.line,
                            rule
                        );
                        continue;
                    }
                    let offset = ctx.offset_for(location.line, location.column);
                    location = location.with_span(offset, 1);
                }

                let mut violation =
                    Violation::of_kind(diagnostic.kind, location, diagnostic.message);
                if let Some(severity) = self.config.rule_severity(rule) {
                    violation.severity = severity;
                }
                outcome.violations.push(violation);
            }
        }

        outcome
    }

    /// Discovers all Rust source files to analyze.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let patterns = self
            .exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let walker = ignore::WalkBuilder::new(&self.root)
            .git_ignore(self.config.analyzer.respect_gitignore)
            .git_exclude(self.config.analyzer.respect_gitignore)
            .hidden(false)
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            let path = entry.path();

            if path.extension().map_or(true, |ext| ext != "rs") || !path.is_file() {
                continue;
            }
            if Self::should_exclude(&patterns, path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path matches an exclude pattern.
    fn should_exclude(patterns: &[glob::Pattern], path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        patterns.iter().any(|pattern| {
            if pattern.matches(&path_str) {
                return true;
            }
            // Also treat "**/target/**" as a plain substring.
            let normalized = pattern.as_str().replace("**", "");
            !normalized.is_empty() && normalized != "/" && path_str.contains(&normalized)
        })
    }
}
