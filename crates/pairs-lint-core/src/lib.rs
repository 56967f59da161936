//! # pairs-lint-core
//!
//! Engine for checking calls that take alternating key/value pairs.
//!
//! Given a set of pair rules (which functions take pairs, and from which
//! argument on) and a set of trusted pair container types, the engine
//! decides, for every call site a front end reports, whether the pairs are
//! well formed:
//!
//! - [`Registry`] holds the parsed rules and whitelist, built once
//! - [`Matcher`] finds the rule that applies to a [`CallSite`]
//! - [`Validator`] checks arity, container mixing and key types
//! - [`Analyzer`] drives a [`Frontend`] over a source tree
//!
//! ## Example
//!
//! ```ignore
//! use pairs_lint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .frontend(RustFrontend::new())
//!     .pair_func(".log=0")
//!     .assume_pair("crate::kv.Pairs")
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod call;
mod config;
mod context;
mod facts;
mod frontend;
mod matcher;
mod registry;
mod selector;
mod types;
mod validator;

/// Utility modules for front end implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use call::{Argument, ArgumentFacts, CallKind, CallSite, ConstantKind, NamedType, StaticType};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::FileContext;
pub use facts::{Facts, FactsError, FileFacts};
pub use frontend::{Frontend, FrontendBox};
pub use matcher::{Match, Matcher};
pub use registry::{Registry, RegistryBuilder, RuleTable, Whitelist};
pub use selector::{
    parse_rule, parse_whitelist, ConfigurationError, Selector, SelectorKind, WhitelistedType,
};
pub use types::{
    LintResult, Location, Severity, Suggestion, Violation, ViolationDiagnostic, ViolationKind,
};
pub use validator::{Diagnostic, Validator};
