//! Parsing of rule and whitelist specifications.
//!
//! Rule specifications select the functions whose trailing arguments must be
//! key/value pairs:
//!
//! ```text
//! .log=0                          any method named `log`, pairs start at 0
//! crate::errors.wrap=2            package function `wrap`, pairs start at 2
//! crate::kv.Pairs.add_pairs=0     method `add_pairs` on `crate::kv::Pairs`
//! ```
//!
//! Whitelist specifications name trusted container types (`crate::kv.Pairs`).

use miette::Diagnostic;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Errors raised while parsing rule or whitelist specifications.
///
/// These are fatal: no call site is analyzed once one is raised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum ConfigurationError {
    /// The rule specification does not have the `[pkg[.type]].<func>=<offset>` shape.
    #[error("invalid func offset; should be of form [pkg[.type]].<func>=<offset>")]
    #[diagnostic(
        code(pairs_lint::invalid_rule),
        help("examples: `.log=0`, `crate::errors.wrap=2`, `crate::kv.Pairs.add=0`")
    )]
    InvalidRule {
        /// The rejected specification.
        spec: String,
    },

    /// The offset does not fit in a non-negative machine integer.
    #[error("invalid offset {digits:?}: {message}")]
    #[diagnostic(code(pairs_lint::invalid_offset))]
    InvalidOffset {
        /// The digits that failed to parse.
        digits: String,
        /// Integer parse error message.
        message: String,
    },

    /// The whitelist specification does not have the `<pkg>.<type>` shape.
    #[error("invalid type whitelist; should be of form <pkg>.<type>")]
    #[diagnostic(
        code(pairs_lint::invalid_whitelist),
        help("example: `crate::kv.Pairs`")
    )]
    InvalidWhitelist {
        /// The rejected specification.
        spec: String,
    },
}

/// The logical shape of a [`Selector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectorKind {
    /// Any method with the given name, whatever the receiver.
    GenericMethod,
    /// A method on one concrete named type.
    ConcreteMethod,
    /// A package-level function.
    PackageFunction,
}

/// Identity key of a pair rule.
///
/// Empty `package` and `type_name` make a generic-method selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selector {
    /// Package path, empty for "any".
    #[serde(default)]
    pub package: String,
    /// Receiver type name, empty for functions and generic methods.
    #[serde(default)]
    pub type_name: String,
    /// Function or method name.
    pub function: String,
}

impl Selector {
    /// Selector matching any method named `function`.
    #[must_use]
    pub fn generic_method(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            ..Self::default()
        }
    }

    /// Selector matching `function` on the named type `package.type_name`.
    #[must_use]
    pub fn concrete_method(
        package: impl Into<String>,
        type_name: impl Into<String>,
        function: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            type_name: type_name.into(),
            function: function.into(),
        }
    }

    /// Selector matching the package-level `package.function`.
    #[must_use]
    pub fn package_function(package: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            type_name: String::new(),
            function: function.into(),
        }
    }

    /// Returns the logical shape of this selector.
    #[must_use]
    pub fn kind(&self) -> SelectorKind {
        match (self.package.is_empty(), self.type_name.is_empty()) {
            (true, true) => SelectorKind::GenericMethod,
            (_, false) => SelectorKind::ConcreteMethod,
            (false, true) => SelectorKind::PackageFunction,
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.package)?;
        if !self.type_name.is_empty() {
            write!(f, ".{}", self.type_name)?;
        }
        write!(f, ".{}", self.function)
    }
}

/// A type trusted to already hold well-formed pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WhitelistedType {
    /// Package path of the type.
    pub package: String,
    /// Type name.
    pub type_name: String,
}

impl WhitelistedType {
    /// Creates a whitelist entry.
    #[must_use]
    pub fn new(package: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            type_name: type_name.into(),
        }
    }
}

impl std::fmt::Display for WhitelistedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.package, self.type_name)
    }
}

#[allow(clippy::expect_used)]
fn rule_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:(.*?)(?:\.([^\./]+))?)?\.([^\.]+)=(\d+)$").expect("Invalid rule regex")
    })
}

#[allow(clippy::expect_used)]
fn whitelist_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(.*?)\.([^\./]+)$").expect("Invalid whitelist regex"))
}

/// Parses a rule specification of the form `[pkg[.type]].<func>=<offset>`.
///
/// The package part is matched non-greedily, so dotted package paths work:
/// `go.example.org/errors.Wrap=2` selects `Wrap` in `go.example.org/errors`.
///
/// # Errors
///
/// Returns [`ConfigurationError::InvalidRule`] when the shape does not match
/// and [`ConfigurationError::InvalidOffset`] when the offset overflows.
pub fn parse_rule(spec: &str) -> Result<(Selector, usize), ConfigurationError> {
    let caps = rule_pattern()
        .captures(spec)
        .ok_or_else(|| ConfigurationError::InvalidRule {
            spec: spec.to_string(),
        })?;

    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());
    let digits = group(4);
    let offset = digits
        .parse::<usize>()
        .map_err(|e| ConfigurationError::InvalidOffset {
            digits: digits.to_string(),
            message: e.to_string(),
        })?;

    let selector = Selector {
        package: group(1).to_string(),
        type_name: group(2).to_string(),
        function: group(3).to_string(),
    };
    Ok((selector, offset))
}

/// Parses a whitelist specification of the form `<pkg>.<type>`.
///
/// The package is everything up to the final `.`.
///
/// # Errors
///
/// Returns [`ConfigurationError::InvalidWhitelist`] when there is no `.`
/// separator or the type segment is malformed.
pub fn parse_whitelist(spec: &str) -> Result<WhitelistedType, ConfigurationError> {
    let caps = whitelist_pattern()
        .captures(spec)
        .ok_or_else(|| ConfigurationError::InvalidWhitelist {
            spec: spec.to_string(),
        })?;

    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());
    Ok(WhitelistedType::new(group(1), group(2)))
}
