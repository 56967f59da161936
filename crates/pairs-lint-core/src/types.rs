//! Core types for pair violations and results.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for lint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to project root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    #[serde(default)]
    pub offset: usize,
    /// Length of the span in bytes.
    #[serde(default)]
    pub length: usize,
}

impl Location {
    /// Creates a new location from span information.
    #[must_use]
    pub fn from_span(file: PathBuf, span: proc_macro2::Span) -> Self {
        let start = span.start();
        Self {
            file,
            line: start.line,
            column: start.column + 1,
            offset: 0,
            length: 0,
        }
    }

    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// The three ways a pair call can be malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// Odd number of pair arguments: a dangling key or value.
    OddPairCount,
    /// A key argument that is not provably a string.
    NonStringKey,
    /// A whitelisted container passed alongside other pair arguments.
    MixedWhitelistedPairs,
}

impl ViolationKind {
    /// All kinds, in code order.
    pub const ALL: [Self; 3] = [
        Self::OddPairCount,
        Self::NonStringKey,
        Self::MixedWhitelistedPairs,
    ];

    /// Rule code (e.g., "PL001").
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::OddPairCount => "PL001",
            Self::NonStringKey => "PL002",
            Self::MixedWhitelistedPairs => "PL003",
        }
    }

    /// Kebab-case rule name, also used in allow directives.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::OddPairCount => "odd-pair-count",
            Self::NonStringKey => "non-string-key",
            Self::MixedWhitelistedPairs => "mixed-whitelisted-pairs",
        }
    }

    /// One-line description.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::OddPairCount => "Pair arguments must come in key/value pairs",
            Self::NonStringKey => "Pair keys must be strings, preferably constant",
            Self::MixedWhitelistedPairs => {
                "A trusted pair container must be passed alone, not mixed with raw pairs"
            }
        }
    }

    /// Fix hint attached to violations of this kind.
    #[must_use]
    pub fn help(self) -> &'static str {
        match self {
            Self::OddPairCount => "add the missing key or value",
            Self::NonStringKey => "use a string literal or a `const` &str as the key",
            Self::MixedWhitelistedPairs => {
                "pass the container as the only pair argument, or add the pairs to it"
            }
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A suggested fix for a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A lint violation found during analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "PL001").
    pub code: String,
    /// Rule name (e.g., "odd-pair-count").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Primary location of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional suggestion for fixing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Creates an error-severity violation of the given kind, with its help text.
    #[must_use]
    pub fn of_kind(kind: ViolationKind, location: Location, message: impl Into<String>) -> Self {
        Self::new(kind.code(), kind.name(), Severity::Error, location, message)
            .with_suggestion(Suggestion::new(kind.help()))
    }

    /// Adds a suggestion to this violation.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}:{}:{}\n",
            self.code,
            self.rule,
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if let Some(suggestion) = &self.suggestion {
            let _ = writeln!(output, "  = help: {}", suggestion.message);
        }
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// A [`Violation`] as a miette diagnostic, for rendering against source text.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        Self {
            message: format!("[{}] {}", v.code, v.message),
            help: v.suggestion.as_ref().map(|s| s.message.clone()),
            span: SourceSpan::from((v.location.offset, v.location.length)),
            label_message: v.rule.clone(),
        }
    }
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All violations found.
    pub violations: Vec<Violation>,
    /// Number of files checked.
    pub files_checked: usize,
    /// Number of call sites matched by a pair rule.
    #[serde(default)]
    pub calls_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Error)
    }

    /// Counts violations by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |severity| {
            self.violations
                .iter()
                .filter(|v| v.severity == severity)
                .count()
        };
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Sorts violations by file, then line, then column.
    pub fn sort(&mut self) {
        self.violations.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(severity: Severity) -> Violation {
        Violation::new(
            "PL001",
            "odd-pair-count",
            severity,
            Location::new(PathBuf::from("src/lib.rs"), 42, 10),
            "3 args passed to crate::log.info; must be even",
        )
    }

    #[test]
    fn of_kind_carries_code_name_and_help() {
        let v = Violation::of_kind(
            ViolationKind::NonStringKey,
            Location::new(PathBuf::from("src/lib.rs"), 1, 1),
            "msg",
        );
        assert_eq!(v.code, "PL002");
        assert_eq!(v.rule, "non-string-key");
        assert_eq!(v.severity, Severity::Error);
        assert!(v.suggestion.is_some());
    }

    #[test]
    fn kinds_have_distinct_codes() {
        let codes: std::collections::HashSet<_> =
            ViolationKind::ALL.iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), ViolationKind::ALL.len());
    }

    #[test]
    fn display_is_compact_line() {
        let v = make_violation(Severity::Error);
        insta::assert_snapshot!(
            v.to_string(),
            @"src/lib.rs:42:10: error [PL001] 3 args passed to crate::log.info; must be even"
        );
    }

    #[test]
    fn format_includes_help() {
        let v = make_violation(Severity::Error).with_suggestion(Suggestion::new("add a value"));
        assert!(v.format().contains("= help: add a value"));
        assert!(!make_violation(Severity::Error).format().contains("help"));
    }

    #[test]
    fn warnings_are_not_errors() {
        let mut result = LintResult::new();
        result.violations.push(make_violation(Severity::Warning));
        assert!(!result.has_errors());
        assert_eq!(result.count_by_severity(), (0, 1, 0));
    }

    #[test]
    fn sort_orders_by_position() {
        let mut result = LintResult::new();
        let mut late = make_violation(Severity::Error);
        late.location.line = 50;
        result.violations.push(late);
        result.violations.push(make_violation(Severity::Error));
        result.sort();
        assert_eq!(result.violations[0].location.line, 42);
        assert_eq!(result.count_by_severity(), (2, 0, 0));
    }
}
