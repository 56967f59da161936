//! Comment-based allowance directives.
//!
//! A violation is suppressed when its line, or the line above, carries:
//! ```text
//! // pairs-lint: allow(non-string-key) reason="keys come from a vetted table"
//! ```
//! `allow(all)` suppresses every pair rule.

use std::collections::HashSet;

/// Result of checking for an allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not allowed.
    Denied,
    /// Rule is allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed allowance directive.
#[derive(Debug, Clone)]
struct AllowDirective {
    rules: HashSet<String>,
    reason: Option<String>,
}

/// Checks source code for an allow directive covering `rule_name` at `line`.
///
/// # Arguments
///
/// * `content` - Source code content
/// * `line` - Line number of the violation (1-indexed)
/// * `rule_name` - Name of the rule to check for
#[must_use]
pub fn check_allow_with_reason(content: &str, line: usize, rule_name: &str) -> AllowCheck {
    let lines: Vec<&str> = content.lines().collect();

    for check_line in [line.saturating_sub(1), line] {
        if check_line == 0 || check_line > lines.len() {
            continue;
        }

        if let Some(directive) = parse_allow_directive(lines[check_line - 1]) {
            if directive.rules.contains(rule_name) || directive.rules.contains("all") {
                return AllowCheck::Allowed {
                    reason: directive.reason,
                };
            }
        }
    }

    AllowCheck::Denied
}

/// Parses an allowance directive from a line, which may end in a trailing comment.
fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    let comment_start = line.find("//")?;
    let comment = line[comment_start..].trim_start_matches('/').trim();

    let directive = comment.strip_prefix("pairs-lint:")?.trim();
    let allow_content = directive.strip_prefix("allow(")?.trim();

    let paren_end = allow_content.find(')')?;
    let rules: HashSet<String> = allow_content[..paren_end]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = rest
        .strip_prefix("reason=")
        .map(str::trim)
        .and_then(|r| r.strip_prefix('"'))
        .and_then(|r| r.find('"').map(|end| r[..end].to_string()));

    Some(AllowDirective { rules, reason })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allow_directive() {
        let directive = parse_allow_directive("// pairs-lint: allow(odd-pair-count)").unwrap();
        assert!(directive.rules.contains("odd-pair-count"));
        assert!(directive.reason.is_none());
    }

    #[test]
    fn test_parse_allow_directive_with_reason() {
        let directive = parse_allow_directive(
            "// pairs-lint: allow(non-string-key) reason=\"ids are stable\"",
        )
        .unwrap();
        assert!(directive.rules.contains("non-string-key"));
        assert_eq!(directive.reason.as_deref(), Some("ids are stable"));
    }

    #[test]
    fn test_parse_multiple_rules() {
        let directive =
            parse_allow_directive("/// pairs-lint: allow(odd-pair-count, non-string-key)").unwrap();
        assert_eq!(directive.rules.len(), 2);
    }

    #[test]
    fn test_trailing_comment() {
        let directive =
            parse_allow_directive(r#"log.info(1, "x"); // pairs-lint: allow(all)"#).unwrap();
        assert!(directive.rules.contains("all"));
    }

    #[test]
    fn test_other_tools_ignored() {
        assert!(parse_allow_directive("// other-lint: allow(odd-pair-count)").is_none());
        assert!(parse_allow_directive("// pairs-lint: allow()").is_none());
        assert!(parse_allow_directive("let x = 1;").is_none());
    }

    #[test]
    fn test_check_allow_on_previous_line() {
        let content = r#"fn foo(log: &Logger) {
    // pairs-lint: allow(odd-pair-count) reason="legacy call site"
    log.info("a", 1, "b");
}"#;

        let result = check_allow_with_reason(content, 3, "odd-pair-count");
        assert!(result.is_allowed());
        assert_eq!(result.reason(), Some("legacy call site"));

        assert!(!check_allow_with_reason(content, 3, "non-string-key").is_allowed());
    }

    #[test]
    fn test_check_allow_denied() {
        let content = r#"fn foo(log: &Logger) {
    log.info("a", 1, "b");
}"#;

        let result = check_allow_with_reason(content, 2, "odd-pair-count");
        assert_eq!(result, AllowCheck::Denied);
        assert_eq!(result.reason(), None);
    }
}
