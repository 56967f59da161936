//! Shared output formatting for lint results.

use anyhow::Result;
use miette::{NamedSource, Report};
use pairs_lint_core::{LintResult, Severity, Violation, ViolationDiagnostic};
use std::collections::HashMap;
use std::path::Path;

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `root` is where violation paths are relative to; without it `pretty`
/// falls back to `text`.
pub fn print(result: &LintResult, format: OutputFormat, root: Option<&Path>) -> Result<()> {
    match (format, root) {
        (OutputFormat::Text, _) | (OutputFormat::Pretty, None) => print_text(result),
        (OutputFormat::Pretty, Some(root)) => print_pretty(result, root),
        (OutputFormat::Json, _) => return print_json(result),
        (OutputFormat::Compact, _) => print_compact(result),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    for violation in &result.violations {
        let severity_indicator = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!(
            "{} {} at {}:{}:{}",
            violation.code,
            violation.rule,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        println!("  {}: {}", severity_indicator, violation.message);
        if let Some(suggestion) = &violation.suggestion {
            println!("  = help: {}", suggestion.message);
        }
        println!();
    }

    print_summary(result);
}

fn print_pretty(result: &LintResult, root: &Path) {
    let mut sources: HashMap<&Path, Option<String>> = HashMap::new();

    for violation in &result.violations {
        let file = violation.location.file.as_path();
        let content = sources
            .entry(file)
            .or_insert_with(|| std::fs::read_to_string(root.join(file)).ok());

        match content {
            Some(content) => println!("{:?}", render(violation, file, content.clone())),
            None => println!("{}", violation.format()),
        }
    }

    print_summary(result);
}

fn render(violation: &Violation, file: &Path, content: String) -> Report {
    let source = NamedSource::new(file.display().to_string(), content);
    Report::new(ViolationDiagnostic::from(violation)).with_source_code(source)
}

fn print_summary(result: &LintResult) {
    let (errors, warnings, infos) = result.count_by_severity();

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} pair call(s) across {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.calls_checked, result.files_checked
    );
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!("{violation}");
    }
}
