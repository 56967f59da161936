//! Integration test: Rust sources end-to-end via Analyzer and RustFrontend.
//!
//! Uses the fixture crate under `tests/fixtures/project/` for the full rule
//! set, and throwaway crates in temp dirs for config and allow comments.

use pairs_lint_core::{Analyzer, AnalyzerError, Config, LintResult, Severity};
use pairs_lint_syn::RustFrontend;
use std::fs;
use std::path::{Path, PathBuf};

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/project")
}

fn analyze(root: &Path, config: Config) -> LintResult {
    Analyzer::builder()
        .root(root)
        .config(config)
        .frontend(RustFrontend::new())
        .build()
        .expect("analyzer should build")
        .analyze()
        .expect("analysis should succeed")
}

fn render(result: &LintResult) -> String {
    result
        .violations
        .iter()
        .map(|v| {
            format!(
                "{}:{}:{}: {} {}",
                v.location.file.display(),
                v.location.line,
                v.location.column,
                v.code,
                v.message
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn write_crate(lib: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src/lib.rs"), lib).unwrap();
    dir
}

// ── Fixture crate: every diagnostic kind ──

#[test]
fn fixture_reports_every_kind() {
    let root = fixture_root();
    let config = Config::from_file(&root.join("pairs-lint.toml")).expect("fixture config");
    let result = analyze(&root, config);

    insta::assert_snapshot!(render(&result), @r"
    src/app.rs:9:5: PL001 3 args passed to method (crate::log.Logger) log(..); must be even
    src/app.rs:10:16: PL002 arg 0 to method (crate::log.Logger) log(..) is constant i32 but should be a constant string
    src/app.rs:11:25: PL002 arg 2 to method (crate::log.Logger) log(..) is expression u64 but should be a constant string
    src/app.rs:13:5: PL003 arg 0 to method (crate::log.Logger) log(..) is a whitelisted type; should pass one or none
    src/app.rs:16:5: PL001 2 args passed to crate::log.wrap; must be even
    src/app.rs:20:5: PL001 2 args passed to tracing.info; must be even
    src/log.rs:8:18: PL002 arg 0 to method (crate::log.Logger) log(key: &str, value: u64) is expression u64 but should be a constant string
    ");
}

#[test]
fn fixture_counts() {
    let root = fixture_root();
    let config = Config::from_file(&root.join("pairs-lint.toml")).unwrap();
    let result = analyze(&root, config);

    assert_eq!(result.files_checked, 4);
    assert_eq!(result.calls_checked, 13);
    assert!(result.has_errors());
    assert_eq!(result.count_by_severity(), (7, 0, 0));
}

#[test]
fn no_rules_no_violations() {
    let result = analyze(&fixture_root(), Config::default());
    assert!(result.violations.is_empty());
    assert_eq!(result.calls_checked, 0);
}

// ── Allow comments ──

#[test]
fn allow_comment_suppresses_one_call() {
    let dir = write_crate(
        r#"use tracing::info;

pub fn run(id: u64) {
    // pairs-lint: allow(non-string-key) reason="ids double as keys here"
    info!("msg", id, 1);
    info!("msg", id, 2);
    info!("msg", id); // pairs-lint: allow(all)
}
"#,
    );

    let config = Config::parse(r#"pair_funcs = ["tracing.info=1"]"#).unwrap();
    let result = analyze(dir.path(), config);

    assert_eq!(result.violations.len(), 1, "{}", render(&result));
    let v = &result.violations[0];
    assert_eq!(v.location.line, 6);
    assert_eq!(v.rule, "non-string-key");
    assert_eq!(
        v.message,
        "arg 1 to tracing.info is expression u64 but should be a constant string"
    );
}

// ── Config: disabled rules and severity overrides ──

#[test]
fn config_disables_and_downgrades_rules() {
    let dir = write_crate(
        r#"use tracing::info;

pub fn run(id: u64) {
    info!("msg", id, 1);
    info!("msg", "k");
}
"#,
    );

    let config = Config::parse(
        r#"
pair_funcs = ["tracing.info=1"]

[rules.odd-pair-count]
severity = "warning"

[rules.non-string-key]
enabled = false
"#,
    )
    .unwrap();
    let result = analyze(dir.path(), config);

    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].rule, "odd-pair-count");
    assert_eq!(result.violations[0].severity, Severity::Warning);
    assert!(!result.has_errors());
}

#[test]
fn builder_specs_extend_config() {
    let dir = write_crate(
        r#"pub struct Sink;

impl Sink {
    pub fn emit(&self) {}
}

pub fn run(sink: Sink, n: i64) {
    sink.emit("k", n, n, 1);
}
"#,
    );

    let result = Analyzer::builder()
        .root(dir.path())
        .frontend(RustFrontend::new())
        .pair_func("crate.Sink.emit=0")
        .build()
        .unwrap()
        .analyze()
        .unwrap();

    assert_eq!(result.violations.len(), 1);
    assert_eq!(
        result.violations[0].message,
        "arg 2 to method (crate.Sink) emit() is expression i64 but should be a constant string"
    );
}

// ── Module paths ──

#[test]
fn child_module_paths_resolve_inside_the_crate() {
    let dir = write_crate(
        r#"pub mod log;

mod inline {
    pub fn wrap(e: u8, k: &str) {}
}

pub fn run(e: u8) {
    log::wrap(e, "id");
    inline::wrap(e, "id");
}
"#,
    );
    fs::write(dir.path().join("src/log.rs"), "pub fn wrap(e: u8, k: &str) {}\n").unwrap();

    let specs = r#"pair_funcs = ["crate::log.wrap=1", "crate::inline.wrap=1"]"#;
    let config = Config::parse(specs).unwrap();
    let result = analyze(dir.path(), config);
    insta::assert_snapshot!(render(&result), @r"
    src/lib.rs:8:5: PL001 2 args passed to crate::log.wrap; must be even
    src/lib.rs:9:5: PL001 2 args passed to crate::inline.wrap; must be even
    ");

    let config = Config::parse(r#"pair_funcs = ["log.wrap=1", "inline.wrap=1"]"#).unwrap();
    let result = analyze(dir.path(), config);
    assert!(result.violations.is_empty(), "{}", render(&result));
}

#[test]
fn parse_errors_are_skipped() {
    let dir = write_crate("pub fn broken( {");
    fs::write(
        dir.path().join("src/ok.rs"),
        "use tracing::info;\npub fn run() { info!(\"msg\", \"k\"); }\n",
    )
    .unwrap();

    let config = Config::parse(r#"pair_funcs = ["tracing.info=1"]"#).unwrap();
    let result = analyze(dir.path(), config);

    assert_eq!(result.files_checked, 1);
    assert_eq!(result.violations.len(), 1);
}

#[test]
fn parse_errors_abort_when_configured() {
    let dir = write_crate("pub fn broken( {");

    let config = Config::parse(
        r#"
pair_funcs = ["tracing.info=1"]

[analyzer]
fail_on_parse_error = true
"#,
    )
    .unwrap();
    let err = Analyzer::builder()
        .root(dir.path())
        .config(config)
        .frontend(RustFrontend::new())
        .build()
        .unwrap()
        .analyze()
        .unwrap_err();

    match err {
        AnalyzerError::Parse { path, .. } => assert!(path.ends_with("src/lib.rs")),
        other => panic!("unexpected error: {other}"),
    }
}
