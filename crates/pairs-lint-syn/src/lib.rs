//! # pairs-lint-syn
//!
//! Rust source front end for `pairs-lint`.
//!
//! Walks a parsed file and reports every call whose callee can be named:
//!
//! - path calls (`log::info(..)`, imported `info(..)`, `Logger::new(..)`)
//! - method calls on receivers of a known named type (`logger.info(..)`)
//! - macro invocations whose body is a comma-separated expression list
//!   (`tracing::info!(..)`, `kv!(..)`)
//!
//! Receiver and argument types are read off the source: function parameters,
//! annotated `let` bindings, constructors, casts, literals and `const` items.
//! Anything else is reported as unknown and never flagged.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod module;
mod scope;
mod ty;
mod visitor;

use pairs_lint_core::{CallSite, FileContext, Frontend};
use syn::visit::Visit;

/// [`Frontend`] for Rust sources, built on `syn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustFrontend;

impl RustFrontend {
    /// Creates the front end.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Frontend for RustFrontend {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn call_sites(&self, ctx: &FileContext, ast: &syn::File) -> Vec<CallSite> {
        let mut visitor = visitor::CallVisitor::new(ctx, ast);
        visitor.visit_file(ast);
        tracing::trace!(
            file = %ctx.relative_path.display(),
            calls = visitor.calls.len(),
            "Collected call sites"
        );
        visitor.calls
    }
}
