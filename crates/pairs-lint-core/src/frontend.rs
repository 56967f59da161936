//! Front end trait: turns a parsed source file into call-site descriptors.

use crate::call::CallSite;
use crate::context::FileContext;

/// Produces [`CallSite`] descriptors from a parsed Rust file.
///
/// Implementations resolve callee identity and argument facts; the engine
/// never inspects the syntax tree itself.
///
/// # Example
///
/// ```ignore
/// use pairs_lint_core::{CallSite, FileContext, Frontend};
///
/// pub struct MacroOnly;
///
/// impl Frontend for MacroOnly {
///     fn name(&self) -> &'static str { "macro-only" }
///
///     fn call_sites(&self, ctx: &FileContext, ast: &syn::File) -> Vec<CallSite> {
///         let mut visitor = MacroVisitor::new(ctx);
///         visitor.visit_file(ast);
///         visitor.calls
///     }
/// }
/// ```
pub trait Frontend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Extracts every call expression of `ast` that has a resolvable callee.
    fn call_sites(&self, ctx: &FileContext, ast: &syn::File) -> Vec<CallSite>;
}

/// Type alias for boxed Frontend trait objects.
pub type FrontendBox = Box<dyn Frontend>;
