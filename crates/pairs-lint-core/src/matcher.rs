//! Decides whether a call site is subject to a pair rule.

use crate::call::{CallKind, CallSite};
use crate::registry::Registry;
use crate::selector::{Selector, SelectorKind};
use tracing::debug;

/// A rule that applies to a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Number of leading arguments excluded from pair validation.
    pub offset: usize,
    /// Human-readable callee label used in diagnostics.
    pub display_name: String,
    /// Which selector shape matched.
    pub selector_kind: SelectorKind,
}

/// Looks up call sites in a [`Registry`].
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'r> {
    registry: &'r Registry,
}

impl<'r> Matcher<'r> {
    /// Creates a matcher over `registry`.
    #[must_use]
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Returns the applicable rule, if any.
    ///
    /// Package functions are looked up by `(package, function)` only. Methods
    /// probe the generic `.function` selector first and fall back to the
    /// receiver's `(package, type, function)`. A method whose receiver is not a
    /// named type never matches.
    #[must_use]
    pub fn matches(&self, call: &CallSite) -> Option<Match> {
        let rules = self.registry.rules();

        let found = match &call.kind {
            CallKind::Function { package } => {
                let selector = Selector::package_function(package.as_str(), call.function.as_str());
                rules.get(&selector).map(|offset| Match {
                    offset,
                    display_name: format!("{package}.{}", call.function),
                    selector_kind: SelectorKind::PackageFunction,
                })
            }
            CallKind::Method { receiver, params } => {
                let receiver = receiver.as_ref()?;
                let display_name = format!(
                    "method ({receiver}) {}{}",
                    call.function,
                    params.as_deref().unwrap_or("(..)")
                );

                let generic = Selector::generic_method(call.function.as_str());
                let concrete = Selector::concrete_method(
                    receiver.package.as_str(),
                    receiver.name.as_str(),
                    call.function.as_str(),
                );

                rules
                    .get(&generic)
                    .map(|offset| (offset, SelectorKind::GenericMethod))
                    .or_else(|| {
                        rules
                            .get(&concrete)
                            .map(|offset| (offset, SelectorKind::ConcreteMethod))
                    })
                    .map(|(offset, selector_kind)| Match {
                        offset,
                        display_name,
                        selector_kind,
                    })
            }
        };

        if let Some(m) = &found {
            debug!(
                "{}:{}: matched {} (offset {})",
                call.location.file.display(),
                call.location.line,
                m.display_name,
                m.offset
            );
        }
        found
    }
}
