//! Validation of the pair arguments of a matched call.
//!
//! The checks run in a fixed order and the first one that applies decides
//! the outcome for the call:
//!
//! 1. no pair arguments: nothing to check
//! 2. a single whitelisted container: accepted
//! 3. odd pair count: one arity diagnostic
//! 4. a whitelisted container among other pairs: one mixing diagnostic
//! 5. otherwise every key position is checked independently

use crate::call::{Argument, ArgumentFacts, CallSite, ConstantKind};
use crate::matcher::Match;
use crate::registry::{Registry, Whitelist};
use crate::types::{Location, ViolationKind};

/// A finding produced for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: ViolationKind,
    /// Where to report it.
    pub location: Location,
    /// Message text.
    pub message: String,
}

/// Applies the pair rules to matched calls.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'r> {
    whitelist: &'r Whitelist,
}

impl<'r> Validator<'r> {
    /// Creates a validator reading the whitelist of `registry`.
    #[must_use]
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            whitelist: registry.whitelist(),
        }
    }

    /// Validates `call` against the rule found by the matcher.
    #[must_use]
    pub fn validate_match(&self, call: &CallSite, found: &Match) -> Vec<Diagnostic> {
        self.validate(call, found.offset, &found.display_name)
    }

    /// Validates the arguments of `call` after the first `offset`.
    #[must_use]
    pub fn validate(&self, call: &CallSite, offset: usize, display_name: &str) -> Vec<Diagnostic> {
        let total = call.arguments.len();
        let relevant = call.arguments.get(offset..).unwrap_or_default();

        if relevant.is_empty() {
            return Vec::new();
        }

        if let [only] = relevant {
            if self.is_whitelisted(only) {
                return Vec::new();
            }
        }

        if relevant.len() % 2 != 0 {
            return vec![Diagnostic {
                kind: ViolationKind::OddPairCount,
                location: call.location.clone(),
                message: format!("{total} args passed to {display_name}; must be even"),
            }];
        }

        if let Some(arg) = relevant.iter().find(|a| self.is_whitelisted(a)) {
            return vec![Diagnostic {
                kind: ViolationKind::MixedWhitelistedPairs,
                location: call.location.clone(),
                message: format!(
                    "arg {} to {display_name} is a whitelisted type; should pass one or none",
                    arg.index
                ),
            }];
        }

        relevant
            .iter()
            .step_by(2)
            .filter_map(|key| check_key(key, display_name))
            .collect()
    }

    fn is_whitelisted(&self, arg: &Argument) -> bool {
        arg.static_type()
            .and_then(|ty| ty.named.as_ref())
            .is_some_and(|named| self.whitelist.contains(&named.package, &named.name))
    }
}

fn check_key(key: &Argument, display_name: &str) -> Option<Diagnostic> {
    let message = match &key.facts {
        ArgumentFacts::Constant {
            kind: ConstantKind::String,
        } => return None,
        ArgumentFacts::Constant {
            kind: ConstantKind::Other(kind),
        } => format!(
            "arg {} to {display_name} is constant {kind} but should be a constant string",
            key.index
        ),
        ArgumentFacts::Expression { ty } if ty.underlying_string => return None,
        ArgumentFacts::Expression { ty } => format!(
            "arg {} to {display_name} is expression {} but should be a constant string",
            key.index, ty.name
        ),
        ArgumentFacts::Unknown => return None,
    };

    Some(Diagnostic {
        kind: ViolationKind::NonStringKey,
        location: key.location.clone(),
        message,
    })
}
