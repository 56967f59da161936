//! Immutable rule and whitelist tables.
//!
//! A [`Registry`] is built once from specification strings, before any call
//! site is analyzed, and is only read afterwards. It is shared by reference
//! between worker threads.

use crate::config::Config;
use crate::selector::{parse_rule, parse_whitelist, ConfigurationError, Selector, WhitelistedType};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Mapping from [`Selector`] to the offset at which pairs begin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    entries: HashMap<Selector, usize>,
}

impl RuleTable {
    /// Inserts a rule, overwriting any previous offset for the same selector.
    pub fn register(&mut self, selector: Selector, offset: usize) {
        if let Some(previous) = self.entries.insert(selector.clone(), offset) {
            debug!("Rule {} re-registered: offset {} -> {}", selector, previous, offset);
        }
    }

    /// Looks up the offset registered for `selector`.
    #[must_use]
    pub fn get(&self, selector: &Selector) -> Option<usize> {
        self.entries.get(selector).copied()
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no rule is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Set of trusted container types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
    entries: HashSet<WhitelistedType>,
}

impl Whitelist {
    /// Adds a trusted type.
    pub fn register(&mut self, entry: WhitelistedType) {
        self.entries.insert(entry);
    }

    /// Returns true if `package.type_name` is trusted.
    #[must_use]
    pub fn contains(&self, package: &str, type_name: &str) -> bool {
        self.entries.contains(&WhitelistedType::new(package, type_name))
    }

    /// Number of trusted types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no type is trusted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The complete, immutable configuration consulted by the matcher and validator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    rules: RuleTable,
    whitelist: Whitelist,
}

impl Registry {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Builds a registry from the `pair_funcs` and `assume_pairs` config lists.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] raised by a malformed spec.
    pub fn from_config(config: &Config) -> Result<Self, ConfigurationError> {
        Self::builder()
            .pair_funcs(config.pair_funcs.iter().cloned())
            .assume_pairs(config.assume_pairs.iter().cloned())
            .build()
    }

    /// The rule table.
    #[must_use]
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// The whitelist.
    #[must_use]
    pub fn whitelist(&self) -> &Whitelist {
        &self.whitelist
    }
}

/// Collects rule and whitelist specifications and parses them in one go.
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    pair_funcs: Vec<String>,
    assume_pairs: Vec<String>,
}

impl RegistryBuilder {
    /// Adds a rule specification (`[pkg[.type]].<func>=<offset>`).
    #[must_use]
    pub fn pair_func(mut self, spec: impl Into<String>) -> Self {
        self.pair_funcs.push(spec.into());
        self
    }

    /// Adds multiple rule specifications.
    #[must_use]
    pub fn pair_funcs<I, S>(mut self, specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pair_funcs.extend(specs.into_iter().map(Into::into));
        self
    }

    /// Adds a whitelist specification (`<pkg>.<type>`).
    #[must_use]
    pub fn assume_pair(mut self, spec: impl Into<String>) -> Self {
        self.assume_pairs.push(spec.into());
        self
    }

    /// Adds multiple whitelist specifications.
    #[must_use]
    pub fn assume_pairs<I, S>(mut self, specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assume_pairs.extend(specs.into_iter().map(Into::into));
        self
    }

    /// Parses every specification, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] encountered.
    pub fn build(self) -> Result<Registry, ConfigurationError> {
        let mut registry = Registry::default();

        for spec in &self.pair_funcs {
            let (selector, offset) = parse_rule(spec)?;
            registry.rules.register(selector, offset);
        }
        for spec in &self.assume_pairs {
            registry.whitelist.register(parse_whitelist(spec)?);
        }

        debug!(
            "Registry built: {} rule(s), {} whitelisted type(s)",
            registry.rules.len(),
            registry.whitelist.len()
        );
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_registration_wins() {
        let registry = Registry::builder()
            .pair_func(".Log=0")
            .pair_func(".Log=3")
            .build()
            .unwrap();

        assert_eq!(registry.rules().len(), 1);
        assert_eq!(
            registry.rules().get(&Selector::generic_method("Log")),
            Some(3)
        );
    }

    #[test]
    fn malformed_spec_aborts_build() {
        let result = Registry::builder()
            .pair_func(".Log=0")
            .pair_func("wrong")
            .build();
        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidRule { ref spec }) if spec == "wrong"
        ));

        let result = Registry::builder().assume_pair("NoDot").build();
        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidWhitelist { .. })
        ));
    }

    #[test]
    fn whitelist_lookup() {
        let registry = Registry::builder()
            .assume_pair("crate::kv.Pairs")
            .build()
            .unwrap();

        assert!(registry.whitelist().contains("crate::kv", "Pairs"));
        assert!(!registry.whitelist().contains("crate::kv", "Other"));
        assert!(!registry.whitelist().contains("crate", "Pairs"));
    }

    #[test]
    fn from_config_reads_spec_lists() {
        let config = Config::parse(
            r#"
pair_funcs = [".log=0", "crate::errors.wrap=2"]
assume_pairs = ["crate::kv.Pairs"]
"#,
        )
        .unwrap();

        let registry = Registry::from_config(&config).unwrap();
        assert_eq!(registry.rules().len(), 2);
        assert_eq!(
            registry
                .rules()
                .get(&Selector::package_function("crate::errors", "wrap")),
            Some(2)
        );
        assert_eq!(registry.whitelist().len(), 1);
    }
}
