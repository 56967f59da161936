//! Call-site descriptors produced by a front end.
//!
//! The engine never looks at source code. A front end resolves each call
//! expression into a [`CallSite`] carrying the callee identity and, per
//! argument, the static facts the validator needs.

use crate::types::Location;
use serde::{Deserialize, Serialize};

/// A named type: `package.name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedType {
    /// Package (module) path the type is declared in.
    pub package: String,
    /// Type name.
    pub name: String,
}

impl NamedType {
    /// Creates a named type.
    #[must_use]
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for NamedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.package, self.name)
    }
}

/// Resolved identity of the callee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CallKind {
    /// A package-level function.
    Function {
        /// Package path the function lives in.
        package: String,
    },
    /// A method invoked on a receiver.
    Method {
        /// Receiver type, `None` when it is not a named type.
        #[serde(default)]
        receiver: Option<NamedType>,
        /// Parameter shape for display, e.g. `(inputs ...interface{})`.
        #[serde(default)]
        params: Option<String>,
    },
}

/// Kind of a compile-time constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstantKind {
    /// A string constant.
    String,
    /// Any other constant, named by its type (e.g. `int`, `i32`, `bool`).
    Other(String),
}

/// Static type of a non-constant argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticType {
    /// Type as written in diagnostics.
    pub name: String,
    /// Whether the underlying representation is a string primitive.
    #[serde(default)]
    pub underlying_string: bool,
    /// The named type, or the pointee when `pointer` is set.
    #[serde(default)]
    pub named: Option<NamedType>,
    /// Whether the type is a pointer (reference) to `named`.
    #[serde(default)]
    pub pointer: bool,
}

impl StaticType {
    /// An unnamed type.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            underlying_string: false,
            named: None,
            pointer: false,
        }
    }

    /// A type whose underlying representation is a string.
    #[must_use]
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            underlying_string: true,
            ..Self::new(name)
        }
    }

    /// A named type.
    #[must_use]
    pub fn named(name: impl Into<String>, named: NamedType) -> Self {
        Self {
            named: Some(named),
            ..Self::new(name)
        }
    }

    /// A pointer to a named type.
    #[must_use]
    pub fn pointer_to(name: impl Into<String>, named: NamedType) -> Self {
        Self {
            named: Some(named),
            pointer: true,
            ..Self::new(name)
        }
    }

    /// Marks the underlying representation as a string.
    #[must_use]
    pub fn with_underlying_string(mut self, underlying_string: bool) -> Self {
        self.underlying_string = underlying_string;
        self
    }
}

/// What the front end knows about one argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "facts", rename_all = "snake_case")]
pub enum ArgumentFacts {
    /// A compile-time constant.
    Constant {
        /// Constant kind.
        kind: ConstantKind,
    },
    /// A non-constant expression with a known static type.
    Expression {
        /// Static type.
        ty: StaticType,
    },
    /// The front end could not type the expression.
    Unknown,
}

/// One argument of a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// Position in the full argument list.
    pub index: usize,
    /// Where the argument is written.
    pub location: Location,
    /// Static facts about the argument.
    #[serde(flatten)]
    pub facts: ArgumentFacts,
}

impl Argument {
    /// Creates an argument descriptor.
    #[must_use]
    pub fn new(index: usize, location: Location, facts: ArgumentFacts) -> Self {
        Self {
            index,
            location,
            facts,
        }
    }

    /// The static type of a non-constant argument, if known.
    #[must_use]
    pub fn static_type(&self) -> Option<&StaticType> {
        match &self.facts {
            ArgumentFacts::Expression { ty } => Some(ty),
            _ => None,
        }
    }
}

/// A call expression as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    /// Callee identity.
    #[serde(flatten)]
    pub kind: CallKind,
    /// Function or method name.
    pub function: String,
    /// Arguments in call order.
    #[serde(default)]
    pub arguments: Vec<Argument>,
    /// Where the call is written.
    pub location: Location,
}

impl CallSite {
    /// A call to the package function `package.function`.
    #[must_use]
    pub fn function(
        package: impl Into<String>,
        function: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            kind: CallKind::Function {
                package: package.into(),
            },
            function: function.into(),
            arguments: Vec::new(),
            location,
        }
    }

    /// A call to `function` on a receiver of type `receiver`.
    #[must_use]
    pub fn method(
        receiver: Option<NamedType>,
        function: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            kind: CallKind::Method {
                receiver,
                params: None,
            },
            function: function.into(),
            arguments: Vec::new(),
            location,
        }
    }

    /// Sets the method parameter shape used in diagnostics.
    #[must_use]
    pub fn with_params(mut self, shape: impl Into<String>) -> Self {
        if let CallKind::Method { params, .. } = &mut self.kind {
            *params = Some(shape.into());
        }
        self
    }

    /// Appends an argument; its index is its position.
    #[must_use]
    pub fn arg(mut self, location: Location, facts: ArgumentFacts) -> Self {
        let index = self.arguments.len();
        self.arguments.push(Argument::new(index, location, facts));
        self
    }

    /// Appends an argument at the call's own location.
    #[must_use]
    pub fn arg_here(self, facts: ArgumentFacts) -> Self {
        let location = self.location.clone();
        self.arg(location, facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn builder_assigns_positions() {
        let call = CallSite::function("p", "X", Location::new(PathBuf::from("a.rs"), 1, 1))
            .arg_here(ArgumentFacts::Constant {
                kind: ConstantKind::String,
            })
            .arg_here(ArgumentFacts::Unknown);

        let indices: Vec<usize> = call.arguments.iter().map(|a| a.index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn with_params_ignored_for_functions() {
        let call = CallSite::function("p", "X", Location::new(PathBuf::from("a.rs"), 1, 1))
            .with_params("(inputs ...interface{})");
        assert_eq!(
            call.kind,
            CallKind::Function {
                package: "p".to_string()
            }
        );
    }

    #[test]
    fn deserializes_from_json_facts() {
        let json = r#"{
            "kind": "method",
            "receiver": { "package": "a", "name": "logger" },
            "params": "(inputs ...interface{})",
            "function": "Log",
            "location": { "file": "a/a.go", "line": 12, "column": 2, "offset": 0, "length": 0 },
            "arguments": [
                { "index": 0, "location": { "file": "a/a.go", "line": 12, "column": 8, "offset": 0, "length": 0 },
                  "facts": "constant", "kind": { "other": "int" } },
                { "index": 1, "location": { "file": "a/a.go", "line": 12, "column": 11, "offset": 0, "length": 0 },
                  "facts": "expression", "ty": { "name": "string", "underlying_string": true } }
            ]
        }"#;

        let call: CallSite = serde_json::from_str(json).unwrap();
        assert_eq!(call.function, "Log");
        assert!(matches!(
            &call.kind,
            CallKind::Method { receiver: Some(r), .. } if r.name == "logger"
        ));
        assert_eq!(
            call.arguments[0].facts,
            ArgumentFacts::Constant {
                kind: ConstantKind::Other("int".to_string())
            }
        );
        assert!(call.arguments[1]
            .static_type()
            .is_some_and(|t| t.underlying_string));
    }
}
