//! Per-module item index: imports, local types, constants and signatures.

use pairs_lint_core::utils::split_last;
use pairs_lint_core::NamedType;
use std::collections::{HashMap, HashSet};
use syn::{FnArg, ImplItem, Item, ReturnType, Type, UseTree};

/// What a module declares and imports, as far as call resolution needs it.
#[derive(Debug, Clone, Default)]
pub(crate) struct ModuleIndex {
    /// Module path, e.g. `crate::log`.
    pub package: String,
    /// Imported name or alias → full path.
    imports: HashMap<String, String>,
    /// Structs, enums, unions and traits declared here.
    types: HashSet<String>,
    /// `type Alias = Target;`
    aliases: HashMap<String, Type>,
    /// `const NAME: Type = ..;`
    consts: HashMap<String, Type>,
    /// Free functions and their return types.
    fns: HashMap<String, Option<Type>>,
    /// Named struct fields: type → field → field type.
    fields: HashMap<String, HashMap<String, Type>>,
    /// Inherent and trait methods: (type, method) → signature.
    methods: HashMap<(String, String), MethodSig>,
    /// `macro_rules!` definitions.
    macros: HashSet<String>,
    /// Child modules, inline or file-backed.
    modules: HashSet<String>,
}

/// Signature facts of a method declared in an `impl` block.
#[derive(Debug, Clone)]
pub(crate) struct MethodSig {
    /// Return type, `None` for `()`.
    pub output: Option<Type>,
    /// Parameter shape without the receiver, e.g. `(msg: &str, pairs: Pairs)`.
    pub params: String,
}

impl ModuleIndex {
    /// Indexes the items of one module.
    pub fn from_items(package: impl Into<String>, items: &[Item]) -> Self {
        let mut index = Self {
            package: package.into(),
            modules: items
                .iter()
                .filter_map(|item| match item {
                    Item::Mod(m) => Some(m.ident.to_string()),
                    _ => None,
                })
                .collect(),
            ..Self::default()
        };

        for item in items {
            match item {
                Item::Use(u) => index.add_use(String::new(), &u.tree),
                Item::Struct(s) => {
                    let name = s.ident.to_string();
                    let fields = s
                        .fields
                        .iter()
                        .filter_map(|f| f.ident.as_ref().map(|i| (i.to_string(), f.ty.clone())))
                        .collect();
                    index.fields.insert(name.clone(), fields);
                    index.types.insert(name);
                }
                Item::Enum(e) => {
                    index.types.insert(e.ident.to_string());
                }
                Item::Union(u) => {
                    index.types.insert(u.ident.to_string());
                }
                Item::Trait(t) => {
                    index.types.insert(t.ident.to_string());
                }
                Item::Type(t) => {
                    index.aliases.insert(t.ident.to_string(), (*t.ty).clone());
                }
                Item::Const(c) => {
                    index.consts.insert(c.ident.to_string(), (*c.ty).clone());
                }
                Item::Fn(f) => {
                    index
                        .fns
                        .insert(f.sig.ident.to_string(), output_type(&f.sig.output));
                }
                Item::Impl(i) => index.add_impl(i),
                Item::Macro(m) => {
                    if let Some(ident) = &m.ident {
                        index.macros.insert(ident.to_string());
                    }
                }
                _ => {}
            }
        }

        index
    }

    fn add_use(&mut self, prefix: String, tree: &UseTree) {
        let join = |prefix: &str, name: &str| {
            if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{prefix}::{name}")
            }
        };

        match tree {
            UseTree::Path(p) => self.add_use(join(&prefix, &p.ident.to_string()), &p.tree),
            UseTree::Name(n) => {
                let name = n.ident.to_string();
                if name == "self" {
                    if let Some(last) = prefix.rsplit("::").next() {
                        let full = self.absolute(&prefix);
                        self.imports.insert(last.to_string(), full);
                    }
                } else {
                    let full = self.absolute(&join(&prefix, &name));
                    self.imports.insert(name, full);
                }
            }
            UseTree::Rename(r) => {
                let target = if r.ident == "self" {
                    prefix.clone()
                } else {
                    join(&prefix, &r.ident.to_string())
                };
                let full = self.absolute(&target);
                self.imports.insert(r.rename.to_string(), full);
            }
            UseTree::Group(g) => {
                for tree in &g.items {
                    self.add_use(prefix.clone(), tree);
                }
            }
            UseTree::Glob(_) => {}
        }
    }

    fn add_impl(&mut self, item: &syn::ItemImpl) {
        let Type::Path(self_ty) = &*item.self_ty else {
            return;
        };
        let Some(segment) = self_ty.path.segments.last() else {
            return;
        };
        let type_name = segment.ident.to_string();

        for impl_item in &item.items {
            if let ImplItem::Fn(f) = impl_item {
                let sig = MethodSig {
                    output: output_type(&f.sig.output),
                    params: crate::ty::render_params(f.sig.inputs.iter().filter_map(|arg| {
                        match arg {
                            FnArg::Typed(t) => Some(t),
                            FnArg::Receiver(_) => None,
                        }
                    })),
                };
                self.methods
                    .insert((type_name.clone(), f.sig.ident.to_string()), sig);
            }
        }
    }

    /// Rewrites a `self::`/`super::` or child-module path into an absolute one.
    fn absolute(&self, path: &str) -> String {
        let mut segments: Vec<&str> = path.split("::").collect();
        let mut base: Vec<&str> = self.package.split("::").collect();

        match segments.first() {
            Some(&"self") => {
                segments.remove(0);
            }
            Some(&"super") => {
                while segments.first() == Some(&"super") {
                    segments.remove(0);
                    if base.len() > 1 {
                        base.pop();
                    }
                }
            }
            Some(head) if self.modules.contains(*head) => {}
            _ => return path.to_string(),
        }

        base.extend(segments);
        base.join("::")
    }

    /// Resolves a written path (`Logger`, `log::Logger`, `crate::log::Logger`)
    /// into an absolute one. Unknown single-segment names resolve to `None`.
    pub fn resolve(&self, segments: &[String]) -> Option<String> {
        self.resolve_with(segments, false)
    }

    /// Like [`Self::resolve`], but an unknown lone segment is taken as a
    /// crate name (`log` in `log::info`).
    pub fn resolve_prefix(&self, segments: &[String]) -> Option<String> {
        self.resolve_with(segments, true)
    }

    fn resolve_with(&self, segments: &[String], external: bool) -> Option<String> {
        let (first, rest) = segments.split_first()?;

        let head = match first.as_str() {
            "crate" => "crate".to_string(),
            "self" | "super" => return Some(self.absolute(&segments.join("::"))),
            name => match self.imports.get(name) {
                Some(full) => full.clone(),
                None if self.modules.contains(name) => format!("{}::{name}", self.package),
                None if rest.is_empty() && self.declares(name) => {
                    format!("{}::{name}", self.package)
                }
                None if rest.is_empty() && !external => return None,
                None => name.to_string(),
            },
        };

        Some(
            std::iter::once(head)
                .chain(rest.iter().cloned())
                .collect::<Vec<_>>()
                .join("::"),
        )
    }

    /// Resolves a written type path into a named type.
    pub fn named_type(&self, segments: &[String]) -> Option<NamedType> {
        let full = self.resolve(segments)?;
        let (package, name) = split_last(&full)?;
        Some(NamedType::new(package, name))
    }

    /// Resolves a called function or macro name into `(package, name)`.
    ///
    /// Single-segment names must be imported or declared in this module.
    pub fn callee(&self, segments: &[String]) -> Option<(String, String)> {
        if let [name] = segments {
            if let Some(full) = self.imports.get(name) {
                let (package, function) = split_last(full)?;
                return Some((package.to_string(), function.to_string()));
            }
            if self.fns.contains_key(name) || self.macros.contains(name) {
                return Some((self.package.clone(), name.clone()));
            }
            return None;
        }

        let (function, prefix) = segments.split_last()?;
        Some((self.resolve_prefix(prefix)?, function.clone()))
    }

    fn declares(&self, name: &str) -> bool {
        self.types.contains(name) || self.aliases.contains_key(name)
    }

    /// The aliased type of a local `type` item.
    pub fn alias(&self, name: &str) -> Option<&Type> {
        self.aliases.get(name)
    }

    /// The declared type of a module-level constant.
    pub fn const_type(&self, name: &str) -> Option<&Type> {
        self.consts.get(name)
    }

    /// The return type of a free function declared here.
    pub fn fn_output(&self, name: &str) -> Option<&Type> {
        self.fns.get(name).and_then(Option::as_ref)
    }

    /// The type of a named field of a struct declared here.
    pub fn field_type(&self, type_name: &str, field: &str) -> Option<&Type> {
        self.fields.get(type_name).and_then(|f| f.get(field))
    }

    /// Signature of `type_name::method` if declared in this module.
    pub fn method(&self, type_name: &str, method: &str) -> Option<&MethodSig> {
        self.methods.get(&(type_name.to_string(), method.to_string()))
    }

    /// Whether `named` is declared in this module.
    pub fn is_local(&self, named: &NamedType) -> bool {
        named.package == self.package && self.types.contains(&named.name)
    }
}

fn output_type(output: &ReturnType) -> Option<Type> {
    match output {
        ReturnType::Default => None,
        ReturnType::Type(_, ty) => Some((**ty).clone()),
    }
}

/// Segments of a path as strings, generics dropped.
pub(crate) fn segments(path: &syn::Path) -> Vec<String> {
    path.segments.iter().map(|s| s.ident.to_string()).collect()
}
