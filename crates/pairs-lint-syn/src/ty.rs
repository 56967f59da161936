//! Rendering and classification of written Rust types.

use crate::module::{segments, ModuleIndex};
use pairs_lint_core::{ConstantKind, NamedType, StaticType};
use quote::ToTokens;
use syn::{GenericArgument, Lit, PatType, PathArguments, Type, TypePath};

/// Wrappers that are strings when they wrap a string.
const STRING_WRAPPERS: &[&str] = &["Cow", "Box", "Rc", "Arc"];

/// Renders a type the way it is usually written.
pub(crate) fn render(ty: &Type) -> String {
    match ty {
        Type::Path(p) => render_path(p),
        Type::Reference(r) => {
            let lifetime = r
                .lifetime
                .as_ref()
                .map(|l| format!("{l} "))
                .unwrap_or_default();
            let mutability = if r.mutability.is_some() { "mut " } else { "" };
            format!("&{lifetime}{mutability}{}", render(&r.elem))
        }
        Type::Ptr(p) => {
            let kind = if p.mutability.is_some() { "mut" } else { "const" };
            format!("*{kind} {}", render(&p.elem))
        }
        Type::Slice(s) => format!("[{}]", render(&s.elem)),
        Type::Array(a) => format!("[{}; {}]", render(&a.elem), tokens(&a.len)),
        Type::Tuple(t) => {
            let elems: Vec<String> = t.elems.iter().map(render).collect();
            if elems.len() == 1 {
                format!("({},)", elems[0])
            } else {
                format!("({})", elems.join(", "))
            }
        }
        Type::Paren(p) => format!("({})", render(&p.elem)),
        Type::Group(g) => render(&g.elem),
        Type::Never(_) => "!".to_string(),
        Type::Infer(_) => "_".to_string(),
        other => tokens(other),
    }
}

fn render_path(p: &TypePath) -> String {
    p.path
        .segments
        .iter()
        .map(|seg| match &seg.arguments {
            PathArguments::AngleBracketed(args) => {
                let args: Vec<String> = args
                    .args
                    .iter()
                    .map(|arg| match arg {
                        GenericArgument::Type(t) => render(t),
                        GenericArgument::Lifetime(l) => l.to_string(),
                        other => tokens(other),
                    })
                    .collect();
                format!("{}<{}>", seg.ident, args.join(", "))
            }
            PathArguments::Parenthesized(_) => tokens(seg),
            PathArguments::None => seg.ident.to_string(),
        })
        .collect::<Vec<_>>()
        .join("::")
}

/// Token fallback with the spacing `quote` inserts tidied up.
fn tokens(node: &impl ToTokens) -> String {
    node.to_token_stream()
        .to_string()
        .replace(" :: ", "::")
        .replace(" < ", "<")
        .replace(" >", ">")
        .replace("& ", "&")
        .replace(" ,", ",")
}

/// Renders a parameter list, e.g. `(msg: &str, pairs: Pairs)`.
pub(crate) fn render_params<'a>(params: impl Iterator<Item = &'a PatType>) -> String {
    let rendered: Vec<String> = params
        .map(|p| format!("{}: {}", tokens(&*p.pat), render(&p.ty)))
        .collect();
    format!("({})", rendered.join(", "))
}

/// Resolves written types against one module.
pub(crate) struct TypeResolver<'m> {
    module: &'m ModuleIndex,
    self_type: Option<&'m NamedType>,
}

impl<'m> TypeResolver<'m> {
    pub fn new(module: &'m ModuleIndex, self_type: Option<&'m NamedType>) -> Self {
        Self { module, self_type }
    }

    /// The static type of a written type.
    pub fn static_type(&self, ty: &Type) -> StaticType {
        self.classify(ty, 0)
    }

    fn classify(&self, ty: &Type, depth: usize) -> StaticType {
        let name = render(ty);
        match ty {
            Type::Group(g) => self.classify(&g.elem, depth),
            Type::Paren(p) => self.classify(&p.elem, depth),
            Type::Reference(r) => {
                let inner = self.classify(&r.elem, depth);
                let mut st = StaticType::new(name).with_underlying_string(inner.underlying_string);
                if !inner.pointer {
                    st.named = inner.named;
                    st.pointer = st.named.is_some();
                }
                st
            }
            Type::Ptr(p) => {
                let inner = self.classify(&p.elem, depth);
                match inner.named {
                    Some(named) if !inner.pointer => StaticType::pointer_to(name, named),
                    _ => StaticType::new(name),
                }
            }
            Type::Path(p) if p.qself.is_none() => self.classify_path(p, name, depth),
            _ => StaticType::new(name),
        }
    }

    fn classify_path(&self, p: &TypePath, name: String, depth: usize) -> StaticType {
        let Some(last) = p.path.segments.last() else {
            return StaticType::new(name);
        };
        let ident = last.ident.to_string();

        if p.path.segments.len() == 1 {
            match ident.as_str() {
                "str" | "String" => return StaticType::string(name),
                "Self" => {
                    return match self.self_type {
                        Some(named) => StaticType::named(name, named.clone()),
                        None => StaticType::new(name),
                    }
                }
                _ => {}
            }

            // Aliases keep their own name but take the target's representation.
            if depth < 8 {
                if let Some(target) = self.module.alias(&ident) {
                    let target = self.classify(target, depth + 1);
                    return StaticType { name, ..target };
                }
            }
        }

        if STRING_WRAPPERS.contains(&ident.as_str()) && self.wraps_string(last) {
            return StaticType::string(name);
        }

        match self.module.named_type(&segments(&p.path)) {
            Some(named) => StaticType::named(name, named),
            None => StaticType::new(name),
        }
    }

    fn wraps_string(&self, segment: &syn::PathSegment) -> bool {
        let PathArguments::AngleBracketed(args) = &segment.arguments else {
            return false;
        };
        args.args.iter().any(|arg| match arg {
            GenericArgument::Type(t) => {
                matches!(t, Type::Path(_)) && self.static_type(t).underlying_string
            }
            _ => false,
        })
    }

    /// The constant kind of a `const` declared with type `ty`.
    pub fn constant_kind(&self, ty: &Type) -> ConstantKind {
        let st = self.static_type(ty);
        if st.underlying_string {
            ConstantKind::String
        } else {
            ConstantKind::Other(st.name)
        }
    }
}

/// Constant kind of a literal, `None` for verbatim tokens.
pub(crate) fn literal_kind(lit: &Lit) -> Option<ConstantKind> {
    let kind = match lit {
        Lit::Str(_) => ConstantKind::String,
        Lit::ByteStr(b) => ConstantKind::Other(format!("&[u8; {}]", b.value().len())),
        Lit::CStr(_) => ConstantKind::Other("&CStr".to_string()),
        Lit::Byte(_) => ConstantKind::Other("u8".to_string()),
        Lit::Char(_) => ConstantKind::Other("char".to_string()),
        Lit::Int(i) => ConstantKind::Other(non_empty(i.suffix(), "i32")),
        Lit::Float(f) => ConstantKind::Other(non_empty(f.suffix(), "f64")),
        Lit::Bool(_) => ConstantKind::Other("bool".to_string()),
        _ => return None,
    };
    Some(kind)
}

fn non_empty(suffix: &str, default: &str) -> String {
    if suffix.is_empty() {
        default.to_string()
    } else {
        suffix.to_string()
    }
}
