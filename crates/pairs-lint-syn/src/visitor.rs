//! Syntax walk producing call-site descriptors.

use crate::module::{segments, ModuleIndex};
use crate::scope::{Binding, ScopeTracker};
use crate::ty::{literal_kind, TypeResolver};
use pairs_lint_core::{
    ArgumentFacts, CallSite, ConstantKind, FileContext, Location, NamedType, StaticType,
};
use proc_macro2::Span;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::visit::{self, Visit};
use syn::{
    Arm, Block, Expr, ExprCall, ExprClosure, ExprMethodCall, FnArg, ImplItemFn, ItemConst, ItemFn,
    ItemImpl, ItemMod, ItemTrait, Lit, Local, Macro, Member, Pat, PatIdent, Signature, Token,
    TraitItemFn, Type, UnOp,
};

/// Methods that turn a string-like receiver into an owned `String`.
const TO_STRING: &[&str] = &["to_string", "to_owned", "into_owned"];

pub(crate) struct CallVisitor<'a> {
    ctx: &'a FileContext<'a>,
    root: ModuleIndex,
    nested: Vec<ModuleIndex>,
    self_types: Vec<Option<NamedType>>,
    scopes: ScopeTracker,
    fn_depth: usize,
    pub calls: Vec<CallSite>,
}

impl<'a> CallVisitor<'a> {
    pub fn new(ctx: &'a FileContext<'a>, ast: &syn::File) -> Self {
        Self {
            ctx,
            root: ModuleIndex::from_items(ctx.package(), &ast.items),
            nested: Vec::new(),
            self_types: Vec::new(),
            scopes: ScopeTracker::new(),
            fn_depth: 0,
            calls: Vec::new(),
        }
    }

    fn module(&self) -> &ModuleIndex {
        self.nested.last().unwrap_or(&self.root)
    }

    fn self_type(&self) -> Option<&NamedType> {
        self.self_types.last().and_then(Option::as_ref)
    }

    fn resolver(&self) -> TypeResolver<'_> {
        TypeResolver::new(self.module(), self.self_type())
    }

    fn location(&self, span: Span) -> Location {
        Location::from_span(self.ctx.relative_path.clone(), span)
    }

    fn record<'e>(&mut self, call: CallSite, args: impl Iterator<Item = &'e Expr>) {
        let call = args.fold(call, |call, arg| {
            call.arg(self.location(arg.span()), self.classify(arg))
        });
        self.calls.push(call);
    }

    /// Argument facts for one expression.
    fn classify(&self, expr: &Expr) -> ArgumentFacts {
        if let Some(kind) = self.constant_kind(expr) {
            return ArgumentFacts::Constant { kind };
        }

        if let Expr::Reference(r) = expr {
            if let Some(kind) = self.constant_kind(&r.expr) {
                let ty = match kind {
                    ConstantKind::String => StaticType::string("&&str"),
                    ConstantKind::Other(name) => StaticType::new(format!("&{name}")),
                };
                return ArgumentFacts::Expression { ty };
            }
        }

        match self.expr_type(expr) {
            Some(ty) => ArgumentFacts::Expression { ty },
            None => ArgumentFacts::Unknown,
        }
    }

    fn constant_kind(&self, expr: &Expr) -> Option<ConstantKind> {
        match expr {
            Expr::Lit(l) => literal_kind(&l.lit),
            Expr::Paren(p) => self.constant_kind(&p.expr),
            Expr::Group(g) => self.constant_kind(&g.expr),
            Expr::Unary(u) if matches!(u.op, UnOp::Neg(_)) => match &*u.expr {
                Expr::Lit(l) if matches!(l.lit, Lit::Int(_) | Lit::Float(_)) => {
                    literal_kind(&l.lit)
                }
                _ => None,
            },
            Expr::Path(p) if p.qself.is_none() => match segments(&p.path).as_slice() {
                [name] => match self.scopes.lookup(name) {
                    Some(Binding::Const(kind)) => Some(kind.clone()),
                    Some(_) => None,
                    None => self.module_const(name),
                },
                [prefix @ .., name] => {
                    let module = self.module();
                    (module.resolve_prefix(prefix)? == module.package)
                        .then(|| self.module_const(name))
                        .flatten()
                }
                [] => None,
            },
            _ => None,
        }
    }

    fn names_const(&self, name: &str) -> bool {
        match self.scopes.lookup(name) {
            Some(binding) => matches!(binding, Binding::Const(_)),
            None => self.module().const_type(name).is_some(),
        }
    }

    fn module_const(&self, name: &str) -> Option<ConstantKind> {
        let ty = self.module().const_type(name)?;
        Some(self.resolver().constant_kind(ty))
    }

    /// Static type of a non-constant expression, if it can be read off the source.
    fn expr_type(&self, expr: &Expr) -> Option<StaticType> {
        match expr {
            Expr::Paren(p) => self.expr_type(&p.expr),
            Expr::Group(g) => self.expr_type(&g.expr),
            Expr::Path(p) if p.qself.is_none() => {
                let ident = p.path.get_ident()?;
                match self.scopes.lookup(&ident.to_string())? {
                    Binding::Typed(ty) => Some(ty.clone()),
                    _ => None,
                }
            }
            Expr::Reference(r) => {
                let inner = self.expr_type(&r.expr)?;
                Some(reference_to(inner, r.mutability.is_some()))
            }
            Expr::Cast(c) => Some(self.resolver().static_type(&c.ty)),
            Expr::Field(f) => {
                let Member::Named(field) = &f.member else {
                    return None;
                };
                let named = self.expr_type(&f.base)?.named?;
                let module = self.module();
                if !module.is_local(&named) {
                    return None;
                }
                let ty = module.field_type(&named.name, &field.to_string())?;
                Some(TypeResolver::new(module, Some(&named)).static_type(ty))
            }
            Expr::Struct(s) if s.qself.is_none() => self.path_type(&s.path),
            Expr::Call(c) => self.call_type(c),
            Expr::MethodCall(m) => self.method_call_type(m),
            Expr::Macro(m) if m.mac.path.is_ident("format") => Some(StaticType::string("String")),
            _ => None,
        }
    }

    /// The named type a type path (`Logger`, `Self`, `log::Logger`) denotes.
    fn path_type(&self, path: &syn::Path) -> Option<StaticType> {
        self.segments_type(&segments(path))
    }

    fn segments_type(&self, segs: &[String]) -> Option<StaticType> {
        let named = if segs == ["Self"] {
            self.self_type()?.clone()
        } else {
            self.module().named_type(segs)?
        };
        Some(StaticType::named(segs.join("::"), named))
    }

    fn call_type(&self, call: &ExprCall) -> Option<StaticType> {
        let Expr::Path(p) = &*call.func else {
            return None;
        };
        if p.qself.is_some() {
            return None;
        }

        let segs = segments(&p.path);
        let module = self.module();
        match segs.as_slice() {
            [name] => {
                let output = module.fn_output(name)?;
                Some(self.resolver().static_type(output))
            }
            [type_segs @ .., function] => {
                if type_segs == ["String"] {
                    return matches!(function.as_str(), "new" | "from" | "with_capacity")
                        .then(|| StaticType::string("String"));
                }

                let owner = self.segments_type(type_segs)?;
                let named = owner.named.clone()?;

                if module.is_local(&named) {
                    if let Some(sig) = module.method(&named.name, function) {
                        let output = sig.output.as_ref()?;
                        return Some(TypeResolver::new(module, Some(&named)).static_type(output));
                    }
                }
                matches!(function.as_str(), "new" | "default").then_some(owner)
            }
            [] => None,
        }
    }

    fn method_call_type(&self, call: &ExprMethodCall) -> Option<StaticType> {
        let method = call.method.to_string();
        if method == "to_string" {
            return Some(StaticType::string("String"));
        }
        if TO_STRING.contains(&method.as_str()) && self.is_string_like(&call.receiver) {
            return Some(StaticType::string("String"));
        }
        if method == "as_str" && self.is_string_like(&call.receiver) {
            return Some(StaticType::string("&str"));
        }

        let receiver = self.expr_type(&call.receiver)?;
        if method == "clone" {
            return Some(receiver);
        }

        let named = receiver.named?;
        let module = self.module();
        if !module.is_local(&named) {
            return None;
        }
        let output = module.method(&named.name, &method)?.output.as_ref()?;
        Some(TypeResolver::new(module, Some(&named)).static_type(output))
    }

    fn is_string_like(&self, expr: &Expr) -> bool {
        match self.classify(expr) {
            ArgumentFacts::Constant { kind } => kind == ConstantKind::String,
            ArgumentFacts::Expression { ty } => ty.underlying_string,
            ArgumentFacts::Unknown => false,
        }
    }

    /// What a `let` without a type annotation binds.
    fn infer_binding(&self, init: &Expr) -> Binding {
        match self.classify(init) {
            ArgumentFacts::Constant {
                kind: ConstantKind::String,
            } => Binding::Typed(StaticType::string("&str")),
            ArgumentFacts::Constant {
                kind: ConstantKind::Other(name),
            } => Binding::Typed(StaticType::new(name)),
            ArgumentFacts::Expression { ty } => Binding::Typed(ty),
            ArgumentFacts::Unknown => Binding::Unknown,
        }
    }

    fn enter_fn(&mut self, sig: &Signature) {
        self.scopes.push_fn_frame();
        self.fn_depth += 1;

        for input in &sig.inputs {
            match input {
                FnArg::Receiver(r) => {
                    let ty = self.resolver().static_type(&r.ty);
                    self.scopes.bind("self", Binding::Typed(ty));
                }
                FnArg::Typed(t) => {
                    self.visit_pat(&t.pat);
                    if let Pat::Ident(id) = &*t.pat {
                        let ty = self.resolver().static_type(&t.ty);
                        self.scopes.bind(id.ident.to_string(), Binding::Typed(ty));
                    }
                }
            }
        }
    }

    fn leave_fn(&mut self) {
        self.fn_depth -= 1;
        self.scopes.pop_frame();
    }

    fn visit_fn_body(&mut self, sig: &Signature, block: &Block) {
        self.enter_fn(sig);
        self.visit_block(block);
        self.leave_fn();
    }

    /// Walks expressions parsed out of a macro body.
    fn visit_macro_args(&mut self, args: &Punctuated<Expr, Token![,]>) {
        for arg in args {
            self.visit_expr(arg);
        }
    }
}

fn reference_to(inner: StaticType, mutable: bool) -> StaticType {
    let mutability = if mutable { "mut " } else { "" };
    let mut ty = StaticType::new(format!("&{mutability}{}", inner.name))
        .with_underlying_string(inner.underlying_string);
    if !inner.pointer {
        ty.pointer = inner.named.is_some();
        ty.named = inner.named;
    }
    ty
}

impl<'ast> Visit<'ast> for CallVisitor<'_> {
    fn visit_item_mod(&mut self, node: &'ast ItemMod) {
        let Some((_, items)) = &node.content else {
            return;
        };
        let package = format!("{}::{}", self.module().package, node.ident);
        self.nested.push(ModuleIndex::from_items(package, items));
        visit::visit_item_mod(self, node);
        self.nested.pop();
    }

    fn visit_item_impl(&mut self, node: &'ast ItemImpl) {
        let self_type = match &*node.self_ty {
            Type::Path(p) if p.qself.is_none() => self.module().named_type(&segments(&p.path)),
            _ => None,
        };
        self.self_types.push(self_type);
        visit::visit_item_impl(self, node);
        self.self_types.pop();
    }

    fn visit_item_trait(&mut self, node: &'ast ItemTrait) {
        self.self_types.push(None);
        visit::visit_item_trait(self, node);
        self.self_types.pop();
    }

    fn visit_item_fn(&mut self, node: &'ast ItemFn) {
        self.visit_fn_body(&node.sig, &node.block);
    }

    fn visit_impl_item_fn(&mut self, node: &'ast ImplItemFn) {
        self.visit_fn_body(&node.sig, &node.block);
    }

    fn visit_trait_item_fn(&mut self, node: &'ast TraitItemFn) {
        if let Some(block) = &node.default {
            self.visit_fn_body(&node.sig, block);
        }
    }

    fn visit_item_const(&mut self, node: &'ast ItemConst) {
        visit::visit_item_const(self, node);
        if self.fn_depth > 0 {
            let kind = self.resolver().constant_kind(&node.ty);
            self.scopes.bind(node.ident.to_string(), Binding::Const(kind));
        }
    }

    fn visit_block(&mut self, node: &'ast Block) {
        self.scopes.push_frame();
        visit::visit_block(self, node);
        self.scopes.pop_frame();
    }

    fn visit_arm(&mut self, node: &'ast Arm) {
        self.scopes.push_frame();
        visit::visit_arm(self, node);
        self.scopes.pop_frame();
    }

    fn visit_expr_closure(&mut self, node: &'ast ExprClosure) {
        self.scopes.push_frame();
        for input in &node.inputs {
            self.visit_pat(input);
            if let Pat::Type(pt) = input {
                if let Pat::Ident(id) = &*pt.pat {
                    let ty = self.resolver().static_type(&pt.ty);
                    self.scopes.bind(id.ident.to_string(), Binding::Typed(ty));
                }
            }
        }
        self.visit_expr(&node.body);
        self.scopes.pop_frame();
    }

    fn visit_local(&mut self, node: &'ast Local) {
        // The initializer is evaluated before its pattern binds.
        if let Some(init) = &node.init {
            self.visit_expr(&init.expr);
            if let Some((_, diverge)) = &init.diverge {
                self.visit_expr(diverge);
            }
        }
        self.visit_pat(&node.pat);

        let binding = match &node.pat {
            Pat::Type(pt) => match &*pt.pat {
                Pat::Ident(id) => Some((
                    id.ident.to_string(),
                    Binding::Typed(self.resolver().static_type(&pt.ty)),
                )),
                _ => None,
            },
            Pat::Ident(id) => node
                .init
                .as_ref()
                .map(|init| (id.ident.to_string(), self.infer_binding(&init.expr))),
            _ => None,
        };
        if let Some((name, binding)) = binding {
            self.scopes.bind(name, binding);
        }
    }

    fn visit_pat_ident(&mut self, node: &'ast PatIdent) {
        let name = node.ident.to_string();
        // A bare const name in a pattern matches against the const.
        let plain = node.by_ref.is_none() && node.mutability.is_none() && node.subpat.is_none();
        if !(plain && self.names_const(&name)) {
            self.scopes.bind(name, Binding::Unknown);
        }
        visit::visit_pat_ident(self, node);
    }

    fn visit_expr_call(&mut self, node: &'ast ExprCall) {
        if let Expr::Path(p) = &*node.func {
            if p.qself.is_none() {
                let segs = segments(&p.path);
                let callee = match segs.as_slice() {
                    [first, function] if first == "Self" => self
                        .self_type()
                        .map(|t| (format!("{}::{}", t.package, t.name), function.clone())),
                    _ => self.module().callee(&segs),
                };

                if let Some((package, function)) = callee {
                    let call = CallSite::function(package, function, self.location(node.span()));
                    self.record(call, node.args.iter());
                }
            }
        }
        visit::visit_expr_call(self, node);
    }

    fn visit_expr_method_call(&mut self, node: &'ast ExprMethodCall) {
        let receiver = self.expr_type(&node.receiver).and_then(|ty| ty.named);
        if let Some(named) = receiver {
            let method = node.method.to_string();
            let params = {
                let module = self.module();
                module
                    .is_local(&named)
                    .then(|| module.method(&named.name, &method))
                    .flatten()
                    .map(|sig| sig.params.clone())
            };

            let mut call = CallSite::method(Some(named), method, self.location(node.span()));
            if let Some(params) = params {
                call = call.with_params(params);
            }
            self.record(call, node.args.iter());
        }
        visit::visit_expr_method_call(self, node);
    }

    fn visit_macro(&mut self, node: &'ast Macro) {
        let Ok(args) = node.parse_body_with(Punctuated::<Expr, Token![,]>::parse_terminated) else {
            return;
        };

        if let Some((package, function)) = self.module().callee(&segments(&node.path)) {
            let call = CallSite::function(package, function, self.location(node.path.span()));
            self.record(call, args.iter());
        }
        self.visit_macro_args(&args);
    }
}
