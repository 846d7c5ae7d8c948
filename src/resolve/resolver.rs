//! The [`Resolver`] query surface and per-expression dispatch.

use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::trace;

use super::ResolverOptions;
use crate::base::{FileId, SourceRange};
use crate::model::{
    CodeModel, Declaration, ExprId, ExprKind, MethodCall, StatementId, StatementKind,
    StatementTag,
};

/// Resolves uses against a merged [`CodeModel`].
///
/// A resolver only borrows the model, so any number of them can query the
/// same model concurrently once merging is done.
///
/// # Example
///
/// ```
/// use srcgraph::model::CodeModel;
/// use srcgraph::resolve::Resolver;
/// use srcgraph::syntax::{Expr, FileUnit, Language, MethodDecl, Stmt, TypeDecl};
///
/// let mut model = CodeModel::new();
/// let root = model
///     .parse_file_unit(FileUnit::new("A.cs", Language::CSharp).with(vec![
///         TypeDecl::class("A")
///             .body(vec![
///                 Stmt::field("int", "count"),
///                 MethodDecl::new("Run")
///                     .body(vec![Stmt::expr(Expr::var("count"))])
///                     .into(),
///             ])
///             .into(),
///     ]))
///     .unwrap();
///
/// let resolver = Resolver::new(&model);
/// let class = model.children(root)[0];
/// let run = model.children(class)[1];
/// let body = model.children(run)[0];
/// let use_of_count = model.statement(body).content.unwrap();
///
/// let matches = resolver.find_matches(use_of_count);
/// assert_eq!(matches.len(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    pub(super) model: &'a CodeModel,
    pub(super) options: ResolverOptions,
}

/// Which recursive query a guard entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(super) enum Query {
    Matches,
    Type,
}

/// Per-query search state.
#[derive(Debug)]
pub(super) struct Cx {
    depth: usize,
    resolving: FxHashSet<(ExprId, Query)>,
    /// Consult imports after the lexical walk.
    pub(super) imports: bool,
    /// Consult aliases after the lexical walk.
    pub(super) aliases: bool,
}

impl Cx {
    pub(super) fn new() -> Self {
        Self {
            depth: 0,
            resolving: FxHashSet::default(),
            imports: true,
            aliases: true,
        }
    }

    /// Run `f` with imports and/or aliases switched off; never re-enables them.
    pub(super) fn restricted<T>(
        &mut self,
        imports: bool,
        aliases: bool,
        f: impl FnOnce(&mut Cx) -> T,
    ) -> T {
        let saved = (self.imports, self.aliases);
        self.imports &= imports;
        self.aliases &= aliases;
        let out = f(self);
        (self.imports, self.aliases) = saved;
        out
    }
}

/// What kind of declaration a lookup accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Want {
    Any,
    /// Variables, fields, parameters and properties.
    Value,
    Type,
    /// Anything with members: namespaces, types, and values of a type.
    Container,
    /// Non-constructor methods callable with `argc` arguments.
    Call { argc: usize, destructor: bool },
    Constructor { argc: usize },
}

/// Where a lookup starts.
#[derive(Debug, Clone, Copy)]
pub(super) struct Origin {
    pub(super) stmt: StatementId,
    /// The child of `stmt` the lookup came from, if any.
    pub(super) child: Option<StatementId>,
    pub(super) file: FileId,
    pub(super) range: Option<SourceRange>,
}

const MEMBER_OPERATORS: &[&str] = &[".", "->", "::", "?."];

impl<'a> Resolver<'a> {
    pub fn new(model: &'a CodeModel) -> Self {
        Self::with_options(model, ResolverOptions::default())
    }

    pub fn with_options(model: &'a CodeModel, options: ResolverOptions) -> Self {
        Self { model, options }
    }

    pub fn model(&self) -> &'a CodeModel {
        self.model
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Declarations a use denotes, most specific first.
    ///
    /// Unresolvable uses yield an empty vector. A variable declaration
    /// matches itself.
    pub fn find_matches(&self, expr: ExprId) -> Vec<Declaration> {
        let mut cx = self.context_for(expr);
        dedup(self.find_matches_in(&mut cx, expr))
    }

    /// Type definitions (or built-ins) an expression evaluates to.
    pub fn resolve_type(&self, expr: ExprId) -> Vec<StatementId> {
        let mut cx = self.context_for(expr);
        dedup(self.resolve_type_in(&mut cx, expr))
    }

    /// Namespaces and types a name prefix chain denotes.
    pub fn resolve_prefix(&self, prefix: ExprId) -> Vec<Declaration> {
        let mut cx = self.context_for(prefix);
        dedup(self.resolve_prefix_in(&mut cx, prefix, usize::MAX))
    }

    /// Resolved parent types of a type definition, in declared order.
    pub fn parent_types(&self, ty: StatementId) -> Vec<StatementId> {
        self.parent_types_in(&mut Cx::new(), ty)
    }

    /// Import statements visible at a use, innermost scope first.
    pub fn imports(&self, expr: ExprId) -> Vec<StatementId> {
        self.origin_of(expr)
            .map(|origin| self.visible_directives(&origin, StatementTag::Import))
            .unwrap_or_default()
    }

    /// Alias statements visible at a use, innermost scope first.
    pub fn aliases(&self, expr: ExprId) -> Vec<StatementId> {
        self.origin_of(expr)
            .map(|origin| self.visible_directives(&origin, StatementTag::Alias))
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Alias and import targets never resolve through the directives they define.
    fn context_for(&self, expr: ExprId) -> Cx {
        let mut cx = Cx::new();
        let owner = self
            .model
            .expression(expr)
            .parent_statement
            .map(|s| self.model.statement(s).tag());
        match owner {
            Some(StatementTag::Alias) => cx.aliases = false,
            Some(StatementTag::Import) => {
                cx.imports = false;
                cx.aliases = false;
            }
            _ => {}
        }
        cx
    }

    /// Run `f` unless `expr` is already being resolved for `query` or the depth limit is hit.
    pub(super) fn guarded<T: Default>(
        &self,
        cx: &mut Cx,
        expr: ExprId,
        query: Query,
        f: impl FnOnce(&Self, &mut Cx) -> T,
    ) -> T {
        if cx.depth >= self.options.max_depth || !cx.resolving.insert((expr, query)) {
            trace!(expr = ?expr, ?query, "resolution cut off");
            return T::default();
        }
        cx.depth += 1;
        let out = f(self, cx);
        cx.depth -= 1;
        cx.resolving.remove(&(expr, query));
        out
    }

    pub(super) fn find_matches_in(&self, cx: &mut Cx, expr: ExprId) -> Vec<Declaration> {
        self.guarded(cx, expr, Query::Matches, |this, cx| this.dispatch(cx, expr))
    }

    fn dispatch(&self, cx: &mut Cx, expr: ExprId) -> Vec<Declaration> {
        let node = self.model.expression(expr);
        match &node.kind {
            ExprKind::Declaration(_) => vec![Declaration::Variable(expr)],
            ExprKind::Prefix(_) => self.resolve_prefix_in(cx, expr, usize::MAX),
            ExprKind::Name(name) => {
                // A segment of a prefix chain denotes the chain up to itself.
                if let Some(parent) = node.parent_expression
                    && let Some(chain) = self.model.expression(parent).as_prefix()
                    && let Some(pos) = chain.segments.iter().position(|&s| s == expr)
                {
                    return self.resolve_prefix_in(cx, parent, pos + 1);
                }
                self.match_value(cx, expr, &name.name)
            }
            ExprKind::Variable { name, .. } => self.match_value(cx, expr, &name.name),
            ExprKind::Type { name, .. } => match self.model.builtin_for(expr) {
                Some(builtin) => vec![Declaration::Statement(builtin)],
                None => self.search(cx, expr, &name.name, Want::Type),
            },
            ExprKind::Call(call) => self.match_call(cx, expr, call),
            ExprKind::Compound
            | ExprKind::Operator(_)
            | ExprKind::Literal { .. } => Vec::new(),
        }
    }

    fn match_value(&self, cx: &mut Cx, expr: ExprId, name: &str) -> Vec<Declaration> {
        if let Some(found) = self.keyword(cx, expr, name) {
            return found;
        }
        let found = self.search(cx, expr, name, Want::Value);
        if !found.is_empty() {
            return found;
        }
        self.search(cx, expr, name, Want::Container)
    }

    /// `this` is the enclosing type; `base` (C#) and `super` (Java) its parent types.
    fn keyword(&self, cx: &mut Cx, expr: ExprId, name: &str) -> Option<Vec<Declaration>> {
        if self.model.expression(expr).prefix().is_some() || self.calling_object(expr).is_some() {
            return None;
        }
        let stmt = self.model.expression(expr).parent_statement?;
        let language = self.model.statement(stmt).language;
        if name == "this" {
            return Some(
                self.model
                    .enclosing_type(stmt)
                    .map(Declaration::Statement)
                    .into_iter()
                    .collect(),
            );
        }
        if language.base_keyword() == Some(name) {
            let parents = self
                .model
                .enclosing_type(stmt)
                .map(|ty| self.parent_types_in(cx, ty))
                .unwrap_or_default();
            return Some(parents.into_iter().map(Declaration::Statement).collect());
        }
        None
    }

    fn match_call(&self, cx: &mut Cx, expr: ExprId, call: &MethodCall) -> Vec<Declaration> {
        let argc = call.arguments.len();
        if call.is_constructor_initializer {
            return self.match_initializer(cx, expr, call, argc);
        }

        let unqualified = call.prefix.is_none() && self.calling_object(expr).is_none();
        if unqualified && let Some(stmt) = self.model.expression(expr).parent_statement {
            // `this(...)` / `super(...)` / `base(...)` in a constructor body.
            let language = self.model.statement(stmt).language;
            if call.name == "this" || language.base_keyword() == Some(call.name.as_str()) {
                let Some(ty) = self.model.enclosing_type(stmt) else {
                    return Vec::new();
                };
                let targets = if call.name == "this" {
                    vec![ty]
                } else {
                    self.parent_types_in(cx, ty)
                };
                return self.constructors(&targets, argc);
            }
        }

        if call.is_constructor {
            let types = self.type_statements(self.search(cx, expr, &call.name, Want::Type));
            return self.constructors(&types, argc);
        }

        let found = self.search(
            cx,
            expr,
            &call.name,
            Want::Call {
                argc,
                destructor: call.is_destructor,
            },
        );
        if !found.is_empty() || self.calling_object(expr).is_some() {
            return found;
        }
        // `Foo(1)` in C++ constructs a temporary.
        let types = self.type_statements(self.search(cx, expr, &call.name, Want::Type));
        self.constructors(&types, argc)
    }

    /// An entry of a constructor initializer list.
    fn match_initializer(
        &self,
        cx: &mut Cx,
        expr: ExprId,
        call: &MethodCall,
        argc: usize,
    ) -> Vec<Declaration> {
        let Some(stmt) = self.model.expression(expr).parent_statement else {
            return Vec::new();
        };
        let Some(ty) = self.model.enclosing_type(stmt) else {
            return Vec::new();
        };
        let language = self.model.statement(stmt).language;

        if call.name == "this" || self.model.statement(ty).name() == Some(call.name.as_str()) {
            return self.constructors(&[ty], argc);
        }
        if language.base_keyword() == Some(call.name.as_str()) {
            let parents = self.parent_types_in(cx, ty);
            return self.constructors(&parents, argc);
        }

        let fields = self.own_members(ty, &call.name, Want::Value);
        if !fields.is_empty() {
            return fields;
        }
        let named_parents: Vec<StatementId> = self
            .parent_types_in(cx, ty)
            .into_iter()
            .filter(|&p| self.model.statement(p).name() == Some(call.name.as_str()))
            .collect();
        if !named_parents.is_empty() {
            return self.constructors(&named_parents, argc);
        }
        let types = self.type_statements(self.search(cx, expr, &call.name, Want::Type));
        self.constructors(&types, argc)
    }

    /// Look `name` up in the context of `expr`: through its prefix, its
    /// calling object, or the scopes around it.
    pub(super) fn search(
        &self,
        cx: &mut Cx,
        expr: ExprId,
        name: &str,
        want: Want,
    ) -> Vec<Declaration> {
        let node = self.model.expression(expr);
        if let Some(prefix) = node.prefix() {
            let Some(chain) = self.model.expression(prefix).as_prefix() else {
                return Vec::new();
            };
            if chain.is_global && chain.segments.is_empty() {
                let Some(origin) = self.origin_of(expr) else {
                    return Vec::new();
                };
                let root = self.model.root_of(origin.stmt);
                return self.own_members(root, name, want);
            }
            let scopes = self.resolve_prefix_in(cx, prefix, usize::MAX);
            return scopes
                .into_iter()
                .flat_map(|scope| self.members_of_declaration(cx, scope, name, want))
                .collect();
        }

        if let Some(object) = self.calling_object(expr) {
            let scopes = self.object_scopes(cx, object);
            trace!(object = ?object, scopes = scopes.len(), name, "member lookup through calling object");
            return scopes
                .into_iter()
                .flat_map(|scope| self.members(cx, scope, name, want))
                .collect();
        }

        match self.origin_of(expr) {
            Some(origin) => self.lookup(cx, &origin, name, want),
            None => Vec::new(),
        }
    }

    /// Resolve the first `upto` segments of a prefix chain.
    pub(super) fn resolve_prefix_in(
        &self,
        cx: &mut Cx,
        prefix: ExprId,
        upto: usize,
    ) -> Vec<Declaration> {
        let Some(chain) = self.model.expression(prefix).as_prefix() else {
            return Vec::new();
        };
        let Some(origin) = self.origin_of(prefix) else {
            return Vec::new();
        };
        let root = self.model.root_of(origin.stmt);
        let segments = &chain.segments[..upto.min(chain.segments.len())];

        let Some((&first, rest)) = segments.split_first() else {
            return if chain.is_global {
                vec![Declaration::Statement(root)]
            } else {
                Vec::new()
            };
        };
        let first_name = self.segment_name(first);
        let mut current = if chain.is_global {
            self.own_members(root, &first_name, Want::Container)
        } else {
            self.lookup(cx, &origin, &first_name, Want::Container)
        };

        for &segment in rest {
            let name = self.segment_name(segment);
            let next: Vec<Declaration> = current
                .into_iter()
                .flat_map(|scope| self.members_of_declaration(cx, scope, &name, Want::Container))
                .collect();
            current = dedup(next);
            if current.is_empty() {
                break;
            }
        }
        current
    }

    fn segment_name(&self, segment: ExprId) -> SmolStr {
        SmolStr::new(self.model.expression(segment).name().unwrap_or_default())
    }

    // ------------------------------------------------------------------
    // Context helpers
    // ------------------------------------------------------------------

    /// Where lookup for `expr` starts.
    ///
    /// Parent type names and qualifying prefixes of a declaration are
    /// looked up from the scope around the declaration, not inside it.
    pub(super) fn origin_of(&self, expr: ExprId) -> Option<Origin> {
        let node = self.model.expression(expr);
        let stmt_id = node.parent_statement?;
        let root_expr = self.root_expression(expr);
        let stmt = self.model.statement(stmt_id);
        let in_header = match &stmt.kind {
            StatementKind::Type(ty) => {
                ty.prefix == Some(root_expr) || ty.parent_type_names.contains(&root_expr)
            }
            StatementKind::Method(method) => method.prefix == Some(root_expr),
            _ => false,
        };
        let (start, child) = match (in_header, stmt.parent) {
            (true, Some(parent)) => (parent, Some(stmt_id)),
            _ => (stmt_id, None),
        };
        Some(Origin {
            stmt: start,
            child,
            file: node.location.file,
            range: node.location.range,
        })
    }

    fn root_expression(&self, mut expr: ExprId) -> ExprId {
        while let Some(parent) = self.model.expression(expr).parent_expression {
            expr = parent;
        }
        expr
    }

    /// The expression before a member-access operator preceding `expr`.
    pub(super) fn calling_object(&self, expr: ExprId) -> Option<ExprId> {
        let parent = self.model.expression(expr).parent_expression?;
        let compound = self.model.expression(parent);
        if !matches!(compound.kind, ExprKind::Compound) {
            return None;
        }
        let index = compound.components.iter().position(|&c| c == expr)?;
        if index < 2 {
            return None;
        }
        let op = self.model.expression(compound.components[index - 1]).operator()?;
        MEMBER_OPERATORS
            .contains(&op)
            .then(|| compound.components[index - 2])
    }

    /// Whether a declaration is acceptable for `want`.
    pub(super) fn accepts(&self, decl: Declaration, want: Want) -> bool {
        let Declaration::Statement(id) = decl else {
            return matches!(want, Want::Any | Want::Value | Want::Container);
        };
        match &self.model.statement(id).kind {
            StatementKind::Namespace(_) => matches!(want, Want::Any | Want::Container),
            StatementKind::Type(_) => matches!(want, Want::Any | Want::Type | Want::Container),
            StatementKind::Property(_) => matches!(want, Want::Any | Want::Value | Want::Container),
            StatementKind::Method(method) => match want {
                Want::Any => true,
                Want::Call { argc, destructor } => {
                    !method.is_constructor
                        && method.is_destructor == destructor
                        && self.arity_matches(id, argc)
                }
                Want::Constructor { argc } => {
                    method.is_constructor && self.arity_matches(id, argc)
                }
                Want::Value | Want::Type | Want::Container => false,
            },
            _ => false,
        }
    }

    /// Required parameters ≤ `argc` ≤ declared parameters; a `...` parameter lifts the upper bound.
    pub(super) fn arity_matches(&self, method: StatementId, argc: usize) -> bool {
        let Some(def) = self.model.statement(method).as_method() else {
            return false;
        };
        let mut required = 0;
        let mut declared = 0;
        let mut variadic = false;
        for &param in &def.parameters {
            let Some(decl) = self.model.expression(param).as_declaration() else {
                continue;
            };
            let type_name = decl
                .variable_type
                .and_then(|ty| self.model.expression(ty).name())
                .unwrap_or_default();
            if decl.name == "..." || type_name.ends_with("...") {
                variadic = true;
                continue;
            }
            declared += 1;
            if decl.initializer.is_none() {
                required += 1;
            }
        }
        argc >= required && (variadic || argc <= declared)
    }

    /// Constructors of the given types accepting `argc` arguments.
    pub(super) fn constructors(&self, types: &[StatementId], argc: usize) -> Vec<Declaration> {
        types
            .iter()
            .flat_map(|&ty| self.model.children(self.model.canonical(ty)).iter().copied())
            .map(Declaration::Statement)
            .filter(|&decl| self.accepts(decl, Want::Constructor { argc }))
            .collect()
    }

    pub(super) fn type_statements(&self, decls: Vec<Declaration>) -> Vec<StatementId> {
        decls
            .into_iter()
            .filter_map(Declaration::as_statement)
            .filter(|&id| self.model.statement(id).is_type())
            .collect()
    }
}

/// Drop repeated entries, keeping first occurrences in order.
pub(super) fn dedup<T: std::hash::Hash + Eq>(items: Vec<T>) -> Vec<T> {
    items.into_iter().collect::<IndexSet<T>>().into_iter().collect()
}
