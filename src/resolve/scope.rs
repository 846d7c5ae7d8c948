//! Scope walking: lexical lookup, member lookup, inheritance, directives.

use rustc_hash::FxHashSet;
use tracing::{trace, warn};

use super::resolver::{Cx, Origin, Query, Resolver, Want, dedup};
use crate::model::{Declaration, StatementId, StatementKind, StatementTag};

impl Resolver<'_> {
    /// Unqualified lookup: lexical scopes, then aliases, then imports, then the global namespace.
    pub(super) fn lookup(
        &self,
        cx: &mut Cx,
        origin: &Origin,
        name: &str,
        want: Want,
    ) -> Vec<Declaration> {
        let found = self.lexical(cx, origin, name, want);
        if !found.is_empty() {
            return found;
        }
        if cx.aliases {
            let found = self.through_aliases(cx, origin, name, want);
            if !found.is_empty() {
                return found;
            }
        }
        if cx.imports {
            let found = self.through_imports(cx, origin, name, want);
            if !found.is_empty() {
                return found;
            }
        }
        let root = self.model.root_of(origin.stmt);
        self.own_members(root, name, want)
    }

    /// Walk from the origin outward, stopping below the global namespace.
    fn lexical(&self, cx: &mut Cx, origin: &Origin, name: &str, want: Want) -> Vec<Declaration> {
        let mut scope = origin.stmt;
        let mut child = origin.child;
        loop {
            if self.model.statement(scope).is_global() {
                return Vec::new();
            }
            let found = self.scan_scope(cx, scope, child, name, want);
            if !found.is_empty() {
                trace!(scope = ?scope, name, count = found.len(), "lexical match");
                return found;
            }
            match self.model.parent(scope) {
                Some(parent) => {
                    child = Some(scope);
                    scope = parent;
                }
                None => return Vec::new(),
            }
        }
    }

    /// Declarations of one scope visible from `child`.
    fn scan_scope(
        &self,
        cx: &mut Cx,
        scope: StatementId,
        child: Option<StatementId>,
        name: &str,
        want: Want,
    ) -> Vec<Declaration> {
        let mut out = Vec::new();
        // Parameters, loop variables, catch parameters, using resources.
        for var in self.model.declared_variables(scope) {
            if self.model.expression(var).name() == Some(name)
                && self.accepts(Declaration::Variable(var), want)
            {
                out.push(Declaration::Variable(var));
            }
        }

        if let Some(child) = child {
            let stmt = self.model.statement(scope);
            let list = self.model.sibling_list(scope, child);
            if stmt.is_declaration_scope() {
                for &sibling in list {
                    self.match_in_statement(sibling, name, want, &mut out);
                }
            } else {
                let before = list.iter().position(|&s| s == child).unwrap_or(list.len());
                for &sibling in list[..before].iter().rev() {
                    self.match_in_statement(sibling, name, want, &mut out);
                }
            }
        }

        if out.is_empty() && self.model.statement(scope).is_type() {
            return self.inherited(cx, scope, name, want);
        }
        out
    }

    /// Collect what `stmt` declares under `name`.
    ///
    /// Extern blocks and anonymous namespaces are transparent.
    fn match_in_statement(
        &self,
        stmt: StatementId,
        name: &str,
        want: Want,
        out: &mut Vec<Declaration>,
    ) {
        let node = self.model.statement(stmt);
        match &node.kind {
            StatementKind::Extern { .. } => {
                for &child in &node.children {
                    self.match_in_statement(child, name, want, out);
                }
            }
            StatementKind::Namespace(ns) if ns.name.is_empty() && !ns.is_global => {
                for &child in &node.children {
                    self.match_in_statement(child, name, want, out);
                }
            }
            StatementKind::Declaration => {
                for var in self.model.declared_variables(stmt) {
                    if self.model.expression(var).name() == Some(name)
                        && self.accepts(Declaration::Variable(var), want)
                    {
                        out.push(Declaration::Variable(var));
                    }
                }
            }
            _ => {
                if node.name() == Some(name) && self.accepts(Declaration::Statement(stmt), want) {
                    out.push(Declaration::Statement(stmt));
                }
            }
        }
    }

    /// Direct members of a namespace or type, without inheritance.
    pub(super) fn own_members(
        &self,
        scope: StatementId,
        name: &str,
        want: Want,
    ) -> Vec<Declaration> {
        let scope = self.model.canonical(scope);
        let mut out = Vec::new();
        for &child in self.model.children(scope) {
            self.match_in_statement(child, name, want, &mut out);
        }
        out
    }

    /// Members of a namespace or type, falling back to inherited members.
    pub(super) fn members(
        &self,
        cx: &mut Cx,
        scope: StatementId,
        name: &str,
        want: Want,
    ) -> Vec<Declaration> {
        let scope = self.model.canonical(scope);
        let own = self.own_members(scope, name, want);
        if own.is_empty() && self.model.statement(scope).is_type() {
            return self.inherited(cx, scope, name, want);
        }
        own
    }

    /// Members reachable through any declaration: a scope's own members,
    /// or the members of a value's type.
    pub(super) fn members_of_declaration(
        &self,
        cx: &mut Cx,
        decl: Declaration,
        name: &str,
        want: Want,
    ) -> Vec<Declaration> {
        if let Declaration::Statement(id) = decl {
            let stmt = self.model.statement(id);
            if stmt.is_namespace() || stmt.is_type() {
                return self.members(cx, id, name, want);
            }
        }
        self.declaration_types(cx, decl)
            .into_iter()
            .flat_map(|ty| self.members(cx, ty, name, want))
            .collect()
    }

    /// Members of parent types, depth-first per parent in declared order.
    fn inherited(
        &self,
        cx: &mut Cx,
        ty: StatementId,
        name: &str,
        want: Want,
    ) -> Vec<Declaration> {
        let mut visited = FxHashSet::default();
        visited.insert(ty);
        let mut path = vec![ty];
        self.inherited_walk(cx, ty, name, want, &mut visited, &mut path)
    }

    fn inherited_walk(
        &self,
        cx: &mut Cx,
        ty: StatementId,
        name: &str,
        want: Want,
        visited: &mut FxHashSet<StatementId>,
        path: &mut Vec<StatementId>,
    ) -> Vec<Declaration> {
        for parent in self.parent_types_in(cx, ty) {
            if path.contains(&parent) {
                warn!(
                    ty = %self.model.full_name(ty),
                    parent = %self.model.full_name(parent),
                    "inheritance cycle"
                );
                continue;
            }
            // A diamond reaches the same base twice.
            if !visited.insert(parent) {
                continue;
            }
            let own = self.own_members(parent, name, want);
            if !own.is_empty() {
                return own;
            }
            path.push(parent);
            let deeper = self.inherited_walk(cx, parent, name, want, visited, path);
            path.pop();
            if !deeper.is_empty() {
                return deeper;
            }
        }
        Vec::new()
    }

    /// Resolved parent types of `ty`, in declared order.
    pub(super) fn parent_types_in(&self, cx: &mut Cx, ty: StatementId) -> Vec<StatementId> {
        let ty = self.model.canonical(ty);
        let Some(def) = self.model.statement(ty).as_type() else {
            return Vec::new();
        };
        let mut parents = Vec::new();
        for &name in &def.parent_type_names {
            let found = self.find_matches_in(cx, name);
            parents.extend(
                self.type_statements(found)
                    .into_iter()
                    .map(|p| self.model.canonical(p))
                    .filter(|&p| p != ty),
            );
        }
        dedup(parents)
    }

    /// Directive statements of `tag` visible from the origin, innermost first.
    ///
    /// A directive is visible from the sibling lists along the path to the
    /// root, when it sits in the use's file (unless directives are not
    /// file-scoped) and does not start after the use.
    pub(super) fn visible_directives(&self, origin: &Origin, tag: StatementTag) -> Vec<StatementId> {
        let mut out = Vec::new();
        let mut scope = origin.stmt;
        let mut child = origin.child;
        loop {
            if let Some(child) = child {
                for &sibling in self.model.sibling_list(scope, child) {
                    if self.model.statement(sibling).is(tag) && self.is_visible(sibling, origin) {
                        out.push(sibling);
                    }
                }
            }
            match self.model.parent(scope) {
                Some(parent) => {
                    child = Some(scope);
                    scope = parent;
                }
                None => return out,
            }
        }
    }

    fn is_visible(&self, directive: StatementId, origin: &Origin) -> bool {
        let Some(location) = self.model.statement(directive).locations.first() else {
            return true;
        };
        if location.file != origin.file {
            return !self.options.file_scoped_imports;
        }
        match (location.range, origin.range) {
            (Some(at), Some(use_range)) => use_range.starts_before(&at) != Some(true),
            _ => true,
        }
    }

    /// Substitute aliases named `name` by their targets, one level deep.
    fn through_aliases(
        &self,
        cx: &mut Cx,
        origin: &Origin,
        name: &str,
        want: Want,
    ) -> Vec<Declaration> {
        let mut out = Vec::new();
        for alias in self.visible_directives(origin, StatementTag::Alias) {
            let StatementKind::Alias { alias_name, target } = &self.model.statement(alias).kind
            else {
                continue;
            };
            if alias_name != name {
                continue;
            }
            let target = *target;
            let Some(target_name) = self.model.expression(target).name() else {
                continue;
            };
            let resolved = cx.restricted(true, false, |cx| {
                self.guarded(cx, target, Query::Matches, |this, cx| {
                    this.search(cx, target, target_name, Want::Any)
                })
            });
            trace!(alias = alias_name.as_str(), count = resolved.len(), "alias substituted");
            out.extend(self.conform(resolved, want));
            if !out.is_empty() {
                break;
            }
        }
        out
    }

    /// Look `name` up inside every namespace imported at the origin.
    fn through_imports(
        &self,
        cx: &mut Cx,
        origin: &Origin,
        name: &str,
        want: Want,
    ) -> Vec<Declaration> {
        let mut out = Vec::new();
        for import in self.visible_directives(origin, StatementTag::Import) {
            let StatementKind::Import { imported_namespace } = &self.model.statement(import).kind
            else {
                continue;
            };
            let target = *imported_namespace;
            let Some(target_name) = self.model.expression(target).name() else {
                continue;
            };
            let scopes = cx.restricted(false, false, |cx| {
                self.guarded(cx, target, Query::Matches, |this, cx| {
                    this.search(cx, target, target_name, Want::Container)
                })
            });
            for scope in scopes {
                if let Declaration::Statement(id) = scope
                    && (self.model.statement(id).is_namespace() || self.model.statement(id).is_type())
                {
                    out.extend(self.members(cx, id, name, want));
                }
            }
        }
        dedup(out)
    }

    /// Narrow alias targets to what the use asked for; types answer calls with their constructors.
    fn conform(&self, decls: Vec<Declaration>, want: Want) -> Vec<Declaration> {
        match want {
            Want::Call { argc, .. } | Want::Constructor { argc } => {
                let mut out: Vec<Declaration> = decls
                    .iter()
                    .copied()
                    .filter(|&d| self.accepts(d, want))
                    .collect();
                if out.is_empty() {
                    let types = self.type_statements(decls);
                    out = self.constructors(&types, argc);
                }
                out
            }
            _ => decls.into_iter().filter(|&d| self.accepts(d, want)).collect(),
        }
    }
}
