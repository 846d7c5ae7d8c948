//! Tree queries: descendants, ancestors, named children, owned expressions.
//!
//! All iterators are lazy and restartable: calling the query again
//! yields a fresh walk over the current tree.

use super::arena::CodeModel;
use super::expression::ExprKind;
use super::ids::{ExprId, StatementId};
use super::statement::{StatementKind, StatementTag};

/// Depth-first, pre-order walk over owned statements.
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    model: &'a CodeModel,
    stack: Vec<StatementId>,
}

impl Iterator for Descendants<'_> {
    type Item = StatementId;

    fn next(&mut self) -> Option<StatementId> {
        let id = self.stack.pop()?;
        let owned = self.model.owned_statements(id);
        self.stack.extend(owned.into_iter().rev());
        Some(id)
    }
}

/// Walk up parent links.
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    model: &'a CodeModel,
    next: Option<StatementId>,
}

impl Iterator for Ancestors<'_> {
    type Item = StatementId;

    fn next(&mut self) -> Option<StatementId> {
        let id = self.next?;
        self.next = self.model.statement(id).parent;
        Some(id)
    }
}

/// Depth-first, pre-order walk over owned sub-expressions.
#[derive(Debug, Clone)]
pub struct ExprDescendants<'a> {
    model: &'a CodeModel,
    stack: Vec<ExprId>,
}

impl Iterator for ExprDescendants<'_> {
    type Item = ExprId;

    fn next(&mut self) -> Option<ExprId> {
        let id = self.stack.pop()?;
        let owned = self.model.owned_sub_expressions(id);
        self.stack.extend(owned.into_iter().rev());
        Some(id)
    }
}

impl CodeModel {
    pub fn parent(&self, id: StatementId) -> Option<StatementId> {
        self.statement(id).parent
    }

    pub fn children(&self, id: StatementId) -> &[StatementId] {
        &self.statement(id).children
    }

    /// Every statement list owned by `id`: children, else branch, catch
    /// clauses, finally block, and property accessors.
    pub fn owned_statements(&self, id: StatementId) -> Vec<StatementId> {
        let stmt = self.statement(id);
        let mut owned = stmt.children.clone();
        match &stmt.kind {
            StatementKind::If { else_statements } => owned.extend(else_statements),
            StatementKind::Try {
                catch_statements,
                finally_statements,
            } => {
                owned.extend(catch_statements);
                owned.extend(finally_statements);
            }
            StatementKind::Property(prop) => {
                owned.extend(prop.getter);
                owned.extend(prop.setter);
            }
            _ => {}
        }
        owned
    }

    /// The statement list of `parent` that contains `child`.
    pub fn sibling_list(&self, parent: StatementId, child: StatementId) -> &[StatementId] {
        let stmt = self.statement(parent);
        let lists: [&[StatementId]; 3] = match &stmt.kind {
            StatementKind::If { else_statements } => [&stmt.children, else_statements, &[]],
            StatementKind::Try {
                catch_statements,
                finally_statements,
            } => [&stmt.children, catch_statements, finally_statements],
            _ => [&stmt.children, &[], &[]],
        };
        lists
            .into_iter()
            .find(|list| list.contains(&child))
            .unwrap_or(&[])
    }

    pub fn descendants(&self, id: StatementId) -> Descendants<'_> {
        let mut walk = self.descendants_and_self(id);
        walk.next();
        walk
    }

    pub fn descendants_and_self(&self, id: StatementId) -> Descendants<'_> {
        Descendants {
            model: self,
            stack: vec![id],
        }
    }

    /// Descendants filtered by variant.
    pub fn descendants_of(
        &self,
        id: StatementId,
        tag: StatementTag,
    ) -> impl Iterator<Item = StatementId> + '_ {
        self.descendants(id)
            .filter(move |&d| self.statement(d).is(tag))
    }

    pub fn ancestors(&self, id: StatementId) -> Ancestors<'_> {
        Ancestors {
            model: self,
            next: self.statement(id).parent,
        }
    }

    pub fn ancestors_and_self(&self, id: StatementId) -> Ancestors<'_> {
        Ancestors {
            model: self,
            next: Some(id),
        }
    }

    /// Ancestors filtered by variant.
    pub fn ancestors_of(
        &self,
        id: StatementId,
        tag: StatementTag,
    ) -> impl Iterator<Item = StatementId> + '_ {
        self.ancestors(id)
            .filter(move |&a| self.statement(a).is(tag))
    }

    /// Direct children whose name matches exactly.
    pub fn named_children<'a>(
        &'a self,
        id: StatementId,
        name: &'a str,
    ) -> impl Iterator<Item = StatementId> + 'a {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&c| self.statement(c).name() == Some(name))
    }

    /// Direct children of one variant whose name matches exactly.
    pub fn named_children_of<'a>(
        &'a self,
        id: StatementId,
        tag: StatementTag,
        name: &'a str,
    ) -> impl Iterator<Item = StatementId> + 'a {
        self.named_children(id, name)
            .filter(move |&c| self.statement(c).is(tag))
    }

    /// Topmost ancestor.
    pub fn root_of(&self, id: StatementId) -> StatementId {
        self.ancestors_and_self(id).last().unwrap_or(id)
    }

    /// Innermost type definition enclosing `id`, including `id` itself.
    pub fn enclosing_type(&self, id: StatementId) -> Option<StatementId> {
        self.ancestors_and_self(id)
            .find(|&a| self.statement(a).is_type())
    }

    /// Innermost method enclosing `id`, including `id` itself.
    pub fn enclosing_method(&self, id: StatementId) -> Option<StatementId> {
        self.ancestors_and_self(id)
            .find(|&a| self.statement(a).is(StatementTag::Method))
    }

    /// The statement's own name, preceded by its enclosing namespace and
    /// type names, joined with `.`.
    ///
    /// The global namespace contributes nothing, whatever the source
    /// language's own separator.
    pub fn full_name(&self, id: StatementId) -> String {
        let own = self
            .statement(id)
            .name()
            .filter(|name| !name.is_empty());
        let mut names: Vec<&str> = self
            .ancestors(id)
            .map(|a| self.statement(a))
            .filter(|stmt| stmt.is_declaration_scope() && !stmt.is_global())
            .filter_map(|stmt| stmt.name())
            .filter(|name| !name.is_empty())
            .collect();
        names.reverse();
        names.extend(own);
        names.join(".")
    }

    /// Source-like text of a type use: `std::vector<int>`, `::Foo`.
    ///
    /// Declarations render their variable type; other names render bare.
    pub fn type_text(&self, id: ExprId) -> String {
        let expr = self.expression(id);
        match &expr.kind {
            ExprKind::Type {
                name,
                type_parameters,
            } => {
                let mut text = name.prefix.map(|p| self.prefix_text(p)).unwrap_or_default();
                text.push_str(&name.name);
                if !type_parameters.is_empty() {
                    let args: Vec<String> =
                        type_parameters.iter().map(|&t| self.type_text(t)).collect();
                    text.push('<');
                    text.push_str(&args.join(","));
                    text.push('>');
                }
                text
            }
            ExprKind::Declaration(decl) => decl
                .variable_type
                .map(|ty| self.type_text(ty))
                .unwrap_or_default(),
            _ => expr.name().unwrap_or_default().to_string(),
        }
    }

    /// `A::B::` for a prefix chain, `::` for a bare global prefix.
    fn prefix_text(&self, prefix: ExprId) -> String {
        let Some(chain) = self.expression(prefix).as_prefix() else {
            return String::new();
        };
        let mut text = String::new();
        if chain.is_global {
            text.push_str("::");
        }
        for &segment in &chain.segments {
            text.push_str(self.expression(segment).name().unwrap_or_default());
            text.push_str("::");
        }
        text
    }

    /// Expression roots held directly by a statement, in slot order.
    pub fn expressions(&self, id: StatementId) -> Vec<ExprId> {
        let stmt = self.statement(id);
        let mut roots = Vec::new();
        match &stmt.kind {
            StatementKind::Type(ty) => {
                roots.extend(ty.prefix);
                roots.extend(ty.parent_type_names.iter().copied());
            }
            StatementKind::Method(method) => {
                roots.extend(method.prefix);
                roots.extend(method.return_type);
                roots.extend(method.parameters.iter().copied());
                roots.extend(method.constructor_initializers.iter().copied());
            }
            StatementKind::Property(prop) => roots.extend(prop.return_type),
            StatementKind::Alias { target, .. } => roots.push(*target),
            StatementKind::Import { imported_namespace } => roots.push(*imported_namespace),
            StatementKind::For { initializer, .. } => roots.extend(*initializer),
            StatementKind::Catch { parameter } => roots.extend(*parameter),
            _ => {}
        }
        roots.extend(stmt.content);
        if let StatementKind::For { incrementer, .. } = &stmt.kind {
            roots.extend(*incrementer);
        }
        roots
    }

    /// Sub-expressions whose parent link points back at `id`.
    ///
    /// Excludes a type use shared with an earlier declarator.
    pub fn owned_sub_expressions(&self, id: ExprId) -> Vec<ExprId> {
        self.expression(id)
            .sub_expressions()
            .into_iter()
            .filter(|&sub| self.expression(sub).parent_expression == Some(id))
            .collect()
    }

    pub fn expression_descendants(&self, id: ExprId) -> ExprDescendants<'_> {
        let mut walk = self.expression_descendants_and_self(id);
        walk.next();
        walk
    }

    pub fn expression_descendants_and_self(&self, id: ExprId) -> ExprDescendants<'_> {
        ExprDescendants {
            model: self,
            stack: vec![id],
        }
    }

    /// Every expression in the statement subtree rooted at `id`.
    pub fn all_expressions(&self, id: StatementId) -> impl Iterator<Item = ExprId> + '_ {
        self.descendants_and_self(id)
            .flat_map(move |stmt| self.expressions(stmt))
            .flat_map(move |root| self.expression_descendants_and_self(root))
    }

    /// Variable declarations among the statement's expressions, in order.
    pub fn declared_variables(&self, id: StatementId) -> Vec<ExprId> {
        self.expressions(id)
            .into_iter()
            .flat_map(|root| self.top_level_declarations(root))
            .collect()
    }

    /// Declarations reachable from `root` through compound components only.
    ///
    /// Finds `int a, b` in a declaration list and `var x` in a loop header,
    /// but not declarations nested inside call arguments.
    fn top_level_declarations(&self, root: ExprId) -> Vec<ExprId> {
        let expr = self.expression(root);
        match &expr.kind {
            ExprKind::Declaration(_) => vec![root],
            ExprKind::Compound => expr
                .components
                .iter()
                .flat_map(|&c| self.top_level_declarations(c))
                .collect(),
            _ => Vec::new(),
        }
    }
}
