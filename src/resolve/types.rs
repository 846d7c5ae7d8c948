//! Expression types and the scopes a calling object opens.

use super::resolver::{Cx, Query, Resolver, Want, dedup};
use crate::model::{Declaration, ExprId, ExprKind, StatementId, StatementKind};

/// Declared type names that ask for the initializer's type instead.
const INFERRED_TYPES: &[&str] = &["var", "auto"];

impl Resolver<'_> {
    pub(super) fn resolve_type_in(&self, cx: &mut Cx, expr: ExprId) -> Vec<StatementId> {
        self.guarded(cx, expr, Query::Type, |this, cx| {
            dedup(this.type_of_expression(cx, expr))
        })
    }

    fn type_of_expression(&self, cx: &mut Cx, expr: ExprId) -> Vec<StatementId> {
        let node = self.model.expression(expr);
        match &node.kind {
            ExprKind::Declaration(decl) => match decl.variable_type {
                Some(ty) if !self.is_inferred(ty) => self.resolve_type_in(cx, ty),
                _ => decl
                    .initializer
                    .map(|init| self.resolve_type_in(cx, init))
                    .unwrap_or_default(),
            },
            ExprKind::Type { .. } => {
                let found = self.find_matches_in(cx, expr);
                self.type_statements(found)
            }
            ExprKind::Name(_) | ExprKind::Variable { index: None, .. } => {
                let found = self.find_matches_in(cx, expr);
                found
                    .into_iter()
                    .flat_map(|decl| self.declaration_types(cx, decl))
                    .collect()
            }
            ExprKind::Variable { index: Some(_), .. } => {
                let found = self.find_matches_in(cx, expr);
                found
                    .into_iter()
                    .flat_map(|decl| self.element_types(cx, decl))
                    .collect()
            }
            ExprKind::Call(call) if call.is_constructor && !call.is_constructor_initializer => {
                let found = self.search(cx, expr, &call.name, Want::Type);
                self.type_statements(found)
            }
            ExprKind::Call(_) => {
                let found = self.find_matches_in(cx, expr);
                found
                    .into_iter()
                    .flat_map(|decl| self.declaration_types(cx, decl))
                    .collect()
            }
            ExprKind::Compound => {
                // The value of `a.b.c` or `new Foo()` is its last operand.
                let last = node
                    .components
                    .iter()
                    .rev()
                    .copied()
                    .find(|&c| self.model.expression(c).operator().is_none());
                last.map(|c| self.resolve_type_in(cx, c)).unwrap_or_default()
            }
            ExprKind::Literal { kind, text } => {
                let Some(stmt) = node.parent_statement else {
                    return Vec::new();
                };
                let language = self.model.statement(stmt).language;
                self.model
                    .literal_type(*kind, text, language)
                    .into_iter()
                    .collect()
            }
            ExprKind::Operator(_) | ExprKind::Prefix(_) => Vec::new(),
        }
    }

    fn is_inferred(&self, ty: ExprId) -> bool {
        let node = self.model.expression(ty);
        node.prefix().is_none()
            && node
                .name()
                .is_some_and(|name| INFERRED_TYPES.contains(&name))
    }

    /// The type a declaration evaluates to when used as a value.
    ///
    /// Types stand for themselves, methods for their return type and
    /// constructors for the type they construct.
    pub(super) fn declaration_types(&self, cx: &mut Cx, decl: Declaration) -> Vec<StatementId> {
        let id = match decl {
            Declaration::Variable(var) => return self.resolve_type_in(cx, var),
            Declaration::Statement(id) => id,
        };
        match &self.model.statement(id).kind {
            StatementKind::Type(_) => vec![id],
            StatementKind::Property(prop) => prop
                .return_type
                .map(|ty| self.resolve_type_in(cx, ty))
                .unwrap_or_default(),
            StatementKind::Method(method) if method.is_constructor => {
                self.model.enclosing_type(id).into_iter().collect()
            }
            StatementKind::Method(method) => method
                .return_type
                .map(|ty| self.resolve_type_in(cx, ty))
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// The type of `decl[i]`: the last type argument of a generic
    /// declared type, otherwise the declared type itself.
    fn element_types(&self, cx: &mut Cx, decl: Declaration) -> Vec<StatementId> {
        let declared = match decl {
            Declaration::Variable(var) => self
                .model
                .expression(var)
                .as_declaration()
                .and_then(|d| d.variable_type),
            Declaration::Statement(id) => self
                .model
                .statement(id)
                .as_property()
                .and_then(|p| p.return_type),
        };
        let Some(declared) = declared else {
            return self.declaration_types(cx, decl);
        };
        match self.model.expression(declared).type_parameters().last() {
            Some(&element) => self.resolve_type_in(cx, element),
            None => self.declaration_types(cx, decl),
        }
    }

    /// Scopes whose members a calling object exposes.
    ///
    /// A name that denotes a namespace or type opens that scope (static
    /// access); anything else opens the scopes of its type.
    pub(super) fn object_scopes(&self, cx: &mut Cx, object: ExprId) -> Vec<StatementId> {
        let node = self.model.expression(object);
        let scopes = match &node.kind {
            ExprKind::Name(_) | ExprKind::Variable { index: None, .. } => {
                let found = self.find_matches_in(cx, object);
                let mut scopes = Vec::new();
                for decl in found {
                    match decl {
                        Declaration::Statement(id)
                            if self.model.statement(id).is_namespace()
                                || self.model.statement(id).is_type() =>
                        {
                            scopes.push(id)
                        }
                        other => scopes.extend(self.declaration_types(cx, other)),
                    }
                }
                scopes
            }
            _ => self.resolve_type_in(cx, object),
        };
        dedup(scopes)
    }
}
