//! Merging per-file scope trees into one program model.
//!
//! `receiver.merge(other)` grafts every child of `other` onto `receiver`.
//! A child that denotes the same entity as an existing child (same
//! namespace or type name, same method signature, same property) is
//! merged into it recursively; anything else is appended after the
//! receiver's own children. The receiver's node always survives, and the
//! absorbed node forwards to it through [`Statement::merged_into`].
//!
//! [`Statement::merged_into`]: super::Statement::merged_into

use smol_str::SmolStr;
use tracing::{debug, trace};

use super::arena::CodeModel;
use super::expression::ExprKind;
use super::ids::{ExprId, StatementId};
use super::statement::{NamespaceDef, Statement, StatementKind, StatementTag};
use crate::error::{ModelError, Result};

impl CodeModel {
    /// Merge the namespace `other` into `receiver` and return the survivor.
    ///
    /// Both operands must be live namespaces, typically the global roots
    /// returned by [`parse_file_unit`](Self::parse_file_unit).
    pub fn merge(&mut self, receiver: StatementId, other: StatementId) -> Result<StatementId> {
        if receiver == other {
            return Err(ModelError::invalid_merge(
                "a namespace cannot be merged into itself",
            ));
        }
        for id in [receiver, other] {
            let stmt = self
                .get_statement(id)
                .ok_or_else(|| ModelError::invalid_merge(format!("{id:?} is not in this model")))?;
            if !stmt.is_namespace() {
                return Err(ModelError::NotANamespace(id));
            }
            if stmt.merged_into.is_some() {
                return Err(ModelError::invalid_merge(format!(
                    "{id:?} was already merged into another namespace"
                )));
            }
        }
        if self.ancestors(receiver).any(|a| a == other) || self.ancestors(other).any(|a| a == receiver)
        {
            return Err(ModelError::invalid_merge(
                "a namespace cannot be merged with its own ancestor",
            ));
        }

        self.merge_scopes(receiver, other);
        debug!(
            receiver = ?receiver,
            other = ?other,
            children = self.children(receiver).len(),
            "merged namespaces"
        );
        Ok(receiver)
    }

    /// Place `child` in `scope`, merging it with a same-entity sibling if one exists.
    pub(crate) fn absorb(&mut self, scope: StatementId, child: StatementId) {
        match self.find_merge_partner(scope, child) {
            Some(partner) => self.merge_pair(partner, child),
            None => self.append_child(scope, child),
        }
    }

    /// Move an out-of-line definition into the scope its prefix names.
    ///
    /// Prefix segments are matched against namespace and type children
    /// starting at the definition's enclosing namespace; missing segments
    /// become placeholder namespaces that a later merge can turn into the
    /// real type.
    pub(crate) fn relocate_prefixed(&mut self, id: StatementId) {
        let Some(prefix) = self.statement(id).prefix() else {
            return;
        };
        let Some(parent) = self.statement(id).parent else {
            return;
        };
        if !self.statement(parent).is_namespace() {
            return;
        }
        let Some(chain) = self.expression(prefix).as_prefix() else {
            return;
        };
        let is_global = chain.is_global;
        let segments: Vec<SmolStr> = chain
            .segments
            .iter()
            .filter_map(|&s| self.expression(s).name())
            .map(SmolStr::new)
            .collect();

        let mut scope = if is_global { self.root_of(parent) } else { parent };
        for name in segments {
            let existing = self.children(scope).iter().copied().find(|&c| {
                let stmt = self.statement(c);
                stmt.is_declaration_scope() && stmt.name() == Some(name.as_str())
            });
            scope = match existing {
                Some(found) => found,
                None => self.placeholder_namespace(scope, id, name),
            };
        }
        if scope == parent {
            return;
        }

        trace!(statement = ?id, scope = ?scope, "relocating out-of-line definition");
        self.detach(id);
        self.absorb(scope, id);
    }

    fn placeholder_namespace(
        &mut self,
        scope: StatementId,
        origin: StatementId,
        name: SmolStr,
    ) -> StatementId {
        let origin = self.statement(origin);
        let mut ns = Statement::new(
            StatementKind::Namespace(NamespaceDef {
                name,
                is_global: false,
                is_placeholder: true,
            }),
            origin.language,
        );
        ns.locations = origin
            .locations
            .iter()
            .map(|loc| {
                let mut loc = *loc;
                loc.is_reference = true;
                loc
            })
            .collect();
        let id = self.alloc_statement(ns);
        self.append_child(scope, id);
        id
    }

    fn find_merge_partner(&self, scope: StatementId, child: StatementId) -> Option<StatementId> {
        self.statement(child).name()?;
        self.children(scope)
            .iter()
            .copied()
            .find(|&candidate| candidate != child && self.is_same_entity(candidate, child))
    }

    fn is_same_entity(&self, a: StatementId, b: StatementId) -> bool {
        let (left, right) = (self.statement(a), self.statement(b));
        if left.name() != right.name() {
            return false;
        }
        match (&left.kind, &right.kind) {
            // Anonymous namespaces are private to their file.
            (StatementKind::Namespace(x), StatementKind::Namespace(_)) => !x.name.is_empty(),
            (StatementKind::Namespace(ns), StatementKind::Type(_))
            | (StatementKind::Type(_), StatementKind::Namespace(ns)) => ns.is_placeholder,
            (StatementKind::Type(_), StatementKind::Type(_)) => true,
            (StatementKind::Method(x), StatementKind::Method(y)) => {
                x.is_constructor == y.is_constructor
                    && x.is_destructor == y.is_destructor
                    && self.parameter_signature(a) == self.parameter_signature(b)
            }
            (StatementKind::Property(_), StatementKind::Property(_)) => true,
            _ => false,
        }
    }

    /// Textual parameter types of a method, in order.
    pub fn parameter_signature(&self, method: StatementId) -> Vec<String> {
        self.statement(method)
            .as_method()
            .map(|m| m.parameters.iter().map(|&p| self.type_text(p)).collect())
            .unwrap_or_default()
    }

    fn merge_pair(&mut self, receiver: StatementId, other: StatementId) {
        let receiver_is_type = self.statement(receiver).is_type();
        match self.statement(other).tag() {
            StatementTag::Namespace => self.merge_scopes(receiver, other),
            StatementTag::Type if receiver_is_type => {
                self.merge_type_headers(receiver, other);
                self.merge_scopes(receiver, other);
            }
            StatementTag::Type => {
                self.promote_placeholder(receiver, other);
                self.merge_scopes(receiver, other);
            }
            StatementTag::Method => self.merge_methods(receiver, other),
            StatementTag::Property => self.merge_properties(receiver, other),
            _ => self.append_child_of_parent(receiver, other),
        }
    }

    /// Fallback for pairs that matched by name but have no merge rule.
    fn append_child_of_parent(&mut self, receiver: StatementId, other: StatementId) {
        if let Some(scope) = self.statement(receiver).parent {
            self.append_child(scope, other);
        }
    }

    /// Union locations and absorb every child of `other` into `receiver`.
    fn merge_scopes(&mut self, receiver: StatementId, other: StatementId) {
        self.union_locations(receiver, other);

        let other_placeholder = self
            .statement(other)
            .as_namespace()
            .is_some_and(|ns| ns.is_placeholder);
        if let StatementKind::Namespace(ns) = &mut self.statement_mut(receiver).kind {
            ns.is_placeholder &= other_placeholder;
        }

        let children = std::mem::take(&mut self.statement_mut(other).children);
        for child in children {
            self.statement_mut(child).parent = None;
            self.absorb(receiver, child);
        }
        self.retire(receiver, other);
    }

    /// A placeholder namespace meeting the real type becomes that type in place.
    fn promote_placeholder(&mut self, placeholder: StatementId, ty: StatementId) {
        let StatementKind::Type(def) = self.statement(ty).kind.clone() else {
            return;
        };
        trace!(placeholder = ?placeholder, ty = ?ty, "promoting placeholder namespace to type");
        let owned: Vec<ExprId> = def.parent_type_names.clone();
        let language = self.statement(ty).language;
        let node = self.statement_mut(placeholder);
        node.kind = StatementKind::Type(def);
        node.language = language;
        for expr in owned {
            self.reown_expression(expr, placeholder);
        }
    }

    fn merge_type_headers(&mut self, receiver: StatementId, other: StatementId) {
        let (Some(mine), Some(theirs)) = (
            self.statement(receiver).as_type().cloned(),
            self.statement(other).as_type().cloned(),
        ) else {
            return;
        };

        let known: Vec<String> = mine
            .parent_type_names
            .iter()
            .map(|&p| self.type_text(p))
            .collect();
        let adopted: Vec<ExprId> = theirs
            .parent_type_names
            .iter()
            .copied()
            .filter(|&p| !known.contains(&self.type_text(p)))
            .collect();
        for &expr in &adopted {
            self.reown_expression(expr, receiver);
        }

        if let StatementKind::Type(def) = &mut self.statement_mut(receiver).kind {
            def.parent_type_names.extend(adopted);
            def.is_partial |= theirs.is_partial;
            if def.accessibility == Default::default() {
                def.accessibility = theirs.accessibility;
            }
        }
    }

    /// Same logical method: a declaration-only receiver adopts the definition.
    fn merge_methods(&mut self, receiver: StatementId, other: StatementId) {
        let receiver_is_stub = self.is_stub(receiver);
        let other_is_stub = self.is_stub(other);
        self.union_locations(receiver, other);

        if receiver_is_stub && !other_is_stub {
            self.adopt_definition(receiver, other);
        } else if !receiver_is_stub && other_is_stub {
            // The prototype arrived second; its default arguments still apply.
            if let (Some(mine), Some(theirs)) = (
                self.statement(receiver).as_method().map(|m| m.parameters.clone()),
                self.statement(other).as_method().map(|m| m.parameters.clone()),
            ) {
                self.carry_default_arguments(&theirs, &mine, receiver);
            }
        } else if !receiver_is_stub && !other_is_stub {
            debug!(
                method = ?receiver,
                duplicate = ?other,
                "two definitions of one method; keeping the first"
            );
        }
        self.retire(receiver, other);
    }

    fn is_stub(&self, method: StatementId) -> bool {
        let stmt = self.statement(method);
        stmt.children.is_empty() && stmt.is_declaration_only()
    }

    fn adopt_definition(&mut self, receiver: StatementId, other: StatementId) {
        let (Some(mine), Some(theirs)) = (
            self.statement(receiver).as_method().cloned(),
            self.statement(other).as_method().cloned(),
        ) else {
            return;
        };

        // Default arguments live on the prototype; keep them on the adopted parameters.
        self.carry_default_arguments(&mine.parameters, &theirs.parameters, receiver);

        let adopted_return = mine.return_type.is_none().then_some(theirs.return_type).flatten();
        for &expr in theirs
            .parameters
            .iter()
            .chain(&theirs.constructor_initializers)
            .chain(&adopted_return)
        {
            self.reown_expression(expr, receiver);
        }

        let body = std::mem::take(&mut self.statement_mut(other).children);
        for &child in &body {
            self.statement_mut(child).parent = Some(receiver);
        }

        let node = self.statement_mut(receiver);
        node.children.extend(body);
        if let StatementKind::Method(def) = &mut node.kind {
            def.parameters = theirs.parameters;
            if !theirs.constructor_initializers.is_empty() {
                def.constructor_initializers = theirs.constructor_initializers;
            }
            if adopted_return.is_some() {
                def.return_type = adopted_return;
            }
        }
    }

    /// Copy each prototype default onto the matching definition parameter that lacks one.
    fn carry_default_arguments(&mut self, prototype: &[ExprId], definition: &[ExprId], owner: StatementId) {
        for (&proto, &def) in prototype.iter().zip(definition) {
            let default = self
                .expression(proto)
                .as_declaration()
                .and_then(|d| d.initializer);
            let missing = self
                .expression(def)
                .as_declaration()
                .is_some_and(|d| d.initializer.is_none());
            if let (Some(init), true) = (default, missing) {
                if let ExprKind::Declaration(decl) = &mut self.expression_mut(def).kind {
                    decl.initializer = Some(init);
                }
                self.expression_mut(init).parent_expression = Some(def);
                self.reown_expression(init, owner);
            }
        }
    }

    fn merge_properties(&mut self, receiver: StatementId, other: StatementId) {
        self.union_locations(receiver, other);
        let (Some(mine), Some(theirs)) = (
            self.statement(receiver).as_property().cloned(),
            self.statement(other).as_property().cloned(),
        ) else {
            return;
        };

        let getter = mine.getter.or(theirs.getter);
        let setter = mine.setter.or(theirs.setter);
        for accessor in [getter, setter].into_iter().flatten() {
            self.statement_mut(accessor).parent = Some(receiver);
        }
        if let StatementKind::Property(def) = &mut self.statement_mut(receiver).kind {
            def.getter = getter;
            def.setter = setter;
        }
        self.retire(receiver, other);
    }

    fn union_locations(&mut self, receiver: StatementId, other: StatementId) {
        let incoming = self.statement(other).locations.clone();
        let node = self.statement_mut(receiver);
        for loc in incoming {
            if !node.locations.contains(&loc) {
                node.locations.push(loc);
            }
        }
    }

    fn retire(&mut self, receiver: StatementId, other: StatementId) {
        let node = self.statement_mut(other);
        node.merged_into = Some(receiver);
        node.parent = None;
    }

    /// Point `parent_statement` of an expression subtree at `owner`.
    fn reown_expression(&mut self, root: ExprId, owner: StatementId) {
        let subtree: Vec<ExprId> = self.expression_descendants_and_self(root).collect();
        for expr in subtree {
            self.expression_mut(expr).parent_statement = Some(owner);
        }
    }
}
