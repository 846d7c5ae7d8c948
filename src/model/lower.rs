//! Lowering of front-end [`FileUnit`]s into arena nodes.
//!
//! Lowering runs in two passes. Validation rejects malformed input
//! (unnamed declarations, empty alias/import targets) before anything is
//! allocated, so the second pass can build nodes without failing.

use smol_str::SmolStr;
use tracing::debug;

use super::arena::CodeModel;
use super::expression::{ExprKind, Expression, MethodCall, NamePrefix, NameUse, VariableDecl};
use super::ids::{ExprId, StatementId};
use super::statement::{
    MethodDef, NamespaceDef, PropertyDef, Statement, StatementKind, TypeDef,
};
use crate::base::{FileId, SourceLocation, SourceRange};
use crate::error::{ModelError, Result};
use crate::syntax::{
    Accessibility, CallExpr, Expr, FileUnit, FrontEnd, Language, NameChain, NameRef, Stmt,
    StmtKind, TypeRef, VarDecl,
};

impl CodeModel {
    /// Build the scope tree of one file and return its global namespace.
    ///
    /// Out-of-line definitions (`void A::f() { }`) are moved into the
    /// scope their prefix names, merging with a matching prototype when
    /// one is declared in the same file.
    pub fn parse_file_unit(&mut self, unit: FileUnit) -> Result<StatementId> {
        validate(&unit.statements, &unit.path)?;

        let file = self.files_mut().intern(&unit.path);
        let mut lowerer = Lowerer {
            model: self,
            file,
            language: unit.language,
            prefixed: Vec::new(),
        };
        let root = lowerer.root();
        let children = lowerer.lower_body(&unit.statements, root);
        let prefixed = std::mem::take(&mut lowerer.prefixed);

        self.statement_mut(root).children = children;
        for id in prefixed {
            self.relocate_prefixed(id);
        }
        self.push_root(root);

        debug!(
            path = %unit.path,
            language = %unit.language,
            statements = self.descendants(root).count(),
            "parsed file unit"
        );
        Ok(root)
    }

    /// Translate a source with `front_end`, then build its scope tree.
    pub fn parse_with<F: FrontEnd>(
        &mut self,
        front_end: &F,
        path: &str,
        source: &F::Source,
    ) -> Result<StatementId> {
        let unit = front_end.translate(path, source)?;
        self.parse_file_unit(unit)
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

fn validate(statements: &[Stmt], file: &str) -> Result<()> {
    statements.iter().try_for_each(|stmt| validate_stmt(stmt, file))
}

fn validate_stmt(stmt: &Stmt, file: &str) -> Result<()> {
    match &stmt.kind {
        // Anonymous namespaces are legal.
        StmtKind::Namespace { body, .. } => validate(body, file),
        StmtKind::Type(decl) => {
            require_name(&decl.name, "type", file)?;
            validate(&decl.body, file)
        }
        StmtKind::Method(decl) => {
            require_name(&decl.name, "method", file)?;
            for param in &decl.parameters {
                if let Some(init) = &param.initializer {
                    validate_expr(init, file)?;
                }
            }
            for call in &decl.initializers {
                validate_call(call, file)?;
            }
            match &decl.body {
                Some(body) => validate(body, file),
                None => Ok(()),
            }
        }
        StmtKind::Property(decl) => {
            require_name(&decl.name, "property", file)?;
            validate(decl.getter.as_deref().unwrap_or_default(), file)?;
            validate(decl.setter.as_deref().unwrap_or_default(), file)
        }
        StmtKind::Alias { name, target } => {
            require_name(name, "alias", file)?;
            require_chain(target, "alias", file)
        }
        StmtKind::Import { namespace } => require_chain(namespace, "import", file),
        StmtKind::Declaration {
            declarators, ..
        } => {
            if declarators.is_empty() {
                return Err(ModelError::missing_name("variable", file));
            }
            for (name, init) in declarators {
                require_name(name, "variable", file)?;
                if let Some(init) = init {
                    validate_expr(init, file)?;
                }
            }
            Ok(())
        }
        StmtKind::Expression(expr) | StmtKind::Case(Some(expr)) => validate_expr(expr, file),
        StmtKind::Return(value) | StmtKind::Throw(value) => {
            value.iter().try_for_each(|e| validate_expr(e, file))
        }
        StmtKind::Block(body) | StmtKind::Extern { body, .. } => validate(body, file),
        StmtKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            condition.iter().try_for_each(|e| validate_expr(e, file))?;
            validate(then_branch, file)?;
            validate(else_branch, file)
        }
        StmtKind::While { condition, body }
        | StmtKind::Do { condition, body }
        | StmtKind::Switch { condition, body }
        | StmtKind::Foreach {
            header: condition,
            body,
        }
        | StmtKind::Lock {
            target: condition,
            body,
        }
        | StmtKind::Using {
            resource: condition,
            body,
        } => {
            condition.iter().try_for_each(|e| validate_expr(e, file))?;
            validate(body, file)
        }
        StmtKind::For {
            initializer,
            condition,
            incrementer,
            body,
        } => {
            [initializer, condition, incrementer]
                .into_iter()
                .flatten()
                .try_for_each(|e| validate_expr(e, file))?;
            validate(body, file)
        }
        StmtKind::Try {
            body,
            catches,
            finally,
        } => {
            validate(body, file)?;
            for clause in catches {
                validate(&clause.body, file)?;
            }
            validate(finally, file)
        }
        StmtKind::Case(None)
        | StmtKind::Break
        | StmtKind::Continue
        | StmtKind::Goto(_)
        | StmtKind::Label(_)
        | StmtKind::Empty => Ok(()),
    }
}

fn validate_expr(expr: &Expr, file: &str) -> Result<()> {
    match expr {
        Expr::Call(call) => validate_call(call, file),
        Expr::Declaration(decl) => {
            require_name(&decl.name, "variable", file)?;
            match &decl.initializer {
                Some(init) => validate_expr(init, file),
                None => Ok(()),
            }
        }
        Expr::Variable {
            index: Some(index), ..
        } => validate_expr(index, file),
        Expr::Compound(components) => components.iter().try_for_each(|c| validate_expr(c, file)),
        Expr::Name(_)
        | Expr::Variable { .. }
        | Expr::Type(_)
        | Expr::Operator(_)
        | Expr::Literal(_) => Ok(()),
    }
}

fn validate_call(call: &CallExpr, file: &str) -> Result<()> {
    require_name(&call.name, "call", file)?;
    call.arguments
        .iter()
        .try_for_each(|arg| validate_expr(arg, file))
}

fn require_name(name: &str, kind: &'static str, file: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ModelError::missing_name(kind, file));
    }
    Ok(())
}

fn require_chain(chain: &NameChain, kind: &'static str, file: &str) -> Result<()> {
    if chain.names.is_empty() || chain.names.iter().any(|n| n.is_empty()) {
        return Err(ModelError::empty_chain(kind, file));
    }
    Ok(())
}

// ============================================================================
// LOWERING
// ============================================================================

struct Lowerer<'m> {
    model: &'m mut CodeModel,
    file: FileId,
    language: Language,
    /// Statements carrying a qualifying prefix, innermost first.
    prefixed: Vec<StatementId>,
}

impl Lowerer<'_> {
    fn root(&mut self) -> StatementId {
        let mut root = Statement::new(
            StatementKind::Namespace(NamespaceDef {
                name: SmolStr::default(),
                is_global: true,
                is_placeholder: false,
            }),
            self.language,
        );
        root.locations.push(SourceLocation::new(self.file, None));
        self.model.alloc_statement(root)
    }

    fn lower_body(&mut self, body: &[Stmt], parent: StatementId) -> Vec<StatementId> {
        body.iter().map(|stmt| self.lower_stmt(stmt, parent)).collect()
    }

    /// Allocate a statement with its parent link set; the caller places it in a list.
    fn alloc(
        &mut self,
        kind: StatementKind,
        range: Option<SourceRange>,
        is_reference: bool,
        parent: StatementId,
    ) -> StatementId {
        let mut stmt = Statement::new(kind, self.language);
        stmt.parent = Some(parent);
        stmt.locations.push(SourceLocation {
            file: self.file,
            range,
            is_reference,
        });
        self.model.alloc_statement(stmt)
    }

    fn lower_stmt(&mut self, stmt: &Stmt, parent: StatementId) -> StatementId {
        let id = self.alloc(StatementKind::Empty, stmt.range, stmt.is_reference, parent);
        let mut content = None;
        let mut children = Vec::new();

        let kind = match &stmt.kind {
            StmtKind::Namespace { name, body } => {
                children = self.lower_body(body, id);
                StatementKind::Namespace(NamespaceDef {
                    name: name.clone(),
                    is_global: false,
                    is_placeholder: false,
                })
            }
            StmtKind::Type(decl) => {
                let prefix = decl
                    .prefix
                    .as_ref()
                    .and_then(|chain| self.lower_chain(chain, id, None, stmt.range));
                let parent_type_names = decl
                    .parents
                    .iter()
                    .map(|ty| self.lower_type(ty, id, None))
                    .collect();
                children = self.lower_body(&decl.body, id);
                if prefix.is_some() {
                    self.prefixed.push(id);
                }
                StatementKind::Type(TypeDef {
                    name: decl.name.clone(),
                    kind: decl.kind,
                    parent_type_names,
                    accessibility: decl.accessibility,
                    is_partial: decl.is_partial,
                    prefix,
                })
            }
            StmtKind::Method(decl) => {
                let prefix = decl
                    .prefix
                    .as_ref()
                    .and_then(|chain| self.lower_chain(chain, id, None, stmt.range));
                let return_type = decl
                    .return_type
                    .as_ref()
                    .map(|ty| self.lower_type(ty, id, None));
                let parameters = decl
                    .parameters
                    .iter()
                    .map(|param| self.lower_var(param, id, None))
                    .collect();
                let constructor_initializers = decl
                    .initializers
                    .iter()
                    .map(|call| self.lower_call(call, id, None, true))
                    .collect();
                if let Some(body) = &decl.body {
                    children = self.lower_body(body, id);
                }
                if prefix.is_some() {
                    self.prefixed.push(id);
                }
                StatementKind::Method(MethodDef {
                    name: decl.name.clone(),
                    parameters,
                    return_type,
                    is_constructor: decl.is_constructor,
                    is_destructor: decl.is_destructor,
                    is_partial: decl.is_partial,
                    constructor_initializers,
                    accessibility: decl.accessibility,
                    prefix,
                })
            }
            StmtKind::Property(decl) => {
                let return_type = decl.ty.as_ref().map(|ty| self.lower_type(ty, id, None));
                let getter = decl
                    .getter
                    .as_ref()
                    .map(|body| self.accessor(id, "get", body, decl.ty.as_ref(), stmt.range));
                let setter = decl
                    .setter
                    .as_ref()
                    .map(|body| self.accessor(id, "set", body, decl.ty.as_ref(), stmt.range));
                StatementKind::Property(PropertyDef {
                    name: decl.name.clone(),
                    return_type,
                    getter,
                    setter,
                    accessibility: decl.accessibility,
                })
            }
            StmtKind::Alias { name, target } => StatementKind::Alias {
                alias_name: name.clone(),
                target: self.lower_chain_name(target, id, stmt.range),
            },
            StmtKind::Import { namespace } => StatementKind::Import {
                imported_namespace: self.lower_chain_name(namespace, id, stmt.range),
            },
            StmtKind::Declaration {
                ty,
                declarators,
                accessibility,
            } => {
                content = Some(self.lower_declaration_list(
                    id,
                    ty.as_ref(),
                    declarators,
                    *accessibility,
                    stmt.range,
                ));
                StatementKind::Declaration
            }
            StmtKind::Expression(expr) => {
                content = Some(self.lower_expr(expr, id, None));
                StatementKind::Expression
            }
            StmtKind::Return(value) => {
                content = value.as_ref().map(|e| self.lower_expr(e, id, None));
                StatementKind::Return
            }
            StmtKind::Throw(value) => {
                content = value.as_ref().map(|e| self.lower_expr(e, id, None));
                StatementKind::Throw
            }
            StmtKind::Break => StatementKind::Break,
            StmtKind::Continue => StatementKind::Continue,
            StmtKind::Goto(label) => StatementKind::Goto(label.clone()),
            StmtKind::Label(label) => StatementKind::Label(label.clone()),
            StmtKind::Block(body) => {
                children = self.lower_body(body, id);
                StatementKind::Block
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                content = condition.as_ref().map(|e| self.lower_expr(e, id, None));
                children = self.lower_body(then_branch, id);
                StatementKind::If {
                    else_statements: self.lower_body(else_branch, id),
                }
            }
            StmtKind::While { condition, body } => {
                content = condition.as_ref().map(|e| self.lower_expr(e, id, None));
                children = self.lower_body(body, id);
                StatementKind::While
            }
            StmtKind::Do { condition, body } => {
                content = condition.as_ref().map(|e| self.lower_expr(e, id, None));
                children = self.lower_body(body, id);
                StatementKind::Do
            }
            StmtKind::For {
                initializer,
                condition,
                incrementer,
                body,
            } => {
                let initializer = initializer.as_ref().map(|e| self.lower_expr(e, id, None));
                content = condition.as_ref().map(|e| self.lower_expr(e, id, None));
                let incrementer = incrementer.as_ref().map(|e| self.lower_expr(e, id, None));
                children = self.lower_body(body, id);
                StatementKind::For {
                    initializer,
                    incrementer,
                }
            }
            StmtKind::Foreach { header, body } => {
                content = header.as_ref().map(|e| self.lower_expr(e, id, None));
                children = self.lower_body(body, id);
                StatementKind::Foreach
            }
            StmtKind::Switch { condition, body } => {
                content = condition.as_ref().map(|e| self.lower_expr(e, id, None));
                children = self.lower_body(body, id);
                StatementKind::Switch
            }
            StmtKind::Case(value) => {
                content = value.as_ref().map(|e| self.lower_expr(e, id, None));
                StatementKind::Case
            }
            StmtKind::Try {
                body,
                catches,
                finally,
            } => {
                children = self.lower_body(body, id);
                let catch_statements = catches
                    .iter()
                    .map(|clause| {
                        let catch = self.alloc(
                            StatementKind::Empty,
                            clause.range.or(stmt.range),
                            false,
                            id,
                        );
                        let parameter = clause
                            .parameter
                            .as_ref()
                            .map(|param| self.lower_var(param, catch, None));
                        let body = self.lower_body(&clause.body, catch);
                        let node = self.model.statement_mut(catch);
                        node.kind = StatementKind::Catch { parameter };
                        node.children = body;
                        catch
                    })
                    .collect();
                StatementKind::Try {
                    catch_statements,
                    finally_statements: self.lower_body(finally, id),
                }
            }
            StmtKind::Lock { target, body } => {
                content = target.as_ref().map(|e| self.lower_expr(e, id, None));
                children = self.lower_body(body, id);
                StatementKind::Lock
            }
            StmtKind::Using { resource, body } => {
                content = resource.as_ref().map(|e| self.lower_expr(e, id, None));
                children = self.lower_body(body, id);
                StatementKind::Using
            }
            StmtKind::Extern { linkage, body } => {
                children = self.lower_body(body, id);
                StatementKind::Extern {
                    linkage: linkage.clone(),
                }
            }
            StmtKind::Empty => StatementKind::Empty,
        };

        let node = self.model.statement_mut(id);
        node.kind = kind;
        node.content = content;
        node.children = children;
        id
    }

    /// A property accessor body, owned by the property but not in its child list.
    fn accessor(
        &mut self,
        property: StatementId,
        name: &str,
        body: &[Stmt],
        ty: Option<&TypeRef>,
        range: Option<SourceRange>,
    ) -> StatementId {
        let id = self.alloc(StatementKind::Empty, range, false, property);
        let (return_type, parameters) = if name == "get" {
            (ty.map(|ty| self.lower_type(ty, id, None)), Vec::new())
        } else {
            // Setters see their incoming value as `value`.
            let value = ty
                .map(|ty| self.lower_var(&VarDecl::new(ty.clone(), "value"), id, None))
                .into_iter()
                .collect();
            (None, value)
        };
        let children = self.lower_body(body, id);
        let node = self.model.statement_mut(id);
        node.kind = StatementKind::Method(MethodDef {
            name: SmolStr::new(name),
            parameters,
            return_type,
            is_constructor: false,
            is_destructor: false,
            is_partial: false,
            constructor_initializers: Vec::new(),
            accessibility: Accessibility::None,
            prefix: None,
        });
        node.children = children;
        id
    }

    /// `int a = 1, b;` becomes one compound whose declarations share a single type use.
    fn lower_declaration_list(
        &mut self,
        stmt: StatementId,
        ty: Option<&TypeRef>,
        declarators: &[(SmolStr, Option<Expr>)],
        accessibility: Accessibility,
        range: Option<SourceRange>,
    ) -> ExprId {
        let list = self.alloc_expr(ExprKind::Compound, range, stmt, None);
        let mut shared_type: Option<ExprId> = None;
        let mut components = Vec::with_capacity(declarators.len());

        for (name, init) in declarators {
            let decl = self.alloc_expr(ExprKind::Compound, None, stmt, Some(list));
            let variable_type = match shared_type {
                Some(existing) => Some(existing),
                None => {
                    // The first declarator owns the type use.
                    shared_type = ty.map(|ty| self.lower_type(ty, stmt, Some(decl)));
                    shared_type
                }
            };
            let initializer = init.as_ref().map(|e| self.lower_expr(e, stmt, Some(decl)));
            self.model.expression_mut(decl).kind = ExprKind::Declaration(VariableDecl {
                name: name.clone(),
                variable_type,
                accessibility,
                initializer,
            });
            components.push(decl);
        }

        self.model.expression_mut(list).components = components;
        list
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn alloc_expr(
        &mut self,
        kind: ExprKind,
        range: Option<SourceRange>,
        stmt: StatementId,
        parent: Option<ExprId>,
    ) -> ExprId {
        // Unranged nodes inherit the nearest enclosing range.
        let range = range
            .or_else(|| parent.and_then(|p| self.model.expression(p).location.range))
            .or_else(|| {
                self.model
                    .statement(stmt)
                    .locations
                    .first()
                    .and_then(|loc| loc.range)
            });
        let mut expr = Expression::new(kind, SourceLocation::new(self.file, range));
        expr.parent_statement = Some(stmt);
        expr.parent_expression = parent;
        self.model.alloc_expression(expr)
    }

    fn lower_expr(&mut self, expr: &Expr, stmt: StatementId, parent: Option<ExprId>) -> ExprId {
        match expr {
            Expr::Name(name) => self.lower_name(name, stmt, parent),
            Expr::Variable { name, index } => {
                let id = self.alloc_expr(ExprKind::Compound, name.range, stmt, parent);
                let name = self.name_use(name, stmt, id);
                let index = index.as_ref().map(|e| self.lower_expr(e, stmt, Some(id)));
                self.model.expression_mut(id).kind = ExprKind::Variable { name, index };
                id
            }
            Expr::Type(ty) => self.lower_type(ty, stmt, parent),
            Expr::Call(call) => self.lower_call(call, stmt, parent, false),
            Expr::Declaration(decl) => self.lower_var(decl, stmt, parent),
            Expr::Operator(op) => self.alloc_expr(ExprKind::Operator(op.clone()), None, stmt, parent),
            Expr::Literal(literal) => self.alloc_expr(
                ExprKind::Literal {
                    kind: literal.kind,
                    text: literal.text.clone(),
                },
                None,
                stmt,
                parent,
            ),
            Expr::Compound(components) => {
                let id = self.alloc_expr(ExprKind::Compound, None, stmt, parent);
                let components = components
                    .iter()
                    .map(|c| self.lower_expr(c, stmt, Some(id)))
                    .collect();
                self.model.expression_mut(id).components = components;
                id
            }
        }
    }

    fn lower_name(&mut self, name: &NameRef, stmt: StatementId, parent: Option<ExprId>) -> ExprId {
        let id = self.alloc_expr(ExprKind::Compound, name.range, stmt, parent);
        let name = self.name_use(name, stmt, id);
        self.model.expression_mut(id).kind = ExprKind::Name(name);
        id
    }

    fn name_use(&mut self, name: &NameRef, stmt: StatementId, owner: ExprId) -> NameUse {
        NameUse {
            name: name.name.clone(),
            prefix: name
                .prefix
                .as_ref()
                .and_then(|chain| self.lower_chain(chain, stmt, Some(owner), name.range)),
        }
    }

    fn lower_type(&mut self, ty: &TypeRef, stmt: StatementId, parent: Option<ExprId>) -> ExprId {
        let id = self.alloc_expr(ExprKind::Compound, ty.range, stmt, parent);
        let prefix = ty
            .prefix
            .as_ref()
            .and_then(|chain| self.lower_chain(chain, stmt, Some(id), ty.range));
        let type_parameters = ty
            .type_arguments
            .iter()
            .map(|arg| self.lower_type(arg, stmt, Some(id)))
            .collect();
        self.model.expression_mut(id).kind = ExprKind::Type {
            name: NameUse {
                name: ty.name.clone(),
                prefix,
            },
            type_parameters,
        };
        id
    }

    fn lower_call(
        &mut self,
        call: &CallExpr,
        stmt: StatementId,
        parent: Option<ExprId>,
        is_initializer: bool,
    ) -> ExprId {
        let id = self.alloc_expr(ExprKind::Compound, call.range, stmt, parent);
        let prefix = call
            .prefix
            .as_ref()
            .and_then(|chain| self.lower_chain(chain, stmt, Some(id), call.range));
        let type_arguments = call
            .type_arguments
            .iter()
            .map(|arg| self.lower_type(arg, stmt, Some(id)))
            .collect();
        let arguments = call
            .arguments
            .iter()
            .map(|arg| self.lower_expr(arg, stmt, Some(id)))
            .collect();
        self.model.expression_mut(id).kind = ExprKind::Call(MethodCall {
            name: call.name.clone(),
            prefix,
            arguments,
            type_arguments,
            is_constructor: call.is_constructor || is_initializer,
            is_destructor: call.is_destructor,
            is_constructor_initializer: is_initializer,
        });
        id
    }

    fn lower_var(&mut self, decl: &VarDecl, stmt: StatementId, parent: Option<ExprId>) -> ExprId {
        let id = self.alloc_expr(ExprKind::Compound, decl.range, stmt, parent);
        let variable_type = decl
            .ty
            .as_ref()
            .map(|ty| self.lower_type(ty, stmt, Some(id)));
        let initializer = decl
            .initializer
            .as_ref()
            .map(|e| self.lower_expr(e, stmt, Some(id)));
        self.model.expression_mut(id).kind = ExprKind::Declaration(VariableDecl {
            name: decl.name.clone(),
            variable_type,
            accessibility: decl.accessibility,
            initializer,
        });
        id
    }

    fn lower_chain(
        &mut self,
        chain: &NameChain,
        stmt: StatementId,
        parent: Option<ExprId>,
        range: Option<SourceRange>,
    ) -> Option<ExprId> {
        if chain.is_empty() {
            return None;
        }
        let id = self.alloc_expr(ExprKind::Compound, range, stmt, parent);
        let segments = chain
            .names
            .iter()
            .map(|name| {
                self.alloc_expr(
                    ExprKind::Name(NameUse {
                        name: name.clone(),
                        prefix: None,
                    }),
                    range,
                    stmt,
                    Some(id),
                )
            })
            .collect();
        self.model.expression_mut(id).kind = ExprKind::Prefix(NamePrefix {
            is_global: chain.is_global,
            segments,
        });
        Some(id)
    }

    /// An alias or import target: the last segment as a name use, the rest as its prefix.
    fn lower_chain_name(
        &mut self,
        chain: &NameChain,
        stmt: StatementId,
        range: Option<SourceRange>,
    ) -> ExprId {
        let (prefix, name) = chain
            .clone()
            .split_last()
            .unwrap_or((None, SmolStr::default()));
        self.lower_name(
            &NameRef {
                name,
                prefix,
                range,
            },
            stmt,
            None,
        )
    }
}
