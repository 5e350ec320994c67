//! Name resolution
//!
//! Binds every identifier occurrence to its declaring site. Externals and
//! function names live in the global scope so forward references and mutual
//! recursion resolve; each function gets a scope for its parameters and each
//! block a scope of its own.

use crate::ast::*;
use ilc_common::{DeclId, DiagnosticKind, Diagnostics, ScopeChain, Type};

/// Resolve all names in `program`, rebuilding its declaration table.
///
/// The table is rebuilt in a fixed walk order, so resolving an already
/// resolved program reproduces the same bindings.
pub fn resolve_names(program: &mut Program) -> Diagnostics {
    let Program {
        functions,
        externals,
        declarations,
    } = program;

    declarations.clear();
    let mut resolver = NameResolver {
        declarations,
        scopes: ScopeChain::new(),
        diagnostics: Diagnostics::new(),
    };
    resolver.resolve_program(functions, externals);

    log::debug!(
        "name resolution: {} declarations, {}",
        resolver.declarations.len(),
        resolver.diagnostics.summary()
    );
    resolver.diagnostics
}

struct NameResolver<'a> {
    declarations: &'a mut DeclarationTable,
    scopes: ScopeChain<DeclId>,
    diagnostics: Diagnostics,
}

impl<'a> NameResolver<'a> {
    fn resolve_program(&mut self, functions: &mut [FunctionDeclaration], externals: &mut [ExternalDeclaration]) {
        self.scopes.push_scope(); // global scope

        for external in externals.iter_mut() {
            let signature = signature_of(&external.parameters, external.is_variadic);
            self.declare(
                &mut external.name,
                DeclarationKind::External,
                external.return_type.ty,
                Some(signature),
            );

            // parameter names are only checked for duplicates
            self.scopes.push_scope();
            for parameter in external.parameters.iter_mut() {
                self.declare(&mut parameter.name, DeclarationKind::Parameter, parameter.annotation.ty, None);
            }
            self.scopes.pop_scope();
        }

        for function in functions.iter_mut() {
            let signature = signature_of(&function.parameters, false);
            self.declare(
                &mut function.name,
                DeclarationKind::Function,
                function.return_type.ty,
                Some(signature),
            );
        }

        for function in functions.iter_mut() {
            self.scopes.push_scope(); // function scope
            for parameter in function.parameters.iter_mut() {
                self.declare(&mut parameter.name, DeclarationKind::Parameter, parameter.annotation.ty, None);
            }
            self.resolve_expression(&mut function.body);
            self.scopes.pop_scope();
        }

        self.scopes.pop_scope();
    }

    /// Add a declaration for `identifier` and bind it in the innermost scope.
    ///
    /// A duplicate still gets its own table entry so later passes can type it.
    fn declare(&mut self, identifier: &mut Identifier, kind: DeclarationKind, ty: Type, signature: Option<Signature>) {
        let id = self.declarations.add(Declaration {
            name: identifier.name.clone(),
            kind,
            ty,
            location: identifier.location.clone(),
            signature,
        });
        identifier.binding = Some(id);

        if let Err(existing) = self.scopes.declare(&identifier.name, id) {
            let existing = *existing;
            let message = format!("identifier {} is already declared", identifier.name);
            let mut diagnostic = ilc_common::Diagnostic::new(
                DiagnosticKind::DuplicateDeclaration,
                message,
                identifier.location.clone(),
            );
            if let Some(previous) = self.declarations.get(existing) {
                diagnostic = diagnostic.with_note(format!("previous declaration at {}", previous.location));
            }
            self.diagnostics.push(diagnostic);
        }
    }

    fn resolve_reference(&mut self, identifier: &mut Identifier) {
        identifier.binding = self.scopes.lookup(&identifier.name).copied();
        if identifier.binding.is_none() {
            self.diagnostics.report(
                DiagnosticKind::UndeclaredIdentifier,
                format!("undeclared identifier {}", identifier.name),
                identifier.location.clone(),
            );
        }
    }

    fn resolve_expression(&mut self, expr: &mut Expression) {
        match &mut expr.kind {
            ExpressionKind::Literal { .. } | ExpressionKind::Break => {}

            ExpressionKind::Identifier(identifier) => self.resolve_reference(identifier),

            ExpressionKind::Call { callee, arguments } => {
                self.resolve_reference(callee);
                for argument in arguments.iter_mut() {
                    self.resolve_expression(argument);
                }
            }

            ExpressionKind::Block { body, implicit_return } => {
                self.scopes.push_scope();
                for statement in body.iter_mut() {
                    self.resolve_expression(statement);
                }
                if let Some(implicit_return) = implicit_return {
                    self.resolve_expression(implicit_return);
                }
                self.scopes.pop_scope();
            }

            ExpressionKind::Bind { name, annotation, value } => {
                // the bound name is not visible in its own initializer
                self.resolve_expression(value);
                self.declare(name, DeclarationKind::Local, annotation.ty, None);
            }

            ExpressionKind::Assignment { target, value } => {
                self.resolve_reference(target);
                self.resolve_expression(value);
            }

            ExpressionKind::Binary { left, right, .. } => {
                self.resolve_expression(left);
                self.resolve_expression(right);
            }

            ExpressionKind::Unary { operand, .. } => self.resolve_expression(operand),
            ExpressionKind::Separated(inner) => self.resolve_expression(inner),
            ExpressionKind::Return(value) => self.resolve_expression(value),

            ExpressionKind::Condition {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expression(condition);
                self.resolve_expression(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_expression(else_branch);
                }
            }

            ExpressionKind::Loop { condition, body } => {
                self.resolve_expression(condition);
                self.resolve_expression(body);
            }
        }
    }
}

fn signature_of(parameters: &[Parameter], is_variadic: bool) -> Signature {
    Signature {
        parameters: parameters.iter().map(|p| p.annotation.ty).collect(),
        is_variadic,
    }
}
