//! Type checking
//!
//! Read-only validation of a resolved, typed tree. Every rule is checked and
//! reported independently; the walk always continues into child expressions.

use crate::ast::*;
use ilc_common::{DiagnosticKind, Diagnostics, MismatchReason, SourceLocation, Type};

/// Check every function of a typed `program`
pub fn check_types(program: &Program) -> Diagnostics {
    let mut checker = TypeChecker {
        declarations: &program.declarations,
        return_type: Type::Undefined,
        loop_depth: 0,
        diagnostics: Diagnostics::new(),
    };

    for function in &program.functions {
        checker.check_function(function);
    }

    log::debug!("type checking: {}", checker.diagnostics.summary());
    checker.diagnostics
}

struct TypeChecker<'a> {
    declarations: &'a DeclarationTable,
    /// Declared return type of the function being checked
    return_type: Type,
    loop_depth: usize,
    diagnostics: Diagnostics,
}

impl<'a> TypeChecker<'a> {
    fn check_function(&mut self, function: &FunctionDeclaration) {
        self.return_type = function.return_type.ty;
        self.loop_depth = 0;

        self.check_expression(&function.body);

        if function.body.expr_type != self.return_type {
            self.mismatch(
                MismatchReason::Return,
                format!(
                    "function {} returns {} but its body has type {}",
                    function.name.name, self.return_type, function.body.expr_type
                ),
                &function.name.location,
            );
        }
    }

    fn mismatch(&mut self, reason: MismatchReason, message: String, location: &SourceLocation) {
        self.diagnostics
            .report(DiagnosticKind::TypeMismatch(reason), message, location.clone());
    }

    fn declaration(&self, identifier: &Identifier) -> Option<&'a Declaration> {
        let declarations: &'a DeclarationTable = self.declarations;
        identifier.binding.and_then(|id| declarations.get(id))
    }

    /// Report a variable-position identifier bound to a function
    fn check_value_binding(&mut self, identifier: &Identifier) {
        if let Some(declaration) = self.declaration(identifier) {
            if declaration.is_callable() {
                self.diagnostics.report(
                    DiagnosticKind::NotAValue,
                    format!("function {} cannot be used as a value", identifier.name),
                    identifier.location.clone(),
                );
            }
        }
    }

    fn check_condition(&mut self, condition: &Expression, construct: &str) {
        if condition.expr_type != Type::Boolean {
            self.diagnostics.report(
                DiagnosticKind::ConditionNotBoolean,
                format!("{} condition has type {}, expected bool", construct, condition.expr_type),
                condition.location.clone(),
            );
        }
    }

    fn check_expression(&mut self, expr: &Expression) {
        match &expr.kind {
            ExpressionKind::Literal { .. } => {}

            ExpressionKind::Identifier(identifier) => self.check_value_binding(identifier),

            ExpressionKind::Call { callee, arguments } => {
                for argument in arguments {
                    self.check_expression(argument);
                }
                self.check_call(callee, arguments, &expr.location);
            }

            ExpressionKind::Block { body, implicit_return } => {
                for statement in body {
                    self.check_expression(statement);
                }
                if let Some(implicit_return) = implicit_return {
                    self.check_expression(implicit_return);
                }
            }

            ExpressionKind::Bind { name, annotation, value } => {
                self.check_expression(value);
                if annotation.ty != value.expr_type {
                    self.mismatch(
                        MismatchReason::Bind,
                        format!(
                            "cannot bind {} value to {} of type {}",
                            value.expr_type, name.name, annotation.ty
                        ),
                        &expr.location,
                    );
                }
            }

            ExpressionKind::Assignment { target, value } => {
                self.check_expression(value);
                self.check_value_binding(target);

                // an unbound target was already reported by name resolution
                if let Some(declaration) = self.declaration(target) {
                    if declaration.ty != value.expr_type {
                        self.mismatch(
                            MismatchReason::Assignment,
                            format!(
                                "cannot assign {} value to {} of type {}",
                                value.expr_type, target.name, declaration.ty
                            ),
                            &expr.location,
                        );
                    }
                }
            }

            ExpressionKind::Binary { op, left, right } => {
                if left.expr_type != right.expr_type {
                    self.mismatch(
                        MismatchReason::BinaryOperand,
                        format!(
                            "operands of {} have different types {} and {}",
                            op, left.expr_type, right.expr_type
                        ),
                        &expr.location,
                    );
                }
                if !op.applies_to(left.expr_type) {
                    self.diagnostics.report(
                        DiagnosticKind::OperatorNotApplicable,
                        format!("operator {} cannot be applied to {}", op, left.expr_type),
                        expr.location.clone(),
                    );
                }
                self.check_expression(left);
                self.check_expression(right);
            }

            ExpressionKind::Unary { op, operand } => {
                if !op.applies_to(operand.expr_type) {
                    self.diagnostics.report(
                        DiagnosticKind::OperatorNotApplicable,
                        format!("operator {} cannot be applied to {}", op, operand.expr_type),
                        expr.location.clone(),
                    );
                }
                self.check_expression(operand);
            }

            ExpressionKind::Separated(inner) => self.check_expression(inner),

            ExpressionKind::Condition {
                condition,
                then_branch,
                else_branch,
            } => {
                self.check_expression(condition);
                self.check_condition(condition, "if");
                self.check_expression(then_branch);

                if let Some(else_branch) = else_branch {
                    self.check_expression(else_branch);
                    if else_branch.expr_type != then_branch.expr_type {
                        self.mismatch(
                            MismatchReason::BranchMismatch,
                            format!(
                                "if branches have different types {} and {}",
                                then_branch.expr_type, else_branch.expr_type
                            ),
                            &expr.location,
                        );
                    }
                }
            }

            ExpressionKind::Return(value) => {
                self.check_expression(value);
                if value.expr_type != self.return_type {
                    self.mismatch(
                        MismatchReason::Return,
                        format!(
                            "cannot return {} from a function returning {}",
                            value.expr_type, self.return_type
                        ),
                        &expr.location,
                    );
                }
            }

            ExpressionKind::Loop { condition, body } => {
                self.check_expression(condition);
                self.check_condition(condition, "while");

                self.loop_depth += 1;
                self.check_expression(body);
                self.loop_depth -= 1;
            }

            ExpressionKind::Break => {
                if self.loop_depth == 0 {
                    self.diagnostics.report(
                        DiagnosticKind::BreakOutsideLoop,
                        "break outside of a loop".to_string(),
                        expr.location.clone(),
                    );
                }
            }
        }
    }

    fn check_call(&mut self, callee: &Identifier, arguments: &[Expression], location: &SourceLocation) {
        // unbound callees were already reported by name resolution
        let Some(declaration) = self.declaration(callee) else {
            return;
        };
        let Some(signature) = declaration.signature.as_ref() else {
            self.diagnostics.report(
                DiagnosticKind::NotCallable,
                format!("{} is not a function", callee.name),
                callee.location.clone(),
            );
            return;
        };

        let expected = signature.parameters.len();
        let count_mismatch = if signature.is_variadic {
            arguments.len() < expected
        } else {
            arguments.len() != expected
        };
        if count_mismatch {
            self.diagnostics.report(
                DiagnosticKind::ArgumentCountMismatch,
                format!(
                    "{} expects {}{} arguments, got {}",
                    callee.name,
                    expected,
                    if signature.is_variadic { " or more" } else { "" },
                    arguments.len()
                ),
                location.clone(),
            );
        }

        for index in 0..arguments.len().max(expected) {
            match (arguments.get(index), signature.parameters.get(index)) {
                (Some(argument), Some(&parameter)) => {
                    if argument.expr_type != parameter {
                        self.diagnostics.report(
                            DiagnosticKind::ArgumentTypeMismatch,
                            format!(
                                "argument {} of {} has type {}, expected {}",
                                index + 1,
                                callee.name,
                                argument.expr_type,
                                parameter
                            ),
                            argument.location.clone(),
                        );
                    }
                }
                (Some(_), None) if signature.is_variadic => {}
                (Some(argument), None) => {
                    self.diagnostics.report(
                        DiagnosticKind::ArgumentTypeMismatch,
                        format!("unexpected argument {} to {}", index + 1, callee.name),
                        argument.location.clone(),
                    );
                }
                (None, Some(parameter)) => {
                    self.diagnostics.report(
                        DiagnosticKind::ArgumentTypeMismatch,
                        format!("missing argument {} of type {} to {}", index + 1, parameter, callee.name),
                        location.clone(),
                    );
                }
                (None, None) => {}
            }
        }
    }
}
