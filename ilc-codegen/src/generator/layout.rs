//! Frame layout
//!
//! Walks a function depth-first in evaluation scope order. Parameters take the
//! first slots; every `let` takes the next slot in the innermost scope once its
//! initializer has been laid out. Each identifier records the `LocalId` of the
//! slot it names.

use super::Generator;
use crate::context::FunctionContext;
use crate::errors::CodegenError;
use ilc_common::Type;
use ilc_frontend::ast::{Expression, ExpressionKind, FunctionDeclaration, Identifier};

impl Generator {
    pub(super) fn layout_function(
        &mut self,
        function: &mut FunctionDeclaration,
        ctx: &mut FunctionContext,
    ) -> Result<(), CodegenError> {
        ctx.push_scope();
        for parameter in function.parameters.iter_mut() {
            let id = ctx.register_local(&parameter.name.name, parameter.annotation.ty, &parameter.name.location)?;
            parameter.name.local = Some(id);
        }

        self.layout_expression(&mut function.body, ctx)?;
        ctx.pop_scope();

        log::debug!("{}: frame of {} bytes", ctx.name, ctx.frame_size());
        Ok(())
    }

    fn layout_expression(&mut self, expr: &mut Expression, ctx: &mut FunctionContext) -> Result<(), CodegenError> {
        match &mut expr.kind {
            ExpressionKind::Literal { value, constant } => {
                if expr.expr_type == Type::String {
                    *constant = Some(self.constants.allocate(value, Type::String));
                }
            }

            ExpressionKind::Identifier(identifier) => bind_local(identifier, ctx)?,

            ExpressionKind::Call { arguments, .. } => {
                for argument in arguments.iter_mut() {
                    self.layout_expression(argument, ctx)?;
                }
            }

            ExpressionKind::Block { body, implicit_return } => {
                ctx.push_scope();
                for statement in body.iter_mut() {
                    self.layout_expression(statement, ctx)?;
                }
                if let Some(implicit_return) = implicit_return {
                    self.layout_expression(implicit_return, ctx)?;
                }
                ctx.pop_scope();
            }

            ExpressionKind::Bind { name, annotation, value } => {
                self.layout_expression(value, ctx)?;
                let id = ctx.register_local(&name.name, annotation.ty, &name.location)?;
                name.local = Some(id);
            }

            ExpressionKind::Assignment { target, value } => {
                self.layout_expression(value, ctx)?;
                bind_local(target, ctx)?;
            }

            ExpressionKind::Binary { left, right, .. } => {
                self.layout_expression(left, ctx)?;
                self.layout_expression(right, ctx)?;
            }

            ExpressionKind::Unary { operand, .. } => self.layout_expression(operand, ctx)?,
            ExpressionKind::Separated(inner) => self.layout_expression(inner, ctx)?,
            ExpressionKind::Return(value) => self.layout_expression(value, ctx)?,

            ExpressionKind::Condition {
                condition,
                then_branch,
                else_branch,
            } => {
                self.layout_expression(condition, ctx)?;
                self.layout_expression(then_branch, ctx)?;
                if let Some(else_branch) = else_branch {
                    self.layout_expression(else_branch, ctx)?;
                }
            }

            ExpressionKind::Loop { condition, body } => {
                self.layout_expression(condition, ctx)?;
                self.layout_expression(body, ctx)?;
            }

            ExpressionKind::Break => {}
        }

        Ok(())
    }
}

fn bind_local(identifier: &mut Identifier, ctx: &FunctionContext) -> Result<(), CodegenError> {
    identifier.local = Some(ctx.resolve(&identifier.name, &identifier.location)?);
    Ok(())
}
