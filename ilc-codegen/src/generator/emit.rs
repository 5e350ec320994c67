//! Instruction emission
//!
//! Every expression leaves its value in `%rax`. Binary operators evaluate the
//! right operand first and stage both operands on the stack so the left one
//! ends up in `%rax` and the right one in `%rbx`.

use super::Generator;
use crate::abi::CallingConvention;
use crate::asm::{AsmInst, Condition, Operand, Reg};
use crate::context::FunctionContext;
use crate::errors::CodegenError;
use ilc_common::Type;
use ilc_frontend::ast::{BinaryOp, Expression, ExpressionKind, FunctionDeclaration, Identifier, UnaryOp};

const ACC: Reg = CallingConvention::RETURN_REG;

impl Generator {
    pub(super) fn emit_function(
        &mut self,
        function: &FunctionDeclaration,
        ctx: &mut FunctionContext,
    ) -> Result<(), CodegenError> {
        if function.parameters.len() > CallingConvention::MAX_REG_PARAMS {
            return Err(CodegenError::TooManyParameters {
                function: ctx.name.clone(),
                count: function.parameters.len(),
                max: CallingConvention::MAX_REG_PARAMS,
            });
        }

        self.emit(AsmInst::Label(ctx.name.clone()));
        self.comment("prologue");
        self.emit(AsmInst::Push(CallingConvention::FRAME_PTR));
        self.emit(AsmInst::Mov(
            CallingConvention::STACK_PTR.into(),
            CallingConvention::FRAME_PTR.into(),
        ));
        self.comment("stack allocation");
        self.emit(AsmInst::Sub(
            Operand::Imm(i64::from(ctx.frame_size())),
            CallingConvention::STACK_PTR.into(),
        ));

        self.comment("move function parameters into local stack space");
        for (index, parameter) in function.parameters.iter().enumerate() {
            let reg = CallingConvention::param_reg(index)?;
            let offset = slot_of(&parameter.name, ctx)?;
            self.emit(AsmInst::Mov(reg.into(), Operand::frame_slot(offset)));
        }

        self.comment("function body");
        self.emit_expression(&function.body, ctx)?;

        self.comment("epilogue");
        self.emit(AsmInst::Leave);
        self.emit(AsmInst::Ret);
        Ok(())
    }

    fn emit_expression(&mut self, expr: &Expression, ctx: &mut FunctionContext) -> Result<(), CodegenError> {
        match &expr.kind {
            ExpressionKind::Literal { value, constant } => {
                self.comment("literal expression");
                self.emit_literal(expr, value, constant.as_deref())?;
            }

            ExpressionKind::Identifier(identifier) => {
                self.comment("identifier expression");
                let offset = slot_of(identifier, ctx)?;
                self.emit(AsmInst::Mov(Operand::frame_slot(offset), ACC.into()));
            }

            ExpressionKind::Call { callee, arguments } => {
                self.comment("function call expression");
                if arguments.len() > CallingConvention::MAX_REG_PARAMS {
                    return Err(CodegenError::TooManyArguments {
                        callee: callee.name.clone(),
                        count: arguments.len(),
                        max: CallingConvention::MAX_REG_PARAMS,
                        location: expr.location.clone(),
                    });
                }

                // arguments are staged on the stack; a later argument may
                // clobber %rdx, %rcx or every argument register
                for argument in arguments {
                    self.emit_expression(argument, ctx)?;
                    self.emit(AsmInst::Push(ACC));
                }
                for index in (0..arguments.len()).rev() {
                    self.emit(AsmInst::Pop(CallingConvention::param_reg(index)?));
                }

                // %al carries the vector register count for variadic callees
                self.emit(AsmInst::Mov(Operand::Imm(0), ACC.into()));
                self.emit(AsmInst::Call {
                    target: callee.name.clone(),
                    external: !self.functions.contains(&callee.name),
                });
            }

            ExpressionKind::Block { body, implicit_return } => {
                self.comment("block expression");
                for statement in body {
                    self.emit_expression(statement, ctx)?;
                }
                match implicit_return {
                    Some(implicit_return) => {
                        self.comment("implicit return expression");
                        self.emit_expression(implicit_return, ctx)?;
                    }
                    None => self.emit_unit(),
                }
            }

            ExpressionKind::Bind { name, value, .. } => {
                self.emit_expression(value, ctx)?;
                self.comment("bind expression");
                let offset = slot_of(name, ctx)?;
                self.emit(AsmInst::Mov(ACC.into(), Operand::frame_slot(offset)));
            }

            ExpressionKind::Assignment { target, value } => {
                self.emit_expression(value, ctx)?;
                self.comment("assignment expression");
                let offset = slot_of(target, ctx)?;
                self.emit(AsmInst::Mov(ACC.into(), Operand::frame_slot(offset)));
            }

            ExpressionKind::Binary { op, left, right } => {
                self.comment("binary expression");
                self.emit_expression(right, ctx)?;
                self.emit(AsmInst::Push(ACC));
                self.emit_expression(left, ctx)?;
                self.emit(AsmInst::Push(ACC));
                self.emit(AsmInst::Pop(ACC));
                self.emit(AsmInst::Pop(Reg::Rbx));
                self.emit_binary_operator(*op);
            }

            ExpressionKind::Unary { op, operand } => {
                self.comment("unary expression");
                self.emit_expression(operand, ctx)?;
                match op {
                    UnaryOp::LogicalNot => {
                        self.emit(AsmInst::Cmp(Operand::Imm(0), ACC.into()));
                        self.emit(AsmInst::Set(Condition::Equal, Reg::Al));
                        self.emit(AsmInst::Movzbq(Reg::Al, ACC));
                    }
                    UnaryOp::Minus => self.emit(AsmInst::Imul(Operand::Imm(-1), ACC)),
                }
            }

            ExpressionKind::Separated(inner) => self.emit_expression(inner, ctx)?,

            ExpressionKind::Condition {
                condition,
                then_branch,
                else_branch,
            } => {
                self.comment("conditional expression");
                let else_label = self.conditional_labels.new_label();
                let end_label = self.conditional_labels.new_label();

                self.emit_expression(condition, ctx)?;
                self.emit(AsmInst::Cmp(Operand::Imm(0), ACC.into()));
                self.emit(AsmInst::Je(else_label.clone()));
                self.emit_expression(then_branch, ctx)?;
                self.emit(AsmInst::Jmp(end_label.clone()));
                self.emit(AsmInst::Label(else_label));
                match else_branch {
                    Some(else_branch) => self.emit_expression(else_branch, ctx)?,
                    None => self.emit_unit(),
                }
                self.emit(AsmInst::Label(end_label));
            }

            ExpressionKind::Return(value) => {
                self.comment("return expression");
                self.emit_expression(value, ctx)?;
                self.emit(AsmInst::Leave);
                self.emit(AsmInst::Ret);
            }

            ExpressionKind::Loop { condition, body } => {
                self.comment("loop expression");
                let start_label = self.loop_labels.new_label();
                let end_label = self.loop_labels.new_label();

                ctx.push_loop(end_label.clone());
                self.emit(AsmInst::Label(start_label.clone()));
                self.emit_expression(condition, ctx)?;
                self.emit(AsmInst::Cmp(Operand::Imm(0), ACC.into()));
                self.emit(AsmInst::Je(end_label.clone()));
                self.emit_expression(body, ctx)?;
                self.emit(AsmInst::Jmp(start_label));
                self.emit(AsmInst::Label(end_label));
                ctx.pop_loop();
            }

            ExpressionKind::Break => {
                self.comment("break expression");
                let target = ctx
                    .current_loop()
                    .map(str::to_string)
                    .ok_or_else(|| CodegenError::BreakOutsideLoop {
                        location: expr.location.clone(),
                    })?;
                self.emit(AsmInst::Jmp(target));
            }
        }

        Ok(())
    }

    fn emit_literal(&mut self, expr: &Expression, value: &str, constant: Option<&str>) -> Result<(), CodegenError> {
        let unsupported = || CodegenError::UnsupportedLiteral {
            value: value.to_string(),
            ty: expr.expr_type,
            location: expr.location.clone(),
        };

        match expr.expr_type {
            Type::Integer => {
                let number = value.parse::<i64>().map_err(|_| unsupported())?;
                self.emit(AsmInst::Mov(Operand::Imm(number), ACC.into()));
            }
            Type::Boolean => {
                let number = match value {
                    "true" => 1,
                    "false" => 0,
                    _ => return Err(unsupported()),
                };
                self.emit(AsmInst::Mov(Operand::Imm(number), ACC.into()));
            }
            Type::String => {
                let label = constant.ok_or_else(unsupported)?;
                let symbol = Operand::Symbol {
                    label: label.to_string(),
                    base: Reg::Rip,
                };
                self.emit(AsmInst::Lea(symbol, ACC));
            }
            Type::Unit => {}
            Type::Float | Type::Undefined => return Err(unsupported()),
        }

        Ok(())
    }

    /// Operands are in `%rax` (left) and `%rbx` (right); the result replaces
    /// `%rax`
    fn emit_binary_operator(&mut self, op: BinaryOp) {
        let rbx = Operand::Reg(Reg::Rbx);
        match op {
            BinaryOp::Add => self.emit(AsmInst::Add(rbx, ACC)),
            BinaryOp::Sub => self.emit(AsmInst::Sub(rbx, ACC.into())),
            BinaryOp::Mul => self.emit(AsmInst::Imul(rbx, ACC)),
            BinaryOp::Div => {
                self.emit(AsmInst::Cqto);
                self.emit(AsmInst::Idiv(Reg::Rbx));
            }
            BinaryOp::Equal
            | BinaryOp::NotEqual
            | BinaryOp::Less
            | BinaryOp::Greater
            | BinaryOp::LessEqual
            | BinaryOp::GreaterEqual => {
                let condition = match op {
                    BinaryOp::Equal => Condition::Equal,
                    BinaryOp::NotEqual => Condition::NotEqual,
                    BinaryOp::Less => Condition::Less,
                    BinaryOp::Greater => Condition::Greater,
                    BinaryOp::LessEqual => Condition::LessEqual,
                    _ => Condition::GreaterEqual,
                };
                self.emit(AsmInst::Cmp(rbx, ACC.into()));
                self.emit(AsmInst::Set(condition, Reg::Al));
                self.emit(AsmInst::Movzbq(Reg::Al, ACC));
            }
            BinaryOp::LeftShift | BinaryOp::RightShift => {
                self.emit(AsmInst::Mov(rbx, Reg::Rcx.into()));
                if op == BinaryOp::LeftShift {
                    self.emit(AsmInst::Shl(Reg::Cl, ACC));
                } else {
                    self.emit(AsmInst::Shr(Reg::Cl, ACC));
                }
            }
            // both operands are already evaluated; no short circuit
            BinaryOp::LogicalAnd => self.emit(AsmInst::And(rbx, ACC)),
            BinaryOp::LogicalOr => self.emit(AsmInst::Or(rbx, ACC)),
        }
    }

    fn emit_unit(&mut self) {
        self.emit(AsmInst::Mov(Operand::Imm(0), ACC.into()));
    }
}

/// Frame offset of the slot a laid-out identifier names
fn slot_of(identifier: &Identifier, ctx: &FunctionContext) -> Result<i32, CodegenError> {
    identifier
        .local
        .and_then(|id| ctx.local(id))
        .map(|local| local.offset)
        .ok_or_else(|| CodegenError::UnresolvedLocal {
            name: identifier.name.clone(),
            location: identifier.location.clone(),
        })
}
