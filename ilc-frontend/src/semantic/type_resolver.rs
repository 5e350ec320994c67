//! Type resolution
//!
//! Assigns a type to every expression, bottom-up. Nothing is compared here;
//! disagreements between types are the type checker's job.

use crate::ast::*;
use ilc_common::{DiagnosticKind, Diagnostics, Type};

/// Resolve the type of every expression in `program`.
///
/// Requires name resolution to have run; an identifier without a binding
/// resolves to `Type::Undefined`.
pub fn resolve_types(program: &mut Program) -> Diagnostics {
    let Program {
        functions,
        externals,
        declarations,
    } = program;

    let mut resolver = TypeResolver {
        declarations,
        diagnostics: Diagnostics::new(),
    };

    for external in externals.iter() {
        resolver.check_annotation(&external.return_type);
        for parameter in &external.parameters {
            resolver.check_annotation(&parameter.annotation);
        }
    }

    for function in functions.iter_mut() {
        resolver.check_annotation(&function.return_type);
        for parameter in &function.parameters {
            resolver.check_annotation(&parameter.annotation);
        }
        resolver.resolve_expression(&mut function.body);
    }

    log::debug!("type resolution: {}", resolver.diagnostics.summary());
    resolver.diagnostics
}

/// The type a literal's raw text denotes, if any.
///
/// Checked in order: `unit`, the boolean keywords, a leading quote, a 64-bit
/// integer, then a float.
pub fn literal_type(value: &str) -> Option<Type> {
    if value == "unit" {
        Some(Type::Unit)
    } else if value == "true" || value == "false" {
        Some(Type::Boolean)
    } else if value.starts_with('"') {
        Some(Type::String)
    } else if value.parse::<i64>().is_ok() {
        Some(Type::Integer)
    } else if value.parse::<f64>().is_ok() {
        Some(Type::Float)
    } else {
        None
    }
}

struct TypeResolver<'a> {
    declarations: &'a DeclarationTable,
    diagnostics: Diagnostics,
}

impl<'a> TypeResolver<'a> {
    fn check_annotation(&mut self, annotation: &TypeAnnotation) {
        if !annotation.ty.is_defined() {
            self.diagnostics.report(
                DiagnosticKind::UnresolvedType,
                format!("unknown type {}", annotation.name),
                annotation.location.clone(),
            );
        }
    }

    /// Declared type of a name occurrence, reporting unbound names
    fn binding_type(&mut self, identifier: &Identifier) -> Type {
        match identifier.binding.and_then(|id| self.declarations.get(id)) {
            Some(declaration) => declaration.ty,
            None => {
                self.diagnostics.report(
                    DiagnosticKind::UnresolvedType,
                    format!("cannot resolve type of {}", identifier.name),
                    identifier.location.clone(),
                );
                Type::Undefined
            }
        }
    }

    fn resolve_expression(&mut self, expr: &mut Expression) -> Type {
        let ty = match &mut expr.kind {
            ExpressionKind::Literal { value, .. } => match literal_type(value) {
                Some(ty) => ty,
                None => {
                    self.diagnostics.report(
                        DiagnosticKind::UnresolvedType,
                        format!("cannot resolve type of literal {}", value),
                        expr.location.clone(),
                    );
                    Type::Undefined
                }
            },

            ExpressionKind::Identifier(identifier) => self.binding_type(identifier),

            ExpressionKind::Call { callee, arguments } => {
                for argument in arguments.iter_mut() {
                    self.resolve_expression(argument);
                }
                self.binding_type(callee)
            }

            ExpressionKind::Block { body, implicit_return } => {
                for statement in body.iter_mut() {
                    self.resolve_expression(statement);
                }
                match implicit_return {
                    Some(implicit_return) => self.resolve_expression(implicit_return),
                    None => Type::Unit,
                }
            }

            ExpressionKind::Bind { annotation, value, .. } => {
                self.check_annotation(annotation);
                self.resolve_expression(value);
                annotation.ty
            }

            ExpressionKind::Assignment { target, value } => {
                self.resolve_expression(value);
                target
                    .binding
                    .and_then(|id| self.declarations.get(id))
                    .map(|declaration| declaration.ty)
                    .unwrap_or(Type::Undefined)
            }

            // operand equality is the checker's job
            ExpressionKind::Binary { left, right, .. } => {
                let left_type = self.resolve_expression(left);
                self.resolve_expression(right);
                left_type
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
                let then_type = self.resolve_expression(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_expression(else_branch);
                }
                then_type
            }

            ExpressionKind::Loop { condition, body } => {
                self.resolve_expression(condition);
                self.resolve_expression(body);
                Type::Unit
            }

            ExpressionKind::Break => Type::Unit,
        };

        expr.expr_type = ty;
        ty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::resolve_names;
    use crate::Frontend;

    fn resolve(source: &str) -> (Program, Diagnostics) {
        let mut program = Frontend::parse_source(source, "test.il").unwrap();
        resolve_names(&mut program);
        let diagnostics = resolve_types(&mut program);
        (program, diagnostics)
    }

    fn body_type(program: &Program) -> Type {
        program.functions[0].body.expr_type
    }

    #[test]
    fn test_literal_type_priority() {
        assert_eq!(literal_type("unit"), Some(Type::Unit));
        assert_eq!(literal_type("true"), Some(Type::Boolean));
        assert_eq!(literal_type("\"42\""), Some(Type::String));
        assert_eq!(literal_type("42"), Some(Type::Integer));
        assert_eq!(literal_type("4.2"), Some(Type::Float));
        assert_eq!(literal_type("99999999999999999999"), Some(Type::Float));
        assert_eq!(literal_type("4x"), None);
    }

    #[test]
    fn test_binary_takes_left_type() {
        let (program, diagnostics) = resolve("int f() { 1 + true }");
        assert!(diagnostics.is_empty());
        assert_eq!(body_type(&program), Type::Integer);

        let (program, _) = resolve("int f() { true + 1 }");
        assert_eq!(body_type(&program), Type::Boolean);
    }

    #[test]
    fn test_comparison_takes_left_type() {
        let (program, diagnostics) = resolve("int f(int a) { a <= 2 }");
        assert!(diagnostics.is_empty());
        assert_eq!(body_type(&program), Type::Integer);

        let (program, _) = resolve("bool f(bool a) { a == true }");
        assert_eq!(body_type(&program), Type::Boolean);
    }

    #[test]
    fn test_block_without_implicit_return_is_unit() {
        let (program, _) = resolve("unit f() { 1; }");
        assert_eq!(body_type(&program), Type::Unit);
    }

    #[test]
    fn test_call_takes_return_type() {
        let (program, diagnostics) = resolve("bool g() { true }\nint f() { g() }");
        assert!(diagnostics.is_empty());
        assert_eq!(program.functions[1].body.expr_type, Type::Boolean);
    }

    #[test]
    fn test_unbound_identifier_is_undefined() {
        let (program, diagnostics) = resolve("int f() { missing(1) }");
        assert_eq!(diagnostics.count_of(DiagnosticKind::UnresolvedType), 1);
        assert_eq!(body_type(&program), Type::Undefined);
    }

    #[test]
    fn test_unknown_annotations_are_reported() {
        let (_, diagnostics) = resolve("extrn char getc(file f)\nint f(long a) { let b: short = 1; 0 }");
        let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["unknown type char", "unknown type file", "unknown type long", "unknown type short"]
        );
    }

    #[test]
    fn test_condition_takes_then_type() {
        let (program, _) = resolve("int f() { if true 1 else \"no\" }");
        assert_eq!(body_type(&program), Type::Integer);
    }

    #[test]
    fn test_loop_and_bind_types() {
        let (program, diagnostics) =
            resolve("unit f() { let i: int = 0; while true { i = i + 1 }; }");
        assert!(diagnostics.is_empty());

        match &program.functions[0].body.kind {
            ExpressionKind::Block { body, .. } => {
                assert_eq!(body[0].expr_type, Type::Integer);
                assert_eq!(body[1].expr_type, Type::Unit);
            }
            _ => panic!("Expected block body"),
        }
    }
}
