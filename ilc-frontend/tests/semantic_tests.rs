//! End-to-end checks of the semantic passes on small programs

use ilc_common::{DiagnosticKind, Diagnostics, MismatchReason, Type};
use ilc_frontend::{
    analyze, resolve_names, resolve_types, Expression, ExpressionKind, Frontend, Program,
};
use pretty_assertions::assert_eq;

fn parse(source: &str) -> Program {
    Frontend::parse_source(source, "test.il").unwrap()
}

fn analyzed(source: &str) -> (Program, Diagnostics) {
    let mut program = parse(source);
    let diagnostics = analyze(&mut program);
    (program, diagnostics)
}

fn kinds(diagnostics: &Diagnostics) -> Vec<DiagnosticKind> {
    diagnostics.iter().map(|d| d.kind).collect()
}

/// Visit every expression of the tree in pre-order
fn walk<'a>(expr: &'a Expression, visit: &mut dyn FnMut(&'a Expression)) {
    visit(expr);
    match &expr.kind {
        ExpressionKind::Literal { .. } | ExpressionKind::Identifier(_) | ExpressionKind::Break => {}
        ExpressionKind::Call { arguments, .. } => {
            for argument in arguments {
                walk(argument, visit);
            }
        }
        ExpressionKind::Block { body, implicit_return } => {
            for statement in body {
                walk(statement, visit);
            }
            if let Some(implicit_return) = implicit_return {
                walk(implicit_return, visit);
            }
        }
        ExpressionKind::Bind { value, .. } | ExpressionKind::Assignment { value, .. } => walk(value, visit),
        ExpressionKind::Binary { left, right, .. } => {
            walk(left, visit);
            walk(right, visit);
        }
        ExpressionKind::Unary { operand, .. } => walk(operand, visit),
        ExpressionKind::Separated(inner) | ExpressionKind::Return(inner) => walk(inner, visit),
        ExpressionKind::Condition {
            condition,
            then_branch,
            else_branch,
        } => {
            walk(condition, visit);
            walk(then_branch, visit);
            if let Some(else_branch) = else_branch {
                walk(else_branch, visit);
            }
        }
        ExpressionKind::Loop { condition, body } => {
            walk(condition, visit);
            walk(body, visit);
        }
    }
}

// comparisons take their left operand's type, so conditions come from a
// bool-returning external
const FIBONACCI: &str = r#"
extrn int printf(string format, ...)
extrn bool below(int a, int b)

int fib(int n) {
    if below(n, 2) n else fib(n - 1) + fib(n - 2)
}

int main() {
    let i: int = 0;
    while below(i, 10) {
        printf("%d\n", fib(i));
        i = i + 1
    };
    0
}
"#;

#[test]
fn test_valid_program_has_no_diagnostics() {
    let (_, diagnostics) = analyzed(FIBONACCI);
    assert_eq!(diagnostics.summary(), "No errors");
}

#[test]
fn test_name_resolution_is_idempotent() {
    let mut program = parse(FIBONACCI);
    assert!(resolve_names(&mut program).is_empty());
    let first = program.clone();

    assert!(resolve_names(&mut program).is_empty());
    assert_eq!(program, first);
}

#[test]
fn test_identifier_type_matches_its_declaration() {
    let (program, diagnostics) = analyzed(FIBONACCI);
    assert!(diagnostics.is_empty());

    let mut checked = 0;
    for function in &program.functions {
        walk(&function.body, &mut |expr| {
            if let ExpressionKind::Identifier(identifier) = &expr.kind {
                let declaration = program.declaration(identifier.binding).unwrap();
                assert_eq!(expr.expr_type, declaration.ty, "type of {}", identifier.name);
                checked += 1;
            }
        });
    }
    assert!(checked > 0);
}

#[test]
fn test_duplicate_in_same_scope() {
    let (_, diagnostics) = analyzed("unit f() { let a: int = 1; let a: int = 2; }");
    assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::DuplicateDeclaration]);
    assert_eq!(diagnostics.iter().next().map(|d| d.location.column), Some(32));
}

#[test]
fn test_shadowing_in_nested_scope() {
    let (_, diagnostics) = analyzed("unit f() { let a: int = 1; { let a: int = 2; }; }");
    assert_eq!(kinds(&diagnostics), vec![]);
}

#[test]
fn test_undeclared_call_is_undefined() {
    let (program, diagnostics) = analyzed("unit f() { nowhere(1); }");
    assert_eq!(diagnostics.count_of(DiagnosticKind::UndeclaredIdentifier), 1);

    match &program.functions[0].body.kind {
        ExpressionKind::Block { body, .. } => assert_eq!(body[0].expr_type, Type::Undefined),
        _ => panic!("Expected block body"),
    }
}

#[test]
fn test_operator_applicability() {
    let (_, diagnostics) = analyzed("bool f() { true + false }");
    assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::OperatorNotApplicable]);

    let (program, diagnostics) = analyzed("int f() { 1 + 2 }");
    assert_eq!(kinds(&diagnostics), vec![]);
    assert_eq!(program.functions[0].body.expr_type, Type::Integer);
}

#[test]
fn test_comparison_takes_left_operand_type() {
    let (program, diagnostics) = analyzed("int main() { let b: int = 1 < 2; if 1 < 2 0 else 1 }");
    assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::ConditionNotBoolean]);

    match &program.functions[0].body.kind {
        ExpressionKind::Block { body, .. } => match &body[0].kind {
            ExpressionKind::Bind { value, .. } => assert_eq!(value.expr_type, Type::Integer),
            _ => panic!("Expected bind"),
        },
        _ => panic!("Expected block body"),
    }

    let (_, diagnostics) = analyzed("bool f(bool a) { if a == true a else false }");
    assert_eq!(kinds(&diagnostics), vec![]);
}

#[test]
fn test_branch_mismatch() {
    let (_, diagnostics) = analyzed("int f() { if true 1 else false }");
    assert_eq!(
        kinds(&diagnostics),
        vec![DiagnosticKind::TypeMismatch(MismatchReason::BranchMismatch)]
    );

    let (_, diagnostics) = analyzed("int f() { if true 1 else 2 }");
    assert_eq!(kinds(&diagnostics), vec![]);
}

#[test]
fn test_extra_argument() {
    let (_, diagnostics) = analyzed("int add(int a, int b) { a + b }\nint main() { add(1, 2, 3) }");
    assert_eq!(
        kinds(&diagnostics),
        vec![DiagnosticKind::ArgumentCountMismatch, DiagnosticKind::ArgumentTypeMismatch]
    );

    let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages[1], "unexpected argument 3 to add");
}

#[test]
fn test_mismatch_points_at_the_node() {
    let source = "unit f() {\n    let a: int = true;\n    a = \"text\";\n}";
    let (_, diagnostics) = analyzed(source);

    let positions: Vec<_> = diagnostics
        .iter()
        .map(|d| (d.kind, d.location.line, d.location.column))
        .collect();
    assert_eq!(
        positions,
        vec![
            (DiagnosticKind::TypeMismatch(MismatchReason::Bind), 2, 5),
            (DiagnosticKind::TypeMismatch(MismatchReason::Assignment), 3, 5),
        ]
    );
}

#[test]
fn test_types_resolve_after_name_errors() {
    let mut program = parse("int f() { let a: int = b; a }");
    let names = resolve_names(&mut program);
    let types = resolve_types(&mut program);

    assert_eq!(kinds(&names), vec![DiagnosticKind::UndeclaredIdentifier]);
    assert_eq!(kinds(&types), vec![DiagnosticKind::UnresolvedType]);
    assert_eq!(program.functions[0].body.expr_type, Type::Integer);
}

#[test]
fn test_diagnostics_display() {
    let (_, diagnostics) = analyzed("int f() { x }");
    assert_eq!(
        diagnostics.to_string(),
        "test.il:1:11: error: undeclared identifier x\n\
         test.il:1:11: error: cannot resolve type of x\n\
         test.il:1:5: error: function f returns int but its body has type undefined"
    );
}
