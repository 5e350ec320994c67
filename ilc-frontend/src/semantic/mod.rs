//! Semantic Analysis for ilang
//!
//! Three passes over one AST, run in order: name resolution binds every
//! identifier to its declaration, type resolution assigns every expression a
//! type, and type checking validates those types. Each pass accumulates
//! diagnostics instead of stopping at the first problem.

pub mod name_resolver;
pub mod type_checker;
pub mod type_resolver;

use crate::ast::Program;
use ilc_common::Diagnostics;

pub use name_resolver::resolve_names;
pub use type_checker::check_types;
pub use type_resolver::{literal_type, resolve_types};

/// Run all three passes and combine their diagnostics in pass order.
///
/// Later passes run even when earlier ones reported problems; unbound names
/// simply resolve to `Type::Undefined`.
pub fn analyze(program: &mut Program) -> Diagnostics {
    let mut diagnostics = resolve_names(program);
    diagnostics.extend(resolve_types(program));
    diagnostics.extend(check_types(program));
    diagnostics
}
