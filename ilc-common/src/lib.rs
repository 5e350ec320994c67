//! ilang compiler - Common Types and Utilities
//!
//! This crate contains the pieces shared by every compiler phase: source
//! locations, the ilang type enumeration, scope chains and declaration
//! handles, semantic diagnostics and the top-level error type.

pub mod diagnostics;
pub mod error;
pub mod source_loc;
pub mod symbols;
pub mod types;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, MismatchReason};
pub use error::CompilerError;
pub use source_loc::SourceLocation;
pub use symbols::{DeclId, LocalId, ScopeChain};
pub use types::{LabelGenerator, Type};
