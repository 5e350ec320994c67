//! Semantic diagnostics
//!
//! Name resolution, type resolution and type checking never stop at the first
//! problem. Each pass records every problem it finds into a `Diagnostics`
//! report and the driver refuses to generate code unless the combined report
//! is empty.

use crate::source_loc::SourceLocation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which pair of types disagreed in a `TypeMismatch`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MismatchReason {
    Bind,
    Return,
    Assignment,
    BinaryOperand,
    BranchMismatch,
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchReason::Bind => write!(f, "bind"),
            MismatchReason::Return => write!(f, "return"),
            MismatchReason::Assignment => write!(f, "assignment"),
            MismatchReason::BinaryOperand => write!(f, "binary operand"),
            MismatchReason::BranchMismatch => write!(f, "branch mismatch"),
        }
    }
}

/// Kinds of problems reported by the semantic passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    DuplicateDeclaration,
    UndeclaredIdentifier,
    UnresolvedType,
    TypeMismatch(MismatchReason),
    OperatorNotApplicable,
    ArgumentCountMismatch,
    ArgumentTypeMismatch,
    ConditionNotBoolean,
    BreakOutsideLoop,
    /// A call whose callee is bound to a variable or parameter
    NotCallable,
    /// A function name used where a variable is expected
    NotAValue,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::DuplicateDeclaration => write!(f, "duplicate declaration"),
            DiagnosticKind::UndeclaredIdentifier => write!(f, "undeclared identifier"),
            DiagnosticKind::UnresolvedType => write!(f, "unresolved type"),
            DiagnosticKind::TypeMismatch(reason) => write!(f, "type mismatch ({})", reason),
            DiagnosticKind::OperatorNotApplicable => write!(f, "operator not applicable"),
            DiagnosticKind::ArgumentCountMismatch => write!(f, "argument count mismatch"),
            DiagnosticKind::ArgumentTypeMismatch => write!(f, "argument type mismatch"),
            DiagnosticKind::ConditionNotBoolean => write!(f, "condition not boolean"),
            DiagnosticKind::BreakOutsideLoop => write!(f, "break outside loop"),
            DiagnosticKind::NotCallable => write!(f, "not callable"),
            DiagnosticKind::NotAValue => write!(f, "not a value"),
        }
    }
}

/// A diagnostic message with location and kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub location: SourceLocation,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: String, location: SourceLocation) -> Self {
        Self {
            kind,
            message,
            location,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: error: {}", self.location, self.message)?;

        for note in &self.notes {
            write!(f, "\n  note: {}", note)?;
        }

        Ok(())
    }
}

/// An ordered, combinable collection of diagnostics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic
    pub fn report(&mut self, kind: DiagnosticKind, message: String, location: SourceLocation) {
        self.push(Diagnostic::new(kind, message, location));
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Append every diagnostic of another report, keeping order
    pub fn extend(&mut self, other: Diagnostics) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    /// Number of diagnostics of the given kind
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    /// Print all diagnostics to stderr
    pub fn print_diagnostics(&self) {
        for diagnostic in &self.diagnostics {
            eprintln!("{}", diagnostic);
        }
    }

    /// Create a summary string
    pub fn summary(&self) -> String {
        match self.diagnostics.len() {
            0 => "No errors".to_string(),
            1 => "1 error".to_string(),
            n => format!("{} errors", n),
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}
