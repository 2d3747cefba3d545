use logolang_syntax::Pos;
use std::fmt::Display;

#[derive(Debug)]
pub struct SemanticError {
    pub pos: Pos,
    pub kind: SemanticErrorKind,
}

#[derive(Debug)]
pub enum SemanticErrorKind {
    /// `first` is the location of the earlier declaration, or None when the
    /// name belongs to a builtin command.
    DuplicateProcedure {
        name: String,
        first: Option<String>,
    },
    UndefinedProcedure {
        name: String,
    },
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    UndefinedVariable {
        name: String,
    },
}

impl SemanticErrorKind {
    pub fn pos(self, pos: Pos) -> SemanticError {
        SemanticError { pos, kind: self }
    }
}

impl Display for SemanticErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateProcedure {
                name,
                first: Some(first),
            } => {
                write!(f, "Procedure {name} is redeclared. First declared at {first}")
            }
            Self::DuplicateProcedure { name, first: None } => {
                write!(f, "Procedure {name} redeclares a builtin command")
            }
            Self::UndefinedProcedure { name } => write!(f, "Procedure {name} is not defined"),
            Self::ArityMismatch {
                name,
                expected,
                found,
            } => {
                write!(f, "{name} expects {expected} arguments, but found {found}")
            }
            Self::UndefinedVariable { name } => write!(f, "Variable {name} is not defined"),
        }
    }
}

impl Display for SemanticError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.kind.fmt(f)
    }
}
