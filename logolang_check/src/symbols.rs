use crate::builtin::{self, Builtin};
use indexmap::{IndexMap, IndexSet};
use logolang_syntax::Pos;

/// Canonical form of a user name: resolution and emission are
/// case-insensitive, error messages keep the original spelling.
pub fn canonical(name: &str) -> String {
    name.to_ascii_uppercase()
}

#[derive(Debug)]
pub struct ProcedureInfo {
    pub name: String,
    /// Parameter names in declaration order; the order defines positional
    /// binding and the arity.
    pub params: Vec<String>,
    pub pos: Pos,
}

/// What the semantic pass learned about a program: the procedure table from
/// the registration pre-pass and the global variables in first-assignment
/// order. Code generation resolves names through the same table, so the two
/// passes cannot disagree.
#[derive(Debug, Default)]
pub struct Analysis {
    pub procedures: IndexMap<String, ProcedureInfo>,
    pub globals: IndexSet<String>,
}

pub enum Callee<'a> {
    Builtin(&'static Builtin),
    Procedure(&'a ProcedureInfo),
}

impl Analysis {
    /// Resolve a call target: builtins win over user procedures.
    pub fn resolve(&self, name: &str) -> Option<Callee<'_>> {
        let canonical = canonical(name);
        if let Some(builtin) = builtin::lookup(&canonical) {
            return Some(Callee::Builtin(builtin));
        }
        self.procedures.get(&canonical).map(Callee::Procedure)
    }
}
