mod builtin;
mod checker;
mod errors;
mod symbols;

pub use builtin::{lookup, Builtin, BUILTINS};
pub use checker::check;
pub use errors::*;
pub use symbols::{canonical, Analysis, Callee, ProcedureInfo};
