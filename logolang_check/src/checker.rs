use crate::builtin;
use crate::errors::{SemanticError, SemanticErrorKind};
use crate::symbols::{canonical, Analysis, Callee, ProcedureInfo};
use logolang_syntax::{
    BlockNode, ExprNode, ProcedureNode, ProgramNode, Source, StatementNode, Token,
};
use tracing::{debug, trace};

/// Validate a parsed program and build its [`Analysis`]. Stops at the first
/// error; a program that fails here never reaches code generation.
pub fn check(source: &Source, program: &ProgramNode) -> Result<Analysis, SemanticError> {
    let mut analysis = Analysis::default();

    for procedure in &program.procedures {
        register_procedure(source, procedure, &mut analysis)?;
    }
    collect_globals(&program.main, &mut analysis);

    for procedure in &program.procedures {
        check_calls_block(&procedure.body, &analysis)?;
    }
    check_calls_block(&program.main, &analysis)?;

    for procedure in &program.procedures {
        let name = canonical(&procedure.name.value);
        let scope = analysis.procedures.get(&name);
        check_vars_block(&procedure.body, scope, &analysis)?;
    }
    check_vars_block(&program.main, None, &analysis)?;

    debug!(
        procedures = analysis.procedures.len(),
        globals = analysis.globals.len(),
        "checked program"
    );
    Ok(analysis)
}

fn register_procedure(
    source: &Source,
    procedure: &ProcedureNode,
    analysis: &mut Analysis,
) -> Result<(), SemanticError> {
    let name = canonical(&procedure.name.value);

    if builtin::lookup(&name).is_some() {
        return Err(SemanticErrorKind::DuplicateProcedure {
            name: procedure.name.value.clone(),
            first: None,
        }
        .pos(procedure.name.pos));
    }
    if let Some(first) = analysis.procedures.get(&name) {
        return Err(SemanticErrorKind::DuplicateProcedure {
            name: procedure.name.value.clone(),
            first: Some(source.location(first.pos).to_string()),
        }
        .pos(procedure.name.pos));
    }

    trace!(name = %name, params = procedure.params.len(), "registered procedure");
    analysis.procedures.insert(
        name.clone(),
        ProcedureInfo {
            name,
            params: procedure.params.iter().map(|p| canonical(&p.value)).collect(),
            pos: procedure.name.pos,
        },
    );
    Ok(())
}

/// Every MAKE outside a procedure defines a global, wherever it sits in the
/// top-level statement tree. Insertion order is first-assignment order.
fn collect_globals(block: &BlockNode, analysis: &mut Analysis) {
    for statement in &block.statements {
        match statement {
            StatementNode::Make(node) => {
                analysis.globals.insert(canonical(&node.name.value));
            }
            StatementNode::Repeat(node) => collect_globals(&node.body, analysis),
            StatementNode::If(node) => collect_globals(&node.body, analysis),
            StatementNode::IfElse(node) => {
                collect_globals(&node.then_body, analysis);
                collect_globals(&node.else_body, analysis);
            }
            StatementNode::Call(_) => {}
        }
    }
}

fn check_calls_block(block: &BlockNode, analysis: &Analysis) -> Result<(), SemanticError> {
    for statement in &block.statements {
        check_calls_statement(statement, analysis)?;
    }
    Ok(())
}

fn check_calls_statement(
    statement: &StatementNode,
    analysis: &Analysis,
) -> Result<(), SemanticError> {
    match statement {
        StatementNode::Repeat(node) => check_calls_block(&node.body, analysis),
        StatementNode::If(node) => check_calls_block(&node.body, analysis),
        StatementNode::IfElse(node) => {
            check_calls_block(&node.then_body, analysis)?;
            check_calls_block(&node.else_body, analysis)
        }
        StatementNode::Make(_) => Ok(()),
        StatementNode::Call(node) => {
            let found = node.args.len();
            let expected = match analysis.resolve(&node.target.value) {
                Some(Callee::Builtin(builtin)) => builtin.arity,
                Some(Callee::Procedure(info)) => info.params.len(),
                None => {
                    return Err(SemanticErrorKind::UndefinedProcedure {
                        name: node.target.value.clone(),
                    }
                    .pos(node.target.pos));
                }
            };
            if found != expected {
                return Err(SemanticErrorKind::ArityMismatch {
                    name: node.target.value.clone(),
                    expected,
                    found,
                }
                .pos(node.target.pos));
            }
            Ok(())
        }
    }
}

fn check_vars_block(
    block: &BlockNode,
    scope: Option<&ProcedureInfo>,
    analysis: &Analysis,
) -> Result<(), SemanticError> {
    for statement in &block.statements {
        check_vars_statement(statement, scope, analysis)?;
    }
    Ok(())
}

fn check_vars_statement(
    statement: &StatementNode,
    scope: Option<&ProcedureInfo>,
    analysis: &Analysis,
) -> Result<(), SemanticError> {
    match statement {
        StatementNode::Repeat(node) => {
            check_vars_expr(&node.count, scope, analysis)?;
            check_vars_block(&node.body, scope, analysis)
        }
        StatementNode::If(node) => {
            check_vars_expr(&node.cond, scope, analysis)?;
            check_vars_block(&node.body, scope, analysis)
        }
        StatementNode::IfElse(node) => {
            check_vars_expr(&node.cond, scope, analysis)?;
            check_vars_block(&node.then_body, scope, analysis)?;
            check_vars_block(&node.else_body, scope, analysis)
        }
        StatementNode::Make(node) => {
            resolve_variable(&node.name, scope, analysis)?;
            check_vars_expr(&node.value, scope, analysis)
        }
        StatementNode::Call(node) => {
            for arg in &node.args {
                check_vars_expr(arg, scope, analysis)?;
            }
            Ok(())
        }
    }
}

fn check_vars_expr(
    expr: &ExprNode,
    scope: Option<&ProcedureInfo>,
    analysis: &Analysis,
) -> Result<(), SemanticError> {
    match expr {
        ExprNode::Number(_) | ExprNode::Word(_) => Ok(()),
        ExprNode::Variable(token) => resolve_variable(token, scope, analysis),
        ExprNode::Binary(node) => {
            check_vars_expr(&node.a, scope, analysis)?;
            check_vars_expr(&node.b, scope, analysis)
        }
    }
}

/// A name resolves against the enclosing procedure's parameters first, then
/// the globals; at top level, against the globals only. Parameters of other
/// procedures are never visible.
fn resolve_variable(
    token: &Token,
    scope: Option<&ProcedureInfo>,
    analysis: &Analysis,
) -> Result<(), SemanticError> {
    let name = canonical(&token.value);
    let in_params = scope.is_some_and(|info| info.params.contains(&name));
    if in_params || analysis.globals.contains(&name) {
        Ok(())
    } else {
        Err(SemanticErrorKind::UndefinedVariable {
            name: token.value.clone(),
        }
        .pos(token.pos))
    }
}
