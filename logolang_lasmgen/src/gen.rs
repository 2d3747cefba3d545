use logolang_check::{canonical, Analysis, Callee, ProcedureInfo};
use logolang_syntax::{
    BlockNode, CallNode, ExprNode, ProcedureNode, ProgramNode, StatementNode, TokenKind,
};
use tracing::debug;

/// Emit LASM text for a checked program. Output is deterministic: the label
/// counter lives in the generator, every table is insertion-ordered, and no
/// expression is folded.
pub fn generate(program: &ProgramNode, analysis: &Analysis) -> String {
    let generator = Generator {
        analysis,
        lines: Vec::default(),
        next_label: 0,
        uses_drawing: false,
    };
    generator.run(program)
}

struct Generator<'a> {
    analysis: &'a Analysis,
    lines: Vec<String>,
    next_label: usize,
    uses_drawing: bool,
}

impl<'a> Generator<'a> {
    fn run(mut self, program: &ProgramNode) -> String {
        self.lines.push(String::from(".CODE"));
        for procedure in &program.procedures {
            self.lines.push(String::default());
            self.gen_procedure(procedure);
        }

        self.lines.push(String::default());
        self.emit_label("__main__");
        for statement in &program.main.statements {
            self.gen_statement(None, statement);
        }
        self.emit("HALT");

        let mut output = vec![String::from(".START __main__")];
        if self.uses_drawing {
            output.push(String::default());
            output.push(String::from(".INIT 200 200 400 400"));
        }
        if !self.analysis.globals.is_empty() {
            output.push(String::default());
            output.push(String::from(".DATA"));
            for name in &self.analysis.globals {
                output.push(format!("  {name} 0"));
            }
        }
        output.push(String::default());
        output.append(&mut self.lines);

        debug!(
            lines = output.len(),
            labels = self.next_label,
            "generated LASM"
        );

        let mut text = output.join("\n");
        text.push('\n');
        text
    }

    fn gen_procedure(&mut self, node: &ProcedureNode) {
        let name = canonical(&node.name.value);
        let Some(info) = self.analysis.procedures.get(&name) else {
            unreachable!("procedures are registered before code generation");
        };

        self.emit_label(&info.name);
        // The caller pushed left to right, so the last parameter is on top.
        for param in info.params.iter().rev() {
            self.emit(&format!("STOR {}.{param}", info.name));
        }
        self.gen_block(Some(info), &node.body);
        self.emit("RET");
    }

    fn gen_block(&mut self, scope: Option<&'a ProcedureInfo>, block: &BlockNode) {
        for statement in &block.statements {
            self.gen_statement(scope, statement);
        }
    }

    fn gen_statement(&mut self, scope: Option<&'a ProcedureInfo>, statement: &StatementNode) {
        match statement {
            StatementNode::Repeat(node) => {
                self.gen_expr(scope, &node.count);
                let head = self.fresh_label();
                let exit = self.fresh_label();
                self.emit_label(&head);
                self.emit("DUP");
                self.emit(&format!("JZ {exit}"));
                self.gen_block(scope, &node.body);
                self.emit("DEC");
                self.emit(&format!("JMP {head}"));
                self.emit_label(&exit);
                self.emit("POP");
            }
            StatementNode::If(node) => {
                self.gen_expr(scope, &node.cond);
                let end = self.fresh_label();
                self.emit(&format!("JZ {end}"));
                self.gen_block(scope, &node.body);
                self.emit_label(&end);
            }
            StatementNode::IfElse(node) => {
                self.gen_expr(scope, &node.cond);
                let otherwise = self.fresh_label();
                let end = self.fresh_label();
                self.emit(&format!("JZ {otherwise}"));
                self.gen_block(scope, &node.then_body);
                self.emit(&format!("JMP {end}"));
                self.emit_label(&otherwise);
                self.gen_block(scope, &node.else_body);
                self.emit_label(&end);
            }
            StatementNode::Make(node) => {
                self.gen_expr(scope, &node.value);
                let slot = self.slot(scope, &node.name.value);
                self.emit(&format!("STOR {slot}"));
            }
            StatementNode::Call(node) => self.gen_call(scope, node),
        }
    }

    fn gen_call(&mut self, scope: Option<&'a ProcedureInfo>, node: &CallNode) {
        for arg in &node.args {
            self.gen_expr(scope, arg);
        }
        match self.analysis.resolve(&node.target.value) {
            Some(Callee::Builtin(builtin)) => {
                if builtin.drawing {
                    self.uses_drawing = true;
                }
                self.emit(builtin.opcode);
            }
            Some(Callee::Procedure(info)) => {
                self.emit(&format!("CALL {} {}", info.name, node.args.len()));
            }
            None => unreachable!("call targets are resolved during semantic analysis"),
        }
    }

    /// Postfix order: left operand, right operand, operator opcode.
    fn gen_expr(&mut self, scope: Option<&'a ProcedureInfo>, expr: &ExprNode) {
        match expr {
            ExprNode::Number(token) => self.emit(&format!("PUSH {}", token.value)),
            ExprNode::Word(token) => self.emit(&format!("PUSH \"{}", token.value)),
            ExprNode::Variable(token) => {
                let slot = self.slot(scope, &token.value);
                self.emit(&format!("LOAD {slot}"));
            }
            ExprNode::Binary(node) => {
                self.gen_expr(scope, &node.a);
                self.gen_expr(scope, &node.b);
                let opcode = match node.op.kind {
                    TokenKind::Add => "ADD",
                    TokenKind::Sub => "SUB",
                    TokenKind::Mul => "MUL",
                    TokenKind::Div => "DIV",
                    TokenKind::Eq => "EQ",
                    TokenKind::Lt => "LT",
                    TokenKind::Gt => "GT",
                    _ => unreachable!("the parser only builds binary operators"),
                };
                self.emit(opcode);
            }
        }
    }

    fn slot(&self, scope: Option<&ProcedureInfo>, name: &str) -> String {
        let canonical = canonical(name);
        if let Some(info) = scope {
            if info.params.contains(&canonical) {
                return format!("{}.{canonical}", info.name);
            }
        }
        canonical
    }

    fn fresh_label(&mut self) -> String {
        let label = format!("_L{}", self.next_label);
        self.next_label += 1;
        label
    }

    fn emit(&mut self, instr: &str) {
        self.lines.push(format!("  {instr}"));
    }

    fn emit_label(&mut self, name: &str) {
        self.lines.push(format!("{name}:"));
    }
}
