use crate::ast::{
    BinaryExprNode, BlockNode, CallNode, ExprNode, IfElseNode, IfNode, MakeNode, ProcedureNode,
    ProgramNode, RepeatNode, StatementNode,
};
use crate::error::{unexpected, SyntaxError};
use crate::scanner::scan;
use crate::token::{Pos, Source, Token, TokenKind};
use std::collections::VecDeque;
use tracing::debug;

pub fn parse(source: &Source) -> Result<ProgramNode, SyntaxError> {
    let tokens = scan(source)?;
    let parser = Parser::new(tokens);
    let program = parser.parse_program()?;
    debug!(
        procedures = program.procedures.len(),
        statements = program.main.statements.len(),
        "parsed program"
    );
    Ok(program)
}

struct Parser {
    tokens: VecDeque<Token>,
    last_offset: Pos,
}

/// Token kinds that can begin an expression. A bare identifier cannot, so an
/// argument list always ends at the next command.
const STARTS_EXPR: &[TokenKind] = &[
    TokenKind::Number,
    TokenKind::Word,
    TokenKind::Variable,
    TokenKind::OpenBrac,
    TokenKind::Sub,
    TokenKind::Add,
];

/// Binary operators from the loosest to the tightest tier; every tier is
/// left-associative.
const BINOP_PRECEDENCE: &[&[TokenKind]] = &[
    &[TokenKind::Eq, TokenKind::Lt, TokenKind::Gt],
    &[TokenKind::Add, TokenKind::Sub],
    &[TokenKind::Mul, TokenKind::Div],
];

impl Parser {
    fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
            last_offset: Pos::default(),
        }
    }

    fn parse_program(mut self) -> Result<ProgramNode, SyntaxError> {
        let mut procedures = Vec::default();
        let mut statements = Vec::default();

        loop {
            match self.kind() {
                TokenKind::Eof => break,
                TokenKind::To => procedures.push(self.parse_procedure()?),
                _ => statements.push(self.parse_statement()?),
            }
        }

        Ok(ProgramNode {
            procedures,
            main: BlockNode { statements },
        })
    }

    fn parse_procedure(&mut self) -> Result<ProcedureNode, SyntaxError> {
        self.take(TokenKind::To)?;
        let name = self.take(TokenKind::Ident)?;

        let mut params = Vec::default();
        while let Some(param) = self.take_if(TokenKind::Variable) {
            params.push(param);
        }

        let mut statements = Vec::default();
        while self.kind() != TokenKind::End && self.kind() != TokenKind::Eof {
            statements.push(self.parse_statement()?);
        }
        self.take(TokenKind::End)?;

        Ok(ProcedureNode {
            name,
            params,
            body: BlockNode { statements },
        })
    }

    fn parse_statement(&mut self) -> Result<StatementNode, SyntaxError> {
        match self.kind() {
            TokenKind::Repeat => Ok(StatementNode::Repeat(self.parse_repeat()?)),
            TokenKind::If => Ok(StatementNode::If(self.parse_if()?)),
            TokenKind::IfElse => Ok(StatementNode::IfElse(self.parse_ifelse()?)),
            TokenKind::Make => Ok(StatementNode::Make(self.parse_make()?)),
            TokenKind::Ident => Ok(StatementNode::Call(self.parse_call()?)),
            _ => {
                let token = self.token();
                Err(unexpected("statement", token.kind).pos(token.pos))
            }
        }
    }

    fn parse_repeat(&mut self) -> Result<RepeatNode, SyntaxError> {
        self.take(TokenKind::Repeat)?;
        let count = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(RepeatNode { count, body })
    }

    fn parse_if(&mut self) -> Result<IfNode, SyntaxError> {
        self.take(TokenKind::If)?;
        let cond = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(IfNode { cond, body })
    }

    fn parse_ifelse(&mut self) -> Result<IfElseNode, SyntaxError> {
        self.take(TokenKind::IfElse)?;
        let cond = self.parse_expr()?;
        let then_body = self.parse_block()?;
        let else_body = self.parse_block()?;
        Ok(IfElseNode {
            cond,
            then_body,
            else_body,
        })
    }

    fn parse_make(&mut self) -> Result<MakeNode, SyntaxError> {
        self.take(TokenKind::Make)?;
        let name = self.take(TokenKind::Word)?;
        let value = self.parse_expr()?;
        Ok(MakeNode { name, value })
    }

    fn parse_call(&mut self) -> Result<CallNode, SyntaxError> {
        let target = self.take(TokenKind::Ident)?;

        let mut args = Vec::default();
        while STARTS_EXPR.contains(&self.kind()) {
            args.push(self.parse_expr()?);
        }

        Ok(CallNode { target, args })
    }

    fn parse_block(&mut self) -> Result<BlockNode, SyntaxError> {
        self.take(TokenKind::OpenSquare)?;

        let mut statements = Vec::default();
        while self.kind() != TokenKind::CloseSquare && self.kind() != TokenKind::Eof {
            statements.push(self.parse_statement()?);
        }
        self.take(TokenKind::CloseSquare)?;

        Ok(BlockNode { statements })
    }

    fn parse_expr(&mut self) -> Result<ExprNode, SyntaxError> {
        self.parse_binary_expr(0)
    }

    fn parse_binary_expr(&mut self, tier: usize) -> Result<ExprNode, SyntaxError> {
        let Some(ops) = BINOP_PRECEDENCE.get(tier) else {
            return self.parse_unary_expr();
        };

        let mut result = self.parse_binary_expr(tier + 1)?;
        while ops.contains(&self.kind()) {
            let op = self.advance();
            let b = self.parse_binary_expr(tier + 1)?;
            result = ExprNode::Binary(BinaryExprNode {
                op,
                a: Box::new(result),
                b: Box::new(b),
            });
        }

        Ok(result)
    }

    fn parse_unary_expr(&mut self) -> Result<ExprNode, SyntaxError> {
        if let Some(op) = self.take_if(TokenKind::Sub) {
            // -x desugars to (-1) * x
            let value = self.parse_unary_expr()?;
            let minus_one = Token {
                kind: TokenKind::Number,
                value: String::from("-1"),
                pos: op.pos,
            };
            let mul = Token {
                kind: TokenKind::Mul,
                value: String::from("*"),
                pos: op.pos,
            };
            return Ok(ExprNode::Binary(BinaryExprNode {
                op: mul,
                a: Box::new(ExprNode::Number(minus_one)),
                b: Box::new(value),
            }));
        }
        if self.take_if(TokenKind::Add).is_some() {
            return self.parse_unary_expr();
        }
        self.parse_primary_expr()
    }

    fn parse_primary_expr(&mut self) -> Result<ExprNode, SyntaxError> {
        match self.kind() {
            TokenKind::Number => Ok(ExprNode::Number(self.advance())),
            TokenKind::Word => Ok(ExprNode::Word(self.advance())),
            TokenKind::Variable => Ok(ExprNode::Variable(self.advance())),
            TokenKind::OpenBrac => {
                self.advance();
                let expr = self.parse_expr()?;
                self.take(TokenKind::CloseBrac)?;
                Ok(expr)
            }
            _ => {
                let token = self.token();
                Err(unexpected("expression", token.kind).pos(token.pos))
            }
        }
    }

    fn token(&self) -> Token {
        if let Some(token) = self.tokens.front() {
            token.clone()
        } else {
            Token {
                kind: TokenKind::Eof,
                value: String::default(),
                pos: self.last_offset,
            }
        }
    }

    fn kind(&self) -> TokenKind {
        self.tokens
            .front()
            .map(|token| token.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let Some(token) = self.tokens.pop_front() else {
            return Token {
                kind: TokenKind::Eof,
                value: String::default(),
                pos: self.last_offset,
            };
        };
        // Variable and word lexemes carry a sigil the value does not.
        let len = token.value.len()
            + match token.kind {
                TokenKind::Variable | TokenKind::Word => 1,
                _ => 0,
            };
        self.last_offset = token.pos.with_offset(len);
        token
    }

    fn take(&mut self, kind: TokenKind) -> Result<Token, SyntaxError> {
        let token = self.advance();
        if token.kind == kind {
            Ok(token)
        } else {
            Err(unexpected(kind, token.kind).pos(token.pos))
        }
    }

    fn take_if(&mut self, kind: TokenKind) -> Option<Token> {
        if self.kind() == kind {
            Some(self.advance())
        } else {
            None
        }
    }
}
