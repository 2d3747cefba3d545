use crate::error::SyntaxError;
use crate::error::SyntaxErrorKind;
use crate::token::{Pos, Source, Token, TokenKind};
use tracing::trace;

pub(crate) fn scan(source: &Source) -> Result<Vec<Token>, SyntaxError> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::default();
    while let Some(token) = scanner.scan()? {
        trace!(kind = %token.kind, value = %token.value, "scanned token");
        tokens.push(token);
    }
    Ok(tokens)
}

struct Scanner<'a> {
    text: &'a str,
    offset: usize,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a Source) -> Self {
        Self {
            text: &source.text,
            offset: 0,
        }
    }

    fn scan(&mut self) -> Result<Option<Token>, SyntaxError> {
        self.skip_ignored();
        if let Some(token) = self.scan_word().or_else(|| self.scan_number()) {
            return Ok(Some(token));
        }
        if let Some(token) = self.scan_variable()? {
            return Ok(Some(token));
        }
        if let Some(token) = self.scan_quoted_word()? {
            return Ok(Some(token));
        }
        self.scan_symbol()
    }

    /// Whitespace and `#` comments carry no structure and are dropped.
    fn skip_ignored(&mut self) {
        while let Some((c, _)) = self.peek() {
            if c.is_whitespace() {
                self.next();
            } else if c == '#' {
                while let Some((c, _)) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.next();
                }
            } else {
                break;
            }
        }
    }

    fn scan_word(&mut self) -> Option<Token> {
        let (c, pos) = self.next_if(char::is_alphabetic)?;

        let mut value = String::from(c);
        while let Some((c, _)) = self.next_if(char::is_alphanumeric) {
            value.push(c);
        }

        // Keywords match case-insensitively; everything else keeps its
        // spelling and is resolved case-insensitively later.
        let kind = match value.to_ascii_uppercase().as_str() {
            "TO" => TokenKind::To,
            "END" => TokenKind::End,
            "REPEAT" => TokenKind::Repeat,
            "IF" => TokenKind::If,
            "IFELSE" => TokenKind::IfElse,
            "MAKE" => TokenKind::Make,
            _ => TokenKind::Ident,
        };

        Some(Token { kind, value, pos })
    }

    fn scan_number(&mut self) -> Option<Token> {
        let (c, pos) = self.next_if(|c| c.is_ascii_digit())?;

        let mut value = String::from(c);
        while let Some((c, _)) = self.next_if(|c| c.is_ascii_digit()) {
            value.push(c);
        }
        if let Some((c, _)) = self.next_if(|c| c == '.') {
            value.push(c);
            while let Some((c, _)) = self.next_if(|c| c.is_ascii_digit()) {
                value.push(c);
            }
        }

        Some(Token {
            kind: TokenKind::Number,
            value,
            pos,
        })
    }

    fn scan_variable(&mut self) -> Result<Option<Token>, SyntaxError> {
        let Some((_, pos)) = self.next_if(|c| c == ':') else {
            return Ok(None);
        };
        let Some((c, _)) = self.next_if(char::is_alphabetic) else {
            return Err(SyntaxErrorKind::UnexpectedChar(':').pos(pos));
        };

        let mut value = String::from(c);
        while let Some((c, _)) = self.next_if(char::is_alphanumeric) {
            value.push(c);
        }

        Ok(Some(Token {
            kind: TokenKind::Variable,
            value,
            pos,
        }))
    }

    fn scan_quoted_word(&mut self) -> Result<Option<Token>, SyntaxError> {
        let Some((_, pos)) = self.next_if(|c| c == '"') else {
            return Ok(None);
        };
        let Some((c, _)) = self.next_if(char::is_alphabetic) else {
            return Err(SyntaxErrorKind::UnexpectedChar('"').pos(pos));
        };

        let mut value = String::from(c);
        while let Some((c, _)) = self.next_if(char::is_alphanumeric) {
            value.push(c);
        }

        Ok(Some(Token {
            kind: TokenKind::Word,
            value,
            pos,
        }))
    }

    fn scan_symbol(&mut self) -> Result<Option<Token>, SyntaxError> {
        let Some((c, pos)) = self.next() else {
            return Ok(None);
        };

        let kind = match c {
            '[' => TokenKind::OpenSquare,
            ']' => TokenKind::CloseSquare,
            '(' => TokenKind::OpenBrac,
            ')' => TokenKind::CloseBrac,
            '+' => TokenKind::Add,
            '-' => TokenKind::Sub,
            '*' => TokenKind::Mul,
            '/' => TokenKind::Div,
            '=' => TokenKind::Eq,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            _ => return Err(SyntaxErrorKind::UnexpectedChar(c).pos(pos)),
        };

        Ok(Some(Token {
            kind,
            value: c.to_string(),
            pos,
        }))
    }

    fn peek(&self) -> Option<(char, Pos)> {
        self.text[self.offset..]
            .chars()
            .next()
            .map(|c| (c, Pos::from(self.offset)))
    }

    fn next(&mut self) -> Option<(char, Pos)> {
        let (c, pos) = self.peek()?;
        self.offset += c.len_utf8();
        Some((c, pos))
    }

    fn next_if(&mut self, pred: impl Fn(char) -> bool) -> Option<(char, Pos)> {
        let (c, _) = self.peek()?;
        if pred(c) {
            self.next()
        } else {
            None
        }
    }
}
