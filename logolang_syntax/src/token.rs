use std::fmt::Display;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos(usize);

impl From<usize> for Pos {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl Pos {
    pub fn with_offset(&self, offset: usize) -> Self {
        Self(self.0 + offset)
    }
}

pub struct Location<'a> {
    path: &'a Path,
    line: usize,
    col: usize,
}

impl<'a> std::fmt::Display for Location<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = std::env::current_dir()
            .ok()
            .and_then(|cwd| self.path.strip_prefix(&cwd).ok())
            .unwrap_or(self.path)
            .to_string_lossy();

        write!(f, "{path}:{}:{}", self.line, self.col)
    }
}

/// A single compilation unit: the source text plus a newline index used to
/// resolve a [`Pos`] back to a line and column for diagnostics.
pub struct Source {
    path: PathBuf,
    pub text: String,
    lines: Vec<usize>,
}

impl Source {
    pub fn open(path: PathBuf) -> Result<Self, std::io::Error> {
        let text = read_to_string(&path)?;
        Ok(Self::new(path, text))
    }

    pub fn new(path: PathBuf, text: String) -> Self {
        let lines = text
            .char_indices()
            .filter(|(_, c)| *c == '\n')
            .map(|(i, _)| i)
            .collect();
        Self { path, text, lines }
    }

    pub fn location(&self, pos: Pos) -> Location {
        let offset = pos.0;
        let line = self.lines.partition_point(|x| *x < offset) + 1;

        let col = if line == 1 {
            offset + 1
        } else {
            offset - self.lines[line - 2]
        };

        Location {
            path: &self.path,
            line,
            col,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub pos: Pos,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    To,
    End,
    Repeat,
    If,
    IfElse,
    Make,
    Ident,
    Number,
    Word,
    Variable,
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Lt,
    Gt,
    OpenSquare,
    CloseSquare,
    OpenBrac,
    CloseBrac,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eof => write!(f, "EOF"),
            Self::To => write!(f, "'TO'"),
            Self::End => write!(f, "'END'"),
            Self::Repeat => write!(f, "'REPEAT'"),
            Self::If => write!(f, "'IF'"),
            Self::IfElse => write!(f, "'IFELSE'"),
            Self::Make => write!(f, "'MAKE'"),
            Self::Ident => write!(f, "IDENT"),
            Self::Number => write!(f, "NUMBER"),
            Self::Word => write!(f, "WORD"),
            Self::Variable => write!(f, "VARIABLE"),
            Self::Add => write!(f, "'+'"),
            Self::Sub => write!(f, "'-'"),
            Self::Mul => write!(f, "'*'"),
            Self::Div => write!(f, "'/'"),
            Self::Eq => write!(f, "'='"),
            Self::Lt => write!(f, "'<'"),
            Self::Gt => write!(f, "'>'"),
            Self::OpenSquare => write!(f, "'['"),
            Self::CloseSquare => write!(f, "']'"),
            Self::OpenBrac => write!(f, "'('"),
            Self::CloseBrac => write!(f, "')'"),
        }
    }
}
