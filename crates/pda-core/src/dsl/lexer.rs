//! Hand-rolled lexer for the four-block statement grammar.
//!
//! Produces raw `NAME(arg, arg, ...)` blocks with 1-based source positions.
//! The lexer enforces only the character-level grammar: identifier charset,
//! block shape, and the rule that newlines appear only between top-level
//! blocks. Structural and semantic judgments belong to the validator.

use super::error::{ValidationError, ValidationErrorCode};

/// A single argument inside a block's parentheses.
///
/// Empty values are representable; whether an empty argument is a syntax
/// error or a missing-field error depends on the block, so the validator
/// decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct RawArg {
    /// Verbatim argument text.
    pub value: String,
    /// Line of the argument's first character (or of the separator for an
    /// empty argument).
    pub line: u32,
    /// Column of the argument's first character.
    pub column: u32,
}

/// A raw `NAME(...)` block as it appeared in the statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct RawBlock {
    /// Block keyword, e.g. `SUBJECT`.
    pub name: String,
    /// Arguments in source order.
    pub args: Vec<RawArg>,
    /// Line of the block keyword.
    pub line: u32,
    /// Column of the block keyword.
    pub column: u32,
}

/// Returns true for characters permitted inside identifiers and actions.
///
/// The action charset is narrower (no `/`); the validator enforces that
/// per-block.
const fn is_arg_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '/' | '.')
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> ValidationError {
        ValidationError::at(
            ValidationErrorCode::SyntaxError,
            message,
            self.line,
            self.column,
        )
    }

    /// Skips spaces and tabs. Newlines are consumed only when `at_top_level`
    /// is true; inside parentheses a newline is an offense.
    fn skip_blank(&mut self, at_top_level: bool) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' => {
                    self.bump();
                },
                '\n' | '\r' if at_top_level => {
                    self.bump();
                },
                _ => break,
            }
        }
    }

    fn lex_block(&mut self) -> Result<RawBlock, ValidationError> {
        let (name_line, name_column) = (self.line, self.column);

        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_uppercase() {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        if name.is_empty() {
            return Err(self.error(format!(
                "expected block keyword, found {:?}",
                self.peek().map_or_else(String::new, |c| c.to_string())
            )));
        }

        self.skip_blank(false);
        match self.peek() {
            Some('(') => {
                self.bump();
            },
            Some('\n' | '\r') => {
                return Err(self.error("newlines are permitted only between top-level blocks"));
            },
            _ => return Err(self.error(format!("expected '(' after {name}"))),
        }

        let mut args = Vec::new();
        loop {
            self.skip_blank(false);
            let (arg_line, arg_column) = (self.line, self.column);
            let mut value = String::new();
            while let Some(c) = self.peek() {
                if is_arg_char(c) {
                    value.push(c);
                    self.bump();
                } else {
                    break;
                }
            }
            args.push(RawArg {
                value,
                line: arg_line,
                column: arg_column,
            });

            self.skip_blank(false);
            match self.peek() {
                Some(',') => {
                    self.bump();
                },
                Some(')') => {
                    self.bump();
                    break;
                },
                Some('\n' | '\r') => {
                    return Err(
                        self.error("newlines are permitted only between top-level blocks")
                    );
                },
                Some(c) => {
                    return Err(self.error(format!("unexpected character {c:?} in argument list")));
                },
                None => return Err(self.error("unterminated argument list")),
            }
        }

        Ok(RawBlock {
            name,
            args,
            line: name_line,
            column: name_column,
        })
    }
}

/// Lexes a statement into raw blocks.
///
/// The first offending character aborts the lex with a `SYNTAX_ERROR`
/// carrying its line and column.
pub(super) fn lex(text: &str) -> Result<Vec<RawBlock>, ValidationError> {
    let mut lexer = Lexer::new(text);
    let mut blocks = Vec::new();

    loop {
        lexer.skip_blank(true);
        if lexer.peek().is_none() {
            break;
        }
        blocks.push(lexer.lex_block()?);
    }

    if blocks.is_empty() {
        return Err(ValidationError::at(
            ValidationErrorCode::SyntaxError,
            "empty or whitespace-only statement",
            1,
            1,
        ));
    }

    Ok(blocks)
}
