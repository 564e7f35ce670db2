//! Template tokenizer.
//!
//! Splits template source into literal text and directive tokens.
//! Directives are `{{ … }}` interpolations, `{% … %}` block tags and
//! `{# … #}` comments. A `-` adjacent to a delimiter (`{{-`, `-%}`, …)
//! strips all contiguous whitespace, including newlines, on that side
//! of the directive; comments are dropped at this stage.

use crate::ast::Span;
use crate::error::{TemplateError, TemplateResult};

/// A lexed template token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Text(String),
    Expr { inner: String, span: Span },
    Tag { inner: String, span: Span },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirectiveKind {
    Expr,
    Tag,
    Comment,
}

impl DirectiveKind {
    fn open_delimiter(&self) -> &'static str {
        match self {
            DirectiveKind::Expr => "{{",
            DirectiveKind::Tag => "{%",
            DirectiveKind::Comment => "{#",
        }
    }

    fn close_first(&self) -> char {
        match self {
            DirectiveKind::Expr => '}',
            DirectiveKind::Tag => '%',
            DirectiveKind::Comment => '#',
        }
    }
}

/// Tokenize template source.
pub fn tokenize(source: &str) -> TemplateResult<Vec<Token>> {
    Lexer::new(source).run()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn run(mut self) -> TemplateResult<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut text = String::new();
        let mut skip_whitespace = false;

        while self.pos < self.chars.len() {
            if let Some(kind) = self.directive_start() {
                let span = Span {
                    line: self.line,
                    column: self.column,
                };
                let (inner, trim_left, trim_right) = self.read_directive(kind, span)?;

                if trim_left {
                    text.truncate(text.trim_end().len());
                }
                if !text.is_empty() {
                    tokens.push(Token::Text(std::mem::take(&mut text)));
                }

                match kind {
                    DirectiveKind::Expr => tokens.push(Token::Expr { inner, span }),
                    DirectiveKind::Tag => tokens.push(Token::Tag { inner, span }),
                    DirectiveKind::Comment => {}
                }
                skip_whitespace = trim_right;
            } else {
                let c = self.bump();
                if skip_whitespace && c.is_whitespace() {
                    continue;
                }
                skip_whitespace = false;
                text.push(c);
            }
        }

        if !text.is_empty() {
            tokens.push(Token::Text(text));
        }
        Ok(tokens)
    }

    fn directive_start(&self) -> Option<DirectiveKind> {
        if self.peek() != Some('{') {
            return None;
        }
        match self.peek_at(1) {
            Some('{') => Some(DirectiveKind::Expr),
            Some('%') => Some(DirectiveKind::Tag),
            Some('#') => Some(DirectiveKind::Comment),
            _ => None,
        }
    }

    /// Consume one directive. Returns its trimmed inner content and the
    /// left/right whitespace-trim flags.
    fn read_directive(
        &mut self,
        kind: DirectiveKind,
        span: Span,
    ) -> TemplateResult<(String, bool, bool)> {
        self.bump();
        self.bump();

        let mut trim_left = false;
        if self.peek() == Some('-') {
            trim_left = true;
            self.bump();
        }

        let close_first = kind.close_first();
        let mut inner = String::new();
        let mut in_string: Option<char> = None;

        loop {
            let c = match self.peek() {
                Some(c) => c,
                None => {
                    return Err(TemplateError::Syntax {
                        message: format!("unclosed `{}` delimiter", kind.open_delimiter()),
                        line: span.line,
                        column: span.column,
                    });
                }
            };

            if let Some(quote) = in_string {
                if c == '\\' {
                    inner.push(self.bump());
                    if self.peek().is_some() {
                        inner.push(self.bump());
                    }
                    continue;
                }
                if c == quote {
                    in_string = None;
                }
                inner.push(self.bump());
                continue;
            }

            if kind != DirectiveKind::Comment && (c == '"' || c == '\'') {
                in_string = Some(c);
                inner.push(self.bump());
                continue;
            }

            if c == '-' && self.peek_at(1) == Some(close_first) && self.peek_at(2) == Some('}') {
                self.bump();
                self.bump();
                self.bump();
                return Ok((inner.trim().to_string(), trim_left, true));
            }
            if c == close_first && self.peek_at(1) == Some('}') {
                self.bump();
                self.bump();
                return Ok((inner.trim().to_string(), trim_left, false));
            }

            inner.push(self.bump());
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> char {
        let c = self.chars[self.pos];
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }
}
