//! Template parser.
//!
//! Builds the node tree from the token stream and parses directive
//! expressions. Block structure errors (`UnterminatedBlock`) point at
//! the opening marker; expression errors point at the directive that
//! contains them.

use tracing::debug;

use crate::ast::{CmpOp, Cond, Expr, Literal, Node, PathExpr, Span};
use crate::error::{TemplateError, TemplateResult};
use crate::lexer::{self, Token};

/// A parsed template document.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub nodes: Vec<Node>,
}

impl Template {
    /// Parse template source into a document.
    pub fn parse(source: &str) -> TemplateResult<Self> {
        let tokens = lexer::tokenize(source)?;
        let mut parser = Parser { tokens, pos: 0 };
        let (nodes, _) = parser.parse_nodes(None, &[])?;
        debug!("Parsed template: {} top-level nodes", nodes.len());
        Ok(Self { nodes })
    }

    /// Descriptor paths this template references.
    pub fn referenced_paths(&self) -> Vec<String> {
        crate::ast::referenced_paths(&self.nodes)
    }
}

struct StopTag {
    word: String,
    rest: String,
    span: Span,
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn next_token(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Parse nodes until EOF or one of `stops` is encountered.
    ///
    /// `enclosing` names the block being parsed (with its opening span)
    /// so that EOF inside a block reports `UnterminatedBlock`.
    fn parse_nodes(
        &mut self,
        enclosing: Option<(&str, Span)>,
        stops: &[&str],
    ) -> TemplateResult<(Vec<Node>, Option<StopTag>)> {
        let mut nodes = Vec::new();

        while let Some(token) = self.next_token() {
            match token {
                Token::Text(text) => nodes.push(Node::Literal(text)),
                Token::Expr { inner, span } => {
                    nodes.push(Node::Interpolation(parse_path(&inner, span)?));
                }
                Token::Tag { inner, span } => {
                    let (word, rest) = split_tag(&inner);
                    match word {
                        "if" => nodes.push(self.parse_conditional(rest, span)?),
                        "for" => nodes.push(self.parse_loop(rest, span)?),
                        "elif" | "else" | "endif" | "endfor" => {
                            if stops.contains(&word) {
                                return Ok((
                                    nodes,
                                    Some(StopTag {
                                        word: word.to_string(),
                                        rest: rest.to_string(),
                                        span,
                                    }),
                                ));
                            }
                            let context = match enclosing {
                                Some((kind, _)) => format!("inside `{}` block", kind),
                                None => "with no open block".to_string(),
                            };
                            return Err(TemplateError::Syntax {
                                message: format!("unexpected `{}` {}", word, context),
                                line: span.line,
                                column: span.column,
                            });
                        }
                        other => {
                            return Err(TemplateError::Syntax {
                                message: format!("unknown directive `{}`", other),
                                line: span.line,
                                column: span.column,
                            });
                        }
                    }
                }
            }
        }

        match enclosing {
            Some((kind, span)) => Err(TemplateError::UnterminatedBlock {
                kind: kind.to_string(),
                line: span.line,
                column: span.column,
            }),
            None => Ok((nodes, None)),
        }
    }

    fn parse_conditional(&mut self, head: &str, span: Span) -> TemplateResult<Node> {
        let mut branches = Vec::new();
        let mut cond = parse_cond(head, span)?;

        loop {
            let (body, stop) =
                self.parse_nodes(Some(("if", span)), &["elif", "else", "endif"])?;
            let stop = match stop {
                Some(stop) => stop,
                None => {
                    return Err(TemplateError::UnterminatedBlock {
                        kind: "if".to_string(),
                        line: span.line,
                        column: span.column,
                    });
                }
            };
            branches.push((cond, body));

            match stop.word.as_str() {
                "elif" => {
                    cond = parse_cond(&stop.rest, stop.span)?;
                }
                "else" => {
                    let (else_body, _) = self.parse_nodes(Some(("if", span)), &["endif"])?;
                    return Ok(Node::Conditional {
                        branches,
                        else_body,
                        span,
                    });
                }
                _ => {
                    return Ok(Node::Conditional {
                        branches,
                        else_body: Vec::new(),
                        span,
                    });
                }
            }
        }
    }

    fn parse_loop(&mut self, head: &str, span: Span) -> TemplateResult<Node> {
        let parts: Vec<&str> = head.split_whitespace().collect();
        if parts.len() != 3 || parts[1] != "in" {
            return Err(TemplateError::Syntax {
                message: format!("malformed loop `{}`, expected `for <var> in <field>`", head),
                line: span.line,
                column: span.column,
            });
        }
        if !is_ident(parts[0]) {
            return Err(TemplateError::Syntax {
                message: format!("invalid loop variable `{}`", parts[0]),
                line: span.line,
                column: span.column,
            });
        }

        let source = parse_path(parts[2], span)?;
        let (body, _) = self.parse_nodes(Some(("for", span)), &["endfor"])?;

        Ok(Node::Loop {
            var: parts[0].to_string(),
            source,
            body,
            span,
        })
    }
}

/// Split a tag into its head word and the rest.
fn split_tag(inner: &str) -> (&str, &str) {
    match inner.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (inner, ""),
    }
}

fn is_ident(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_path_segment(segment: &str) -> bool {
    is_ident(segment) || segment.chars().all(|c| c.is_ascii_digit()) && !segment.is_empty()
}

/// Parse a dotted field path.
pub(crate) fn parse_path(source: &str, span: Span) -> TemplateResult<PathExpr> {
    let segments: Vec<String> = source.split('.').map(str::to_string).collect();
    if segments.iter().any(|s| !is_path_segment(s)) {
        return Err(TemplateError::Syntax {
            message: format!("malformed field path `{}`", source),
            line: span.line,
            column: span.column,
        });
    }
    Ok(PathExpr { segments, span })
}

// Condition expressions. Precedence, loosest first: `or`, `and`, `not`,
// comparison, primary.

#[derive(Debug, Clone, PartialEq)]
enum ExprToken {
    Word(String),
    Str(String),
    Int(i64),
    Float(f64),
    Eq,
    Ne,
    LParen,
    RParen,
}

/// Parse a condition expression, as found in `if`/`elif` tags.
pub(crate) fn parse_cond(source: &str, span: Span) -> TemplateResult<Cond> {
    let tokens = lex_expr(source, span)?;
    if tokens.is_empty() {
        return Err(TemplateError::Syntax {
            message: "empty condition".to_string(),
            line: span.line,
            column: span.column,
        });
    }
    let mut parser = CondParser {
        tokens,
        pos: 0,
        span,
    };
    let cond = parser.parse_or()?;
    if parser.pos != parser.tokens.len() {
        return Err(parser.syntax("unexpected trailing tokens in condition"));
    }
    Ok(cond)
}

struct CondParser {
    tokens: Vec<ExprToken>,
    pos: usize,
    span: Span,
}

impl CondParser {
    fn peek(&self) -> Option<&ExprToken> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<ExprToken> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat_word(&mut self, word: &str) -> bool {
        if matches!(self.peek(), Some(ExprToken::Word(w)) if w == word) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn syntax(&self, message: impl Into<String>) -> TemplateError {
        TemplateError::Syntax {
            message: message.into(),
            line: self.span.line,
            column: self.span.column,
        }
    }

    fn parse_or(&mut self) -> TemplateResult<Cond> {
        let mut left = self.parse_and()?;
        while self.eat_word("or") {
            let right = self.parse_and()?;
            left = Cond::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> TemplateResult<Cond> {
        let mut left = self.parse_not()?;
        while self.eat_word("and") {
            let right = self.parse_not()?;
            left = Cond::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> TemplateResult<Cond> {
        if self.eat_word("not") {
            return Ok(Cond::Not(Box::new(self.parse_not()?)));
        }
        if matches!(self.peek(), Some(ExprToken::LParen)) {
            self.pos += 1;
            let inner = self.parse_or()?;
            match self.bump() {
                Some(ExprToken::RParen) => return Ok(inner),
                _ => return Err(self.syntax("missing `)` in condition")),
            }
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> TemplateResult<Cond> {
        let lhs = self.parse_operand()?;
        let op = match self.peek() {
            Some(ExprToken::Eq) => CmpOp::Eq,
            Some(ExprToken::Ne) => CmpOp::Ne,
            _ => return Ok(Cond::Truthy(lhs)),
        };
        self.pos += 1;
        let rhs = self.parse_operand()?;
        Ok(Cond::Compare {
            lhs,
            op,
            rhs,
            span: self.span,
        })
    }

    fn parse_operand(&mut self) -> TemplateResult<Expr> {
        let span = self.span;
        match self.bump() {
            Some(ExprToken::Word(word)) => match word.as_str() {
                "true" => Ok(Expr::Literal(Literal::Bool(true), span)),
                "false" => Ok(Expr::Literal(Literal::Bool(false), span)),
                "and" | "or" | "not" | "in" => {
                    Err(self.syntax(format!("unexpected keyword `{}`", word)))
                }
                _ => Ok(Expr::Path(parse_path(&word, span)?)),
            },
            Some(ExprToken::Str(s)) => Ok(Expr::Literal(Literal::String(s), span)),
            Some(ExprToken::Int(n)) => Ok(Expr::Literal(Literal::Integer(n), span)),
            Some(ExprToken::Float(f)) => Ok(Expr::Literal(Literal::Float(f), span)),
            _ => Err(self.syntax("expected a field reference or literal")),
        }
    }
}

fn lex_expr(source: &str, span: Span) -> TemplateResult<Vec<ExprToken>> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    let syntax = |message: String| TemplateError::Syntax {
        message,
        line: span.line,
        column: span.column,
    };

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c == '(' {
            tokens.push(ExprToken::LParen);
            i += 1;
        } else if c == ')' {
            tokens.push(ExprToken::RParen);
            i += 1;
        } else if c == '=' && chars.get(i + 1) == Some(&'=') {
            tokens.push(ExprToken::Eq);
            i += 2;
        } else if c == '!' && chars.get(i + 1) == Some(&'=') {
            tokens.push(ExprToken::Ne);
            i += 2;
        } else if c == '"' || c == '\'' {
            let quote = c;
            i += 1;
            let mut value = String::new();
            loop {
                match chars.get(i) {
                    None => return Err(syntax("unterminated string literal".to_string())),
                    Some(&'\\') => {
                        let escaped = chars.get(i + 1).copied();
                        match escaped {
                            Some('n') => value.push('\n'),
                            Some('t') => value.push('\t'),
                            Some(e) => value.push(e),
                            None => {
                                return Err(syntax("unterminated string literal".to_string()));
                            }
                        }
                        i += 2;
                    }
                    Some(&ch) if ch == quote => {
                        i += 1;
                        break;
                    }
                    Some(&ch) => {
                        value.push(ch);
                        i += 1;
                    }
                }
            }
            tokens.push(ExprToken::Str(value));
        } else if c.is_ascii_digit() || c == '-' {
            let start = i;
            i += 1;
            while matches!(chars.get(i), Some(ch) if ch.is_ascii_digit() || *ch == '.') {
                i += 1;
            }

            let text: String = chars[start..i].iter().collect();
            if text.contains('.') {
                let f = text
                    .parse::<f64>()
                    .map_err(|_| syntax(format!("malformed number `{}`", text)))?;
                tokens.push(ExprToken::Float(f));
            } else {
                let n = text
                    .parse::<i64>()
                    .map_err(|_| syntax(format!("malformed number `{}`", text)))?;
                tokens.push(ExprToken::Int(n));
            }
        } else if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while matches!(chars.get(i), Some(ch) if ch.is_ascii_alphanumeric() || *ch == '_' || *ch == '.')
            {
                i += 1;
            }
            tokens.push(ExprToken::Word(chars[start..i].iter().collect()));
        } else {
            return Err(syntax(format!("unexpected character `{}` in expression", c)));
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span { line: 1, column: 1 }
    }

    #[test]
    fn test_parse_literal_and_interpolation() {
        let template = Template::parse("name: {{ name }}").unwrap();
        assert_eq!(template.nodes.len(), 2);
        match &template.nodes[1] {
            Node::Interpolation(path) => assert_eq!(path.dotted(), "name"),
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_parse_nested_blocks() {
        let template = Template::parse(
            "{% for p in ports %}{% if p.publicly_accessible %}{{ p.name }}{% endif %}{% endfor %}",
        )
        .unwrap();
        match &template.nodes[0] {
            Node::Loop { var, source, body, .. } => {
                assert_eq!(var, "p");
                assert_eq!(source.dotted(), "ports");
                assert!(matches!(body[0], Node::Conditional { .. }));
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_parse_elif_else() {
        let template =
            Template::parse("{% if a %}1{% elif b %}2{% else %}3{% endif %}").unwrap();
        match &template.nodes[0] {
            Node::Conditional {
                branches,
                else_body,
                ..
            } => {
                assert_eq!(branches.len(), 2);
                assert_eq!(else_body, &vec![Node::Literal("3".to_string())]);
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_if() {
        let err = Template::parse("x\n{% if a %}body").unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnterminatedBlock {
                kind: "if".to_string(),
                line: 2,
                column: 1,
            }
        );
    }

    #[test]
    fn test_unterminated_for() {
        let err = Template::parse("{% for p in ports %}{{ p.name }}").unwrap_err();
        assert!(matches!(err, TemplateError::UnterminatedBlock { ref kind, .. } if kind == "for"));
    }

    #[test]
    fn test_stray_endif() {
        let err = Template::parse("text{% endif %}").unwrap_err();
        assert!(matches!(err, TemplateError::Syntax { .. }));
    }

    #[test]
    fn test_endfor_does_not_close_if() {
        let err = Template::parse("{% if a %}x{% endfor %}").unwrap_err();
        assert!(matches!(err, TemplateError::Syntax { .. }));
    }

    #[test]
    fn test_unknown_directive() {
        let err = Template::parse("{% include base %}").unwrap_err();
        assert!(matches!(err, TemplateError::Syntax { .. }));
    }

    #[test]
    fn test_cond_precedence() {
        let cond = parse_cond("a or b and not c", span()).unwrap();
        match cond {
            Cond::Or(_, right) => assert!(matches!(*right, Cond::And(_, _))),
            other => panic!("unexpected condition: {:?}", other),
        }
    }

    #[test]
    fn test_cond_comparison() {
        let cond = parse_cond("kind == \"Deployment\"", span()).unwrap();
        match cond {
            Cond::Compare { op, rhs, .. } => {
                assert_eq!(op, CmpOp::Eq);
                assert!(matches!(
                    rhs,
                    Expr::Literal(Literal::String(ref s), _) if s == "Deployment"
                ));
            }
            other => panic!("unexpected condition: {:?}", other),
        }
    }

    #[test]
    fn test_cond_trailing_garbage() {
        assert!(parse_cond("a b", span()).is_err());
    }

    #[test]
    fn test_malformed_loop() {
        let err = Template::parse("{% for ports %}{% endfor %}").unwrap_err();
        assert!(matches!(err, TemplateError::Syntax { .. }));
    }

    #[test]
    fn test_referenced_paths_skip_loop_vars() {
        let template = Template::parse(
            "{{ name }}{% for p in ports %}{{ p.port }}{{ tag }}{% endfor %}",
        )
        .unwrap();
        assert_eq!(template.referenced_paths(), vec!["name", "ports", "tag"]);
    }
}
