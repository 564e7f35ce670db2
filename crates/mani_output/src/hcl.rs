//! HCL structural validation.
//!
//! Full HCL parsing belongs to terraform itself; the renderer only has
//! to guarantee it never emits a structurally broken fragment. This
//! scanner checks delimiter balance, string literals (including `${…}`
//! interpolation nesting), heredocs and comments, and reports the
//! position of the first violation.

use crate::error::{OutputError, OutputResult};
use crate::format::TargetFormat;

/// Check that rendered content is structurally valid HCL.
pub fn validate(content: &str) -> OutputResult<()> {
    Scanner::new(content).run()
}

/// One open `{`, `[` or `(` and where it was opened.
struct OpenDelim {
    close: char,
    line: usize,
    column: usize,
}

enum Mode {
    /// Regular HCL body; `delims` tracks this level's open delimiters.
    /// `from_interp` marks a `${…}` region opened inside a string.
    Code {
        delims: Vec<OpenDelim>,
        from_interp: bool,
    },
    /// Inside a quoted string; remembers where it started.
    Str { line: usize, column: usize },
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    modes: Vec<Mode>,
}

impl Scanner {
    fn new(content: &str) -> Self {
        Self {
            chars: content.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            modes: vec![Mode::Code {
                delims: Vec::new(),
                from_interp: false,
            }],
        }
    }

    fn run(mut self) -> OutputResult<()> {
        while self.pos < self.chars.len() {
            match self.modes.last() {
                Some(Mode::Str { .. }) => self.scan_string()?,
                _ => self.scan_code()?,
            }
        }

        match self.modes.pop() {
            Some(Mode::Code { delims, .. }) if self.modes.is_empty() => match delims.last() {
                Some(open) => Err(OutputError::integrity_at(
                    TargetFormat::Hcl,
                    format!("unclosed delimiter, expected `{}`", open.close),
                    open.line,
                    open.column,
                )),
                None => Ok(()),
            },
            Some(Mode::Str { line, column }) => Err(OutputError::integrity_at(
                TargetFormat::Hcl,
                "unterminated string literal",
                line,
                column,
            )),
            _ => Err(OutputError::integrity(
                TargetFormat::Hcl,
                "unterminated string interpolation",
            )),
        }
    }

    fn scan_code(&mut self) -> OutputResult<()> {
        let line = self.line;
        let column = self.column;
        let c = self.bump();

        match c {
            '#' => self.skip_line(),
            '/' if self.peek() == Some('/') => self.skip_line(),
            '/' if self.peek() == Some('*') => self.skip_block_comment(line, column)?,
            '"' => self.modes.push(Mode::Str { line, column }),
            '<' if self.peek() == Some('<') => self.skip_heredoc(line, column)?,
            '{' | '[' | '(' => {
                let close = match c {
                    '{' => '}',
                    '[' => ']',
                    _ => ')',
                };
                if let Some(Mode::Code { delims, .. }) = self.modes.last_mut() {
                    delims.push(OpenDelim {
                        close,
                        line,
                        column,
                    });
                }
            }
            '}' | ']' | ')' => {
                let from_interp = match self.modes.last_mut() {
                    Some(Mode::Code {
                        delims,
                        from_interp,
                    }) => {
                        if let Some(open) = delims.pop() {
                            if open.close != c {
                                return Err(OutputError::integrity_at(
                                    TargetFormat::Hcl,
                                    format!(
                                        "mismatched delimiter: expected `{}`, found `{}`",
                                        open.close, c
                                    ),
                                    line,
                                    column,
                                ));
                            }
                            return Ok(());
                        }
                        *from_interp
                    }
                    _ => false,
                };

                // Empty delimiter stack: either this closes a `${…}`
                // interpolation, or the brace is unbalanced.
                if c == '}' && from_interp {
                    self.modes.pop();
                } else {
                    return Err(OutputError::integrity_at(
                        TargetFormat::Hcl,
                        format!("unbalanced `{}`", c),
                        line,
                        column,
                    ));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn scan_string(&mut self) -> OutputResult<()> {
        let line = self.line;
        let column = self.column;
        let c = self.bump();

        match c {
            '\\' => {
                if self.pos < self.chars.len() {
                    self.bump();
                }
            }
            '"' => {
                self.modes.pop();
            }
            '$' if self.peek() == Some('{') => {
                self.bump();
                self.modes.push(Mode::Code {
                    delims: Vec::new(),
                    from_interp: true,
                });
            }
            '\n' => {
                return Err(OutputError::integrity_at(
                    TargetFormat::Hcl,
                    "unterminated string literal",
                    line,
                    column,
                ));
            }
            _ => {}
        }
        Ok(())
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self, line: usize, column: usize) -> OutputResult<()> {
        self.bump();
        loop {
            match self.peek() {
                None => {
                    return Err(OutputError::integrity_at(
                        TargetFormat::Hcl,
                        "unterminated block comment",
                        line,
                        column,
                    ));
                }
                Some('*') => {
                    self.bump();
                    if self.peek() == Some('/') {
                        self.bump();
                        return Ok(());
                    }
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    /// Consume a `<<LABEL` / `<<-LABEL` heredoc through its terminator.
    fn skip_heredoc(&mut self, line: usize, column: usize) -> OutputResult<()> {
        self.bump();
        if self.peek() == Some('-') {
            self.bump();
        }

        let mut label = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                label.push(self.bump());
            } else {
                break;
            }
        }
        if label.is_empty() {
            // `<<` without a label is an operator HCL does not have, but
            // it is not a structural concern; leave it to terraform.
            return Ok(());
        }

        // Skip the rest of the opening line, then consume lines until
        // one holds only the label.
        self.skip_line();
        loop {
            if self.pos >= self.chars.len() {
                return Err(OutputError::integrity_at(
                    TargetFormat::Hcl,
                    format!("unterminated heredoc `{}`", label),
                    line,
                    column,
                ));
            }
            self.bump();

            let mut current = String::new();
            while let Some(c) = self.peek() {
                if c == '\n' {
                    break;
                }
                current.push(self.bump());
            }
            if current.trim() == label {
                return Ok(());
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_resource_block() {
        let content = r#"
resource "aws_vpc" "main" {
  cidr_block = "10.0.0.0/16"
  tags = {
    Name = "main"
  }
}
"#;
        assert!(validate(content).is_ok());
    }

    #[test]
    fn test_missing_closing_brace() {
        let content = "resource \"aws_vpc\" \"main\" {\n  cidr_block = \"10.0.0.0/16\"\n";
        let err = validate(content).unwrap_err();
        match err {
            OutputError::Integrity { line, .. } => assert_eq!(line, Some(1)),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unbalanced_closer() {
        assert!(validate("variable \"a\" {}\n}\n").is_err());
    }

    #[test]
    fn test_mismatched_delimiters() {
        assert!(validate("a = [1, 2}\n").is_err());
    }

    #[test]
    fn test_unterminated_string() {
        assert!(validate("name = \"unclosed\n").is_err());
    }

    #[test]
    fn test_interpolation_with_nested_string() {
        let content = r#"bucket = "${var.prefix}-${lookup(var.names, "primary")}""#;
        assert!(validate(content).is_ok());
    }

    #[test]
    fn test_comment_with_brace_is_ignored() {
        let content = "# closing } in a comment\nvariable \"a\" {}\n// also { here\n";
        assert!(validate(content).is_ok());
    }

    #[test]
    fn test_heredoc() {
        let content = "policy = <<EOF\n{ \"not\": \"hcl\"\nEOF\n";
        assert!(validate(content).is_ok());
    }

    #[test]
    fn test_unterminated_heredoc() {
        let content = "policy = <<EOF\nbody only\n";
        assert!(validate(content).is_err());
    }
}
