//! Template rendering.
//!
//! Rendering is a pure function of (template, descriptor): no I/O, no
//! shared state, byte-identical output for identical inputs. The first
//! error aborts the render; no partial output is ever returned.

use std::borrow::Cow;

use mani_descriptor::{Mapping, Value};
use tracing::trace;

use crate::ast::{CmpOp, Cond, Expr, Literal, Node};
use crate::error::{TemplateError, TemplateResult};
use crate::parser::Template;
use crate::scope::Scope;

impl Template {
    /// Render the template against a descriptor mapping.
    pub fn render(&self, bindings: &Mapping) -> TemplateResult<String> {
        trace!("Rendering template with {} root fields", bindings.len());
        let mut out = String::new();
        let mut scope = Scope::new(bindings);
        render_nodes(&self.nodes, &mut scope, &mut out)?;
        Ok(out)
    }
}

fn render_nodes<'a>(
    nodes: &'a [Node],
    scope: &mut Scope<'a>,
    out: &mut String,
) -> TemplateResult<()> {
    for node in nodes {
        match node {
            Node::Literal(text) => out.push_str(text),
            Node::Interpolation(path) => {
                let value = match scope.resolve(path) {
                    Some(value) => value,
                    None => {
                        return Err(TemplateError::UndefinedReference {
                            path: path.dotted(),
                            line: path.span.line,
                            column: path.span.column,
                        });
                    }
                };
                match value.as_scalar_string() {
                    Some(text) => out.push_str(&text),
                    None => {
                        return Err(TemplateError::TypeMismatch {
                            message: format!(
                                "cannot interpolate {} `{}`",
                                value.type_name(),
                                path.dotted()
                            ),
                            line: path.span.line,
                            column: path.span.column,
                        });
                    }
                }
            }
            Node::Conditional {
                branches,
                else_body,
                ..
            } => {
                let mut taken = false;
                for (cond, body) in branches {
                    if eval_cond(cond, scope)? {
                        render_nodes(body, scope, out)?;
                        taken = true;
                        break;
                    }
                }
                if !taken {
                    render_nodes(else_body, scope, out)?;
                }
            }
            Node::Loop {
                var, source, body, ..
            } => {
                let value = match scope.resolve(source) {
                    Some(value) => value,
                    None => {
                        return Err(TemplateError::UndefinedReference {
                            path: source.dotted(),
                            line: source.span.line,
                            column: source.span.column,
                        });
                    }
                };
                let items = match value {
                    Value::Sequence(items) => items,
                    other => {
                        return Err(TemplateError::TypeMismatch {
                            message: format!(
                                "cannot iterate over {} `{}`",
                                other.type_name(),
                                source.dotted()
                            ),
                            line: source.span.line,
                            column: source.span.column,
                        });
                    }
                };
                for item in items {
                    scope.push(var, item);
                    let result = render_nodes(body, scope, out);
                    scope.pop();
                    result?;
                }
            }
        }
    }
    Ok(())
}

fn eval_cond<'a>(cond: &'a Cond, scope: &Scope<'a>) -> TemplateResult<bool> {
    match cond {
        Cond::Truthy(expr) => match expr {
            // An unresolvable path is falsy in a bare truth test; this
            // is what lets a conditional guard an absent field.
            Expr::Path(path) => Ok(scope.resolve(path).map(Value::is_truthy).unwrap_or(false)),
            Expr::Literal(literal, _) => Ok(literal_value(literal).is_truthy()),
        },
        Cond::Not(inner) => Ok(!eval_cond(inner, scope)?),
        Cond::And(left, right) => Ok(eval_cond(left, scope)? && eval_cond(right, scope)?),
        Cond::Or(left, right) => Ok(eval_cond(left, scope)? || eval_cond(right, scope)?),
        Cond::Compare { lhs, op, rhs, span } => {
            let left = eval_operand(lhs, scope)?;
            let right = eval_operand(rhs, scope)?;
            let equal = match value_eq(left.as_ref(), right.as_ref()) {
                Some(equal) => equal,
                None => {
                    return Err(TemplateError::TypeMismatch {
                        message: format!(
                            "cannot compare {} with {}",
                            left.type_name(),
                            right.type_name()
                        ),
                        line: span.line,
                        column: span.column,
                    });
                }
            };
            Ok(match op {
                CmpOp::Eq => equal,
                CmpOp::Ne => !equal,
            })
        }
    }
}

fn eval_operand<'a>(expr: &Expr, scope: &Scope<'a>) -> TemplateResult<Cow<'a, Value>> {
    match expr {
        Expr::Path(path) => match scope.resolve(path) {
            Some(value) => Ok(Cow::Borrowed(value)),
            None => Err(TemplateError::UndefinedReference {
                path: path.dotted(),
                line: path.span.line,
                column: path.span.column,
            }),
        },
        Expr::Literal(literal, _) => Ok(Cow::Owned(literal_value(literal))),
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Integer(n) => Value::Integer(*n),
        Literal::Float(f) => Value::Float(*f),
        Literal::String(s) => Value::String(s.clone()),
    }
}

/// Equality per the comparison policy: integers and floats compare
/// numerically, other scalars compare within their own type, anything
/// else is incomparable.
fn value_eq(left: &Value, right: &Value) -> Option<bool> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Some(a == b),
        (Value::Integer(a), Value::Integer(b)) => Some(a == b),
        (Value::Float(a), Value::Float(b)) => Some(a == b),
        (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => {
            Some(*a as f64 == *b)
        }
        (Value::String(a), Value::String(b)) => Some(a == b),
        _ => None,
    }
}
