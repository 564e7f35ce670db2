//! Template abstract syntax.
//!
//! A parsed template is an ordered sequence of nodes: literal text,
//! interpolations, conditional blocks and iteration blocks. Conditions
//! are small predicate trees over descriptor fields.

use std::collections::BTreeSet;

/// Source position of a directive, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

/// Dotted field access path, e.g. `storage.mount_point`.
///
/// A numeric segment indexes into a sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct PathExpr {
    pub segments: Vec<String>,
    pub span: Span,
}

impl PathExpr {
    /// The path in its written `a.b.c` form.
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }
}

/// Literal scalar operand in a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// Operand of a condition: a field path or a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Path(PathExpr),
    Literal(Literal, Span),
}

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
}

/// Conditional predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Cond {
    /// Bare truth test. An unresolvable path is falsy here, which is
    /// what lets a conditional guard an absent descriptor field.
    Truthy(Expr),
    Not(Box<Cond>),
    Compare {
        lhs: Expr,
        op: CmpOp,
        rhs: Expr,
        span: Span,
    },
    And(Box<Cond>, Box<Cond>),
    Or(Box<Cond>, Box<Cond>),
}

/// A template document node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Literal(String),
    Interpolation(PathExpr),
    Conditional {
        /// `if`/`elif` branches in source order.
        branches: Vec<(Cond, Vec<Node>)>,
        else_body: Vec<Node>,
        span: Span,
    },
    Loop {
        var: String,
        source: PathExpr,
        body: Vec<Node>,
        span: Span,
    },
}

/// Collect the descriptor paths a node tree references, skipping paths
/// rooted at a loop variable (those resolve against loop elements, not
/// the descriptor).
pub fn referenced_paths(nodes: &[Node]) -> Vec<String> {
    let mut paths = BTreeSet::new();
    let mut bound = Vec::new();
    collect_nodes(nodes, &mut bound, &mut paths);
    paths.into_iter().collect()
}

fn collect_nodes(nodes: &[Node], bound: &mut Vec<String>, paths: &mut BTreeSet<String>) {
    for node in nodes {
        match node {
            Node::Literal(_) => {}
            Node::Interpolation(path) => add_path(path, bound, paths),
            Node::Conditional {
                branches,
                else_body,
                ..
            } => {
                for (cond, body) in branches {
                    collect_cond(cond, bound, paths);
                    collect_nodes(body, bound, paths);
                }
                collect_nodes(else_body, bound, paths);
            }
            Node::Loop {
                var, source, body, ..
            } => {
                add_path(source, bound, paths);
                bound.push(var.clone());
                collect_nodes(body, bound, paths);
                bound.pop();
            }
        }
    }
}

fn collect_cond(cond: &Cond, bound: &mut Vec<String>, paths: &mut BTreeSet<String>) {
    match cond {
        Cond::Truthy(expr) => collect_expr(expr, bound, paths),
        Cond::Not(inner) => collect_cond(inner, bound, paths),
        Cond::Compare { lhs, rhs, .. } => {
            collect_expr(lhs, bound, paths);
            collect_expr(rhs, bound, paths);
        }
        Cond::And(left, right) | Cond::Or(left, right) => {
            collect_cond(left, bound, paths);
            collect_cond(right, bound, paths);
        }
    }
}

fn collect_expr(expr: &Expr, bound: &mut Vec<String>, paths: &mut BTreeSet<String>) {
    if let Expr::Path(path) = expr {
        add_path(path, bound, paths);
    }
}

fn add_path(path: &PathExpr, bound: &[String], paths: &mut BTreeSet<String>) {
    if let Some(first) = path.segments.first() {
        if !bound.contains(first) {
            paths.insert(path.dotted());
        }
    }
}
