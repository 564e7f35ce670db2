//! # mani_template
//!
//! Template language and renderer for maniforge.
//!
//! Templates interleave literal text with three directive forms:
//!
//! - `{{ field.path }}` — interpolation
//! - `{% if cond %} … {% elif cond %} … {% else %} … {% endif %}` — conditionals
//! - `{% for x in seq %} … {% endfor %}` — iteration
//!
//! plus `{# … #}` comments. A `-` adjacent to any delimiter strips the
//! whitespace on that side of the directive. Rendering is a pure
//! function of the template and the descriptor mapping: identical
//! inputs always produce byte-identical output, and the first
//! unresolved or ill-typed reference fails the whole render with the
//! offending directive's position.
//!
//! ## Example
//!
//! ```rust
//! use mani_descriptor::{Mapping, Value};
//! use mani_template::Template;
//!
//! let template = Template::parse(
//!     "replicas: {{ replicas }}{% if publicly_accessible %}\nexposed: true{% endif %}",
//! )
//! .unwrap();
//!
//! let mut bindings = Mapping::new();
//! bindings.insert("replicas".to_string(), Value::Integer(2));
//! bindings.insert("publicly_accessible".to_string(), Value::Bool(false));
//!
//! let rendered = template.render(&bindings).unwrap();
//! assert_eq!(rendered, "replicas: 2");
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod renderer;
pub mod scope;

pub use ast::{CmpOp, Cond, Expr, Literal, Node, PathExpr, Span};
pub use error::{TemplateError, TemplateResult};
pub use parser::Template;
pub use scope::Scope;
