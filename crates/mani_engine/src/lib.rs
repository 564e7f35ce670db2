//! # mani_engine
//!
//! Render pipeline for maniforge.
//!
//! Ties the pieces together: parse a template, render it against a
//! descriptor, verify the output parses as its declared format, and
//! stamp the artifact with its checksum. Also renders whole chart
//! directories, copying non-template files verbatim.
//!
//! ## Example
//!
//! ```rust
//! use mani_descriptor::{Mapping, Value};
//! use mani_engine::ManifestRenderer;
//! use mani_output::TargetFormat;
//!
//! let mut bindings = Mapping::new();
//! bindings.insert("name".to_string(), Value::from("my-api"));
//!
//! let renderer = ManifestRenderer::new();
//! let artifact = renderer
//!     .render_str("metadata:\n  name: {{ name }}\n", &bindings, TargetFormat::Yaml)
//!     .unwrap();
//! assert!(artifact.content.contains("my-api"));
//! ```

pub mod artifact;
pub mod error;
pub mod pipeline;

pub use artifact::{DirRenderReport, RenderedArtifact};
pub use error::{EngineError, EngineResult};
pub use pipeline::ManifestRenderer;
