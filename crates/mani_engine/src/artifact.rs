//! Rendered artifact types.

use std::path::PathBuf;

use mani_output::TargetFormat;

/// A fully rendered configuration document, ready for the apply step.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedArtifact {
    pub content: String,
    pub format: TargetFormat,
    /// SHA-256 hex digest of `content`; feeds change detection.
    pub checksum: String,
}

/// Outcome of rendering a whole chart directory.
#[derive(Debug, Default)]
pub struct DirRenderReport {
    /// Files written to the target directory, in walk order.
    pub written: Vec<PathBuf>,
    /// How many of them were rendered as templates.
    pub rendered: usize,
    /// How many were copied verbatim.
    pub copied: usize,
}
