//! The render pipeline: parse, render, verify, checksum.

use std::fs;
use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;

use mani_descriptor::Mapping;
use mani_output::{sha256_hex, TargetFormat};
use mani_template::Template;

use crate::artifact::{DirRenderReport, RenderedArtifact};
use crate::error::{EngineError, EngineResult};

/// Renders templates into deployable artifacts.
///
/// A render is a pure function of (template, descriptor); the engine
/// adds the file handling around it and the integrity check that keeps
/// structurally broken output away from the apply step.
pub struct ManifestRenderer {
    verify_output: bool,
}

impl Default for ManifestRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestRenderer {
    /// Create a renderer with output verification enabled.
    pub fn new() -> Self {
        Self {
            verify_output: true,
        }
    }

    /// Disable the post-render integrity check.
    pub fn without_verification(mut self) -> Self {
        self.verify_output = false;
        self
    }

    /// Render template source against a descriptor mapping.
    pub fn render_str(
        &self,
        source: &str,
        bindings: &Mapping,
        format: TargetFormat,
    ) -> EngineResult<RenderedArtifact> {
        let template = Template::parse(source)?;
        let content = template.render(bindings)?;

        if self.verify_output {
            mani_output::validate(&content, format)?;
        }

        let checksum = sha256_hex(&content);
        Ok(RenderedArtifact {
            content,
            format,
            checksum,
        })
    }

    /// Render a template file; the target format is inferred from the
    /// file extension.
    pub fn render_file(
        &self,
        template_path: impl AsRef<Path>,
        bindings: &Mapping,
    ) -> EngineResult<RenderedArtifact> {
        let template_path = template_path.as_ref();
        debug!("Rendering template file {:?}", template_path);

        let source = fs::read_to_string(template_path)?;
        let format = TargetFormat::from_path(template_path);
        self.render_str(&source, bindings, format)
    }

    /// Render every template file of a chart directory into a target
    /// directory, copying non-template files verbatim and mirroring the
    /// directory structure.
    ///
    /// Any single failure aborts the whole directory render.
    pub fn render_dir(
        &self,
        source_dir: impl AsRef<Path>,
        target_dir: impl AsRef<Path>,
        bindings: &Mapping,
    ) -> EngineResult<DirRenderReport> {
        let source_dir = source_dir.as_ref();
        let target_dir = target_dir.as_ref();
        info!("Rendering chart directory {:?} to {:?}", source_dir, target_dir);

        fs::create_dir_all(target_dir)?;
        let mut report = DirRenderReport::default();

        for entry in WalkDir::new(source_dir).min_depth(1) {
            let entry = entry.map_err(|e| EngineError::Io(e.into()))?;
            let source = entry.path();
            let relative = source.strip_prefix(source_dir).unwrap_or(source);
            let target = target_dir.join(relative);

            if source.is_dir() {
                fs::create_dir_all(&target)?;
                continue;
            }

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }

            if is_template_file(source) {
                let content = fs::read_to_string(source)
                    .map_err(|_| EngineError::NotText(source.to_path_buf()))?;
                let artifact =
                    self.render_str(&content, bindings, TargetFormat::from_path(source))?;
                fs::write(&target, artifact.content)?;
                report.rendered += 1;
                debug!("Rendered {:?}", relative);
            } else {
                fs::copy(source, &target)?;
                report.copied += 1;
                debug!("Copied {:?}", relative);
            }
            report.written.push(target);
        }

        info!(
            "Rendered {} files, copied {}",
            report.rendered, report.copied
        );
        Ok(report)
    }
}

/// Text files that go through the renderer; everything else is copied
/// byte-for-byte.
fn is_template_file(path: &Path) -> bool {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    matches!(
        extension.as_str(),
        "yaml" | "yml" | "json" | "tf" | "hcl" | "tfvars" | "tpl" | "conf" | "properties" | "txt"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mani_descriptor::Value;

    fn bindings() -> Mapping {
        let mut map = Mapping::new();
        map.insert("name".to_string(), Value::from("my-api"));
        map.insert("replicas".to_string(), Value::Integer(2));
        map
    }

    #[test]
    fn test_render_str_verifies_yaml() {
        let renderer = ManifestRenderer::new();
        let artifact = renderer
            .render_str("name: {{ name }}\nreplicas: {{ replicas }}\n", &bindings(), TargetFormat::Yaml)
            .unwrap();
        assert_eq!(artifact.content, "name: my-api\nreplicas: 2\n");
        assert_eq!(artifact.checksum.len(), 64);
    }

    #[test]
    fn test_render_str_rejects_broken_output() {
        let renderer = ManifestRenderer::new();
        let err = renderer
            .render_str("name: [{{ name }}\n", &bindings(), TargetFormat::Yaml)
            .unwrap_err();
        assert!(matches!(err, EngineError::Output(_)));
    }

    #[test]
    fn test_no_verify_skips_integrity() {
        let renderer = ManifestRenderer::new().without_verification();
        assert!(renderer
            .render_str("name: [{{ name }}\n", &bindings(), TargetFormat::Yaml)
            .is_ok());
    }

    #[test]
    fn test_is_template_file() {
        assert!(is_template_file(Path::new("deployment.yaml")));
        assert!(is_template_file(Path::new("main.tf")));
        assert!(!is_template_file(Path::new("logo.png")));
        assert!(!is_template_file(Path::new("Chart")));
    }
}
