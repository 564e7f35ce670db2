//! Integration tests for the render pipeline.

use std::fs;

use mani_descriptor::DescriptorReader;
use mani_engine::{EngineError, ManifestRenderer};
use tempfile::tempdir;

fn write_chart(dir: &std::path::Path) {
    fs::create_dir_all(dir.join("templates")).unwrap();
    fs::write(
        dir.join("templates/deployment.yaml"),
        "apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: {{ name }}\nspec:\n  replicas: {{ replicas }}\n",
    )
    .unwrap();
    fs::write(
        dir.join("templates/service.yaml"),
        "apiVersion: v1\nkind: Service\nmetadata:\n  name: {{ name }}\n{% if publicly_accessible %}spec:\n  type: LoadBalancer\n{% endif %}",
    )
    .unwrap();
    fs::write(dir.join("NOTES.md"), "no directives here").unwrap();
}

fn bindings() -> mani_descriptor::Mapping {
    DescriptorReader::bindings_from_yaml_str(
        "name: my-api\nreplicas: 2\npublicly_accessible: true",
    )
    .unwrap()
}

#[test]
fn render_dir_mirrors_structure() {
    let source = tempdir().unwrap();
    let target = tempdir().unwrap();
    write_chart(source.path());

    let renderer = ManifestRenderer::new();
    let report = renderer
        .render_dir(source.path(), target.path(), &bindings())
        .unwrap();

    assert_eq!(report.rendered, 2);
    assert_eq!(report.copied, 1);
    assert!(target.path().join("templates/deployment.yaml").exists());
    assert!(target.path().join("NOTES.md").exists());

    let deployment =
        fs::read_to_string(target.path().join("templates/deployment.yaml")).unwrap();
    assert!(deployment.contains("name: my-api"));
    assert!(deployment.contains("replicas: 2"));

    let service = fs::read_to_string(target.path().join("templates/service.yaml")).unwrap();
    assert!(service.contains("type: LoadBalancer"));
}

#[test]
fn render_dir_fails_on_undefined_reference() {
    let source = tempdir().unwrap();
    let target = tempdir().unwrap();
    fs::write(source.path().join("broken.yaml"), "name: {{ nope }}\n").unwrap();

    let renderer = ManifestRenderer::new();
    let err = renderer
        .render_dir(source.path(), target.path(), &bindings())
        .unwrap_err();
    assert!(matches!(err, EngineError::Template(_)));
}

#[test]
fn render_file_infers_format_from_extension() {
    let source = tempdir().unwrap();
    let path = source.path().join("providers.tf");
    fs::write(
        &path,
        "provider \"aws\" {\n  region = \"{{ region }}\"\n}\n",
    )
    .unwrap();

    let renderer = ManifestRenderer::new();
    let bindings = DescriptorReader::bindings_from_yaml_str("region: eu-west-3").unwrap();
    let artifact = renderer.render_file(&path, &bindings).unwrap();

    assert_eq!(artifact.format, mani_output::TargetFormat::Hcl);
    assert!(artifact.content.contains("region = \"eu-west-3\""));
}

#[test]
fn checksums_are_stable_across_renders() {
    let renderer = ManifestRenderer::new();
    let bindings = bindings();
    let source = "metadata:\n  name: {{ name }}\n";

    let first = renderer
        .render_str(source, &bindings, mani_output::TargetFormat::Yaml)
        .unwrap();
    let second = renderer
        .render_str(source, &bindings, mani_output::TargetFormat::Yaml)
        .unwrap();

    assert_eq!(first.checksum, second.checksum);
    assert_eq!(first.content, second.content);
}

#[test]
fn broken_rendered_yaml_is_rejected() {
    let renderer = ManifestRenderer::new();
    let err = renderer
        .render_str(
            "ports: [{% for p in ports %}{{ p }},{% endfor %}\n",
            &DescriptorReader::bindings_from_yaml_str("ports: [80]").unwrap(),
            mani_output::TargetFormat::Yaml,
        )
        .unwrap_err();
    assert!(matches!(err, EngineError::Output(_)));
}
