//! Integration tests for descriptor loading and validation.

use std::fs;

use mani_descriptor::{
    DescriptorReader, DescriptorValidator, Value, WorkloadKind,
};
use tempfile::tempdir;

const DESCRIPTOR_YAML: &str = r#"
long_id: 1f3c8e0a-51f7-4b56-9d2a-0c64b92d4f11
name: order-service
kind: stateful_set
namespace: prod
image: registry.example.com/order-service
tag: 3.2.1
cpu_request_in_mili: 500
cpu_limit_in_mili: 1000
ram_request_in_mib: 512
ram_limit_in_mib: 1024
min_instances: 3
max_instances: 3
ports:
  - name: http
    port: 8080
storages:
  - name: data
    storage_class: gp2
    size_in_gib: 20
    mount_point: /var/lib/orders
environment_vars:
  APP_ENV: production
readiness_probe:
  probe_type: http
  path: /healthz
  port: 8080
"#;

#[test]
fn read_and_validate_full_descriptor() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("descriptor.yaml");
    fs::write(&path, DESCRIPTOR_YAML).unwrap();

    let descriptor = DescriptorReader::read_descriptor(&path).unwrap();
    assert_eq!(descriptor.kind, WorkloadKind::StatefulSet);
    assert_eq!(descriptor.min_instances, 3);
    assert_eq!(descriptor.storages[0].mount_point, "/var/lib/orders");

    let result = DescriptorValidator::validate(&descriptor);
    assert!(result.valid, "errors: {:?}", result.errors);
}

#[test]
fn bindings_expose_renderer_facing_fields() {
    let descriptor = DescriptorReader::from_yaml_str(DESCRIPTOR_YAML).unwrap();
    let bindings = descriptor.bindings();

    assert_eq!(bindings.get("kind"), Some(&Value::from("StatefulSet")));
    assert_eq!(bindings.get("namespace"), Some(&Value::from("prod")));
    assert_eq!(
        bindings.get("image_with_tag"),
        Some(&Value::from("registry.example.com/order-service:3.2.1"))
    );

    let storages = bindings.get("storages").and_then(Value::as_sequence).unwrap();
    assert_eq!(storages.len(), 1);
    let storage = storages[0].as_mapping().unwrap();
    assert_eq!(storage.get("size_in_gib"), Some(&Value::Integer(20)));

    let probe = bindings
        .get("readiness_probe")
        .and_then(Value::as_mapping)
        .unwrap();
    assert_eq!(probe.get("path"), Some(&Value::from("/healthz")));
}

#[test]
fn generic_bindings_accept_arbitrary_fields() {
    let bindings = DescriptorReader::bindings_from_yaml_str(
        "database_engine: postgres\nversion: 14\nhigh_availability: true",
    )
    .unwrap();
    assert_eq!(bindings.get("database_engine"), Some(&Value::from("postgres")));
    assert_eq!(bindings.get("version"), Some(&Value::Integer(14)));
}

#[test]
fn invalid_kind_is_rejected() {
    let result = DescriptorReader::from_yaml_str(
        "long_id: 1f3c8e0a-51f7-4b56-9d2a-0c64b92d4f11\nname: x\nkind: daemon_set\nimage: i\ntag: t\ncpu_request_in_mili: 1\ncpu_limit_in_mili: 1\nram_request_in_mib: 1\nram_limit_in_mib: 1",
    );
    assert!(result.is_err());
}
