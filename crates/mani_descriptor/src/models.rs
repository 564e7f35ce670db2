//! Typed workload descriptor models.
//!
//! These structs model one deployable workload the way the deployment
//! system describes it: identifiers, image coordinates, resource
//! requests and limits, instance counts, ports, storage volumes,
//! environment variables and probes. `ServiceDescriptor::bindings`
//! lowers the typed model into the generic mapping consumed by the
//! template renderer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value::{Mapping, Value};

/// Workload kind the rendered manifest targets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadKind {
    Deployment,
    StatefulSet,
    Job,
    CronJob,
}

impl WorkloadKind {
    /// The Kubernetes `kind` string for this workload.
    pub fn kind_name(&self) -> &'static str {
        match self {
            WorkloadKind::Deployment => "Deployment",
            WorkloadKind::StatefulSet => "StatefulSet",
            WorkloadKind::Job => "Job",
            WorkloadKind::CronJob => "CronJob",
        }
    }
}

impl std::fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind_name())
    }
}

/// Network protocol exposed by a port.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PortProtocol {
    #[default]
    Tcp,
    Udp,
    Http,
}

impl PortProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortProtocol::Tcp => "TCP",
            PortProtocol::Udp => "UDP",
            PortProtocol::Http => "HTTP",
        }
    }
}

/// A port exposed by the workload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortSpec {
    pub name: String,
    pub port: u16,
    #[serde(default)]
    pub protocol: PortProtocol,
    #[serde(default)]
    pub publicly_accessible: bool,
}

/// A persistent storage volume mounted into the workload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageSpec {
    pub name: String,
    /// Storage class name as known by the target cluster.
    pub storage_class: String,
    pub size_in_gib: u32,
    pub mount_point: String,
}

/// Probe mechanism.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProbeType {
    #[default]
    Tcp,
    Http,
}

fn default_period_seconds() -> u32 {
    10
}

fn default_timeout_seconds() -> u32 {
    5
}

fn default_threshold() -> u32 {
    1
}

/// Readiness/liveness probe settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProbeSpec {
    #[serde(default)]
    pub probe_type: ProbeType,
    /// HTTP path, only meaningful for HTTP probes.
    #[serde(default)]
    pub path: Option<String>,
    pub port: u16,
    #[serde(default)]
    pub initial_delay_seconds: u32,
    #[serde(default = "default_period_seconds")]
    pub period_seconds: u32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u32,
    #[serde(default = "default_threshold")]
    pub success_threshold: u32,
    #[serde(default = "default_threshold")]
    pub failure_threshold: u32,
}

fn default_instances() -> u32 {
    1
}

/// Describes one deployable workload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceDescriptor {
    pub long_id: Uuid,
    pub name: String,
    pub kind: WorkloadKind,
    /// Namespace the workload is deployed into.
    #[serde(default)]
    pub namespace: Option<String>,
    pub image: String,
    pub tag: String,
    #[serde(default)]
    pub entrypoint: Option<String>,
    #[serde(default)]
    pub command_args: Vec<String>,
    pub cpu_request_in_mili: u32,
    pub cpu_limit_in_mili: u32,
    pub ram_request_in_mib: u32,
    pub ram_limit_in_mib: u32,
    #[serde(default = "default_instances")]
    pub min_instances: u32,
    #[serde(default = "default_instances")]
    pub max_instances: u32,
    #[serde(default)]
    pub publicly_accessible: bool,
    /// Cron expression, required for `CronJob` workloads.
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub ports: Vec<PortSpec>,
    #[serde(default)]
    pub storages: Vec<StorageSpec>,
    /// BTreeMap keeps environment variable order deterministic.
    #[serde(default)]
    pub environment_vars: BTreeMap<String, String>,
    #[serde(default)]
    pub readiness_probe: Option<ProbeSpec>,
    #[serde(default)]
    pub liveness_probe: Option<ProbeSpec>,
}

impl ServiceDescriptor {
    /// Name reduced to characters safe for Kubernetes object names:
    /// lowercase alphanumerics and dashes.
    pub fn sanitized_name(&self) -> String {
        let mut sanitized = String::with_capacity(self.name.len());
        for c in self.name.chars() {
            if c.is_ascii_alphanumeric() {
                sanitized.push(c.to_ascii_lowercase());
            } else if (c == '-' || c == '_' || c == ' ') && !sanitized.ends_with('-') {
                sanitized.push('-');
            }
        }
        sanitized.trim_matches('-').to_string()
    }

    /// Full image reference, `image:tag`.
    pub fn image_with_tag(&self) -> String {
        format!("{}:{}", self.image, self.tag)
    }

    /// Lower the typed descriptor into the generic mapping consumed by
    /// the renderer. Field insertion order is fixed so that renders are
    /// byte-deterministic.
    pub fn bindings(&self) -> Mapping {
        let mut bindings = Mapping::new();
        bindings.insert("long_id".to_string(), Value::from(self.long_id.to_string()));
        bindings.insert("name".to_string(), Value::from(self.name.as_str()));
        bindings.insert("sanitized_name".to_string(), Value::from(self.sanitized_name()));
        bindings.insert("kind".to_string(), Value::from(self.kind.kind_name()));
        if let Some(namespace) = &self.namespace {
            bindings.insert("namespace".to_string(), Value::from(namespace.as_str()));
        }
        bindings.insert("image".to_string(), Value::from(self.image.as_str()));
        bindings.insert("tag".to_string(), Value::from(self.tag.as_str()));
        bindings.insert("image_with_tag".to_string(), Value::from(self.image_with_tag()));
        if let Some(entrypoint) = &self.entrypoint {
            bindings.insert("entrypoint".to_string(), Value::from(entrypoint.as_str()));
        }
        bindings.insert(
            "command_args".to_string(),
            Value::Sequence(self.command_args.iter().map(|a| Value::from(a.as_str())).collect()),
        );
        bindings.insert("cpu_request_in_mili".to_string(), Value::from(self.cpu_request_in_mili));
        bindings.insert("cpu_limit_in_mili".to_string(), Value::from(self.cpu_limit_in_mili));
        bindings.insert("ram_request_in_mib".to_string(), Value::from(self.ram_request_in_mib));
        bindings.insert("ram_limit_in_mib".to_string(), Value::from(self.ram_limit_in_mib));
        bindings.insert("min_instances".to_string(), Value::from(self.min_instances));
        bindings.insert("max_instances".to_string(), Value::from(self.max_instances));
        bindings.insert("publicly_accessible".to_string(), Value::from(self.publicly_accessible));
        if let Some(schedule) = &self.schedule {
            bindings.insert("schedule".to_string(), Value::from(schedule.as_str()));
        }
        bindings.insert(
            "ports".to_string(),
            Value::Sequence(self.ports.iter().map(port_bindings).collect()),
        );
        bindings.insert(
            "storages".to_string(),
            Value::Sequence(self.storages.iter().map(storage_bindings).collect()),
        );
        bindings.insert(
            "environment_vars".to_string(),
            Value::Sequence(
                self.environment_vars
                    .iter()
                    .map(|(key, value)| {
                        let mut entry = Mapping::new();
                        entry.insert("key".to_string(), Value::from(key.as_str()));
                        entry.insert("value".to_string(), Value::from(value.as_str()));
                        Value::Mapping(entry)
                    })
                    .collect(),
            ),
        );
        if let Some(probe) = &self.readiness_probe {
            bindings.insert("readiness_probe".to_string(), probe_bindings(probe));
        }
        if let Some(probe) = &self.liveness_probe {
            bindings.insert("liveness_probe".to_string(), probe_bindings(probe));
        }
        bindings
    }
}

fn port_bindings(port: &PortSpec) -> Value {
    let mut entry = Mapping::new();
    entry.insert("name".to_string(), Value::from(port.name.as_str()));
    entry.insert("port".to_string(), Value::from(port.port));
    entry.insert("protocol".to_string(), Value::from(port.protocol.as_str()));
    entry.insert("publicly_accessible".to_string(), Value::from(port.publicly_accessible));
    Value::Mapping(entry)
}

fn storage_bindings(storage: &StorageSpec) -> Value {
    let mut entry = Mapping::new();
    entry.insert("name".to_string(), Value::from(storage.name.as_str()));
    entry.insert("storage_class".to_string(), Value::from(storage.storage_class.as_str()));
    entry.insert("size_in_gib".to_string(), Value::from(storage.size_in_gib));
    entry.insert("mount_point".to_string(), Value::from(storage.mount_point.as_str()));
    Value::Mapping(entry)
}

fn probe_bindings(probe: &ProbeSpec) -> Value {
    let mut entry = Mapping::new();
    entry.insert(
        "probe_type".to_string(),
        Value::from(match probe.probe_type {
            ProbeType::Tcp => "tcp",
            ProbeType::Http => "http",
        }),
    );
    if let Some(path) = &probe.path {
        entry.insert("path".to_string(), Value::from(path.as_str()));
    }
    entry.insert("port".to_string(), Value::from(probe.port));
    entry.insert("initial_delay_seconds".to_string(), Value::from(probe.initial_delay_seconds));
    entry.insert("period_seconds".to_string(), Value::from(probe.period_seconds));
    entry.insert("timeout_seconds".to_string(), Value::from(probe.timeout_seconds));
    entry.insert("success_threshold".to_string(), Value::from(probe.success_threshold));
    entry.insert("failure_threshold".to_string(), Value::from(probe.failure_threshold));
    Value::Mapping(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> ServiceDescriptor {
        serde_yaml::from_str(
            r#"
long_id: 1f3c8e0a-51f7-4b56-9d2a-0c64b92d4f11
name: My API
kind: deployment
image: registry.example.com/my-api
tag: 1.4.2
cpu_request_in_mili: 250
cpu_limit_in_mili: 500
ram_request_in_mib: 256
ram_limit_in_mib: 512
ports:
  - name: http
    port: 8080
    publicly_accessible: true
environment_vars:
  DATABASE_URL: postgres://db:5432/app
  APP_ENV: production
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_sanitized_name() {
        let desc = descriptor();
        assert_eq!(desc.sanitized_name(), "my-api");
    }

    #[test]
    fn test_kind_name() {
        assert_eq!(WorkloadKind::StatefulSet.kind_name(), "StatefulSet");
        assert_eq!(WorkloadKind::CronJob.kind_name(), "CronJob");
    }

    #[test]
    fn test_bindings_field_order_is_stable() {
        let desc = descriptor();
        let first = desc.bindings();
        let second = desc.bindings();
        let first_keys: Vec<_> = first.keys().cloned().collect();
        let second_keys: Vec<_> = second.keys().cloned().collect();
        assert_eq!(first_keys, second_keys);
        assert_eq!(first, second);
    }

    #[test]
    fn test_bindings_env_vars_sorted_by_key() {
        let desc = descriptor();
        let bindings = desc.bindings();
        let env = bindings
            .get("environment_vars")
            .and_then(Value::as_sequence)
            .unwrap();
        let keys: Vec<_> = env
            .iter()
            .map(|e| e.as_mapping().unwrap().get("key").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["APP_ENV", "DATABASE_URL"]);
    }

    #[test]
    fn test_bindings_absent_probe_is_absent() {
        let desc = descriptor();
        let bindings = desc.bindings();
        assert!(!bindings.contains_key("readiness_probe"));
    }

    #[test]
    fn test_defaults() {
        let desc = descriptor();
        assert_eq!(desc.min_instances, 1);
        assert_eq!(desc.max_instances, 1);
        assert!(!desc.publicly_accessible);
        assert_eq!(desc.ports[0].protocol, PortProtocol::Tcp);
    }
}
