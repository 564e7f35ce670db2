//! Descriptor validation utilities.

use regex::Regex;

use crate::models::{ProbeSpec, ProbeType, ServiceDescriptor, WorkloadKind};

/// Validation result with details.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(message.into());
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn merge(&mut self, other: ValidationResult) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// Validator for service descriptors.
pub struct DescriptorValidator;

impl DescriptorValidator {
    /// Validate a descriptor before it is handed to the renderer.
    pub fn validate(descriptor: &ServiceDescriptor) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.merge(Self::validate_identity(descriptor));
        result.merge(Self::validate_resources(descriptor));
        result.merge(Self::validate_ports(descriptor));
        result.merge(Self::validate_storages(descriptor));
        result.merge(Self::validate_environment(descriptor));

        if let Some(probe) = &descriptor.readiness_probe {
            result.merge(Self::validate_probe("readiness", probe));
        }
        if let Some(probe) = &descriptor.liveness_probe {
            result.merge(Self::validate_probe("liveness", probe));
        }

        result
    }

    fn validate_identity(descriptor: &ServiceDescriptor) -> ValidationResult {
        let mut result = ValidationResult::new();

        if descriptor.name.is_empty() {
            result.add_error("Descriptor name cannot be empty");
        }

        // Kubernetes object names must be DNS-1123 labels.
        let sanitized = descriptor.sanitized_name();
        let name_pattern = Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").unwrap();
        if sanitized.is_empty() || !name_pattern.is_match(&sanitized) {
            result.add_error(format!(
                "Name '{}' cannot be sanitized into a DNS-1123 label",
                descriptor.name
            ));
        } else if sanitized.len() > 63 {
            result.add_error(format!(
                "Sanitized name '{}' exceeds 63 characters",
                sanitized
            ));
        }

        if descriptor.image.is_empty() {
            result.add_error("Image cannot be empty");
        }

        if descriptor.tag.is_empty() {
            result.add_error("Image tag cannot be empty");
        } else if descriptor.tag == "latest" {
            result.add_warning("Tag 'latest' defeats checksum-based change detection");
        }

        match descriptor.kind {
            WorkloadKind::CronJob => {
                if descriptor.schedule.is_none() {
                    result.add_error("CronJob workloads require a schedule");
                }
            }
            _ => {
                if descriptor.schedule.is_some() {
                    result.add_warning(format!(
                        "Schedule is ignored for {} workloads",
                        descriptor.kind
                    ));
                }
            }
        }

        result
    }

    fn validate_resources(descriptor: &ServiceDescriptor) -> ValidationResult {
        let mut result = ValidationResult::new();

        if descriptor.cpu_request_in_mili == 0 {
            result.add_error("CPU request must be greater than zero");
        }
        if descriptor.ram_request_in_mib == 0 {
            result.add_error("RAM request must be greater than zero");
        }
        if descriptor.cpu_limit_in_mili < descriptor.cpu_request_in_mili {
            result.add_error(format!(
                "CPU limit {}m is lower than request {}m",
                descriptor.cpu_limit_in_mili, descriptor.cpu_request_in_mili
            ));
        }
        if descriptor.ram_limit_in_mib < descriptor.ram_request_in_mib {
            result.add_error(format!(
                "RAM limit {}Mi is lower than request {}Mi",
                descriptor.ram_limit_in_mib, descriptor.ram_request_in_mib
            ));
        }

        if descriptor.min_instances == 0 {
            result.add_error("min_instances must be at least 1");
        }
        if descriptor.max_instances < descriptor.min_instances {
            result.add_error(format!(
                "max_instances {} is lower than min_instances {}",
                descriptor.max_instances, descriptor.min_instances
            ));
        }

        result
    }

    fn validate_ports(descriptor: &ServiceDescriptor) -> ValidationResult {
        let mut result = ValidationResult::new();

        let mut seen_names = Vec::new();
        let mut seen_ports = Vec::new();
        for port in &descriptor.ports {
            if port.name.is_empty() {
                result.add_error(format!("Port {} has no name", port.port));
            } else if seen_names.contains(&port.name.as_str()) {
                result.add_error(format!("Duplicate port name: {}", port.name));
            } else {
                seen_names.push(port.name.as_str());
            }

            if port.port == 0 {
                result.add_error(format!("Port '{}' uses reserved port number 0", port.name));
            } else if seen_ports.contains(&port.port) {
                result.add_error(format!("Duplicate port number: {}", port.port));
            } else {
                seen_ports.push(port.port);
            }
        }

        if descriptor.publicly_accessible
            && !descriptor.ports.iter().any(|p| p.publicly_accessible)
        {
            result.add_warning(
                "Descriptor is publicly accessible but exposes no public port",
            );
        }

        result
    }

    fn validate_storages(descriptor: &ServiceDescriptor) -> ValidationResult {
        let mut result = ValidationResult::new();

        let mut seen_mounts = Vec::new();
        for storage in &descriptor.storages {
            if storage.name.is_empty() {
                result.add_error("Storage volume has no name");
            }
            if storage.size_in_gib == 0 {
                result.add_error(format!("Storage '{}' has zero size", storage.name));
            }
            if !storage.mount_point.starts_with('/') {
                result.add_error(format!(
                    "Storage '{}' mount point '{}' is not absolute",
                    storage.name, storage.mount_point
                ));
            } else if seen_mounts.contains(&storage.mount_point.as_str()) {
                result.add_error(format!("Duplicate mount point: {}", storage.mount_point));
            } else {
                seen_mounts.push(storage.mount_point.as_str());
            }
        }

        if !descriptor.storages.is_empty() && descriptor.kind == WorkloadKind::Deployment {
            result.add_warning(
                "Deployments with persistent storage usually belong in a StatefulSet",
            );
        }

        result
    }

    fn validate_environment(descriptor: &ServiceDescriptor) -> ValidationResult {
        let mut result = ValidationResult::new();

        let env_pattern = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
        for key in descriptor.environment_vars.keys() {
            if !env_pattern.is_match(key) {
                result.add_error(format!("Invalid environment variable name: {}", key));
            }
        }

        result
    }

    fn validate_probe(kind: &str, probe: &ProbeSpec) -> ValidationResult {
        let mut result = ValidationResult::new();

        if probe.port == 0 {
            result.add_error(format!("{} probe targets port 0", kind));
        }
        if probe.period_seconds == 0 {
            result.add_error(format!("{} probe period must be at least 1 second", kind));
        }
        if probe.timeout_seconds == 0 {
            result.add_error(format!("{} probe timeout must be at least 1 second", kind));
        }
        if probe.success_threshold == 0 || probe.failure_threshold == 0 {
            result.add_error(format!("{} probe thresholds must be at least 1", kind));
        }

        match probe.probe_type {
            ProbeType::Http => {
                if probe.path.as_deref().map_or(true, str::is_empty) {
                    result.add_error(format!("{} HTTP probe requires a path", kind));
                }
            }
            ProbeType::Tcp => {
                if probe.path.is_some() {
                    result.add_warning(format!("{} TCP probe ignores its path", kind));
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::DescriptorReader;

    fn valid_descriptor() -> ServiceDescriptor {
        DescriptorReader::from_yaml_str(
            r#"
long_id: 1f3c8e0a-51f7-4b56-9d2a-0c64b92d4f11
name: my-api
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
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_valid_descriptor_passes() {
        let result = DescriptorValidator::validate(&valid_descriptor());
        assert!(result.valid, "errors: {:?}", result.errors);
    }

    #[test]
    fn test_limit_below_request_fails() {
        let mut desc = valid_descriptor();
        desc.cpu_limit_in_mili = 100;
        let result = DescriptorValidator::validate(&desc);
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.contains("CPU limit")));
    }

    #[test]
    fn test_duplicate_port_name_fails() {
        let mut desc = valid_descriptor();
        let mut extra = desc.ports[0].clone();
        extra.port = 9090;
        desc.ports.push(extra);
        let result = DescriptorValidator::validate(&desc);
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.contains("Duplicate port name")));
    }

    #[test]
    fn test_cronjob_requires_schedule() {
        let mut desc = valid_descriptor();
        desc.kind = WorkloadKind::CronJob;
        let result = DescriptorValidator::validate(&desc);
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.contains("schedule")));
    }

    #[test]
    fn test_latest_tag_warns() {
        let mut desc = valid_descriptor();
        desc.tag = "latest".to_string();
        let result = DescriptorValidator::validate(&desc);
        assert!(result.valid);
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn test_http_probe_requires_path() {
        let mut desc = valid_descriptor();
        desc.readiness_probe = Some(ProbeSpec {
            probe_type: ProbeType::Http,
            path: None,
            port: 8080,
            initial_delay_seconds: 0,
            period_seconds: 10,
            timeout_seconds: 5,
            success_threshold: 1,
            failure_threshold: 3,
        });
        let result = DescriptorValidator::validate(&desc);
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.contains("requires a path")));
    }
}
