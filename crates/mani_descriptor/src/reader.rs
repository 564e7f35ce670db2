//! Descriptor file reading utilities.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{DescriptorError, DescriptorResult};
use crate::models::ServiceDescriptor;
use crate::value::{Mapping, Value};

/// Reader for descriptor files.
pub struct DescriptorReader;

impl DescriptorReader {
    /// Read a typed service descriptor from a YAML or JSON file.
    pub fn read_descriptor(path: impl AsRef<Path>) -> DescriptorResult<ServiceDescriptor> {
        let path = path.as_ref();
        debug!("Reading descriptor from {:?}", path);

        if !path.exists() {
            return Err(DescriptorError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        if is_json(path) {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(serde_yaml::from_str(&content)?)
        }
    }

    /// Read a generic binding mapping from a YAML or JSON file.
    ///
    /// Unlike [`read_descriptor`](Self::read_descriptor) this places no
    /// shape requirements on the fields; any top-level mapping works.
    pub fn read_bindings(path: impl AsRef<Path>) -> DescriptorResult<Mapping> {
        let path = path.as_ref();
        debug!("Reading bindings from {:?}", path);

        if !path.exists() {
            return Err(DescriptorError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        if is_json(path) {
            Self::bindings_from_json_str(&content)
        } else {
            Self::bindings_from_yaml_str(&content)
        }
    }

    /// Parse a typed service descriptor from a YAML string.
    pub fn from_yaml_str(content: &str) -> DescriptorResult<ServiceDescriptor> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse a typed service descriptor from a JSON string.
    pub fn from_json_str(content: &str) -> DescriptorResult<ServiceDescriptor> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse a generic binding mapping from a YAML string.
    pub fn bindings_from_yaml_str(content: &str) -> DescriptorResult<Mapping> {
        let raw: serde_yaml::Value = serde_yaml::from_str(content)?;
        into_mapping(Value::try_from(raw)?)
    }

    /// Parse a generic binding mapping from a JSON string.
    pub fn bindings_from_json_str(content: &str) -> DescriptorResult<Mapping> {
        let raw: serde_json::Value = serde_json::from_str(content)?;
        into_mapping(Value::from(raw))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

fn into_mapping(value: Value) -> DescriptorResult<Mapping> {
    match value {
        Value::Mapping(map) => Ok(map),
        other => Err(DescriptorError::NotAMapping(other.type_name().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_bindings_from_yaml_str() {
        let bindings = DescriptorReader::bindings_from_yaml_str("name: app\nreplicas: 2").unwrap();
        assert_eq!(bindings.get("name"), Some(&Value::from("app")));
        assert_eq!(bindings.get("replicas"), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_bindings_rejects_non_mapping_root() {
        let err = DescriptorReader::bindings_from_yaml_str("- a\n- b").unwrap_err();
        assert!(matches!(err, DescriptorError::NotAMapping(_)));
    }

    #[test]
    fn test_read_bindings_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"name": "app", "public": true}}"#).unwrap();

        let bindings = DescriptorReader::read_bindings(file.path()).unwrap();
        assert_eq!(bindings.get("public"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_read_descriptor_missing_file() {
        let err = DescriptorReader::read_descriptor("does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, DescriptorError::NotFound(_)));
    }
}
