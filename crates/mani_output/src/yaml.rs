//! YAML integrity validation.

use serde::Deserialize;

use crate::error::{OutputError, OutputResult};
use crate::format::TargetFormat;

/// Check that rendered content parses as a YAML stream.
///
/// Multi-document streams (`---` separators) are accepted: chart
/// directories concatenate several manifests into one file.
pub fn validate(content: &str) -> OutputResult<()> {
    for document in serde_yaml::Deserializer::from_str(content) {
        if let Err(e) = serde_yaml::Value::deserialize(document) {
            return Err(match e.location() {
                Some(location) => OutputError::integrity_at(
                    TargetFormat::Yaml,
                    e.to_string(),
                    location.line(),
                    location.column(),
                ),
                None => OutputError::integrity(TargetFormat::Yaml, e.to_string()),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_manifest() {
        let content = "apiVersion: v1\nkind: Service\nmetadata:\n  name: web\n";
        assert!(validate(content).is_ok());
    }

    #[test]
    fn test_multi_document_stream() {
        let content = "a: 1\n---\nb: 2\n";
        assert!(validate(content).is_ok());
    }

    #[test]
    fn test_broken_structure_fails() {
        let content = "spec:\n  ports: [80, 443\n";
        let err = validate(content).unwrap_err();
        assert!(matches!(err, OutputError::Integrity { format: TargetFormat::Yaml, .. }));
    }

    #[test]
    fn test_empty_content_is_valid() {
        assert!(validate("").is_ok());
    }
}
