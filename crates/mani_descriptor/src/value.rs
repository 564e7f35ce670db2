//! Generic descriptor value tree.
//!
//! The renderer consumes a descriptor as an ordered mapping of field
//! names to values. Mappings preserve insertion order so that renders of
//! identical inputs are byte-identical (rendered-artifact checksums feed
//! change detection downstream).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::DescriptorError;

/// Ordered mapping of field names to values.
pub type Mapping = IndexMap<String, Value>;

/// A descriptor value: scalar, sequence, or nested mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

impl Value {
    /// Human-readable type name, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }

    /// Truthiness coercion policy for conditional directives.
    ///
    /// Booleans are themselves, numbers are true when non-zero, strings
    /// and collections are true when non-empty, null is false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Integer(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Sequence(items) => !items.is_empty(),
            Value::Mapping(map) => !map.is_empty(),
        }
    }

    /// String form of a scalar, as emitted by interpolation.
    ///
    /// Returns `None` for null, sequences and mappings, which have no
    /// interpolated form.
    pub fn as_scalar_string(&self) -> Option<String> {
        match self {
            Value::Bool(b) => Some(b.to_string()),
            Value::Integer(n) => Some(n.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<u16> for Value {
    fn from(n: u16) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Mapping(map)
    }
}

impl TryFrom<serde_yaml::Value> for Value {
    type Error = DescriptorError;

    fn try_from(value: serde_yaml::Value) -> Result<Self, Self::Error> {
        match value {
            serde_yaml::Value::Null => Ok(Value::Null),
            serde_yaml::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::Float(f))
                } else {
                    Err(DescriptorError::Invalid(format!("unrepresentable number: {}", n)))
                }
            }
            serde_yaml::Value::String(s) => Ok(Value::String(s)),
            serde_yaml::Value::Sequence(items) => {
                let converted = items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Sequence(converted))
            }
            serde_yaml::Value::Mapping(map) => {
                let mut converted = Mapping::new();
                for (key, val) in map {
                    let key = match key {
                        serde_yaml::Value::String(s) => s,
                        other => {
                            return Err(DescriptorError::NonStringKey(format!("{:?}", other)));
                        }
                    };
                    converted.insert(key, Value::try_from(val)?);
                }
                Ok(Value::Mapping(converted))
            }
            // Unwrap YAML tags (`!foo bar`) to their underlying value.
            serde_yaml::Value::Tagged(tagged) => Value::try_from(tagged.value),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                let mut converted = Mapping::new();
                for (key, val) in map {
                    converted.insert(key, Value::from(val));
                }
                Value::Mapping(converted)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Integer(3).is_truthy());
        assert!(!Value::Integer(0).is_truthy());
        assert!(Value::from("x").is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::Sequence(Vec::new()).is_truthy());
        assert!(Value::Sequence(vec![Value::Null]).is_truthy());
    }

    #[test]
    fn test_scalar_string() {
        assert_eq!(Value::from("web").as_scalar_string().as_deref(), Some("web"));
        assert_eq!(Value::Integer(8080).as_scalar_string().as_deref(), Some("8080"));
        assert_eq!(Value::Bool(false).as_scalar_string().as_deref(), Some("false"));
        assert!(Value::Null.as_scalar_string().is_none());
        assert!(Value::Sequence(Vec::new()).as_scalar_string().is_none());
    }

    #[test]
    fn test_from_yaml_preserves_order() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("z: 1\na: 2\nm: 3").unwrap();
        let value = Value::try_from(yaml).unwrap();
        let map = value.as_mapping().unwrap();
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_from_yaml_rejects_non_string_keys() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("1: one").unwrap();
        let err = Value::try_from(yaml).unwrap_err();
        assert!(matches!(err, DescriptorError::NonStringKey(_)));
    }

    #[test]
    fn test_from_json() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"ports": [{"port": 80}], "public": true}"#).unwrap();
        let value = Value::from(json);
        let map = value.as_mapping().unwrap();
        assert_eq!(map.get("public"), Some(&Value::Bool(true)));
        let ports = map.get("ports").and_then(Value::as_sequence).unwrap();
        assert_eq!(ports.len(), 1);
    }
}
