//! Target output formats.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OutputError;

/// Declared syntax of a rendered artifact.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TargetFormat {
    /// Kubernetes manifests, Helm values files.
    Yaml,
    /// Terraform configuration fragments.
    Hcl,
    /// Anything else; skips integrity validation.
    Raw,
}

impl TargetFormat {
    /// Infer the format from a file extension.
    pub fn from_path(path: impl AsRef<Path>) -> TargetFormat {
        let extension = path
            .as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "yaml" | "yml" => TargetFormat::Yaml,
            "tf" | "hcl" | "tfvars" => TargetFormat::Hcl,
            _ => TargetFormat::Raw,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetFormat::Yaml => "yaml",
            TargetFormat::Hcl => "hcl",
            TargetFormat::Raw => "raw",
        }
    }
}

impl std::fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

impl FromStr for TargetFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(TargetFormat::Yaml),
            "hcl" | "tf" | "terraform" => Ok(TargetFormat::Hcl),
            "raw" => Ok(TargetFormat::Raw),
            other => Err(OutputError::UnknownFormat(other.to_string())),
        }
    }
}
