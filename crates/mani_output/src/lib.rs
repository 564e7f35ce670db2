//! # mani_output
//!
//! Rendered artifact integrity validation for maniforge.
//!
//! Rendering must never hand an invalid document to the apply step: a
//! half-meaningful manifest that still parses would be silently applied
//! with missing fields. This crate re-parses rendered YAML, structurally
//! checks rendered HCL, and computes the artifact checksums that drive
//! change detection downstream.

pub mod checksum;
pub mod error;
pub mod format;
pub mod hcl;
pub mod yaml;

pub use checksum::sha256_hex;
pub use error::{OutputError, OutputResult};
pub use format::TargetFormat;

/// Validate rendered content against its declared target format.
///
/// `Raw` artifacts have no declared syntax and always pass.
pub fn validate(content: &str, format: TargetFormat) -> OutputResult<()> {
    match format {
        TargetFormat::Yaml => yaml::validate(content),
        TargetFormat::Hcl => hcl::validate(content),
        TargetFormat::Raw => Ok(()),
    }
}
