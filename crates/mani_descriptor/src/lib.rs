//! # mani_descriptor
//!
//! Service descriptor models for maniforge.
//!
//! A descriptor describes one deployable workload: identifiers, image,
//! resource requests and limits, ports, storage volumes, environment
//! variables and probes. Descriptors are consumed by the template
//! renderer as an ordered mapping of field names to values.
//!
//! ## Example
//!
//! ```rust
//! use mani_descriptor::{DescriptorReader, DescriptorValidator};
//!
//! let descriptor = DescriptorReader::from_yaml_str(r#"
//! long_id: 1f3c8e0a-51f7-4b56-9d2a-0c64b92d4f11
//! name: my-api
//! kind: deployment
//! image: registry.example.com/my-api
//! tag: 1.4.2
//! cpu_request_in_mili: 250
//! cpu_limit_in_mili: 500
//! ram_request_in_mib: 256
//! ram_limit_in_mib: 512
//! "#).unwrap();
//!
//! let result = DescriptorValidator::validate(&descriptor);
//! assert!(result.valid);
//!
//! // Lower into the generic mapping consumed by the renderer.
//! let bindings = descriptor.bindings();
//! assert!(bindings.contains_key("name"));
//! ```

pub mod error;
pub mod models;
pub mod reader;
pub mod validator;
pub mod value;

pub use error::{DescriptorError, DescriptorResult};
pub use models::{
    PortProtocol, PortSpec, ProbeSpec, ProbeType, ServiceDescriptor, StorageSpec, WorkloadKind,
};
pub use reader::DescriptorReader;
pub use validator::{DescriptorValidator, ValidationResult};
pub use value::{Mapping, Value};
