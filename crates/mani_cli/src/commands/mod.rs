//! CLI command definitions.
//!
//! This module defines the command structure for the maniforge CLI.
//! Each subcommand maps to one step of the manifest workflow.

use clap::{Parser, Subcommand};

pub mod render;
pub mod validate;
pub mod vars;

/// maniforge - manifest rendering for deployment workloads
#[derive(Parser)]
#[command(name = "mani")]
#[command(version, about = "maniforge - manifest rendering for deployment workloads")]
#[command(long_about = r#"
maniforge renders Kubernetes manifests and Terraform fragments from
service descriptors through a small directive language (interpolation,
conditionals, loops).

WORKFLOWS:
  render    → Render a template or chart directory against a descriptor
  validate  → Parse templates and validate a descriptor without output
  vars      → List the descriptor fields a template references

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Validation failure
  4 - Template error
  5 - Output integrity error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a template or chart directory against a descriptor
    Render(render::RenderArgs),

    /// Validate templates and descriptors without producing output
    Validate(validate::ValidateArgs),

    /// List the descriptor fields referenced by a template
    Vars(vars::VarsArgs),
}
