//! Render command - Render templates against a descriptor.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use mani_descriptor::DescriptorReader;
use mani_engine::ManifestRenderer;
use mani_output::TargetFormat;

#[derive(Args)]
pub struct RenderArgs {
    /// Template file or chart directory
    #[arg(short, long)]
    template: PathBuf,

    /// Descriptor file (YAML or JSON)
    #[arg(short, long)]
    descriptor: PathBuf,

    /// Output file (for a template file) or directory (for a chart
    /// directory); single-file renders print to stdout when omitted
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Target format override: yaml, hcl or raw (default: inferred
    /// from the template file extension)
    #[arg(short, long)]
    format: Option<TargetFormat>,

    /// Skip the post-render output integrity check
    #[arg(long)]
    no_verify: bool,

    /// Print the artifact checksum after rendering
    #[arg(long)]
    checksum: bool,
}

pub fn execute(args: RenderArgs) -> Result<()> {
    let bindings = DescriptorReader::read_bindings(&args.descriptor)
        .with_context(|| format!("failed to read descriptor {:?}", args.descriptor))?;

    let mut renderer = ManifestRenderer::new();
    if args.no_verify {
        renderer = renderer.without_verification();
    }

    if args.template.is_dir() {
        let out = match &args.out {
            Some(out) => out,
            None => anyhow::bail!("--out is required when rendering a chart directory"),
        };

        let report = renderer.render_dir(&args.template, out, &bindings)?;
        println!(
            "✅ Rendered {} files, copied {} into {}",
            report.rendered,
            report.copied,
            out.display()
        );
        return Ok(());
    }

    info!("Rendering template {:?}", args.template);
    let source = fs::read_to_string(&args.template)
        .with_context(|| format!("failed to read template {:?}", args.template))?;
    let format = args
        .format
        .unwrap_or_else(|| TargetFormat::from_path(&args.template));

    let artifact = renderer.render_str(&source, &bindings, format)?;

    match &args.out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(out, &artifact.content)?;
            println!("✅ Rendered {} artifact to {}", artifact.format, out.display());
        }
        None => print!("{}", artifact.content),
    }

    if args.checksum {
        eprintln!("checksum: sha256:{}", artifact.checksum);
    }

    Ok(())
}
