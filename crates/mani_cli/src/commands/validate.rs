//! Validate command - Check templates and descriptors without output.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use tracing::info;
use walkdir::WalkDir;

use mani_descriptor::{DescriptorReader, DescriptorValidator};
use mani_template::Template;

#[derive(Args)]
pub struct ValidateArgs {
    /// Template file or chart directory
    #[arg(short, long)]
    template: PathBuf,

    /// Typed descriptor file to validate alongside the templates
    #[arg(short, long)]
    descriptor: Option<PathBuf>,
}

pub fn execute(args: ValidateArgs) -> Result<()> {
    let mut all_passed = true;

    println!("📋 Validating templates...");
    for path in template_files(&args.template) {
        match fs::read_to_string(&path) {
            Ok(source) => match Template::parse(&source) {
                Ok(_) => println!("   ✅ {}", path.display()),
                Err(e) => {
                    all_passed = false;
                    println!("   ❌ {}: {}", path.display(), e);
                }
            },
            Err(e) => {
                all_passed = false;
                println!("   ❌ {}: {}", path.display(), e);
            }
        }
    }

    if let Some(descriptor_path) = &args.descriptor {
        println!("📦 Validating descriptor...");
        info!("Reading descriptor {:?}", descriptor_path);

        let descriptor = DescriptorReader::read_descriptor(descriptor_path)?;
        let result = DescriptorValidator::validate(&descriptor);

        if result.valid {
            println!("   ✅ Descriptor validation passed");
        } else {
            all_passed = false;
            println!("   ❌ Descriptor validation failed:");
            for error in &result.errors {
                println!("      - {}", error);
            }
        }
        for warning in &result.warnings {
            println!("   ⚠️  {}", warning);
        }
    }

    if !all_passed {
        anyhow::bail!("validation failed");
    }
    Ok(())
}

/// Collect template files: the file itself, or every template-typed
/// file under a chart directory.
fn template_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    WalkDir::new(path)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.path().to_path_buf())
        .filter(|p| {
            let extension = p
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            matches!(
                extension.as_str(),
                "yaml" | "yml" | "json" | "tf" | "hcl" | "tfvars" | "tpl"
            )
        })
        .collect()
}
