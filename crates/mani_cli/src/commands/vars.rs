//! Vars command - List descriptor fields referenced by templates.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use walkdir::WalkDir;

use mani_template::Template;

#[derive(Args)]
pub struct VarsArgs {
    /// Template file or chart directory
    #[arg(short, long)]
    template: PathBuf,
}

pub fn execute(args: VarsArgs) -> Result<()> {
    let mut paths = BTreeSet::new();

    let files: Vec<PathBuf> = if args.template.is_file() {
        vec![args.template.clone()]
    } else {
        WalkDir::new(&args.template)
            .min_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .map(|e| e.path().to_path_buf())
            .collect()
    };

    for file in files {
        let source = match fs::read_to_string(&file) {
            Ok(source) => source,
            // Binary chart assets carry no directives.
            Err(_) => continue,
        };
        let template = Template::parse(&source)
            .with_context(|| format!("failed to parse template {:?}", file))?;
        paths.extend(template.referenced_paths());
    }

    for path in paths {
        println!("{}", path);
    }
    Ok(())
}
