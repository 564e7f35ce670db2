//! maniforge CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Validation failure
//! - 4: Template error
//! - 5: Output integrity error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{Cli, Commands};

use mani_engine::EngineError;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
    pub const OUTPUT_ERROR: u8 = 5;
}

fn main() -> ExitCode {
    // Initialize logging
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(
            EnvFilter::from_default_env()
                .add_directive("mani=info".parse().unwrap())
                .add_directive("warn".parse().unwrap()),
        )
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render(args) => commands::render::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Vars(args) => commands::vars::execute(args),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    if let Some(engine_error) = e.downcast_ref::<EngineError>() {
        return match engine_error {
            EngineError::Template(_) => ExitCodes::TEMPLATE_ERROR,
            EngineError::Output(_) => ExitCodes::OUTPUT_ERROR,
            EngineError::Descriptor(_) => ExitCodes::VALIDATION_FAILURE,
            _ => ExitCodes::GENERAL_ERROR,
        };
    }
    if e.downcast_ref::<mani_template::TemplateError>().is_some() {
        return ExitCodes::TEMPLATE_ERROR;
    }
    if e.downcast_ref::<mani_output::OutputError>().is_some() {
        return ExitCodes::OUTPUT_ERROR;
    }
    if e.downcast_ref::<mani_descriptor::DescriptorError>().is_some() {
        return ExitCodes::VALIDATION_FAILURE;
    }

    let msg = e.to_string().to_lowercase();
    if msg.contains("validation") {
        ExitCodes::VALIDATION_FAILURE
    } else if msg.contains("argument") || msg.contains("not found") {
        ExitCodes::INVALID_ARGS
    } else {
        ExitCodes::GENERAL_ERROR
    }
}
