//! Command-line interface wiring for the `barsheet` binary.
//!
//! This module owns the clap definitions and delegates execution to
//! specialized submodules that encapsulate each command.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod barcode;
pub mod common;
pub mod generate;
pub mod utils;
pub mod validate;

/// Parsed CLI entrypoint for the `barsheet` binary.
#[derive(Parser, Debug)]
#[command(
    name = "barsheet",
    version,
    about = "Turn code lists into printable Code-128 barcode sheets"
)]
pub struct Cli {
    /// Top-level command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Commands made available to end users.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check a code list against the input rules without generating.
    Validate(validate::ValidateArgs),
    /// Generate a barcode sheet document from a code list.
    Generate(generate::GenerateArgs),
    /// Render a single code as a PNG barcode.
    Barcode(barcode::BarcodeArgs),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Validate(args) => validate::handle(args),
        Command::Generate(args) => generate::handle(args),
        Command::Barcode(args) => barcode::handle(args),
    }
}
