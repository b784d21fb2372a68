//! Validation command (`barsheet validate`).

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use barsheet::{split_codes, validate};
use clap::Args;

use crate::cli::utils::read_text_arg;

/// Args for `barsheet validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Codes as inline text, one per line (default: read from stdin).
    #[arg(long)]
    pub text: Option<String>,
    /// Input file (`-` for stdin).
    #[arg(long = "from")]
    pub from: Option<PathBuf>,
    /// Emit the issue list as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn handle(args: ValidateArgs) -> Result<()> {
    let raw = read_text_arg(args.text, args.from)?;
    let codes = split_codes(&raw);
    let issues = validate(&codes);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&issues)?);
    } else if issues.is_empty() {
        println!("{} code(s) passed validation", codes.len());
    } else {
        for issue in &issues {
            eprintln!("line {}: {}", issue.line_number, issue.message);
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(anyhow!(
            "{} of {} code(s) failed validation",
            issues.len(),
            codes.len()
        ))
    }
}
