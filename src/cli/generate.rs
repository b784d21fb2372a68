//! Sheet generation command (`barsheet generate`).

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use barsheet::{
    generate, Code128Renderer, DestinationResolver, DirectoryDestination, FixedDestination,
    GenerateError, Outcome, RasterOptions,
};
use clap::Args;

use crate::cli::common::OutputFormatArg;
use crate::cli::utils::read_text_arg;

/// Args for `barsheet generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Codes as inline text, one per line (default: read from stdin).
    #[arg(long)]
    pub text: Option<String>,
    /// Input file (`-` for stdin).
    #[arg(long = "from")]
    pub from: Option<PathBuf>,
    /// Output container format.
    #[arg(long, value_enum)]
    pub format: OutputFormatArg,
    /// Output file or directory (default: timestamped name in the
    /// current directory).
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Pixels per barcode module.
    #[arg(long = "module-width", default_value_t = 2)]
    pub module_width: u32,
    /// Bar height in pixels.
    #[arg(long = "bar-height", default_value_t = 60)]
    pub bar_height: u32,
}

pub fn handle(args: GenerateArgs) -> Result<()> {
    let raw = read_text_arg(args.text, args.from)?;
    let renderer = Code128Renderer::new(RasterOptions {
        module_width: args.module_width,
        bar_height: args.bar_height,
    });
    let resolver: Box<dyn DestinationResolver> = match args.output {
        Some(path) if path.is_dir() => Box::new(DirectoryDestination(path)),
        Some(path) => Box::new(FixedDestination(path)),
        None => Box::new(DirectoryDestination(PathBuf::from("."))),
    };

    match generate(&raw, args.format.into(), &renderer, resolver.as_ref()) {
        Ok(Outcome::Written { path, document }) => {
            println!(
                "Wrote {} barcode(s) to {} ({} page(s))",
                document.code_count,
                path.display(),
                document.page_count
            );
            Ok(())
        }
        Ok(Outcome::Canceled) => {
            println!("Generation canceled before saving");
            Ok(())
        }
        Err(GenerateError::Rejected(issues)) => {
            for issue in &issues {
                eprintln!("line {}: {}", issue.line_number, issue.message);
            }
            Err(anyhow!(
                "{} code(s) failed validation; nothing was generated",
                issues.len()
            ))
        }
        Err(err) => Err(err.into()),
    }
}
