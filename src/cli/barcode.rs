//! Single-barcode rendering command (`barsheet barcode`).

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use barsheet::{BarcodeRenderer, Code128Renderer, RasterOptions};
use clap::Args;

/// Args for `barsheet barcode`.
#[derive(Args, Debug)]
pub struct BarcodeArgs {
    /// The code to render.
    pub code: String,
    /// Output PNG file.
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
    /// Pixels per barcode module.
    #[arg(long = "module-width", default_value_t = 2)]
    pub module_width: u32,
    /// Bar height in pixels.
    #[arg(long = "bar-height", default_value_t = 60)]
    pub bar_height: u32,
}

pub fn handle(args: BarcodeArgs) -> Result<()> {
    let renderer = Code128Renderer::new(RasterOptions {
        module_width: args.module_width,
        bar_height: args.bar_height,
    });
    let asset = renderer
        .render(&args.code)
        .with_context(|| format!("failed to render '{}'", args.code))?;
    fs::write(&args.output, &asset.image_bytes)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!(
        "Rendered {}x{} px barcode to {}",
        asset.width_px,
        asset.height_px,
        args.output.display()
    );
    Ok(())
}
