//! Core library for Code-128 barcode sheet generation.

mod barcode;
mod emit;
mod encoding;
mod layout;
mod pipeline;
mod profiles;
mod validate;

pub use barcode::{
    BarcodeAsset, BarcodeRenderer, Code128Renderer, QUIET_ZONE_MODULES, RasterOptions, RenderError,
};
pub use emit::{emitter_for, DocumentEmitter, DocxEmitter, EmitError, PdfEmitter, XlsxEmitter};
pub use encoding::{Code128, EncodeError, ModulePattern};
pub use layout::{plan, Cell, FormatProfile, LayoutPlan, PageGeometry, Placement, ShortRowPolicy};
pub use pipeline::{
    build_document, default_file_name, generate, DestinationResolver, DirectoryDestination,
    FixedDestination, GenerateError, Outcome, SheetDocument,
};
pub use profiles::OutputFormat;
pub use validate::{split_codes, validate, ValidationIssue};

use anyhow::Result;

/// Validates `raw_text` and builds the complete document buffer with
/// the default Code-128 renderer.
pub fn build_sheet(raw_text: &str, format: OutputFormat) -> Result<SheetDocument> {
    let renderer = Code128Renderer::default();
    Ok(build_document(raw_text, format, &renderer)?)
}
