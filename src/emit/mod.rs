//! Document emitters: one implementation per output container.

use thiserror::Error;

use crate::barcode::BarcodeAsset;
use crate::layout::{FormatProfile, LayoutPlan};
use crate::profiles::OutputFormat;

mod docx;
mod pdf;
mod xlsx;

pub use docx::DocxEmitter;
pub use pdf::PdfEmitter;
pub use xlsx::XlsxEmitter;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to assemble the document package")]
    Package(#[from] zip::result::ZipError),
    #[error("failed to build the pdf document")]
    Pdf(#[from] lopdf::Error),
    #[error("failed to decode a barcode raster")]
    Raster(#[from] image::ImageError),
    #[error("profile '{0}' is missing page geometry")]
    MissingPageGeometry(&'static str),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Serializes a placement plan into one container format.
///
/// The buffer is built entirely in memory; implementations either
/// return the complete document bytes or an error, never a partial
/// file. Cells are equal-width and borderless in every format.
pub trait DocumentEmitter {
    fn emit(
        &self,
        assets: &[BarcodeAsset],
        plan: &LayoutPlan,
        profile: &FormatProfile,
    ) -> Result<Vec<u8>, EmitError>;
}

pub fn emitter_for(format: OutputFormat) -> Box<dyn DocumentEmitter> {
    match format {
        OutputFormat::Docx => Box::new(DocxEmitter),
        OutputFormat::Xlsx => Box::new(XlsxEmitter),
        OutputFormat::Pdf => Box::new(PdfEmitter),
    }
}

/// Minimal escaping for text placed into XML content or attributes.
pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
