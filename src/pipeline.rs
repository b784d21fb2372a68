use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::barcode::{BarcodeRenderer, RenderError};
use crate::emit::{emitter_for, EmitError};
use crate::layout::plan;
use crate::profiles::OutputFormat;
use crate::validate::{split_codes, validate, ValidationIssue};

#[derive(Debug, Error)]
pub enum GenerateError {
    /// The full validation batch; nothing was rendered.
    #[error("{} code(s) failed validation", .0.len())]
    Rejected(Vec<ValidationIssue>),
    #[error("no codes found in the input")]
    NoCodes,
    #[error("failed to render barcode for '{code}'")]
    Render {
        code: String,
        #[source]
        source: RenderError,
    },
    #[error("failed to emit the {format} document")]
    Emit {
        format: OutputFormat,
        #[source]
        source: EmitError,
    },
    #[error("failed to write the generated document")]
    Persist(#[from] io::Error),
}

/// A fully built, not yet persisted document.
#[derive(Debug, Clone)]
pub struct SheetDocument {
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
    pub code_count: usize,
    pub page_count: usize,
}

/// Chooses where a generated document lands.
///
/// Returning `Ok(None)` means the destination was declined; the
/// pipeline reports a canceled outcome instead of an error. Injected at
/// call time so tests and scripted callers stay deterministic.
pub trait DestinationResolver {
    fn resolve(&self, suggested_name: &str) -> io::Result<Option<PathBuf>>;
}

/// Always writes to one fixed path.
pub struct FixedDestination(pub PathBuf);

impl DestinationResolver for FixedDestination {
    fn resolve(&self, _suggested_name: &str) -> io::Result<Option<PathBuf>> {
        Ok(Some(self.0.clone()))
    }
}

/// Drops the document into a directory under the suggested name.
pub struct DirectoryDestination(pub PathBuf);

impl DestinationResolver for DirectoryDestination {
    fn resolve(&self, suggested_name: &str) -> io::Result<Option<PathBuf>> {
        Ok(Some(self.0.join(suggested_name)))
    }
}

/// Terminal state of one generation request.
#[derive(Debug)]
pub enum Outcome {
    Written {
        path: PathBuf,
        document: SheetDocument,
    },
    /// The destination step declined; not a failure.
    Canceled,
}

/// Default output name: `barcode_<date>_<time>.<ext>` in local time.
pub fn default_file_name(format: OutputFormat, at: DateTime<Local>) -> String {
    format!(
        "barcode_{}.{}",
        at.format("%Y-%m-%d_%H-%M-%S"),
        format.extension()
    )
}

/// Validate, render, lay out, and emit `raw_text` as one in-memory
/// document.
///
/// Validation runs first and blocks all rendering: if any code is
/// rejected the whole batch is returned and no image work happens.
/// Rendering walks the codes in input order, which the layout stage
/// depends on.
pub fn build_document(
    raw_text: &str,
    format: OutputFormat,
    renderer: &dyn BarcodeRenderer,
) -> Result<SheetDocument, GenerateError> {
    let codes = split_codes(raw_text);
    if codes.is_empty() {
        return Err(GenerateError::NoCodes);
    }
    let issues = validate(&codes);
    if !issues.is_empty() {
        return Err(GenerateError::Rejected(issues));
    }

    let mut assets = Vec::with_capacity(codes.len());
    for code in &codes {
        let asset = renderer
            .render(code)
            .map_err(|source| GenerateError::Render {
                code: code.clone(),
                source,
            })?;
        assets.push(asset);
    }

    let profile = format.profile();
    let layout = plan(&assets, &profile);
    let bytes = emitter_for(format)
        .emit(&assets, &layout, &profile)
        .map_err(|source| GenerateError::Emit { format, source })?;
    Ok(SheetDocument {
        format,
        bytes,
        code_count: codes.len(),
        page_count: layout.page_count,
    })
}

/// `build_document` plus persistence through the injected resolver.
/// The buffer is complete before the destination is even resolved, so
/// a failed or declined save never leaves a partial file behind.
pub fn generate(
    raw_text: &str,
    format: OutputFormat,
    renderer: &dyn BarcodeRenderer,
    resolver: &dyn DestinationResolver,
) -> Result<Outcome, GenerateError> {
    let document = build_document(raw_text, format, renderer)?;
    let suggested = default_file_name(format, Local::now());
    let Some(path) = resolver.resolve(&suggested)? else {
        return Ok(Outcome::Canceled);
    };
    fs::write(&path, &document.bytes)?;
    Ok(Outcome::Written { path, document })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::{BarcodeAsset, Code128Renderer};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    struct CountingRenderer(std::cell::Cell<usize>);

    impl BarcodeRenderer for CountingRenderer {
        fn render(&self, code: &str) -> Result<BarcodeAsset, RenderError> {
            self.0.set(self.0.get() + 1);
            Ok(BarcodeAsset {
                code: code.to_string(),
                image_bytes: Code128Renderer::default().render(code)?.image_bytes,
                width_px: 10,
                height_px: 10,
            })
        }
    }

    struct DecliningResolver;

    impl DestinationResolver for DecliningResolver {
        fn resolve(&self, _suggested_name: &str) -> io::Result<Option<PathBuf>> {
            Ok(None)
        }
    }

    #[test]
    fn validation_failure_blocks_all_rendering() {
        let renderer = CountingRenderer(std::cell::Cell::new(0));
        let err = build_document("04018-28\nM4018-29", OutputFormat::Pdf, &renderer).unwrap_err();
        match err {
            GenerateError::Rejected(issues) => {
                assert_eq!(issues.len(), 1);
                assert_eq!(issues[0].code, "04018-28");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(renderer.0.get(), 0);
    }

    #[test]
    fn empty_input_is_guarded_before_layout() {
        let renderer = Code128Renderer::default();
        let err = build_document(" \n \n", OutputFormat::Docx, &renderer).unwrap_err();
        assert!(matches!(err, GenerateError::NoCodes));
    }

    #[test]
    fn unencodable_code_names_the_offender() {
        let renderer = Code128Renderer::default();
        let err = build_document("OK-1\nBAD\u{2603}", OutputFormat::Pdf, &renderer).unwrap_err();
        match err {
            GenerateError::Render { code, .. } => assert_eq!(code, "BAD\u{2603}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn build_reports_counts() {
        let renderer = Code128Renderer::default();
        let document = build_document("A-1\nB-2\nC-3", OutputFormat::Pdf, &renderer).unwrap();
        assert_eq!(document.code_count, 3);
        assert_eq!(document.page_count, 1);
        assert!(!document.bytes.is_empty());
    }

    #[test]
    fn declined_destination_is_a_canceled_outcome() {
        let renderer = Code128Renderer::default();
        let outcome = generate("A-1", OutputFormat::Pdf, &renderer, &DecliningResolver).unwrap();
        assert!(matches!(outcome, Outcome::Canceled));
    }

    #[test]
    fn default_file_name_uses_the_timestamp() {
        let at = Local.with_ymd_and_hms(2025, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            default_file_name(OutputFormat::Docx, at),
            "barcode_2025-03-09_14-05-07.docx"
        );
    }
}
