//! Shared clap helper types for CLI commands.

use barsheet::OutputFormat;
use clap::ValueEnum;

/// Output container flags accepted by CLI commands.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormatArg {
    Docx,
    Xlsx,
    Pdf,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(value: OutputFormatArg) -> OutputFormat {
        match value {
            OutputFormatArg::Docx => OutputFormat::Docx,
            OutputFormatArg::Xlsx => OutputFormat::Xlsx,
            OutputFormatArg::Pdf => OutputFormat::Pdf,
        }
    }
}
