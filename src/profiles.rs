use std::fmt;

use crate::layout::{FormatProfile, PageGeometry, ShortRowPolicy};

/// The three supported output containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Docx,
    Xlsx,
    Pdf,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Docx => "docx",
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Pdf => "pdf",
        }
    }

    /// The built-in geometric profile for this container.
    pub fn profile(&self) -> FormatProfile {
        match self {
            OutputFormat::Docx => WORD_DOCUMENT.clone(),
            OutputFormat::Xlsx => SPREADSHEET.clone(),
            OutputFormat::Pdf => PAGE.clone(),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Word-processor grid, in DXA (twentieths of a point) on an A4 page.
/// The container paginates itself, so the engine sees a continuous
/// flow; short rows are padded so the table stays rectangular.
static WORD_DOCUMENT: FormatProfile = FormatProfile {
    name: "word-document",
    columns_per_row: 4,
    cell_width: 2616.0,
    row_height: 1200.0,
    image_width: 1984.0,
    image_height: 680.0,
    label_height: 280.0,
    label_gap: 80.0,
    page: None,
    short_rows: ShortRowPolicy::PadWithBlanks,
};

/// Spreadsheet grid, in pixels. One continuous sheet; short rows are
/// padded with empty cells to keep the used range rectangular.
static SPREADSHEET: FormatProfile = FormatProfile {
    name: "spreadsheet",
    columns_per_row: 5,
    cell_width: 170.0,
    row_height: 75.0,
    image_width: 150.0,
    image_height: 50.0,
    label_height: 20.0,
    label_gap: 0.0,
    page: None,
    short_rows: ShortRowPolicy::PadWithBlanks,
};

/// Fixed-layout page grid, in points on an A4 page. The engine owns
/// pagination here; a short final row simply stops drawing early.
static PAGE: FormatProfile = FormatProfile {
    name: "page",
    columns_per_row: 4,
    cell_width: 126.0,
    row_height: 64.0,
    image_width: 108.0,
    image_height: 36.0,
    label_height: 10.0,
    label_gap: 4.0,
    page: Some(PageGeometry {
        width: 595.0,
        height: 842.0,
        margin_left: 36.0,
        margin_top: 36.0,
        margin_right: 36.0,
        margin_bottom: 36.0,
    }),
    short_rows: ShortRowPolicy::TruncateRow,
};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn profiles_satisfy_the_engine_preconditions() {
        for format in [OutputFormat::Docx, OutputFormat::Xlsx, OutputFormat::Pdf] {
            let profile = format.profile();
            assert!(profile.columns_per_row >= 1, "{}", profile.name);
            assert!(profile.image_width > 0.0 && profile.image_height > 0.0);
            if let Some(capacity) = profile.rows_per_page() {
                assert!(capacity >= 1, "{}", profile.name);
            }
        }
    }

    #[test]
    fn only_the_page_profile_paginates() {
        assert!(OutputFormat::Docx.profile().page.is_none());
        assert!(OutputFormat::Xlsx.profile().page.is_none());
        assert!(OutputFormat::Pdf.profile().page.is_some());
    }

    #[test]
    fn page_profile_capacity_is_stable() {
        // usable height 770pt over 64pt rows.
        assert_eq!(OutputFormat::Pdf.profile().rows_per_page(), Some(12));
    }

    #[test]
    fn extensions_match_the_containers() {
        assert_eq!(OutputFormat::Docx.extension(), "docx");
        assert_eq!(OutputFormat::Xlsx.extension(), "xlsx");
        assert_eq!(OutputFormat::Pdf.extension(), "pdf");
    }
}
