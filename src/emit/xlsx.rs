use std::fmt::Write as _;
use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::barcode::BarcodeAsset;
use crate::layout::{Cell, FormatProfile, LayoutPlan};

use super::{escape_xml, DocumentEmitter, EmitError};

// One pixel is 9525 EMU; column widths are expressed in character
// units of roughly seven pixels each.
const EMU_PER_PX: u64 = 9525;
const PX_PER_CHAR: f32 = 7.0;
const PT_PER_PX: f32 = 0.75;

/// SpreadsheetML package writer.
///
/// Each grid row becomes two sheet rows: a tall image row with the
/// barcode anchored over the cell, and a label row carrying the code as
/// a centered inline string. Placeholder cells are written as empty
/// cells so the used range stays rectangular.
pub struct XlsxEmitter;

impl DocumentEmitter for XlsxEmitter {
    fn emit(
        &self,
        assets: &[BarcodeAsset],
        plan: &LayoutPlan,
        profile: &FormatProfile,
    ) -> Result<Vec<u8>, EmitError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options: FileOptions =
            FileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(content_types(!assets.is_empty()).as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(root_relationships().as_bytes())?;

        zip.start_file("xl/workbook.xml", options)?;
        zip.write_all(workbook_xml().as_bytes())?;

        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        zip.write_all(workbook_relationships().as_bytes())?;

        zip.start_file("xl/styles.xml", options)?;
        zip.write_all(styles_xml().as_bytes())?;

        zip.start_file("xl/worksheets/sheet1.xml", options)?;
        zip.write_all(worksheet_xml(assets, plan, profile).as_bytes())?;

        if !assets.is_empty() {
            zip.start_file("xl/worksheets/_rels/sheet1.xml.rels", options)?;
            zip.write_all(worksheet_relationships().as_bytes())?;

            zip.start_file("xl/drawings/drawing1.xml", options)?;
            zip.write_all(drawing_xml(plan, profile).as_bytes())?;

            zip.start_file("xl/drawings/_rels/drawing1.xml.rels", options)?;
            zip.write_all(drawing_relationships(assets.len()).as_bytes())?;

            for (idx, asset) in assets.iter().enumerate() {
                zip.start_file(format!("xl/media/image{}.png", idx + 1), options)?;
                zip.write_all(&asset.image_bytes)?;
            }
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

fn content_types(with_drawing: bool) -> String {
    let mut xml = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
        r#"<Default Extension="xml" ContentType="application/xml"/>"#,
        r#"<Default Extension="png" ContentType="image/png"/>"#,
        r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
        r#"<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
        r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
    ));
    if with_drawing {
        xml.push_str(
            r#"<Override PartName="/xl/drawings/drawing1.xml" ContentType="application/vnd.openxmlformats-officedocument.drawing+xml"/>"#,
        );
    }
    xml.push_str("</Types>");
    xml
}

fn root_relationships() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
        r#"</Relationships>"#,
    )
    .to_string()
}

fn workbook_xml() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main""#,
        r#" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        r#"<sheets><sheet name="Barcodes" sheetId="1" r:id="rId1"/></sheets>"#,
        r#"</workbook>"#,
    )
    .to_string()
}

fn workbook_relationships() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>"#,
        r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
        r#"</Relationships>"#,
    )
    .to_string()
}

// Style index 1 centers label cells; borders stay at the empty default
// everywhere.
fn styles_xml() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        r#"<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>"#,
        r#"<fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>"#,
        r#"<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>"#,
        r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#,
        r#"<cellXfs count="2">"#,
        r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>"#,
        r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0" applyAlignment="1"><alignment horizontal="center"/></xf>"#,
        r#"</cellXfs>"#,
        r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#,
        r#"</styleSheet>"#,
    )
    .to_string()
}

fn worksheet_xml(assets: &[BarcodeAsset], plan: &LayoutPlan, profile: &FormatProfile) -> String {
    let mut xml = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main""#,
        r#" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    ));

    let _ = write!(
        xml,
        r#"<cols><col min="1" max="{max}" width="{width:.2}" customWidth="1"/></cols>"#,
        max = profile.columns_per_row,
        width = profile.cell_width / PX_PER_CHAR,
    );

    xml.push_str("<sheetData>");
    let image_row_pt = profile.image_height * PT_PER_PX;
    let label_row_pt = profile.label_height * PT_PER_PX;
    for (grid_row, cells) in plan.rows().iter().enumerate() {
        let image_row = grid_row * 2 + 1;
        let label_row = image_row + 1;
        let _ = write!(
            xml,
            r#"<row r="{image_row}" ht="{image_row_pt:.2}" customHeight="1"/>"#,
        );
        let _ = write!(
            xml,
            r#"<row r="{label_row}" ht="{label_row_pt:.2}" customHeight="1">"#,
        );
        for (column, cell) in cells.iter().enumerate() {
            let reference = cell_reference(column, label_row);
            match cell {
                Cell::Occupied(placement) => {
                    let _ = write!(
                        xml,
                        r#"<c r="{reference}" s="1" t="inlineStr"><is><t xml:space="preserve">{label}</t></is></c>"#,
                        label = escape_xml(&assets[placement.index].code),
                    );
                }
                Cell::Empty => {
                    let _ = write!(xml, r#"<c r="{reference}" s="1"/>"#);
                }
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData>");

    if !assets.is_empty() {
        xml.push_str(r#"<drawing r:id="rId1"/>"#);
    }
    xml.push_str("</worksheet>");
    xml
}

fn worksheet_relationships() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing" Target="../drawings/drawing1.xml"/>"#,
        r#"</Relationships>"#,
    )
    .to_string()
}

fn drawing_xml(plan: &LayoutPlan, profile: &FormatProfile) -> String {
    let mut xml = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing""#,
        r#" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main""#,
        r#" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    ));

    let cx = profile.image_width as u64 * EMU_PER_PX;
    let cy = profile.image_height as u64 * EMU_PER_PX;
    let col_off = (((profile.cell_width - profile.image_width) / 2.0).max(0.0)) as u64 * EMU_PER_PX;
    for placement in &plan.placements {
        let n = placement.index + 1;
        let _ = write!(
            xml,
            concat!(
                r#"<xdr:oneCellAnchor>"#,
                r#"<xdr:from><xdr:col>{col}</xdr:col><xdr:colOff>{col_off}</xdr:colOff>"#,
                r#"<xdr:row>{row}</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from>"#,
                r#"<xdr:ext cx="{cx}" cy="{cy}"/>"#,
                r#"<xdr:pic>"#,
                r#"<xdr:nvPicPr><xdr:cNvPr id="{n}" name="barcode{n}"/><xdr:cNvPicPr/></xdr:nvPicPr>"#,
                r#"<xdr:blipFill><a:blip r:embed="rIdImg{n}"/><a:stretch><a:fillRect/></a:stretch></xdr:blipFill>"#,
                r#"<xdr:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
                r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></xdr:spPr>"#,
                r#"</xdr:pic><xdr:clientData/></xdr:oneCellAnchor>"#,
            ),
            col = placement.column,
            col_off = col_off,
            row = placement.row * 2,
            cx = cx,
            cy = cy,
            n = n,
        );
    }
    xml.push_str("</xdr:wsDr>");
    xml
}

fn drawing_relationships(image_count: usize) -> String {
    let mut xml = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    ));
    for idx in 0..image_count {
        let _ = write!(
            xml,
            r#"<Relationship Id="rIdImg{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image{n}.png"/>"#,
            n = idx + 1,
        );
    }
    xml.push_str("</Relationships>");
    xml
}

/// Spreadsheet cell reference such as `A1`, from 0-based column and
/// 1-based row.
fn cell_reference(column: usize, row: usize) -> String {
    let mut letters = Vec::new();
    let mut remainder = column;
    loop {
        letters.push(b'A' + (remainder % 26) as u8);
        if remainder < 26 {
            break;
        }
        remainder = remainder / 26 - 1;
    }
    letters.reverse();
    format!("{}{row}", String::from_utf8_lossy(&letters))
}
