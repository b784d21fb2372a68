use std::fmt::Write as _;
use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::barcode::BarcodeAsset;
use crate::layout::{Cell, FormatProfile, LayoutPlan};

use super::{escape_xml, DocumentEmitter, EmitError};

// A4 section geometry in DXA. The word container paginates itself;
// these only size the page the table flows onto.
const PAGE_WIDTH: u32 = 11906;
const PAGE_HEIGHT: u32 = 16838;
const PAGE_MARGIN: u32 = 720;

// One DXA is 1/20 pt; one point is 12700 EMU.
const EMU_PER_DXA: u64 = 635;

/// WordprocessingML package writer.
///
/// The grid is a fixed-layout borderless table: one table cell per
/// occupied placement (centered image drawing over a centered label
/// paragraph), and one genuinely empty cell per placeholder so every
/// row spans the full table width.
pub struct DocxEmitter;

impl DocumentEmitter for DocxEmitter {
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
        zip.write_all(content_types().as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(root_relationships().as_bytes())?;

        zip.start_file("word/document.xml", options)?;
        zip.write_all(document_xml(assets, plan, profile).as_bytes())?;

        zip.start_file("word/_rels/document.xml.rels", options)?;
        zip.write_all(document_relationships(assets.len()).as_bytes())?;

        for (idx, asset) in assets.iter().enumerate() {
            zip.start_file(format!("word/media/image{}.png", idx + 1), options)?;
            zip.write_all(&asset.image_bytes)?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

fn content_types() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
        r#"<Default Extension="xml" ContentType="application/xml"/>"#,
        r#"<Default Extension="png" ContentType="image/png"/>"#,
        r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
        r#"</Types>"#,
    )
    .to_string()
}

fn root_relationships() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
        r#"</Relationships>"#,
    )
    .to_string()
}

fn document_relationships(image_count: usize) -> String {
    let mut xml = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    ));
    for idx in 0..image_count {
        let _ = write!(
            xml,
            r#"<Relationship Id="rIdImg{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image{n}.png"/>"#,
            n = idx + 1,
        );
    }
    xml.push_str("</Relationships>");
    xml
}

fn document_xml(assets: &[BarcodeAsset], plan: &LayoutPlan, profile: &FormatProfile) -> String {
    let mut xml = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<w:document"#,
        r#" xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#,
        r#" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing""#,
        r#" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main""#,
        r#" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture""#,
        r#" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        r#"<w:body>"#,
    ));

    if plan.placements.is_empty() {
        xml.push_str("<w:p/>");
    } else {
        write_table(&mut xml, assets, plan, profile);
    }

    let _ = write!(
        xml,
        concat!(
            r#"<w:sectPr>"#,
            r#"<w:pgSz w:w="{pw}" w:h="{ph}"/>"#,
            r#"<w:pgMar w:top="{m}" w:right="{m}" w:bottom="{m}" w:left="{m}" w:header="708" w:footer="708" w:gutter="0"/>"#,
            r#"</w:sectPr></w:body></w:document>"#,
        ),
        pw = PAGE_WIDTH,
        ph = PAGE_HEIGHT,
        m = PAGE_MARGIN,
    );
    xml
}

fn write_table(
    xml: &mut String,
    assets: &[BarcodeAsset],
    plan: &LayoutPlan,
    profile: &FormatProfile,
) {
    let cell_width = profile.cell_width as u32;
    let table_width = cell_width * profile.columns_per_row as u32;

    let _ = write!(
        xml,
        concat!(
            r#"<w:tbl><w:tblPr>"#,
            r#"<w:tblW w:w="{tw}" w:type="dxa"/>"#,
            r#"<w:tblLayout w:type="fixed"/>"#,
            r#"<w:tblBorders>"#,
            r#"<w:top w:val="none" w:sz="0" w:space="0" w:color="auto"/>"#,
            r#"<w:left w:val="none" w:sz="0" w:space="0" w:color="auto"/>"#,
            r#"<w:bottom w:val="none" w:sz="0" w:space="0" w:color="auto"/>"#,
            r#"<w:right w:val="none" w:sz="0" w:space="0" w:color="auto"/>"#,
            r#"<w:insideH w:val="none" w:sz="0" w:space="0" w:color="auto"/>"#,
            r#"<w:insideV w:val="none" w:sz="0" w:space="0" w:color="auto"/>"#,
            r#"</w:tblBorders></w:tblPr><w:tblGrid>"#,
        ),
        tw = table_width,
    );
    for _ in 0..profile.columns_per_row {
        let _ = write!(xml, r#"<w:gridCol w:w="{cell_width}"/>"#);
    }
    xml.push_str("</w:tblGrid>");

    for row in plan.rows() {
        xml.push_str("<w:tr>");
        for cell in row {
            match cell {
                Cell::Occupied(placement) => {
                    let asset = &assets[placement.index];
                    write_barcode_cell(xml, cell_width, placement.index, asset, profile);
                }
                Cell::Empty => {
                    let _ = write!(
                        xml,
                        r#"<w:tc><w:tcPr><w:tcW w:w="{cell_width}" w:type="dxa"/></w:tcPr><w:p/></w:tc>"#,
                    );
                }
            }
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
}

fn write_barcode_cell(
    xml: &mut String,
    cell_width: u32,
    index: usize,
    asset: &BarcodeAsset,
    profile: &FormatProfile,
) {
    let cx = profile.image_width as u64 * EMU_PER_DXA;
    let cy = profile.image_height as u64 * EMU_PER_DXA;
    let n = index + 1;
    let _ = write!(
        xml,
        concat!(
            r#"<w:tc><w:tcPr><w:tcW w:w="{cw}" w:type="dxa"/></w:tcPr>"#,
            r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:drawing>"#,
            r#"<wp:inline distT="0" distB="0" distL="0" distR="0">"#,
            r#"<wp:extent cx="{cx}" cy="{cy}"/>"#,
            r#"<wp:docPr id="{n}" name="barcode{n}"/>"#,
            r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
            r#"<pic:pic>"#,
            r#"<pic:nvPicPr><pic:cNvPr id="{n}" name="barcode{n}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
            r#"<pic:blipFill><a:blip r:embed="rIdImg{n}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
            r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr>"#,
            r#"</pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"#,
            r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t xml:space="preserve">{label}</w:t></w:r></w:p>"#,
            r#"</w:tc>"#,
        ),
        cw = cell_width,
        cx = cx,
        cy = cy,
        n = n,
        label = escape_xml(&asset.code),
    );
}
