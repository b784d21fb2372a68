use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::barcode::BarcodeAsset;
use crate::layout::{FormatProfile, LayoutPlan};

use super::{DocumentEmitter, EmitError};

const LABEL_FONT_SIZE: f32 = 9.0;
// Helvetica metrics are not embedded; labels are centered with an
// average glyph width of roughly half the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// Fixed-layout page writer.
///
/// One page object per layout page; barcode rasters are embedded as
/// zlib-compressed DeviceGray image XObjects, each drawn at its
/// placement with its label centered underneath in Helvetica.
pub struct PdfEmitter;

impl DocumentEmitter for PdfEmitter {
    fn emit(
        &self,
        assets: &[BarcodeAsset],
        plan: &LayoutPlan,
        profile: &FormatProfile,
    ) -> Result<Vec<u8>, EmitError> {
        let page_geometry = profile
            .page
            .ok_or(EmitError::MissingPageGeometry(profile.name))?;

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let mut xobjects = lopdf::Dictionary::new();
        for (idx, asset) in assets.iter().enumerate() {
            let image_id = doc.add_object(image_xobject(asset)?);
            xobjects.set(format!("Im{idx}"), Object::Reference(image_id));
        }
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
            "XObject" => Object::Dictionary(xobjects),
        });

        let mut kids: Vec<Object> = Vec::with_capacity(plan.page_count);
        for page_index in 0..plan.page_count {
            let operations = page_operations(assets, plan, profile, page_geometry.height, page_index);
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => plan.page_count as i64,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    page_geometry.width.into(),
                    page_geometry.height.into(),
                ],
                "Resources" => resources_id,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

fn image_xobject(asset: &BarcodeAsset) -> Result<Stream, EmitError> {
    let raster = image::load_from_memory(&asset.image_bytes)?.to_luma8();
    let (width, height) = raster.dimensions();
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(raster.as_raw())?;
    let data = encoder.finish()?;
    Ok(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        },
        data,
    ))
}

// Layout positions grow downward from the top margin; PDF user space
// grows upward from the bottom-left corner.
fn page_operations(
    assets: &[BarcodeAsset],
    plan: &LayoutPlan,
    profile: &FormatProfile,
    page_height: f32,
    page_index: usize,
) -> Vec<Operation> {
    let mut operations = Vec::new();
    for placement in plan.placements_on_page(page_index) {
        let image_bottom = page_height - placement.y - profile.image_height;
        operations.push(Operation::new("q", vec![]));
        operations.push(Operation::new(
            "cm",
            vec![
                profile.image_width.into(),
                0.into(),
                0.into(),
                profile.image_height.into(),
                placement.image_x.into(),
                image_bottom.into(),
            ],
        ));
        operations.push(Operation::new(
            "Do",
            vec![Object::Name(format!("Im{}", placement.index).into_bytes())],
        ));
        operations.push(Operation::new("Q", vec![]));

        let label = &assets[placement.index].code;
        let text_width = label.chars().count() as f32 * LABEL_FONT_SIZE * AVG_GLYPH_WIDTH;
        let text_x = placement.x + (profile.cell_width - text_width) / 2.0;
        let baseline = page_height - placement.label_y - LABEL_FONT_SIZE;
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec!["F1".into(), LABEL_FONT_SIZE.into()],
        ));
        operations.push(Operation::new("Td", vec![text_x.into(), baseline.into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(label.as_str())],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    operations
}
