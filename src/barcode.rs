use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageFormat, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use thiserror::Error;

use crate::encoding::{Code128, EncodeError};

/// Quiet zone on each side of the symbol, in modules.
pub const QUIET_ZONE_MODULES: u32 = 10;

/// One rendered barcode, ready for layout and embedding.
///
/// Ownership is transient: assets are produced once per accepted code,
/// consumed by the emitter, and dropped with the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeAsset {
    pub code: String,
    /// PNG-encoded raster.
    pub image_bytes: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

/// Options controlling barcode rasterization.
#[derive(Debug, Clone, Copy)]
pub struct RasterOptions {
    /// Pixels per module.
    pub module_width: u32,
    /// Bar height in pixels.
    pub bar_height: u32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            module_width: 2,
            bar_height: 60,
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("failed to encode barcode raster")]
    Raster(#[from] image::ImageError),
}

/// Turns one code into a rasterized barcode.
///
/// Contract: each call is independent and the caller consumes results
/// in the same order it issued the calls. An implementation that fans
/// rendering out must therefore return results per call rather than
/// reordering a batch; the layout stage depends on input order.
pub trait BarcodeRenderer {
    fn render(&self, code: &str) -> Result<BarcodeAsset, RenderError>;
}

/// Code 128 renderer producing black-on-white PNG rasters.
pub struct Code128Renderer {
    options: RasterOptions,
}

impl Code128Renderer {
    pub fn new(options: RasterOptions) -> Self {
        Self {
            options: RasterOptions {
                module_width: options.module_width.clamp(1, 10),
                bar_height: options.bar_height.clamp(16, 400),
            },
        }
    }
}

impl Default for Code128Renderer {
    fn default() -> Self {
        Self::new(RasterOptions::default())
    }
}

impl BarcodeRenderer for Code128Renderer {
    fn render(&self, code: &str) -> Result<BarcodeAsset, RenderError> {
        let pattern = Code128::encode(code)?;
        let module = self.options.module_width;
        let width = (pattern.total_modules() + 2 * QUIET_ZONE_MODULES) * module;
        let height = self.options.bar_height;

        let mut raster: ImageBuffer<Luma<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(width, height, Luma([0xff]));
        let mut x = QUIET_ZONE_MODULES * module;
        for (idx, span) in pattern.widths().iter().enumerate() {
            let span_px = u32::from(*span) * module;
            // Even positions are bars, odd positions are spaces.
            if idx % 2 == 0 {
                draw_filled_rect_mut(
                    &mut raster,
                    Rect::at(x as i32, 0).of_size(span_px, height),
                    Luma([0x00]),
                );
            }
            x += span_px;
        }

        let mut image_bytes = Vec::new();
        DynamicImage::ImageLuma8(raster)
            .write_to(&mut Cursor::new(&mut image_bytes), ImageFormat::Png)?;
        Ok(BarcodeAsset {
            code: code.to_string(),
            image_bytes,
            width_px: width,
            height_px: height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn raster_dimensions_follow_the_module_count() {
        let renderer = Code128Renderer::new(RasterOptions {
            module_width: 2,
            bar_height: 40,
        });
        // "A" is 3 symbols + stop = 46 modules, plus two quiet zones.
        let asset = renderer.render("A").unwrap();
        assert_eq!(asset.width_px, (46 + 20) * 2);
        assert_eq!(asset.height_px, 40);
    }

    #[test]
    fn output_is_png() {
        let asset = Code128Renderer::default().render("M4018-29").unwrap();
        assert_eq!(&asset.image_bytes[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn rendering_is_deterministic() {
        let renderer = Code128Renderer::default();
        let a = renderer.render("ABC-001").unwrap();
        let b = renderer.render("ABC-001").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unencodable_text_surfaces_the_encoding_error() {
        let err = Code128Renderer::default().render("\u{2603}").unwrap_err();
        assert!(matches!(err, RenderError::Encode(_)));
    }

    #[test]
    fn options_are_clamped_to_sane_bounds() {
        let renderer = Code128Renderer::new(RasterOptions {
            module_width: 0,
            bar_height: 5,
        });
        let asset = renderer.render("A").unwrap();
        assert_eq!(asset.width_px, 46 + 20);
        assert_eq!(asset.height_px, 16);
    }
}
