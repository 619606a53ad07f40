//! PDF page backend: embeds a captured slip bitmap into a single A4 page.

use std::io::Cursor;

use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{Image, ImageTransform, Mm, PdfDocument};

use crate::error::{Error, Result};
use crate::rendering::Screenshot;
use crate::{PageBackend, PageOptions};

/// Passed as the image DPI so one raster pixel equals one millimetre before
/// scaling, which lets `scale_x`/`scale_y` carry the print size directly.
const MM_PER_INCH: f32 = 25.4;

#[derive(Debug, Default)]
pub struct PdfPageWriter;

impl PdfPageWriter {
    pub fn new() -> Self {
        Self
    }
}

impl PageBackend for PdfPageWriter {
    fn write_page(&self, capture: &Screenshot, options: &PageOptions) -> Result<Vec<u8>> {
        if capture.width == 0 || capture.height == 0 || capture.png_data.is_empty() {
            return Err(Error::PageError("empty capture".into()));
        }

        let decoder = PngDecoder::new(Cursor::new(capture.png_data.as_slice()))
            .map_err(|e| Error::PageError(format!("decode capture: {e}")))?;
        let image = Image::try_from(decoder)
            .map_err(|e| Error::PageError(format!("embed capture: {e}")))?;

        let (doc, page, layer) = PdfDocument::new(
            "ใบเสร็จรับเงิน",
            Mm(options.width_mm as f32),
            Mm(options.height_mm as f32),
            "slip",
        );
        let layer = doc.get_page(page).get_layer(layer);

        // The capture fills the page width at proportional height, pinned to
        // the top-left corner. PDF space grows upward, so the top edge sits
        // at page height minus image height; a capture taller than the page
        // simply runs off the bottom. printpdf geometry is f32, so the
        // millimetre values are narrowed only at this boundary.
        let mm_per_px = options.width_mm / capture.width as f64;
        let image_height_mm = capture.height as f64 * mm_per_px;
        image.add_to_layer(
            layer,
            ImageTransform {
                translate_x: Some(Mm(0.0)),
                translate_y: Some(Mm((options.height_mm - image_height_mm) as f32)),
                scale_x: Some(mm_per_px as f32),
                scale_y: Some(mm_per_px as f32),
                dpi: Some(MM_PER_INCH),
                ..Default::default()
            },
        );

        doc.save_to_bytes()
            .map_err(|e| Error::PageError(format!("serialise pdf: {e}")))
    }
}
