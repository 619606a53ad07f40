//! Bitmap capture backend: replays the paint list onto an RGB canvas with
//! real glyphs and encodes it as PNG.

use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings};

use crate::error::{Error, Result};
use crate::rendering::layout::{self, Align, Rect};
use crate::rendering::paint::{self, Color, PaintCommand};
use crate::rendering::{ReceiptDocument, Screenshot};
use crate::{CaptureBackend, CaptureOptions};

/// Overrides font discovery with an explicit TTF path.
pub const FONT_PATH_ENV: &str = "RENTSLIP_FONT";

// Thai-capable fonts first; DejaVu is a last resort that at least keeps the
// digits and layout intact.
const FONT_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/tlwg/Garuda.ttf",
    "/usr/share/fonts/truetype/tlwg/Loma.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansThai-Regular.ttf",
    "/usr/share/fonts/noto/NotoSansThai-Regular.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
];

/// Finds a usable font file: explicit path, then [`FONT_PATH_ENV`], then the
/// search list. An explicit or env path that does not exist is an error
/// rather than a silent fallback.
pub fn locate_font(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(Error::InitializationError(format!(
            "font not found: {}",
            path.display()
        )));
    }
    if let Ok(value) = std::env::var(FONT_PATH_ENV) {
        let path = PathBuf::from(value);
        if path.is_file() {
            return Ok(path);
        }
        return Err(Error::InitializationError(format!(
            "{FONT_PATH_ENV} points at a missing file: {}",
            path.display()
        )));
    }
    for candidate in FONT_SEARCH_PATHS {
        let path = Path::new(candidate);
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
    }
    Err(Error::InitializationError(format!(
        "no usable font found; set {FONT_PATH_ENV} to a TTF with Thai glyphs"
    )))
}

/// The default capture backend. Owns the parsed font; rendering itself is
/// pure CPU work with no shared state.
pub struct SlipRaster {
    font: Font,
}

impl SlipRaster {
    pub fn new(font_path: Option<&Path>) -> Result<Self> {
        let path = locate_font(font_path)?;
        let data = std::fs::read(&path).map_err(|e| {
            Error::InitializationError(format!("read font {}: {e}", path.display()))
        })?;
        let font = Font::from_bytes(data, FontSettings::default()).map_err(|e| {
            Error::InitializationError(format!("parse font {}: {e}", path.display()))
        })?;
        log::debug!("slip raster using {}", path.display());
        Ok(Self { font })
    }

    /// Advance width of `text` at `px`. Combining marks carry a zero advance
    /// in the font, so stacked vowels and tone marks measure correctly.
    fn measure(&self, text: &str, px: f32) -> f32 {
        text.chars()
            .map(|c| self.font.metrics(c, px).advance_width)
            .sum()
    }

    fn line_extents(&self, px: f32) -> (f32, f32) {
        match self.font.horizontal_line_metrics(px) {
            Some(m) => (m.ascent, m.descent),
            None => (px * 0.8, -(px * 0.25)),
        }
    }

    fn draw_text(
        &self,
        canvas: &mut Canvas,
        rect: Rect,
        text: &str,
        px: f32,
        align: Align,
        bold: bool,
        color: Color,
    ) {
        let width = self.measure(text, px);
        let start_x = match align {
            Align::Left => rect.x as f32,
            Align::Center => rect.x as f32 + (rect.width as f32 - width) / 2.0,
            Align::Right => rect.x as f32 + rect.width as f32 - width,
        };
        // Centre the line's glyph extent inside its box; descent is negative.
        let (ascent, descent) = self.line_extents(px);
        let baseline =
            (rect.y as f32 + (rect.height as f32 + ascent + descent) / 2.0).round() as i32;
        // Poor man's bold: strike the glyph again one pixel to the right.
        let strikes: &[i32] = if bold { &[0, 1] } else { &[0] };

        let mut pen = start_x;
        for ch in text.chars() {
            let (metrics, coverage) = self.font.rasterize(ch, px);
            let left = (pen + metrics.xmin as f32).round() as i32;
            let top = baseline - (metrics.ymin + metrics.height as i32);
            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let cov = coverage[row * metrics.width + col];
                    if cov == 0 {
                        continue;
                    }
                    for dx in strikes {
                        canvas.blend(left + col as i32 + dx, top + row as i32, color, cov);
                    }
                }
            }
            pen += metrics.advance_width;
        }
    }
}

impl CaptureBackend for SlipRaster {
    fn capture(&self, document: &ReceiptDocument, options: &CaptureOptions) -> Result<Screenshot> {
        let scale = options.scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::CaptureError(format!("invalid capture scale {scale}")));
        }

        let sheet = layout::layout_document(document);
        let commands = paint::display_list(&sheet, options.background);

        let width = (sheet.width as f32 * scale).round() as u32;
        let height = (sheet.height as f32 * scale).round() as u32;
        if width == 0 || height == 0 {
            return Err(Error::CaptureError(format!(
                "capture collapsed to {width}x{height} at scale {scale}"
            )));
        }

        let mut canvas = Canvas::new(width, height, options.background);
        for command in &commands {
            match command {
                PaintCommand::Fill { rect, color } => {
                    canvas.fill_rect(scale_rect(rect, scale), *color);
                }
                PaintCommand::StrokeRect { rect, stroke, color } => {
                    let stroke = ((*stroke as f32 * scale).round() as u32).max(1);
                    canvas.stroke_rect(scale_rect(rect, scale), stroke, *color);
                }
                PaintCommand::Text {
                    rect,
                    text,
                    size,
                    align,
                    bold,
                    color,
                } => {
                    self.draw_text(
                        &mut canvas,
                        scale_rect(rect, scale),
                        text,
                        *size as f32 * scale,
                        *align,
                        *bold,
                        *color,
                    );
                }
            }
        }

        let png_data = canvas.encode_png()?;
        log::debug!("captured slip {width}x{height} at {scale:.1}x");
        Ok(Screenshot {
            width,
            height,
            png_data,
        })
    }
}

/// Scales by edges rather than by width so adjacent cell rects keep sharing
/// their border lines after rounding.
fn scale_rect(rect: &Rect, scale: f32) -> Rect {
    let x0 = (rect.x as f32 * scale).round() as i32;
    let y0 = (rect.y as f32 * scale).round() as i32;
    let x1 = ((rect.x + rect.width as i32) as f32 * scale).round() as i32;
    let y1 = ((rect.y + rect.height as i32) as f32 * scale).round() as i32;
    Rect {
        x: x0,
        y: y0,
        width: (x1 - x0).max(0) as u32,
        height: (y1 - y0).max(0) as u32,
    }
}

/// Plain RGB8 pixel buffer, opaque by construction.
struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    fn new(width: u32, height: u32, background: Color) -> Self {
        let mut data = vec![0u8; width as usize * height as usize * 3];
        for px in data.chunks_exact_mut(3) {
            px[0] = background.0;
            px[1] = background.1;
            px[2] = background.2;
        }
        Self {
            width,
            height,
            data,
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let x0 = rect.x.max(0) as u32;
        let y0 = rect.y.max(0) as u32;
        let x1 = ((rect.x + rect.width as i32).max(0) as u32).min(self.width);
        let y1 = ((rect.y + rect.height as i32).max(0) as u32).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let idx = ((y * self.width + x) * 3) as usize;
                self.data[idx] = color.0;
                self.data[idx + 1] = color.1;
                self.data[idx + 2] = color.2;
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: u32, color: Color) {
        if rect.width <= 2 * stroke || rect.height <= 2 * stroke {
            self.fill_rect(rect, color);
            return;
        }
        let s = stroke as i32;
        let w = rect.width;
        let h = rect.height;
        // Four bands just inside the rect edges.
        self.fill_rect(
            Rect {
                x: rect.x,
                y: rect.y,
                width: w,
                height: stroke,
            },
            color,
        );
        self.fill_rect(
            Rect {
                x: rect.x,
                y: rect.y + h as i32 - s,
                width: w,
                height: stroke,
            },
            color,
        );
        self.fill_rect(
            Rect {
                x: rect.x,
                y: rect.y + s,
                width: stroke,
                height: h - 2 * stroke,
            },
            color,
        );
        self.fill_rect(
            Rect {
                x: rect.x + w as i32 - s,
                y: rect.y + s,
                width: stroke,
                height: h - 2 * stroke,
            },
            color,
        );
    }

    fn blend(&mut self, x: i32, y: i32, color: Color, coverage: u8) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = ((y as u32 * self.width + x as u32) * 3) as usize;
        let a = coverage as u32;
        let channels = [color.0, color.1, color.2];
        for (i, c) in channels.into_iter().enumerate() {
            let dst = self.data[idx + i] as u32;
            self.data[idx + i] = ((c as u32 * a + dst * (255 - a)) / 255) as u8;
        }
    }

    fn encode_png(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| Error::CaptureError(format!("png header: {e}")))?;
        writer
            .write_image_data(&self.data)
            .map_err(|e| Error::CaptureError(format!("png body: {e}")))?;
        writer
            .finish()
            .map_err(|e| Error::CaptureError(format!("png finish: {e}")))?;
        Ok(out)
    }
}
