//! Rungsaeng Rent-Slip Engine
//!
//! A headless engine for the monthly rent receipts of Rungsaeng Apartment:
//! it computes the charges for a room, renders them as a fixed tabular slip,
//! rasterises the slip at print quality and exports it as a single-page A4
//! portrait PDF named after the room.
//!
//! # Pipeline
//!
//! - **Billing**: pure arithmetic over one month's readings ([`billing`])
//! - **Render**: record + charges → slip document ([`rendering`])
//! - **Capture**: document → PNG bitmap at 2x scale ([`rendering::raster`])
//! - **Page**: bitmap → A4 PDF bytes ([`pdf`])
//! - **Export**: async facade that runs capture and page on a worker thread
//!   and saves the result ([`export`])
//!
//! # Example
//!
//! ```no_run
//! use rentslip::{ChargeBreakdown, ExportConfig, Exporter, ReceiptRecord};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), rentslip::Error> {
//! let mut record = ReceiptRecord::new("101");
//! record.room_rate = 3000.0;
//! record.water_unit_start = 100;
//! record.water_unit_end = 120;
//!
//! let breakdown = ChargeBreakdown::compute(&record);
//! let document = rentslip::render(&record, &breakdown);
//! println!("{}", document.to_text());
//!
//! let exporter = Exporter::new(ExportConfig::default()).await?;
//! let path = exporter.export(&document).await?;
//! println!("saved {}", path.display());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

pub mod error;
pub use error::{Error, Result};

pub mod billing;
pub mod export;
pub mod format;
pub mod pdf;
pub mod rendering;

// Re-export the everyday types at the crate root.
pub use billing::{ChargeBreakdown, ReceiptRecord};
pub use export::{slip_file_name, Exporter};
pub use pdf::PdfPageWriter;
pub use rendering::paint::Color;
pub use rendering::raster::SlipRaster;
pub use rendering::{render, ReceiptDocument, Row, Screenshot};

/// A4 portrait page width in millimetres.
pub const A4_WIDTH_MM: f64 = 210.0;
/// A4 portrait page height in millimetres.
pub const A4_HEIGHT_MM: f64 = 297.0;

/// Settings for the capture stage.
///
/// The defaults reproduce the print pipeline the slips were designed for:
/// a 2x supersampled raster over an opaque white background, so thin table
/// borders survive the downscale into the PDF page.
#[derive(Debug, Clone, Copy)]
pub struct CaptureOptions {
    /// Raster scale relative to sheet pixels.
    pub scale: f32,
    /// Background the sheet is composited onto; captures are always opaque.
    pub background: Color,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            background: rendering::paint::WHITE,
        }
    }
}

/// Settings for the page stage.
#[derive(Debug, Clone, Copy)]
pub struct PageOptions {
    /// Page width in millimetres.
    pub width_mm: f64,
    /// Page height in millimetres.
    pub height_mm: f64,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            width_mm: A4_WIDTH_MM,
            height_mm: A4_HEIGHT_MM,
        }
    }
}

/// Configuration for the export worker.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Directory slips are saved into.
    pub out_dir: PathBuf,
    /// Explicit font file; when `None`, discovery falls back to the
    /// `RENTSLIP_FONT` environment variable and the system font paths.
    pub font_path: Option<PathBuf>,
    pub capture: CaptureOptions,
    pub page: PageOptions,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            font_path: None,
            capture: CaptureOptions::default(),
            page: PageOptions::default(),
        }
    }
}

/// Capture stage seam: turns a slip document into a bitmap.
pub trait CaptureBackend {
    /// Lays out, paints and rasterises `document` into a PNG-encoded bitmap.
    fn capture(&self, document: &ReceiptDocument, options: &CaptureOptions) -> Result<Screenshot>;
}

/// Page stage seam: wraps a captured bitmap into finished document bytes.
pub trait PageBackend {
    /// Embeds `capture` into a single page and serialises the document.
    fn write_page(&self, capture: &Screenshot, options: &PageOptions) -> Result<Vec<u8>>;
}
