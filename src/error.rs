//! Error types for the receipt engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or exporting a receipt
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to initialize the export worker or one of its backends
    #[error("Exporter initialization failed: {0}")]
    InitializationError(String),

    /// Failed to rasterise the slip into a bitmap
    #[error("Capture failed: {0}")]
    CaptureError(String),

    /// Failed to build the PDF page around the captured bitmap
    #[error("Page encoding failed: {0}")]
    PageError(String),

    /// Failed to write the finished document to disk
    #[error("Save failed: {0}")]
    SaveError(String),

    /// An export is already running on this exporter
    #[error("An export is already in progress")]
    ExportBusy,

    /// Generic error
    #[error("{0}")]
    Other(String),
}
