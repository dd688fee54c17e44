use thiserror::Error;

use crate::crop::CropRect;

/// Errors produced by the pure transformation functions of the core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Invalid page range {first}..={last}: {reason}")]
    InvalidPageRange {
        first: u32,
        last: u32,
        reason: String,
    },

    #[error("Invalid crop geometry '{0}', expected WxH+X+Y")]
    InvalidCropGeometry(String),

    #[error("Crop rectangle {0} has zero area")]
    DegenerateCrop(CropRect),

    #[error("Crop rectangle {rect} does not fit inside a {width}x{height} raster")]
    CropOutOfBounds {
        rect: CropRect,
        width: u32,
        height: u32,
    },

    #[error("Page ended after {actual} pixels, expected {expected}")]
    ShortPage { expected: usize, actual: usize },

    #[error("Threshold must be between 0 and 100 percent, got {0}")]
    InvalidThreshold(u8),

    #[error("Unknown panel '{0}' (expected one of: epd7in5, epd4in2)")]
    UnknownPanel(String),

    #[error("Record length {len} is not a multiple of the page size {page_size}")]
    RaggedBitstream { len: usize, page_size: usize },
}
