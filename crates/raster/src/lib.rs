//! Collaborator adapters for pdftoebm.
//!
//! Two narrow, synchronous capabilities sit between the functional core and
//! the outside world:
//!
//! - [`Rasterizer`]: turn one PDF page into a grayscale raster at a given DPI.
//!   [`Pdftoppm`] shells out to Poppler's `pdftoppm`.
//! - [`ImageOps`]: trim detection and the crop / resize / binarize / rotate
//!   transform. [`ImageCrate`] does this in-process with the `image` crate.
//!
//! The pipeline only depends on these traits, never on a tool's command line.

use std::path::PathBuf;

use thiserror::Error;

use pdftoebm_core::CoreError;

pub mod document;
pub mod ops;
pub mod rasterize;
pub mod samples;

pub use document::PdfDocument;
pub use ops::{ImageCrate, ImageOps, Transform};
pub use rasterize::{Pdftoppm, Rasterizer};
pub use samples::Samples;

/// An 8-bit grayscale page raster.
pub type RasterImage = image::GrayImage;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Failed to start {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{tool} failed on page {page} ({status}): {stderr}")]
    CollaboratorFailure {
        tool: String,
        page: u32,
        status: String,
        stderr: String,
    },
    #[error("{tool} did not produce {}", path.display())]
    MissingOutput { tool: String, path: PathBuf },
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("Document is encrypted")]
    Encrypted,
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
