//! Core library for pdftoebm
//!
//! This crate implements the **Functional Core** of the pdftoebm application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The pdftoebm project is split into three crates:
//!
//! - **`pdftoebm_core`** (this crate): Pure transformation functions with zero I/O
//! - **`raster`**: Adapters around the PDF rasterizer and the image library
//! - **`pdftoebm`**: I/O operations and orchestration (the Imperative Shell)
//!
//! Everything that decides *what bytes end up on the display* lives here:
//! page geometry, crop selection, the 1-bit codec and the header format. The
//! shell only moves pixels in and bytes out.
//!
//! # Module Organization
//!
//! - [`panel`]: Supported displays and their geometry
//! - [`crop`]: Crop rectangles and crop policies
//! - [`range`]: Validated page ranges
//! - [`pack`]: MSB-first bit packing in both polarities, and unpacking
//! - [`header`]: C header-array rendering
//! - [`preset`]: Output presets and binarization settings
//! - [`inspect`]: Summaries of raw bitstreams
//! - [`size`]: Human-readable byte counts
//!
//! # Example Usage
//!
//! ```rust
//! use pdftoebm_core::pack::{pack_page, Pixel, Polarity};
//!
//! let pixels = [Pixel::Black, Pixel::White, Pixel::White, Pixel::White,
//!               Pixel::White, Pixel::White, Pixel::White, Pixel::Black];
//! let record = pack_page(pixels, 8, Polarity::SetOnBlack).unwrap();
//! assert_eq!(record, vec![0x81]);
//! ```

pub mod crop;
pub mod error;
pub mod header;
pub mod inspect;
pub mod pack;
pub mod panel;
pub mod preset;
pub mod range;
pub mod size;

pub use crop::{CropPolicy, CropRect};
pub use error::CoreError;
pub use pack::{Pixel, Polarity};
pub use panel::{Panel, PanelGeometry, Rotation};
pub use preset::{Binarization, Preset};
pub use range::PageRange;
