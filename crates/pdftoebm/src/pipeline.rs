//! Per-page normalization and packing.
//!
//! Every page goes through the same sequence, one page at a time:
//! rasterize, crop, stretch to the panel size, binarize, rotate, pack. The
//! only state carried between pages is the shared crop rectangle, which is
//! settled before the first page is packed.

use std::path::Path;

use pdftoebm_core::crop::largest;
use pdftoebm_core::pack::pack_page;
use pdftoebm_core::{Binarization, CropPolicy, CropRect, PageRange, PanelGeometry, Polarity};
use raster::{ImageOps, RasterImage, Rasterizer, Samples, Transform};

use crate::error::Error;
use crate::progress::Progress;

pub struct Pipeline<'a, R, O> {
    rasterizer: &'a R,
    ops: &'a O,
    document: &'a Path,
    geometry: PanelGeometry,
    binarization: Binarization,
}

impl<'a, R: Rasterizer, O: ImageOps> Pipeline<'a, R, O> {
    pub fn new(
        rasterizer: &'a R,
        ops: &'a O,
        document: &'a Path,
        geometry: PanelGeometry,
        binarization: Binarization,
    ) -> Self {
        Self {
            rasterizer,
            ops,
            document,
            geometry,
            binarization,
        }
    }

    pub fn geometry(&self) -> &PanelGeometry {
        &self.geometry
    }

    fn rasterize(&self, page: u32) -> Result<RasterImage, Error> {
        Ok(self
            .rasterizer
            .rasterize(self.document, page, self.geometry.dpi)?)
    }

    /// Auto-trim rectangle of a single page.
    pub fn trim(&self, page: u32) -> Result<CropRect, Error> {
        let image = self.rasterize(page)?;
        let rect = self.ops.trim_box(&image);
        log::debug!("page {} trims to {}", page, rect);
        Ok(rect)
    }

    /// Settle the crop shared by every page, if the policy has one.
    ///
    /// Returns `None` for [`CropPolicy::PerPage`]. A shared rectangle with
    /// zero area is rejected here, before any page is binarized.
    pub fn shared_crop(&self, policy: CropPolicy, range: PageRange) -> Result<Option<CropRect>, Error> {
        let rect = match policy {
            CropPolicy::PerPage => return Ok(None),
            CropPolicy::Fixed(rect) => rect,
            CropPolicy::Reference(page) => self.trim(page)?,
            CropPolicy::LargestBox => {
                let rects = range
                    .pages()
                    .map(|page| self.trim(page))
                    .collect::<Result<Vec<_>, _>>()?;
                largest(rects).unwrap_or_default()
            }
        };

        Ok(Some(rect.non_degenerate()?))
    }

    /// Produce the binarized, rotated raster for one page.
    ///
    /// A shared crop is clipped to the page, so pages smaller than the one it
    /// came from still convert. Without a shared crop the page is trimmed on
    /// its own, and a page with no content keeps its full extent.
    pub fn normalize(&self, page: u32, shared: Option<CropRect>) -> Result<RasterImage, Error> {
        let image = self.rasterize(page)?;

        let (width, height) = image.dimensions();
        let crop = match shared {
            Some(rect) => {
                let clipped = rect.clip_to(width, height)?;
                if clipped != rect {
                    log::debug!("page {} is {}x{}, crop clipped to {}", page, width, height, clipped);
                }
                clipped
            }
            None => {
                let rect = self.ops.trim_box(&image);
                log::debug!("page {} trims to {}", page, rect);
                if rect.is_degenerate() {
                    // Nothing to trim on a blank page; it becomes a blank panel page.
                    CropRect::full(width, height).non_degenerate()?
                } else {
                    rect
                }
            }
        };

        let transform = Transform::new()
            .with_crop(crop)
            .with_resize(self.geometry.width, self.geometry.height)
            .with_binarization(self.binarization)
            .with_rotation(self.geometry.rotation);

        Ok(self.ops.transform(image, &transform)?)
    }

    /// Normalize and pack one page into its record.
    pub fn pack(&self, page: u32, shared: Option<CropRect>, polarity: Polarity) -> Result<Vec<u8>, Error> {
        let image = self.normalize(page, shared)?;
        let record = pack_page(Samples::new(image), self.geometry.pixel_count(), polarity)?;
        log::debug!("page {} packed into {} bytes", page, record.len());
        Ok(record)
    }

    /// Pack every page of `range` in order, handing each record to `emit`.
    ///
    /// Stops at the first error; `emit` never sees a page after a failed one.
    /// The progress display is finished either way.
    pub fn run<F>(
        &self,
        range: PageRange,
        policy: CropPolicy,
        polarity: Polarity,
        progress: &Progress,
        mut emit: F,
    ) -> Result<usize, Error>
    where
        F: FnMut(u32, Vec<u8>) -> Result<(), Error>,
    {
        let result = self.run_pages(range, policy, polarity, progress, &mut emit);
        progress.finish();
        result
    }

    fn run_pages<F>(
        &self,
        range: PageRange,
        policy: CropPolicy,
        polarity: Polarity,
        progress: &Progress,
        emit: &mut F,
    ) -> Result<usize, Error>
    where
        F: FnMut(u32, Vec<u8>) -> Result<(), Error>,
    {
        progress.message(format!("Crop policy: {}", policy));
        let shared = self.shared_crop(policy, range)?;
        if let Some(rect) = shared {
            progress.message(format!("Crop: {}", rect));
        }

        let mut written = 0;
        for (i, page) in range.pages().enumerate() {
            progress.page(i + 1);
            let record = self.pack(page, shared, polarity)?;
            emit(page, record)?;
            written += 1;
        }

        Ok(written)
    }
}
