use image::imageops::{self, FilterType};
use image::Luma;

use pdftoebm_core::{Binarization, CropRect, Rotation};

use crate::{RasterError, RasterImage};

/// The per-page transform, applied in field order: crop, resize, binarize,
/// rotate. Every step is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transform {
    pub crop: Option<CropRect>,
    /// Exact target size; aspect ratio is not preserved.
    pub resize: Option<(u32, u32)>,
    pub binarize: Option<Binarization>,
    pub rotate: Option<Rotation>,
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_crop(mut self, crop: CropRect) -> Self {
        self.crop = Some(crop);
        self
    }

    pub fn with_resize(mut self, width: u32, height: u32) -> Self {
        self.resize = Some((width, height));
        self
    }

    pub fn with_binarization(mut self, binarization: Binarization) -> Self {
        self.binarize = Some(binarization);
        self
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotate = Some(rotation);
        self
    }
}

/// Image primitives the normalizer needs from an image library.
pub trait ImageOps {
    /// Tightest box around everything that differs from the background.
    ///
    /// Returns a zero-sized rectangle when the whole image is background.
    fn trim_box(&self, image: &RasterImage) -> CropRect;

    fn transform(&self, image: RasterImage, transform: &Transform) -> Result<RasterImage, RasterError>;
}

/// [`ImageOps`] implemented with the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrate {
    /// Luminance difference from the background still treated as background.
    pub fuzz: u8,
}

impl ImageCrate {
    pub fn new(fuzz: u8) -> Self {
        Self { fuzz }
    }
}

impl ImageOps for ImageCrate {
    fn trim_box(&self, image: &RasterImage) -> CropRect {
        trim_box(image, self.fuzz)
    }

    fn transform(&self, image: RasterImage, transform: &Transform) -> Result<RasterImage, RasterError> {
        let mut image = image;

        if let Some(rect) = transform.crop {
            rect.non_degenerate()?;
            rect.check_within(image.width(), image.height())?;
            image = imageops::crop_imm(&image, rect.x, rect.y, rect.width, rect.height).to_image();
        }

        if let Some((width, height)) = transform.resize {
            if (width, height) != image.dimensions() {
                image = imageops::resize(&image, width, height, FilterType::Triangle);
            }
        }

        match transform.binarize {
            Some(Binarization::Threshold { percent }) => {
                threshold_in_place(&mut image, Binarization::cutoff(percent));
            }
            Some(Binarization::Monochrome) => {
                imageops::dither(&mut image, &imageops::BiLevel);
            }
            None => {}
        }

        if let Some(rotation) = transform.rotate {
            image = rotate(&image, rotation);
        }

        Ok(image)
    }
}

/// Bounding box of pixels further than `fuzz` from the top-left pixel.
pub fn trim_box(image: &RasterImage, fuzz: u8) -> CropRect {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return CropRect::default();
    }

    let background = image.get_pixel(0, 0).0[0];
    let mut bounds: Option<(u32, u32, u32, u32)> = None;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0[0].abs_diff(background) <= fuzz {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
        });
    }

    match bounds {
        Some((min_x, min_y, max_x, max_y)) => {
            CropRect::new(max_x - min_x + 1, max_y - min_y + 1, min_x, min_y)
        }
        None => CropRect::default(),
    }
}

/// Pixels at or above `cutoff` become white, the rest black.
fn threshold_in_place(image: &mut RasterImage, cutoff: u8) {
    for pixel in image.pixels_mut() {
        *pixel = if pixel.0[0] >= cutoff { Luma([255]) } else { Luma([0]) };
    }
}

fn rotate(image: &RasterImage, rotation: Rotation) -> RasterImage {
    match rotation {
        Rotation::None => image.clone(),
        Rotation::Clockwise => imageops::rotate90(image),
        Rotation::Half => imageops::rotate180(image),
        Rotation::CounterClockwise => imageops::rotate270(image),
    }
}
