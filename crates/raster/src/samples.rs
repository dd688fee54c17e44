use pdftoebm_core::Pixel;

use crate::RasterImage;

/// Row-major black/white samples of a binarized raster.
///
/// Takes ownership of the raster, so it can only be walked once. Any value
/// other than pure black reads as white.
#[derive(Debug)]
pub struct Samples {
    inner: std::vec::IntoIter<u8>,
}

impl Samples {
    pub fn new(image: RasterImage) -> Self {
        Self {
            inner: image.into_raw().into_iter(),
        }
    }
}

impl Iterator for Samples {
    type Item = Pixel;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Pixel::from_luma)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Samples {}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn samples_are_row_major() {
        let mut img = GrayImage::from_pixel(3, 2, Luma([255]));
        img.put_pixel(1, 0, Luma([0]));
        img.put_pixel(0, 1, Luma([0]));

        let pixels: Vec<Pixel> = Samples::new(img).collect();
        assert_eq!(
            pixels,
            vec![
                Pixel::White,
                Pixel::Black,
                Pixel::White,
                Pixel::Black,
                Pixel::White,
                Pixel::White,
            ]
        );
    }

    #[test]
    fn samples_report_exact_length() {
        let samples = Samples::new(GrayImage::new(5, 7));
        assert_eq!(samples.len(), 35);
    }

    #[test]
    fn only_pure_black_is_black() {
        let mut img = GrayImage::new(2, 1);
        img.put_pixel(0, 0, Luma([1]));
        let pixels: Vec<Pixel> = Samples::new(img).collect();
        assert_eq!(pixels, vec![Pixel::White, Pixel::Black]);
    }
}
