//! Output presets and binarization settings.
//!
//! The two output formats differ in bit polarity and in the default crop
//! policy. Each is modelled as a named preset instead of a single pipeline
//! with independent switches.

use crate::crop::{CropPolicy, CropRect};
use crate::error::CoreError;
use crate::pack::Polarity;

/// Default luminance threshold, in percent.
pub const DEFAULT_THRESHOLD: u8 = 80;

/// How a normalized page is collapsed to black and white.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binarization {
    /// Luminance at or above `percent` of full scale is white, below is black.
    Threshold { percent: u8 },
    /// Dithered monochrome reduction; only pure black counts as black.
    Monochrome,
}

impl Binarization {
    pub fn threshold(percent: u8) -> Result<Self, CoreError> {
        if percent > 100 {
            return Err(CoreError::InvalidThreshold(percent));
        }
        Ok(Binarization::Threshold { percent })
    }

    /// The smallest 8-bit luminance that counts as white for a threshold.
    pub fn cutoff(percent: u8) -> u8 {
        let scaled = (u32::from(percent.min(100)) * 255).div_ceil(100);
        scaled as u8
    }
}

impl Default for Binarization {
    fn default() -> Self {
        Binarization::Threshold {
            percent: DEFAULT_THRESHOLD,
        }
    }
}

/// The two output artifacts the tool can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// C header with a `[pages][bytes]` array.
    HeaderArray,
    /// Raw concatenated page records.
    RawBinary,
}

impl Preset {
    /// Bit polarity expected by the consumer of this artifact.
    pub fn polarity(&self) -> Polarity {
        match self {
            Preset::HeaderArray => Polarity::ClearOnBlack,
            Preset::RawBinary => Polarity::SetOnBlack,
        }
    }

    /// Crop policy for this preset.
    ///
    /// An explicit rectangle always wins. Otherwise the header preset trims
    /// against `reference_page` when one is given and trims every page when
    /// not; the raw preset shares the largest trimmed box.
    pub fn crop_policy(&self, explicit: Option<CropRect>, reference_page: Option<u32>) -> CropPolicy {
        if let Some(rect) = explicit {
            return CropPolicy::Fixed(rect);
        }

        match (self, reference_page) {
            (_, Some(page)) => CropPolicy::Reference(page),
            (Preset::HeaderArray, None) => CropPolicy::PerPage,
            (Preset::RawBinary, None) => CropPolicy::LargestBox,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Preset::HeaderArray => "h",
            Preset::RawBinary => "ebm",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polarity_per_preset() {
        assert_eq!(Preset::HeaderArray.polarity(), Polarity::ClearOnBlack);
        assert_eq!(Preset::RawBinary.polarity(), Polarity::SetOnBlack);
    }

    #[test]
    fn test_header_crop_policy() {
        assert_eq!(
            Preset::HeaderArray.crop_policy(None, Some(3)),
            CropPolicy::Reference(3)
        );
        assert_eq!(Preset::HeaderArray.crop_policy(None, None), CropPolicy::PerPage);
    }

    #[test]
    fn test_raw_crop_policy() {
        assert_eq!(Preset::RawBinary.crop_policy(None, None), CropPolicy::LargestBox);
        assert_eq!(
            Preset::RawBinary.crop_policy(None, Some(2)),
            CropPolicy::Reference(2)
        );
    }

    #[test]
    fn test_explicit_crop_wins() {
        let rect = CropRect::new(10, 10, 1, 1);
        assert_eq!(
            Preset::HeaderArray.crop_policy(Some(rect), Some(4)),
            CropPolicy::Fixed(rect)
        );
    }

    #[test]
    fn test_threshold_cutoff() {
        assert_eq!(Binarization::cutoff(0), 0);
        assert_eq!(Binarization::cutoff(50), 128);
        assert_eq!(Binarization::cutoff(80), 204);
        assert_eq!(Binarization::cutoff(100), 255);
    }

    #[test]
    fn test_threshold_validation() {
        assert!(Binarization::threshold(100).is_ok());
        assert_eq!(
            Binarization::threshold(101),
            Err(CoreError::InvalidThreshold(101))
        );
        assert_eq!(
            Binarization::default(),
            Binarization::Threshold { percent: 80 }
        );
    }
}
