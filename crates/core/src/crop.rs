//! Crop rectangles and the policies that decide which rectangle each page gets.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;

/// A crop region in source raster pixels.
///
/// The textual form is the ImageMagick geometry `WxH+X+Y`, which is also what
/// the `--crop` flag accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct CropRect {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

impl CropRect {
    pub fn new(width: u32, height: u32, x: u32, y: u32) -> Self {
        Self {
            width,
            height,
            x,
            y,
        }
    }

    /// Rectangle covering a whole `width` x `height` raster.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(width, height, 0, 0)
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Reject rectangles with zero width or height.
    pub fn non_degenerate(self) -> Result<Self, CoreError> {
        if self.is_degenerate() {
            Err(CoreError::DegenerateCrop(self))
        } else {
            Ok(self)
        }
    }

    /// Check that the rectangle lies fully within a `width` x `height` raster.
    pub fn check_within(&self, width: u32, height: u32) -> Result<(), CoreError> {
        let right = u64::from(self.x) + u64::from(self.width);
        let bottom = u64::from(self.y) + u64::from(self.height);
        if right > u64::from(width) || bottom > u64::from(height) {
            return Err(CoreError::CropOutOfBounds {
                rect: *self,
                width,
                height,
            });
        }
        Ok(())
    }

    /// Intersect the rectangle with a `width` x `height` raster.
    ///
    /// Fails with [`CoreError::CropOutOfBounds`] when nothing of the rectangle
    /// is left on the raster.
    pub fn clip_to(&self, width: u32, height: u32) -> Result<Self, CoreError> {
        let right = self.x.saturating_add(self.width).min(width);
        let bottom = self.y.saturating_add(self.height).min(height);
        if self.x >= right || self.y >= bottom {
            return Err(CoreError::CropOutOfBounds {
                rect: *self,
                width,
                height,
            });
        }
        Ok(Self::new(right - self.x, bottom - self.y, self.x, self.y))
    }
}

impl fmt::Display for CropRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

impl FromStr for CropRect {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidCropGeometry(s.to_string());
        let trimmed = s.trim();

        let (size, offsets) = match trimmed.find('+') {
            Some(idx) => (&trimmed[..idx], Some(&trimmed[idx + 1..])),
            None => (trimmed, None),
        };

        let (w, h) = size.split_once(['x', 'X']).ok_or_else(invalid)?;
        let width = w.parse::<u32>().map_err(|_| invalid())?;
        let height = h.parse::<u32>().map_err(|_| invalid())?;

        let (x, y) = match offsets {
            None => (0, 0),
            Some(rest) => {
                let (x, y) = rest.split_once('+').ok_or_else(invalid)?;
                (
                    x.parse::<u32>().map_err(|_| invalid())?,
                    y.parse::<u32>().map_err(|_| invalid())?,
                )
            }
        };

        Ok(CropRect::new(width, height, x, y))
    }
}

/// Pick the rectangle with the largest area.
///
/// Ties keep the earliest rectangle, so the result only depends on page order.
pub fn largest<I>(rects: I) -> Option<CropRect>
where
    I: IntoIterator<Item = CropRect>,
{
    rects.into_iter().fold(None, |best, rect| match best {
        Some(current) if current.area() >= rect.area() => Some(current),
        _ => Some(rect),
    })
}

/// How pages are cropped before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropPolicy {
    /// The same explicit rectangle for every page.
    Fixed(CropRect),
    /// Trim a reference page once and apply its rectangle to every page.
    Reference(u32),
    /// Trim every page independently.
    PerPage,
    /// Trim every page and share the largest rectangle across all of them.
    LargestBox,
}

impl fmt::Display for CropPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CropPolicy::Fixed(rect) => write!(f, "fixed {rect}"),
            CropPolicy::Reference(page) => write!(f, "reference page {page}"),
            CropPolicy::PerPage => f.write_str("per-page trim"),
            CropPolicy::LargestBox => f.write_str("largest bounding box"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================================
    // Parsing and formatting
    // ============================================================================

    #[test]
    fn test_parse_full_geometry() {
        let rect: CropRect = "2100x2970+12+34".parse().unwrap();
        assert_eq!(rect, CropRect::new(2100, 2970, 12, 34));
    }

    #[test]
    fn test_parse_without_offsets() {
        let rect: CropRect = "640x480".parse().unwrap();
        assert_eq!(rect, CropRect::new(640, 480, 0, 0));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let rect: CropRect = " 10x20+1+2\n".parse().unwrap();
        assert_eq!(rect, CropRect::new(10, 20, 1, 2));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", "10", "10x", "x10", "10x20+1", "10x20+a+b", "-1x2+0+0"] {
            assert!(
                matches!(
                    input.parse::<CropRect>(),
                    Err(CoreError::InvalidCropGeometry(_))
                ),
                "expected '{input}' to be rejected"
            );
        }
    }

    #[test]
    fn test_display_matches_parse() {
        let rect = CropRect::new(7, 9, 3, 4);
        assert_eq!(rect.to_string(), "7x9+3+4");
        assert_eq!(rect.to_string().parse::<CropRect>().unwrap(), rect);
    }

    // ============================================================================
    // Validation
    // ============================================================================

    #[test]
    fn test_degenerate() {
        assert!(CropRect::new(0, 10, 0, 0).is_degenerate());
        assert!(CropRect::new(10, 0, 0, 0).is_degenerate());
        assert!(!CropRect::new(1, 1, 0, 0).is_degenerate());
        assert!(matches!(
            CropRect::new(0, 5, 1, 1).non_degenerate(),
            Err(CoreError::DegenerateCrop(_))
        ));
    }

    #[test]
    fn test_check_within() {
        assert!(CropRect::new(10, 10, 0, 0).check_within(10, 10).is_ok());
        assert!(CropRect::new(5, 5, 5, 5).check_within(10, 10).is_ok());
        assert!(CropRect::new(5, 5, 6, 0).check_within(10, 10).is_err());
        assert!(CropRect::new(5, 5, 0, 6).check_within(10, 10).is_err());
        assert!(CropRect::new(u32::MAX, 1, 1, 0).check_within(10, 10).is_err());
    }

    #[test]
    fn test_clip_inside_is_unchanged() {
        let rect = CropRect::new(5, 5, 2, 3);
        assert_eq!(rect.clip_to(10, 10).unwrap(), rect);
    }

    #[test]
    fn test_clip_to_smaller_raster() {
        let rect = CropRect::new(30, 30, 5, 5);
        assert_eq!(rect.clip_to(20, 20).unwrap(), CropRect::new(15, 15, 5, 5));
        assert!(CropRect::new(u32::MAX, 4, 1, 0).clip_to(10, 10).is_ok());
    }

    #[test]
    fn test_clip_without_overlap() {
        assert!(matches!(
            CropRect::new(5, 5, 20, 0).clip_to(10, 10),
            Err(CoreError::CropOutOfBounds { .. })
        ));
        assert!(CropRect::new(5, 5, 0, 10).clip_to(10, 10).is_err());
    }

    // ============================================================================
    // Largest bounding box
    // ============================================================================

    #[test]
    fn test_largest_empty() {
        assert_eq!(largest(Vec::new()), None);
    }

    #[test]
    fn test_largest_picks_max_area() {
        let rects = vec![
            CropRect::new(10, 10, 0, 0),
            CropRect::new(30, 5, 1, 1),
            CropRect::new(20, 20, 2, 2),
        ];
        assert_eq!(largest(rects), Some(CropRect::new(20, 20, 2, 2)));
    }

    #[test]
    fn test_largest_keeps_first_on_tie() {
        let rects = vec![CropRect::new(4, 5, 0, 0), CropRect::new(5, 4, 9, 9)];
        assert_eq!(largest(rects), Some(CropRect::new(4, 5, 0, 0)));
    }

    #[test]
    fn test_largest_area_dominates_every_input() {
        let rects: Vec<CropRect> = (1..40u32)
            .map(|i| CropRect::new((i * 7) % 23 + 1, (i * 13) % 17 + 1, i, i))
            .collect();
        let best = largest(rects.clone()).unwrap();
        assert!(rects.iter().all(|r| best.area() >= r.area()));
    }
}
