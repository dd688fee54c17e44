//! Summaries of raw `.ebm` bitstreams.

use serde::Serialize;

use crate::error::CoreError;
use crate::pack::{unpack, Polarity};
use crate::panel::PanelGeometry;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSummary {
    /// 1-based position in the bitstream.
    pub page: usize,
    pub black_pixels: usize,
    /// Share of black pixels, between 0 and 1.
    pub coverage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BitstreamSummary {
    pub bytes: usize,
    pub bytes_per_page: usize,
    pub page_count: usize,
    pub pages: Vec<PageSummary>,
}

/// Split a bitstream into page records and count black pixels in each.
pub fn summarize(
    bitstream: &[u8],
    geometry: &PanelGeometry,
    polarity: Polarity,
) -> Result<BitstreamSummary, CoreError> {
    let page_size = geometry.bytes_per_page();
    if page_size == 0 || bitstream.len() % page_size != 0 {
        return Err(CoreError::RaggedBitstream {
            len: bitstream.len(),
            page_size,
        });
    }

    let pixel_count = geometry.pixel_count();
    let pages: Vec<PageSummary> = bitstream
        .chunks(page_size)
        .enumerate()
        .map(|(i, record)| {
            let black_pixels = unpack(record, pixel_count, polarity)
                .iter()
                .filter(|p| p.is_black())
                .count();
            PageSummary {
                page: i + 1,
                black_pixels,
                coverage: black_pixels as f64 / pixel_count as f64,
            }
        })
        .collect();

    Ok(BitstreamSummary {
        bytes: bitstream.len(),
        bytes_per_page: page_size,
        page_count: pages.len(),
        pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{Panel, Rotation};

    fn tiny() -> PanelGeometry {
        PanelGeometry {
            width: 4,
            height: 4,
            rotation: Rotation::None,
            dpi: 72,
        }
    }

    #[test]
    fn test_summarize_two_pages() {
        let stream = [0xFF, 0xFF, 0x0F, 0x00];
        let summary = summarize(&stream, &tiny(), Polarity::SetOnBlack).unwrap();

        assert_eq!(summary.page_count, 2);
        assert_eq!(summary.bytes_per_page, 2);
        assert_eq!(summary.pages[0].black_pixels, 16);
        assert_eq!(summary.pages[1].black_pixels, 4);
        assert!((summary.pages[1].coverage - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summarize_respects_polarity() {
        let stream = [0xFF, 0xFF];
        let summary = summarize(&stream, &tiny(), Polarity::ClearOnBlack).unwrap();
        assert_eq!(summary.pages[0].black_pixels, 0);
    }

    #[test]
    fn test_summarize_rejects_ragged_stream() {
        let geometry = Panel::Epd7in5.geometry();
        let result = summarize(&[0u8; 48_001], &geometry, Polarity::SetOnBlack);
        assert!(matches!(result, Err(CoreError::RaggedBitstream { .. })));
    }

    #[test]
    fn test_summary_serializes() {
        let summary = summarize(&[0x80, 0x00], &tiny(), Polarity::SetOnBlack).unwrap();
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"page_count\":1"));
        assert!(json.contains("\"black_pixels\":1"));
    }

    #[test]
    fn test_empty_stream_has_no_pages() {
        let summary = summarize(&[], &tiny(), Polarity::SetOnBlack).unwrap();
        assert_eq!(summary.page_count, 0);
    }
}
