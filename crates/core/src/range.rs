//! 1-based inclusive page ranges.

use std::fmt;

use crate::error::CoreError;

/// An inclusive, 1-based range of document pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    first: u32,
    last: u32,
}

impl PageRange {
    /// Validate page bounds given on the command line.
    pub fn new(first: u32, last: u32) -> Result<Self, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidPageRange {
            first,
            last,
            reason: reason.to_string(),
        };

        if first == 0 {
            return Err(invalid("pages are numbered from 1"));
        }
        if first > last {
            return Err(invalid("first page is after last page"));
        }

        Ok(Self { first, last })
    }

    /// Every page of a document with `page_count` pages.
    pub fn whole(page_count: u32) -> Result<Self, CoreError> {
        Self::new(1, page_count)
    }

    pub fn first(&self) -> u32 {
        self.first
    }

    pub fn last(&self) -> u32 {
        self.last
    }

    /// Number of pages in the range, never zero.
    pub fn page_count(&self) -> usize {
        (self.last - self.first + 1) as usize
    }

    /// Ensure the range does not run past the end of the document.
    pub fn check_within(&self, page_count: u32) -> Result<(), CoreError> {
        if self.last > page_count {
            return Err(CoreError::InvalidPageRange {
                first: self.first,
                last: self.last,
                reason: format!("document only has {page_count} page(s)"),
            });
        }
        Ok(())
    }

    pub fn pages(&self) -> impl Iterator<Item = u32> {
        self.first..=self.last
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_page_range() {
        let range = PageRange::new(5, 5).unwrap();
        assert_eq!(range.page_count(), 1);
        assert_eq!(range.pages().collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn test_rejects_zero() {
        assert!(matches!(
            PageRange::new(0, 3),
            Err(CoreError::InvalidPageRange { .. })
        ));
    }

    #[test]
    fn test_rejects_reversed() {
        assert!(PageRange::new(4, 3).is_err());
    }

    #[test]
    fn test_check_within_document() {
        let range = PageRange::new(2, 10).unwrap();
        assert!(range.check_within(10).is_ok());
        assert!(range.check_within(9).is_err());
    }

    #[test]
    fn test_whole_document() {
        let range = PageRange::whole(3).unwrap();
        assert_eq!(range.pages().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(PageRange::whole(0).is_err());
    }

    #[test]
    fn test_page_count_and_display() {
        let range = PageRange::new(3, 7).unwrap();
        assert_eq!(range.page_count(), 5);
        assert_eq!(range.to_string(), "3-7");
    }
}
