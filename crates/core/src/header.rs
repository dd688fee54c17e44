//! C header rendering for packed pages.
//!
//! The generated file declares a `[page_count][bytes_per_page]` byte array
//! that firmware can include directly:
//!
//! ```c
//! #ifndef DOC_H
//! #define DOC_H
//!
//! const size_t data_len = 2;
//!
//! const unsigned char data[2][48000] = {
//!     {
//!         0xFF, 0xFF, ...
//!     },
//! };
//!
//! #endif /* DOC_H */
//! ```

use std::fmt::Write;

/// Hex literals per line inside a page block.
pub const BYTES_PER_LINE: usize = 12;

/// Build an include-guard macro from a file stem, e.g. `doc` -> `DOC_H`.
pub fn guard_macro(stem: &str) -> String {
    let mut name: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();

    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }

    name.push_str("_H");
    name
}

/// Incremental renderer for a header-array artifact.
///
/// The page count is part of the prologue, so the renderer is created with
/// it and [`HeaderRenderer::finish`] refuses to close a document that holds a
/// different number of pages.
#[derive(Debug)]
pub struct HeaderRenderer {
    guard: String,
    page_count: usize,
    bytes_per_page: usize,
    pages_written: usize,
    text: String,
}

impl HeaderRenderer {
    pub fn new(guard: impl Into<String>, page_count: usize, bytes_per_page: usize) -> Self {
        let guard = guard.into();
        // Roughly six characters per byte literal.
        let mut text = String::with_capacity(page_count * bytes_per_page * 6 + 256);

        let _ = writeln!(text, "#ifndef {guard}");
        let _ = writeln!(text, "#define {guard}\n");
        let _ = writeln!(text, "const size_t data_len = {page_count};\n");
        let _ = writeln!(
            text,
            "const unsigned char data[{page_count}][{bytes_per_page}] = {{"
        );

        Self {
            guard,
            page_count,
            bytes_per_page,
            pages_written: 0,
            text,
        }
    }

    /// Append one page block.
    pub fn push_page(&mut self, record: &[u8]) -> Result<(), HeaderError> {
        if record.len() != self.bytes_per_page {
            return Err(HeaderError::RecordSize {
                expected: self.bytes_per_page,
                actual: record.len(),
            });
        }
        if self.pages_written == self.page_count {
            return Err(HeaderError::PageCount {
                declared: self.page_count,
                written: self.pages_written + 1,
            });
        }

        self.text.push_str("\t{\n\t\t");
        for (i, byte) in record.iter().enumerate() {
            let _ = write!(self.text, "0x{byte:02X}, ");
            if (i + 1) % BYTES_PER_LINE == 0 {
                self.text.push_str("\n\t\t");
            }
        }
        self.text.push_str("\n\t},\n");

        self.pages_written += 1;
        Ok(())
    }

    /// Close the array and the include guard.
    pub fn finish(mut self) -> Result<String, HeaderError> {
        if self.pages_written != self.page_count {
            return Err(HeaderError::PageCount {
                declared: self.page_count,
                written: self.pages_written,
            });
        }

        self.text.push_str("};\n\n");
        let _ = write!(self.text, "#endif /* {} */", self.guard);
        Ok(self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    #[error("Page record is {actual} bytes, expected {expected}")]
    RecordSize { expected: usize, actual: usize },

    #[error("Header declares {declared} page(s) but {written} were written")]
    PageCount { declared: usize, written: usize },
}
